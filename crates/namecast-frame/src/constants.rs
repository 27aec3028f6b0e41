//! Wire format constants.
//!
//! Encode and decode both read from here; changing any value changes the
//! wire format.

/// Protocol marker stored in the low 3 bits of every header.
pub const FLAG: u8 = 0b101;

/// Width of the flag field.
pub const FLAG_BITS: u32 = 3;

/// Width of the name length field.
pub const NAME_LEN_BITS: u32 = 4;

/// Width of the message chunk length field.
pub const MSG_LEN_BITS: u32 = 5;

/// Width of the checksum field.
pub const CRC4_BITS: u32 = 4;

/// Longest sender name a header can describe.
pub const NAME_LEN_MAX: usize = (1 << NAME_LEN_BITS) - 1;

/// Longest text chunk a single packet can carry.
pub const MSG_LEN_MAX: usize = (1 << MSG_LEN_BITS) - 1;

/// Packed header size in bytes.
pub const HEADER_SIZE: usize = 2;

/// Largest possible packet: header + longest name + longest chunk.
pub const MAX_PACKET_SIZE: usize = HEADER_SIZE + NAME_LEN_MAX + MSG_LEN_MAX;

const _: () = assert!(FLAG_BITS + NAME_LEN_BITS + MSG_LEN_BITS + CRC4_BITS == 8 * HEADER_SIZE as u32);
const _: () = assert!(MAX_PACKET_SIZE == 48);

/// Mask covering the lowest `bits` bits of a byte.
pub(crate) const fn low_mask(bits: u32) -> u8 {
    ((1u16 << bits) - 1) as u8
}
