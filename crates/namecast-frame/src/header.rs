//! Packed 2-byte packet header.
//!
//! Fields are packed least-significant bit first:
//!
//! ```text
//!  byte 0                          byte 1
//! ┌────────┬───────────┬─────────┐┌─────────────┬──────────┐
//! │ flag   │ name_len  │ msg_len ││ msg_len     │ crc4     │
//! │ b0..=2 │ b3..=6    │ b7 (lsb)││ b0..=3 (hi) │ b4..=7   │
//! └────────┴───────────┴─────────┘└─────────────┴──────────┘
//! ```

use crate::constants::{
    low_mask, CRC4_BITS, FLAG, FLAG_BITS, HEADER_SIZE, MSG_LEN_BITS, MSG_LEN_MAX, NAME_LEN_BITS,
    NAME_LEN_MAX,
};
use crate::crc4::crc4_range;
use crate::error::{DecodeError, EncodeError};

const NAME_LEN_SHIFT: u32 = FLAG_BITS;
const MSG_LEN_LSB_SHIFT: u32 = FLAG_BITS + NAME_LEN_BITS;
const MSG_LEN_HI_BITS: u32 = MSG_LEN_BITS - 1;
const CRC4_SHIFT: u32 = MSG_LEN_HI_BITS;
const CRC4_MASK: u8 = low_mask(CRC4_BITS) << CRC4_SHIFT;

/// A packet header, held as its two wire bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    raw: [u8; HEADER_SIZE],
}

impl Header {
    /// Build a header for a packet with the given field lengths.
    ///
    /// The flag is set to [`FLAG`]; the checksum is left at zero.
    pub fn new(name_len: usize, msg_len: usize) -> Result<Self, EncodeError> {
        if name_len == 0 || name_len > NAME_LEN_MAX || msg_len == 0 || msg_len > MSG_LEN_MAX {
            return Err(EncodeError::InvalidLength { name_len, msg_len });
        }
        let mut header = Self::default();
        header.set_flag(FLAG);
        header.set_name_len(name_len as u8);
        header.set_msg_len(msg_len as u8);
        Ok(header)
    }

    /// Wrap two raw header bytes without validating them.
    pub const fn from_bytes(raw: [u8; HEADER_SIZE]) -> Self {
        Self { raw }
    }

    /// Read the header at the start of `buf`.
    ///
    /// Only the length is checked here; see [`Header::validate`].
    pub fn parse(buf: &[u8]) -> Result<Self, DecodeError> {
        match buf {
            [b0, b1, ..] => Ok(Self::from_bytes([*b0, *b1])),
            _ => Err(DecodeError::TruncatedHeader {
                available: buf.len(),
            }),
        }
    }

    /// Check the flag marker and that neither length field is zero.
    pub fn validate(&self) -> Result<(), DecodeError> {
        let flag = self.flag();
        if flag != FLAG {
            return Err(DecodeError::InvalidFlag { found: flag });
        }
        let (name_len, msg_len) = (self.name_len(), self.msg_len());
        if name_len == 0 || msg_len == 0 {
            return Err(DecodeError::InvalidLength { name_len, msg_len });
        }
        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8; HEADER_SIZE] {
        &self.raw
    }

    pub fn flag(&self) -> u8 {
        self.raw[0] & low_mask(FLAG_BITS)
    }

    pub fn name_len(&self) -> u8 {
        (self.raw[0] >> NAME_LEN_SHIFT) & low_mask(NAME_LEN_BITS)
    }

    pub fn msg_len(&self) -> u8 {
        let lsb = (self.raw[0] >> MSG_LEN_LSB_SHIFT) & 1;
        let hi = self.raw[1] & low_mask(MSG_LEN_HI_BITS);
        lsb | (hi << 1)
    }

    pub fn crc4(&self) -> u8 {
        (self.raw[1] & CRC4_MASK) >> CRC4_SHIFT
    }

    /// Size of the whole packet this header describes.
    pub fn packet_len(&self) -> usize {
        HEADER_SIZE + usize::from(self.name_len()) + usize::from(self.msg_len())
    }

    pub fn set_flag(&mut self, flag: u8) {
        let mask = low_mask(FLAG_BITS);
        self.raw[0] = (self.raw[0] & !mask) | (flag & mask);
    }

    pub fn set_name_len(&mut self, name_len: u8) {
        let mask = low_mask(NAME_LEN_BITS) << NAME_LEN_SHIFT;
        self.raw[0] = (self.raw[0] & !mask) | ((name_len << NAME_LEN_SHIFT) & mask);
    }

    pub fn set_msg_len(&mut self, msg_len: u8) {
        let lsb_mask: u8 = 1 << MSG_LEN_LSB_SHIFT;
        let hi_mask = low_mask(MSG_LEN_HI_BITS);
        self.raw[0] = (self.raw[0] & !lsb_mask) | ((msg_len & 1) << MSG_LEN_LSB_SHIFT);
        self.raw[1] = (self.raw[1] & !hi_mask) | ((msg_len >> 1) & hi_mask);
    }

    /// Store a checksum. Only the low 4 bits of `crc` are kept.
    pub fn set_crc4(&mut self, crc: u8) {
        self.raw[1] = (self.raw[1] & !CRC4_MASK) | ((crc << CRC4_SHIFT) & CRC4_MASK);
    }

    /// CRC4 of the header bytes with the checksum field zeroed.
    ///
    /// Works on a copy, so the stored checksum is left intact. Feed the
    /// result into [`crc4_range`] over the packet body to get the full
    /// packet checksum.
    pub fn checksum(&self) -> u8 {
        let mut zeroed = self.raw;
        zeroed[1] &= !CRC4_MASK;
        crc4_range(0, &zeroed)
    }
}
