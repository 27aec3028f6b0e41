//! Table-driven CRC4 over polynomial `0b10111`.

/// Lookup table indexed by `crc ^ nibble`.
const CRC4_TABLE: [u8; 16] = [
    0x0, 0x7, 0xe, 0x9, 0xb, 0xc, 0x5, 0x2, 0x1, 0x6, 0xf, 0x8, 0xa, 0xd, 0x4, 0x3,
];

/// Fold the low `bits` bits of `value` into `start`, most significant nibble first.
///
/// Bits above `bits` are ignored. `bits` is rounded up to a multiple of 4 and
/// capped at 64. A zero-width input returns `start` unchanged.
pub fn crc4(start: u8, value: u64, bits: usize) -> u8 {
    let bits = bits.min(u64::BITS as usize);
    let value = if bits == u64::BITS as usize {
        value
    } else {
        value & ((1u64 << bits) - 1)
    };
    let aligned = (bits + 3) & !0x3;

    let mut crc = start & 0xf;
    let mut shift = aligned;
    while shift >= 4 {
        shift -= 4;
        let nibble = ((value >> shift) & 0xf) as u8;
        crc = CRC4_TABLE[usize::from(crc ^ nibble)];
    }
    crc
}

/// Fold every byte of `bytes` into `start`, in order.
pub fn crc4_range(start: u8, bytes: &[u8]) -> u8 {
    bytes
        .iter()
        .fold(start, |acc, &byte| crc4(acc, u64::from(byte), 8))
}
