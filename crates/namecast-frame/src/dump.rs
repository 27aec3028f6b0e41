//! Hex rendering of encoded buffers.

use std::fmt;

/// Displays bytes as space-separated lowercase hex, e.g. `a5 d5 4e`.
#[derive(Debug, Clone, Copy)]
pub struct HexDump<'a>(pub &'a [u8]);

impl fmt::Display for HexDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = hex::encode(self.0);
        for (i, pair) in digits.as_bytes().chunks(2).enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            // hex::encode only emits ASCII digits.
            f.write_str(std::str::from_utf8(pair).map_err(|_| fmt::Error)?)?;
        }
        Ok(())
    }
}

/// Parse hex text back into bytes.
///
/// Whitespace between digits is ignored and an optional `0x` prefix per
/// token is accepted, so the output of [`HexDump`] round-trips.
pub fn parse_hex(input: &str) -> Option<Vec<u8>> {
    let digits: String = input
        .split_whitespace()
        .map(|token| {
            token
                .strip_prefix("0x")
                .or_else(|| token.strip_prefix("0X"))
                .unwrap_or(token)
        })
        .collect();
    hex::decode(digits).ok()
}
