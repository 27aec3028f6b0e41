//! Error types for encoding, decoding and streaming.

use std::fmt;

/// Which encode input was empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyField {
    Name,
    Text,
}

impl fmt::Display for EmptyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyField::Name => write!(f, "name"),
            EmptyField::Text => write!(f, "text"),
        }
    }
}

/// Errors that can occur while building packets from a name and text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// The name or the text was empty.
    #[error("{0} is empty")]
    EmptyInput(EmptyField),

    /// The name does not fit in the header's name length field.
    #[error("name too long ({len} bytes, max {max})")]
    NameTooLong { len: usize, max: usize },

    /// A header length field was zero or wider than its bit field.
    #[error("invalid header lengths (name_len {name_len}, msg_len {msg_len})")]
    InvalidLength { name_len: usize, msg_len: usize },

    /// The text exceeds the configured maximum size.
    #[error("text too large ({size} bytes, max {max})")]
    TextTooLarge { size: usize, max: usize },
}

/// Errors that can occur while validating and reassembling packets.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The buffer handed to the decoder was empty.
    #[error("buffer is empty")]
    EmptyBuffer,

    /// Fewer than two bytes remained where a header was expected.
    #[error("truncated header ({available} of 2 bytes available)")]
    TruncatedHeader { available: usize },

    /// The header's flag field is not the protocol marker.
    #[error("invalid header flag {found:#05b} (expected 0b101)")]
    InvalidFlag { found: u8 },

    /// The header declares a zero-length name or message chunk.
    #[error("invalid header lengths (name_len {name_len}, msg_len {msg_len})")]
    InvalidLength { name_len: u8, msg_len: u8 },

    /// The header declares more bytes than remain in the buffer.
    #[error("truncated packet (needs {needed} bytes, {available} available)")]
    TruncatedPacket { needed: usize, available: usize },

    /// The recomputed CRC4 does not match the stored value.
    #[error("checksum mismatch (stored {stored:#x}, computed {computed:#x})")]
    ChecksumMismatch { stored: u8, computed: u8 },

    /// A later packet names a different sender than the first one.
    #[error("inconsistent sender across packets (expected {expected:?}, found {found:?})")]
    InconsistentSender { expected: String, found: String },

    /// Reassembled text exceeds the configured maximum size.
    #[error("message too large ({size} bytes, max {max})")]
    MessageTooLarge { size: usize, max: usize },
}

/// Errors from the stream adapters.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// Encoding the outgoing message failed.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// Decoding the incoming bytes failed.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// An I/O error occurred while reading or writing packets.
    #[error("packet I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended before the first byte of a packet.
    #[error("connection closed")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, StreamError>;
