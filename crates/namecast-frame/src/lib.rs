//! Bit-packed, CRC4-checked packet framing for sender-tagged text messages.
//!
//! A message is a sender name plus an arbitrarily long text body. On the wire
//! it becomes a run of packets, each carrying:
//! - A 2-byte header (flag, name length, chunk length, CRC4)
//! - The sender name (1..=15 bytes)
//! - A chunk of the text (1..=31 bytes)
//!
//! Every packet is checked on its own; a buffer is decoded all-or-nothing.

#[cfg(target_endian = "big")]
compile_error!("namecast-frame: big-endian targets are not supported");

pub mod config;
pub mod constants;
pub mod crc4;
pub mod dump;
pub mod error;
pub mod framer;
pub mod header;
pub mod packet;
pub mod reader;
pub mod writer;

pub use config::{CodecConfig, DEFAULT_MAX_TEXT_LEN};
pub use constants::{FLAG, HEADER_SIZE, MAX_PACKET_SIZE, MSG_LEN_MAX, NAME_LEN_MAX};
pub use crc4::{crc4, crc4_range};
pub use dump::{parse_hex, HexDump};
pub use error::{DecodeError, EncodeError, EmptyField, Result, StreamError};
pub use framer::{decode, decode_with_config, encode, encode_into, packet_count, Message};
pub use header::Header;
pub use packet::{encode_packet, Packet, PacketView};
pub use reader::PacketReader;
pub use writer::MessageWriter;
