//! Single packet encode and validate.
//!
//! Wire format:
//! ```text
//! ┌──────────────┬──────────────────┬───────────────────┐
//! │ Header (2B)  │ Name             │ Message chunk     │
//! │ see header   │ (name_len bytes) │ (msg_len bytes)   │
//! └──────────────┴──────────────────┴───────────────────┘
//! ```
//!
//! One CRC4 covers the whole packet: header with the checksum field zeroed,
//! then name, then chunk.

use bytes::{BufMut, Bytes, BytesMut};

use crate::constants::{HEADER_SIZE, MSG_LEN_MAX, NAME_LEN_MAX};
use crate::crc4::crc4_range;
use crate::error::{DecodeError, EmptyField, EncodeError};
use crate::header::Header;

/// Append one packet carrying `name` and the head of `text` to `dst`.
///
/// At most [`MSG_LEN_MAX`] bytes of `text` go into the packet. Returns how
/// many bytes of `text` were consumed so the caller can advance past them.
pub fn encode_packet(name: &[u8], text: &[u8], dst: &mut BytesMut) -> Result<usize, EncodeError> {
    if name.is_empty() {
        return Err(EncodeError::EmptyInput(EmptyField::Name));
    }
    if name.len() > NAME_LEN_MAX {
        return Err(EncodeError::NameTooLong {
            len: name.len(),
            max: NAME_LEN_MAX,
        });
    }
    if text.is_empty() {
        return Err(EncodeError::EmptyInput(EmptyField::Text));
    }

    let chunk = &text[..text.len().min(MSG_LEN_MAX)];
    let mut header = Header::new(name.len(), chunk.len())?;
    let crc = crc4_range(crc4_range(header.checksum(), name), chunk);
    header.set_crc4(crc);

    dst.reserve(HEADER_SIZE + name.len() + chunk.len());
    dst.put_slice(header.as_bytes());
    dst.put_slice(name);
    dst.put_slice(chunk);
    Ok(chunk.len())
}

/// A validated packet borrowed from a larger buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketView<'a> {
    header: Header,
    bytes: &'a [u8],
}

impl<'a> PacketView<'a> {
    /// Validate the packet at the start of `buf`.
    ///
    /// `buf` may extend past the packet; only the bytes the header declares
    /// are examined and kept.
    pub fn parse(buf: &'a [u8]) -> Result<Self, DecodeError> {
        let header = Header::parse(buf)?;
        header.validate()?;

        let needed = header.packet_len();
        if buf.len() < needed {
            return Err(DecodeError::TruncatedPacket {
                needed,
                available: buf.len(),
            });
        }

        let bytes = &buf[..needed];
        let computed = crc4_range(header.checksum(), &bytes[HEADER_SIZE..]);
        let stored = header.crc4();
        if computed != stored {
            return Err(DecodeError::ChecksumMismatch { stored, computed });
        }

        Ok(Self { header, bytes })
    }

    pub fn header(&self) -> Header {
        self.header
    }

    pub fn name(&self) -> &'a [u8] {
        let end = HEADER_SIZE + usize::from(self.header.name_len());
        &self.bytes[HEADER_SIZE..end]
    }

    pub fn message(&self) -> &'a [u8] {
        let start = HEADER_SIZE + usize::from(self.header.name_len());
        &self.bytes[start..]
    }

    /// Total packet size, i.e. how far to advance past this packet.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Copy the packet out of the borrowed buffer.
    pub fn to_owned_packet(&self) -> Packet {
        Packet {
            header: self.header,
            bytes: Bytes::copy_from_slice(self.bytes),
        }
    }
}

/// A validated packet that owns its bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    header: Header,
    bytes: Bytes,
}

impl Packet {
    /// Validate and take the packet at the start of `buf`.
    ///
    /// On success the packet's bytes are split off the front of `buf`.
    pub fn split_from(buf: &mut BytesMut) -> Result<Self, DecodeError> {
        let len = PacketView::parse(buf)?.len();
        let bytes = buf.split_to(len).freeze();
        Ok(Self {
            header: Header::from_bytes([bytes[0], bytes[1]]),
            bytes,
        })
    }

    pub fn header(&self) -> Header {
        self.header
    }

    pub fn name(&self) -> Bytes {
        let end = HEADER_SIZE + usize::from(self.header.name_len());
        self.bytes.slice(HEADER_SIZE..end)
    }

    pub fn message(&self) -> Bytes {
        let start = HEADER_SIZE + usize::from(self.header.name_len());
        self.bytes.slice(start..)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &Bytes {
        &self.bytes
    }
}
