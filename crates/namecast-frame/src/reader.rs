use std::io::{ErrorKind, Read};

use bytes::BytesMut;
use tracing::{debug, trace};

use crate::config::CodecConfig;
use crate::constants::{HEADER_SIZE, MAX_PACKET_SIZE};
use crate::error::{DecodeError, Result, StreamError};
use crate::framer::{Assembler, Message};
use crate::header::Header;
use crate::packet::Packet;

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Reads validated packets from any `Read` stream.
///
/// Handles partial reads internally; callers always get complete packets.
pub struct PacketReader<T> {
    inner: T,
    buf: BytesMut,
    config: CodecConfig,
}

impl<T: Read> PacketReader<T> {
    /// Create a new packet reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, CodecConfig::default())
    }

    /// Create a new packet reader with explicit configuration.
    pub fn with_config(inner: T, config: CodecConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY.max(MAX_PACKET_SIZE)),
            config,
        }
    }

    /// Read the next complete packet (blocking).
    ///
    /// Returns `Err(StreamError::ConnectionClosed)` when EOF is reached on a
    /// packet boundary. EOF inside a packet surfaces as a truncation error.
    pub fn read_packet(&mut self) -> Result<Packet> {
        loop {
            if self.buf.len() >= HEADER_SIZE {
                let header = Header::parse(&self.buf)?;
                header.validate()?;
                if self.buf.len() >= header.packet_len() {
                    let packet = Packet::split_from(&mut self.buf)?;
                    trace!(len = packet.len(), "read packet");
                    return Ok(packet);
                }
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(StreamError::Io(err)),
            };

            if read == 0 {
                return Err(self.eof_error());
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// Read packets until EOF and reassemble them into one message.
    ///
    /// Applies the same rules as [`crate::decode`]: every packet must carry
    /// the first packet's sender, and an empty stream is an error.
    pub fn read_message(&mut self) -> Result<Message> {
        let mut assembler = Assembler::new(self.config.max_text_len);
        loop {
            match self.read_packet() {
                Ok(packet) => assembler.push(&packet.name(), &packet.message())?,
                Err(StreamError::ConnectionClosed) => break,
                Err(err) => return Err(err),
            }
        }

        let packets = assembler.packets();
        let message = assembler.finish()?;
        debug!(packets, text_len = message.text.len(), "read message");
        Ok(message)
    }

    fn eof_error(&self) -> StreamError {
        let available = self.buf.len();
        if available == 0 {
            return StreamError::ConnectionClosed;
        }
        let err = match Header::parse(&self.buf) {
            Ok(header) => DecodeError::TruncatedPacket {
                needed: header.packet_len(),
                available,
            },
            Err(err) => err,
        };
        StreamError::Decode(err)
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Update maximum text size for subsequent message reassembly.
    pub fn set_max_text_len(&mut self, max_text_len: usize) {
        self.config.max_text_len = max_text_len;
    }

    /// Current packet reader configuration.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }
}
