use std::io::{ErrorKind, Write};

use bytes::BytesMut;
use tracing::trace;

use crate::config::CodecConfig;
use crate::error::{EncodeError, Result, StreamError};
use crate::framer::{encode_into, Message};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Writes encoded messages to any `Write` stream.
pub struct MessageWriter<T> {
    inner: T,
    buf: BytesMut,
    config: CodecConfig,
}

impl<T: Write> MessageWriter<T> {
    /// Create a new message writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, CodecConfig::default())
    }

    /// Create a new message writer with explicit configuration.
    pub fn with_config(inner: T, config: CodecConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Write a complete message (blocking).
    pub fn write_message(&mut self, message: &Message) -> Result<()> {
        self.send(&message.name, &message.text)
    }

    /// Encode `text` from `name` and write every packet.
    pub fn send(&mut self, name: &[u8], text: &[u8]) -> Result<()> {
        if text.len() > self.config.max_text_len {
            return Err(EncodeError::TextTooLarge {
                size: text.len(),
                max: self.config.max_text_len,
            }
            .into());
        }

        self.buf.clear();
        encode_into(name, text, &mut self.buf)?;

        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(StreamError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(StreamError::Io(err)),
            }
        }
        trace!(bytes = offset, "wrote message");

        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(StreamError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Update maximum text size for subsequent messages.
    pub fn set_max_text_len(&mut self, max_text_len: usize) {
        self.config.max_text_len = max_text_len;
    }

    /// Current message writer configuration.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::error::{DecodeError, EmptyField};
    use crate::framer::decode;
    use crate::reader::PacketReader;

    #[test]
    fn write_single_message() {
        let mut writer = MessageWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.send(b"Name", b"Lorem ipsum").unwrap();

        let wire = writer.into_inner().into_inner();
        let mut expected = vec![0xa5, 0xd5];
        expected.extend_from_slice(b"NameLorem ipsum");
        assert_eq!(wire, expected);
    }

    #[test]
    fn write_message_round_trips() {
        let message = Message::new(&b"Vafo"[..], "x".repeat(120));
        let mut writer = MessageWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.write_message(&message).unwrap();

        let wire = writer.into_inner().into_inner();
        assert_eq!(decode(&wire).unwrap(), message);
    }

    #[test]
    fn text_too_large_rejected() {
        let cfg = CodecConfig { max_text_len: 4 };
        let mut writer = MessageWriter::with_config(Cursor::new(Vec::<u8>::new()), cfg);

        let err = writer.send(b"Name", b"oversized").unwrap_err();
        assert!(matches!(
            err,
            StreamError::Encode(EncodeError::TextTooLarge { size: 9, max: 4 })
        ));
        assert!(writer.get_ref().get_ref().is_empty());
    }

    #[test]
    fn invalid_input_writes_nothing() {
        let mut writer = MessageWriter::new(Cursor::new(Vec::<u8>::new()));
        let err = writer.send(b"", b"text").unwrap_err();
        assert!(matches!(
            err,
            StreamError::Encode(EncodeError::EmptyInput(EmptyField::Name))
        ));
        assert!(writer.get_ref().get_ref().is_empty());
    }

    #[test]
    fn writer_feeds_reader() {
        let mut writer = MessageWriter::new(Vec::<u8>::new());
        writer.send(b"Ann", b"hello over the wire").unwrap();
        writer.send(b"Bob", b"another sender").unwrap();

        let mut reader = PacketReader::new(Cursor::new(writer.into_inner()));
        let first = reader.read_packet().unwrap();
        let second = reader.read_packet().unwrap();
        assert_eq!(first.name().as_ref(), b"Ann");
        assert_eq!(second.name().as_ref(), b"Bob");

        let mut wire = Vec::new();
        wire.extend_from_slice(first.as_bytes());
        wire.extend_from_slice(second.as_bytes());
        assert!(matches!(
            decode(&wire),
            Err(DecodeError::InconsistentSender { .. })
        ));
    }

    #[test]
    fn flush_propagates() {
        let sink = FlushTrackingWriter::default();
        let flag = Arc::clone(&sink.flushed);
        let mut writer = MessageWriter::new(sink);

        writer.send(b"Name", b"flush").unwrap();
        assert!(flag.load(Ordering::SeqCst));
    }

    #[test]
    fn zero_write_is_connection_closed() {
        let mut writer = MessageWriter::new(ZeroWriter);
        let err = writer.send(b"Name", b"text").unwrap_err();
        assert!(matches!(err, StreamError::ConnectionClosed));
    }

    #[test]
    fn interrupted_write_retries() {
        let mut writer = MessageWriter::new(InterruptedOnce {
            interrupted: false,
            out: Vec::new(),
        });
        writer.send(b"Name", b"Lorem ipsum").unwrap();
        assert_eq!(writer.get_ref().out.len(), 17);
    }

    #[derive(Default)]
    struct FlushTrackingWriter {
        flushed: Arc<AtomicBool>,
    }

    impl Write for FlushTrackingWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.flushed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    struct ZeroWriter;

    impl Write for ZeroWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Ok(0)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct InterruptedOnce {
        interrupted: bool,
        out: Vec<u8>,
    }

    impl Write for InterruptedOnce {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            self.out.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
}
