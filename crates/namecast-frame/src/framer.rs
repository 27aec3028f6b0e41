//! Split a message into packets and join packets back into a message.

use bytes::{Bytes, BytesMut};
use tracing::{debug, trace};

use crate::config::CodecConfig;
use crate::constants::{HEADER_SIZE, MSG_LEN_MAX, NAME_LEN_MAX};
use crate::error::{DecodeError, EmptyField, EncodeError};
use crate::packet::{encode_packet, PacketView};

/// A sender name and the text it sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub name: Bytes,
    pub text: Bytes,
}

impl Message {
    /// Create a new message.
    pub fn new(name: impl Into<Bytes>, text: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Encode this message; see [`encode`].
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        encode(&self.name, &self.text)
    }

    /// Total wire size once encoded, assuming the inputs are valid.
    pub fn wire_size(&self) -> usize {
        let packets = packet_count(self.text.len());
        packets * (HEADER_SIZE + self.name.len()) + self.text.len()
    }

    pub fn into_parts(self) -> (Bytes, Bytes) {
        (self.name, self.text)
    }
}

/// Number of packets a text of `text_len` bytes is split into.
pub fn packet_count(text_len: usize) -> usize {
    text_len.div_ceil(MSG_LEN_MAX)
}

/// Encode `name` and `text` into a buffer of one or more packets.
pub fn encode(name: &[u8], text: &[u8]) -> Result<Vec<u8>, EncodeError> {
    let mut dst = BytesMut::new();
    encode_into(name, text, &mut dst)?;
    Ok(dst.to_vec())
}

/// Append the packets for `name` and `text` to `dst`.
///
/// Inputs are checked before anything is written, so `dst` is untouched
/// on error.
pub fn encode_into(name: &[u8], text: &[u8], dst: &mut BytesMut) -> Result<(), EncodeError> {
    check_inputs(name, text)?;

    let packets = packet_count(text.len());
    dst.reserve(packets * (HEADER_SIZE + name.len()) + text.len());

    let mut cursor = 0usize;
    while cursor < text.len() {
        cursor += encode_packet(name, &text[cursor..], dst)?;
    }

    debug!(
        name_len = name.len(),
        text_len = text.len(),
        packets,
        "encoded message"
    );
    Ok(())
}

pub(crate) fn check_inputs(name: &[u8], text: &[u8]) -> Result<(), EncodeError> {
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
    Ok(())
}

/// Decode a buffer of packets back into one message.
///
/// Every packet must validate and carry the same sender name; the first
/// failure aborts the whole decode. The reassembled text is not size
/// limited, so anything [`encode`] produced decodes.
pub fn decode(buf: &[u8]) -> Result<Message, DecodeError> {
    decode_with_config(buf, &CodecConfig::unbounded())
}

/// Like [`decode`], bounding the reassembled text by `config.max_text_len`.
pub fn decode_with_config(buf: &[u8], config: &CodecConfig) -> Result<Message, DecodeError> {
    if buf.is_empty() {
        return Err(DecodeError::EmptyBuffer);
    }

    let mut assembler = Assembler::new(config.max_text_len);
    let mut offset = 0usize;
    while offset < buf.len() {
        let packet = PacketView::parse(&buf[offset..]).inspect_err(|err| {
            debug!(offset, error = %err, "rejected packet");
        })?;
        trace!(offset, len = packet.len(), "packet validated");
        assembler.push(packet.name(), packet.message())?;
        offset += packet.len();
    }

    let packets = assembler.packets();
    let message = assembler.finish()?;
    debug!(
        packets,
        text_len = message.text.len(),
        "decoded message"
    );
    Ok(message)
}

/// Accumulates packet payloads while enforcing a stable sender.
#[derive(Debug)]
pub(crate) struct Assembler {
    name: Option<Bytes>,
    text: BytesMut,
    max_text_len: usize,
    packets: usize,
}

impl Assembler {
    pub(crate) fn new(max_text_len: usize) -> Self {
        Self {
            name: None,
            text: BytesMut::new(),
            max_text_len,
            packets: 0,
        }
    }

    pub(crate) fn push(&mut self, name: &[u8], message: &[u8]) -> Result<(), DecodeError> {
        match &self.name {
            None => self.name = Some(Bytes::copy_from_slice(name)),
            Some(seen) if seen.as_ref() != name => {
                return Err(DecodeError::InconsistentSender {
                    expected: String::from_utf8_lossy(seen).into_owned(),
                    found: String::from_utf8_lossy(name).into_owned(),
                });
            }
            Some(_) => {}
        }

        let size = self.text.len() + message.len();
        if size > self.max_text_len {
            return Err(DecodeError::MessageTooLarge {
                size,
                max: self.max_text_len,
            });
        }
        self.text.extend_from_slice(message);
        self.packets += 1;
        Ok(())
    }

    pub(crate) fn packets(&self) -> usize {
        self.packets
    }

    pub(crate) fn finish(self) -> Result<Message, DecodeError> {
        match self.name {
            Some(name) => Ok(Message {
                name,
                text: self.text.freeze(),
            }),
            None => Err(DecodeError::EmptyBuffer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MAX_TEXT_LEN;
    use crate::header::Header;
    use proptest::prelude::*;

    const ALPHABET_CHUNK: &str = "ABCDEFGHIJKLMNOPQRSTUVWXY ?/.'0";

    fn known_full_packet() -> Vec<u8> {
        let mut packet = vec![0xa5, 0x6f];
        packet.extend_from_slice(b"Name");
        packet.extend_from_slice(ALPHABET_CHUNK.as_bytes());
        packet
    }

    #[test]
    fn encode_single_packet() {
        let buf = encode(b"Name", b"Lorem ipsum").unwrap();
        let mut expected = vec![0xa5, 0xd5];
        expected.extend_from_slice(b"NameLorem ipsum");
        assert_eq!(buf, expected);
        assert_eq!(buf.len(), 17);
    }

    #[test]
    fn encode_repeats_full_packets() {
        let text = ALPHABET_CHUNK.repeat(5);
        let buf = encode(b"Name", text.as_bytes()).unwrap();

        let packet = known_full_packet();
        assert_eq!(buf.len(), 5 * packet.len());
        for chunk in buf.chunks(packet.len()) {
            assert_eq!(chunk, packet.as_slice());
        }
    }

    #[test]
    fn encode_is_deterministic() {
        let text = b"Lorem ipsum kekus maximus nothing more to say";
        assert_eq!(encode(b"Name", text), encode(b"Name", text));
    }

    #[test]
    fn encode_rejects_invalid_inputs() {
        assert_eq!(
            encode(b"", b"Lorem ipsum"),
            Err(EncodeError::EmptyInput(EmptyField::Name))
        );
        assert_eq!(
            encode(b"TooLongToBeAName", b"Lorem ipsum"),
            Err(EncodeError::NameTooLong { len: 16, max: 15 })
        );
        assert_eq!(
            encode(b"Name", b""),
            Err(EncodeError::EmptyInput(EmptyField::Text))
        );
    }

    #[test]
    fn encode_into_leaves_dst_untouched_on_error() {
        let mut dst = BytesMut::from(&b"prefix"[..]);
        assert!(encode_into(b"", b"text", &mut dst).is_err());
        assert_eq!(dst.as_ref(), b"prefix");
    }

    #[test]
    fn segmentation_sizes() {
        let text = vec![b'z'; 31 * 3 + 5];
        let buf = encode(b"Ann", &text).unwrap();

        let mut offset = 0;
        let mut sizes = Vec::new();
        while offset < buf.len() {
            let view = PacketView::parse(&buf[offset..]).unwrap();
            sizes.push(view.header().msg_len());
            offset += view.len();
        }
        assert_eq!(sizes, vec![31, 31, 31, 5]);
        assert_eq!(packet_count(text.len()), 4);
    }

    #[test]
    fn packet_count_boundaries() {
        assert_eq!(packet_count(0), 0);
        assert_eq!(packet_count(1), 1);
        assert_eq!(packet_count(31), 1);
        assert_eq!(packet_count(32), 2);
        assert_eq!(packet_count(62), 2);
        assert_eq!(packet_count(63), 3);
    }

    #[test]
    fn wire_size_matches_encoded_len() {
        let msg = Message::new(&b"Vafo"[..], "x".repeat(100));
        assert_eq!(msg.wire_size(), msg.encode().unwrap().len());
    }

    #[test]
    fn decode_single_packet() {
        let mut buf = vec![0xa5, 0xd5];
        buf.extend_from_slice(b"NameLorem ipsum");
        let msg = decode(&buf).unwrap();
        assert_eq!(msg.name.as_ref(), b"Name");
        assert_eq!(msg.text.as_ref(), b"Lorem ipsum");
    }

    #[test]
    fn decode_multiple_packets() {
        let buf = known_full_packet().repeat(5);
        let msg = decode(&buf).unwrap();
        assert_eq!(msg.name.as_ref(), b"Name");
        assert_eq!(msg.text.as_ref(), ALPHABET_CHUNK.repeat(5).as_bytes());
    }

    #[test]
    fn decode_empty_buffer() {
        assert_eq!(decode(&[]), Err(DecodeError::EmptyBuffer));
    }

    #[test]
    fn decode_trimmed_buffer() {
        let mut buf = encode(b"Name", b"Lorem ipsum").unwrap();
        buf.pop();
        assert!(matches!(
            decode(&buf),
            Err(DecodeError::TruncatedPacket { .. })
        ));
    }

    #[test]
    fn decode_dangling_header_byte() {
        let mut buf = encode(b"Name", b"Lorem ipsum").unwrap();
        buf.push(0xa5);
        assert!(matches!(
            decode(&buf),
            Err(DecodeError::TruncatedHeader { available: 1 })
        ));
    }

    #[test]
    fn decode_rejects_changed_sender() {
        let first = known_full_packet();
        let other = encode(b"Vafo", b"HELO EVERDAIANE!!1").unwrap();

        let mut buf = first.clone();
        buf.extend_from_slice(&other);
        assert!(matches!(
            decode(&buf),
            Err(DecodeError::InconsistentSender { .. })
        ));

        let mut buf = other.clone();
        buf.extend_from_slice(&first);
        buf.extend_from_slice(&other);
        assert_eq!(
            decode(&buf),
            Err(DecodeError::InconsistentSender {
                expected: "Vafo".into(),
                found: "Name".into(),
            })
        );
    }

    #[test]
    fn decode_rejects_corrupt_header_fields() {
        let original = encode(b"NAMEN", b"Random.io").unwrap();
        let base = Header::parse(&original).unwrap();

        let mutations: [fn(&mut Header, &Header); 7] = [
            |h, _| h.set_flag(0),
            |h, _| h.set_name_len(0),
            |h, b| h.set_name_len(b.name_len() + 1),
            |h, b| h.set_name_len(b.name_len() - 1),
            |h, _| h.set_msg_len(0),
            |h, b| h.set_msg_len(b.msg_len() + 1),
            |h, b| h.set_msg_len(b.msg_len() - 1),
        ];

        for mutate in mutations {
            let mut header = base;
            mutate(&mut header, &base);
            let mut buf = original.clone();
            buf[..2].copy_from_slice(header.as_bytes());
            assert!(decode(&buf).is_err(), "mutation accepted: {header:?}");
        }
    }

    #[test]
    fn decode_with_limit() {
        let buf = encode(b"Name", &[b'a'; 100]).unwrap();
        let config = CodecConfig { max_text_len: 64 };
        assert!(matches!(
            decode_with_config(&buf, &config),
            Err(DecodeError::MessageTooLarge { max: 64, .. })
        ));

        let config = CodecConfig { max_text_len: 100 };
        assert_eq!(decode_with_config(&buf, &config).unwrap().text.len(), 100);
    }

    #[test]
    fn decode_has_no_size_limit() {
        let text = vec![b'a'; DEFAULT_MAX_TEXT_LEN + 1];
        let buf = encode(b"Name", &text).unwrap();
        let msg = decode(&buf).unwrap();
        assert_eq!(msg.text.len(), text.len());

        assert!(matches!(
            decode_with_config(&buf, &CodecConfig::default()),
            Err(DecodeError::MessageTooLarge { .. })
        ));
    }

    #[test]
    fn decode_rejects_any_header_bit_flip() {
        let one_packet = encode(b"Name", b"Lorem ipsum").unwrap();
        let two_packets =
            encode(b"Name", b"Lorem ipsum kekus maximus nothing more to say").unwrap();

        for original in [one_packet, two_packets] {
            let mut header_offsets = Vec::new();
            let mut offset = 0;
            while offset < original.len() {
                header_offsets.push(offset);
                offset += PacketView::parse(&original[offset..]).unwrap().len();
            }

            for start in header_offsets {
                for bit in 0..8 * HEADER_SIZE {
                    let mut buf = original.clone();
                    buf[start + bit / 8] ^= 1 << (bit % 8);
                    assert!(
                        decode(&buf).is_err(),
                        "flip of header bit {bit} at offset {start} accepted"
                    );
                }
            }
        }
    }

    #[test]
    fn two_packet_round_trip() {
        let msg = Message::new(&b"Name"[..], "Lorem ipsum kekus maximus nothing more to say");
        let buf = msg.encode().unwrap();
        assert_eq!(decode(&buf).unwrap(), msg);
    }

    proptest! {
        #[test]
        fn round_trip(
            name in proptest::collection::vec(any::<u8>(), 1..=15),
            text in proptest::collection::vec(any::<u8>(), 1..400),
        ) {
            let buf = encode(&name, &text).unwrap();
            let msg = decode(&buf).unwrap();
            prop_assert_eq!(msg.name.as_ref(), name.as_slice());
            prop_assert_eq!(msg.text.as_ref(), text.as_slice());
        }

        #[test]
        fn payload_bit_flip_is_detected(
            name in proptest::collection::vec(any::<u8>(), 1..=15),
            text in proptest::collection::vec(any::<u8>(), 1..200),
            pick in any::<usize>(),
            bit in 0u8..8,
        ) {
            let mut buf = encode(&name, &text).unwrap();

            // Collect byte offsets that hold name or chunk bytes.
            let mut payload = Vec::new();
            let mut offset = 0;
            while offset < buf.len() {
                let len = PacketView::parse(&buf[offset..]).unwrap().len();
                payload.extend(offset + HEADER_SIZE..offset + len);
                offset += len;
            }
            let target = payload[pick % payload.len()];
            buf[target] ^= 1 << bit;

            let is_checksum_mismatch =
                matches!(decode(&buf), Err(DecodeError::ChecksumMismatch { .. }));
            prop_assert!(is_checksum_mismatch);
        }

        #[test]
        fn checksum_bit_flip_is_detected(text in "[a-z]{1,31}", bit in 4u8..8) {
            let mut buf = encode(b"Name", text.as_bytes()).unwrap();
            buf[1] ^= 1 << bit;
            let is_checksum_mismatch =
                matches!(decode(&buf), Err(DecodeError::ChecksumMismatch { .. }));
            prop_assert!(is_checksum_mismatch);
        }
    }
}
