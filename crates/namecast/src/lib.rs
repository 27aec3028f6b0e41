//! Sender-tagged text messages over CRC4-checked, bit-packed packets.
//!
//! namecast splits a sender name plus an arbitrarily long text into packets of
//! at most 48 bytes, each protected by its own 4-bit checksum, and joins them
//! back together with sender-consistency checks.
//!
//! # Crate Structure
//!
//! - [`frame`] — Header layout, CRC4, packet codec, framer and stream adapters
//!
//! The two entry points are re-exported at the crate root:
//!
//! ```
//! let wire = namecast::encode(b"Name", b"Lorem ipsum").unwrap();
//! assert_eq!(&wire[..2], &[0xa5, 0xd5]);
//!
//! let message = namecast::decode(&wire).unwrap();
//! assert_eq!(message.name.as_ref(), b"Name");
//! assert_eq!(message.text.as_ref(), b"Lorem ipsum");
//! ```

/// Re-export frame types.
pub mod frame {
    pub use namecast_frame::*;
}

pub use namecast_frame::{decode, encode, DecodeError, EncodeError, Message};
