//! Encode a message, print the wire bytes, and decode it again.
//!
//! Run with:
//!   cargo run --example round-trip

use namecast::frame::{packet_count, HexDump};
use namecast::Message;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let message = Message::new(
        &b"Vafo"[..],
        "HELO EVERDAIANE!!1 dwam jdwn aknwkjan dknaw ndkjanw kj nwa",
    );

    let wire = message.encode()?;
    println!("{}", HexDump(&wire));
    println!(
        "{} bytes in {} packets",
        wire.len(),
        packet_count(message.text.len())
    );

    let parsed = namecast::decode(&wire)?;
    println!("Name : {}", String::from_utf8_lossy(&parsed.name));
    println!("Text : {}", String::from_utf8_lossy(&parsed.text));
    assert_eq!(parsed, message);

    Ok(())
}
