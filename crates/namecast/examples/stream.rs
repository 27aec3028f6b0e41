//! Send a message through a pipe-like buffer and read it back packet by packet.
//!
//! Run with:
//!   cargo run --example stream

use std::io::Cursor;

use namecast::frame::{MessageWriter, PacketReader, StreamError};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = MessageWriter::new(Vec::new());
    writer.send(b"Sensor-7", b"temperature=21.5C humidity=40% pressure=1013hPa")?;

    let mut reader = PacketReader::new(Cursor::new(writer.into_inner()));
    loop {
        match reader.read_packet() {
            Ok(packet) => {
                let header = packet.header();
                eprintln!(
                    "packet name_len={} msg_len={} crc4={:#x} chunk={:?}",
                    header.name_len(),
                    header.msg_len(),
                    header.crc4(),
                    String::from_utf8_lossy(&packet.message())
                );
            }
            Err(StreamError::ConnectionClosed) => break,
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}
