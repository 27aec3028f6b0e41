use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use namecast_frame::{packet_count, HexDump, Message, PacketView};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct EncodedOutput {
    name: String,
    text_len: usize,
    packets: usize,
    size: usize,
    hex: String,
}

#[derive(Serialize)]
struct DecodedOutput {
    name: String,
    text: String,
    text_len: usize,
}

#[derive(Serialize)]
pub struct PacketRow {
    pub offset: usize,
    pub flag: u8,
    pub name_len: u8,
    pub msg_len: u8,
    pub crc4: u8,
    pub name: String,
    pub chunk: String,
}

impl PacketRow {
    pub fn from_view(offset: usize, view: &PacketView<'_>) -> Self {
        let header = view.header();
        Self {
            offset,
            flag: header.flag(),
            name_len: header.name_len(),
            msg_len: header.msg_len(),
            crc4: header.crc4(),
            name: text_preview(view.name()),
            chunk: text_preview(view.message()),
        }
    }
}

#[derive(Serialize)]
struct InspectOutput<'a> {
    packets: &'a [PacketRow],
    error: Option<&'a str>,
}

pub fn print_encoded(name: &[u8], text_len: usize, wire: &[u8], format: OutputFormat) {
    let hex = HexDump(wire).to_string();
    match format {
        OutputFormat::Json => {
            let out = EncodedOutput {
                name: text_preview(name),
                text_len,
                packets: packet_count(text_len),
                size: wire.len(),
                hex,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["NAME", "TEXT", "PACKETS", "SIZE", "HEX"])
                .add_row(vec![
                    text_preview(name),
                    text_len.to_string(),
                    packet_count(text_len).to_string(),
                    wire.len().to_string(),
                    hex,
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => println!("{hex}"),
        OutputFormat::Raw => print_raw(wire),
    }
}

pub fn print_decoded(message: &Message, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = DecodedOutput {
                name: text_preview(&message.name),
                text: text_preview(&message.text),
                text_len: message.text.len(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["NAME", "SIZE", "TEXT"])
                .add_row(vec![
                    text_preview(&message.name),
                    message.text.len().to_string(),
                    text_preview(&message.text),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("Name : {}", text_preview(&message.name));
            println!("Text : {}", text_preview(&message.text));
        }
        OutputFormat::Raw => print_raw(message.text.as_ref()),
    }
}

pub fn print_packets(rows: &[PacketRow], error: Option<&str>, format: OutputFormat) {
    match format {
        OutputFormat::Json | OutputFormat::Raw => {
            let out = InspectOutput {
                packets: rows,
                error,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec![
                    "OFFSET", "FLAG", "NAME_LEN", "MSG_LEN", "CRC4", "NAME", "CHUNK",
                ]);
            for row in rows {
                table.add_row(vec![
                    row.offset.to_string(),
                    format!("{:#05b}", row.flag),
                    row.name_len.to_string(),
                    row.msg_len.to_string(),
                    format!("{:#x}", row.crc4),
                    row.name.clone(),
                    row.chunk.clone(),
                ]);
            }
            println!("{table}");
            if let Some(error) = error {
                println!("error: {error}");
            }
        }
        OutputFormat::Pretty => {
            for row in rows {
                println!(
                    "offset={} flag={:#05b} name_len={} msg_len={} crc4={:#x} name={} chunk={}",
                    row.offset,
                    row.flag,
                    row.name_len,
                    row.msg_len,
                    row.crc4,
                    row.name,
                    row.chunk
                );
            }
            if let Some(error) = error {
                println!("error: {error}");
            }
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn text_preview(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => format!("<binary {} bytes>", bytes.len()),
    }
}
