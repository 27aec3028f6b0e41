use clap::{Args, Subcommand};
use std::io::Read;
use std::path::PathBuf;

use namecast_frame::{parse_hex, DEFAULT_MAX_TEXT_LEN};

use crate::exit::{io_error, CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod decode;
pub mod demo;
pub mod encode;
pub mod inspect;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode a sender name and text into packets.
    Encode(EncodeArgs),
    /// Decode a packet buffer back into name and text.
    Decode(DecodeArgs),
    /// Walk a packet buffer and print every header.
    Inspect(InspectArgs),
    /// Encode and decode a built-in sample message.
    Demo(DemoArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Inspect(args) => inspect::run(args, format),
        Command::Demo(args) => demo::run(args),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Sender name (1 to 15 bytes).
    #[arg(long, short = 'n')]
    pub name: String,
    /// Text to send.
    #[arg(long, short = 't', conflicts_with = "file")]
    pub text: Option<String>,
    /// Read text from file.
    #[arg(long, conflicts_with = "text")]
    pub file: Option<PathBuf>,
    /// Reject text larger than this many bytes.
    #[arg(long, env = "NAMECAST_MAX_TEXT_LEN", default_value_t = DEFAULT_MAX_TEXT_LEN)]
    pub max_text_len: usize,
}

/// Where a packet buffer comes from. Falls back to stdin.
#[derive(Args, Debug)]
pub struct BufferInput {
    /// Buffer as hex digits (whitespace allowed).
    #[arg(long, conflicts_with = "file")]
    pub hex: Option<String>,
    /// Read buffer from file.
    #[arg(long, conflicts_with = "hex")]
    pub file: Option<PathBuf>,
    /// Treat file or stdin contents as hex text instead of raw bytes.
    #[arg(long, conflicts_with = "hex")]
    pub from_hex: bool,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    #[command(flatten)]
    pub input: BufferInput,
    /// Reject messages whose reassembled text exceeds this many bytes.
    #[arg(long, env = "NAMECAST_MAX_TEXT_LEN", default_value_t = DEFAULT_MAX_TEXT_LEN)]
    pub max_text_len: usize,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    #[command(flatten)]
    pub input: BufferInput,
}

#[derive(Args, Debug, Default)]
pub struct DemoArgs {}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

impl BufferInput {
    /// Resolve the buffer bytes from hex, file, or stdin.
    pub fn read(&self) -> CliResult<Vec<u8>> {
        if let Some(hex) = &self.hex {
            return hex_bytes(hex);
        }

        let raw = match &self.file {
            Some(path) => std::fs::read(path).map_err(|err| {
                io_error(&format!("failed reading {}", path.display()), err)
            })?,
            None => {
                let mut raw = Vec::new();
                std::io::stdin()
                    .read_to_end(&mut raw)
                    .map_err(|err| io_error("failed reading stdin", err))?;
                raw
            }
        };

        if self.from_hex {
            let text = String::from_utf8(raw)
                .map_err(|_| CliError::new(USAGE, "hex input is not valid UTF-8"))?;
            return hex_bytes(&text);
        }
        Ok(raw)
    }
}

fn hex_bytes(text: &str) -> CliResult<Vec<u8>> {
    parse_hex(text).ok_or_else(|| CliError::new(USAGE, "input is not valid hex"))
}
