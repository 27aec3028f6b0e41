use std::fs;

use namecast_frame::{CodecConfig, MessageWriter};

use crate::cmd::EncodeArgs;
use crate::exit::{io_error, stream_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_encoded, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let text = resolve_text(&args)?;
    let config = CodecConfig {
        max_text_len: args.max_text_len,
    };

    let mut writer = MessageWriter::with_config(Vec::new(), config);
    writer
        .send(args.name.as_bytes(), &text)
        .map_err(|err| stream_error("encode failed", err))?;
    let wire = writer.into_inner();

    tracing::info!(
        name = %args.name,
        text_len = text.len(),
        size = wire.len(),
        "encoded message"
    );
    print_encoded(args.name.as_bytes(), text.len(), &wire, format);
    Ok(SUCCESS)
}

fn resolve_text(args: &EncodeArgs) -> CliResult<Vec<u8>> {
    if let Some(text) = &args.text {
        return Ok(text.as_bytes().to_vec());
    }
    if let Some(path) = &args.file {
        return fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }
    Err(CliError::new(USAGE, "one of --text or --file is required"))
}
