use namecast_frame::{decode_with_config, CodecConfig};

use crate::cmd::DecodeArgs;
use crate::exit::{decode_error, CliResult, SUCCESS};
use crate::output::{print_decoded, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let buf = args.input.read()?;
    let config = CodecConfig {
        max_text_len: args.max_text_len,
    };

    let message =
        decode_with_config(&buf, &config).map_err(|err| decode_error("decode failed", err))?;

    tracing::info!(
        size = buf.len(),
        text_len = message.text.len(),
        "decoded message"
    );
    print_decoded(&message, format);
    Ok(SUCCESS)
}
