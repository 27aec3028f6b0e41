use namecast_frame::{DecodeError, PacketView};

use crate::cmd::InspectArgs;
use crate::exit::{CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_packets, OutputFormat, PacketRow};

pub fn run(args: InspectArgs, format: OutputFormat) -> CliResult<i32> {
    let buf = args.input.read()?;
    let (rows, error) = walk(&buf);

    let error = error.map(|err| err.to_string());
    print_packets(&rows, error.as_deref(), format);

    match error {
        Some(err) => {
            tracing::warn!(packets = rows.len(), error = %err, "buffer rejected");
            Ok(DATA_INVALID)
        }
        None => Ok(SUCCESS),
    }
}

/// Validate packets in order until the buffer ends or one fails.
fn walk(buf: &[u8]) -> (Vec<PacketRow>, Option<DecodeError>) {
    if buf.is_empty() {
        return (Vec::new(), Some(DecodeError::EmptyBuffer));
    }

    let mut rows = Vec::new();
    let mut offset = 0usize;
    while offset < buf.len() {
        match PacketView::parse(&buf[offset..]) {
            Ok(view) => {
                rows.push(PacketRow::from_view(offset, &view));
                offset += view.len();
            }
            Err(err) => return (rows, Some(err)),
        }
    }
    (rows, None)
}
