use namecast_frame::{decode, encode, HexDump};

use crate::cmd::DemoArgs;
use crate::exit::{decode_error, encode_error, CliResult, FAILURE, SUCCESS};

const DEMO_NAME: &str = "Vafo";
const DEMO_TEXT: &str = "HELO EVERDAIANE!!1 dwam jdwn aknwkjan dknaw ndkjanw kj nwa";

pub fn run(_args: DemoArgs) -> CliResult<i32> {
    let wire = encode(DEMO_NAME.as_bytes(), DEMO_TEXT.as_bytes())
        .map_err(|err| encode_error("encode failed", err))?;
    println!("{}", HexDump(&wire));
    println!();

    let parsed = decode(&wire).map_err(|err| decode_error("decode failed", err))?;
    println!("Name : {}", String::from_utf8_lossy(&parsed.name));
    println!("Text : {}", String::from_utf8_lossy(&parsed.text));

    if parsed.name.as_ref() == DEMO_NAME.as_bytes() && parsed.text.as_ref() == DEMO_TEXT.as_bytes()
    {
        println!("Parsed message matches the original");
        Ok(SUCCESS)
    } else {
        tracing::error!("round trip mismatch");
        Ok(FAILURE)
    }
}
