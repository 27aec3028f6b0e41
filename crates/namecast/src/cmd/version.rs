use namecast_frame::{HEADER_SIZE, MAX_PACKET_SIZE, MSG_LEN_MAX, NAME_LEN_MAX};

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("namecast {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: namecast");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "target: {}",
        option_env!("NAMECAST_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!("git_hash: {}", option_env!("GIT_HASH").unwrap_or("unknown"));
    println!(
        "wire: header={HEADER_SIZE}B name_max={NAME_LEN_MAX}B chunk_max={MSG_LEN_MAX}B packet_max={MAX_PACKET_SIZE}B"
    );

    Ok(SUCCESS)
}
