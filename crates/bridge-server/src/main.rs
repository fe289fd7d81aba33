//! CLI entry point for the RTL bridge server.

use std::env;
use std::ffi::OsString;
use std::net::IpAddr;
use std::path::PathBuf;

use bridge_core::ModelKind;
use bridge_server::{init_logging, AcceptPolicy, BridgeServer, ServerConfig};
use env_logger as _;
use log as _;
#[cfg(test)]
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
#[cfg(test)]
use tempfile as _;
use thiserror as _;

const USAGE_TEXT: &str = "\
Usage: rtl-bridge [options]

Options:
  --bind <ip>        Interface to listen on (default: 0.0.0.0)
  -p, --port <port>  TCP port to listen on (default: 8000)
  --model <name>     Model to simulate: soc, union-find (default: soc)
  --image <file>     Raw little-endian u32 image loaded into backing memory
  --min-words <n>    Minimum backing memory size in words (default: 1024)
  --persist          Keep accepting sessions instead of exiting after one
  -h, --help         Show this help message

Environment:
  RUST_LOG           Log filter (default: info)

Examples:
  rtl-bridge
  rtl-bridge --model union-find --image parents.bin --persist
";

#[derive(Debug)]
enum ParseResult {
    Run(ServerConfig),
    Help,
}

#[allow(clippy::while_let_on_iterator)]
fn parse_args(mut args: impl Iterator<Item = OsString>) -> Result<ParseResult, String> {
    let mut config = ServerConfig::default();

    while let Some(arg) = args.next() {
        if arg == "--help" || arg == "-h" {
            return Ok(ParseResult::Help);
        }

        if arg == "--persist" {
            config.accept = AcceptPolicy::Persistent;
            continue;
        }

        if arg == "--bind" {
            let value = option_value(&mut args, "--bind")?;
            config.bind = value
                .parse::<IpAddr>()
                .map_err(|_| format!("invalid bind address: {value}"))?;
            continue;
        }

        if arg == "--port" || arg == "-p" {
            let value = option_value(&mut args, "--port")?;
            config.port = value
                .parse()
                .map_err(|_| format!("invalid port: {value}"))?;
            continue;
        }

        if arg == "--model" {
            let value = option_value(&mut args, "--model")?;
            config.model =
                ModelKind::from_name(&value).ok_or_else(|| format!("unknown model: {value}"))?;
            continue;
        }

        if arg == "--image" {
            let value = args
                .next()
                .ok_or_else(|| "missing value for --image".to_string())?;
            config.image = Some(PathBuf::from(value));
            continue;
        }

        if arg == "--min-words" {
            let value = option_value(&mut args, "--min-words")?;
            config.min_memory_words = value
                .parse()
                .map_err(|_| format!("invalid word count: {value}"))?;
            continue;
        }

        return Err(format!("unknown option: {}", arg.to_string_lossy()));
    }

    Ok(ParseResult::Run(config))
}

fn option_value(
    args: &mut impl Iterator<Item = OsString>,
    option: &str,
) -> Result<String, String> {
    args.next()
        .map(|value| value.to_string_lossy().into_owned())
        .ok_or_else(|| format!("missing value for {option}"))
}

fn run(config: ServerConfig) -> Result<(), i32> {
    let server = BridgeServer::bind(config).map_err(|error| {
        eprintln!("error: {error}");
        1
    })?;

    server.run().map(drop).map_err(|error| {
        eprintln!("error: {error}");
        1
    })
}

fn main() {
    init_logging();

    let exit_code = match parse_args(env::args_os().skip(1)) {
        Ok(ParseResult::Help) => {
            println!("{USAGE_TEXT}");
            0
        }
        Ok(ParseResult::Run(config)) => match run(config) {
            Ok(()) => 0,
            Err(code) => code,
        },
        Err(error) => {
            eprintln!("error: {error}");
            eprintln!("{USAGE_TEXT}");
            1
        }
    };

    std::process::exit(exit_code);
}
