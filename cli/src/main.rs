//! btsctl - lifecycle control for BizTalk Server artifacts

use std::process::ExitCode;

use btsctl::cli::{Cli, failure};
use btsctl::output::json::format_error;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let json = cli.json;
    match cli.run() {
        Ok(code) => code,
        Err(e) => {
            let (code, status) = failure(&e);
            if json {
                match format_error(&format!("{e:#}"), code) {
                    Ok(body) => println!("{body}"),
                    Err(_) => eprintln!("Error: {e:#}"),
                }
            } else {
                eprintln!("Error: {e:#}");
            }
            ExitCode::from(status)
        }
    }
}

/// Logs go to stderr so stdout stays parseable; `-v` wins over `RUST_LOG`.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
