//! JSON-lines front end for the simulator.
//!
//! Reads one request per line from stdin and writes one
//! `{"status": code, "body": ...}` object per line to stdout.

use std::io::{self, BufRead, Write};

use clap::Parser;
use rocket_cli::SourceArgs;
use rocket_cli::logger::{self, LogLevel};

#[derive(Parser)]
#[command(author, version, about = "Serve simulator requests as JSON lines on stdin/stdout")]
struct Cli {
    #[command(flatten)]
    sources: SourceArgs,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init(cli.log_level)?;

    let simulator = cli.sources.simulator()?;
    log::info!("serving requests on stdin");

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    let mut served = 0usize;
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = simulator.respond(&line);
        serde_json::to_writer(&mut stdout, &response)?;
        writeln!(stdout)?;
        stdout.flush()?;
        served += 1;
    }

    log::info!("stdin closed after {served} requests");
    Ok(())
}
