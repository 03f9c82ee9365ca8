//! Command-line runner for agent worker processes.

use crate::worker::{Worker, WorkerOptions};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8089";

#[derive(Parser, Debug)]
#[command(name = "agent-worker", about = "Runs a voice agent worker process")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the worker and accept job dispatches.
    Start {
        /// Address to listen on. Defaults to BIND_ADDRESS, then 0.0.0.0:8089.
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
}

/// Parses the command line and runs the worker with the given options.
pub async fn run_app(options: WorkerOptions) -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Start { bind } => {
            let addr = match bind {
                Some(addr) => addr,
                None => resolve_bind_address()?,
            };
            Worker::new(options).serve(addr).await
        }
    }
}

fn resolve_bind_address() -> anyhow::Result<SocketAddr> {
    let raw =
        std::env::var("BIND_ADDRESS").unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string());
    raw.parse()
        .with_context(|| format!("BIND_ADDRESS '{raw}' is not a valid socket address"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bind_address_parses() {
        let addr: SocketAddr = DEFAULT_BIND_ADDRESS.parse().unwrap();
        assert_eq!(addr.port(), 8089);
    }

    #[test]
    fn cli_accepts_start_with_bind() {
        let cli = Cli::parse_from(["agent-worker", "start", "--bind", "127.0.0.1:9000"]);
        match cli.command {
            Command::Start { bind } => {
                assert_eq!(bind, Some("127.0.0.1:9000".parse().unwrap()));
            }
        }
    }
}
