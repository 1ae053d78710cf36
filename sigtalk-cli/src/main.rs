//! CLI for sigtalk signal messaging.

#![allow(
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::missing_docs_in_private_items
)]

#[cfg(unix)]
mod send;
#[cfg(unix)]
mod serve;

use std::ffi::OsString;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "SIGTALK_LOG";

#[derive(Parser)]
#[command(
    name = "sigtalk",
    version,
    about = "Point-to-point messaging over SIGUSR1/SIGUSR2"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Receive messages forever, printing this process's PID first.
    #[command(visible_alias = "server")]
    Serve,

    /// Send one message to a receiving process.
    #[command(visible_alias = "client")]
    Send(Box<SendArgs>),

    /// Generate shell completion scripts.
    #[command(hide = true)]
    Completion {
        /// Target shell.
        shell: Shell,
    },
}

/// Arguments for `sigtalk send`.
#[derive(clap::Args)]
pub(crate) struct SendArgs {
    /// PID of the receiver (as printed by `sigtalk serve`).
    #[arg(allow_hyphen_values = true)]
    pub pid: String,

    /// Message bytes, sent exactly as given.
    pub message: OsString,

    /// Print every bit before it is sent.
    #[arg(short, long)]
    pub verbose: bool,

    /// Give up if a reply takes longer than this (default: wait forever).
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,
}

fn main() {
    // Usage errors exit 1 like every other setup failure; help and
    // version go to stdout and exit 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(i32::from(e.use_stderr()));
        }
    };

    init_tracing();

    if let Err(e) = cli.dispatch() {
        eprintln!("{} {e:#}", "sigtalk:".red().bold());
        std::process::exit(1);
    }
}

/// Logs go to stderr so message output on stdout stays clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

impl Cli {
    fn dispatch(self) -> Result<()> {
        match self.command {
            Command::Serve => serve(),
            Command::Send(args) => send(&args),
            Command::Completion { shell } => {
                clap_complete::generate(
                    shell,
                    &mut Self::command(),
                    "sigtalk",
                    &mut std::io::stdout(),
                );
                Ok(())
            }
        }
    }
}

#[cfg(unix)]
fn serve() -> Result<()> {
    serve::run()
}

#[cfg(unix)]
fn send(args: &SendArgs) -> Result<()> {
    send::run(args)
}

#[cfg(not(unix))]
fn serve() -> Result<()> {
    anyhow::bail!("sigtalk requires a Unix platform")
}

#[cfg(not(unix))]
fn send(_args: &SendArgs) -> Result<()> {
    anyhow::bail!("sigtalk requires a Unix platform")
}
