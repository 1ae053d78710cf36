//! `sigtalk serve`: the long-lived receiver.

use anyhow::{Context, Result};
use sigtalk::{Console, Listener, Pid, Receiver, SignalLink};

pub fn run() -> Result<()> {
    // Handlers first: a sender may fire as soon as it sees the PID.
    let mut listener = Listener::install()?;

    let mut console = Console::new(std::io::stdout());
    let pid = Pid::current();
    console.banner(pid).context("failed to write banner")?;
    tracing::info!(%pid, "receiver ready");

    Receiver::new(SignalLink, console).serve(&mut listener);
    Ok(())
}
