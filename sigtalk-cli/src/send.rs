//! `sigtalk send`: deliver one message and wait for confirmation.

use std::os::unix::ffi::OsStrExt;
use std::time::Duration;

use anyhow::Result;
use colored::Color;
use sigtalk::{Console, Pid, Sender, SignalTransport};

use crate::SendArgs;

pub fn run(args: &SendArgs) -> Result<()> {
    // Validate before touching any signal state.
    let target: Pid = args.pid.parse()?;
    let timeout = args.timeout_ms.map(Duration::from_millis);

    let transport = SignalTransport::connect(target, timeout)?;
    let mut console = Console::new(std::io::stdout());
    console.line("Starting transmission...", Color::Blue)?;

    let verbose = args.verbose;
    let delivery = Sender::new(transport).send_message(args.message.as_bytes(), |bit| {
        if verbose { console.bit(bit) } else { Ok(()) }
    })?;

    tracing::info!(%target, bytes = delivery.bytes, bits = delivery.bits, "delivered");
    console.line("Message received successfully!", Color::Green)?;
    Ok(())
}
