//! Console output for both ends of the channel.
//!
//! Message bytes are written raw and flushed immediately; reports and
//! status lines are colored with [`colored`].

use std::io::{self, Write};

use colored::{Color, Colorize};

use crate::Pid;
use crate::session::Summary;

/// Prefix for each statistics line.
const CHECK_MARK: &str = "✓";
/// Prefix for the new-connection line.
const ARROW_MARK: &str = "→";

/// Colored console writer.
#[derive(Debug)]
pub struct Console<W> {
    /// Destination stream.
    out: W,
}

impl<W: Write> Console<W> {
    /// Wraps an output stream.
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the underlying stream.
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Consumes the console, returning the underlying stream.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Writes `msg` in bold `color` on its own line.
    pub fn line(&mut self, msg: &str, color: Color) -> io::Result<()> {
        writeln!(self.out, "{}", msg.color(color).bold())?;
        self.out.flush()
    }

    /// Receiver start-up banner.
    pub fn banner(&mut self, pid: Pid) -> io::Result<()> {
        self.line("🚀 sigtalk receiver started", Color::Green)?;
        self.line(&format!("PID: {pid}"), Color::Blue)?;
        self.line("Waiting for messages...", Color::Yellow)
    }

    /// Announces a sender opening a new session.
    pub fn new_client(&mut self, pid: Pid) -> io::Result<()> {
        let msg = format!("{ARROW_MARK} New client connection (PID: {pid})");
        self.line(&msg, Color::Yellow)
    }

    /// Emits one reconstructed message byte.
    pub fn byte(&mut self, byte: u8) -> io::Result<()> {
        self.out.write_all(&[byte])?;
        self.out.flush()
    }

    /// Ends the message line and prints the session statistics.
    pub fn report(&mut self, summary: &Summary) -> io::Result<()> {
        let check = CHECK_MARK.green().bold();
        writeln!(self.out)?;
        writeln!(self.out, "\n{}", "=== Reception statistics ===".blue().bold())?;
        writeln!(self.out, "{check} Message received from client PID: {}", summary.sender)?;
        writeln!(
            self.out,
            "{check} Characters received: {}",
            summary.stats.characters_received
        )?;
        writeln!(self.out, "{check} Bits received: {}\n", summary.stats.bits_received)?;
        self.out.flush()
    }

    /// Verbose trace of a bit about to be sent.
    pub fn bit(&mut self, bit: bool) -> io::Result<()> {
        let msg = format!("Sending bit: {}", u8::from(bit));
        writeln!(self.out, "{}", msg.blue().bold())?;
        self.out.flush()
    }
}
