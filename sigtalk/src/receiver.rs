//! Receiver: session bookkeeping, console output, and replies.
//!
//! The OS-level handler does nothing but record the signal and its origin
//! (via `signal-hook`) and wake the main loop. [`Receiver::handle`] then runs
//! in normal context: it updates the [`Session`], writes to the console,
//! and only then acknowledges the bit, so the sender never outruns
//! reconstruction.

use std::io::{self, Write};

use signal_hook::consts::{SIGUSR1, SIGUSR2};
use signal_hook::iterator::SignalsInfo;
use signal_hook::iterator::exfiltrator::WithOrigin;
use sigtalk_proto::{Notification, Reply};
use tracing::{debug, info, warn};

use crate::Pid;
use crate::console::Console;
use crate::error::{Error, Result};
use crate::link::{Link, SignalLink, notification_for};
use crate::session::{Event, Session};

/// Installed subscription to both notification kinds.
pub struct Listener {
    /// Pending signals with their sender's PID.
    signals: SignalsInfo<WithOrigin>,
}

impl std::fmt::Debug for Listener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listener").finish_non_exhaustive()
    }
}

impl Listener {
    /// Subscribes to `SIGUSR1` and `SIGUSR2`.
    ///
    /// Must happen before the PID is published: an unhandled `SIGUSR1`
    /// terminates the process.
    pub fn install() -> Result<Self> {
        let signals = SignalsInfo::<WithOrigin>::new([SIGUSR1, SIGUSR2])
            .map_err(Error::HandlerRegistration)?;
        Ok(Self { signals })
    }
}

/// Reactive end of the channel.
#[derive(Debug)]
pub struct Receiver<L, W> {
    /// The one in-flight message, if any.
    session: Session,
    /// Reply delivery.
    link: L,
    /// Message and report output.
    console: Console<W>,
}

impl<L: Link, W: Write> Receiver<L, W> {
    /// Creates an idle receiver.
    pub fn new(link: L, console: Console<W>) -> Self {
        Self {
            session: Session::new(),
            link,
            console,
        }
    }

    /// Current session state.
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Console the receiver writes to.
    pub const fn console(&self) -> &Console<W> {
        &self.console
    }

    /// Applies one notification from `from`.
    ///
    /// Returns `None` if the bit was rejected because another sender owns
    /// the session. A sender that died mid-message loses its session to
    /// the newcomer instead. Console failures are logged and never hold
    /// back the reply.
    pub fn handle(&mut self, from: Pid, kind: Notification) -> Option<Event> {
        if let Some(active) = self.session.active_sender().filter(|&pid| pid != from) {
            if self.link.is_alive(active) {
                warn!(%from, %active, "rejecting bit from a second sender");
                return None;
            }
            warn!(
                %active,
                pending_bits = self.session.pending_bits(),
                "sender vanished mid-message, dropping its session"
            );
            self.session.abandon();
        }

        let step = self.session.push(from, kind);
        debug!(%from, bit = u8::from(kind.bit()), "bit received");
        if step.opened {
            info!(pid = %from, "session opened");
            self.show(|c| c.new_client(from));
        }

        match step.event {
            Event::Bit => {}
            Event::Byte(byte) => self.show(|c| c.byte(byte)),
            Event::Closed(summary) => {
                self.show(|c| c.report(&summary));
                info!(
                    pid = %summary.sender,
                    chars = summary.stats.characters_received,
                    bits = summary.stats.bits_received,
                    "session closed"
                );
                self.reply(summary.sender, Reply::Complete);
                return Some(step.event);
            }
        }

        self.reply(from, Reply::Ack);
        Some(step.event)
    }

    /// Runs one console write, logging a failure.
    fn show(&mut self, write: impl FnOnce(&mut Console<W>) -> io::Result<()>) {
        if let Err(e) = write(&mut self.console) {
            warn!(error = %e, "console write failed");
        }
    }

    /// Best-effort reply; a lost reply stalls the sender but not us.
    fn reply(&mut self, to: Pid, reply: Reply) {
        if let Err(e) = self.link.notify(to, reply.notification()) {
            warn!(pid = %to, ?reply, error = %e, "reply not delivered");
        }
    }
}

impl<W: Write> Receiver<SignalLink, W> {
    /// Services sessions until the subscription is closed.
    pub fn serve(&mut self, listener: &mut Listener) {
        for origin in listener.signals.forever() {
            let Some(kind) = notification_for(origin.signal) else {
                continue;
            };
            let Some(from) = origin.process.and_then(|p| Pid::new(p.pid)) else {
                warn!(signal = origin.signal, "notification without a sender PID, ignored");
                continue;
            };
            self.handle(from, kind);
        }
    }
}
