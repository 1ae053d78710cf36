//! Sender-side reply flags with a blocking wait.
//!
//! Each reply kind has an atomic flag written only from signal context.
//! The handler also writes one byte to a socket pair so the main flow can
//! block in `read(2)` instead of polling the flags.

#![allow(unsafe_code)]

use std::io::{self, Read, Write};
use std::os::unix::net::UnixStream;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use signal_hook::SigId;
use signal_hook::consts::{SIGUSR1, SIGUSR2};
use signal_hook::low_level;
use sigtalk_proto::Reply;

use crate::error::{Error, Result};

/// Flags set by the reply handlers.
#[derive(Debug)]
pub(crate) struct ReplyCell {
    /// Set on `SIGUSR1`; cleared before every bit.
    ack: Arc<AtomicBool>,
    /// Set on `SIGUSR2`; never cleared.
    complete: Arc<AtomicBool>,
    /// Read end of the wake pipe.
    wake: UnixStream,
    /// Registered handler actions.
    ids: [SigId; 2],
}

impl ReplyCell {
    /// Installs handlers for both reply kinds.
    pub(crate) fn install() -> Result<Self> {
        let (wake, notify) = UnixStream::pair().map_err(Error::HandlerRegistration)?;
        notify
            .set_nonblocking(true)
            .map_err(Error::HandlerRegistration)?;
        let notify = Arc::new(notify);

        let ack = Arc::new(AtomicBool::new(false));
        let complete = Arc::new(AtomicBool::new(false));

        let ack_id = register(SIGUSR1, Arc::clone(&ack), Arc::clone(&notify))?;
        let complete_id = match register(SIGUSR2, Arc::clone(&complete), notify) {
            Ok(id) => id,
            Err(e) => {
                low_level::unregister(ack_id);
                return Err(e);
            }
        };

        Ok(Self {
            ack,
            complete,
            wake,
            ids: [ack_id, complete_id],
        })
    }

    /// Forgets any earlier acknowledgment.
    pub(crate) fn clear_ack(&self) {
        self.ack.store(false, Ordering::SeqCst);
    }

    /// Blocks until a reply flag is set or `timeout` elapses.
    ///
    /// Completion is sticky: once seen, every later wait returns it.
    pub(crate) fn wait(&mut self, timeout: Option<Duration>) -> Result<Reply> {
        let deadline = timeout.map(|limit| (Instant::now() + limit, limit));
        let mut buf = [0u8; 16];
        loop {
            if self.complete.load(Ordering::SeqCst) {
                return Ok(Reply::Complete);
            }
            if self.ack.swap(false, Ordering::SeqCst) {
                return Ok(Reply::Ack);
            }

            let remaining = match deadline {
                Some((at, limit)) => {
                    let left = at.saturating_duration_since(Instant::now());
                    if left.is_zero() {
                        return Err(Error::Timeout(limit));
                    }
                    Some(left)
                }
                None => None,
            };
            self.wake.set_read_timeout(remaining)?;

            match self.wake.read(&mut buf) {
                Ok(_) => {}
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::WouldBlock
                            | io::ErrorKind::TimedOut
                            | io::ErrorKind::Interrupted
                    ) => {}
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl Drop for ReplyCell {
    fn drop(&mut self) {
        for id in self.ids {
            low_level::unregister(id);
        }
    }
}

/// Registers a handler that raises `flag` and wakes the reader.
fn register(signal: i32, flag: Arc<AtomicBool>, notify: Arc<UnixStream>) -> Result<SigId> {
    // SAFETY: the action only stores to an atomic and issues one
    // non-blocking write, both async-signal-safe.
    unsafe {
        low_level::register(signal, move || {
            flag.store(true, Ordering::SeqCst);
            let _ = (&*notify).write(&[1]);
        })
    }
    .map_err(Error::HandlerRegistration)
}
