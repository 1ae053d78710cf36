//! Outbound notification delivery.
//!
//! [`SignalLink`] maps the two notification kinds onto `SIGUSR1` and
//! `SIGUSR2` and delivers them with `kill(2)`.

use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use sigtalk_proto::Notification;

use crate::Pid;
use crate::error::{Error, Result};

/// Sends notifications to other processes.
pub trait Link {
    /// Delivers one notification to `pid`.
    fn notify(&mut self, pid: Pid, kind: Notification) -> Result<()>;

    /// Returns `true` if `pid` still names a live process.
    fn is_alive(&self, pid: Pid) -> bool;
}

/// [`Link`] backed by `kill(2)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalLink;

/// Signal carrying `kind`.
pub(crate) const fn signal_for(kind: Notification) -> Signal {
    match kind {
        Notification::Zero => Signal::SIGUSR1,
        Notification::One => Signal::SIGUSR2,
    }
}

/// Notification carried by a raw signal number, if it is one of ours.
pub(crate) fn notification_for(raw: i32) -> Option<Notification> {
    match Signal::try_from(raw).ok()? {
        Signal::SIGUSR1 => Some(Notification::Zero),
        Signal::SIGUSR2 => Some(Notification::One),
        _ => None,
    }
}

/// Converts to nix's PID type.
fn nix_pid(pid: Pid) -> nix::unistd::Pid {
    nix::unistd::Pid::from_raw(pid.as_raw())
}

impl Link for SignalLink {
    fn notify(&mut self, pid: Pid, kind: Notification) -> Result<()> {
        signal::kill(nix_pid(pid), signal_for(kind)).map_err(|e| Error::Delivery {
            pid,
            source: e.into(),
        })
    }

    fn is_alive(&self, pid: Pid) -> bool {
        // EPERM still means the process exists.
        !matches!(signal::kill(nix_pid(pid), None), Err(Errno::ESRCH))
    }
}
