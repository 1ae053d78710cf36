//! Error types for sigtalk operations.

use std::io;
use std::time::Duration;

use crate::Pid;

/// Alias for `Result<T, sigtalk::Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by sigtalk operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A malformed or out-of-range argument, caught before any traffic.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The signal subscription could not be installed.
    #[error("failed to install signal handlers")]
    HandlerRegistration(#[source] io::Error),

    /// A notification could not be delivered to the target process.
    #[error("failed to notify PID {pid}")]
    Delivery {
        /// The process that could not be reached.
        pid: Pid,
        /// The underlying `kill(2)` failure.
        #[source]
        source: io::Error,
    },

    /// No reply arrived within the configured bound.
    #[error("no reply from receiver within {0:?}")]
    Timeout(Duration),

    /// The receiver completed the session before the message was finished.
    #[error("receiver closed the session after {bits} bits")]
    Closed {
        /// Bits sent when the completion arrived.
        bits: u64,
    },

    /// An I/O error from the console or the wake pipe.
    #[error(transparent)]
    Io(#[from] io::Error),
}
