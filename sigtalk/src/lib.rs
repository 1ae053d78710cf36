//! Point-to-point messaging over two POSIX signals.
//!
//! `sigtalk` moves a byte string from one process to another using nothing
//! but `SIGUSR1` (bit `0`) and `SIGUSR2` (bit `1`). Each bit is
//! acknowledged before the next is sent; a `0x00` byte ends the message and
//! is answered with a completion signal.
//!
//! # Receiving
//!
//! ```no_run
//! use sigtalk::{Console, Listener, Pid, Receiver, SignalLink};
//!
//! // Subscribe before publishing the PID.
//! let mut listener = Listener::install()?;
//! let mut console = Console::new(std::io::stdout());
//! console.banner(Pid::current())?;
//!
//! // Runs until the process is killed.
//! Receiver::new(SignalLink, console).serve(&mut listener);
//! # Ok::<(), sigtalk::Error>(())
//! ```
//!
//! # Sending
//!
//! ```no_run
//! use sigtalk::{Pid, Sender, SignalTransport};
//!
//! let target: Pid = "4242".parse()?;
//! let transport = SignalTransport::connect(target, None)?;
//! let delivery = Sender::new(transport).send_message(b"hello", |_bit| Ok(()))?;
//! assert_eq!(delivery.bits, 48);
//! # Ok::<(), sigtalk::Error>(())
//! ```

#[cfg(unix)]
mod cell;
pub mod console;
mod error;
#[cfg(unix)]
mod link;
mod pid;
#[cfg(unix)]
mod receiver;
#[cfg(unix)]
mod sender;
mod session;

pub use console::Console;
pub use error::{Error, Result};
#[cfg(unix)]
pub use link::{Link, SignalLink};
pub use pid::Pid;
#[cfg(unix)]
pub use receiver::{Listener, Receiver};
#[cfg(unix)]
pub use sender::{Delivery, FlowState, Sender, SignalTransport, Transport};
pub use session::{Event, Session, Stats, Step, Summary};
pub use sigtalk_proto::{Notification, Reply, TERMINATOR};
