//! Wire protocol for sigtalk point-to-point messaging.
//!
//! The physical channel carries exactly two payload-free notification
//! kinds. A message travels as one notification per bit, most significant
//! bit first, and ends with a single [`TERMINATOR`] byte. The receiver
//! acknowledges every bit before the sender may send the next one
//! (stop-and-wait). The terminator's last bit is answered with a
//! completion reply instead of an acknowledgment.

mod bits;
mod notification;

pub use bits::{Assembler, Bits, TERMINATOR, bits, frame};
pub use notification::{Notification, Reply};
