//! Stop-and-wait sender.
//!
//! Every bit is delivered and then acknowledged before the next one goes
//! out. The receiver tracks bit position with a local counter only, so a
//! bit must never overtake its predecessor.

use std::io;
use std::time::Duration;

use sigtalk_proto::{Notification, Reply, TERMINATOR, bits};
use tracing::{debug, info};

use crate::Pid;
use crate::cell::ReplyCell;
use crate::error::{Error, Result};
use crate::link::{Link, SignalLink};

/// Sender-side end of the bit channel.
pub trait Transport {
    /// Delivers one bit to the receiver.
    fn send_bit(&mut self, bit: bool) -> Result<()>;

    /// Blocks until the receiver replies.
    fn wait_reply(&mut self) -> Result<Reply>;
}

/// Per-bit flow-control state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowState {
    /// Nothing sent yet.
    #[default]
    Idle,
    /// A bit is in flight, waiting for its reply.
    Sent,
    /// The last bit was answered; the next one may go out.
    Acked,
}

/// Totals for a delivered message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    /// Message bytes, terminator excluded.
    pub bytes: usize,
    /// Bits sent, terminator included.
    pub bits: u64,
}

/// Drives a [`Transport`] one acknowledged bit at a time.
#[derive(Debug)]
pub struct Sender<T> {
    /// Channel to the receiver.
    transport: T,
    /// Where the current bit stands.
    state: FlowState,
    /// Bits delivered so far.
    sent_bits: u64,
}

impl<T: Transport> Sender<T> {
    /// Creates a sender over `transport`.
    pub const fn new(transport: T) -> Self {
        Self {
            transport,
            state: FlowState::Idle,
            sent_bits: 0,
        }
    }

    /// Current flow-control state.
    pub const fn state(&self) -> FlowState {
        self.state
    }

    /// Bits delivered so far.
    pub const fn sent_bits(&self) -> u64 {
        self.sent_bits
    }

    /// Sends one bit and blocks until the receiver replies.
    pub fn send_bit(&mut self, bit: bool) -> Result<Reply> {
        self.transport.send_bit(bit)?;
        self.state = FlowState::Sent;
        self.sent_bits += 1;
        debug!(bit = u8::from(bit), n = self.sent_bits, "bit sent");

        let reply = self.transport.wait_reply()?;
        self.state = FlowState::Acked;
        Ok(reply)
    }

    /// Sends the 8 bits of `byte`, most significant first.
    ///
    /// `on_bit` sees each bit just before it goes out. Returns the reply
    /// to the last bit; a completion before that is an error.
    pub fn send_char(
        &mut self,
        byte: u8,
        on_bit: &mut impl FnMut(bool) -> io::Result<()>,
    ) -> Result<Reply> {
        let mut reply = Reply::Ack;
        for bit in bits(byte) {
            if reply == Reply::Complete {
                return Err(Error::Closed {
                    bits: self.sent_bits,
                });
            }
            on_bit(bit)?;
            reply = self.send_bit(bit)?;
        }
        Ok(reply)
    }

    /// Sends `message` followed by the terminator, then waits for the
    /// receiver's completion.
    ///
    /// `message` must not contain the terminator byte itself.
    pub fn send_message(
        &mut self,
        message: &[u8],
        mut on_bit: impl FnMut(bool) -> io::Result<()>,
    ) -> Result<Delivery> {
        if let Some(at) = message.iter().position(|&b| b == TERMINATOR) {
            return Err(Error::InvalidArgument(format!(
                "message contains a NUL byte at offset {at}"
            )));
        }

        info!(bytes = message.len(), "transmission started");
        for &byte in message {
            if self.send_char(byte, &mut on_bit)? == Reply::Complete {
                return Err(Error::Closed {
                    bits: self.sent_bits,
                });
            }
        }

        let mut reply = self.send_char(TERMINATOR, &mut on_bit)?;
        while reply != Reply::Complete {
            reply = self.transport.wait_reply()?;
        }
        info!(bits = self.sent_bits, "receiver confirmed the message");

        Ok(Delivery {
            bytes: message.len(),
            bits: self.sent_bits,
        })
    }
}

/// [`Transport`] over real signals.
#[derive(Debug)]
pub struct SignalTransport<L = SignalLink> {
    /// Receiver process.
    target: Pid,
    /// Outbound delivery.
    link: L,
    /// Inbound reply flags.
    cell: ReplyCell,
    /// Bound on each wait; `None` waits forever.
    timeout: Option<Duration>,
}

impl SignalTransport {
    /// Installs the reply handlers and targets `target`.
    ///
    /// With `timeout` unset, a lost acknowledgment blocks forever.
    pub fn connect(target: Pid, timeout: Option<Duration>) -> Result<Self> {
        Self::with_link(target, SignalLink, timeout)
    }
}

impl<L: Link> SignalTransport<L> {
    /// Like [`connect`](SignalTransport::connect) with a custom outbound link.
    pub fn with_link(target: Pid, link: L, timeout: Option<Duration>) -> Result<Self> {
        Ok(Self {
            target,
            link,
            cell: ReplyCell::install()?,
            timeout,
        })
    }

    /// Receiver process.
    pub const fn target(&self) -> Pid {
        self.target
    }
}

impl<L: Link> Transport for SignalTransport<L> {
    fn send_bit(&mut self, bit: bool) -> Result<()> {
        self.cell.clear_ack();
        self.link.notify(self.target, Notification::from_bit(bit))
    }

    fn wait_reply(&mut self) -> Result<Reply> {
        self.cell.wait(self.timeout)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    use super::*;
    use crate::console::Console;
    use crate::receiver::Receiver;

    const SENDER: Pid = match Pid::new(500) {
        Some(pid) => pid,
        None => unreachable!(),
    };

    type Queue = Rc<RefCell<VecDeque<Reply>>>;

    /// Receiver-side link that queues replies for the loopback transport.
    struct Wire(Queue);

    impl Link for Wire {
        fn notify(&mut self, pid: Pid, kind: Notification) -> Result<()> {
            assert_eq!(pid, SENDER);
            self.0
                .borrow_mut()
                .push_back(Reply::from_notification(kind));
            Ok(())
        }

        fn is_alive(&self, _pid: Pid) -> bool {
            true
        }
    }

    /// In-process transport feeding a real [`Receiver`].
    struct Loopback {
        receiver: Receiver<Wire, Vec<u8>>,
        replies: Queue,
    }

    impl Loopback {
        fn new() -> Self {
            let replies = Queue::default();
            let receiver = Receiver::new(Wire(Rc::clone(&replies)), Console::new(Vec::new()));
            Self { receiver, replies }
        }
    }

    impl Transport for Loopback {
        fn send_bit(&mut self, bit: bool) -> Result<()> {
            self.receiver.handle(SENDER, Notification::from_bit(bit));
            Ok(())
        }

        fn wait_reply(&mut self) -> Result<Reply> {
            self.replies
                .borrow_mut()
                .pop_front()
                .ok_or(Error::Timeout(Duration::ZERO))
        }
    }

    /// Transport that swallows bits and replies with a fixed script.
    struct Scripted(VecDeque<Reply>);

    impl Transport for Scripted {
        fn send_bit(&mut self, _bit: bool) -> Result<()> {
            Ok(())
        }

        fn wait_reply(&mut self) -> Result<Reply> {
            self.0.pop_front().ok_or(Error::Timeout(Duration::ZERO))
        }
    }

    fn no_trace(_bit: bool) -> io::Result<()> {
        Ok(())
    }

    #[test]
    fn loopback_delivers_message() {
        let mut sender = Sender::new(Loopback::new());
        let delivery = sender.send_message(b"Hi", no_trace).unwrap();
        assert_eq!(delivery, Delivery { bytes: 2, bits: 24 });
        assert_eq!(sender.state(), FlowState::Acked);

        let receiver = &sender.transport.receiver;
        assert_eq!(receiver.session().active_sender(), None);
        let out = String::from_utf8_lossy(receiver.console().get_ref()).into_owned();
        assert!(out.contains("Hi\n"));
        assert!(out.contains("Characters received: 2"));
        assert!(out.contains("Bits received: 24"));
    }

    #[test]
    fn loopback_back_to_back_messages() {
        let mut sender = Sender::new(Loopback::new());
        sender.send_message(b"one", no_trace).unwrap();
        let second = sender.send_message(b"two!", no_trace).unwrap();
        assert_eq!(second.bytes, 4);
        assert_eq!(sender.sent_bits(), 32 + 40);
        let out = String::from_utf8_lossy(sender.transport.receiver.console().get_ref()).into_owned();
        assert!(out.contains("Bits received: 40"));
    }

    #[test]
    fn observer_sees_every_bit_in_order() {
        let mut seen = Vec::new();
        let mut sender = Sender::new(Loopback::new());
        sender
            .send_message(b"A", |bit| {
                seen.push(u8::from(bit));
                Ok(())
            })
            .unwrap();
        assert_eq!(seen, [0, 1, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn rejects_embedded_terminator() {
        let mut sender = Sender::new(Loopback::new());
        let err = sender.send_message(b"a\0b", no_trace).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(sender.sent_bits(), 0);
    }

    #[test]
    fn stalled_ack_surfaces_transport_error() {
        let mut sender = Sender::new(Scripted(VecDeque::from([Reply::Ack, Reply::Ack])));
        let err = sender.send_message(b"x", no_trace).unwrap_err();
        assert!(matches!(err, Error::Timeout(_)));
        assert_eq!(sender.sent_bits(), 3);
        assert_eq!(sender.state(), FlowState::Sent);
    }

    #[test]
    fn early_completion_is_an_error() {
        let mut sender = Sender::new(Scripted(VecDeque::from([Reply::Complete])));
        let err = sender.send_message(b"x", no_trace).unwrap_err();
        assert!(matches!(err, Error::Closed { bits: 1 }));
    }

    #[test]
    fn waits_past_stray_ack_for_completion() {
        let mut script: VecDeque<Reply> = std::iter::repeat_n(Reply::Ack, 16).collect();
        script.push_back(Reply::Complete);
        let mut sender = Sender::new(Scripted(script));
        let delivery = sender.send_message(b"x", no_trace).unwrap();
        assert_eq!(delivery.bits, 16);
    }
}
