//! Receiver-side session state machine.
//!
//! A [`Session`] spans one message exchange: it opens on the first bit from
//! a sender and closes when the terminator byte completes. Only one session
//! exists at a time.

use std::mem;

use sigtalk_proto::{Assembler, Notification, TERMINATOR};

use crate::Pid;

/// Per-session reception counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Message bytes delivered, terminator excluded.
    pub characters_received: u64,
    /// Every bit received, terminator bits included.
    pub bits_received: u64,
}

/// Final report of a completed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Sender that owned the session.
    pub sender: Pid,
    /// Counters at the moment the terminator completed.
    pub stats: Stats,
}

/// Result of feeding one bit into the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Bit stored; the current byte is still incomplete.
    Bit,
    /// A message byte completed.
    Byte(u8),
    /// The terminator completed and the session closed.
    Closed(Summary),
}

/// Outcome of [`Session::push`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// `true` if this bit opened a new session.
    pub opened: bool,
    /// What the bit completed, if anything.
    pub event: Event,
}

/// One in-progress message exchange.
#[derive(Debug, Default)]
pub struct Session {
    /// Sender owning the session; `None` between messages.
    active: Option<Pid>,
    /// Partially received byte.
    assembler: Assembler,
    /// Counters reset on close.
    stats: Stats,
}

impl Session {
    /// Creates an idle session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sender of the in-flight message, if any.
    pub const fn active_sender(&self) -> Option<Pid> {
        self.active
    }

    /// Counters for the in-flight message.
    pub const fn stats(&self) -> Stats {
        self.stats
    }

    /// Bits accumulated for the current byte.
    pub const fn pending_bits(&self) -> u8 {
        self.assembler.pending_bits()
    }

    /// Returns `true` if a bit from `from` belongs to this session.
    pub fn accepts(&self, from: Pid) -> bool {
        self.active.is_none_or(|pid| pid == from)
    }

    /// Feeds one received bit.
    ///
    /// An idle session opens for `from`. Bits from any other sender while a
    /// session is active are folded into the same byte; callers that want
    /// isolation check [`accepts`](Self::accepts) first.
    pub fn push(&mut self, from: Pid, kind: Notification) -> Step {
        let opened = self.active.is_none();
        let sender = *self.active.get_or_insert(from);

        self.stats.bits_received += 1;
        let event = match self.assembler.push(kind.bit()) {
            None => Event::Bit,
            Some(TERMINATOR) => {
                self.active = None;
                Event::Closed(Summary {
                    sender,
                    stats: mem::take(&mut self.stats),
                })
            }
            Some(byte) => {
                self.stats.characters_received += 1;
                Event::Byte(byte)
            }
        };
        Step { opened, event }
    }

    /// Discards the in-flight message. Returns the sender that owned it.
    pub fn abandon(&mut self) -> Option<Pid> {
        self.assembler.reset();
        self.stats = Stats::default();
        self.active.take()
    }
}
