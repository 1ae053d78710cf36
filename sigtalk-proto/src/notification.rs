//! The two-symbol notification alphabet.

/// One of the two notification kinds carried by the channel.
///
/// Sender to receiver, each kind encodes one bit. Receiver to sender, the
/// same kinds are reused as [`Reply`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notification {
    /// Bit value `0` (delivered as `SIGUSR1`).
    Zero,
    /// Bit value `1` (delivered as `SIGUSR2`).
    One,
}

impl Notification {
    /// Maps a bit value onto its notification kind.
    pub const fn from_bit(bit: bool) -> Self {
        if bit { Self::One } else { Self::Zero }
    }

    /// Returns the bit value this notification encodes.
    pub const fn bit(self) -> bool {
        matches!(self, Self::One)
    }
}

impl From<bool> for Notification {
    fn from(bit: bool) -> Self {
        Self::from_bit(bit)
    }
}

/// Reply sent from receiver to sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reply {
    /// The last bit was processed; the next one may be sent.
    Ack,
    /// The terminator byte completed; the session is over.
    Complete,
}

impl Reply {
    /// Notification kind carrying this reply on the wire.
    pub const fn notification(self) -> Notification {
        match self {
            Self::Ack => Notification::Zero,
            Self::Complete => Notification::One,
        }
    }

    /// Interprets a notification received by the sender.
    pub const fn from_notification(kind: Notification) -> Self {
        match kind {
            Notification::Zero => Self::Ack,
            Notification::One => Self::Complete,
        }
    }
}
