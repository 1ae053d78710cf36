//! MSB-first bit framing.
//!
//! Bit position is never sent: sender and receiver each count bits
//! locally, so both sides must walk a byte in the same order.

use std::iter;

use crate::Notification;

/// End-of-message sentinel. Never part of the delivered text.
pub const TERMINATOR: u8 = 0x00;

/// Iterator over the bits of a byte, most significant first.
#[derive(Debug, Clone)]
pub struct Bits {
    /// Byte being decomposed.
    byte: u8,
    /// Bits not yet yielded.
    remaining: u8,
}

/// Decomposes `byte` into 8 bits, most significant first.
pub const fn bits(byte: u8) -> Bits {
    Bits { byte, remaining: 8 }
}

impl Iterator for Bits {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some((self.byte >> self.remaining) & 1 == 1)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = usize::from(self.remaining);
        (n, Some(n))
    }
}

impl ExactSizeIterator for Bits {}

/// Full notification sequence for `message`, terminator included.
pub fn frame(message: &[u8]) -> impl Iterator<Item = Notification> + '_ {
    message
        .iter()
        .copied()
        .chain(iter::once(TERMINATOR))
        .flat_map(bits)
        .map(Notification::from_bit)
}

/// Rebuilds bytes from bits received most significant first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Assembler {
    /// Bits shifted in so far.
    acc: u8,
    /// Number of bits in `acc`, always below 8 between calls.
    count: u8,
}

impl Assembler {
    /// Creates an empty assembler.
    pub const fn new() -> Self {
        Self { acc: 0, count: 0 }
    }

    /// Shifts one bit in. Returns the byte once 8 bits have arrived and
    /// resets for the next one.
    pub fn push(&mut self, bit: bool) -> Option<u8> {
        self.acc = (self.acc << 1) | u8::from(bit);
        self.count += 1;
        if self.count < 8 {
            return None;
        }
        let byte = self.acc;
        *self = Self::new();
        Some(byte)
    }

    /// Bits accumulated for the current, incomplete byte.
    pub const fn pending_bits(&self) -> u8 {
        self.count
    }

    /// Current accumulator value.
    pub const fn accumulator(&self) -> u8 {
        self.acc
    }

    /// Drops any partially assembled byte.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_are_msb_first() {
        let got: Vec<bool> = bits(0x41).collect();
        assert_eq!(
            got,
            [false, true, false, false, false, false, false, true]
        );
        assert_eq!(bits(0xff).len(), 8);
    }

    #[test]
    fn every_byte_reassembles() {
        for byte in 0..=u8::MAX {
            let mut asm = Assembler::new();
            let mut out = None;
            for bit in bits(byte) {
                assert!(out.is_none(), "byte completed early");
                out = asm.push(bit);
            }
            assert_eq!(out, Some(byte));
            assert_eq!(asm, Assembler::new());
        }
    }

    #[test]
    fn assembler_tracks_partial_byte() {
        let mut asm = Assembler::new();
        assert_eq!(asm.push(true), None);
        assert_eq!(asm.push(false), None);
        assert_eq!(asm.push(true), None);
        assert_eq!(asm.pending_bits(), 3);
        assert_eq!(asm.accumulator(), 0b101);

        asm.reset();
        assert_eq!(asm.pending_bits(), 0);
        assert_eq!(asm.accumulator(), 0);
    }

    #[test]
    fn frame_appends_terminator() {
        let seq: Vec<Notification> = frame(b"Hi").collect();
        assert_eq!(seq.len(), 24);
        assert!(seq[16..].iter().all(|n| *n == Notification::Zero));

        let mut asm = Assembler::new();
        let decoded: Vec<u8> = seq.iter().filter_map(|n| asm.push(n.bit())).collect();
        assert_eq!(decoded, [b'H', b'i', TERMINATOR]);
    }

    #[test]
    fn empty_message_is_just_the_terminator() {
        assert_eq!(frame(b"").count(), 8);
    }
}
