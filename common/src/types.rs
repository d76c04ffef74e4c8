//! Common Types for the Digital Voice Modem
//!
//! Defines fundamental types shared by the framing, DSP and hardware I/O crates.

use num_derive::{FromPrimitive, ToPrimitive};

/// Baseband sample rate in Hz.
pub const SAMPLE_RATE: u32 = 24_000;

/// Number of baseband samples per 4FSK radio symbol.
pub const RADIO_SYMBOL_LENGTH: usize = 5;

/// Symbol rate in symbols per second.
pub const SYMBOL_RATE: u32 = SAMPLE_RATE / RADIO_SYMBOL_LENGTH as u32;

/// Per-sample marker identifying which logical sub-channel a sample belongs to.
///
/// Threaded through the transmit pipeline alongside each sample so that the
/// hardware backend (or a downstream consumer) can tell where a slot boundary
/// sits inside the sample stream.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
#[repr(u8)]
pub enum SampleTag {
    /// No marker.
    #[default]
    None = 0,
    /// Sample belongs to TDMA slot 1.
    Slot1 = 1,
    /// Sample belongs to TDMA slot 2.
    Slot2 = 2,
}

/// Logical TDMA time slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
#[repr(u8)]
pub enum Slot {
    One = 0,
    Two = 1,
}

impl Slot {
    /// Decode the wire selector used by the command protocol (1 or 2).
    pub fn from_selector(selector: u8) -> Option<Self> {
        match selector {
            1 => Some(Slot::One),
            2 => Some(Slot::Two),
            _ => None,
        }
    }

    /// Array index for per-slot state.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The opposite slot.
    pub fn other(self) -> Self {
        match self {
            Slot::One => Slot::Two,
            Slot::Two => Slot::One,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_selector() {
        assert_eq!(Slot::from_selector(1), Some(Slot::One));
        assert_eq!(Slot::from_selector(2), Some(Slot::Two));
        assert_eq!(Slot::from_selector(0), None);
        assert_eq!(Slot::from_selector(3), None);
    }

    #[test]
    fn test_symbol_rate() {
        assert_eq!(SYMBOL_RATE, 4800);
    }
}
