//! DMR Transmit Pipeline
//!
//! This crate implements the real-time transmit core of the digital-voice
//! modem: the burst/CACH framing state machine, the 4-level symbol modulator
//! with root-raised-cosine pulse shaping, and the q15 DSP primitives they
//! sit on. Hardware delivery goes through the [`interfaces::AirInterface`]
//! contract.

pub mod dmr;
pub mod dsp;

use thiserror::Error;

/// Synchronous failure codes for the transmit write surface.
///
/// Every failure is local to one write and leaves the transmitter running.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxError {
    #[error("payload length does not match the fixed contract")]
    IllegalLength,

    #[error("insufficient space in the slot FIFO")]
    RingFull,

    #[error("slot selector outside the valid set")]
    InvalidSlot,
}
