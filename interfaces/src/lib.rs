//! Hardware I/O Contract and Backends
//!
//! This crate defines the contract between the framing/modulation core and
//! whatever drives the physical channel, plus its two interchangeable
//! backends: a timer-interrupt model for bare-metal targets and a threaded
//! ZMQ transport for software-defined radios.

pub mod timer;
pub mod zmq_io;

use common::SampleTag;
use thiserror::Error;

/// Hardware I/O errors
#[derive(Error, Debug)]
pub enum IoError {
    #[error("ZMQ error: {0}")]
    Zmq(#[from] zmq::Error),

    #[error("Backend not running")]
    NotRunning,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Sample and tag lengths differ: {0} vs {1}")]
    LengthMismatch(usize, usize),
}

/// Contract between the transmit pipeline and a hardware backend.
///
/// The backend owns the outbound sample queue and drains it at the fixed
/// sample rate; the pipeline only ever appends. A `write` that overruns the
/// queue latches the buffer's overflow flag, observable via `take_overflow`;
/// it signals a missed real-time deadline, not a per-call error.
pub trait AirInterface {
    /// Free slots in the outbound sample queue.
    fn space(&self) -> usize;

    /// Whether the transmitter is keyed.
    fn is_transmitting(&self) -> bool;

    /// Key or unkey the transmitter.
    fn set_transmit(&mut self, on: bool);

    /// Queue a batch of samples and their per-sample tags.
    fn write(&mut self, samples: &[i16], tags: &[SampleTag]) -> Result<(), IoError>;

    /// Return and clear the outbound queue's latched overflow flag.
    fn take_overflow(&mut self) -> bool;
}
