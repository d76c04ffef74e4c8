//! Common Types and Utilities
//!
//! This crate provides the shared types, bit helpers and ring buffers used
//! across the modem firmware crates.

pub mod bits;
pub mod ring;
pub mod types;

// Re-export commonly used items
pub use ring::{ByteBuffer, RingBuffer, SampleBuffer};
pub use types::*;
