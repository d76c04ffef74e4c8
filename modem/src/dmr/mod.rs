//! DMR burst framing and modulation.
//!
//! Models the DMR physical layer transmit structure: 33-byte data bursts per
//! TDMA slot, interleaved with the 3-byte CACH sub-channel carrying link
//! control and access-type signaling.

pub mod modulator;
pub mod tx;

pub use modulator::Modulator;
pub use tx::{DmrTx, TxState};

/// Length of one data burst in bytes (264 bits: 216 payload + 48 sync).
pub const DMR_FRAME_LENGTH_BYTES: usize = 33;

/// Length of one CACH burst in bytes.
pub const DMR_CACH_LENGTH_BYTES: usize = 3;

/// Per-slot FIFO capacity in bytes.
pub const DMR_TX_BUFFER_LEN: usize = 500;

/// Bursts to hold off after start so the FIFOs fill before draining begins.
pub const STARTUP_COUNT: u32 = 20;

/// CACH builds an aborted slot must age before new data is accepted.
pub const ABORT_COUNT: u32 = 6;

/// BS sourced data sync byte; repeated it yields the 1.2 kHz 4FSK test tone.
pub const DMR_START_SYNC: u8 = 0x5F;

/// 4FSK constellation amplitudes (q15).
pub const DMR_LEVEL_A: i16 = 1362;
pub const DMR_LEVEL_B: i16 = 454;
pub const DMR_LEVEL_C: i16 = -454;
pub const DMR_LEVEL_D: i16 = -1362;

// Generated using rcosdesign(0.2, 8, 5, 'sqrt') in MATLAB
pub(crate) static RRC_0_2_FILTER: [i16; 45] = [
    0, 0, 0, 0, 850, 219, -720, -1548, -1795, -1172, 237, 1927, 3120, 3073, 1447, -1431, -4544,
    -6442, -5735, -1633, 5651, 14822, 23810, 30367, 32767, 30367, 23810, 14822, 5651, -1633,
    -5735, -6442, -4544, -1431, 1447, 3073, 3120, 1927, 237, -1172, -1795, -1548, -720, 219, 850,
];

/// The PR FILL and BS Data Sync pattern.
pub(crate) static IDLE_DATA: [u8; DMR_FRAME_LENGTH_BYTES] = [
    0x53, 0xC2, 0x5E, 0xAB, 0xA8, 0x67, 0x1D, 0xC7, 0x38, 0x3B, 0xD9, 0x36, 0x00, 0x0D, 0xFF,
    0x57, 0xD7, 0x5D, 0xF5, 0xD0, 0x03, 0xF6, 0xE4, 0x65, 0x17, 0x1B, 0x48, 0xCA, 0x6D, 0x4F,
    0xC6, 0x10, 0xB4,
];

/// Short LC bit scatter: input bit `i` lands at output bit `CACH_INTERLEAVE[i]`.
/// Protocol-defined permutation; preserve exactly.
pub(crate) static CACH_INTERLEAVE: [usize; 68] = [
    1, 2, 3, 5, 6, 7, 9, 10, 11, 13, 15, 16, 17, 19, 20, 21, 23, 25, 26, 27, 29, 30, 31, 33, 34,
    35, 37, 39, 40, 41, 43, 44, 45, 47, 49, 50, 51, 53, 54, 55, 57, 58, 59, 61, 63, 64, 65, 67,
    68, 69, 71, 73, 74, 75, 77, 78, 79, 81, 82, 83, 85, 87, 88, 89, 91, 92, 93, 95,
];

pub(crate) const EMPTY_SHORT_LC: [u8; 12] = [0; 12];

/// DMR data type, consumed by the slot-type encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DataType {
    VoicePiHeader = 0,
    VoiceLcHeader = 1,
    TerminatorWithLc = 2,
    Csbk = 3,
    DataHeader = 6,
    Rate12Data = 7,
    Rate34Data = 8,
    Idle = 9,
}

/// External slot-type/color-code bit encoder.
///
/// Invoked once per color-code change to stamp the slot-type field into the
/// idle-burst template. The encoding itself (Golay and bit placement) lives
/// with the protocol layer, outside this pipeline.
pub trait SlotTypeEncoder: Send {
    fn encode(&self, color_code: u8, data_type: DataType, frame: &mut [u8]);
}
