//! 4-level symbol modulator with root-raised-cosine pulse shaping.
//!
//! Each payload byte carries four 2-bit symbols, most-significant pair
//! first. Symbols map to fixed constellation amplitudes with an optional
//! fine trim on the outer (+3/-3) and inner (+1/-1) points, then pass
//! through the interpolating RRC filter at 5 samples per symbol.

use common::{SampleTag, RADIO_SYMBOL_LENGTH};

use super::{DMR_LEVEL_A, DMR_LEVEL_B, DMR_LEVEL_C, DMR_LEVEL_D, RRC_0_2_FILTER};
use crate::dsp::FirInterpolator;

/// Baseband samples produced per payload byte.
pub const SAMPLES_PER_BYTE: usize = 4 * RADIO_SYMBOL_LENGTH;

/// Largest accepted symbol-level trim magnitude.
pub const MAX_LEVEL_ADJUST: i16 = 128;

/// Map one byte to its four pre-filter symbol amplitudes.
pub fn symbol_levels(byte: u8, adj3: i16, adj1: i16) -> [i16; 4] {
    let mut levels = [0i16; 4];
    let mut c = byte;
    for level in levels.iter_mut() {
        *level = match c & 0xC0 {
            0xC0 => DMR_LEVEL_A + adj3, // +3
            0x80 => DMR_LEVEL_B + adj1, // +1
            0x00 => DMR_LEVEL_C - adj1, // -1
            _ => DMR_LEVEL_D - adj3,    // -3
        };
        c <<= 2;
    }
    levels
}

/// Symbol mapper plus pulse-shaping filter state.
pub struct Modulator {
    filter: FirInterpolator,
    level3_adj: i16,
    level1_adj: i16,
}

impl Modulator {
    pub fn new() -> Self {
        Self {
            filter: FirInterpolator::new(RADIO_SYMBOL_LENGTH, &RRC_0_2_FILTER),
            level3_adj: 0,
            level1_adj: 0,
        }
    }

    /// Set the fine 4FSK symbol-level trims. Values outside +/-128 reset to
    /// zero rather than skewing the constellation.
    pub fn set_level_adjust(&mut self, level3_adj: i16, level1_adj: i16) {
        self.level3_adj = if level3_adj.abs() > MAX_LEVEL_ADJUST { 0 } else { level3_adj };
        self.level1_adj = if level1_adj.abs() > MAX_LEVEL_ADJUST { 0 } else { level1_adj };
    }

    pub fn level_adjust(&self) -> (i16, i16) {
        (self.level3_adj, self.level1_adj)
    }

    /// Modulate one byte into `SAMPLES_PER_BYTE` shaped samples and tags.
    ///
    /// All tags are untagged except the group mid-point, which carries the
    /// byte's own tag so downstream consumers can locate the sub-channel.
    pub fn modulate_byte(
        &mut self,
        byte: u8,
        tag: SampleTag,
        samples: &mut [i16; SAMPLES_PER_BYTE],
        tags: &mut [SampleTag; SAMPLES_PER_BYTE],
    ) {
        let levels = symbol_levels(byte, self.level3_adj, self.level1_adj);
        self.filter.process(&levels, samples);

        tags.fill(SampleTag::None);
        tags[RADIO_SYMBOL_LENGTH * 2] = tag;
    }
}

impl Default for Modulator {
    fn default() -> Self {
        Self::new()
    }
}
