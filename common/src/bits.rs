//! MSB-first bit access over byte slices.
//!
//! The burst and link-control encoders address payloads by absolute bit
//! position, bit 0 being the most significant bit of byte 0.

/// Read bit `pos` of `data`, MSB first.
#[inline]
pub fn read_bit(data: &[u8], pos: usize) -> bool {
    data[pos >> 3] & (0x80 >> (pos & 7)) != 0
}

/// Write bit `pos` of `data`, MSB first.
#[inline]
pub fn write_bit(data: &mut [u8], pos: usize, bit: bool) {
    if bit {
        data[pos >> 3] |= 0x80 >> (pos & 7);
    } else {
        data[pos >> 3] &= !(0x80 >> (pos & 7));
    }
}
