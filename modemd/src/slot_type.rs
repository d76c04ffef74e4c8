//! Host-convention slot type stamp.
//!
//! Places the 20-bit slot type field at its burst positions, the 10 bits on
//! each side of the centre sync (frame bits 98..108 and 156..166), with the
//! colour code and data type in the clear and zero parity. The full FEC
//! encoding is the host stack's job; bursts arriving over the payload
//! interface already carry it, so this stamp is only applied to the
//! locally generated idle template.

use common::bits::write_bit;
use modem::dmr::{DataType, SlotTypeEncoder};

const FIRST_HALF_BIT: usize = 98;
const SECOND_HALF_BIT: usize = 156;

pub struct PlainSlotType;

impl SlotTypeEncoder for PlainSlotType {
    fn encode(&self, color_code: u8, data_type: DataType, frame: &mut [u8]) {
        let word: u32 =
            ((color_code as u32 & 0x0F) << 16) | ((data_type as u32 & 0x0F) << 12);

        for i in 0..10 {
            write_bit(frame, FIRST_HALF_BIT + i, word & (0x80000 >> i) != 0);
        }
        for i in 0..10 {
            write_bit(frame, SECOND_HALF_BIT + i, word & (0x200 >> i) != 0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::bits::read_bit;

    #[test]
    fn test_stamp_positions() {
        let mut frame = [0u8; 33];
        PlainSlotType.encode(0x0F, DataType::Idle, &mut frame);

        // Colour code 0b1111 occupies the first four field bits.
        for i in 0..4 {
            assert!(read_bit(&frame, FIRST_HALF_BIT + i));
        }
        // Data type 9 = 0b1001 follows.
        assert!(read_bit(&frame, FIRST_HALF_BIT + 4));
        assert!(!read_bit(&frame, FIRST_HALF_BIT + 5));
        assert!(!read_bit(&frame, FIRST_HALF_BIT + 6));
        assert!(read_bit(&frame, FIRST_HALF_BIT + 7));
        // Parity half stays clear.
        for i in 0..10 {
            assert!(!read_bit(&frame, SECOND_HALF_BIT + i));
        }
        // Nothing outside the two field halves is touched.
        for byte in &frame[..12] {
            assert_eq!(*byte, 0);
        }
        for byte in &frame[21..] {
            assert_eq!(*byte, 0);
        }
    }

    #[test]
    fn test_stamp_preserves_surrounding_bits() {
        let mut frame = [0xFFu8; 33];
        PlainSlotType.encode(0, DataType::VoicePiHeader, &mut frame);
        // Bits before and after the field halves keep their values.
        assert!(read_bit(&frame, FIRST_HALF_BIT - 1));
        assert!(read_bit(&frame, FIRST_HALF_BIT + 10));
        assert!(read_bit(&frame, SECOND_HALF_BIT - 1));
        assert!(read_bit(&frame, SECOND_HALF_BIT + 10));
        // Field content is zero for colour 0, type 0, zero parity.
        assert!(!read_bit(&frame, FIRST_HALF_BIT));
        assert!(!read_bit(&frame, SECOND_HALF_BIT));
    }
}
