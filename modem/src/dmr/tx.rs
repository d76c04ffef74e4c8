//! DMR transmit framing state machine.
//!
//! Drives the continuous BS transmit sequence: slot 1 data burst, CACH,
//! slot 2 data burst, CACH, repeating. Payload bytes arrive per slot through
//! [`DmrTx::write_slot_data`] and queue in fixed FIFOs; each cadence tick
//! drains one burst's worth into the provisional output buffer, which the
//! modulator then feeds to the hardware backend as fast as its outbound
//! queue permits. Slots with no pending payload transmit the idle template.

use common::bits::{read_bit, write_bit};
use common::ring::ByteBuffer;
use common::{SampleTag, Slot};
use interfaces::{AirInterface, IoError};
use tracing::warn;

use super::modulator::{Modulator, SAMPLES_PER_BYTE};
use super::{
    DataType, SlotTypeEncoder, ABORT_COUNT, CACH_INTERLEAVE, DMR_CACH_LENGTH_BYTES,
    DMR_FRAME_LENGTH_BYTES, DMR_START_SYNC, DMR_TX_BUFFER_LEN, EMPTY_SHORT_LC, IDLE_DATA,
    STARTUP_COUNT,
};
use crate::TxError;

/// Transmit sequencing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxState {
    Idle,
    Slot1,
    Cach2,
    Slot2,
    Cach1,
    Cal,
}

/// DMR transmitter context. One instance per transmitter; owns all framing
/// state, the per-slot FIFOs and the modulator.
pub struct DmrTx {
    fifo: [ByteBuffer; 2],
    modulator: Modulator,
    state: TxState,

    idle_template: [u8; DMR_FRAME_LENGTH_BYTES],
    short_lc: [u8; 12],
    new_short_lc: [u8; 12],
    cach_ptr: usize,

    po_buffer: [u8; DMR_FRAME_LENGTH_BYTES],
    mark_buffer: [SampleTag; DMR_FRAME_LENGTH_BYTES],
    po_len: usize,
    po_ptr: usize,

    frame_count: u32,
    abort: [bool; 2],
    abort_count: [u32; 2],
    at_suppress: u8,

    encoder: Box<dyn SlotTypeEncoder>,
}

impl DmrTx {
    pub fn new(encoder: Box<dyn SlotTypeEncoder>) -> Self {
        Self {
            fifo: [
                ByteBuffer::new(DMR_TX_BUFFER_LEN),
                ByteBuffer::new(DMR_TX_BUFFER_LEN),
            ],
            modulator: Modulator::new(),
            state: TxState::Idle,
            idle_template: IDLE_DATA,
            short_lc: EMPTY_SHORT_LC,
            new_short_lc: EMPTY_SHORT_LC,
            cach_ptr: 0,
            po_buffer: [0; DMR_FRAME_LENGTH_BYTES],
            mark_buffer: [SampleTag::None; DMR_FRAME_LENGTH_BYTES],
            po_len: 0,
            po_ptr: 0,
            frame_count: 0,
            abort: [false, false],
            abort_count: [0, 0],
            at_suppress: 0,
            encoder,
        }
    }

    /// Advance the framing state machine and drain pending output into the
    /// hardware backend. Called once per cadence tick.
    pub fn process(&mut self, io: &mut dyn AirInterface) -> Result<(), IoError> {
        if self.state == TxState::Idle {
            return Ok(());
        }

        if self.po_len == 0 {
            match self.state {
                TxState::Slot1 => {
                    self.create_data(Slot::One);
                    self.state = TxState::Cach2;
                }
                TxState::Cach2 => {
                    self.create_cach(Slot::Two, Slot::One);
                    self.state = TxState::Slot2;
                }
                TxState::Slot2 => {
                    self.create_data(Slot::Two);
                    self.state = TxState::Cach1;
                }
                TxState::Cal => self.create_cal(),
                _ => {
                    self.create_cach(Slot::One, Slot::Two);
                    self.state = TxState::Slot1;
                }
            }
        }

        if self.po_len > 0 {
            if !io.is_transmitting() {
                io.set_transmit(true);
            }

            let mut space = io.space();
            while space > SAMPLES_PER_BYTE {
                let byte = self.po_buffer[self.po_ptr];
                let mark = self.mark_buffer[self.po_ptr];
                self.po_ptr += 1;

                self.write_byte(io, byte, mark)?;

                space -= SAMPLES_PER_BYTE;

                if self.po_ptr >= self.po_len {
                    self.po_ptr = 0;
                    self.po_len = 0;
                    return Ok(());
                }
            }
        }

        Ok(())
    }

    /// Queue one data burst for a slot.
    ///
    /// The payload must be exactly one burst. On insufficient FIFO space the
    /// FIFO is reset and the write fails; data loss is explicit rather than
    /// partial. Starts the transmitter at slot 1 if it was idle.
    pub fn write_slot_data(&mut self, slot: Slot, data: &[u8]) -> Result<(), TxError> {
        if data.len() != DMR_FRAME_LENGTH_BYTES {
            return Err(TxError::IllegalLength);
        }

        let i = slot.index();
        if self.fifo[i].free_space() < DMR_FRAME_LENGTH_BYTES {
            warn!("slot {:?} transmit FIFO full, dropping queued bursts", slot);
            self.fifo[i].reset();
            return Err(TxError::RingFull);
        }

        if self.abort[i] {
            self.fifo[i].reset();
            self.abort[i] = false;
        }

        for &byte in data {
            self.fifo[i].put(byte);
        }

        if self.state == TxState::Idle {
            self.state = TxState::Slot1;
        }

        Ok(())
    }

    /// Stage a new short link control payload.
    ///
    /// Takes the 68 meaningful bits of a 9-byte payload and scatters them
    /// into the pending 12-byte broadcast buffer through the protocol
    /// interleave table. The result goes live at the next sub-channel
    /// cursor-0 swap, not immediately.
    pub fn write_short_lc(&mut self, data: &[u8]) -> Result<(), TxError> {
        if data.len() != 9 {
            return Err(TxError::IllegalLength);
        }

        self.new_short_lc = EMPTY_SHORT_LC;
        for (i, &pos) in CACH_INTERLEAVE.iter().enumerate() {
            let bit = read_bit(data, i);
            write_bit(&mut self.new_short_lc, pos, bit);
        }

        Ok(())
    }

    /// Flag a slot for abort. Takes effect on that slot's next burst
    /// construction; samples already queued are not recalled.
    pub fn write_abort(&mut self, selector: u8) -> Result<(), TxError> {
        let slot = Slot::from_selector(selector).ok_or(TxError::InvalidSlot)?;
        self.abort[slot.index()] = true;
        self.abort_count[slot.index()] = 0;
        Ok(())
    }

    /// Force the transmitter on (entering slot 1) or back to idle.
    pub fn set_start(&mut self, start: bool) {
        self.state = if start { TxState::Slot1 } else { TxState::Idle };

        self.frame_count = 0;
        self.abort = [false, false];
        self.abort_count = [0, 0];
    }

    /// Toggle calibration (test tone) transmission.
    pub fn set_cal(&mut self, on: bool) {
        self.state = if on { TxState::Cal } else { TxState::Idle };
    }

    /// Stamp the idle-burst template for a color code via the external
    /// slot-type encoder.
    pub fn set_color_code(&mut self, color_code: u8) {
        self.idle_template = IDLE_DATA;
        self.encoder
            .encode(color_code, DataType::Idle, &mut self.idle_template);
    }

    /// Fine 4FSK symbol-level trims; out-of-range values reset to zero.
    pub fn set_symbol_level_adjust(&mut self, level3_adj: i16, level1_adj: i16) {
        self.modulator.set_level_adjust(level3_adj, level1_adj);
    }

    /// CACH access-type suppression mode: 0 suppresses only when the receive
    /// slot's FIFO is empty; 1/2 additionally suppress that slot
    /// unconditionally; 3 suppresses both. Values above 3 fall back to 0.
    pub fn set_access_type_suppression(&mut self, mode: u8) {
        self.at_suppress = if mode > 3 { 0 } else { mode };
    }

    /// Free space in a slot's FIFO, in whole bursts.
    pub fn free_space(&self, slot: Slot) -> u16 {
        (self.fifo[slot.index()].free_space() / (DMR_FRAME_LENGTH_BYTES + 2)) as u16
    }

    /// Monotonic burst counter, incremented per sub-channel build.
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Build one data burst for `slot` into the output buffer.
    ///
    /// Real payload is drained only once the FIFO holds a full burst, the
    /// transmitter is past its startup ramp, and the slot's abort age has
    /// cleared the cool-down; otherwise the idle template is substituted and
    /// any pending abort for the slot is consumed, dropping its FIFO.
    fn create_data(&mut self, slot: Slot) {
        let i = slot.index();

        if self.fifo[i].occupied() >= DMR_FRAME_LENGTH_BYTES
            && self.frame_count >= STARTUP_COUNT
            && self.abort_count[i] >= ABORT_COUNT
        {
            for n in 0..DMR_FRAME_LENGTH_BYTES {
                self.po_buffer[n] = self.fifo[i].get().unwrap_or(0);
                self.mark_buffer[n] = SampleTag::None;
            }
        } else {
            if self.abort[i] {
                self.fifo[i].reset();
            }
            self.abort[i] = false;

            self.po_buffer.copy_from_slice(&self.idle_template);
            self.mark_buffer = [SampleTag::None; DMR_FRAME_LENGTH_BYTES];
        }

        self.po_len = DMR_FRAME_LENGTH_BYTES;
        self.po_ptr = 0;
    }

    /// Build one calibration burst: repeated start sync, a 1.2 kHz tone.
    fn create_cal(&mut self) {
        self.po_buffer = [DMR_START_SYNC; DMR_FRAME_LENGTH_BYTES];
        self.mark_buffer = [SampleTag::None; DMR_FRAME_LENGTH_BYTES];
        self.po_len = DMR_FRAME_LENGTH_BYTES;
        self.po_ptr = 0;
    }

    /// Build one CACH burst.
    ///
    /// `tx_slot` is the slot about to transmit, `rx_slot` the one being
    /// addressed by the access-type bit. The abort age counters deliberately
    /// advance here, in the sub-channel builder, and nowhere else: the data
    /// builder's cool-down is paced by CACH builds.
    fn create_cach(&mut self, tx_slot: Slot, rx_slot: Slot) {
        self.frame_count = self.frame_count.wrapping_add(1);
        self.abort_count[0] = self.abort_count[0].wrapping_add(1);
        self.abort_count[1] = self.abort_count[1].wrapping_add(1);

        if self.cach_ptr >= 12 {
            self.cach_ptr = 0;
        }

        if self.cach_ptr == 0 {
            if self.fifo[0].is_empty() && self.fifo[1].is_empty() {
                self.short_lc = EMPTY_SHORT_LC;
            } else {
                self.short_lc = self.new_short_lc;
            }
        }

        self.po_buffer[..DMR_CACH_LENGTH_BYTES]
            .copy_from_slice(&self.short_lc[self.cach_ptr..self.cach_ptr + 3]);
        self.mark_buffer[0] = SampleTag::None;
        self.mark_buffer[1] = SampleTag::None;
        self.mark_buffer[2] = match tx_slot {
            Slot::One => SampleTag::Slot1,
            Slot::Two => SampleTag::Slot2,
        };

        let mut at = false;
        if self.frame_count >= STARTUP_COUNT {
            let rx = rx_slot.index();
            let suppressed = self.at_suppress == 3 || self.at_suppress == rx as u8 + 1;
            if self.at_suppress == 0 || !suppressed {
                at = !self.fifo[rx].is_empty();
            }
        }

        let tc = tx_slot == Slot::Two;
        let mut ls0 = true; // for payload quarters 1 and 2
        let mut ls1 = true;

        if self.cach_ptr == 0 {
            // quarter 0
            ls1 = false;
        } else if self.cach_ptr == 9 {
            // quarter 3
            ls0 = false;
        }

        let h0 = at ^ tc ^ ls1;
        let h1 = tc ^ ls1 ^ ls0;
        let h2 = at ^ tc ^ ls0;

        if at {
            self.po_buffer[0] |= 0x80;
        }
        if tc {
            self.po_buffer[0] |= 0x08;
        }
        if ls1 {
            self.po_buffer[1] |= 0x80;
        }
        if ls0 {
            self.po_buffer[1] |= 0x08;
        }
        if h0 {
            self.po_buffer[1] |= 0x02;
        }
        if h1 {
            self.po_buffer[2] |= 0x20;
        }
        if h2 {
            self.po_buffer[2] |= 0x02;
        }

        self.po_len = DMR_CACH_LENGTH_BYTES;
        self.po_ptr = 0;

        self.cach_ptr += 3;
    }

    /// Modulate one output byte and hand the samples to the backend.
    fn write_byte(
        &mut self,
        io: &mut dyn AirInterface,
        byte: u8,
        mark: SampleTag,
    ) -> Result<(), IoError> {
        let mut samples = [0i16; SAMPLES_PER_BYTE];
        let mut tags = [SampleTag::None; SAMPLES_PER_BYTE];
        self.modulator.modulate_byte(byte, mark, &mut samples, &mut tags);
        io.write(&samples, &tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Encoder stamping a recognizable pattern so color-code changes are
    /// observable in tests.
    struct StampEncoder;

    impl SlotTypeEncoder for StampEncoder {
        fn encode(&self, color_code: u8, data_type: DataType, frame: &mut [u8]) {
            frame[12] = (color_code << 4) | data_type as u8;
        }
    }

    /// Backend sink with configurable space and captured output.
    struct MockAir {
        capacity: usize,
        samples: Vec<i16>,
        tags: Vec<SampleTag>,
        transmitting: bool,
    }

    impl MockAir {
        fn new(capacity: usize) -> Self {
            Self { capacity, samples: Vec::new(), tags: Vec::new(), transmitting: false }
        }

        fn drain(&mut self, n: usize) {
            let n = n.min(self.samples.len());
            self.samples.drain(..n);
            self.tags.drain(..n);
        }
    }

    impl AirInterface for MockAir {
        fn space(&self) -> usize {
            self.capacity - self.samples.len()
        }

        fn is_transmitting(&self) -> bool {
            self.transmitting
        }

        fn set_transmit(&mut self, on: bool) {
            self.transmitting = on;
        }

        fn write(&mut self, samples: &[i16], tags: &[SampleTag]) -> Result<(), IoError> {
            self.samples.extend_from_slice(samples);
            self.tags.extend_from_slice(tags);
            Ok(())
        }

        fn take_overflow(&mut self) -> bool {
            false
        }
    }

    fn new_tx() -> DmrTx {
        DmrTx::new(Box::new(StampEncoder))
    }

    fn frame(fill: u8) -> Vec<u8> {
        vec![fill; DMR_FRAME_LENGTH_BYTES]
    }

    #[test]
    fn test_state_cycle() {
        let mut tx = new_tx();
        let mut io = MockAir::new(100_000);

        assert_eq!(tx.state, TxState::Idle);
        tx.process(&mut io).unwrap();
        assert_eq!(tx.state, TxState::Idle);
        assert!(!io.transmitting);

        tx.set_start(true);
        assert_eq!(tx.state, TxState::Slot1);

        let expected = [
            TxState::Cach2,
            TxState::Slot2,
            TxState::Cach1,
            TxState::Slot1,
            TxState::Cach2,
            TxState::Slot2,
            TxState::Cach1,
            TxState::Slot1,
        ];
        for &next in &expected {
            tx.process(&mut io).unwrap();
            assert_eq!(tx.state, next);
        }
        assert!(io.transmitting);
    }

    #[test]
    fn test_idle_substituted_during_startup() {
        let mut tx = new_tx();
        let mut io = MockAir::new(100_000);

        tx.write_slot_data(Slot::One, &frame(0xAA)).unwrap();
        assert_eq!(tx.state, TxState::Slot1);
        assert!(tx.frame_count < STARTUP_COUNT);

        tx.process(&mut io).unwrap();
        // Queued data untouched: the idle template went out instead.
        assert_eq!(tx.fifo[0].occupied(), DMR_FRAME_LENGTH_BYTES);
        assert_eq!(io.samples.len(), DMR_FRAME_LENGTH_BYTES * SAMPLES_PER_BYTE);
    }

    #[test]
    fn test_data_drained_after_startup() {
        let mut tx = new_tx();
        let mut io = MockAir::new(100_000);

        tx.write_slot_data(Slot::One, &frame(0xAA)).unwrap();
        tx.frame_count = STARTUP_COUNT;
        tx.abort_count = [ABORT_COUNT, ABORT_COUNT];

        tx.process(&mut io).unwrap();
        assert_eq!(tx.fifo[0].occupied(), 0);
    }

    #[test]
    fn test_write_slot_data_length_contract() {
        let mut tx = new_tx();

        let before = tx.fifo[0].free_space();
        assert_eq!(
            tx.write_slot_data(Slot::One, &[0u8; 10]),
            Err(TxError::IllegalLength)
        );
        assert_eq!(tx.fifo[0].free_space(), before);

        tx.write_slot_data(Slot::One, &frame(1)).unwrap();
        assert_eq!(tx.fifo[0].free_space(), before - DMR_FRAME_LENGTH_BYTES);
        // 500-byte FIFO: one burst used, 13 whole frames left at the
        // (burst + 2) accounting granularity.
        assert_eq!(tx.free_space(Slot::One), 13);
    }

    #[test]
    fn test_write_slot_data_ring_full_resets() {
        let mut tx = new_tx();

        let mut writes = 0;
        loop {
            match tx.write_slot_data(Slot::Two, &frame(writes as u8)) {
                Ok(()) => writes += 1,
                Err(e) => {
                    assert_eq!(e, TxError::RingFull);
                    break;
                }
            }
            assert!(writes < 100, "FIFO never filled");
        }
        // Explicit, immediate data loss: the whole FIFO is dropped.
        assert_eq!(tx.fifo[1].occupied(), 0);
        assert_eq!(tx.fifo[0].occupied(), 0);
    }

    #[test]
    fn test_abort_selector_validation() {
        let mut tx = new_tx();
        assert_eq!(tx.write_abort(0), Err(TxError::InvalidSlot));
        assert_eq!(tx.write_abort(3), Err(TxError::InvalidSlot));
        assert_eq!(tx.write_abort(1), Ok(()));
        assert!(tx.abort[0]);
        assert_eq!(tx.abort_count[0], 0);
        assert_eq!(tx.write_abort(2), Ok(()));
        assert!(tx.abort[1]);
    }

    #[test]
    fn test_abort_substitutes_idle_and_resets_fifo() {
        let mut tx = new_tx();
        let mut io = MockAir::new(100_000);

        tx.write_slot_data(Slot::One, &frame(0xAA)).unwrap();
        tx.frame_count = STARTUP_COUNT;
        tx.abort_count = [ABORT_COUNT, ABORT_COUNT];
        tx.write_abort(1).unwrap();

        // Slot 1 build: abort age is back to zero, so the idle template goes
        // out, the FIFO is dropped and the abort flag is consumed.
        tx.process(&mut io).unwrap();
        assert_eq!(tx.fifo[0].occupied(), 0);
        assert!(!tx.abort[0]);
    }

    #[test]
    fn test_abort_cooldown_ages_out_via_cach_builds() {
        let mut tx = new_tx();
        let mut io = MockAir::new(100_000);

        tx.frame_count = STARTUP_COUNT;
        tx.abort_count = [ABORT_COUNT, ABORT_COUNT];
        tx.write_abort(1).unwrap();
        tx.state = TxState::Slot1;

        // New data after the abort replaces the dropped payload.
        tx.write_slot_data(Slot::One, &frame(0x77)).unwrap();

        // Each full TDMA cycle is four builds, two of them CACH. The abort
        // counter reaches ABORT_COUNT after three cycles.
        let mut drained_at = None;
        for cycle in 0..6 {
            for _ in 0..4 {
                tx.process(&mut io).unwrap();
            }
            if tx.fifo[0].occupied() == 0 {
                drained_at = Some(cycle);
                break;
            }
        }
        assert_eq!(drained_at, Some(3));
    }

    #[test]
    fn test_cach_bits_at_cursor_zero() {
        let mut tx = new_tx();
        tx.frame_count = STARTUP_COUNT;

        // Empty FIFOs, cursor 0: at=false, tc=true (slot 2 transmitting),
        // ls0=true, ls1=false -> h0=true, h1=false, h2=false.
        tx.create_cach(Slot::Two, Slot::One);
        assert_eq!(&tx.po_buffer[..3], &[0x08, 0x0A, 0x00]);
        assert_eq!(tx.mark_buffer[2], SampleTag::Slot2);
        assert_eq!(tx.po_len, DMR_CACH_LENGTH_BYTES);
        assert_eq!(tx.cach_ptr, 3);
    }

    #[test]
    fn test_cach_bits_at_cursor_nine() {
        let mut tx = new_tx();
        tx.frame_count = STARTUP_COUNT;

        for _ in 0..3 {
            tx.create_cach(Slot::Two, Slot::One);
            tx.po_len = 0;
        }
        assert_eq!(tx.cach_ptr, 9);

        // Cursor 9: ls0=false, ls1=true, at=false, tc=true
        // -> h0=false, h1=false, h2=true.
        tx.create_cach(Slot::Two, Slot::One);
        assert_eq!(&tx.po_buffer[..3], &[0x08, 0x80, 0x02]);
        assert_eq!(tx.cach_ptr, 12);

        // Next build wraps back to cursor 0.
        tx.create_cach(Slot::One, Slot::Two);
        assert_eq!(tx.cach_ptr, 3);
        assert_eq!(tx.mark_buffer[2], SampleTag::Slot1);
    }

    #[test]
    fn test_cach_access_type_bit() {
        let mut tx = new_tx();
        tx.frame_count = STARTUP_COUNT;
        tx.fifo[0].put(1);

        // Mode 0: AT set because the addressed (receive) slot has data.
        tx.create_cach(Slot::Two, Slot::One);
        assert_eq!(tx.po_buffer[0] & 0x80, 0x80);

        // Unconditional suppression for slot 1.
        tx.set_access_type_suppression(1);
        tx.po_len = 0;
        tx.create_cach(Slot::Two, Slot::One);
        assert_eq!(tx.po_buffer[0] & 0x80, 0x00);

        // Mode 3 suppresses both slots.
        tx.fifo[1].put(1);
        tx.set_access_type_suppression(3);
        tx.po_len = 0;
        tx.create_cach(Slot::One, Slot::Two);
        assert_eq!(tx.po_buffer[0] & 0x80, 0x00);

        // Out-of-range mode falls back to 0.
        tx.set_access_type_suppression(9);
        assert_eq!(tx.at_suppress, 0);
    }

    #[test]
    fn test_access_type_never_set_before_startup() {
        let mut tx = new_tx();
        tx.fifo[0].put(1);
        tx.create_cach(Slot::Two, Slot::One);
        assert_eq!(tx.po_buffer[0] & 0x80, 0x00);
    }

    #[test]
    fn test_short_lc_scatter() {
        let mut tx = new_tx();

        assert_eq!(tx.write_short_lc(&[0u8; 8]), Err(TxError::IllegalLength));

        // Every input bit must land exactly at its interleave position, and
        // no other bit may be set.
        let input = [0xA5u8, 0x0F, 0xF0, 0x55, 0xAA, 0x33, 0xCC, 0x0F, 0xF0];
        tx.write_short_lc(&input).unwrap();
        for (i, &pos) in CACH_INTERLEAVE.iter().enumerate() {
            assert_eq!(read_bit(&tx.new_short_lc, pos), read_bit(&input, i));
        }
        let scattered: Vec<usize> = CACH_INTERLEAVE.to_vec();
        for pos in 0..96 {
            if !scattered.contains(&pos) {
                assert!(!read_bit(&tx.new_short_lc, pos), "stray bit at {pos}");
            }
        }
    }

    #[test]
    fn test_short_lc_literal_positions() {
        let mut tx = new_tx();

        // Input bit 0 -> output bit 1.
        let mut input = [0u8; 9];
        input[0] = 0x80;
        tx.write_short_lc(&input).unwrap();
        assert_eq!(tx.new_short_lc[0], 0x40);

        // Input bit 67 -> output bit 95, the last payload bit.
        let mut input = [0u8; 9];
        input[8] = 0x10;
        tx.write_short_lc(&input).unwrap();
        assert_eq!(tx.new_short_lc[11], 0x01);
    }

    #[test]
    fn test_short_lc_commits_at_cursor_zero() {
        let mut tx = new_tx();
        tx.frame_count = STARTUP_COUNT;

        let input = [0xFFu8, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xF0];
        tx.write_short_lc(&input).unwrap();

        // Both FIFOs empty at cursor 0: the all-zero payload is broadcast.
        tx.create_cach(Slot::Two, Slot::One);
        assert_eq!(tx.short_lc, EMPTY_SHORT_LC);

        // With pending payload the staged short LC swaps in at the next
        // cursor-0 build.
        tx.fifo[0].put(1);
        tx.cach_ptr = 12;
        tx.po_len = 0;
        tx.create_cach(Slot::Two, Slot::One);
        assert_eq!(tx.short_lc, tx.new_short_lc);
        assert_ne!(tx.short_lc, EMPTY_SHORT_LC);
    }

    #[test]
    fn test_set_color_code_stamps_idle_template() {
        let mut tx = new_tx();
        assert_eq!(tx.idle_template, IDLE_DATA);

        tx.set_color_code(7);
        assert_eq!(tx.idle_template[12], (7 << 4) | DataType::Idle as u8);
        // Rest of the template untouched.
        assert_eq!(tx.idle_template[0], IDLE_DATA[0]);
        assert_eq!(tx.idle_template[32], IDLE_DATA[32]);
    }

    #[test]
    fn test_cal_state_repeats_tone_burst() {
        let mut tx = new_tx();
        let mut io = MockAir::new(100_000);

        tx.set_cal(true);
        assert_eq!(tx.state, TxState::Cal);

        tx.process(&mut io).unwrap();
        assert_eq!(tx.state, TxState::Cal);
        assert_eq!(io.samples.len(), DMR_FRAME_LENGTH_BYTES * SAMPLES_PER_BYTE);

        tx.set_cal(false);
        assert_eq!(tx.state, TxState::Idle);
    }

    #[test]
    fn test_output_backpressure() {
        let mut tx = new_tx();
        // Room for 24 byte-groups, then the drain loop must stop.
        let mut io = MockAir::new(500);

        tx.set_cal(true);
        tx.process(&mut io).unwrap();
        assert_eq!(io.samples.len(), 24 * SAMPLES_PER_BYTE);
        assert_eq!(tx.po_ptr, 24);
        assert_eq!(tx.po_len, DMR_FRAME_LENGTH_BYTES);

        // No new burst is built while the previous one is part-drained.
        io.drain(24 * SAMPLES_PER_BYTE);
        tx.process(&mut io).unwrap();
        assert_eq!(tx.po_len, 0);
        assert_eq!(io.samples.len(), 9 * SAMPLES_PER_BYTE);
    }

    #[test]
    fn test_slot_ordering_strictly_alternates() {
        let mut tx = new_tx();
        let mut io = MockAir::new(100_000);

        tx.frame_count = STARTUP_COUNT;
        tx.abort_count = [ABORT_COUNT, ABORT_COUNT];
        tx.write_slot_data(Slot::Two, &frame(0x22)).unwrap();
        tx.write_slot_data(Slot::One, &frame(0x11)).unwrap();

        // Regardless of arrival order, slot 1 drains on the Slot1 build and
        // slot 2 on the Slot2 build.
        tx.process(&mut io).unwrap(); // Slot1 data
        assert_eq!(tx.fifo[0].occupied(), 0);
        assert_eq!(tx.fifo[1].occupied(), DMR_FRAME_LENGTH_BYTES);
        tx.process(&mut io).unwrap(); // CACH
        tx.process(&mut io).unwrap(); // Slot2 data
        assert_eq!(tx.fifo[1].occupied(), 0);
    }
}
