//! Timer-interrupt I/O backend.
//!
//! Models the bare-metal arrangement: a hardware timer fires once per sample
//! period and its handler calls [`TimerIo::tick`]. The handler is the only
//! code that drains the outbound queue and fills the inbound queues, and it
//! runs to completion before the next tick, so the ring buffers need no
//! locking; `&mut self` encodes exactly that single-producer/single-consumer
//! split. Peripheral bring-up (clocks, pins, DAC/ADC registers) lives behind
//! [`RadioPort`] and is outside this crate.

use common::ring::{RingBuffer, SampleBuffer};
use common::SampleTag;

use crate::{AirInterface, IoError};

/// Silence level written to the DAC when the outbound queue runs dry.
pub const SILENCE: i16 = 0;

/// Default outbound queue length in samples.
pub const TX_BUFFER_LEN: usize = 500;

/// Default inbound queue length in samples.
pub const RX_BUFFER_LEN: usize = 600;

/// The narrow register boundary to the radio hardware.
pub trait RadioPort {
    /// Deliver one outbound sample to the DAC.
    fn write_dac(&mut self, sample: i16);

    /// Capture one inbound sample and the raw RSSI reading.
    fn read_adc(&mut self) -> (i16, u16);

    /// Drive the PTT line.
    fn set_ptt(&mut self, on: bool);
}

/// Interrupt-driven hardware backend.
pub struct TimerIo {
    tx_buffer: SampleBuffer,
    rx_buffer: SampleBuffer,
    rssi_buffer: RingBuffer<u16>,
    transmitting: bool,
    ptt_pending: Option<bool>,
    watchdog: u32,
}

impl TimerIo {
    pub fn new() -> Self {
        Self::with_capacity(TX_BUFFER_LEN, RX_BUFFER_LEN)
    }

    pub fn with_capacity(tx_len: usize, rx_len: usize) -> Self {
        Self {
            tx_buffer: SampleBuffer::new(tx_len),
            rx_buffer: SampleBuffer::new(rx_len),
            rssi_buffer: RingBuffer::new(rx_len),
            transmitting: false,
            ptt_pending: None,
            watchdog: 0,
        }
    }

    /// Service routine, invoked once per 1/24000 s from the timer interrupt.
    ///
    /// Pops exactly one outbound sample (substituting silence when the queue
    /// is empty), delivers it to the DAC, then captures one inbound sample
    /// and RSSI reading into the inbound queues.
    pub fn tick(&mut self, port: &mut dyn RadioPort) {
        if let Some(on) = self.ptt_pending.take() {
            port.set_ptt(on);
        }

        let (sample, _tag) = self.tx_buffer.get().unwrap_or((SILENCE, SampleTag::None));
        port.write_dac(sample);

        let (rx_sample, rssi) = port.read_adc();
        self.rx_buffer.put((rx_sample, SampleTag::None));
        self.rssi_buffer.put(rssi);

        self.watchdog = self.watchdog.wrapping_add(1);
    }

    /// Pop one inbound sample, if any.
    pub fn read(&mut self) -> Option<(i16, SampleTag)> {
        self.rx_buffer.get()
    }

    /// Pop one RSSI reading, if any.
    pub fn read_rssi(&mut self) -> Option<u16> {
        self.rssi_buffer.get()
    }

    /// Ticks serviced since start; a stalled value means the timer died.
    pub fn watchdog(&self) -> u32 {
        self.watchdog
    }

    /// Return and clear the inbound queue's latched overflow flag.
    pub fn take_rx_overflow(&mut self) -> bool {
        self.rx_buffer.take_overflow()
    }
}

impl Default for TimerIo {
    fn default() -> Self {
        Self::new()
    }
}

impl AirInterface for TimerIo {
    fn space(&self) -> usize {
        self.tx_buffer.free_space()
    }

    fn is_transmitting(&self) -> bool {
        self.transmitting
    }

    fn set_transmit(&mut self, on: bool) {
        self.transmitting = on;
        // The PTT line itself is a peripheral; defer to interrupt context.
        self.ptt_pending = Some(on);
    }

    fn write(&mut self, samples: &[i16], tags: &[SampleTag]) -> Result<(), IoError> {
        if samples.len() != tags.len() {
            return Err(IoError::LengthMismatch(samples.len(), tags.len()));
        }
        for (&sample, &tag) in samples.iter().zip(tags.iter()) {
            self.tx_buffer.put((sample, tag));
        }
        Ok(())
    }

    fn take_overflow(&mut self) -> bool {
        self.tx_buffer.take_overflow()
    }
}
