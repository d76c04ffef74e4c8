//! Fixed-capacity ring buffers for the transmit/receive sample paths.
//!
//! One generic buffer backs the per-slot byte FIFOs, the outbound and inbound
//! sample queues and the RSSI queue. Capacity is fixed at construction; the
//! buffer is allocated once at modem initialization and never resized. A
//! `full` flag disambiguates `head == tail`, and a failed `put` latches a
//! sticky overflow flag instead of dropping data silently.

use crate::types::SampleTag;

/// Outbound/inbound sample queue: (sample, tag) pairs.
pub type SampleBuffer = RingBuffer<(i16, SampleTag)>;

/// Per-slot payload byte FIFO.
pub type ByteBuffer = RingBuffer<u8>;

/// Fixed-capacity single-producer/single-consumer circular buffer.
pub struct RingBuffer<T: Copy + Default> {
    buffer: Box<[T]>,
    head: usize,
    tail: usize,
    full: bool,
    overflow: bool,
}

impl<T: Copy + Default> RingBuffer<T> {
    /// Allocate a buffer holding up to `capacity` items.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "ring buffer capacity must be non-zero");
        Self {
            buffer: vec![T::default(); capacity].into_boxed_slice(),
            head: 0,
            tail: 0,
            full: false,
            overflow: false,
        }
    }

    /// Total capacity.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Number of free item slots.
    pub fn free_space(&self) -> usize {
        if self.tail == self.head {
            if self.full {
                0
            } else {
                self.buffer.len()
            }
        } else if self.tail < self.head {
            self.buffer.len() - self.head + self.tail
        } else {
            self.tail - self.head
        }
    }

    /// Number of items pending.
    pub fn occupied(&self) -> usize {
        self.buffer.len() - self.free_space()
    }

    /// True if no items are pending.
    pub fn is_empty(&self) -> bool {
        self.head == self.tail && !self.full
    }

    /// Append one item. Returns false and latches the overflow flag if the
    /// buffer is full.
    pub fn put(&mut self, item: T) -> bool {
        if self.full {
            self.overflow = true;
            return false;
        }

        self.buffer[self.head] = item;
        self.head += 1;
        if self.head >= self.buffer.len() {
            self.head = 0;
        }

        if self.head == self.tail {
            self.full = true;
        }

        true
    }

    /// Remove and return the oldest item, if any.
    pub fn get(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        let item = self.buffer[self.tail];
        self.full = false;
        self.tail += 1;
        if self.tail >= self.buffer.len() {
            self.tail = 0;
        }

        Some(item)
    }

    /// Drop all pending items and clear the full/overflow flags.
    pub fn reset(&mut self) {
        self.head = 0;
        self.tail = 0;
        self.full = false;
        self.overflow = false;
    }

    /// Return and clear the latched overflow flag.
    pub fn take_overflow(&mut self) -> bool {
        let overflow = self.overflow;
        self.overflow = false;
        overflow
    }
}
