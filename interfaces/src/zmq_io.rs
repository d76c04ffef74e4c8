//! ZMQ I/O backend for software-defined radio operation.
//!
//! Runs the same drain/fill logic as the timer backend, but on a dedicated
//! thread per direction: the tx thread batches outbound samples into fixed
//! 16-bit little-endian PCM messages on a PUSH socket, the rx thread fills
//! the inbound queues from a PULL socket. Each direction's ring buffer is
//! guarded by its own mutex, held only for the duration of a batch drain or
//! fill.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use common::ring::{RingBuffer, SampleBuffer};
use common::{SampleTag, SAMPLE_RATE};
use tracing::{debug, info, warn};

use crate::{AirInterface, IoError};

/// Default PUSH (transmit) bind address.
pub const DEFAULT_TX_ADDRESS: &str = "tcp://*:3800";

/// Default PULL (receive) connect address.
pub const DEFAULT_RX_ADDRESS: &str = "tcp://localhost:3801";

/// Samples per outbound message.
pub const DEFAULT_BATCH_LEN: usize = 720;

/// q15 baseband to 16-bit PCM gain.
pub const DEFAULT_GAIN: i16 = 5;

/// Placeholder signal-strength reading for channels with no RSSI source.
const RSSI_VALUE: u16 = 3;

/// ZMQ backend configuration
#[derive(Debug, Clone)]
pub struct ZmqIoConfig {
    /// Transmit stream bind address
    pub tx_address: String,
    /// Receive stream connect address
    pub rx_address: String,
    /// Samples per outbound message
    pub batch_len: usize,
    /// Output amplification applied per sample
    pub gain: i16,
    /// Outbound ring buffer length in samples
    pub tx_buffer_len: usize,
    /// Inbound ring buffer length in samples
    pub rx_buffer_len: usize,
}

impl Default for ZmqIoConfig {
    fn default() -> Self {
        Self {
            tx_address: DEFAULT_TX_ADDRESS.to_string(),
            rx_address: DEFAULT_RX_ADDRESS.to_string(),
            batch_len: DEFAULT_BATCH_LEN,
            gain: DEFAULT_GAIN,
            tx_buffer_len: 4800,
            rx_buffer_len: 4800,
        }
    }
}

impl ZmqIoConfig {
    /// Parse device arguments of the form `"key1=value1,key2=value2,..."`.
    /// Recognized keys: `tx_port`, `rx_port`, `gain`, `batch`.
    pub fn from_device_args(args: &str) -> Result<Self, IoError> {
        let mut config = Self::default();

        for pair in args.split(',') {
            let mut parts = pair.trim().splitn(2, '=');
            let (Some(key), Some(value)) = (parts.next(), parts.next()) else {
                continue;
            };
            let (key, value) = (key.trim(), value.trim());

            match key {
                "tx_port" => config.tx_address = value.to_string(),
                "rx_port" => config.rx_address = value.to_string(),
                "gain" => {
                    config.gain = value
                        .parse::<i16>()
                        .map_err(|_| IoError::InvalidConfig(format!("invalid gain: {value}")))?;
                }
                "batch" => {
                    config.batch_len = value
                        .parse::<usize>()
                        .map_err(|_| IoError::InvalidConfig(format!("invalid batch: {value}")))?;
                }
                _ => debug!("ignoring unknown device argument {key}"),
            }
        }

        if config.batch_len == 0 {
            return Err(IoError::InvalidConfig("batch must be non-zero".to_string()));
        }

        Ok(config)
    }
}

struct Shared {
    tx_buffer: Mutex<SampleBuffer>,
    rx_buffer: Mutex<SampleBuffer>,
    rssi_buffer: Mutex<RingBuffer<u16>>,
    transmitting: AtomicBool,
    running: AtomicBool,
}

/// Threaded SDR hardware backend.
pub struct ZmqIo {
    config: ZmqIoConfig,
    shared: Arc<Shared>,
    tx_handle: Option<JoinHandle<()>>,
    rx_handle: Option<JoinHandle<()>>,
}

impl ZmqIo {
    pub fn new(config: ZmqIoConfig) -> Self {
        let shared = Arc::new(Shared {
            tx_buffer: Mutex::new(SampleBuffer::new(config.tx_buffer_len)),
            rx_buffer: Mutex::new(SampleBuffer::new(config.rx_buffer_len)),
            rssi_buffer: Mutex::new(RingBuffer::new(config.rx_buffer_len)),
            transmitting: AtomicBool::new(false),
            running: AtomicBool::new(false),
        });
        Self { config, shared, tx_handle: None, rx_handle: None }
    }

    /// Bind the transmit stream, connect the receive stream and spawn the
    /// two service threads.
    pub fn start(&mut self) -> Result<(), IoError> {
        info!("starting ZMQ I/O backend");
        info!("tx stream: {} (PUSH bind)", self.config.tx_address);
        info!("rx stream: {} (PULL connect)", self.config.rx_address);

        let tx_context = zmq::Context::new();
        let tx_socket = tx_context.socket(zmq::PUSH)?;
        tx_socket.bind(&self.config.tx_address)?;

        let rx_context = zmq::Context::new();
        let rx_socket = rx_context.socket(zmq::PULL)?;
        rx_socket.connect(&self.config.rx_address)?;
        rx_socket.set_rcvtimeo(100)?;

        self.shared.running.store(true, Ordering::SeqCst);

        let shared = Arc::clone(&self.shared);
        let batch_len = self.config.batch_len;
        let gain = self.config.gain;
        self.tx_handle = Some(std::thread::spawn(move || {
            tx_thread(shared, tx_socket, batch_len, gain);
        }));

        let shared = Arc::clone(&self.shared);
        self.rx_handle = Some(std::thread::spawn(move || {
            rx_thread(shared, rx_socket);
        }));

        Ok(())
    }

    /// Stop both service threads and wait for them to exit.
    pub fn stop(&mut self) {
        if !self.shared.running.swap(false, Ordering::SeqCst) {
            return;
        }
        if let Some(handle) = self.tx_handle.take() {
            let _ = handle.join();
        }
        if let Some(handle) = self.rx_handle.take() {
            let _ = handle.join();
        }
        info!("ZMQ I/O backend stopped");
    }

    /// Pop one inbound sample, if any.
    pub fn read(&self) -> Option<(i16, SampleTag)> {
        self.shared.rx_buffer.lock().unwrap().get()
    }

    /// Pop one RSSI reading, if any.
    pub fn read_rssi(&self) -> Option<u16> {
        self.shared.rssi_buffer.lock().unwrap().get()
    }

    /// Number of inbound samples pending.
    pub fn rx_occupied(&self) -> usize {
        self.shared.rx_buffer.lock().unwrap().occupied()
    }
}

impl Drop for ZmqIo {
    fn drop(&mut self) {
        self.stop();
    }
}

impl AirInterface for ZmqIo {
    fn space(&self) -> usize {
        self.shared.tx_buffer.lock().unwrap().free_space()
    }

    fn is_transmitting(&self) -> bool {
        self.shared.transmitting.load(Ordering::SeqCst)
    }

    fn set_transmit(&mut self, on: bool) {
        let was = self.shared.transmitting.swap(on, Ordering::SeqCst);
        if was != on {
            info!("transmit {}", if on { "on" } else { "off" });
        }
    }

    fn write(&mut self, samples: &[i16], tags: &[SampleTag]) -> Result<(), IoError> {
        if samples.len() != tags.len() {
            return Err(IoError::LengthMismatch(samples.len(), tags.len()));
        }
        let mut tx = self.shared.tx_buffer.lock().unwrap();
        for (&sample, &tag) in samples.iter().zip(tags.iter()) {
            tx.put((sample, tag));
        }
        Ok(())
    }

    fn take_overflow(&mut self) -> bool {
        self.shared.tx_buffer.lock().unwrap().take_overflow()
    }
}

/// Drain the outbound ring into fixed-length PCM messages at the sample-rate
/// cadence.
fn tx_thread(shared: Arc<Shared>, socket: zmq::Socket, batch_len: usize, gain: i16) {
    let batch_period =
        Duration::from_micros(batch_len as u64 * 1_000_000 / SAMPLE_RATE as u64);
    let mut pending: Vec<i16> = Vec::with_capacity(batch_len * 2);

    while shared.running.load(Ordering::SeqCst) {
        {
            let mut tx = shared.tx_buffer.lock().unwrap();
            while let Some((sample, _tag)) = tx.get() {
                pending.push(sample.saturating_mul(gain));
            }
        }

        if pending.len() < batch_len {
            // Nothing to send yet; idle briefly rather than busy-spin.
            std::thread::sleep(Duration::from_micros(20));
            continue;
        }

        while pending.len() >= batch_len {
            let mut bytes = Vec::with_capacity(batch_len * 2);
            for sample in pending.drain(..batch_len) {
                bytes.extend_from_slice(&sample.to_le_bytes());
            }

            match socket.send(&bytes, zmq::DONTWAIT) {
                Ok(()) => debug!("tx: sent {} samples", batch_len),
                Err(zmq::Error::EAGAIN) => warn!("tx: channel backpressure, batch dropped"),
                Err(e) => {
                    warn!("tx: send failed: {e}");
                    break;
                }
            }

            // Pace output at the air-interface rate.
            std::thread::sleep(batch_period);
        }
    }
}

/// Fill the inbound rings from the receive stream.
fn rx_thread(shared: Arc<Shared>, socket: zmq::Socket) {
    while shared.running.load(Ordering::SeqCst) {
        let msg = match socket.recv_bytes(0) {
            Ok(msg) => msg,
            Err(zmq::Error::EAGAIN) => continue,
            Err(e) => {
                warn!("rx: receive failed: {e}");
                continue;
            }
        };

        let mut rx = shared.rx_buffer.lock().unwrap();
        let mut rssi = shared.rssi_buffer.lock().unwrap();
        for chunk in msg.chunks_exact(2) {
            let sample = i16::from_le_bytes([chunk[0], chunk[1]]);
            rx.put((sample, SampleTag::None));
            rssi.put(RSSI_VALUE);
        }
        debug!("rx: captured {} samples", msg.len() / 2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_args_parsing() {
        let config = ZmqIoConfig::from_device_args(
            "tx_port=tcp://*:4600, rx_port=tcp://localhost:4601, gain=3, batch=240",
        )
        .unwrap();
        assert_eq!(config.tx_address, "tcp://*:4600");
        assert_eq!(config.rx_address, "tcp://localhost:4601");
        assert_eq!(config.gain, 3);
        assert_eq!(config.batch_len, 240);
    }

    #[test]
    fn test_device_args_defaults_and_errors() {
        let config = ZmqIoConfig::from_device_args("").unwrap();
        assert_eq!(config.tx_address, DEFAULT_TX_ADDRESS);
        assert_eq!(config.batch_len, DEFAULT_BATCH_LEN);

        assert!(ZmqIoConfig::from_device_args("gain=loud").is_err());
        assert!(ZmqIoConfig::from_device_args("batch=0").is_err());
    }

    #[test]
    fn test_loopback_batch() {
        let config = ZmqIoConfig {
            tx_address: "tcp://127.0.0.1:38917".to_string(),
            rx_address: "tcp://127.0.0.1:38918".to_string(),
            batch_len: 240,
            gain: 2,
            ..Default::default()
        };

        // Peer sockets standing in for the channel simulator.
        let peer = zmq::Context::new();
        let pull = peer.socket(zmq::PULL).unwrap();
        pull.connect("tcp://127.0.0.1:38917").unwrap();
        pull.set_rcvtimeo(5000).unwrap();
        let push = peer.socket(zmq::PUSH).unwrap();
        push.bind("tcp://127.0.0.1:38918").unwrap();

        let mut io = ZmqIo::new(config);
        io.start().unwrap();

        // Outbound: one full batch, amplified by the configured gain.
        let samples: Vec<i16> = (0..240).map(|i| i as i16).collect();
        let tags = vec![SampleTag::None; 240];
        io.write(&samples, &tags).unwrap();

        let msg = pull.recv_bytes(0).unwrap();
        assert_eq!(msg.len(), 240 * 2);
        let first = i16::from_le_bytes([msg[0], msg[1]]);
        let last = i16::from_le_bytes([msg[478], msg[479]]);
        assert_eq!(first, 0);
        assert_eq!(last, 478); // 239 * gain

        // Inbound: a short PCM message lands in the rx ring.
        let inbound: Vec<u8> = [100i16, -100]
            .iter()
            .flat_map(|s| s.to_le_bytes())
            .collect();
        push.send(&inbound, 0).unwrap();
        for _ in 0..50 {
            if io.rx_occupied() >= 2 {
                break;
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        assert_eq!(io.read(), Some((100, SampleTag::None)));
        assert_eq!(io.read(), Some((-100, SampleTag::None)));
        assert_eq!(io.read_rssi(), Some(RSSI_VALUE));

        io.stop();
    }
}
