//! DMR modem daemon.
//!
//! Wires the transmit pipeline to the ZMQ sample backend: bursts queued on
//! the per-slot FIFOs are framed, shaped and streamed out as 16-bit PCM at
//! 24 kHz. Without a host feeding payload the carrier transmits the idle
//! pattern; `--cal` substitutes the 1.2 kHz calibration tone.

mod config;
mod slot_type;

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use config::ModemConfig;
use interfaces::zmq_io::{ZmqIo, ZmqIoConfig};
use interfaces::AirInterface;
use modem::dmr::DmrTx;
use slot_type::PlainSlotType;

/// DMR modem daemon
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "dvmodem.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// ZMQ device arguments (e.g. "tx_port=tcp://*:3800,rx_port=tcp://localhost:3801,gain=5")
    #[arg(long)]
    device_args: Option<String>,

    /// Color code for locally generated idle bursts (0-15)
    #[arg(long)]
    color_code: Option<u8>,

    /// Transmit the calibration tone instead of the idle pattern
    #[arg(long)]
    cal: bool,
}

/// Drain pace for the transmit loop. Roughly 48 samples of air time at
/// 24 kHz, well inside the backend's buffering.
const LOOP_PERIOD: Duration = Duration::from_millis(2);

const STATS_PERIOD: Duration = Duration::from_secs(10);

fn main() -> Result<()> {
    let args = Args::parse();

    let config = if Path::new(&args.config).exists() {
        ModemConfig::from_toml_file(&args.config)?
    } else {
        ModemConfig::default()
    };

    let log_level = args.log_level.as_ref().unwrap_or(&config.log.level);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt().with_env_filter(env_filter).with_target(true).init();

    info!("Starting DMR modem daemon");
    info!("Configuration file: {}", args.config);

    let device_args = args
        .device_args
        .as_ref()
        .unwrap_or(&config.device.device_args);
    let zmq_config = ZmqIoConfig::from_device_args(device_args)?;
    info!("ZMQ configuration:");
    info!("  TX address: {}", zmq_config.tx_address);
    info!("  RX address: {}", zmq_config.rx_address);
    info!("  Batch: {} samples, gain x{}", zmq_config.batch_len, zmq_config.gain);

    let mut io = ZmqIo::new(zmq_config);
    io.start()?;

    let color_code = args.color_code.unwrap_or(config.dmr.color_code);
    let mut tx = DmrTx::new(Box::new(PlainSlotType));
    tx.set_color_code(color_code);
    tx.set_symbol_level_adjust(config.dmr.level3_adjust, config.dmr.level1_adjust);
    tx.set_access_type_suppression(config.dmr.at_suppression);

    info!("DMR configuration:");
    info!("  Color code: {}", color_code);
    info!(
        "  Symbol trims: outer {} inner {}",
        config.dmr.level3_adjust, config.dmr.level1_adjust
    );
    info!("  Access-type suppression: {}", config.dmr.at_suppression);

    if args.cal {
        info!("Calibration mode: transmitting 1.2 kHz tone");
        tx.set_cal(true);
    } else {
        tx.set_start(true);
    }

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = running.clone();
        ctrlc::set_handler(move || {
            running.store(false, Ordering::SeqCst);
        })?;
    }

    info!("Modem running");
    let mut last_stats = Instant::now();
    while running.load(Ordering::SeqCst) {
        if let Err(e) = tx.process(&mut io) {
            error!("Transmit backend error: {}", e);
            break;
        }

        if io.take_overflow() {
            warn!("Inbound sample buffer overflowed, samples lost");
        }
        // Inbound samples are not demodulated; keep the buffer moving.
        while io.read().is_some() {}
        while io.read_rssi().is_some() {}

        if last_stats.elapsed() >= STATS_PERIOD {
            info!("Bursts sent: {}", tx.frame_count());
            last_stats = Instant::now();
        }

        std::thread::sleep(LOOP_PERIOD);
    }

    info!("Shutting down");
    tx.set_start(false);
    io.stop();
    info!("Shutdown complete");
    Ok(())
}
