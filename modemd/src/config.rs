//! TOML configuration for the modem daemon.
//!
//! Command-line arguments override anything loaded from the file; every
//! field carries a default so a missing or partial file still yields a
//! runnable configuration.

use serde::Deserialize;

/// Top-level daemon configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ModemConfig {
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub dmr: DmrConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Sample transport configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceConfig {
    /// Backend device arguments, `key=value` pairs separated by commas.
    /// Recognized keys: `tx_port`, `rx_port`, `gain`, `batch`.
    #[serde(default = "default_device_args")]
    pub device_args: String,
}

fn default_device_args() -> String {
    "tx_port=tcp://*:3800,rx_port=tcp://localhost:3801".to_string()
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            device_args: default_device_args(),
        }
    }
}

/// DMR air-interface parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct DmrConfig {
    /// Color code stamped into idle bursts (0-15).
    #[serde(default)]
    pub color_code: u8,
    /// Outer 4FSK symbol level trim, q15 counts.
    #[serde(default)]
    pub level3_adjust: i16,
    /// Inner 4FSK symbol level trim, q15 counts.
    #[serde(default)]
    pub level1_adjust: i16,
    /// CACH access-type suppression mode (0-3).
    #[serde(default)]
    pub at_suppression: u8,
}

impl Default for DmrConfig {
    fn default() -> Self {
        Self {
            color_code: 1,
            level3_adjust: 0,
            level1_adjust: 0,
            at_suppression: 0,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Default tracing filter when RUST_LOG is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl ModemConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: ModemConfig = toml::from_str(&contents)?;
        Ok(config)
    }
}
