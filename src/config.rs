//! Startup configuration for the bridge.
//!
//! Loaded once from a JSON file, validated, then shared read-only with every
//! component. Nothing here is re-read at runtime.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use crate::core::{ChannelSet, TimestampFormat};
use crate::error::{BridgeError, Result};
use crate::hal::{Convention, Converter, PhysicalUnit, ReadyPolicy, WORD_BITS};

/// Collector endpoint the batches are posted to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub host: String,
    pub port: u16,
    pub path: String,
    pub timeout_ms: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            host: "192.168.1.100".to_string(),
            port: 8080,
            path: "/api/v1/signal".to_string(),
            timeout_ms: 5000,
        }
    }
}

impl EndpointConfig {
    pub fn url(&self) -> String {
        format!("http://{}:{}{}", self.host, self.port, self.path)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Converter wiring and electrical settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub cs_pin: u8,
    pub drdy_pin: u8,
    pub conversion_rate_hz: f64,
    pub reference_voltage: f64,
    pub gain: f64,
    pub resolution_bits: u32,
    pub ready_policy: ReadyPolicy,
    /// `None` waits on data-ready forever
    pub ready_timeout_ms: Option<u64>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            cs_pin: 5,
            drdy_pin: 18,
            conversion_rate_hz: 30_000.0,
            reference_voltage: 2.5,
            gain: 1.0,
            resolution_bits: 24,
            ready_policy: ReadyPolicy::PerChannel,
            ready_timeout_ms: Some(1000),
        }
    }
}

impl DeviceConfig {
    pub fn ready_timeout(&self) -> Option<Duration> {
        self.ready_timeout_ms.map(Duration::from_millis)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub points_per_packet: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            points_per_packet: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    pub convention: Convention,
    pub unit: PhysicalUnit,
    /// Added to every value at packet assembly, in `unit`
    pub display_offset: f64,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            convention: Convention::OffsetBinary,
            unit: PhysicalUnit::Microvolts,
            display_offset: 60.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WireConfig {
    pub timestamp_format: TimestampFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Device faults in a row before acquisition gives up
    pub max_consecutive_faults: u32,
    pub drain_poll_ms: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_consecutive_faults: 16,
            drain_poll_ms: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub endpoint: EndpointConfig,
    pub device: DeviceConfig,
    pub channels: Vec<String>,
    pub batch: BatchConfig,
    pub conversion: ConversionConfig,
    pub wire: WireConfig,
    pub runtime: RuntimeConfig,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            endpoint: EndpointConfig::default(),
            device: DeviceConfig::default(),
            channels: ["Fp1", "O1", "T3", "C3", "C4", "Pz", "Cz", "M1"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            batch: BatchConfig::default(),
            conversion: ConversionConfig::default(),
            wire: WireConfig::default(),
            runtime: RuntimeConfig::default(),
        }
    }
}

impl BridgeConfig {
    /// Read, parse and validate a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: BridgeConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject sizing and electrical settings that could only fail later
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| -> Result<()> { Err(BridgeError::Configuration(msg)) };

        if self.channels.is_empty() {
            return invalid("at least one channel label is required".into());
        }
        let mut seen = HashSet::new();
        for label in &self.channels {
            if label.trim().is_empty() {
                return invalid("channel labels must not be empty".into());
            }
            if !seen.insert(label.as_str()) {
                return invalid(format!("duplicate channel label '{}'", label));
            }
        }

        if self.batch.points_per_packet == 0 {
            return invalid("points_per_packet must be at least 1".into());
        }

        let device = &self.device;
        if !(device.conversion_rate_hz.is_finite() && device.conversion_rate_hz > 0.0) {
            return invalid(format!(
                "conversion_rate_hz must be positive, got {}",
                device.conversion_rate_hz
            ));
        }
        if !(device.reference_voltage.is_finite() && device.reference_voltage > 0.0) {
            return invalid(format!(
                "reference_voltage must be positive, got {}",
                device.reference_voltage
            ));
        }
        if !(device.gain.is_finite() && device.gain > 0.0) {
            return invalid(format!("gain must be positive, got {}", device.gain));
        }
        // Codes arrive right-aligned in a 24-bit device word
        if !(2..=WORD_BITS).contains(&device.resolution_bits) {
            return invalid(format!(
                "resolution_bits must be within 2..={}, got {}",
                WORD_BITS, device.resolution_bits
            ));
        }

        if self.endpoint.host.trim().is_empty() {
            return invalid("endpoint host must not be empty".into());
        }
        if !self.endpoint.path.starts_with('/') {
            return invalid(format!(
                "endpoint path must start with '/', got '{}'",
                self.endpoint.path
            ));
        }

        if self.runtime.max_consecutive_faults == 0 {
            return invalid("max_consecutive_faults must be at least 1".into());
        }

        Ok(())
    }

    pub fn channel_set(&self) -> ChannelSet {
        ChannelSet::from_labels(self.channels.iter().cloned())
    }

    pub fn converter(&self) -> Converter {
        Converter::new(
            self.device.reference_voltage,
            self.device.gain,
            self.device.resolution_bits,
            self.conversion.convention,
            self.conversion.unit,
        )
    }

    /// Sample sets per second after multiplexing
    pub fn effective_set_rate_hz(&self) -> f64 {
        self.device
            .ready_policy
            .effective_set_rate_hz(self.device.conversion_rate_hz, self.channels.len())
    }

    /// Assumed spacing between consecutive sample sets
    pub fn nominal_interval_ms(&self) -> f64 {
        1000.0 / self.effective_set_rate_hz()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = BridgeConfig::default();
        config.validate().unwrap();

        assert_eq!(config.channels.len(), 8);
        assert_eq!(config.batch.points_per_packet, 50);
        assert_eq!(config.endpoint.url(), "http://192.168.1.100:8080/api/v1/signal");
    }

    #[test]
    fn test_multiplexed_interval() {
        let config = BridgeConfig::default();
        // 30 kSPS shared by 8 channels
        assert!((config.effective_set_rate_hz() - 3750.0).abs() < 1e-9);
        assert!((config.nominal_interval_ms() - 1000.0 / 3750.0).abs() < 1e-12);

        let mut simultaneous = config.clone();
        simultaneous.device.ready_policy = ReadyPolicy::PerSampleSet;
        assert!((simultaneous.nominal_interval_ms() - 1000.0 / 30_000.0).abs() < 1e-12);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = BridgeConfig::from_json_str(
            r#"{ "channels": ["A", "B"], "batch": { "points_per_packet": 10 } }"#,
        )
        .unwrap();

        assert_eq!(config.channel_set().labels(), vec!["A", "B"]);
        assert_eq!(config.batch.points_per_packet, 10);
        assert_eq!(config.device.resolution_bits, 24);
        assert_eq!(config.wire.timestamp_format, TimestampFormat::Millis);
    }

    #[test]
    fn test_null_timeout_means_unbounded() {
        let config =
            BridgeConfig::from_json_str(r#"{ "device": { "ready_timeout_ms": null } }"#).unwrap();
        assert_eq!(config.device.ready_timeout(), None);
    }

    #[test]
    fn test_rejects_inconsistent_sizing() {
        let mut config = BridgeConfig::default();
        config.batch.points_per_packet = 0;
        assert!(matches!(config.validate(), Err(BridgeError::Configuration(_))));

        let mut config = BridgeConfig::default();
        config.channels.clear();
        assert!(config.validate().is_err());

        let mut config = BridgeConfig::default();
        config.channels[3] = "Fp1".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_electrical_settings() {
        let mut config = BridgeConfig::default();
        config.device.gain = 0.0;
        assert!(config.validate().is_err());

        let mut config = BridgeConfig::default();
        config.device.resolution_bits = 33;
        assert!(config.validate().is_err());

        let mut config = BridgeConfig::default();
        config.device.resolution_bits = 32;
        assert!(matches!(config.validate(), Err(BridgeError::Configuration(_))));

        let mut config = BridgeConfig::default();
        config.device.resolution_bits = 16;
        config.validate().unwrap();

        let mut config = BridgeConfig::default();
        config.endpoint.path = "api".into();
        assert!(config.validate().is_err());
    }
}
