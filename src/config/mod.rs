// src/config/mod.rs
//! Configuration management for acquisition, device, dataset and classifier

pub mod constants;
pub mod loader;

pub use constants::*;
pub use loader::{ConfigError, ConfigLoader};

use crate::acquisition::AcquisitionParams;
use crate::error::GestureResult;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Complete system configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SystemConfig {
    #[serde(default)]
    pub acquisition: AcquisitionSettings,
    #[serde(default)]
    pub device: DeviceSettings,
    #[serde(default)]
    pub dataset: DatasetSettings,
    #[serde(default)]
    pub classifier: ClassifierSettings,
}

/// Acquisition window settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AcquisitionSettings {
    #[serde(default = "defaults::duration_ms")]
    pub duration_ms: u32,

    #[serde(default = "defaults::emg_frequency_hz")]
    pub emg_frequency_hz: u32,

    #[serde(default = "defaults::imu_frequency_hz")]
    pub imu_frequency_hz: u32,

    #[serde(default = "defaults::poll_interval_ms")]
    pub poll_interval_ms: u64,
}

/// Device session settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DeviceSettings {
    #[serde(default = "defaults::emg_channel_count")]
    pub emg_channel_count: usize,

    #[serde(default = "defaults::connection_timeout_ms")]
    pub connection_timeout_ms: u64,

    #[serde(default = "defaults::event_poll_timeout_ms")]
    pub event_poll_timeout_ms: u64,
}

/// Dataset location settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DatasetSettings {
    #[serde(default = "defaults::dataset_root")]
    pub root: PathBuf,

    #[serde(default = "defaults::network_dir")]
    pub network_dir: PathBuf,
}

/// Classifier model settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ClassifierSettings {
    #[serde(default = "defaults::model_file")]
    pub model_file: String,

    /// Optional separate weights file for backends that split architecture and weights
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights_file: Option<String>,
}

/// Default value providers using constants
mod defaults {
    use crate::config::constants::*;
    use std::path::PathBuf;

    pub fn duration_ms() -> u32 { acquisition::DEFAULT_DURATION_MS }
    pub fn emg_frequency_hz() -> u32 { acquisition::DEFAULT_EMG_FREQUENCY_HZ }
    pub fn imu_frequency_hz() -> u32 { acquisition::DEFAULT_IMU_FREQUENCY_HZ }
    pub fn poll_interval_ms() -> u64 { acquisition::COMPLETION_POLL_INTERVAL_MS }

    pub fn emg_channel_count() -> usize { device::DEFAULT_EMG_CHANNEL_COUNT }
    pub fn connection_timeout_ms() -> u64 { device::DEFAULT_CONNECTION_TIMEOUT_MS }
    pub fn event_poll_timeout_ms() -> u64 { device::DEFAULT_EVENT_POLL_TIMEOUT_MS }

    pub fn dataset_root() -> PathBuf { PathBuf::from(dataset::DATASET_DIR) }
    pub fn network_dir() -> PathBuf { PathBuf::from(dataset::NETWORK_DIR) }

    pub fn model_file() -> String { classifier::DEFAULT_MODEL_FILE.to_string() }
}

impl Default for AcquisitionSettings {
    fn default() -> Self {
        Self {
            duration_ms: defaults::duration_ms(),
            emg_frequency_hz: defaults::emg_frequency_hz(),
            imu_frequency_hz: defaults::imu_frequency_hz(),
            poll_interval_ms: defaults::poll_interval_ms(),
        }
    }
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            emg_channel_count: defaults::emg_channel_count(),
            connection_timeout_ms: defaults::connection_timeout_ms(),
            event_poll_timeout_ms: defaults::event_poll_timeout_ms(),
        }
    }
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            root: defaults::dataset_root(),
            network_dir: defaults::network_dir(),
        }
    }
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            model_file: defaults::model_file(),
            weights_file: None,
        }
    }
}

impl AcquisitionSettings {
    /// Validated acquisition parameters for one window
    pub fn params(&self) -> GestureResult<AcquisitionParams> {
        AcquisitionParams::new(self.duration_ms, self.emg_frequency_hz, self.imu_frequency_hz)
            .map(|p| p.with_poll_interval(Duration::from_millis(self.poll_interval_ms)))
    }
}

impl DeviceSettings {
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_millis(self.connection_timeout_ms)
    }

    pub fn event_poll_timeout(&self) -> Duration {
        Duration::from_millis(self.event_poll_timeout_ms)
    }
}

/// Configuration utility functions
impl SystemConfig {
    /// Validate configuration consistency
    pub fn validate_consistency(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let acq = &self.acquisition;
        let mut timing_in_range = true;

        for (name, freq) in [("emg", acq.emg_frequency_hz), ("imu", acq.imu_frequency_hz)] {
            if !(acquisition::MIN_FREQUENCY_HZ..=acquisition::MAX_FREQUENCY_HZ).contains(&freq) {
                timing_in_range = false;
                errors.push(format!(
                    "{} frequency ({} Hz) must be within {}..={} Hz",
                    name, freq, acquisition::MIN_FREQUENCY_HZ, acquisition::MAX_FREQUENCY_HZ
                ));
            }
        }

        if acq.duration_ms == 0 || acq.duration_ms > acquisition::MAX_DURATION_MS {
            timing_in_range = false;
            errors.push(format!(
                "duration ({} ms) must be within 1..={} ms",
                acq.duration_ms, acquisition::MAX_DURATION_MS
            ));
        }

        // Ranges can be fine while a stream still rounds down to zero samples
        if timing_in_range {
            if let Err(e) = acq.params() {
                errors.push(e.to_string());
            }
        }

        if acq.poll_interval_ms == 0 {
            errors.push("poll interval must be greater than 0 ms".to_string());
        }

        if self.device.emg_channel_count == 0 || self.device.emg_channel_count > device::MAX_EMG_CHANNEL_COUNT {
            errors.push(format!(
                "emg channel count ({}) must be within 1..={}",
                self.device.emg_channel_count, device::MAX_EMG_CHANNEL_COUNT
            ));
        }

        if self.device.connection_timeout_ms == 0 {
            errors.push("connection timeout must be greater than 0 ms".to_string());
        }

        if self.classifier.model_file.trim().is_empty() {
            errors.push("classifier model file must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Width of one feature row for this configuration
    pub fn feature_row_width(&self) -> usize {
        self.device.emg_channel_count + device::IMU_ROW_WIDTH
    }

    /// Get configuration summary
    pub fn get_summary(&self) -> ConfigSummary {
        ConfigSummary {
            duration_ms: self.acquisition.duration_ms,
            emg_frequency_hz: self.acquisition.emg_frequency_hz,
            imu_frequency_hz: self.acquisition.imu_frequency_hz,
            emg_channel_count: self.device.emg_channel_count,
            feature_row_width: self.feature_row_width(),
            dataset_root: self.dataset.root.clone(),
        }
    }
}

/// Configuration summary for display/logging
#[derive(Debug, Clone, Serialize)]
pub struct ConfigSummary {
    pub duration_ms: u32,
    pub emg_frequency_hz: u32,
    pub imu_frequency_hz: u32,
    pub emg_channel_count: usize,
    pub feature_row_width: usize,
    pub dataset_root: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_creation() {
        let config = SystemConfig::default();
        assert_eq!(config.acquisition.duration_ms, acquisition::DEFAULT_DURATION_MS);
        assert_eq!(config.acquisition.emg_frequency_hz, 200);
        assert_eq!(config.acquisition.imu_frequency_hz, 200);
        assert_eq!(config.acquisition.poll_interval_ms, 100);
        assert!(config.validate_consistency().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = SystemConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: SystemConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.acquisition, deserialized.acquisition);
        assert_eq!(config.dataset, deserialized.dataset);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: SystemConfig = toml::from_str("[acquisition]\nduration_ms = 1500\n").unwrap();
        assert_eq!(config.acquisition.duration_ms, 1500);
        assert_eq!(config.acquisition.emg_frequency_hz, 200);
        assert_eq!(config.device.emg_channel_count, 8);
    }

    #[test]
    fn test_config_validation() {
        let mut config = SystemConfig::default();
        config.acquisition.emg_frequency_hz = 0;
        config.device.emg_channel_count = 0;

        let errors = config.validate_consistency().unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_zero_sample_window_rejected() {
        let mut config = SystemConfig::default();
        config.acquisition.duration_ms = 1;
        config.acquisition.emg_frequency_hz = 10;

        assert!(config.validate_consistency().is_err());
    }

    #[test]
    fn test_feature_row_width() {
        let config = SystemConfig::default();
        assert_eq!(config.feature_row_width(), 18);
        assert_eq!(config.get_summary().feature_row_width, 18);
    }
}
