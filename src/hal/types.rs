// src/hal/types.rs
//! Core types for the wearable device session

use serde::{Deserialize, Serialize};

/// One EMG reading: raw channel values as last reported by the device
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmgSample {
    pub channels: Vec<f32>,
}

impl EmgSample {
    pub fn new(channels: Vec<f32>) -> Self {
        Self { channels }
    }

    /// Zero-valued reading used before the device has reported anything
    pub fn zeroed(channel_count: usize) -> Self {
        Self {
            channels: vec![0.0; channel_count],
        }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}

impl From<Vec<f32>> for EmgSample {
    fn from(channels: Vec<f32>) -> Self {
        Self { channels }
    }
}

/// One IMU reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImuSample {
    pub gyroscope: [f32; 3],
    pub acceleration: [f32; 3],
    /// Quaternion as `[x, y, z, w]`
    pub orientation: [f32; 4],
}

impl Default for ImuSample {
    fn default() -> Self {
        Self {
            gyroscope: [0.0; 3],
            acceleration: [0.0; 3],
            orientation: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl ImuSample {
    /// Gyroscope, acceleration and orientation concatenated in feature order
    pub fn feature_values(&self) -> impl Iterator<Item = f32> + '_ {
        self.gyroscope
            .iter()
            .chain(self.acceleration.iter())
            .chain(self.orientation.iter())
            .copied()
    }
}

/// Events pushed by the device to the connection worker
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEvent {
    Connected { name: String },
    Disconnected,
    Emg(EmgSample),
    Imu(ImuSample),
    Battery(u8),
}

/// Connection state of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkState {
    Disconnected,
    Connecting,
    Connected,
}

/// Device name and battery as shown to the user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceStatus {
    pub name: Option<String>,
    pub battery_percent: Option<u8>,
    pub link: LinkState,
}

impl std::fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = self.name.as_deref().unwrap_or("-");
        match self.battery_percent {
            Some(level) => write!(f, "Device: {} | Battery: {}% | {:?}", name, level, self.link),
            None => write!(f, "Device: {} | Battery: - | {:?}", name, self.link),
        }
    }
}
