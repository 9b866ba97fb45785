// src/hal/traits.rs
//! Core HAL traits for the device session

use crate::hal::types::{DeviceEvent, EmgSample, ImuSample};
use std::time::Duration;

/// Read side of a connected device, as seen by the acquisition pipeline
///
/// Readings are last-known-value snapshots. Two calls in a row return the
/// same value if the device has not pushed a new event in between.
pub trait DeviceSession: Send + Sync {
    fn is_connected(&self) -> bool;

    /// Latest EMG reading
    fn current_emg(&self) -> EmgSample;

    /// Latest IMU reading
    fn current_imu(&self) -> ImuSample;

    /// Device name (empty when unknown) and battery level if reported
    fn device_name_and_battery(&self) -> (String, Option<u8>);
}

/// Pull-style event pump driven by the connection worker
pub trait EventSource: Send {
    /// Wait up to `timeout` for the next device event
    fn poll_event(&mut self, timeout: Duration) -> Result<Option<DeviceEvent>, HalError>;

    /// Called once when the worker stops
    fn shutdown(&mut self) {}
}

/// Event source failures
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HalError {
    #[error("Device link lost: {0}")]
    LinkLost(String),
    #[error("Event source failure: {0}")]
    SourceFailure(String),
}
