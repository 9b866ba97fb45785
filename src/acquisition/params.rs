// src/acquisition/params.rs
//! Validated timing parameters for one acquisition window

use crate::config::constants::acquisition::{
    COMPLETION_POLL_INTERVAL_MS, DEFAULT_DURATION_MS, DEFAULT_EMG_FREQUENCY_HZ, DEFAULT_IMU_FREQUENCY_HZ,
    MAX_DURATION_MS, MAX_FREQUENCY_HZ, MILLISECONDS_PER_SECOND, MIN_FREQUENCY_HZ,
};
use crate::error::{GestureErrorBuilder, GestureResult};
use std::time::Duration;

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Duration and per-stream frequencies of one acquisition
///
/// Sample targets are whole numbers computed once, as
/// `duration_ms * frequency_hz / 1000` rounded down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcquisitionParams {
    duration_ms: u32,
    emg_frequency_hz: u32,
    imu_frequency_hz: u32,
    poll_interval: Duration,
}

impl AcquisitionParams {
    pub fn new(duration_ms: u32, emg_frequency_hz: u32, imu_frequency_hz: u32) -> GestureResult<Self> {
        let error = |reason: String| GestureErrorBuilder::new("acquisition", "configure").configuration(&reason);

        if duration_ms == 0 || duration_ms > MAX_DURATION_MS {
            return Err(error(format!(
                "duration ({} ms) must be within 1..={} ms",
                duration_ms, MAX_DURATION_MS
            )));
        }
        let frequencies = MIN_FREQUENCY_HZ..=MAX_FREQUENCY_HZ;
        if !frequencies.contains(&emg_frequency_hz) || !frequencies.contains(&imu_frequency_hz) {
            return Err(error(format!(
                "frequencies must be within {}..={} Hz (emg {} Hz, imu {} Hz)",
                MIN_FREQUENCY_HZ, MAX_FREQUENCY_HZ, emg_frequency_hz, imu_frequency_hz
            )));
        }

        let params = Self {
            duration_ms,
            emg_frequency_hz,
            imu_frequency_hz,
            poll_interval: Duration::from_millis(COMPLETION_POLL_INTERVAL_MS),
        };
        if params.target_emg_count() == 0 || params.target_imu_count() == 0 {
            return Err(error(format!(
                "{} ms at emg {} Hz / imu {} Hz yields an empty window",
                duration_ms, emg_frequency_hz, imu_frequency_hz
            )));
        }
        Ok(params)
    }

    /// Override the completion check interval; zero is ignored
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        if !interval.is_zero() {
            self.poll_interval = interval;
        }
        self
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    pub fn emg_frequency_hz(&self) -> u32 {
        self.emg_frequency_hz
    }

    pub fn imu_frequency_hz(&self) -> u32 {
        self.imu_frequency_hz
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn target_emg_count(&self) -> usize {
        target_count(self.duration_ms, self.emg_frequency_hz)
    }

    pub fn target_imu_count(&self) -> usize {
        target_count(self.duration_ms, self.imu_frequency_hz)
    }

    pub fn emg_period(&self) -> Duration {
        Duration::from_nanos(NANOS_PER_SECOND / self.emg_frequency_hz as u64)
    }

    pub fn imu_period(&self) -> Duration {
        Duration::from_nanos(NANOS_PER_SECOND / self.imu_frequency_hz as u64)
    }
}

impl Default for AcquisitionParams {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_DURATION_MS,
            emg_frequency_hz: DEFAULT_EMG_FREQUENCY_HZ,
            imu_frequency_hz: DEFAULT_IMU_FREQUENCY_HZ,
            poll_interval: Duration::from_millis(COMPLETION_POLL_INTERVAL_MS),
        }
    }
}

/// Number of samples a stream must hold for a window of `duration_ms`
pub fn target_count(duration_ms: u32, frequency_hz: u32) -> usize {
    (duration_ms as u64 * frequency_hz as u64 / MILLISECONDS_PER_SECOND) as usize
}
