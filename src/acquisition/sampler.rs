// src/acquisition/sampler.rs
//! Dual-rate sampler
//!
//! Each tick copies the session's current reading into the window. Ticks
//! arriving after a stream reached its target are ignored, so stream
//! lengths never exceed their targets.

use crate::acquisition::buffer::AcquisitionWindow;
use crate::acquisition::params::AcquisitionParams;
use crate::hal::DeviceSession;
use crate::utils::progress_percent;

#[derive(Debug, Clone, Copy)]
struct Countdown {
    remaining: usize,
    target: usize,
}

impl Countdown {
    fn new(target: usize) -> Self {
        Self {
            remaining: target,
            target,
        }
    }

    fn take(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }

    fn taken(&self) -> usize {
        self.target - self.remaining
    }
}

/// Fills one window from two independently timed streams
pub struct DualRateSampler {
    window: AcquisitionWindow,
    emg: Countdown,
    imu: Countdown,
}

impl DualRateSampler {
    pub fn new(params: &AcquisitionParams) -> Self {
        let emg_target = params.target_emg_count();
        let imu_target = params.target_imu_count();
        Self {
            window: AcquisitionWindow::with_capacity(emg_target, imu_target),
            emg: Countdown::new(emg_target),
            imu: Countdown::new(imu_target),
        }
    }

    pub fn emg_active(&self) -> bool {
        self.emg.remaining > 0
    }

    pub fn imu_active(&self) -> bool {
        self.imu.remaining > 0
    }

    /// Append the current EMG reading; returns the updated progress
    ///
    /// `None` when the EMG stream is already complete.
    pub fn on_emg_tick(&mut self, session: &dyn DeviceSession) -> Option<u8> {
        if !self.emg.take() {
            return None;
        }
        self.window.push_emg(session.current_emg());
        Some(self.progress())
    }

    /// Append the current IMU reading; false when the IMU stream is complete
    pub fn on_imu_tick(&mut self, session: &dyn DeviceSession) -> bool {
        if !self.imu.take() {
            return false;
        }
        self.window.push_imu(session.current_imu());
        true
    }

    /// Progress tracks the EMG stream
    pub fn progress(&self) -> u8 {
        progress_percent(self.emg.taken(), self.emg.target)
    }

    /// Stop both streams; later ticks are ignored
    pub fn stop_all(&mut self) {
        self.emg.remaining = 0;
        self.imu.remaining = 0;
    }

    pub fn window(&self) -> &AcquisitionWindow {
        &self.window
    }

    pub fn into_window(self) -> AcquisitionWindow {
        self.window
    }
}
