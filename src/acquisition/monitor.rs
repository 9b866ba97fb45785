// src/acquisition/monitor.rs
//! Completion monitor

use crate::acquisition::buffer::AcquisitionWindow;
use crate::acquisition::params::AcquisitionParams;

/// Detects the first moment both streams reached their targets
#[derive(Debug, Clone)]
pub struct CompletionMonitor {
    target_emg: usize,
    target_imu: usize,
    fired: bool,
}

impl CompletionMonitor {
    pub fn new(params: &AcquisitionParams) -> Self {
        Self {
            target_emg: params.target_emg_count(),
            target_imu: params.target_imu_count(),
            fired: false,
        }
    }

    pub fn is_complete(&self, window: &AcquisitionWindow) -> bool {
        window.emg_len() == self.target_emg && window.imu_len() == self.target_imu
    }

    /// True exactly once, on the first check that sees a complete window
    pub fn check(&mut self, window: &AcquisitionWindow) -> bool {
        if self.fired || !self.is_complete(window) {
            return false;
        }
        self.fired = true;
        true
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{EmgSample, ImuSample};

    fn window(emg: usize, imu: usize) -> AcquisitionWindow {
        AcquisitionWindow::from_streams(vec![EmgSample::zeroed(8); emg], vec![ImuSample::default(); imu])
    }

    #[test]
    fn test_requires_both_streams() {
        let mut monitor = CompletionMonitor::new(&AcquisitionParams::default());
        assert!(!monitor.check(&window(400, 399)));
        assert!(!monitor.check(&window(399, 400)));
        assert!(!monitor.has_fired());
    }

    #[test]
    fn test_fires_once() {
        let mut monitor = CompletionMonitor::new(&AcquisitionParams::default());
        let full = window(400, 400);
        assert!(monitor.check(&full));
        assert!(!monitor.check(&full));
        assert!(monitor.has_fired());
        assert!(monitor.is_complete(&full));
    }
}
