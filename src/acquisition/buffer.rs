// src/acquisition/buffer.rs
//! Append-only storage for one acquisition window

use crate::hal::{EmgSample, ImuSample};

/// Samples collected during one acquisition
///
/// Written only by the sampler while the acquisition runs; handed over by
/// value once the completion monitor fires.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AcquisitionWindow {
    emg: Vec<EmgSample>,
    imu: Vec<ImuSample>,
}

impl AcquisitionWindow {
    pub fn with_capacity(emg: usize, imu: usize) -> Self {
        Self {
            emg: Vec::with_capacity(emg),
            imu: Vec::with_capacity(imu),
        }
    }

    /// Rebuild a window from previously captured streams
    pub fn from_streams(emg: Vec<EmgSample>, imu: Vec<ImuSample>) -> Self {
        Self { emg, imu }
    }

    pub(crate) fn push_emg(&mut self, sample: EmgSample) {
        self.emg.push(sample);
    }

    pub(crate) fn push_imu(&mut self, sample: ImuSample) {
        self.imu.push(sample);
    }

    pub fn emg(&self) -> &[EmgSample] {
        &self.emg
    }

    pub fn imu(&self) -> &[ImuSample] {
        &self.imu
    }

    pub fn emg_len(&self) -> usize {
        self.emg.len()
    }

    pub fn imu_len(&self) -> usize {
        self.imu.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emg.is_empty() && self.imu.is_empty()
    }

    pub fn into_streams(self) -> (Vec<EmgSample>, Vec<ImuSample>) {
        (self.emg, self.imu)
    }
}
