// src/features/assembler.rs
//! Window-to-matrix feature assembly
//!
//! Row `i` of the matrix is the `i`-th EMG sample followed by the `i`-th IMU
//! sample's gyroscope, acceleration and orientation. Only the first
//! `nr_samples` rows are used, where `nr_samples` follows the EMG frequency.

use crate::acquisition::{target_count, AcquisitionParams, AcquisitionWindow};
use crate::config::constants::device::IMU_ROW_WIDTH;
use crate::error::{GestureErrorBuilder, GestureResult};
use ndarray::Array2;
use tracing::trace;

const COMPONENT: &str = "feature_assembler";

/// Width of one feature row for the given EMG width
pub fn row_width(emg_width: usize) -> usize {
    emg_width + IMU_ROW_WIDTH
}

/// Builds the classifier input matrix from a completed window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureAssembler {
    nr_samples: usize,
}

impl FeatureAssembler {
    pub fn new(emg_frequency_hz: u32, duration_ms: u32) -> Self {
        Self {
            nr_samples: target_count(duration_ms, emg_frequency_hz),
        }
    }

    pub fn from_params(params: &AcquisitionParams) -> Self {
        Self::new(params.emg_frequency_hz(), params.duration_ms())
    }

    pub fn nr_samples(&self) -> usize {
        self.nr_samples
    }

    /// `nr_samples x (emg_width + 10)` matrix
    ///
    /// Fails with `MalformedAcquisition` when either stream is shorter than
    /// `nr_samples` or the EMG readings do not share one width.
    pub fn assemble(&self, window: &AcquisitionWindow) -> GestureResult<Array2<f32>> {
        let error = || GestureErrorBuilder::new(COMPONENT, "assemble");
        let n = self.nr_samples;

        if n == 0 {
            return Err(error().malformed("window covers no samples", "at least 1 row", 0));
        }
        if window.emg_len() < n {
            return Err(error().malformed("emg stream too short", n, window.emg_len()));
        }
        if window.imu_len() < n {
            return Err(error().malformed("imu stream too short", n, window.imu_len()));
        }

        let emg = &window.emg()[..n];
        let imu = &window.imu()[..n];
        let emg_width = emg[0].channel_count();
        if emg_width == 0 {
            return Err(error().malformed("emg samples carry no channels", "at least 1 channel", 0));
        }
        if let Some((row, sample)) = emg.iter().enumerate().find(|(_, s)| s.channel_count() != emg_width) {
            return Err(error().malformed(
                &format!("emg sample {} has a different width", row),
                emg_width,
                sample.channel_count(),
            ));
        }

        let width = row_width(emg_width);
        let mut data = Vec::with_capacity(n * width);
        for (e, i) in emg.iter().zip(imu) {
            data.extend_from_slice(&e.channels);
            data.extend(i.feature_values());
        }
        trace!(rows = n, width, "features assembled");

        Array2::from_shape_vec((n, width), data)
            .map_err(|e| error().malformed(&e.to_string(), n * width, "mismatched buffer"))
    }
}

/// Assemble features for a window captured at `emg_frequency_hz` over `duration_ms`
pub fn assemble_features(
    window: &AcquisitionWindow,
    emg_frequency_hz: u32,
    duration_ms: u32,
) -> GestureResult<Array2<f32>> {
    FeatureAssembler::new(emg_frequency_hz, duration_ms).assemble(window)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::hal::{EmgSample, ImuSample};

    fn imu(seed: f32) -> ImuSample {
        ImuSample {
            gyroscope: [seed, seed + 1.0, seed + 2.0],
            acceleration: [seed + 3.0, seed + 4.0, seed + 5.0],
            orientation: [seed + 6.0, seed + 7.0, seed + 8.0, seed + 9.0],
        }
    }

    #[test]
    fn test_row_layout() {
        let window = AcquisitionWindow::from_streams(
            vec![EmgSample::new(vec![1.0, 2.0]), EmgSample::new(vec![3.0, 4.0])],
            vec![imu(10.0), imu(20.0)],
        );
        let features = assemble_features(&window, 2, 1000).unwrap();

        assert_eq!(features.dim(), (2, 12));
        let expected_first: Vec<f32> = vec![1.0, 2.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0, 17.0, 18.0, 19.0];
        assert_eq!(features.row(0).to_vec(), expected_first);
        assert_eq!(features[[1, 0]], 3.0);
        assert_eq!(features[[1, 2]], 20.0);
        assert_eq!(features[[1, 11]], 29.0);
    }

    #[test]
    fn test_extra_samples_are_ignored() {
        let window = AcquisitionWindow::from_streams(
            vec![EmgSample::new(vec![1.0]); 5],
            vec![ImuSample::default(); 7],
        );
        let features = assemble_features(&window, 3, 1000).unwrap();
        assert_eq!(features.dim(), (3, 11));
    }

    #[test]
    fn test_short_imu_stream_is_malformed() {
        let window = AcquisitionWindow::from_streams(
            vec![EmgSample::new(vec![1.0]); 4],
            vec![ImuSample::default(); 3],
        );
        let err = assemble_features(&window, 4, 1000).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedAcquisition);
    }

    #[test]
    fn test_ragged_emg_is_malformed() {
        let window = AcquisitionWindow::from_streams(
            vec![EmgSample::new(vec![1.0, 2.0]), EmgSample::new(vec![1.0])],
            vec![ImuSample::default(); 2],
        );
        let err = assemble_features(&window, 2, 1000).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedAcquisition);
    }

    #[test]
    fn test_zero_rows_is_malformed() {
        let window = AcquisitionWindow::default();
        let err = assemble_features(&window, 200, 2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedAcquisition);
    }
}
