// src/dataset/record.rs
//! On-disk acquisition record
//!
//! ```json
//! {
//!   "timestamp": "07/03/24/14:05:09",
//!   "duration": 2000,
//!   "emg": { "frequency": 200, "data": [[...], ...] },
//!   "imu": { "frequency": 200, "data": [{"gyroscope": [...], "acceleration": [...], "orientation": [...]}, ...] }
//! }
//! ```

use crate::acquisition::{AcquisitionParams, AcquisitionWindow};
use crate::error::{GestureErrorBuilder, GestureResult, IntoGestureError};
use crate::hal::{EmgSample, ImuSample};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One stream of a persisted acquisition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamRecord<T> {
    pub frequency: u32,
    pub data: Vec<T>,
}

/// One persisted acquisition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionRecord {
    pub timestamp: String,
    /// Window length in milliseconds
    pub duration: u32,
    pub emg: StreamRecord<EmgSample>,
    pub imu: StreamRecord<ImuSample>,
}

impl AcquisitionRecord {
    pub fn new(timestamp: String, params: &AcquisitionParams, window: &AcquisitionWindow) -> Self {
        Self {
            timestamp,
            duration: params.duration_ms(),
            emg: StreamRecord {
                frequency: params.emg_frequency_hz(),
                data: window.emg().to_vec(),
            },
            imu: StreamRecord {
                frequency: params.imu_frequency_hz(),
                data: window.imu().to_vec(),
            },
        }
    }

    /// Acquisition parameters the record was captured with
    pub fn params(&self) -> GestureResult<AcquisitionParams> {
        AcquisitionParams::new(self.duration, self.emg.frequency, self.imu.frequency)
    }

    pub fn into_window(self) -> AcquisitionWindow {
        AcquisitionWindow::from_streams(self.emg.data, self.imu.data)
    }
}

/// Read a record written by the dataset writer
pub fn load_record(path: &Path) -> GestureResult<AcquisitionRecord> {
    let bytes = fs::read(path).storage_err("dataset", "read record", path)?;
    serde_json::from_slice(&bytes)
        .map_err(|e| GestureErrorBuilder::new("dataset", "parse record").storage(path, &e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_layout() {
        let params = AcquisitionParams::new(10, 200, 100).unwrap();
        let window = AcquisitionWindow::from_streams(
            vec![EmgSample::new(vec![1.0, -2.0]), EmgSample::new(vec![3.0, 4.0])],
            vec![ImuSample::default()],
        );
        let record = AcquisitionRecord::new("01/02/24/03:04:05".to_string(), &params, &window);
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["timestamp"], "01/02/24/03:04:05");
        assert_eq!(value["duration"], 10);
        assert_eq!(value["emg"]["frequency"], 200);
        assert_eq!(value["emg"]["data"][0], serde_json::json!([1.0, -2.0]));
        assert_eq!(value["imu"]["frequency"], 100);
        assert_eq!(value["imu"]["data"][0]["orientation"], serde_json::json!([0.0, 0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_params_from_record() {
        let params = AcquisitionParams::default();
        let record = AcquisitionRecord::new(String::new(), &params, &AcquisitionWindow::default());
        assert_eq!(record.params().unwrap(), params);
        assert!(record.into_window().is_empty());
    }
}
