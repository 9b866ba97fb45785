//! Gesture-Core: dual-rate EMG/IMU acquisition for gesture datasets and classification
//!
//! This library captures fixed-length windows from a wearable armband that
//! streams EMG and IMU readings at different rates, and either stores them as
//! labelled training data or turns them into a feature matrix for a
//! pretrained classifier. It features:
//!
//! - A shared last-known-value device session fed by a background worker
//! - A dual-rate sampler with an exact-count completion monitor
//! - Deterministic EMG/IMU feature assembly
//! - Atomic JSON dataset records organised by gesture
//! - A classifier adapter mapping model output to a letter
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use gesture_core::acquisition::AcquisitionParams;
//! use gesture_core::dataset::DatasetStore;
//! use gesture_core::hal::{DeviceListener, SharedSession, SimulatedArmband, SimulatorConfig};
//! use gesture_core::pipeline::{GesturePipeline, NullObserver};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = Arc::new(SharedSession::new(8));
//!     let listener = DeviceListener::with_timeouts(
//!         Arc::clone(&session),
//!         Duration::from_secs(2),
//!         Duration::from_millis(500),
//!     );
//!     let _connection = listener.connect(SimulatedArmband::new(SimulatorConfig::default())?)?;
//!
//!     let store = DatasetStore::new("Dataset");
//!     store.bootstrap()?;
//!     store.create_gesture("a")?;
//!
//!     let pipeline = GesturePipeline::new(session, AcquisitionParams::default(), store, Arc::new(NullObserver));
//!     let pending = pipeline.record("A").await?;
//!     pipeline.save(&pending)?;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod acquisition;
pub mod classifier;
pub mod config;
pub mod dataset;
pub mod error;
pub mod features;
pub mod hal;
pub mod pipeline;
pub mod utils;

// Re-export commonly used types for convenience
pub use acquisition::{AcquisitionHandle, AcquisitionParams, AcquisitionWindow};
pub use classifier::{Classifier, ClassifierAdapter, Prediction, SharedClassifier};
pub use config::{ConfigLoader, SystemConfig};
pub use dataset::{AcquisitionRecord, DatasetStore, DatasetWriter};
pub use error::{ErrorKind, GestureError, GestureResult};
pub use features::{assemble_features, FeatureAssembler};
pub use hal::{DeviceSession, EmgSample, ImuSample, SharedSession};
pub use pipeline::{GesturePipeline, PipelineObserver};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn version_info() -> VersionInfo {
    let mut features = vec![
        "Shared device session".to_string(),
        "Dual-rate acquisition".to_string(),
        "Feature assembly".to_string(),
        "Gesture dataset storage".to_string(),
        "Classifier adapter".to_string(),
    ];
    if cfg!(feature = "onnx") {
        features.push("ONNX Runtime backend".to_string());
    }

    VersionInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: "Dual-rate EMG/IMU acquisition for gesture datasets and classification".to_string(),
        features,
    }
}

/// Library version information
#[derive(Debug, Clone)]
pub struct VersionInfo {
    /// Library name
    pub name: String,
    /// Version string
    pub version: String,
    /// Description
    pub description: String,
    /// List of features
    pub features: Vec<String>,
}
