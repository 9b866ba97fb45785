// src/acquisition/mod.rs
//! Dual-rate EMG/IMU acquisition
//!
//! - [`AcquisitionParams`]: duration, frequencies and derived sample targets
//! - [`DualRateSampler`]: fills the window on per-stream ticks
//! - [`CompletionMonitor`]: fires once both streams hit their targets
//! - [`start_acquisition`]: runs the above on a tokio task

pub mod buffer;
pub mod monitor;
pub mod params;
pub mod runner;
pub mod sampler;

pub use buffer::AcquisitionWindow;
pub use monitor::CompletionMonitor;
pub use params::{target_count, AcquisitionParams};
pub use runner::{start_acquisition, AcquisitionHandle};
pub use sampler::DualRateSampler;
