//! Common utility functions for gesture capture
//!
//! - Wall-clock providers for stamping dataset records
//! - Gesture name normalization shared by the dataset and pipeline layers

pub mod time;

use crate::config::constants::acquisition::PERCENT_COMPLETE;

pub use time::{MockTimeProvider, SystemTimeProvider, TimeProvider};

/// Canonical collection name for a gesture: trimmed and uppercased
pub fn normalize_gesture_name(name: &str) -> String {
    name.trim().to_uppercase()
}

/// Integer percentage of `done` over `total`, clamped to 100
pub fn progress_percent(done: usize, total: usize) -> u8 {
    let full = PERCENT_COMPLETE as usize;
    if total == 0 {
        return PERCENT_COMPLETE;
    }
    (done.saturating_mul(full) / total).min(full) as u8
}
