// src/dataset/writer.rs
//! Atomic record persistence
//!
//! Records are written to a temporary file inside the gesture collection
//! and renamed to `<uuid>.json` once fully flushed, so a collection never
//! holds a partial record.

use crate::acquisition::{AcquisitionParams, AcquisitionWindow};
use crate::config::constants::dataset::RECORD_EXTENSION;
use crate::dataset::record::AcquisitionRecord;
use crate::error::{GestureErrorBuilder, GestureResult, IntoGestureError};
use crate::utils::{normalize_gesture_name, SystemTimeProvider, TimeProvider};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::info;
use uuid::Uuid;

const COMPONENT: &str = "dataset_writer";

/// Writes completed windows into gesture collections
#[derive(Clone)]
pub struct DatasetWriter {
    root: PathBuf,
    clock: Arc<dyn TimeProvider>,
}

impl DatasetWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_clock(root, Arc::new(SystemTimeProvider))
    }

    pub fn with_clock(root: impl Into<PathBuf>, clock: Arc<dyn TimeProvider>) -> Self {
        Self {
            root: root.into(),
            clock,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist a complete window under `gesture`; returns the record path
    pub fn save(
        &self,
        gesture: &str,
        window: &AcquisitionWindow,
        params: &AcquisitionParams,
    ) -> GestureResult<PathBuf> {
        let error = || GestureErrorBuilder::new(COMPONENT, "save");
        let name = normalize_gesture_name(gesture);
        let collection = self.root.join(&name);
        if name.is_empty() || !collection.is_dir() {
            return Err(error().gesture_not_found(&name));
        }

        if window.emg_len() != params.target_emg_count() {
            return Err(error().malformed(
                "incomplete emg stream",
                params.target_emg_count(),
                window.emg_len(),
            ));
        }
        if window.imu_len() != params.target_imu_count() {
            return Err(error().malformed(
                "incomplete imu stream",
                params.target_imu_count(),
                window.imu_len(),
            ));
        }

        let record = AcquisitionRecord::new(self.clock.record_timestamp(), params, window);
        let bytes = serde_json::to_vec(&record)
            .map_err(|e| error().storage(&collection, &format!("serialize record: {}", e)))?;

        let mut file = NamedTempFile::new_in(&collection).storage_err(COMPONENT, "create temp file", &collection)?;
        file.write_all(&bytes).storage_err(COMPONENT, "write record", file.path())?;
        file.as_file().sync_all().storage_err(COMPONENT, "sync record", file.path())?;

        let destination = collection.join(format!("{}.{}", Uuid::new_v4(), RECORD_EXTENSION));
        file.persist_noclobber(&destination)
            .map_err(|e| error().storage(&destination, &e.error.to_string()))?;

        info!(gesture = %name, path = %destination.display(), "acquisition saved");
        Ok(destination)
    }
}
