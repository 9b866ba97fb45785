// src/dataset/store.rs
//! Gesture collection housekeeping
//!
//! Each gesture is a directory under the dataset root, named in uppercase,
//! holding one JSON file per acquisition.

use crate::config::constants::dataset::RECORD_EXTENSION;
use crate::dataset::writer::DatasetWriter;
use crate::error::{GestureErrorBuilder, GestureResult, IntoGestureError};
use crate::utils::{normalize_gesture_name, TimeProvider};
use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

const COMPONENT: &str = "dataset_store";

/// Dataset directory with one sub-directory per gesture
#[derive(Debug, Clone)]
pub struct DatasetStore {
    root: PathBuf,
}

impl DatasetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the dataset root if missing
    pub fn bootstrap(&self) -> GestureResult<()> {
        fs::create_dir_all(&self.root).storage_err(COMPONENT, "create directory", &self.root)
    }

    pub fn gesture_dir(&self, name: &str) -> PathBuf {
        self.root.join(normalize_gesture_name(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        let name = normalize_gesture_name(name);
        !name.is_empty() && self.root.join(name).is_dir()
    }

    /// Gesture names in alphabetical order
    pub fn list_gestures(&self) -> GestureResult<Vec<String>> {
        let entries = fs::read_dir(&self.root).storage_err(COMPONENT, "list gestures", &self.root)?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.storage_err(COMPONENT, "list gestures", &self.root)?;
            if entry.path().is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Create an empty collection; returns the normalized name
    pub fn create_gesture(&self, name: &str) -> GestureResult<String> {
        let error = || GestureErrorBuilder::new(COMPONENT, "create gesture");
        let name = normalize_gesture_name(name);
        if name.is_empty() {
            return Err(error().configuration("gesture name is empty"));
        }

        let dir = self.root.join(&name);
        match fs::create_dir(&dir) {
            Ok(()) => {
                info!(gesture = %name, "gesture created");
                Ok(name)
            }
            Err(e) if e.kind() == IoErrorKind::AlreadyExists => Err(error().gesture_exists(&name)),
            Err(e) => Err(error().storage(&dir, &e.to_string())),
        }
    }

    /// Rename a collection
    ///
    /// A blank new name leaves everything untouched and returns `None`.
    pub fn rename_gesture(&self, from: &str, to: &str) -> GestureResult<Option<String>> {
        let error = || GestureErrorBuilder::new(COMPONENT, "rename gesture");
        let to = normalize_gesture_name(to);
        if to.is_empty() {
            return Ok(None);
        }

        let from = normalize_gesture_name(from);
        if !self.contains(&from) {
            return Err(error().gesture_not_found(&from));
        }
        if from == to {
            return Ok(Some(to));
        }
        let target = self.root.join(&to);
        if target.exists() {
            return Err(error().gesture_exists(&to));
        }

        fs::rename(self.root.join(&from), &target).storage_err(COMPONENT, "rename gesture", &target)?;
        info!(from = %from, to = %to, "gesture renamed");
        Ok(Some(to))
    }

    /// Remove a collection and every record in it
    pub fn delete_gesture(&self, name: &str) -> GestureResult<()> {
        let name = normalize_gesture_name(name);
        if !self.contains(&name) {
            return Err(GestureErrorBuilder::new(COMPONENT, "delete gesture").gesture_not_found(&name));
        }
        let dir = self.root.join(&name);
        fs::remove_dir_all(&dir).storage_err(COMPONENT, "delete gesture", &dir)?;
        info!(gesture = %name, "gesture deleted");
        Ok(())
    }

    /// Record files of a collection, sorted by path
    pub fn acquisitions(&self, name: &str) -> GestureResult<Vec<PathBuf>> {
        let name = normalize_gesture_name(name);
        if !self.contains(&name) {
            return Err(GestureErrorBuilder::new(COMPONENT, "list acquisitions").gesture_not_found(&name));
        }
        let dir = self.root.join(&name);
        let mut records = Vec::new();
        for entry in fs::read_dir(&dir).storage_err(COMPONENT, "list acquisitions", &dir)? {
            let path = entry.storage_err(COMPONENT, "list acquisitions", &dir)?.path();
            if path.is_file() && path.extension().map_or(false, |ext| ext == RECORD_EXTENSION) {
                records.push(path);
            }
        }
        records.sort();
        Ok(records)
    }

    pub fn acquisition_count(&self, name: &str) -> GestureResult<usize> {
        self.acquisitions(name).map(|records| records.len())
    }

    pub fn writer(&self) -> DatasetWriter {
        DatasetWriter::new(self.root.clone())
    }

    pub fn writer_with_clock(&self, clock: Arc<dyn TimeProvider>) -> DatasetWriter {
        DatasetWriter::with_clock(self.root.clone(), clock)
    }
}
