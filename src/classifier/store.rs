// src/classifier/store.rs
//! Installed model files
//!
//! Model files are copied into the network directory on first upload and
//! kept on later uploads of the same file name.

use crate::error::{GestureErrorBuilder, GestureResult, IntoGestureError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const COMPONENT: &str = "model_store";

/// Paths of an installed model inside the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledModel {
    pub model: PathBuf,
    pub weights: Option<PathBuf>,
}

/// Directory holding uploaded model files
#[derive(Debug, Clone)]
pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn bootstrap(&self) -> GestureResult<()> {
        fs::create_dir_all(&self.dir).storage_err(COMPONENT, "create directory", &self.dir)
    }

    /// Copy the model (and optional weights) into the store if not already present
    pub fn install(&self, model: &Path, weights: Option<&Path>) -> GestureResult<InstalledModel> {
        self.bootstrap()?;
        let model = self.install_file(model)?;
        let weights = weights.map(|w| self.install_file(w)).transpose()?;
        Ok(InstalledModel { model, weights })
    }

    /// Path of an installed file by name
    pub fn resolve(&self, file_name: &str) -> GestureResult<PathBuf> {
        let path = self.dir.join(file_name);
        if !path.is_file() {
            return Err(GestureErrorBuilder::new(COMPONENT, "resolve").storage(&path, "model file not installed"));
        }
        Ok(path)
    }

    fn install_file(&self, source: &Path) -> GestureResult<PathBuf> {
        let file_name = source
            .file_name()
            .ok_or_else(|| GestureErrorBuilder::new(COMPONENT, "install").storage(source, "not a file path"))?;
        let destination = self.dir.join(file_name);

        if destination.exists() {
            info!(path = %destination.display(), "model file already installed");
            return Ok(destination);
        }
        fs::copy(source, &destination).storage_err(COMPONENT, "copy model file", source)?;
        info!(path = %destination.display(), "model file installed");
        Ok(destination)
    }
}
