// src/error.rs
//! Unified error handling for gesture capture
//!
//! Every failure that can reach the host is expressed as a [`GestureError`].
//! Each variant carries an [`ErrorContext`] recording which component and
//! operation produced it, so a single human-readable notification can be
//! shown at the boundary nearest the user action.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::panic::Location;
use std::time::SystemTime;
use thiserror::Error;

/// Unified error type for the acquisition, dataset and inference flows
#[derive(Debug, Error)]
pub enum GestureError {
    /// Connection attempt timed out or the device is not connected
    #[error("[DEVICE] Device unavailable: {reason} ({})", .context.operation)]
    DeviceUnavailable { reason: String, context: ErrorContext },

    /// Directory/file creation, rename, delete or write failure
    #[error("[STORAGE] {operation} failed for {path}: {reason}")]
    Storage {
        operation: String,
        path: String,
        reason: String,
        context: ErrorContext,
    },

    /// A gesture collection with this name already exists
    #[error("[STORAGE] Gesture {name} already exists")]
    GestureExists { name: String, context: ErrorContext },

    /// No gesture collection with this name
    #[error("[STORAGE] Gesture {name} not found")]
    GestureNotFound { name: String, context: ErrorContext },

    /// Window does not satisfy the shape preconditions of feature assembly
    #[error("[DATA] Malformed acquisition: {reason} (expected: {expected}, got: {actual})")]
    MalformedAcquisition {
        reason: String,
        expected: String,
        actual: String,
        context: ErrorContext,
    },

    /// Classifier could not be loaded or invoked
    #[error("[CLASSIFIER] {stage} failed: {reason}")]
    Classifier {
        stage: ClassifierStage,
        reason: String,
        context: ErrorContext,
    },

    /// Invalid acquisition parameters or configuration files
    #[error("[CONFIG] Configuration error in {component}: {reason}")]
    Configuration {
        component: String,
        reason: String,
        context: ErrorContext,
    },

    /// The acquisition was abandoned before completion
    #[error("[ACQUISITION] Acquisition cancelled ({})", .context.operation)]
    Cancelled { context: ErrorContext },
}

/// Which side of the classifier failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierStage {
    Load,
    Invoke,
}

impl fmt::Display for ClassifierStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifierStage::Load => write!(f, "model load"),
            ClassifierStage::Invoke => write!(f, "prediction"),
        }
    }
}

/// Coarse error category reported to the host through `on_error`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    DeviceUnavailable,
    Storage,
    MalformedAcquisition,
    Classifier,
    Configuration,
    Cancelled,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::DeviceUnavailable => "device-unavailable",
            ErrorKind::Storage => "storage",
            ErrorKind::MalformedAcquisition => "malformed-acquisition",
            ErrorKind::Classifier => "classifier",
            ErrorKind::Configuration => "configuration",
            ErrorKind::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

impl GestureError {
    /// Category used by the host callback surface
    pub fn kind(&self) -> ErrorKind {
        match self {
            GestureError::DeviceUnavailable { .. } => ErrorKind::DeviceUnavailable,
            GestureError::Storage { .. }
            | GestureError::GestureExists { .. }
            | GestureError::GestureNotFound { .. } => ErrorKind::Storage,
            GestureError::MalformedAcquisition { .. } => ErrorKind::MalformedAcquisition,
            GestureError::Classifier { .. } => ErrorKind::Classifier,
            GestureError::Configuration { .. } => ErrorKind::Configuration,
            GestureError::Cancelled { .. } => ErrorKind::Cancelled,
        }
    }

    /// Context of the component that raised the error
    pub fn context(&self) -> &ErrorContext {
        match self {
            GestureError::DeviceUnavailable { context, .. }
            | GestureError::Storage { context, .. }
            | GestureError::GestureExists { context, .. }
            | GestureError::GestureNotFound { context, .. }
            | GestureError::MalformedAcquisition { context, .. }
            | GestureError::Classifier { context, .. }
            | GestureError::Configuration { context, .. }
            | GestureError::Cancelled { context } => context,
        }
    }
}

/// Error context for debugging and analysis
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub timestamp: SystemTime,
    pub thread_id: Option<String>,
    pub component: String,
    pub operation: String,
    pub file: Option<&'static str>,
    pub line: Option<u32>,
    pub additional_info: HashMap<String, String>,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(component: &str, operation: &str) -> Self {
        Self {
            timestamp: SystemTime::now(),
            thread_id: std::thread::current().name().map(|s| s.to_string()),
            component: component.to_string(),
            operation: operation.to_string(),
            file: None,
            line: None,
            additional_info: HashMap::new(),
        }
    }

    /// Create error context with file and line information
    pub fn with_location(component: &str, operation: &str, file: &'static str, line: u32) -> Self {
        let mut context = Self::new(component, operation);
        context.file = Some(file);
        context.line = Some(line);
        context
    }

    /// Add additional information to the context
    pub fn add_info<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.additional_info.insert(key.into(), value.into());
        self
    }
}

/// Macro for creating error context with file and line info
#[macro_export]
macro_rules! error_context {
    ($component:expr, $operation:expr) => {
        $crate::error::ErrorContext::with_location($component, $operation, file!(), line!())
    };
}

/// Result type alias for gesture operations
pub type GestureResult<T> = Result<T, GestureError>;

/// Error builder for convenient error construction
///
/// The builder records the source location it was created at.
pub struct GestureErrorBuilder {
    component: String,
    operation: String,
    location: &'static Location<'static>,
}

impl GestureErrorBuilder {
    #[track_caller]
    pub fn new(component: &str, operation: &str) -> Self {
        Self {
            component: component.to_string(),
            operation: operation.to_string(),
            location: Location::caller(),
        }
    }

    fn context(&self) -> ErrorContext {
        ErrorContext::with_location(&self.component, &self.operation, self.location.file(), self.location.line())
    }

    pub fn device_unavailable(self, reason: &str) -> GestureError {
        GestureError::DeviceUnavailable {
            reason: reason.to_string(),
            context: self.context(),
        }
    }

    pub fn storage(self, path: &std::path::Path, reason: &str) -> GestureError {
        GestureError::Storage {
            operation: self.operation.clone(),
            path: path.display().to_string(),
            reason: reason.to_string(),
            context: self.context(),
        }
    }

    pub fn gesture_exists(self, name: &str) -> GestureError {
        GestureError::GestureExists {
            name: name.to_string(),
            context: self.context(),
        }
    }

    pub fn gesture_not_found(self, name: &str) -> GestureError {
        GestureError::GestureNotFound {
            name: name.to_string(),
            context: self.context(),
        }
    }

    pub fn malformed<E: fmt::Display, A: fmt::Display>(
        self,
        reason: &str,
        expected: E,
        actual: A,
    ) -> GestureError {
        GestureError::MalformedAcquisition {
            reason: reason.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
            context: self.context(),
        }
    }

    pub fn classifier(self, stage: ClassifierStage, reason: &str) -> GestureError {
        GestureError::Classifier {
            stage,
            reason: reason.to_string(),
            context: self.context(),
        }
    }

    pub fn configuration(self, reason: &str) -> GestureError {
        let context = self.context();
        GestureError::Configuration {
            component: self.component,
            reason: reason.to_string(),
            context,
        }
    }

    pub fn cancelled(self) -> GestureError {
        GestureError::Cancelled {
            context: self.context(),
        }
    }
}

/// Convenience trait mapping foreign errors to storage errors
pub trait IntoGestureError<T> {
    #[track_caller]
    fn storage_err(self, component: &str, operation: &str, path: &std::path::Path) -> GestureResult<T>;
}

impl<T, E> IntoGestureError<T> for Result<T, E>
where
    E: Error + Send + Sync + 'static,
{
    #[track_caller]
    fn storage_err(self, component: &str, operation: &str, path: &std::path::Path) -> GestureResult<T> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(GestureErrorBuilder::new(component, operation).storage(path, &err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_error_context_creation() {
        let context = ErrorContext::new("test_component", "test_operation");
        assert_eq!(context.component, "test_component");
        assert_eq!(context.operation, "test_operation");
        assert!(context.timestamp <= SystemTime::now());
    }

    #[test]
    fn test_error_context_macro_records_location() {
        let context = error_context!("dataset", "write");
        assert_eq!(context.file, Some(file!()));
        assert!(context.line.is_some());
    }

    #[test]
    fn test_builder_records_caller() {
        let err = GestureErrorBuilder::new("dataset", "write").cancelled();
        assert_eq!(err.context().file, Some(file!()));
        assert!(err.context().line.is_some());
    }

    #[test]
    fn test_error_builder() {
        let err = GestureErrorBuilder::new("config", "load").configuration("bad frequency");

        match err {
            GestureError::Configuration { component, reason, .. } => {
                assert_eq!(component, "config");
                assert_eq!(reason, "bad frequency");
            }
            _ => panic!("Expected configuration error"),
        }
    }

    #[test]
    fn test_error_kinds() {
        let exists = GestureErrorBuilder::new("dataset", "create").gesture_exists("HELLO");
        assert_eq!(exists.kind(), ErrorKind::Storage);

        let malformed = GestureErrorBuilder::new("features", "assemble").malformed("short imu", 400, 12);
        assert_eq!(malformed.kind(), ErrorKind::MalformedAcquisition);

        let classifier = GestureErrorBuilder::new("classifier", "predict")
            .classifier(ClassifierStage::Invoke, "boom");
        assert_eq!(classifier.kind(), ErrorKind::Classifier);
    }

    #[test]
    fn test_error_display() {
        let err = GestureErrorBuilder::new("features", "assemble").malformed("imu stream too short", 400, 399);
        let display = err.to_string();
        assert!(display.contains("imu stream too short"));
        assert!(display.contains("400"));
        assert!(display.contains("399"));
    }

    #[test]
    fn test_error_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GestureError>();
    }

    #[test]
    fn test_into_gesture_error_trait() {
        let result: Result<i32, std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "test error",
        ));

        let mapped = result.storage_err("dataset", "read", Path::new("/tmp/x.json"));
        match mapped.unwrap_err() {
            GestureError::Storage { operation, path, reason, context } => {
                assert_eq!(operation, "read");
                assert_eq!(path, "/tmp/x.json");
                assert!(reason.contains("test error"));
                assert_eq!(context.component, "dataset");
            }
            _ => panic!("Expected storage error"),
        }
    }
}
