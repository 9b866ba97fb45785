// src/classifier/mod.rs
//! Classifier adapter and model storage

pub mod adapter;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod store;

pub use adapter::{argmax, label_for_index, Classifier, ClassifierAdapter, FnClassifier, Prediction, SharedClassifier};
#[cfg(feature = "onnx")]
pub use onnx::OnnxClassifier;
pub use store::{InstalledModel, ModelStore};
