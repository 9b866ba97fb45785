// src/dataset/mod.rs
//! Gesture dataset on disk
//!
//! - [`DatasetStore`]: create, list, rename and delete gesture collections
//! - [`DatasetWriter`]: atomically persist a completed window
//! - [`AcquisitionRecord`]: the JSON record format

pub mod record;
pub mod store;
pub mod writer;

pub use record::{load_record, AcquisitionRecord, StreamRecord};
pub use store::DatasetStore;
pub use writer::DatasetWriter;
