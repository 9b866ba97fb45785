// src/features/mod.rs
//! Classifier input assembly

pub mod assembler;

pub use assembler::{assemble_features, row_width, FeatureAssembler};
