// src/pipeline/mod.rs
//! Host-facing orchestration and callback surface

pub mod observer;
pub mod orchestrator;

pub use observer::{ChannelObserver, NullObserver, PipelineEvent, PipelineObserver};
pub use orchestrator::{GesturePipeline, PendingAcquisition};
