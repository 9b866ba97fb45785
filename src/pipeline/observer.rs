// src/pipeline/observer.rs
//! Host notifications
//!
//! The pipeline reports progress, completed windows, predictions and errors
//! through a [`PipelineObserver`]. Every method has an empty default so a
//! host only implements what it displays.

use crate::acquisition::AcquisitionWindow;
use crate::error::ErrorKind;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// Callback surface toward the host UI
pub trait PipelineObserver: Send + Sync {
    /// Acquisition progress, 0..=100, derived from the EMG stream
    fn on_progress(&self, _percent: u8) {}

    /// Fired exactly once per completed acquisition
    fn on_acquisition_complete(&self, _window: &AcquisitionWindow) {}

    fn on_prediction_ready(&self, _label: &str) {}

    fn on_error(&self, _kind: ErrorKind, _message: &str) {}
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl PipelineObserver for NullObserver {}

/// Owned form of an observer notification
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    Progress(u8),
    AcquisitionComplete { emg_samples: usize, imu_samples: usize },
    PredictionReady(String),
    Error { kind: ErrorKind, message: String },
}

/// Forwards notifications into a channel drained by the host loop
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: UnboundedSender<PipelineEvent>,
}

impl ChannelObserver {
    pub fn new() -> (Self, UnboundedReceiver<PipelineEvent>) {
        let (tx, rx) = unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: PipelineEvent) {
        // Receiver gone means the host stopped listening
        let _ = self.tx.send(event);
    }
}

impl PipelineObserver for ChannelObserver {
    fn on_progress(&self, percent: u8) {
        self.send(PipelineEvent::Progress(percent));
    }

    fn on_acquisition_complete(&self, window: &AcquisitionWindow) {
        self.send(PipelineEvent::AcquisitionComplete {
            emg_samples: window.emg_len(),
            imu_samples: window.imu_len(),
        });
    }

    fn on_prediction_ready(&self, label: &str) {
        self.send(PipelineEvent::PredictionReady(label.to_string()));
    }

    fn on_error(&self, kind: ErrorKind, message: &str) {
        self.send(PipelineEvent::Error {
            kind,
            message: message.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_observer_forwards() {
        let (observer, mut rx) = ChannelObserver::new();
        observer.on_progress(40);
        observer.on_prediction_ready("B");
        observer.on_error(ErrorKind::Storage, "disk full");

        assert_eq!(rx.try_recv().unwrap(), PipelineEvent::Progress(40));
        assert_eq!(rx.try_recv().unwrap(), PipelineEvent::PredictionReady("B".to_string()));
        assert_eq!(
            rx.try_recv().unwrap(),
            PipelineEvent::Error { kind: ErrorKind::Storage, message: "disk full".to_string() }
        );
    }

    #[test]
    fn test_dropped_receiver_is_harmless() {
        let (observer, rx) = ChannelObserver::new();
        drop(rx);
        observer.on_progress(10);
    }
}
