// src/pipeline/orchestrator.rs
//! Training-data and inference flows
//!
//! Both flows share the acquisition step. Training hands the completed
//! window back to the host, which either saves or drops it. Inference turns
//! the window into features and classifies it off the async loop.

use crate::acquisition::{start_acquisition, AcquisitionHandle, AcquisitionParams, AcquisitionWindow};
use crate::classifier::{Prediction, SharedClassifier};
use crate::dataset::{DatasetStore, DatasetWriter};
use crate::error::{GestureErrorBuilder, GestureResult};
use crate::features::FeatureAssembler;
use crate::hal::DeviceSession;
use crate::pipeline::observer::PipelineObserver;
use crate::utils::normalize_gesture_name;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

const COMPONENT: &str = "pipeline";

/// Completed training window waiting for the host's keep/discard decision
///
/// Dropping it discards the window.
#[derive(Debug, Clone)]
pub struct PendingAcquisition {
    gesture: String,
    params: AcquisitionParams,
    window: AcquisitionWindow,
}

impl PendingAcquisition {
    pub fn gesture(&self) -> &str {
        &self.gesture
    }

    pub fn window(&self) -> &AcquisitionWindow {
        &self.window
    }

    pub fn params(&self) -> &AcquisitionParams {
        &self.params
    }

    pub fn discard(self) {
        info!(gesture = %self.gesture, "acquisition discarded");
    }
}

/// Host-facing entry point
///
/// Every failing operation is reported through `on_error` and also returned.
pub struct GesturePipeline {
    session: Arc<dyn DeviceSession>,
    params: AcquisitionParams,
    observer: Arc<dyn PipelineObserver>,
    store: DatasetStore,
    writer: DatasetWriter,
}

impl GesturePipeline {
    pub fn new(
        session: Arc<dyn DeviceSession>,
        params: AcquisitionParams,
        store: DatasetStore,
        observer: Arc<dyn PipelineObserver>,
    ) -> Self {
        let writer = store.writer();
        Self {
            session,
            params,
            observer,
            store,
            writer,
        }
    }

    /// Replace the record writer, e.g. to inject a fixed clock
    pub fn with_writer(mut self, writer: DatasetWriter) -> Self {
        self.writer = writer;
        self
    }

    pub fn params(&self) -> &AcquisitionParams {
        &self.params
    }

    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    /// Device name and battery level
    pub fn device_status(&self) -> (String, Option<u8>) {
        self.session.device_name_and_battery()
    }

    fn report<T>(&self, result: GestureResult<T>) -> GestureResult<T> {
        if let Err(e) = &result {
            warn!(kind = %e.kind(), error = %e, "pipeline operation failed");
            self.observer.on_error(e.kind(), &e.to_string());
        }
        result
    }

    fn require_connection(&self, operation: &str) -> GestureResult<()> {
        if self.session.is_connected() {
            Ok(())
        } else {
            Err(GestureErrorBuilder::new(COMPONENT, operation).device_unavailable("first connect the device"))
        }
    }

    /// Start an acquisition the host drives itself
    pub fn start_acquisition(&self) -> GestureResult<AcquisitionHandle> {
        let result = self
            .require_connection("start acquisition")
            .and_then(|_| start_acquisition(Arc::clone(&self.session), self.params, Arc::clone(&self.observer)));
        self.report(result)
    }

    async fn acquire(&self, operation: &str) -> GestureResult<AcquisitionWindow> {
        self.require_connection(operation)?;
        let handle = start_acquisition(Arc::clone(&self.session), self.params, Arc::clone(&self.observer))?;
        handle.wait().await
    }

    /// Capture one training window for an existing gesture
    pub async fn record(&self, gesture: &str) -> GestureResult<PendingAcquisition> {
        let result = self.record_window(gesture).await;
        self.report(result)
    }

    async fn record_window(&self, gesture: &str) -> GestureResult<PendingAcquisition> {
        let gesture = normalize_gesture_name(gesture);
        if !self.store.contains(&gesture) {
            return Err(GestureErrorBuilder::new(COMPONENT, "record").gesture_not_found(&gesture));
        }
        let window = self.acquire("record").await?;
        Ok(PendingAcquisition {
            gesture,
            params: self.params,
            window,
        })
    }

    /// Persist a pending window; returns the record path
    pub fn save(&self, pending: &PendingAcquisition) -> GestureResult<PathBuf> {
        let result = self.writer.save(&pending.gesture, &pending.window, &pending.params);
        self.report(result)
    }

    /// Capture a window and classify it
    pub async fn predict(&self, classifier: &SharedClassifier) -> GestureResult<Prediction> {
        let result = self.acquire_and_classify(classifier).await;
        self.deliver(result)
    }

    async fn acquire_and_classify(&self, classifier: &SharedClassifier) -> GestureResult<Prediction> {
        let window = self.acquire("predict").await?;
        self.classify_window(&window, classifier).await
    }

    fn deliver(&self, result: GestureResult<Prediction>) -> GestureResult<Prediction> {
        let result = self.report(result);
        if let Ok(prediction) = &result {
            self.observer.on_prediction_ready(prediction.label);
        }
        result
    }

    async fn classify_window(&self, window: &AcquisitionWindow, classifier: &SharedClassifier) -> GestureResult<Prediction> {
        let features = FeatureAssembler::from_params(&self.params).assemble(window)?;
        let prediction = classifier.classify(features).await?;
        info!(label = prediction.label, "prediction ready");
        Ok(prediction)
    }

    /// Classify an already captured window
    pub async fn classify(&self, window: &AcquisitionWindow, classifier: &SharedClassifier) -> GestureResult<Prediction> {
        let result = self.classify_window(window, classifier).await;
        self.deliver(result)
    }
}
