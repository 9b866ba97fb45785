// tests/pipeline_integration.rs
//! End-to-end tests for the training and inference flows

use chrono::NaiveDate;
use gesture_core::acquisition::{AcquisitionParams, AcquisitionWindow};
use gesture_core::classifier::{FnClassifier, SharedClassifier};
use gesture_core::dataset::{load_record, DatasetStore};
use gesture_core::error::{ClassifierStage, ErrorKind, GestureErrorBuilder};
use gesture_core::hal::{DeviceEvent, EmgSample, ImuSample, SharedSession};
use gesture_core::pipeline::{ChannelObserver, GesturePipeline, PipelineEvent};
use gesture_core::utils::MockTimeProvider;
use ndarray::ArrayView3;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::mpsc::UnboundedReceiver;

struct Fixture {
    _temp: TempDir,
    session: Arc<SharedSession>,
    pipeline: GesturePipeline,
    events: UnboundedReceiver<PipelineEvent>,
}

fn fixture(connected: bool) -> Fixture {
    let temp = TempDir::new().unwrap();
    let store = DatasetStore::new(temp.path().join("Dataset"));
    store.bootstrap().unwrap();

    let session = Arc::new(SharedSession::new(8));
    if connected {
        session.apply(DeviceEvent::Connected { name: "Test Band".to_string() });
        session.apply(DeviceEvent::Battery(55));
    }

    let clock = MockTimeProvider::at(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(9, 30, 0).unwrap())
        .unwrap();
    let writer = store.writer_with_clock(Arc::new(clock));
    let (observer, events) = ChannelObserver::new();
    let pipeline = GesturePipeline::new(
        session.clone(),
        AcquisitionParams::default(),
        store,
        Arc::new(observer),
    )
    .with_writer(writer);

    Fixture {
        _temp: temp,
        session,
        pipeline,
        events,
    }
}

fn errors(rx: &mut UnboundedReceiver<PipelineEvent>) -> Vec<ErrorKind> {
    let mut kinds = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let PipelineEvent::Error { kind, .. } = event {
            kinds.push(kind);
        }
    }
    kinds
}

fn one_hot(index: usize) -> Vec<f32> {
    let mut probabilities = vec![0.01; 26];
    probabilities[index] = 0.75;
    probabilities
}

#[tokio::test(start_paused = true)]
async fn test_record_and_save() {
    let mut fx = fixture(true);
    fx.pipeline.store().create_gesture("hello").unwrap();
    fx.session.apply(DeviceEvent::Emg(EmgSample::new(vec![3.0; 8])));

    let pending = fx.pipeline.record("Hello").await.expect("Record failed");
    assert_eq!(pending.gesture(), "HELLO");
    assert_eq!(pending.window().emg_len(), 400);

    let path = fx.pipeline.save(&pending).expect("Save failed");
    assert_eq!(fx.pipeline.store().acquisition_count("HELLO").unwrap(), 1);

    let record = load_record(&path).unwrap();
    assert_eq!(record.timestamp, "01/05/24/09:30:00");
    assert_eq!(record.duration, 2000);
    assert_eq!(record.emg.frequency, 200);
    assert_eq!(record.imu.frequency, 200);
    assert_eq!(record.clone().into_window(), pending.window().clone());
    assert_eq!(record.emg.data[0].channels, vec![3.0; 8]);
    assert!(errors(&mut fx.events).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_discarded_window_is_not_persisted() {
    let fx = fixture(true);
    fx.pipeline.store().create_gesture("A").unwrap();

    let pending = fx.pipeline.record("A").await.unwrap();
    pending.discard();
    let pending = fx.pipeline.record("A").await.unwrap();
    drop(pending);

    assert_eq!(fx.pipeline.store().acquisition_count("A").unwrap(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_record_requires_connection() {
    let mut fx = fixture(false);
    fx.pipeline.store().create_gesture("A").unwrap();

    let err = fx.pipeline.record("A").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DeviceUnavailable);
    assert_eq!(errors(&mut fx.events), vec![ErrorKind::DeviceUnavailable]);
    assert!(fx.pipeline.start_acquisition().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_record_unknown_gesture() {
    let mut fx = fixture(true);
    let err = fx.pipeline.record("missing").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Storage);
    assert_eq!(errors(&mut fx.events), vec![ErrorKind::Storage]);
}

#[tokio::test(start_paused = true)]
async fn test_predict_labels_window() {
    let mut fx = fixture(true);
    let classifier = SharedClassifier::new(FnClassifier::new(|input: ArrayView3<'_, f32>| {
        assert_eq!(input.dim(), (1, 400, 18));
        Ok(one_hot(2))
    }));

    let prediction = fx.pipeline.predict(&classifier).await.expect("Prediction failed");
    assert_eq!(prediction.label, "C");

    let mut ready = Vec::new();
    while let Ok(event) = fx.events.try_recv() {
        if let PipelineEvent::PredictionReady(label) = event {
            ready.push(label);
        }
    }
    assert_eq!(ready, vec!["C".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_classifier_failure_is_reported() {
    let mut fx = fixture(true);
    let classifier = SharedClassifier::new(FnClassifier::new(|_: ArrayView3<'_, f32>| {
        Err(GestureErrorBuilder::new("model", "run").classifier(ClassifierStage::Invoke, "session closed"))
    }));

    let err = fx.pipeline.predict(&classifier).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Classifier);
    assert_eq!(errors(&mut fx.events), vec![ErrorKind::Classifier]);
}

#[tokio::test]
async fn test_short_window_is_malformed() {
    let mut fx = fixture(true);
    let classifier = SharedClassifier::new(FnClassifier::new(|_: ArrayView3<'_, f32>| Ok(one_hot(0))));
    let short = AcquisitionWindow::from_streams(vec![EmgSample::zeroed(8); 400], vec![ImuSample::default(); 399]);

    let err = fx.pipeline.classify(&short, &classifier).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedAcquisition);
    assert_eq!(errors(&mut fx.events), vec![ErrorKind::MalformedAcquisition]);
}

#[tokio::test]
async fn test_device_status() {
    let fx = fixture(true);
    assert_eq!(fx.pipeline.device_status(), ("Test Band".to_string(), Some(55)));
}
