// tests/dataset_integration.rs
//! Dataset housekeeping and record persistence against a real directory tree

use gesture_core::acquisition::{AcquisitionParams, AcquisitionWindow};
use gesture_core::classifier::ModelStore;
use gesture_core::dataset::{load_record, DatasetStore};
use gesture_core::error::{ErrorKind, GestureError};
use gesture_core::hal::{EmgSample, ImuSample};
use std::fs;
use tempfile::TempDir;

fn workspace() -> (TempDir, DatasetStore, ModelStore) {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let store = DatasetStore::new(temp.path().join("Dataset"));
    let models = ModelStore::new(temp.path().join("NeuralNetwork"));
    store.bootstrap().unwrap();
    models.bootstrap().unwrap();
    (temp, store, models)
}

fn window(params: &AcquisitionParams) -> AcquisitionWindow {
    let emg = (0..params.target_emg_count())
        .map(|i| EmgSample::new(vec![i as f32, -(i as f32), 0.5]))
        .collect();
    let imu = (0..params.target_imu_count())
        .map(|i| ImuSample {
            gyroscope: [i as f32, 0.25, -0.25],
            acceleration: [0.0, 0.0, 1.0],
            orientation: [0.0, 0.0, 0.38268343, 0.9238795],
        })
        .collect();
    AcquisitionWindow::from_streams(emg, imu)
}

#[test]
fn test_bootstrap_creates_layout() {
    let (temp, _store, _models) = workspace();
    assert!(temp.path().join("Dataset").is_dir());
    assert!(temp.path().join("NeuralNetwork").is_dir());
}

#[test]
fn test_bootstrap_is_idempotent() {
    let (_temp, store, _models) = workspace();
    store.create_gesture("keep").unwrap();
    store.bootstrap().unwrap();
    assert_eq!(store.list_gestures().unwrap(), vec!["KEEP"]);
}

#[test]
fn test_persisted_record_round_trip() {
    let (_temp, store, _models) = workspace();
    store.create_gesture("wave").unwrap();
    let params = AcquisitionParams::new(500, 200, 50).unwrap();
    let original = window(&params);

    let path = store.writer().save("wave", &original, &params).unwrap();
    let record = load_record(&path).unwrap();

    assert_eq!(record.duration, 500);
    assert_eq!(record.emg.frequency, 200);
    assert_eq!(record.imu.frequency, 50);
    assert_eq!(record.params().unwrap(), params);
    assert_eq!(record.into_window(), original);
}

#[test]
fn test_each_save_gets_a_new_file() {
    let (_temp, store, _models) = workspace();
    store.create_gesture("A").unwrap();
    let params = AcquisitionParams::new(100, 100, 100).unwrap();
    let writer = store.writer();

    for _ in 0..5 {
        writer.save("A", &window(&params), &params).unwrap();
    }
    let files = store.acquisitions("A").unwrap();
    assert_eq!(files.len(), 5);
    for file in &files {
        let stem = file.file_stem().unwrap().to_str().unwrap();
        assert!(uuid::Uuid::parse_str(stem).is_ok(), "not a uuid: {}", stem);
    }
}

#[test]
fn test_collection_lifecycle() {
    let (_temp, store, _models) = workspace();
    store.create_gesture("b").unwrap();
    store.create_gesture("a").unwrap();
    assert_eq!(store.list_gestures().unwrap(), vec!["A", "B"]);

    let params = AcquisitionParams::new(100, 100, 100).unwrap();
    store.writer().save("a", &window(&params), &params).unwrap();

    match store.create_gesture("A") {
        Err(GestureError::GestureExists { name, .. }) => assert_eq!(name, "A"),
        other => panic!("expected GestureExists, got {:?}", other),
    }
    assert_eq!(store.acquisition_count("A").unwrap(), 1);

    assert_eq!(store.rename_gesture("A", "   ").unwrap(), None);
    assert_eq!(store.list_gestures().unwrap(), vec!["A", "B"]);

    assert_eq!(store.rename_gesture("A", "hello").unwrap(), Some("HELLO".to_string()));
    assert_eq!(store.acquisition_count("HELLO").unwrap(), 1);

    let err = store.rename_gesture("HELLO", "b").unwrap_err();
    assert!(matches!(err, GestureError::GestureExists { .. }));

    store.delete_gesture("hello").unwrap();
    assert_eq!(store.list_gestures().unwrap(), vec!["B"]);
    assert_eq!(store.acquisition_count("HELLO").unwrap_err().kind(), ErrorKind::Storage);
}

#[test]
fn test_model_upload_keeps_first_copy() {
    let (temp, _store, models) = workspace();
    let upload_dir = temp.path().join("uploads");
    fs::create_dir(&upload_dir).unwrap();
    let architecture = upload_dir.join("model.json");
    let weights = upload_dir.join("group1-shard1of1.bin");
    fs::write(&architecture, b"{\"layers\": []}").unwrap();
    fs::write(&weights, [1u8, 2, 3]).unwrap();

    let installed = models.install(&architecture, Some(&weights)).unwrap();
    assert!(installed.model.starts_with(models.dir()));

    fs::write(&weights, [9u8]).unwrap();
    let again = models.install(&architecture, Some(&weights)).unwrap();
    assert_eq!(fs::read(again.weights.unwrap()).unwrap(), vec![1u8, 2, 3]);
}
