// src/bin/gesture_capture.rs
//! Command line host for the gesture pipeline, driven by the simulated armband

use clap::{Parser, Subcommand};
use gesture_core::classifier::ModelStore;
use gesture_core::config::{device, ConfigLoader, SystemConfig};
use gesture_core::dataset::DatasetStore;
use gesture_core::error::ErrorKind;
use gesture_core::hal::{ConnectionHandle, DeviceListener, SharedSession, SimulatedArmband, SimulatorConfig};
use gesture_core::pipeline::{GesturePipeline, PipelineObserver};
use gesture_core::utils::normalize_gesture_name;
use gesture_core::AcquisitionWindow;
use std::error::Error;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "gesture-capture", version, about = "Capture and classify armband gestures")]
struct Args {
    /// Extra configuration file merged over the defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Dataset directory (overrides configuration)
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List gestures with their acquisition counts
    List,
    /// Create an empty gesture
    Create { name: String },
    /// Rename a gesture; an empty new name does nothing
    Rename { from: String, to: String },
    /// Delete a gesture and all its acquisitions
    Delete { name: String },
    /// Connect to the armband and print its status
    Status,
    /// Record acquisitions for a gesture
    Record {
        gesture: String,
        /// Number of windows to capture
        #[arg(long, default_value_t = 1)]
        repeat: u32,
        /// Capture without saving
        #[arg(long, default_value_t = false)]
        discard: bool,
    },
    /// Copy model files into the network directory
    InstallModel {
        model: PathBuf,
        #[arg(long)]
        weights: Option<PathBuf>,
    },
    /// Capture one window and classify it
    Predict {
        /// Model file name inside the network directory
        #[arg(long)]
        model: Option<String>,
    },
}

/// Prints acquisition progress on one console line
struct ConsoleObserver;

impl PipelineObserver for ConsoleObserver {
    fn on_progress(&self, percent: u8) {
        print!("\rAcquiring... {:>3}%", percent);
        let _ = std::io::stdout().flush();
    }

    fn on_acquisition_complete(&self, window: &AcquisitionWindow) {
        println!("\rAcquired {} EMG / {} IMU samples", window.emg_len(), window.imu_len());
    }

    fn on_prediction_ready(&self, label: &str) {
        println!("Prediction: {}", label);
    }

    fn on_error(&self, kind: ErrorKind, message: &str) {
        eprintln!("\n[{}] {}", kind, message);
    }
}

fn load_config(args: &Args) -> Result<SystemConfig, Box<dyn Error>> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &args.config {
        let mut paths = loader.config_paths().to_vec();
        paths.push(path.clone());
        loader = ConfigLoader::with_paths(paths);
    }
    let mut config = loader.load_system_config()?;
    if let Some(dataset) = &args.dataset {
        config.dataset.root = dataset.clone();
    }
    Ok(config)
}

fn connect(config: &SystemConfig) -> Result<(Arc<SharedSession>, ConnectionHandle), Box<dyn Error>> {
    let session = Arc::new(SharedSession::new(config.device.emg_channel_count));
    let listener = DeviceListener::new(Arc::clone(&session), &config.device);
    let armband = SimulatedArmband::new(SimulatorConfig {
        emg_channel_count: config.device.emg_channel_count,
        ..SimulatorConfig::default()
    })?;
    let connection = listener.connect(armband)?;
    Ok((session, connection))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let store = DatasetStore::new(&config.dataset.root);
    store.bootstrap()?;
    let models = ModelStore::new(&config.dataset.network_dir);
    models.bootstrap()?;

    match args.command {
        Command::List => {
            for name in store.list_gestures()? {
                println!("{:<20} {}", name, store.acquisition_count(&name)?);
            }
        }
        Command::Create { name } => {
            println!("Created {}", store.create_gesture(&name)?);
        }
        Command::Rename { from, to } => match store.rename_gesture(&from, &to)? {
            Some(name) => println!("Renamed to {}", name),
            None => println!("Nothing to rename"),
        },
        Command::Delete { name } => {
            store.delete_gesture(&name)?;
            println!("Deleted {}", normalize_gesture_name(&name));
        }
        Command::Status => {
            let (session, _connection) = connect(&config)?;
            let status = session
                .settled_status(Duration::from_millis(device::STATUS_SETTLE_TIMEOUT_MS))
                .await;
            println!("{}", status);
        }
        Command::Record { gesture, repeat, discard } => {
            let (session, _connection) = connect(&config)?;
            let pipeline = GesturePipeline::new(
                session,
                config.acquisition.params()?,
                store.clone(),
                Arc::new(ConsoleObserver),
            );
            for _ in 0..repeat {
                let pending = pipeline.record(&gesture).await?;
                if discard {
                    pending.discard();
                } else {
                    println!("Saved {}", pipeline.save(&pending)?.display());
                }
            }
            println!("{} now has {} acquisitions", normalize_gesture_name(&gesture), store.acquisition_count(&gesture)?);
        }
        Command::InstallModel { model, weights } => {
            let installed = models.install(&model, weights.as_deref())?;
            println!("Model: {}", installed.model.display());
            if let Some(weights) = installed.weights {
                println!("Weights: {}", weights.display());
            }
        }
        Command::Predict { model } => {
            let file = model.unwrap_or_else(|| config.classifier.model_file.clone());
            predict(&config, &models, &store, &file).await?;
        }
    }
    Ok(())
}

#[cfg(feature = "onnx")]
async fn predict(config: &SystemConfig, models: &ModelStore, store: &DatasetStore, file: &str) -> Result<(), Box<dyn Error>> {
    use gesture_core::classifier::{OnnxClassifier, SharedClassifier};

    let classifier = SharedClassifier::new(OnnxClassifier::load(&models.resolve(file)?)?);
    let (session, _connection) = connect(config)?;
    let pipeline = GesturePipeline::new(
        session,
        config.acquisition.params()?,
        store.clone(),
        Arc::new(ConsoleObserver),
    );
    pipeline.predict(&classifier).await?;
    Ok(())
}

#[cfg(not(feature = "onnx"))]
async fn predict(_config: &SystemConfig, _models: &ModelStore, _store: &DatasetStore, _file: &str) -> Result<(), Box<dyn Error>> {
    Err("prediction needs the `onnx` feature".into())
}
