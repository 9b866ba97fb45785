// src/config/constants.rs
//! System-wide configuration constants

/// Acquisition timing constants
pub mod acquisition {
    pub const DEFAULT_DURATION_MS: u32 = 2000;
    pub const DEFAULT_EMG_FREQUENCY_HZ: u32 = 200;
    pub const DEFAULT_IMU_FREQUENCY_HZ: u32 = 200;
    pub const COMPLETION_POLL_INTERVAL_MS: u64 = 100;

    pub const MIN_FREQUENCY_HZ: u32 = 1;
    pub const MAX_FREQUENCY_HZ: u32 = 1000;
    pub const MAX_DURATION_MS: u32 = 60_000;
    pub const PERCENT_COMPLETE: u8 = 100;
    pub const MILLISECONDS_PER_SECOND: u64 = 1_000;
}

/// Device session constants
pub mod device {
    pub const DEFAULT_EMG_CHANNEL_COUNT: usize = 8;
    pub const MAX_EMG_CHANNEL_COUNT: usize = 64;
    pub const GYROSCOPE_AXES: usize = 3;
    pub const ACCELERATION_AXES: usize = 3;
    pub const ORIENTATION_COMPONENTS: usize = 4;
    pub const IMU_ROW_WIDTH: usize = GYROSCOPE_AXES + ACCELERATION_AXES + ORIENTATION_COMPONENTS;

    pub const DEFAULT_CONNECTION_TIMEOUT_MS: u64 = 2000;
    pub const DEFAULT_EVENT_POLL_TIMEOUT_MS: u64 = 500;
    pub const STATUS_POLL_INTERVAL_MS: u64 = 10;
    pub const STATUS_SETTLE_TIMEOUT_MS: u64 = 500;
    pub const LISTENER_THREAD_NAME: &str = "device-listener";
}

/// Simulated armband constants
pub mod simulation {
    pub const DEVICE_NAME: &str = "Simulated Armband";
    pub const NATIVE_EMG_RATE_HZ: u32 = 200;
    pub const NATIVE_IMU_RATE_HZ: u32 = 50;
    pub const DEFAULT_BATTERY_LEVEL: u8 = 87;
    pub const EMG_AMPLITUDE: f32 = 60.0;
    pub const EMG_LIMIT: f32 = 127.0;
    pub const DEFAULT_NOISE_LEVEL: f32 = 0.1;
    pub const DEFAULT_CONNECT_DELAY_MS: u64 = 50;
}

/// Dataset layout constants
pub mod dataset {
    pub const DATASET_DIR: &str = "Dataset";
    pub const NETWORK_DIR: &str = "NeuralNetwork";
    pub const RECORD_EXTENSION: &str = "json";
    pub const TIMESTAMP_FORMAT: &str = "%d/%m/%y/%H:%M:%S";
}

/// Classifier constants
pub mod classifier {
    pub const CLASS_COUNT: usize = 26;
    pub const LABELS: [&str; CLASS_COUNT] = [
        "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q",
        "R", "S", "T", "U", "V", "W", "X", "Y", "Z",
    ];
    pub const DEFAULT_MODEL_FILE: &str = "model.onnx";
}

/// File system path constants
pub mod paths {
    pub const DEFAULT_CONFIG_FILE: &str = "config/default.toml";
    pub const LOCAL_CONFIG_FILE: &str = "config/local.toml";
    pub const USER_CONFIG_DIR: &str = ".gesture-core";
    pub const ENV_PREFIX: &str = "GESTURE_";
}
