// src/hal/mod.rs
//! Hardware Abstraction Layer for the wearable armband

pub mod listener;
pub mod session;
pub mod simulator;
pub mod traits;
pub mod types;

pub use listener::{ConnectionHandle, DeviceListener};
pub use session::SharedSession;
pub use simulator::{ActivationPattern, SimulatedArmband, SimulatorConfig};
pub use traits::*;
pub use types::*;
