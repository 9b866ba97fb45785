// src/hal/simulator.rs
//! Simulated armband event source
//!
//! Emits a connection event after a short delay, then EMG and IMU events at
//! the armband's native rates. Used by the CLI when no hardware is attached
//! and by the integration tests.

use crate::config::constants::{device, simulation};
use crate::error::{GestureErrorBuilder, GestureResult};
use crate::hal::traits::{EventSource, HalError};
use crate::hal::types::{DeviceEvent, EmgSample, ImuSample};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::f32::consts::PI;
use std::thread;
use std::time::{Duration, Instant};

/// Simulator configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulatorConfig {
    pub name: String,
    pub emg_channel_count: usize,
    pub emg_rate_hz: u32,
    pub imu_rate_hz: u32,
    pub battery_level: Option<u8>,
    pub connect_delay_ms: u64,
    pub noise_level: f32,
    pub activation: ActivationPattern,
    pub seed: u64,
    /// When false the armband never reports a connection
    pub connects: bool,
}

/// Muscle activation envelope applied to every EMG channel
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum ActivationPattern {
    Rest,
    Constant,
    Sinusoidal { frequency_hz: f32 },
    Burst { burst_duration_ms: u32, rest_duration_ms: u32 },
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            name: simulation::DEVICE_NAME.to_string(),
            emg_channel_count: device::DEFAULT_EMG_CHANNEL_COUNT,
            emg_rate_hz: simulation::NATIVE_EMG_RATE_HZ,
            imu_rate_hz: simulation::NATIVE_IMU_RATE_HZ,
            battery_level: Some(simulation::DEFAULT_BATTERY_LEVEL),
            connect_delay_ms: simulation::DEFAULT_CONNECT_DELAY_MS,
            noise_level: simulation::DEFAULT_NOISE_LEVEL,
            activation: ActivationPattern::Burst {
                burst_duration_ms: 400,
                rest_duration_ms: 600,
            },
            seed: 0x5EED,
            connects: true,
        }
    }
}

impl SimulatorConfig {
    pub fn validate(&self) -> GestureResult<()> {
        let error = |reason: &str| GestureErrorBuilder::new("simulator", "validate").configuration(reason);

        if self.emg_channel_count == 0 || self.emg_channel_count > device::MAX_EMG_CHANNEL_COUNT {
            return Err(error(&format!(
                "emg_channel_count must be between 1 and {}",
                device::MAX_EMG_CHANNEL_COUNT
            )));
        }
        if self.emg_rate_hz == 0 || self.imu_rate_hz == 0 {
            return Err(error("event rates must be positive"));
        }
        if !(0.0..=1.0).contains(&self.noise_level) {
            return Err(error("noise_level must be between 0.0 and 1.0"));
        }
        if let Some(level) = self.battery_level {
            if level > 100 {
                return Err(error("battery_level must be a percentage"));
            }
        }
        if let ActivationPattern::Burst { burst_duration_ms, rest_duration_ms } = self.activation {
            match burst_duration_ms.checked_add(rest_duration_ms) {
                Some(0) => return Err(error("burst period must be positive")),
                None => return Err(error("burst period exceeds u32 milliseconds")),
                Some(_) => {}
            }
        }
        Ok(())
    }
}

/// Event source producing synthetic armband data
pub struct SimulatedArmband {
    config: SimulatorConfig,
    rng: StdRng,
    started: Instant,
    connected: bool,
    pending: VecDeque<DeviceEvent>,
    emg_period: Duration,
    imu_period: Duration,
    next_emg: Instant,
    next_imu: Instant,
    emg_sequence: u64,
    imu_sequence: u64,
}

impl SimulatedArmband {
    pub fn new(config: SimulatorConfig) -> GestureResult<Self> {
        config.validate()?;
        let now = Instant::now();
        Ok(Self {
            rng: StdRng::seed_from_u64(config.seed),
            started: now,
            connected: false,
            pending: VecDeque::new(),
            emg_period: Duration::from_nanos(1_000_000_000 / config.emg_rate_hz as u64),
            imu_period: Duration::from_nanos(1_000_000_000 / config.imu_rate_hz as u64),
            next_emg: now,
            next_imu: now,
            emg_sequence: 0,
            imu_sequence: 0,
            config,
        })
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    fn activation(&self, t: f32) -> f32 {
        match &self.config.activation {
            ActivationPattern::Rest => 0.0,
            ActivationPattern::Constant => 1.0,
            ActivationPattern::Sinusoidal { frequency_hz } => 0.5 * (1.0 + (2.0 * PI * frequency_hz * t).sin()),
            ActivationPattern::Burst { burst_duration_ms, rest_duration_ms } => {
                let period = (u64::from(*burst_duration_ms) + u64::from(*rest_duration_ms)) as f32;
                if (t * 1000.0) % period < *burst_duration_ms as f32 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    fn next_emg_sample(&mut self) -> EmgSample {
        let t = self.emg_sequence as f32 / self.config.emg_rate_hz as f32;
        self.emg_sequence += 1;
        let envelope = self.activation(t);

        let channels = (0..self.config.emg_channel_count)
            .map(|channel| {
                // Spread carrier frequencies so channels are distinguishable
                let carrier = 2.0 * PI * (20.0 + channel as f32 * 7.5) * t;
                let noise: f32 = self.rng.gen_range(-1.0..1.0);
                let value = simulation::EMG_AMPLITUDE
                    * (envelope * carrier.sin() + noise * self.config.noise_level);
                value.clamp(-simulation::EMG_LIMIT, simulation::EMG_LIMIT).round()
            })
            .collect();
        EmgSample::new(channels)
    }

    fn next_imu_sample(&mut self) -> ImuSample {
        let t = self.imu_sequence as f32 / self.config.imu_rate_hz as f32;
        self.imu_sequence += 1;

        // Slow rotation about the forearm axis
        let yaw_rate = 0.5f32;
        let half_angle = 0.5 * yaw_rate * t;
        let jitter = self.config.noise_level * 0.01;
        let mut noise = || self.rng.gen_range(-jitter..=jitter);

        ImuSample {
            gyroscope: [noise(), noise(), yaw_rate.to_degrees() + noise()],
            acceleration: [noise(), noise(), 1.0 + noise()],
            orientation: [0.0, 0.0, half_angle.sin(), half_angle.cos()],
        }
    }

    fn wait_until(deadline: Instant, timeout: Duration) -> bool {
        let now = Instant::now();
        if deadline <= now {
            return true;
        }
        let wait = deadline - now;
        if wait > timeout {
            thread::sleep(timeout);
            return false;
        }
        thread::sleep(wait);
        true
    }
}

impl EventSource for SimulatedArmband {
    fn poll_event(&mut self, timeout: Duration) -> Result<Option<DeviceEvent>, HalError> {
        if let Some(event) = self.pending.pop_front() {
            return Ok(Some(event));
        }

        if !self.connected {
            if !self.config.connects {
                thread::sleep(timeout);
                return Ok(None);
            }
            let due = self.started + Duration::from_millis(self.config.connect_delay_ms);
            if !Self::wait_until(due, timeout) {
                return Ok(None);
            }
            self.connected = true;
            let now = Instant::now();
            self.next_emg = now + self.emg_period;
            self.next_imu = now + self.imu_period;
            if let Some(level) = self.config.battery_level {
                self.pending.push_back(DeviceEvent::Battery(level));
            }
            return Ok(Some(DeviceEvent::Connected {
                name: self.config.name.clone(),
            }));
        }

        let emg_first = self.next_emg <= self.next_imu;
        let due = if emg_first { self.next_emg } else { self.next_imu };
        if !Self::wait_until(due, timeout) {
            return Ok(None);
        }

        if emg_first {
            self.next_emg += self.emg_period;
            Ok(Some(DeviceEvent::Emg(self.next_emg_sample())))
        } else {
            self.next_imu += self.imu_period;
            Ok(Some(DeviceEvent::Imu(self.next_imu_sample())))
        }
    }
}
