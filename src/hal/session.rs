// src/hal/session.rs
//! Shared last-known-value device session
//!
//! The connection worker is the single writer; samplers and the host are
//! readers. All fields live behind one `RwLock`, so a reader never sees a
//! half-written EMG vector or IMU record.
//!
//! Every connection attempt gets a new generation. Events from a worker of
//! an older generation are dropped, so a superseded worker can neither feed
//! stale readings nor mark the current connection disconnected.

use crate::config::constants::device;
use crate::hal::traits::DeviceSession;
use crate::hal::types::{DeviceEvent, DeviceStatus, EmgSample, ImuSample, LinkState};
use parking_lot::RwLock;
use std::time::Duration;
use tracing::{debug, info};

struct SessionState {
    link: LinkState,
    emg: EmgSample,
    imu: ImuSample,
    name: Option<String>,
    battery: Option<u8>,
    emg_events: u64,
    imu_events: u64,
    generation: u64,
}

impl SessionState {
    fn apply(&mut self, event: DeviceEvent) {
        match event {
            DeviceEvent::Connected { name } => {
                info!(device = %name, "device connected");
                self.link = LinkState::Connected;
                self.name = Some(name);
            }
            DeviceEvent::Disconnected => {
                if self.link != LinkState::Disconnected {
                    info!("device disconnected");
                }
                self.link = LinkState::Disconnected;
            }
            DeviceEvent::Emg(sample) => {
                self.emg = sample;
                self.emg_events += 1;
            }
            DeviceEvent::Imu(sample) => {
                self.imu = sample;
                self.imu_events += 1;
            }
            DeviceEvent::Battery(level) => {
                debug!(level, "battery level reported");
                self.battery = Some(level);
            }
        }
    }
}

/// Device session shared between the connection worker and its readers
pub struct SharedSession {
    state: RwLock<SessionState>,
}

impl SharedSession {
    /// Session with zeroed readings of the given EMG width
    pub fn new(emg_channel_count: usize) -> Self {
        Self {
            state: RwLock::new(SessionState {
                link: LinkState::Disconnected,
                emg: EmgSample::zeroed(emg_channel_count),
                imu: ImuSample::default(),
                name: None,
                battery: None,
                emg_events: 0,
                imu_events: 0,
                generation: 0,
            }),
        }
    }

    /// Apply one device event
    pub fn apply(&self, event: DeviceEvent) {
        self.state.write().apply(event);
    }

    /// Apply an event on behalf of the worker of `generation`
    ///
    /// Returns false, leaving the session untouched, when a newer connection
    /// attempt has superseded that worker.
    pub(crate) fn apply_from(&self, generation: u64, event: DeviceEvent) -> bool {
        let mut state = self.state.write();
        if state.generation != generation {
            return false;
        }
        state.apply(event);
        true
    }

    pub fn link_state(&self) -> LinkState {
        self.state.read().link
    }

    /// Move from `Disconnected` to `Connecting` and open a new generation
    ///
    /// `None` if a connection is already up or in flight.
    pub(crate) fn begin_connecting(&self) -> Option<u64> {
        let mut state = self.state.write();
        if state.link != LinkState::Disconnected {
            return None;
        }
        state.link = LinkState::Connecting;
        state.generation += 1;
        Some(state.generation)
    }

    /// Roll back a failed connection attempt of `generation`
    pub(crate) fn abort_connecting(&self, generation: u64) {
        let mut state = self.state.write();
        if state.generation == generation && state.link == LinkState::Connecting {
            state.link = LinkState::Disconnected;
        }
    }

    pub fn status(&self) -> DeviceStatus {
        let state = self.state.read();
        DeviceStatus {
            name: state.name.clone(),
            battery_percent: state.battery,
            link: state.link,
        }
    }

    /// Status once the battery level has been reported, or whatever is known at `timeout`
    pub async fn settled_status(&self, timeout: Duration) -> DeviceStatus {
        let deadline = tokio::time::Instant::now() + timeout;
        let interval = Duration::from_millis(device::STATUS_POLL_INTERVAL_MS);
        loop {
            let status = self.status();
            if status.battery_percent.is_some() || tokio::time::Instant::now() >= deadline {
                return status;
            }
            tokio::time::sleep(interval).await;
        }
    }

    /// Number of EMG and IMU events received so far
    pub fn event_counts(&self) -> (u64, u64) {
        let state = self.state.read();
        (state.emg_events, state.imu_events)
    }
}

impl DeviceSession for SharedSession {
    fn is_connected(&self) -> bool {
        self.state.read().link == LinkState::Connected
    }

    fn current_emg(&self) -> EmgSample {
        self.state.read().emg.clone()
    }

    fn current_imu(&self) -> ImuSample {
        self.state.read().imu
    }

    fn device_name_and_battery(&self) -> (String, Option<u8>) {
        let state = self.state.read();
        (state.name.clone().unwrap_or_default(), state.battery)
    }
}
