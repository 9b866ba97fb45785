// src/hal/listener.rs
//! Background connection worker
//!
//! The worker owns the [`EventSource`] and is the only writer into the
//! [`SharedSession`]. `connect` blocks until the device reports itself
//! connected or the connection timeout elapses.

use crate::config::constants::device::LISTENER_THREAD_NAME;
use crate::config::DeviceSettings;
use crate::error::{GestureErrorBuilder, GestureResult};
use crate::hal::session::SharedSession;
use crate::hal::traits::EventSource;
use crate::hal::types::{DeviceEvent, LinkState};
use crossbeam::channel::{bounded, RecvTimeoutError, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

const COMPONENT: &str = "device_listener";

/// Starts connection workers against a shared session
pub struct DeviceListener {
    session: Arc<SharedSession>,
    connection_timeout: Duration,
    poll_timeout: Duration,
}

impl DeviceListener {
    pub fn new(session: Arc<SharedSession>, settings: &DeviceSettings) -> Self {
        Self {
            session,
            connection_timeout: settings.connection_timeout(),
            poll_timeout: settings.event_poll_timeout(),
        }
    }

    pub fn with_timeouts(session: Arc<SharedSession>, connection_timeout: Duration, poll_timeout: Duration) -> Self {
        Self {
            session,
            connection_timeout,
            poll_timeout,
        }
    }

    pub fn session(&self) -> Arc<SharedSession> {
        Arc::clone(&self.session)
    }

    /// Start the worker and wait for the device to connect
    ///
    /// Fails with `DeviceUnavailable` when a connection is already up or in
    /// flight, or when no connection event arrives within the timeout.
    pub fn connect<S>(&self, source: S) -> GestureResult<ConnectionHandle>
    where
        S: EventSource + 'static,
    {
        let Some(generation) = self.session.begin_connecting() else {
            let reason = match self.session.link_state() {
                LinkState::Connected => "device already connected",
                _ => "connection attempt already in progress",
            };
            return Err(GestureErrorBuilder::new(COMPONENT, "connect").device_unavailable(reason));
        };

        let (ready_tx, ready_rx) = bounded::<()>(1);
        let stop = Arc::new(AtomicBool::new(false));
        let worker = {
            let session = Arc::clone(&self.session);
            let stop = Arc::clone(&stop);
            let poll_timeout = self.poll_timeout;
            thread::Builder::new()
                .name(LISTENER_THREAD_NAME.to_string())
                .spawn(move || run_worker(source, session, generation, stop, ready_tx, poll_timeout))
        };
        let worker = match worker {
            Ok(worker) => worker,
            Err(e) => {
                self.session.abort_connecting(generation);
                return Err(GestureErrorBuilder::new(COMPONENT, "connect")
                    .device_unavailable(&format!("failed to start listener thread: {}", e)));
            }
        };

        let mut handle = ConnectionHandle {
            session: Arc::clone(&self.session),
            generation,
            stop,
            worker: Some(worker),
        };

        match ready_rx.recv_timeout(self.connection_timeout) {
            Ok(()) => {
                info!(generation, timeout_ms = self.connection_timeout.as_millis() as u64, "connection established");
                Ok(handle)
            }
            Err(RecvTimeoutError::Timeout) => {
                handle.shutdown();
                self.session.abort_connecting(generation);
                warn!(timeout_ms = self.connection_timeout.as_millis() as u64, "no device connected in time");
                Err(GestureErrorBuilder::new(COMPONENT, "connect")
                    .device_unavailable("no connection event before the timeout"))
            }
            Err(RecvTimeoutError::Disconnected) => {
                handle.shutdown();
                self.session.abort_connecting(generation);
                Err(GestureErrorBuilder::new(COMPONENT, "connect")
                    .device_unavailable("event source stopped before connecting"))
            }
        }
    }
}

fn run_worker<S: EventSource>(
    mut source: S,
    session: Arc<SharedSession>,
    generation: u64,
    stop: Arc<AtomicBool>,
    ready: Sender<()>,
    poll_timeout: Duration,
) {
    debug!(generation, "listener started");
    while !stop.load(Ordering::Acquire) {
        match source.poll_event(poll_timeout) {
            Ok(Some(event)) => {
                let connected = matches!(event, DeviceEvent::Connected { .. });
                if !session.apply_from(generation, event) {
                    info!(generation, "listener superseded by a newer connection");
                    break;
                }
                if connected {
                    let _ = ready.try_send(());
                }
            }
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "event source failed");
                break;
            }
        }
    }
    source.shutdown();
    session.apply_from(generation, DeviceEvent::Disconnected);
    debug!(generation, "listener stopped");
}

/// Owns the running worker; dropping it stops the worker and disconnects
///
/// Only the handle of the current connection can mark the session
/// disconnected; a handle outliving a reconnect releases its worker quietly.
pub struct ConnectionHandle {
    session: Arc<SharedSession>,
    generation: u64,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl ConnectionHandle {
    pub fn session(&self) -> Arc<SharedSession> {
        Arc::clone(&self.session)
    }

    /// True while the worker thread is still pumping events
    pub fn is_running(&self) -> bool {
        self.worker.as_ref().map_or(false, |w| !w.is_finished())
    }

    pub fn disconnect(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("listener thread panicked");
                self.session.apply_from(self.generation, DeviceEvent::Disconnected);
            }
        }
    }
}

impl Drop for ConnectionHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::hal::traits::{DeviceSession, HalError};
    use crate::hal::types::EmgSample;
    use std::collections::VecDeque;

    struct ScriptedSource {
        events: VecDeque<DeviceEvent>,
    }

    impl EventSource for ScriptedSource {
        fn poll_event(&mut self, timeout: Duration) -> Result<Option<DeviceEvent>, HalError> {
            match self.events.pop_front() {
                Some(event) => Ok(Some(event)),
                None => {
                    thread::sleep(timeout.min(Duration::from_millis(5)));
                    Ok(None)
                }
            }
        }
    }

    struct FailingSource;

    impl EventSource for FailingSource {
        fn poll_event(&mut self, _timeout: Duration) -> Result<Option<DeviceEvent>, HalError> {
            Err(HalError::SourceFailure("radio off".to_string()))
        }
    }

    fn listener(session: Arc<SharedSession>, timeout_ms: u64) -> DeviceListener {
        DeviceListener::with_timeouts(session, Duration::from_millis(timeout_ms), Duration::from_millis(10))
    }

    #[test]
    fn test_connect_applies_events() {
        let session = Arc::new(SharedSession::new(2));
        let source = ScriptedSource {
            events: VecDeque::from(vec![
                DeviceEvent::Connected { name: "Band".to_string() },
                DeviceEvent::Emg(EmgSample::new(vec![1.0, 2.0])),
            ]),
        };

        let handle = listener(Arc::clone(&session), 500).connect(source).unwrap();
        assert!(session.is_connected());
        assert!(handle.is_running());

        let deadline = std::time::Instant::now() + Duration::from_secs(1);
        while session.current_emg().channels != vec![1.0, 2.0] && std::time::Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        assert_eq!(session.current_emg().channels, vec![1.0, 2.0]);

        handle.disconnect();
        assert!(!session.is_connected());
    }

    #[test]
    fn test_connect_times_out() {
        let session = Arc::new(SharedSession::new(2));
        let source = ScriptedSource { events: VecDeque::new() };

        let err = listener(Arc::clone(&session), 30).connect(source).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::DeviceUnavailable);
        assert_eq!(session.link_state(), LinkState::Disconnected);
    }

    #[test]
    fn test_failing_source_reports_unavailable() {
        let session = Arc::new(SharedSession::new(2));
        let err = listener(Arc::clone(&session), 500).connect(FailingSource).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::DeviceUnavailable);
        assert_eq!(session.link_state(), LinkState::Disconnected);
    }

    #[test]
    fn test_second_connect_is_rejected() {
        let session = Arc::new(SharedSession::new(2));
        let listener = listener(Arc::clone(&session), 500);
        let first = ScriptedSource {
            events: VecDeque::from(vec![DeviceEvent::Connected { name: "Band".to_string() }]),
        };
        let _handle = listener.connect(first).unwrap();

        let second = ScriptedSource { events: VecDeque::new() };
        let err = listener.connect(second).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::DeviceUnavailable);
        assert!(session.is_connected());
    }

    fn wait_for(condition: impl Fn() -> bool) -> bool {
        let deadline = std::time::Instant::now() + Duration::from_secs(1);
        while !condition() {
            if std::time::Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(1));
        }
        true
    }

    #[test]
    fn test_stale_handle_keeps_reconnection_alive() {
        let session = Arc::new(SharedSession::new(1));
        let listener = listener(Arc::clone(&session), 500);
        let dropping = ScriptedSource {
            events: VecDeque::from(vec![
                DeviceEvent::Connected { name: "Band".to_string() },
                DeviceEvent::Disconnected,
            ]),
        };
        let stale = listener.connect(dropping).unwrap();
        assert!(wait_for(|| !session.is_connected()));

        let fresh = ScriptedSource {
            events: VecDeque::from(vec![
                DeviceEvent::Connected { name: "Band".to_string() },
                DeviceEvent::Emg(EmgSample::new(vec![2.5])),
            ]),
        };
        let current = listener.connect(fresh).unwrap();
        assert!(session.is_connected());

        drop(stale);
        assert!(session.is_connected());
        assert!(current.is_running());
        assert!(wait_for(|| session.current_emg().channels == vec![2.5]));

        current.disconnect();
        assert!(!session.is_connected());
    }

    struct GatedSource {
        events: crossbeam::channel::Receiver<DeviceEvent>,
    }

    impl EventSource for GatedSource {
        fn poll_event(&mut self, timeout: Duration) -> Result<Option<DeviceEvent>, HalError> {
            match self.events.recv_timeout(timeout) {
                Ok(event) => Ok(Some(event)),
                Err(RecvTimeoutError::Timeout) => Ok(None),
                Err(RecvTimeoutError::Disconnected) => Err(HalError::LinkLost("gate closed".to_string())),
            }
        }
    }

    #[test]
    fn test_superseded_worker_stops_writing() {
        let session = Arc::new(SharedSession::new(1));
        let listener = listener(Arc::clone(&session), 500);
        let (gate, events) = crossbeam::channel::unbounded();
        gate.send(DeviceEvent::Connected { name: "Old".to_string() }).unwrap();
        let stale = listener.connect(GatedSource { events }).unwrap();

        gate.send(DeviceEvent::Disconnected).unwrap();
        assert!(wait_for(|| !session.is_connected()));
        let _current = listener
            .connect(ScriptedSource {
                events: VecDeque::from(vec![DeviceEvent::Connected { name: "New".to_string() }]),
            })
            .unwrap();

        // Late reading from the old device after the reconnect
        gate.send(DeviceEvent::Emg(EmgSample::new(vec![9.0]))).unwrap();
        assert!(wait_for(|| !stale.is_running()));
        assert_eq!(session.current_emg().channels, vec![0.0]);
        assert_eq!(session.device_name_and_battery().0, "New");

        drop(stale);
        assert!(session.is_connected());
    }
}
