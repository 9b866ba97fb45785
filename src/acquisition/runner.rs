// src/acquisition/runner.rs
//! Acquisition task
//!
//! One tokio task owns the sampler and the completion monitor, so both
//! stream triggers and the completion check are serialized. The EMG and IMU
//! triggers are periodic intervals; the monitor checks on its own slower
//! interval and stops both triggers when the window is full.

use crate::acquisition::buffer::AcquisitionWindow;
use crate::acquisition::monitor::CompletionMonitor;
use crate::acquisition::params::AcquisitionParams;
use crate::acquisition::sampler::DualRateSampler;
use crate::error::{GestureErrorBuilder, GestureResult};
use crate::hal::DeviceSession;
use crate::pipeline::PipelineObserver;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::{debug, info};

const COMPONENT: &str = "acquisition";

/// Start filling a window from `session`
///
/// Must be called inside a tokio runtime. The returned handle yields the
/// completed window; dropping it cancels the acquisition.
pub fn start_acquisition(
    session: Arc<dyn DeviceSession>,
    params: AcquisitionParams,
    observer: Arc<dyn PipelineObserver>,
) -> GestureResult<AcquisitionHandle> {
    let runtime = tokio::runtime::Handle::try_current().map_err(|e| {
        GestureErrorBuilder::new(COMPONENT, "start").configuration(&format!("no async runtime: {}", e))
    })?;

    info!(
        duration_ms = params.duration_ms(),
        emg_hz = params.emg_frequency_hz(),
        imu_hz = params.imu_frequency_hz(),
        "acquisition started"
    );
    let task = runtime.spawn(run_acquisition(session, params, observer));
    Ok(AcquisitionHandle {
        task: Some(AbortOnDrop(task)),
        params,
    })
}

async fn run_acquisition(
    session: Arc<dyn DeviceSession>,
    params: AcquisitionParams,
    observer: Arc<dyn PipelineObserver>,
) -> AcquisitionWindow {
    let start = Instant::now();
    let mut emg_tick = interval_at(start + params.emg_period(), params.emg_period());
    let mut imu_tick = interval_at(start + params.imu_period(), params.imu_period());
    let mut poll_tick = interval_at(start + params.poll_interval(), params.poll_interval());

    let mut sampler = DualRateSampler::new(&params);
    let mut monitor = CompletionMonitor::new(&params);

    loop {
        tokio::select! {
            biased;

            _ = emg_tick.tick(), if sampler.emg_active() => {
                if let Some(percent) = sampler.on_emg_tick(session.as_ref()) {
                    observer.on_progress(percent);
                }
            }
            _ = imu_tick.tick(), if sampler.imu_active() => {
                sampler.on_imu_tick(session.as_ref());
            }
            _ = poll_tick.tick() => {
                if monitor.check(sampler.window()) {
                    sampler.stop_all();
                    break;
                }
            }
        }
    }

    let window = sampler.into_window();
    debug!(
        emg = window.emg_len(),
        imu = window.imu_len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "acquisition complete"
    );
    observer.on_acquisition_complete(&window);
    window
}

#[derive(Debug)]
struct AbortOnDrop(JoinHandle<AcquisitionWindow>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Running acquisition
///
/// Dropping the handle, or the future returned by [`wait`](Self::wait),
/// aborts the task. No notification fires after that.
#[derive(Debug)]
pub struct AcquisitionHandle {
    task: Option<AbortOnDrop>,
    params: AcquisitionParams,
}

impl AcquisitionHandle {
    pub fn params(&self) -> &AcquisitionParams {
        &self.params
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, |t| t.0.is_finished())
    }

    /// Wait for the completed window
    pub async fn wait(mut self) -> GestureResult<AcquisitionWindow> {
        let mut guard = self
            .task
            .take()
            .ok_or_else(|| GestureErrorBuilder::new(COMPONENT, "wait").cancelled())?;

        match (&mut guard.0).await {
            Ok(window) => Ok(window),
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(_) => Err(GestureErrorBuilder::new(COMPONENT, "wait").cancelled()),
        }
    }

    /// Abandon the acquisition; the partial window is discarded
    pub fn cancel(mut self) {
        if let Some(guard) = self.task.take() {
            info!("acquisition cancelled");
            drop(guard);
        }
    }
}
