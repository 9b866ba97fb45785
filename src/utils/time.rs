// src/utils/time.rs
//! Wall-clock providers used to stamp persisted acquisitions

use crate::config::constants::dataset::TIMESTAMP_FORMAT;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use parking_lot::Mutex;

/// Time provider trait for dependency injection and testing
pub trait TimeProvider: Send + Sync {
    fn now_local(&self) -> DateTime<Local>;

    /// Timestamp in the dataset record format, `DD/MM/YY/HH:MM:SS`
    fn record_timestamp(&self) -> String {
        format_record_timestamp(&self.now_local())
    }
}

/// System time provider using the actual local clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now_local(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Mock time provider for deterministic testing
pub struct MockTimeProvider {
    current_time: Mutex<DateTime<Local>>,
}

impl MockTimeProvider {
    pub fn new(initial: DateTime<Local>) -> Self {
        Self {
            current_time: Mutex::new(initial),
        }
    }

    /// Mock clock fixed at a naive local date-time
    pub fn at(naive: NaiveDateTime) -> Option<Self> {
        Local.from_local_datetime(&naive).single().map(Self::new)
    }

    pub fn advance_by(&self, delta: chrono::Duration) {
        let mut current = self.current_time.lock();
        *current = *current + delta;
    }

    pub fn set_time(&self, time: DateTime<Local>) {
        *self.current_time.lock() = time;
    }
}

impl TimeProvider for MockTimeProvider {
    fn now_local(&self) -> DateTime<Local> {
        *self.current_time.lock()
    }
}

pub fn format_record_timestamp<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a record timestamp back into a naive local date-time
pub fn parse_record_timestamp(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).ok()
}
