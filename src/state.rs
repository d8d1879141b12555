//! Shared application state for request handlers.

use std::sync::Arc;

use chrono::{DateTime, Local};

use crate::config::AppConfig;
use crate::resolver::ImageDay;

/// Source of the current wall-clock time.
pub type Clock = fn() -> DateTime<Local>;

/// Shared application state, cheap to clone into every handler.
///
/// Built once before the listener is bound and never mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    clock: Clock,
}

impl AppState {
    /// Creates state reading time from the host's local clock.
    pub fn new(config: AppConfig) -> Self {
        Self::with_clock(config, Local::now)
    }

    pub fn with_clock(config: AppConfig, clock: Clock) -> Self {
        Self {
            config: Arc::new(config),
            clock,
        }
    }

    pub fn image_day(&self) -> ImageDay {
        self.config.schedule.image_day
    }

    pub fn now(&self) -> DateTime<Local> {
        (self.clock)()
    }
}
