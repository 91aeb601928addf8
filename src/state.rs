use std::sync::Arc;
use std::time::{Instant, SystemTime};

use chrono::Duration;

use crate::config::Config;
use crate::progress::{ProgressEngine, StruggleLog};

#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    started_at_system: SystemTime,
    activity_window: Duration,
    engine: Arc<ProgressEngine>,
    struggle_log: Arc<StruggleLog>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            started_at: Instant::now(),
            started_at_system: SystemTime::now(),
            activity_window: Duration::hours(config.activity_window_hours),
            engine: Arc::new(ProgressEngine::new()),
            struggle_log: Arc::new(StruggleLog::new()),
        }
    }

    pub fn engine(&self) -> Arc<ProgressEngine> {
        Arc::clone(&self.engine)
    }

    pub fn struggle_log(&self) -> Arc<StruggleLog> {
        Arc::clone(&self.struggle_log)
    }

    pub fn activity_window(&self) -> Duration {
        self.activity_window
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn started_at_system(&self) -> SystemTime {
        self.started_at_system
    }
}
