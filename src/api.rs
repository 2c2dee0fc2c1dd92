//! HTTP API for the court status page

mod assets;
mod handlers;
mod types;

pub use handlers::create_router;

use crate::clock::Clock;
use crate::status::StatusStore;
use chrono::DateTime;
use chrono_tz::Tz;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<StatusStore>,
    pub clock: Arc<dyn Clock>,
    pub timezone: Tz,
}

impl AppState {
    pub fn new(store: Arc<StatusStore>, clock: Arc<dyn Clock>, timezone: Tz) -> Self {
        Self {
            store,
            clock,
            timezone,
        }
    }

    pub fn now(&self) -> DateTime<Tz> {
        self.clock.now_in(self.timezone)
    }
}
