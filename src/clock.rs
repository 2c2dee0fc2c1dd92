//! Time source abstraction
//!
//! Production code reads the system clock; tests pin time with
//! [`FixedClock`].

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;

    /// Current time in the court's zone
    fn now_in(&self, tz: Tz) -> DateTime<Tz> {
        self.now_utc().with_timezone(&tz)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to
#[cfg(test)]
pub struct FixedClock(std::sync::Mutex<DateTime<Utc>>);

#[cfg(test)]
impl FixedClock {
    pub fn new<Z: chrono::TimeZone>(at: DateTime<Z>) -> Self {
        Self(std::sync::Mutex::new(at.with_timezone(&Utc)))
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.0.lock().unwrap();
        *now += by;
    }
}

#[cfg(test)]
impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}
