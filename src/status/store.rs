//! Shared, lock-guarded status store

use super::record::{Hours, HoursOverride, StatusChange, StatusRecord, WeatherReport};
use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use tokio::sync::RwLock;

/// The process-wide status record
///
/// Cloned handles are not provided; share it through an `Arc`.
pub struct StatusStore {
    record: RwLock<StatusRecord>,
}

impl StatusStore {
    pub fn new(initial: StatusRecord) -> Self {
        Self {
            record: RwLock::new(initial),
        }
    }

    /// Overwrite the status together with its attribution
    ///
    /// `closed_until` follows the change: set for `ClosedUntil`, cleared
    /// otherwise. Notes and hours are left alone.
    pub async fn set_status(
        &self,
        change: StatusChange,
        actor: &str,
        manual_override: bool,
        now: DateTime<Tz>,
    ) {
        let mut record = self.record.write().await;
        record.purge_stale_override(now.date_naive());
        record.status = change.status();
        record.closed_until = change.closed_until();
        record.last_updated = now;
        record.updated_by = actor.to_string();
        record.manual_override = manual_override;
        drop(record);

        tracing::info!(
            status = %change.status(),
            closed_until = ?change.closed_until().map(|t| t.to_rfc3339()),
            actor,
            manual_override,
            "Court status updated"
        );
    }

    /// Replace the weather fields; not a status change, so attribution stays
    pub async fn set_weather(&self, report: WeatherReport) {
        self.record.write().await.weather = report;
    }

    pub async fn set_notes(&self, notes: &str, actor: &str, now: DateTime<Tz>) {
        let mut record = self.record.write().await;
        record.purge_stale_override(now.date_naive());
        record.notes = notes.to_string();
        record.last_updated = now;
        record.updated_by = actor.to_string();
        drop(record);

        tracing::info!(actor, cleared = notes.is_empty(), "Court notes updated");
    }

    /// Change the permanent operating hours
    pub async fn set_hours(&self, hours: Hours, actor: &str, now: DateTime<Tz>) {
        let mut record = self.record.write().await;
        record.purge_stale_override(now.date_naive());
        record.hours = hours;
        record.last_updated = now;
        record.updated_by = actor.to_string();
        drop(record);

        tracing::info!(open = hours.open(), close = hours.close(), actor, "Operating hours changed");
    }

    /// Install a same-day hours override, replacing any previous one
    pub async fn set_hours_override(
        &self,
        hours_override: HoursOverride,
        actor: &str,
        now: DateTime<Tz>,
    ) {
        let mut record = self.record.write().await;
        record.hours_override = Some(hours_override);
        record.purge_stale_override(now.date_naive());
        record.last_updated = now;
        record.updated_by = actor.to_string();
        drop(record);

        tracing::info!(
            date = %hours_override.date,
            open = hours_override.hours.open(),
            close = hours_override.hours.close(),
            actor,
            "Hours override set"
        );
    }

    /// Consistent copy of the record as of `today`
    ///
    /// An override left over from an earlier day is not reported.
    pub async fn snapshot(&self, today: NaiveDate) -> StatusRecord {
        let mut copy = self.record.read().await.clone();
        copy.purge_stale_override(today);
        copy
    }
}
