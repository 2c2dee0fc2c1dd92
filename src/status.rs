//! Court status record and its shared store
//!
//! The record is the single piece of mutable state in the process. It lives
//! behind [`StatusStore`], which applies every mutation in one critical
//! section so readers never see a half-applied change.

mod record;
mod store;

pub use record::{
    CourtStatus, Hours, HoursError, HoursOverride, StatusChange, StatusRecord, WeatherReport,
};
pub use store::StatusStore;
