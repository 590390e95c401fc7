//! `gymbot-schedule`: the static weekly class schedule.
//!
//! The schedule is loaded once at startup (from a JSON file or the built-in
//! copy) and shared read-only behind an `Arc` for the life of the process.

pub mod day;
pub mod error;
pub mod schedule;

pub use day::{day_name, parse_day};
pub use error::{Result, ScheduleError};
pub use schedule::{Schedule, ScheduleEntry};
