use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("cannot read schedule file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid schedule JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A key in the `days` object is not a weekday name.
    #[error("invalid day in schedule: {0}")]
    InvalidDay(String),

    /// The schedule has no entry for the requested day.
    #[error("no schedule for {day}")]
    UnknownDay { day: String },
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
