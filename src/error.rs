use crate::config::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("malformed availability for worker {worker} on {day}: {value:?} ({reason})")]
    MalformedAvailability {
        worker: String,
        day: String,
        value: String,
        reason: &'static str,
    },
    #[error("missing staffing requirement for {day} at {hour}:00")]
    MissingStaffingRequirement { day: String, hour: u8 },
    #[error("invalid staffing cell for {day} at {label}: {value:?}")]
    InvalidStaffingCell {
        day: String,
        label: String,
        value: String,
    },
    #[error("duplicate staffing requirement for {day} at {hour}:00")]
    DuplicateStaffingRequirement { day: String, hour: u8 },
    #[error("invalid day header: {0:?}")]
    InvalidDayHeader(String),
    #[error("invalid time label: {0:?}")]
    InvalidTimeLabel(String),
    #[error("invalid time: {hour}:{minute}")]
    InvalidTime { hour: u32, minute: u32 },
    #[error("unknown worker: {0}")]
    UnknownWorker(String),
    #[error("duplicate worker: {0}")]
    DuplicateWorker(String),
    #[error("invalid work time for worker {worker}: {value} (expected 0 < f <= 1)")]
    InvalidWorkTime { worker: String, value: f64 },
    #[error(transparent)]
    Config(#[from] ConfigError),
}
