use thiserror::Error;

/// Failures produced by profile and catalog mutations.
///
/// Every variant except `Store` is a deterministic input problem: the
/// mutation that produced it left the profile untouched.
#[derive(Debug, Error)]
pub enum RadioError {
    #[error("{0}")]
    Validation(String),

    #[error("Index {index} is out of range (list has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Track \"{0}\" already exists in queue")]
    DuplicateTrack(String),

    #[error("DJ \"{0}\" is already in the schedule")]
    DuplicateDj(String),

    #[error("Invalid duration \"{0}\": expected mm:ss")]
    InvalidDuration(String),

    #[error("End time {end} must be after start time {start}")]
    InvalidTimeRange { start: String, end: String },

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),
}

impl RadioError {
    pub fn validation<S: Into<String>>(message: S) -> Self {
        RadioError::Validation(message.into())
    }

    pub fn not_found<S: ToString>(kind: &'static str, id: S) -> Self {
        RadioError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

pub type RadioResult<T> = Result<T, RadioError>;
