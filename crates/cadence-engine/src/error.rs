use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid {field}: '{value}' is not an ISO-8601 date")]
    InvalidDate { field: &'static str, value: String },

    #[error("toDate {to} is before fromDate {from}")]
    InvalidRange { from: DateTime<Utc>, to: DateTime<Utc> },

    #[error("date window spans {days} days, more than the {max} allowed")]
    WindowTooWide { days: i64, max: i64 },

    /// Read failure from the backing store, passed through untouched.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl EngineError {
    /// True for errors caused by the caller's input rather than the store.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidDate { .. } | Self::InvalidRange { .. } | Self::WindowTooWide { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
