//! Error types for the engine.

use thiserror::Error;
use uuid::Uuid;

use crate::repository::RepositoryError;

#[derive(Error, Debug)]
pub enum EngineError {
    /// An observation field fell outside its allowed range. The observation
    /// must not be persisted; values are rejected, never clamped.
    #[error("{field} out of range: {value} (allowed {min} to {max})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("a vital reading must include at least one measurement")]
    EmptyVitalReading,

    /// The alert does not exist or belongs to a different subject.
    #[error("alert {alert_id} not found")]
    AlertNotFound { alert_id: Uuid },

    /// A storage-boundary failure, surfaced unchanged. The engine never
    /// retries internally.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl EngineError {
    /// True for rejections the caller can fix by correcting input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::OutOfRange { .. } | Self::MissingField { .. } | Self::EmptyVitalReading
        )
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_names_field_and_bounds() {
        let err = EngineError::OutOfRange {
            field: "severity",
            value: 11.0,
            min: 1.0,
            max: 10.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("severity"));
        assert!(msg.contains("11"));
        assert!(msg.contains("1"));
        assert!(msg.contains("10"));
        assert!(err.is_validation());
    }

    #[test]
    fn not_found_is_not_validation() {
        let err = EngineError::AlertNotFound {
            alert_id: Uuid::nil(),
        };
        assert!(!err.is_validation());
    }
}
