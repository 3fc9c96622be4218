//! Storage boundary for the engine.
//!
//! The engine consumes this trait and never implements durable storage
//! itself. Backends wrap their native failures in [`RepositoryError`];
//! the engine propagates them to the caller without retrying.

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::types::{Alert, Observation, ObservationKind};

/// A storage failure, carrying the backend's own error unchanged.
#[derive(Debug, Error)]
#[error("repository operation failed: {source}")]
pub struct RepositoryError {
    #[from]
    source: anyhow::Error,
}

impl RepositoryError {
    pub fn new(source: impl Into<anyhow::Error>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

pub type RepoResult<T> = Result<T, RepositoryError>;

/// Persistence operations the engine depends on. Observations are
/// append-only; alerts are inserted once and updated only to acknowledge.
pub trait Repository {
    fn save_observation(&self, subject_id: &str, observation: &Observation) -> RepoResult<()>;

    /// All observations of `kind` for the subject recorded at or after
    /// `since`, in no particular order.
    fn query_observations(
        &self,
        subject_id: &str,
        kind: ObservationKind,
        since: DateTime<Utc>,
    ) -> RepoResult<Vec<Observation>>;

    fn save_alert(&self, alert: &Alert) -> RepoResult<()>;

    fn load_alert(&self, id: Uuid) -> RepoResult<Option<Alert>>;

    fn update_alert(&self, alert: &Alert) -> RepoResult<()>;

    /// Alerts for the subject filtered by acknowledgment state, in no
    /// particular order.
    fn query_alerts(&self, subject_id: &str, acknowledged: bool) -> RepoResult<Vec<Alert>>;
}
