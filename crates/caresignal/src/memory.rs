//! In-memory [`Repository`] backend.
//!
//! Backs the engine's test suite and is a reasonable default for embedding
//! without durable storage. Not persistent across process restarts.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::repository::{RepoResult, Repository, RepositoryError};
use crate::types::{Alert, Observation, ObservationKind};

#[derive(Default)]
struct Store {
    /// Observation history keyed by subject id, in insertion order.
    observations: HashMap<String, Vec<Observation>>,
    alerts: HashMap<Uuid, Alert>,
}

/// HashMap-backed store behind a mutex. Each operation is an independent
/// insert or point update, so concurrent creates cannot lose rows.
#[derive(Default)]
pub struct MemoryRepository {
    inner: Mutex<Store>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> RepoResult<MutexGuard<'_, Store>> {
        self.inner
            .lock()
            .map_err(|_| RepositoryError::new(anyhow!("store mutex poisoned")))
    }
}

impl Repository for MemoryRepository {
    fn save_observation(&self, subject_id: &str, observation: &Observation) -> RepoResult<()> {
        let mut store = self.lock()?;
        store
            .observations
            .entry(subject_id.to_string())
            .or_default()
            .push(observation.clone());
        Ok(())
    }

    fn query_observations(
        &self,
        subject_id: &str,
        kind: ObservationKind,
        since: DateTime<Utc>,
    ) -> RepoResult<Vec<Observation>> {
        let store = self.lock()?;
        Ok(store
            .observations
            .get(subject_id)
            .map(|history| {
                history
                    .iter()
                    .filter(|obs| obs.kind() == kind && obs.recorded_at >= since)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn save_alert(&self, alert: &Alert) -> RepoResult<()> {
        let mut store = self.lock()?;
        store.alerts.insert(alert.id, alert.clone());
        Ok(())
    }

    fn load_alert(&self, id: Uuid) -> RepoResult<Option<Alert>> {
        let store = self.lock()?;
        Ok(store.alerts.get(&id).cloned())
    }

    fn update_alert(&self, alert: &Alert) -> RepoResult<()> {
        let mut store = self.lock()?;
        store.alerts.insert(alert.id, alert.clone());
        Ok(())
    }

    fn query_alerts(&self, subject_id: &str, acknowledged: bool) -> RepoResult<Vec<Alert>> {
        let store = self.lock()?;
        Ok(store
            .alerts
            .values()
            .filter(|alert| alert.subject_id == subject_id && alert.acknowledged == acknowledged)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ObservationData, SymptomEntry};

    fn symptom_observation(name: &str, severity: u8) -> Observation {
        Observation {
            recorded_at: Utc::now(),
            data: ObservationData::Symptom(SymptomEntry {
                name: name.to_string(),
                severity,
                note: None,
            }),
        }
    }

    #[test]
    fn observations_are_scoped_by_subject_and_kind() {
        let repo = MemoryRepository::new();
        let since = Utc::now() - chrono::Duration::days(1);

        repo.save_observation("alice", &symptom_observation("Headache", 4))
            .unwrap();
        repo.save_observation("bob", &symptom_observation("Nausea", 6))
            .unwrap();

        let alice = repo
            .query_observations("alice", ObservationKind::Symptom, since)
            .unwrap();
        assert_eq!(alice.len(), 1);

        let alice_meds = repo
            .query_observations("alice", ObservationKind::Medication, since)
            .unwrap();
        assert!(alice_meds.is_empty());
    }

    #[test]
    fn since_filter_excludes_older_rows() {
        let repo = MemoryRepository::new();
        let mut old = symptom_observation("Fatigue", 3);
        old.recorded_at = Utc::now() - chrono::Duration::days(10);
        repo.save_observation("alice", &old).unwrap();

        let recent = repo
            .query_observations(
                "alice",
                ObservationKind::Symptom,
                Utc::now() - chrono::Duration::days(7),
            )
            .unwrap();
        assert!(recent.is_empty());
    }
}
