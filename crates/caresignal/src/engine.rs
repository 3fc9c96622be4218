//! Engine facade tying ingest, aggregation, rules and the alert lifecycle
//! together over one repository.
//!
//! Every operation takes an explicit subject id; there is no ambient
//! "current user". Each call is a single synchronous unit of work, and
//! repository failures surface unchanged without internal retries.

use chrono::{Duration, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::aggregates::{self, Aggregates};
use crate::alerts;
use crate::error::Result;
use crate::ingest;
use crate::recommender;
use crate::report::{self, HealthReport};
use crate::repository::Repository;
use crate::rules;
use crate::score::{self, HealthSummary};
use crate::types::{Alert, NewObservation, Observation, Recommendation};

/// Window the rule evaluator sees when an observation is ingested, and the
/// default for insights.
pub const DEFAULT_WINDOW_DAYS: u32 = 30;
/// Window behind the dashboard summary cards.
const SUMMARY_WINDOW_DAYS: u32 = 7;
/// How far back the "new alerts" banner looks.
const RECENT_ALERT_HOURS: i64 = 24;

pub struct HealthEngine<R: Repository> {
    repo: R,
}

impl<R: Repository> HealthEngine<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Validate and persist one observation, evaluate the alert rules
    /// against it and the subject's fresh aggregates, persist whatever
    /// fired, and return the stored observation with its alerts.
    ///
    /// If an alert fails to save after the observation was persisted, the
    /// repository error is returned so the caller can decide on
    /// compensating action; the observation itself is not rolled back.
    pub fn ingest_observation(
        &self,
        subject_id: &str,
        observation: NewObservation,
    ) -> Result<(Observation, Vec<Alert>)> {
        let observation = ingest::validate(observation)?;
        self.repo.save_observation(subject_id, &observation)?;

        let aggregates = aggregates::aggregate(&self.repo, subject_id, DEFAULT_WINDOW_DAYS)?;
        let drafts = rules::evaluate(subject_id, &observation, &aggregates);

        let mut fired = Vec::with_capacity(drafts.len());
        for draft in drafts {
            match alerts::create_alert(&self.repo, subject_id, draft) {
                Ok(alert) => fired.push(alert),
                Err(err) => {
                    warn!(
                        "observation stored but alert persistence failed for subject {}: {}",
                        subject_id, err
                    );
                    return Err(err);
                }
            }
        }
        Ok((observation, fired))
    }

    /// Window aggregates plus the recommendations derived from them.
    pub fn get_insights(
        &self,
        subject_id: &str,
        window_days: u32,
    ) -> Result<(Aggregates, Vec<Recommendation>)> {
        let aggregates = aggregates::aggregate(&self.repo, subject_id, window_days)?;
        let recommendations = recommender::recommend(&aggregates);
        Ok((aggregates, recommendations))
    }

    pub fn acknowledge_alert(&self, subject_id: &str, alert_id: Uuid) -> Result<Alert> {
        alerts::acknowledge(&self.repo, subject_id, alert_id)
    }

    pub fn acknowledge_all_alerts(&self, subject_id: &str) -> Result<u64> {
        alerts::acknowledge_all(&self.repo, subject_id)
    }

    pub fn list_pending_alerts(&self, subject_id: &str) -> Result<Vec<Alert>> {
        alerts::list_pending(&self.repo, subject_id)
    }

    pub fn list_alert_history(&self, subject_id: &str, limit: usize) -> Result<Vec<Alert>> {
        alerts::list_history(&self.repo, subject_id, limit)
    }

    /// The dashboard score cards: weekly aggregates plus the count of
    /// pending alerts raised in the last 24 hours.
    pub fn health_summary(&self, subject_id: &str) -> Result<HealthSummary> {
        let aggregates = aggregates::aggregate(&self.repo, subject_id, SUMMARY_WINDOW_DAYS)?;
        let cutoff = Utc::now() - Duration::hours(RECENT_ALERT_HOURS);
        let recent_alert_count = self
            .repo
            .query_alerts(subject_id, false)?
            .iter()
            .filter(|alert| alert.created_at >= cutoff)
            .count() as u64;
        debug!(
            "summary for subject {}: {} recent alerts",
            subject_id, recent_alert_count
        );
        Ok(score::health_summary(&aggregates, recent_alert_count))
    }

    pub fn build_report(&self, subject_id: &str, window_days: u32) -> Result<HealthReport> {
        report::build_report(&self.repo, subject_id, window_days)
    }
}
