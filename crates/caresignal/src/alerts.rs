//! Alert lifecycle: creation, acknowledgment, and ordered listing.
//!
//! Per-alert state machine: created (pending) -> acknowledged, terminal.
//! Alerts are never re-opened or deleted. Acknowledging twice is a no-op
//! that keeps the first acknowledgment time.

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{EngineError, Result};
use crate::repository::Repository;
use crate::types::{Alert, AlertDraft};

/// Persist a candidate alert as pending, assigning id and creation time.
/// No deduplication against existing pending alerts for the same rule.
pub fn create_alert<R: Repository>(repo: &R, subject_id: &str, draft: AlertDraft) -> Result<Alert> {
    let alert = Alert {
        id: Uuid::new_v4(),
        subject_id: subject_id.to_string(),
        alert_type: draft.alert_type,
        severity: draft.severity,
        title: draft.title,
        message: draft.message,
        recommendation: draft.recommendation,
        source_rule: draft.source_rule.to_string(),
        acknowledged: false,
        created_at: Utc::now(),
        acknowledged_at: None,
    };
    repo.save_alert(&alert)?;
    info!(
        "created {} alert {} for subject {} (rule {})",
        alert.severity.as_str(),
        alert.id,
        subject_id,
        alert.source_rule
    );
    Ok(alert)
}

/// Acknowledge one alert. Fails with [`EngineError::AlertNotFound`] when the
/// alert does not exist or belongs to a different subject; acknowledging an
/// already-acknowledged alert succeeds without touching `acknowledged_at`.
pub fn acknowledge<R: Repository>(repo: &R, subject_id: &str, alert_id: Uuid) -> Result<Alert> {
    let Some(mut alert) = repo.load_alert(alert_id)? else {
        return Err(EngineError::AlertNotFound { alert_id });
    };
    if alert.subject_id != subject_id {
        // Another subject's alert looks exactly like a missing one.
        return Err(EngineError::AlertNotFound { alert_id });
    }
    if !alert.acknowledged {
        alert.acknowledged = true;
        alert.acknowledged_at = Some(Utc::now());
        repo.update_alert(&alert)?;
        debug!("alert {} acknowledged by subject {}", alert_id, subject_id);
    }
    Ok(alert)
}

/// Acknowledge every pending alert for the subject; returns how many were
/// affected.
pub fn acknowledge_all<R: Repository>(repo: &R, subject_id: &str) -> Result<u64> {
    let pending = repo.query_alerts(subject_id, false)?;
    let now = Utc::now();
    let mut count = 0u64;
    for mut alert in pending {
        alert.acknowledged = true;
        alert.acknowledged_at = Some(now);
        repo.update_alert(&alert)?;
        count += 1;
    }
    if count > 0 {
        info!("acknowledged {} pending alerts for subject {}", count, subject_id);
    }
    Ok(count)
}

/// Pending alerts, most severe first, then most recent first.
pub fn list_pending<R: Repository>(repo: &R, subject_id: &str) -> Result<Vec<Alert>> {
    let mut pending = repo.query_alerts(subject_id, false)?;
    pending.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then(b.created_at.cmp(&a.created_at))
    });
    Ok(pending)
}

/// Acknowledged alerts, most recently acknowledged first, capped at `limit`.
pub fn list_history<R: Repository>(
    repo: &R,
    subject_id: &str,
    limit: usize,
) -> Result<Vec<Alert>> {
    let mut history = repo.query_alerts(subject_id, true)?;
    history.sort_by(|a, b| b.acknowledged_at.cmp(&a.acknowledged_at));
    history.truncate(limit);
    Ok(history)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryRepository;
    use crate::types::{AlertType, Severity};
    use chrono::{DateTime, Duration};

    const SUBJECT: &str = "subject-1";

    fn draft(severity: Severity) -> AlertDraft {
        AlertDraft {
            alert_type: AlertType::Warning,
            severity,
            title: "Vital Signs Alert".to_string(),
            message: "test".to_string(),
            recommendation: None,
            source_rule: "abnormal_heart_rate",
        }
    }

    fn stored_alert(
        repo: &MemoryRepository,
        severity: Severity,
        created_at: DateTime<Utc>,
    ) -> Alert {
        let alert = Alert {
            id: Uuid::new_v4(),
            subject_id: SUBJECT.to_string(),
            alert_type: AlertType::Warning,
            severity,
            title: "Vital Signs Alert".to_string(),
            message: "test".to_string(),
            recommendation: None,
            source_rule: "abnormal_heart_rate".to_string(),
            acknowledged: false,
            created_at,
            acknowledged_at: None,
        };
        repo.save_alert(&alert).unwrap();
        alert
    }

    #[test]
    fn create_assigns_identity_and_starts_pending() {
        let repo = MemoryRepository::new();
        let alert = create_alert(&repo, SUBJECT, draft(Severity::High)).unwrap();
        assert!(!alert.acknowledged);
        assert!(alert.acknowledged_at.is_none());
        assert_eq!(alert.subject_id, SUBJECT);
        assert_eq!(list_pending(&repo, SUBJECT).unwrap().len(), 1);
    }

    #[test]
    fn acknowledge_is_idempotent() {
        let repo = MemoryRepository::new();
        let alert = create_alert(&repo, SUBJECT, draft(Severity::Medium)).unwrap();

        let first = acknowledge(&repo, SUBJECT, alert.id).unwrap();
        assert!(first.acknowledged);
        let first_time = first.acknowledged_at.unwrap();

        let second = acknowledge(&repo, SUBJECT, alert.id).unwrap();
        assert_eq!(second.acknowledged_at, Some(first_time));
    }

    #[test]
    fn acknowledge_unknown_or_foreign_alert_is_not_found() {
        let repo = MemoryRepository::new();
        let alert = create_alert(&repo, SUBJECT, draft(Severity::Medium)).unwrap();

        let err = acknowledge(&repo, SUBJECT, Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, EngineError::AlertNotFound { .. }));

        let err = acknowledge(&repo, "someone-else", alert.id).unwrap_err();
        assert!(matches!(err, EngineError::AlertNotFound { .. }));

        // The failed attempts must not have acknowledged anything.
        assert_eq!(list_pending(&repo, SUBJECT).unwrap().len(), 1);
    }

    #[test]
    fn pending_is_sorted_by_severity_then_recency() {
        let repo = MemoryRepository::new();
        let now = Utc::now();
        stored_alert(&repo, Severity::Medium, now - Duration::minutes(30));
        stored_alert(&repo, Severity::Critical, now - Duration::minutes(20));
        stored_alert(&repo, Severity::Medium, now - Duration::minutes(10));
        stored_alert(&repo, Severity::Low, now - Duration::minutes(5));

        let pending = list_pending(&repo, SUBJECT).unwrap();
        let severities: Vec<Severity> = pending.iter().map(|a| a.severity).collect();
        assert_eq!(
            severities,
            vec![
                Severity::Critical,
                Severity::Medium,
                Severity::Medium,
                Severity::Low
            ]
        );
        // Within the medium tier the fresher alert comes first.
        assert!(pending[1].created_at > pending[2].created_at);
    }

    #[test]
    fn acknowledge_all_empties_pending_and_counts() {
        let repo = MemoryRepository::new();
        for severity in [Severity::Low, Severity::Medium, Severity::High] {
            create_alert(&repo, SUBJECT, draft(severity)).unwrap();
        }
        create_alert(&repo, "someone-else", draft(Severity::High)).unwrap();

        let count = acknowledge_all(&repo, SUBJECT).unwrap();
        assert_eq!(count, 3);
        assert!(list_pending(&repo, SUBJECT).unwrap().is_empty());
        // The other subject's alert is untouched.
        assert_eq!(list_pending(&repo, "someone-else").unwrap().len(), 1);

        // Nothing left to acknowledge on a retry.
        assert_eq!(acknowledge_all(&repo, SUBJECT).unwrap(), 0);
    }

    #[test]
    fn history_is_ordered_by_acknowledgment_time_and_capped() {
        let repo = MemoryRepository::new();
        let now = Utc::now();
        for minutes in [30, 20, 10] {
            let mut alert = stored_alert(&repo, Severity::Medium, now - Duration::minutes(60));
            alert.acknowledged = true;
            alert.acknowledged_at = Some(now - Duration::minutes(minutes));
            repo.update_alert(&alert).unwrap();
        }

        let history = list_history(&repo, SUBJECT, 10).unwrap();
        assert_eq!(history.len(), 3);
        assert!(history[0].acknowledged_at > history[1].acknowledged_at);
        assert!(history[1].acknowledged_at > history[2].acknowledged_at);

        assert_eq!(list_history(&repo, SUBJECT, 2).unwrap().len(), 2);
    }
}
