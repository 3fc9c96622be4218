//! Caregiver report assembly: raw observations, compliance and alerts for a
//! window, gathered into one serializable structure.
//!
//! Rendering (CSV/PDF/JSON layout) belongs to the calling application; this
//! module only collects the data.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregates;
use crate::error::Result;
use crate::repository::Repository;
use crate::types::{Alert, ComplianceRecord, Observation, ObservationKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub subject_id: String,
    pub window_days: u32,
    pub generated_at: DateTime<Utc>,
    pub symptoms: Vec<Observation>,
    pub vitals: Vec<Observation>,
    pub mood: Vec<Observation>,
    pub medications: Vec<Observation>,
    pub medication_compliance: Vec<ComplianceRecord>,
    /// Every alert created in the window, pending and acknowledged alike.
    pub alerts: Vec<Alert>,
}

/// Gather a subject's report data for the window, newest entries first.
pub fn build_report<R: Repository>(
    repo: &R,
    subject_id: &str,
    window_days: u32,
) -> Result<HealthReport> {
    let generated_at = Utc::now();
    let since = generated_at - Duration::days(i64::from(window_days));

    let symptoms = section(repo, subject_id, ObservationKind::Symptom, since)?;
    let vitals = section(repo, subject_id, ObservationKind::Vital, since)?;
    let mood = section(repo, subject_id, ObservationKind::Mood, since)?;
    let medications = section(repo, subject_id, ObservationKind::Medication, since)?;

    let medication_compliance = aggregates::aggregate(repo, subject_id, window_days)?
        .medication
        .per_medication;

    let mut alerts = repo.query_alerts(subject_id, false)?;
    alerts.extend(repo.query_alerts(subject_id, true)?);
    alerts.retain(|alert| alert.created_at >= since);
    alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    debug!(
        "built {}-day report for subject {}: {} observations, {} alerts",
        window_days,
        subject_id,
        symptoms.len() + vitals.len() + mood.len() + medications.len(),
        alerts.len()
    );

    Ok(HealthReport {
        subject_id: subject_id.to_string(),
        window_days,
        generated_at,
        symptoms,
        vitals,
        mood,
        medications,
        medication_compliance,
        alerts,
    })
}

fn section<R: Repository>(
    repo: &R,
    subject_id: &str,
    kind: ObservationKind,
    since: DateTime<Utc>,
) -> Result<Vec<Observation>> {
    let mut observations = repo.query_observations(subject_id, kind, since)?;
    observations.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
    Ok(observations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts;
    use crate::ingest;
    use crate::memory::MemoryRepository;
    use crate::types::{AlertDraft, AlertType, NewObservation, Severity};

    const SUBJECT: &str = "subject-1";

    fn log(repo: &MemoryRepository, observation: NewObservation) {
        let validated = ingest::validate(observation).unwrap();
        repo.save_observation(SUBJECT, &validated).unwrap();
    }

    #[test]
    fn report_filters_to_window_and_orders_newest_first() {
        let repo = MemoryRepository::new();
        log(
            &repo,
            NewObservation::symptom("Headache", 4).at(Utc::now() - Duration::days(2)),
        );
        log(
            &repo,
            NewObservation::symptom("Nausea", 5).at(Utc::now() - Duration::days(1)),
        );
        log(
            &repo,
            NewObservation::symptom("Fatigue", 3).at(Utc::now() - Duration::days(40)),
        );
        log(&repo, NewObservation::medication("Zofran", "4mg", true));

        let report = build_report(&repo, SUBJECT, 30).unwrap();
        assert_eq!(report.symptoms.len(), 2);
        assert!(report.symptoms[0].recorded_at > report.symptoms[1].recorded_at);
        assert_eq!(report.medications.len(), 1);
        assert_eq!(report.medication_compliance.len(), 1);
        assert_eq!(report.medication_compliance[0].compliance_rate, 100.0);
    }

    #[test]
    fn report_includes_pending_and_acknowledged_alerts() {
        let repo = MemoryRepository::new();
        let draft = |rule: &'static str| AlertDraft {
            alert_type: AlertType::Warning,
            severity: Severity::Medium,
            title: "Vital Signs Alert".to_string(),
            message: "test".to_string(),
            recommendation: None,
            source_rule: rule,
        };
        let first = alerts::create_alert(&repo, SUBJECT, draft("fever")).unwrap();
        alerts::create_alert(&repo, SUBJECT, draft("low_oxygen")).unwrap();
        alerts::acknowledge(&repo, SUBJECT, first.id).unwrap();

        let report = build_report(&repo, SUBJECT, 30).unwrap();
        assert_eq!(report.alerts.len(), 2);

        let report_json = serde_json::to_string(&report).unwrap();
        assert!(report_json.contains("\"low_oxygen\""));
    }
}
