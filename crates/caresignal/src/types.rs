//! Core data model for the alerting and insights engine.
//!
//! Observations are immutable once recorded and belong to exactly one
//! subject. Alerts are created only by the rule evaluator and only ever
//! move from pending to acknowledged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Alert category, as grouped by the notification surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Warning,
    Advice,
    Reminder,
    Emergency,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Advice => "advice",
            Self::Reminder => "reminder",
            Self::Emergency => "emergency",
        }
    }
}

/// Alert severity. The derived ordering is total:
/// critical > high > medium > low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// Recommendation priority, ordered high > medium > low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// Discriminant used when querying a subject's history by observation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObservationKind {
    Symptom,
    Vital,
    Mood,
    Medication,
}

/// A logged symptom with its 1-10 severity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymptomEntry {
    pub name: String,
    pub severity: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// A vital-sign reading. Every field is optional; omitted measurements are
/// simply absent from aggregation, never treated as zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VitalReading {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bp_systolic: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bp_diastolic: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_f: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oxygen_saturation: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl VitalReading {
    /// True when the reading carries no measurement at all.
    pub fn is_empty(&self) -> bool {
        self.heart_rate.is_none()
            && self.bp_systolic.is_none()
            && self.bp_diastolic.is_none()
            && self.temperature_f.is_none()
            && self.oxygen_saturation.is_none()
            && self.step_count.is_none()
            && self.sleep_hours.is_none()
            && self.weight.is_none()
    }
}

/// A mood check-in. Energy and anxiety are optional companions to the
/// required mood score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodEntry {
    pub mood_score: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anxiety_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mindfulness_activity: Option<String>,
    #[serde(default)]
    pub activity_completed: bool,
}

/// One medication dose event. A row counts as a dose whether or not it was
/// marked taken; compliance is the taken fraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicationEvent {
    pub medication_name: String,
    pub dosage: String,
    pub taken: bool,
}

/// The typed payload of an observation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObservationData {
    Symptom(SymptomEntry),
    Vital(VitalReading),
    Mood(MoodEntry),
    Medication(MedicationEvent),
}

/// An observation as submitted by the caller, before validation. The
/// timestamp may be omitted and defaults to ingestion time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewObservation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
    pub data: ObservationData,
}

impl NewObservation {
    pub fn symptom(name: impl Into<String>, severity: u8) -> Self {
        Self {
            recorded_at: None,
            data: ObservationData::Symptom(SymptomEntry {
                name: name.into(),
                severity,
                note: None,
            }),
        }
    }

    pub fn vitals(reading: VitalReading) -> Self {
        Self {
            recorded_at: None,
            data: ObservationData::Vital(reading),
        }
    }

    pub fn mood(entry: MoodEntry) -> Self {
        Self {
            recorded_at: None,
            data: ObservationData::Mood(entry),
        }
    }

    pub fn medication(name: impl Into<String>, dosage: impl Into<String>, taken: bool) -> Self {
        Self {
            recorded_at: None,
            data: ObservationData::Medication(MedicationEvent {
                medication_name: name.into(),
                dosage: dosage.into(),
                taken,
            }),
        }
    }

    /// Pin the observation to an explicit timestamp.
    pub fn at(mut self, recorded_at: DateTime<Utc>) -> Self {
        self.recorded_at = Some(recorded_at);
        self
    }
}

/// A validated, timestamped observation ready for persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub recorded_at: DateTime<Utc>,
    pub data: ObservationData,
}

impl Observation {
    pub fn kind(&self) -> ObservationKind {
        match self.data {
            ObservationData::Symptom(_) => ObservationKind::Symptom,
            ObservationData::Vital(_) => ObservationKind::Vital,
            ObservationData::Mood(_) => ObservationKind::Mood,
            ObservationData::Medication(_) => ObservationKind::Medication,
        }
    }
}

/// A rule's output before the lifecycle manager assigns identity and
/// persists it.
#[derive(Debug, Clone)]
pub struct AlertDraft {
    pub alert_type: AlertType,
    pub severity: Severity,
    pub title: String,
    pub message: String,
    pub recommendation: Option<String>,
    pub source_rule: &'static str,
}

/// A persisted, rule-triggered notification with an acknowledgment
/// lifecycle. `acknowledged_at` is set if and only if `acknowledged` is true.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    pub subject_id: String,
    pub alert_type: AlertType,
    pub severity: Severity,
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    pub source_rule: String,
    pub acknowledged: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acknowledged_at: Option<DateTime<Utc>>,
}

/// Medication compliance over a window. Derived, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceRecord {
    pub medication_name: String,
    pub window_days: u32,
    pub total_doses: u64,
    pub taken_doses: u64,
    /// Percentage of doses marked taken; 0.0 when no doses were recorded.
    pub compliance_rate: f64,
}

/// Which tracking area a recommendation points the subject at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Medication,
    Symptom,
    Mood,
    Wellness,
    Vitals,
}

/// An actionable suggestion derived from current aggregates. Recomputed on
/// every insights request, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub priority: Priority,
    pub title: String,
    pub message: String,
    pub suggested_action: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_order_is_total() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);
    }

    #[test]
    fn enums_serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&AlertType::Warning).unwrap(),
            "\"warning\""
        );
        assert_eq!(
            serde_json::to_string(&Severity::Critical).unwrap(),
            "\"critical\""
        );
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"high\"");
    }

    #[test]
    fn empty_vital_reading_detected() {
        assert!(VitalReading::default().is_empty());
        let reading = VitalReading {
            heart_rate: Some(72),
            ..Default::default()
        };
        assert!(!reading.is_empty());
    }

    #[test]
    fn observation_kind_matches_payload() {
        let obs = Observation {
            recorded_at: Utc::now(),
            data: ObservationData::Medication(MedicationEvent {
                medication_name: "Zofran".to_string(),
                dosage: "4mg".to_string(),
                taken: true,
            }),
        };
        assert_eq!(obs.kind(), ObservationKind::Medication);
    }
}
