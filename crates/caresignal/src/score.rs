//! Dashboard health summary: the score-card view over weekly aggregates.
//!
//! Derived and non-persisted, like recommendations. Band thresholds match
//! the dashboard presentation: 80/60 for compliance, 6 for mood, 5 for
//! symptom severity.

use serde::{Deserialize, Serialize};

use crate::aggregates::Aggregates;

const COMPLIANCE_EXCELLENT_PCT: f64 = 80.0;
const COMPLIANCE_GOOD_PCT: f64 = 60.0;
const MOOD_POSITIVE: f64 = 6.0;
const SEVERITY_ATTENTION: f64 = 5.0;

/// Used when a card has no data to judge; keeps the banding identical to
/// the neutral midpoint the dashboard assumes.
const NEUTRAL_SCORE: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceBand {
    Excellent,
    Good,
    NeedsImprovement,
}

impl ComplianceBand {
    pub fn from_rate(rate: f64) -> Self {
        if rate >= COMPLIANCE_EXCELLENT_PCT {
            Self::Excellent
        } else if rate >= COMPLIANCE_GOOD_PCT {
            Self::Good
        } else {
            Self::NeedsImprovement
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodBand {
    Positive,
    MonitorClosely,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicationCard {
    pub compliance_rate: f64,
    pub band: ComplianceBand,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymptomCard {
    pub count: u64,
    pub avg_severity: Option<f64>,
    pub needs_attention: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodCard {
    pub avg_mood: Option<f64>,
    pub band: MoodBand,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VitalsCard {
    pub entries: u64,
    pub active: bool,
}

/// The weekly overview cards plus the fresh-alert banner count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthSummary {
    pub medication: MedicationCard,
    pub symptoms: SymptomCard,
    pub mood: MoodCard,
    pub vitals: VitalsCard,
    /// Pending alerts created within the last 24 hours.
    pub recent_alert_count: u64,
}

/// Assemble the summary from weekly aggregates and the recent pending-alert
/// count supplied by the lifecycle side.
pub fn health_summary(aggregates: &Aggregates, recent_alert_count: u64) -> HealthSummary {
    let compliance_rate = aggregates.medication.compliance_rate;
    let avg_severity = aggregates.symptoms.avg_severity;
    let avg_mood = aggregates.mood.avg_mood;

    HealthSummary {
        medication: MedicationCard {
            compliance_rate,
            band: ComplianceBand::from_rate(compliance_rate),
        },
        symptoms: SymptomCard {
            count: aggregates.symptoms.count,
            avg_severity,
            needs_attention: avg_severity.unwrap_or(NEUTRAL_SCORE) > SEVERITY_ATTENTION,
        },
        mood: MoodCard {
            avg_mood,
            band: if avg_mood.unwrap_or(NEUTRAL_SCORE) >= MOOD_POSITIVE {
                MoodBand::Positive
            } else {
                MoodBand::MonitorClosely
            },
        },
        vitals: VitalsCard {
            entries: aggregates.vitals.entries,
            active: aggregates.vitals.entries > 0,
        },
        recent_alert_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregates::aggregate;
    use crate::ingest;
    use crate::memory::MemoryRepository;
    use crate::repository::Repository;
    use crate::types::{MoodEntry, NewObservation};

    fn log(repo: &MemoryRepository, observation: NewObservation) {
        let validated = ingest::validate(observation).unwrap();
        repo.save_observation("s", &validated).unwrap();
    }

    #[test]
    fn compliance_bands_split_at_80_and_60() {
        assert_eq!(ComplianceBand::from_rate(100.0), ComplianceBand::Excellent);
        assert_eq!(ComplianceBand::from_rate(80.0), ComplianceBand::Excellent);
        assert_eq!(ComplianceBand::from_rate(79.9), ComplianceBand::Good);
        assert_eq!(ComplianceBand::from_rate(60.0), ComplianceBand::Good);
        assert_eq!(
            ComplianceBand::from_rate(59.9),
            ComplianceBand::NeedsImprovement
        );
    }

    #[test]
    fn cards_reflect_weekly_aggregates() {
        let repo = MemoryRepository::new();
        log(&repo, NewObservation::symptom("Headache", 7));
        log(&repo, NewObservation::medication("Zofran", "4mg", true));
        log(
            &repo,
            NewObservation::mood(MoodEntry {
                mood_score: 8,
                energy_level: None,
                anxiety_level: None,
                note: None,
                mindfulness_activity: None,
                activity_completed: false,
            }),
        );

        let summary = health_summary(&aggregate(&repo, "s", 7).unwrap(), 2);
        assert_eq!(summary.medication.band, ComplianceBand::Excellent);
        assert!(summary.symptoms.needs_attention);
        assert_eq!(summary.mood.band, MoodBand::Positive);
        assert!(!summary.vitals.active);
        assert_eq!(summary.recent_alert_count, 2);
    }

    #[test]
    fn absent_data_reads_as_neutral() {
        let repo = MemoryRepository::new();
        let summary = health_summary(&aggregate(&repo, "s", 7).unwrap(), 0);
        // No symptoms: nothing to flag. No mood entries: keep watching.
        assert!(!summary.symptoms.needs_attention);
        assert_eq!(summary.mood.band, MoodBand::MonitorClosely);
        assert_eq!(summary.medication.band, ComplianceBand::NeedsImprovement);
    }
}
