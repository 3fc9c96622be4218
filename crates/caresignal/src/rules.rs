//! Alert rules evaluated against each newly ingested observation.
//!
//! Each rule is an independent pure predicate-to-draft mapping, run in a
//! fixed order; one observation can fire several rules. Rules never touch
//! storage — the lifecycle manager decides what gets persisted.

use tracing::debug;

use crate::aggregates::Aggregates;
use crate::types::{AlertDraft, AlertType, Observation, ObservationData, Severity};

const HIGH_SEVERITY_THRESHOLD: u8 = 8;
const LOW_MOOD_THRESHOLD: u8 = 3;
const HIGH_ANXIETY_THRESHOLD: u8 = 8;
const HEART_RATE_NORMAL: (u32, u32) = (60, 100);
const BP_SYSTOLIC_HIGH: u32 = 140;
const BP_DIASTOLIC_HIGH: u32 = 90;
const OXYGEN_LOW_PCT: u8 = 95;
const FEVER_TEMP_F: f64 = 100.4;
const MINDFULNESS_MOOD_CEILING: u8 = 5;
const MINDFULNESS_ANXIETY_FLOOR: u8 = 6;

type RuleFn = fn(&Observation, &Aggregates) -> Option<AlertDraft>;

struct Rule {
    name: &'static str,
    check: RuleFn,
}

/// Fixed evaluation order. Adding a rule means adding one entry here plus
/// its predicate below.
const RULES: &[Rule] = &[
    Rule {
        name: "high_severity_symptom",
        check: high_severity_symptom,
    },
    Rule {
        name: "low_mood",
        check: low_mood,
    },
    Rule {
        name: "high_anxiety",
        check: high_anxiety,
    },
    Rule {
        name: "abnormal_heart_rate",
        check: abnormal_heart_rate,
    },
    Rule {
        name: "elevated_blood_pressure",
        check: elevated_blood_pressure,
    },
    Rule {
        name: "low_oxygen",
        check: low_oxygen,
    },
    Rule {
        name: "fever",
        check: fever,
    },
    Rule {
        name: "mindfulness_suggestion",
        check: mindfulness_suggestion,
    },
];

/// Run every rule against the latest observation and current aggregates,
/// collecting the candidate alerts in rule order.
pub fn evaluate(
    subject_id: &str,
    observation: &Observation,
    aggregates: &Aggregates,
) -> Vec<AlertDraft> {
    let mut drafts = Vec::new();
    for rule in RULES {
        if let Some(draft) = (rule.check)(observation, aggregates) {
            debug!("rule {} fired for subject {}", rule.name, subject_id);
            drafts.push(draft);
        }
    }
    drafts
}

fn high_severity_symptom(observation: &Observation, _aggregates: &Aggregates) -> Option<AlertDraft> {
    let ObservationData::Symptom(entry) = &observation.data else {
        return None;
    };
    if entry.severity < HIGH_SEVERITY_THRESHOLD {
        return None;
    }
    Some(AlertDraft {
        alert_type: AlertType::Warning,
        severity: Severity::High,
        title: "High Severity Symptom Alert".to_string(),
        message: format!(
            "High severity symptom '{}' logged ({}/10).",
            entry.name, entry.severity
        ),
        recommendation: Some(
            "Consider contacting your healthcare provider if this persists.".to_string(),
        ),
        source_rule: "high_severity_symptom",
    })
}

fn low_mood(observation: &Observation, _aggregates: &Aggregates) -> Option<AlertDraft> {
    let ObservationData::Mood(entry) = &observation.data else {
        return None;
    };
    if entry.mood_score > LOW_MOOD_THRESHOLD {
        return None;
    }
    Some(AlertDraft {
        alert_type: AlertType::Advice,
        severity: Severity::Medium,
        title: "Mental Health Check-in".to_string(),
        message: format!(
            "Low mood detected ({}/10); consider reaching out to your support network.",
            entry.mood_score
        ),
        recommendation: None,
        source_rule: "low_mood",
    })
}

fn high_anxiety(observation: &Observation, _aggregates: &Aggregates) -> Option<AlertDraft> {
    let ObservationData::Mood(entry) = &observation.data else {
        return None;
    };
    let anxiety = entry.anxiety_level?;
    if anxiety < HIGH_ANXIETY_THRESHOLD {
        return None;
    }
    Some(AlertDraft {
        alert_type: AlertType::Advice,
        severity: Severity::Medium,
        title: "Mental Health Check-in".to_string(),
        message: format!(
            "High anxiety level detected ({}/10); consider mindfulness or contacting your provider.",
            anxiety
        ),
        recommendation: None,
        source_rule: "high_anxiety",
    })
}

fn abnormal_heart_rate(observation: &Observation, _aggregates: &Aggregates) -> Option<AlertDraft> {
    let ObservationData::Vital(reading) = &observation.data else {
        return None;
    };
    let heart_rate = reading.heart_rate?;
    if (HEART_RATE_NORMAL.0..=HEART_RATE_NORMAL.1).contains(&heart_rate) {
        return None;
    }
    Some(AlertDraft {
        alert_type: AlertType::Warning,
        severity: Severity::Medium,
        title: "Vital Signs Alert".to_string(),
        message: format!(
            "Heart rate of {} bpm is outside the normal range ({}-{} bpm).",
            heart_rate, HEART_RATE_NORMAL.0, HEART_RATE_NORMAL.1
        ),
        recommendation: None,
        source_rule: "abnormal_heart_rate",
    })
}

// Fires only when both sides of the reading are present.
fn elevated_blood_pressure(
    observation: &Observation,
    _aggregates: &Aggregates,
) -> Option<AlertDraft> {
    let ObservationData::Vital(reading) = &observation.data else {
        return None;
    };
    let systolic = reading.bp_systolic?;
    let diastolic = reading.bp_diastolic?;
    if systolic <= BP_SYSTOLIC_HIGH && diastolic <= BP_DIASTOLIC_HIGH {
        return None;
    }
    Some(AlertDraft {
        alert_type: AlertType::Warning,
        severity: Severity::Medium,
        title: "Vital Signs Alert".to_string(),
        message: format!(
            "Blood pressure {}/{} indicates high blood pressure.",
            systolic, diastolic
        ),
        recommendation: None,
        source_rule: "elevated_blood_pressure",
    })
}

fn low_oxygen(observation: &Observation, _aggregates: &Aggregates) -> Option<AlertDraft> {
    let ObservationData::Vital(reading) = &observation.data else {
        return None;
    };
    let saturation = reading.oxygen_saturation?;
    if saturation >= OXYGEN_LOW_PCT {
        return None;
    }
    Some(AlertDraft {
        alert_type: AlertType::Warning,
        severity: Severity::Medium,
        title: "Vital Signs Alert".to_string(),
        message: format!(
            "Oxygen saturation of {}% is below the normal range ({}-100%).",
            saturation, OXYGEN_LOW_PCT
        ),
        recommendation: None,
        source_rule: "low_oxygen",
    })
}

fn fever(observation: &Observation, _aggregates: &Aggregates) -> Option<AlertDraft> {
    let ObservationData::Vital(reading) = &observation.data else {
        return None;
    };
    let temperature = reading.temperature_f?;
    if temperature <= FEVER_TEMP_F {
        return None;
    }
    Some(AlertDraft {
        alert_type: AlertType::Warning,
        severity: Severity::Medium,
        title: "Vital Signs Alert".to_string(),
        message: format!("Temperature of {:.1}\u{00b0}F indicates fever.", temperature),
        recommendation: None,
        source_rule: "fever",
    })
}

// Low-priority advisory when a struggling mood entry has no mindfulness
// activity attached.
fn mindfulness_suggestion(
    observation: &Observation,
    _aggregates: &Aggregates,
) -> Option<AlertDraft> {
    let ObservationData::Mood(entry) = &observation.data else {
        return None;
    };
    if entry.mindfulness_activity.is_some() {
        return None;
    }
    let struggling = entry.mood_score <= MINDFULNESS_MOOD_CEILING
        || entry
            .anxiety_level
            .is_some_and(|anxiety| anxiety >= MINDFULNESS_ANXIETY_FLOOR);
    if !struggling {
        return None;
    }
    Some(AlertDraft {
        alert_type: AlertType::Advice,
        severity: Severity::Low,
        title: "Mindfulness Suggestion".to_string(),
        message: "Your mood or anxiety levels suggest you might benefit from mindfulness \
                  activities. Consider trying deep breathing, meditation, or gentle movement."
            .to_string(),
        recommendation: None,
        source_rule: "mindfulness_suggestion",
    })
}
