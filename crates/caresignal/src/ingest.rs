//! Observation ingest: validation and normalization.
//!
//! Out-of-range values are rejected, never clamped. On success the
//! observation gets its timestamp defaulted to ingestion time; persistence
//! is the caller's job.

use chrono::Utc;
use tracing::debug;

use crate::error::{EngineError, Result};
use crate::types::{
    MedicationEvent, MoodEntry, NewObservation, Observation, ObservationData, SymptomEntry,
    VitalReading,
};

const SCORE_MIN: u8 = 1;
const SCORE_MAX: u8 = 10;
const HEART_RATE_RANGE: (u32, u32) = (30, 220);
const BP_SYSTOLIC_RANGE: (u32, u32) = (70, 250);
const BP_DIASTOLIC_RANGE: (u32, u32) = (40, 150);
const TEMPERATURE_F_RANGE: (f64, f64) = (95.0, 110.0);
const OXYGEN_SATURATION_RANGE: (u8, u8) = (70, 100);
const SLEEP_HOURS_RANGE: (f64, f64) = (0.0, 24.0);

/// Validate and normalize a submitted observation.
pub fn validate(new_observation: NewObservation) -> Result<Observation> {
    let NewObservation { recorded_at, data } = new_observation;

    let data = match data {
        ObservationData::Symptom(entry) => ObservationData::Symptom(validate_symptom(entry)?),
        ObservationData::Vital(reading) => ObservationData::Vital(validate_vitals(reading)?),
        ObservationData::Mood(entry) => ObservationData::Mood(validate_mood(entry)?),
        ObservationData::Medication(event) => {
            ObservationData::Medication(validate_medication(event)?)
        }
    };

    let observation = Observation {
        recorded_at: recorded_at.unwrap_or_else(Utc::now),
        data,
    };
    debug!("validated {:?} observation", observation.kind());
    Ok(observation)
}

fn validate_symptom(mut entry: SymptomEntry) -> Result<SymptomEntry> {
    entry.name = entry.name.trim().to_string();
    if entry.name.is_empty() {
        return Err(EngineError::MissingField {
            field: "symptom_name",
        });
    }
    check_score("severity", entry.severity)?;
    Ok(entry)
}

fn validate_vitals(reading: VitalReading) -> Result<VitalReading> {
    if reading.is_empty() {
        return Err(EngineError::EmptyVitalReading);
    }
    if let Some(hr) = reading.heart_rate {
        check_range("heart_rate", hr as f64, HEART_RATE_RANGE.0 as f64, HEART_RATE_RANGE.1 as f64)?;
    }
    if let Some(sys) = reading.bp_systolic {
        check_range(
            "bp_systolic",
            sys as f64,
            BP_SYSTOLIC_RANGE.0 as f64,
            BP_SYSTOLIC_RANGE.1 as f64,
        )?;
    }
    if let Some(dia) = reading.bp_diastolic {
        check_range(
            "bp_diastolic",
            dia as f64,
            BP_DIASTOLIC_RANGE.0 as f64,
            BP_DIASTOLIC_RANGE.1 as f64,
        )?;
    }
    if let Some(temp) = reading.temperature_f {
        check_range(
            "temperature_f",
            temp,
            TEMPERATURE_F_RANGE.0,
            TEMPERATURE_F_RANGE.1,
        )?;
    }
    if let Some(spo2) = reading.oxygen_saturation {
        check_range(
            "oxygen_saturation",
            spo2 as f64,
            OXYGEN_SATURATION_RANGE.0 as f64,
            OXYGEN_SATURATION_RANGE.1 as f64,
        )?;
    }
    if let Some(sleep) = reading.sleep_hours {
        check_range("sleep_hours", sleep, SLEEP_HOURS_RANGE.0, SLEEP_HOURS_RANGE.1)?;
    }
    Ok(reading)
}

fn validate_mood(entry: MoodEntry) -> Result<MoodEntry> {
    check_score("mood_score", entry.mood_score)?;
    if let Some(energy) = entry.energy_level {
        check_score("energy_level", energy)?;
    }
    if let Some(anxiety) = entry.anxiety_level {
        check_score("anxiety_level", anxiety)?;
    }
    Ok(entry)
}

fn validate_medication(mut event: MedicationEvent) -> Result<MedicationEvent> {
    event.medication_name = event.medication_name.trim().to_string();
    if event.medication_name.is_empty() {
        return Err(EngineError::MissingField {
            field: "medication_name",
        });
    }
    Ok(event)
}

/// 1-10 scale shared by symptom severity, mood, energy and anxiety.
fn check_score(field: &'static str, value: u8) -> Result<()> {
    check_range(field, value as f64, SCORE_MIN as f64, SCORE_MAX as f64)
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<()> {
    if value < min || value > max {
        return Err(EngineError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}
