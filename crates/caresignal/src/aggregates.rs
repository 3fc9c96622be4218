//! Rolling-window statistics over a subject's observation history.
//!
//! Averages are arithmetic means computed only over entries where the field
//! is present; an average over zero entries is reported as absent, not 0.
//! Medication compliance is the one deliberate exception: zero recorded
//! doses is defined as 0%, so dashboards never divide by zero.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::repository::Repository;
use crate::types::{ComplianceRecord, ObservationData, ObservationKind};

/// Trailing sub-window used for the "this week" figures regardless of the
/// requested window size.
const WEEK_DAYS: i64 = 7;

/// Grouped per-symptom statistics, most frequent first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymptomPattern {
    pub name: String,
    pub frequency: u64,
    pub avg_severity: f64,
    pub min_severity: u8,
    pub max_severity: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymptomStats {
    pub count: u64,
    /// Count over the trailing 7 days (the whole window when it is shorter).
    pub count_last_week: u64,
    pub avg_severity: Option<f64>,
    pub min_severity: Option<u8>,
    pub max_severity: Option<u8>,
    pub by_name: Vec<SymptomPattern>,
}

/// Doses recorded and taken on the current UTC calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyCompliance {
    pub total_doses: u64,
    pub taken_doses: u64,
    pub compliance_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicationStats {
    pub total_doses: u64,
    pub taken_doses: u64,
    /// Overall taken percentage across every medication; 0.0 with no doses.
    pub compliance_rate: f64,
    pub per_medication: Vec<ComplianceRecord>,
    pub today: DailyCompliance,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodStats {
    pub entries: u64,
    pub avg_mood: Option<f64>,
    pub avg_energy: Option<f64>,
    pub avg_anxiety: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VitalsStats {
    pub entries: u64,
    /// Entry count over the trailing 7 days.
    pub entries_last_week: u64,
}

/// Window summary of one subject's observations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Aggregates {
    pub window_days: u32,
    pub symptoms: SymptomStats,
    pub medication: MedicationStats,
    pub mood: MoodStats,
    pub vitals: VitalsStats,
}

/// Compute window statistics for a subject from the repository.
pub fn aggregate<R: Repository>(
    repo: &R,
    subject_id: &str,
    window_days: u32,
) -> Result<Aggregates> {
    let now = Utc::now();
    let since = now - Duration::days(i64::from(window_days));
    let week_since = since.max(now - Duration::days(WEEK_DAYS));

    let symptoms = symptom_stats(repo, subject_id, since, week_since)?;
    let medication = medication_stats(repo, subject_id, since, now, window_days)?;
    let mood = mood_stats(repo, subject_id, since)?;
    let vitals = vitals_stats(repo, subject_id, since, week_since)?;

    debug!(
        "aggregated {} days for subject: {} symptoms, {} doses, {} mood entries, {} vitals",
        window_days, symptoms.count, medication.total_doses, mood.entries, vitals.entries
    );

    Ok(Aggregates {
        window_days,
        symptoms,
        medication,
        mood,
        vitals,
    })
}

fn symptom_stats<R: Repository>(
    repo: &R,
    subject_id: &str,
    since: DateTime<Utc>,
    week_since: DateTime<Utc>,
) -> Result<SymptomStats> {
    let observations = repo.query_observations(subject_id, ObservationKind::Symptom, since)?;

    let mut severities = Vec::new();
    let mut count_last_week = 0u64;
    let mut grouped: BTreeMap<String, Vec<u8>> = BTreeMap::new();

    for obs in &observations {
        if let ObservationData::Symptom(entry) = &obs.data {
            severities.push(entry.severity);
            if obs.recorded_at >= week_since {
                count_last_week += 1;
            }
            grouped.entry(entry.name.clone()).or_default().push(entry.severity);
        }
    }

    let mut by_name: Vec<SymptomPattern> = grouped
        .into_iter()
        .map(|(name, values)| SymptomPattern {
            name,
            frequency: values.len() as u64,
            avg_severity: values.iter().map(|&s| f64::from(s)).sum::<f64>() / values.len() as f64,
            min_severity: values.iter().copied().min().unwrap_or(0),
            max_severity: values.iter().copied().max().unwrap_or(0),
        })
        .collect();
    // BTreeMap iteration already ordered by name; keep that order within
    // equal frequencies.
    by_name.sort_by(|a, b| b.frequency.cmp(&a.frequency));

    Ok(SymptomStats {
        count: severities.len() as u64,
        count_last_week,
        avg_severity: mean(severities.iter().map(|&s| f64::from(s))),
        min_severity: severities.iter().copied().min(),
        max_severity: severities.iter().copied().max(),
        by_name,
    })
}

fn medication_stats<R: Repository>(
    repo: &R,
    subject_id: &str,
    since: DateTime<Utc>,
    now: DateTime<Utc>,
    window_days: u32,
) -> Result<MedicationStats> {
    let observations = repo.query_observations(subject_id, ObservationKind::Medication, since)?;

    let mut total_doses = 0u64;
    let mut taken_doses = 0u64;
    let mut today_total = 0u64;
    let mut today_taken = 0u64;
    let mut grouped: BTreeMap<String, (u64, u64)> = BTreeMap::new();

    let today = now.date_naive();
    for obs in &observations {
        if let ObservationData::Medication(event) = &obs.data {
            total_doses += 1;
            let entry = grouped.entry(event.medication_name.clone()).or_default();
            entry.0 += 1;
            if event.taken {
                taken_doses += 1;
                entry.1 += 1;
            }
            if obs.recorded_at.date_naive() == today {
                today_total += 1;
                if event.taken {
                    today_taken += 1;
                }
            }
        }
    }

    let per_medication = grouped
        .into_iter()
        .map(|(medication_name, (total, taken))| ComplianceRecord {
            medication_name,
            window_days,
            total_doses: total,
            taken_doses: taken,
            compliance_rate: percentage(taken, total),
        })
        .collect();

    Ok(MedicationStats {
        total_doses,
        taken_doses,
        compliance_rate: percentage(taken_doses, total_doses),
        per_medication,
        today: DailyCompliance {
            total_doses: today_total,
            taken_doses: today_taken,
            compliance_rate: percentage(today_taken, today_total),
        },
    })
}

fn mood_stats<R: Repository>(
    repo: &R,
    subject_id: &str,
    since: DateTime<Utc>,
) -> Result<MoodStats> {
    let observations = repo.query_observations(subject_id, ObservationKind::Mood, since)?;

    let mut moods = Vec::new();
    let mut energies = Vec::new();
    let mut anxieties = Vec::new();

    for obs in &observations {
        if let ObservationData::Mood(entry) = &obs.data {
            moods.push(f64::from(entry.mood_score));
            if let Some(energy) = entry.energy_level {
                energies.push(f64::from(energy));
            }
            if let Some(anxiety) = entry.anxiety_level {
                anxieties.push(f64::from(anxiety));
            }
        }
    }

    Ok(MoodStats {
        entries: moods.len() as u64,
        avg_mood: mean(moods.iter().copied()),
        avg_energy: mean(energies.iter().copied()),
        avg_anxiety: mean(anxieties.iter().copied()),
    })
}

fn vitals_stats<R: Repository>(
    repo: &R,
    subject_id: &str,
    since: DateTime<Utc>,
    week_since: DateTime<Utc>,
) -> Result<VitalsStats> {
    let observations = repo.query_observations(subject_id, ObservationKind::Vital, since)?;
    let entries_last_week = observations
        .iter()
        .filter(|obs| obs.recorded_at >= week_since)
        .count() as u64;

    Ok(VitalsStats {
        entries: observations.len() as u64,
        entries_last_week,
    })
}

/// Taken-over-total as a percentage; defined as 0.0 when total is zero.
fn percentage(taken: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        taken as f64 / total as f64 * 100.0
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let collected: Vec<f64> = values.collect();
    if collected.is_empty() {
        None
    } else {
        Some(collected.iter().sum::<f64>() / collected.len() as f64)
    }
}
