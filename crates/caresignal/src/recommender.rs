//! Recommendation ranker: actionable suggestions derived from aggregates.
//!
//! Recomputed fresh on every insights request, never stored. Each rule
//! yields at most one recommendation; output is ordered by priority with
//! rule-declaration order breaking ties.

use tracing::debug;

use crate::aggregates::Aggregates;
use crate::types::{Priority, Recommendation, RecommendationKind};

const COMPLIANCE_TARGET_PCT: f64 = 80.0;
const SEVERITY_CONCERN: f64 = 6.0;
const MOOD_CONCERN: f64 = 5.0;
const FREQUENT_SYMPTOMS_PER_WEEK: u64 = 10;

/// Derive the prioritized recommendation list from current aggregates.
pub fn recommend(aggregates: &Aggregates) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if aggregates.medication.compliance_rate < COMPLIANCE_TARGET_PCT {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Medication,
            priority: Priority::High,
            title: "Improve Medication Compliance".to_string(),
            message: format!(
                "Your medication compliance is {:.0}%. Consider setting reminders or using a \
                 pill organizer to improve adherence.",
                aggregates.medication.compliance_rate
            ),
            suggested_action: "Set up medication reminders".to_string(),
        });
    }

    if let Some(avg_severity) = aggregates.symptoms.avg_severity {
        if aggregates.symptoms.count > 0 && avg_severity > SEVERITY_CONCERN {
            recommendations.push(Recommendation {
                kind: RecommendationKind::Symptom,
                priority: Priority::High,
                title: "High Symptom Severity".to_string(),
                message: format!(
                    "Your average symptom severity over the last {} days is {:.1}/10. Consider \
                     discussing pain management with your healthcare team.",
                    aggregates.window_days, avg_severity
                ),
                suggested_action: "Contact your doctor".to_string(),
            });
        }
    }

    if let Some(avg_mood) = aggregates.mood.avg_mood {
        if aggregates.mood.entries > 0 && avg_mood < MOOD_CONCERN {
            recommendations.push(Recommendation {
                kind: RecommendationKind::Mood,
                priority: Priority::Medium,
                title: "Mental Health Support".to_string(),
                message: "Your mood has been lower than usual. Consider practicing mindfulness \
                          exercises or reaching out to a counselor."
                    .to_string(),
                suggested_action: "Try mindfulness activities".to_string(),
            });
        }
    }

    if aggregates.symptoms.count_last_week > FREQUENT_SYMPTOMS_PER_WEEK {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Wellness,
            priority: Priority::Medium,
            title: "Frequent Symptoms".to_string(),
            message: format!(
                "You've logged {} symptoms this week. Consider tracking triggers and discussing \
                 patterns with your doctor.",
                aggregates.symptoms.count_last_week
            ),
            suggested_action: "Review symptom patterns".to_string(),
        });
    }

    if aggregates.vitals.entries_last_week == 0 {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Vitals,
            priority: Priority::Low,
            title: "Track Your Vitals".to_string(),
            message: "Regular vital sign monitoring can help detect health changes early. \
                      Consider recording your vitals weekly."
                .to_string(),
            suggested_action: "Record vitals".to_string(),
        });
    }

    // Stable sort keeps declaration order within a priority tier.
    recommendations.sort_by(|a, b| b.priority.cmp(&a.priority));
    debug!("derived {} recommendations", recommendations.len());
    recommendations
}
