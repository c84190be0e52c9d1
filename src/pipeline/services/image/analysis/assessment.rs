use super::config::{RecommendationCutoffs, SegmentationConfig};
use crate::pipeline::types::{
    Condition, ConditionAssessment, Recommendations, RegionStatistic, Severity, Summary,
};

const DEFER_PROCEDURES: &str =
    "Defer PMU procedures until visible redness subsides; re-assess in 2-4 weeks.";
const MEDICAL_REFERRAL: &str =
    "Widespread redness detected; refer the client for a medical skin review before any treatment.";
const PATCH_TEST: &str =
    "Perform a pigment patch test before treatment; uneven pigmentation can alter healed colour.";
const SPF_PROTOCOL: &str =
    "Start a daily SPF 50 protocol and avoid sun exposure for 4-6 weeks before treatment.";
const MICROCHANNELING: &str =
    "Consider a microchanneling series to even out texture before brow or lip work.";
const MAINTAIN_ROUTINE: &str =
    "Skin is in good condition for PMU; maintain the current skincare routine.";

/// Mean percentage of `condition` across all regions.
pub fn average_coverage(stats: &[RegionStatistic], condition: Condition) -> f64 {
    if stats.is_empty() {
        return 0.0;
    }
    let total: u32 = stats
        .iter()
        .map(|s| match condition {
            Condition::Pigmentation => s.pigmentation_pct,
            Condition::Erythema => s.erythema_pct,
            Condition::Texture => s.texture_pct,
        })
        .sum();
    total as f64 / stats.len() as f64
}

/// Region with the highest combined coverage; ties keep table order.
pub fn primary_concern(stats: &[RegionStatistic]) -> Option<&RegionStatistic> {
    stats.iter().fold(None, |best: Option<&RegionStatistic>, s| match best {
        Some(b) if b.combined_pct() >= s.combined_pct() => Some(b),
        _ => Some(s),
    })
}

pub fn recommendations(
    averages: &[(Condition, f64)],
    severities: &[Severity],
    cutoffs: &RecommendationCutoffs,
) -> Recommendations {
    let avg = |condition: Condition| {
        averages
            .iter()
            .find(|(c, _)| *c == condition)
            .map(|(_, a)| *a)
            .unwrap_or(0.0)
    };
    let erythema = avg(Condition::Erythema);
    let pigmentation = avg(Condition::Pigmentation);
    let texture = avg(Condition::Texture);

    let mut recs = Recommendations::default();
    if erythema > cutoffs.erythema_defer_pct {
        recs.immediate.push(DEFER_PROCEDURES.to_string());
    }
    if erythema > cutoffs.erythema_referral_pct {
        recs.immediate.push(MEDICAL_REFERRAL.to_string());
    }
    if pigmentation > cutoffs.pigmentation_patch_test_pct {
        recs.immediate.push(PATCH_TEST.to_string());
    }
    if pigmentation > cutoffs.pigmentation_spf_pct {
        recs.short_term.push(SPF_PROTOCOL.to_string());
    }
    if texture > cutoffs.texture_microchanneling_pct {
        recs.long_term.push(MICROCHANNELING.to_string());
    }
    if severities.iter().all(|s| *s == Severity::Minimal) {
        recs.long_term.push(MAINTAIN_ROUTINE.to_string());
    }
    recs
}

/// Averages, severity classification, primary concern and recommendations.
pub fn summarize(stats: &[RegionStatistic], config: &SegmentationConfig) -> Summary {
    let assessments: Vec<ConditionAssessment> = Condition::ALL
        .iter()
        .map(|&condition| {
            let thresholds = match condition {
                Condition::Pigmentation => config.severity.pigmentation,
                Condition::Erythema => config.severity.erythema,
                Condition::Texture => config.severity.texture,
            };
            let average_pct = average_coverage(stats, condition);
            let severity = thresholds.classify(average_pct);
            ConditionAssessment {
                condition,
                average_pct,
                severity,
                confidence: severity.confidence(),
                priority: severity.priority().to_string(),
            }
        })
        .collect();

    let overall_severity = assessments
        .iter()
        .map(|a| a.severity)
        .max()
        .unwrap_or(Severity::Minimal);

    let averages: Vec<(Condition, f64)> =
        assessments.iter().map(|a| (a.condition, a.average_pct)).collect();
    let severities: Vec<Severity> = assessments.iter().map(|a| a.severity).collect();

    Summary {
        overall_severity,
        overall_confidence: overall_severity.confidence(),
        primary_concern: primary_concern(stats).map(|s| s.name.clone()),
        recommendations: recommendations(&averages, &severities, &config.recommendations),
        assessments,
    }
}
