use super::condition::Condition;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Minimal,
    Mild,
    Moderate,
    Significant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
}

impl Severity {
    pub fn confidence(&self) -> Confidence {
        match self {
            Severity::Minimal | Severity::Significant => Confidence::High,
            Severity::Mild | Severity::Moderate => Confidence::Medium,
        }
    }

    pub fn priority(&self) -> &'static str {
        match self {
            Severity::Minimal => "Low",
            Severity::Mild => "Moderate",
            Severity::Moderate => "High",
            Severity::Significant => "Urgent",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Severity::Minimal => "Minimal",
            Severity::Mild => "Mild",
            Severity::Moderate => "Moderate",
            Severity::Significant => "Significant",
        };
        f.write_str(s)
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::High => f.write_str("High"),
            Confidence::Medium => f.write_str("Medium"),
        }
    }
}

/// Severity band boundaries on average percentage coverage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityThresholds {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

impl SeverityThresholds {
    pub const fn new(low: f64, medium: f64, high: f64) -> Self {
        Self { low, medium, high }
    }

    pub fn classify(&self, average_pct: f64) -> Severity {
        if average_pct < self.low {
            Severity::Minimal
        } else if average_pct < self.medium {
            Severity::Mild
        } else if average_pct < self.high {
            Severity::Moderate
        } else {
            Severity::Significant
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.low >= 0.0 && self.low <= self.medium && self.medium <= self.high && self.high <= 100.0) {
            return Err(format!(
                "Severity thresholds must satisfy 0 <= low <= medium <= high <= 100, got {}/{}/{}",
                self.low, self.medium, self.high
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionAssessment {
    pub condition: Condition,
    pub average_pct: f64,
    pub severity: Severity,
    pub confidence: Confidence,
    pub priority: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendations {
    pub immediate: Vec<String>,
    pub short_term: Vec<String>,
    pub long_term: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub assessments: Vec<ConditionAssessment>,
    /// Most severe of the per-condition classifications.
    pub overall_severity: Severity,
    pub overall_confidence: Confidence,
    pub primary_concern: Option<String>,
    pub recommendations: Recommendations,
}

impl Summary {
    pub fn assessment(&self, condition: Condition) -> Option<&ConditionAssessment> {
        self.assessments.iter().find(|a| a.condition == condition)
    }

    pub fn average(&self, condition: Condition) -> f64 {
        self.assessment(condition).map(|a| a.average_pct).unwrap_or(0.0)
    }
}
