pub mod analysis;
pub mod condition;
pub mod mask;
pub mod region;
pub mod summary;

pub use analysis::{AnalysisReport, SkinAnalysis};
pub use condition::Condition;
pub use mask::{Mask, MaskSet};
pub use region::{FaceRegion, RegionStatistic};
pub use summary::{
    Confidence, ConditionAssessment, Recommendations, Severity, SeverityThresholds, Summary,
};
