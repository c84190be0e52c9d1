pub mod services;
pub mod types;

pub use services::image::analysis::{SegmentationConfig, SkinAnalysisFactory, SkinAnalysisOrchestrator};
pub use services::image::OverlayRenderer;
pub use types::{AnalysisReport, Condition, Severity, SkinAnalysis};
