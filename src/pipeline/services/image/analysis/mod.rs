pub mod assessment;
pub mod color;
pub mod config;
pub mod core;
pub mod detectors;
pub mod orchestrator;
pub mod pipeline;
pub mod smoothing;
pub mod statistics;

pub use self::config::{
    clamp_opacity, ErythemaThresholds, PigmentationThresholds, SegmentationConfig,
    TextureThresholds, DEFAULT_OVERLAY_OPACITY,
};
pub use self::core::{AnalysisContext, ConditionMask, DetectionResult, ImageRegion, MaskDetector};
pub use detectors::{ErythemaDetector, PigmentationDetector, TextureDetector};
pub use orchestrator::{SkinAnalysisFactory, SkinAnalysisOrchestrator};
pub use pipeline::{Segmentation, SegmentationPipeline};
