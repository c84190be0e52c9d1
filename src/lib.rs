pub mod common;
pub mod config;
pub mod error;
pub mod pipeline;

pub use common::Capture;
pub use crate::config::Configuration;
pub use error::{AnalysisError, Result};
pub use pipeline::{
    AnalysisReport, Condition, OverlayRenderer, SegmentationConfig, Severity, SkinAnalysis,
    SkinAnalysisFactory, SkinAnalysisOrchestrator,
};
