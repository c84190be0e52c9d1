/// Segmentation pipeline: runs each mask detector, then one majority-filter pass
use super::config::SegmentationConfig;
use super::core::{AnalysisContext, DetectionResult, MaskDetector};
use super::detectors::{ErythemaDetector, PigmentationDetector, TextureDetector};
use super::smoothing::majority_filter;
use crate::pipeline::types::MaskSet;
use std::time::Instant;
use tracing::debug;

/// Smoothed masks plus the derived texture threshold.
#[derive(Debug, Clone)]
pub struct Segmentation {
    pub masks: MaskSet,
    pub texture_threshold: f32,
}

pub struct SegmentationPipeline {
    detectors: Vec<Box<dyn MaskDetector>>,
}

impl SegmentationPipeline {
    pub fn new() -> Self {
        Self {
            detectors: Vec::new(),
        }
    }

    /// Pigmentation, erythema and texture detectors built from `config`.
    pub fn from_config(config: &SegmentationConfig) -> Self {
        Self::new()
            .add_detector(Box::new(PigmentationDetector::with_thresholds(
                config.pigmentation.clone(),
            )))
            .add_detector(Box::new(ErythemaDetector::with_thresholds(
                config.erythema.clone(),
            )))
            .add_detector(Box::new(TextureDetector::with_thresholds(
                config.texture.clone(),
            )))
    }

    pub fn add_detector(mut self, detector: Box<dyn MaskDetector>) -> Self {
        self.detectors.push(detector);
        self
    }

    pub fn process(&self, context: &AnalysisContext) -> DetectionResult<Segmentation> {
        let start_time = Instant::now();
        let (width, height) = context.dimensions;
        let mut masks = MaskSet::empty(width, height);
        let mut texture_threshold = 0.0;
        let mut processing_log = Vec::with_capacity(self.detectors.len());

        for detector in &self.detectors {
            let result = detector.detect(context);
            let raw = result.result;

            let mask = majority_filter(&raw.mask);
            if let Some(threshold) = raw.threshold {
                texture_threshold = threshold;
            }

            debug!(
                "{}: {} in {}us, {} pixels after smoothing",
                detector.name(),
                result.reasoning,
                result.processing_time_us,
                mask.count()
            );
            processing_log.push(format!("{}: {}", detector.name(), result.reasoning));

            *masks.get_mut(raw.condition) = mask;
        }

        DetectionResult::new(
            Segmentation {
                masks,
                texture_threshold,
            },
            format!(
                "Pipeline ran {} detectors: {}",
                self.detectors.len(),
                processing_log.join("; ")
            ),
        )
        .with_timing(start_time)
    }

    /// Get statistics about the pipeline
    pub fn get_stats(&self) -> PipelineStats {
        PipelineStats {
            total_detectors: self.detectors.len(),
            detector_names: self
                .detectors
                .iter()
                .map(|d| d.name().to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineStats {
    pub total_detectors: usize,
    pub detector_names: Vec<String>,
}

impl Default for SegmentationPipeline {
    fn default() -> Self {
        Self::from_config(&SegmentationConfig::default())
    }
}
