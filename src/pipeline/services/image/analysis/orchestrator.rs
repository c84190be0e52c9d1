/// Skin analysis orchestrator: rescale, segment, measure regions, summarize
use super::{
    assessment::summarize,
    config::SegmentationConfig,
    core::AnalysisContext,
    pipeline::SegmentationPipeline,
    statistics::region_statistics,
};
use crate::{
    common::Capture,
    error::{AnalysisError, Result},
    pipeline::services::preprocessing::rescale_for_analysis,
    pipeline::types::SkinAnalysis,
};
use chrono::Utc;
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Instant,
};
use tower::Service;
use tracing::{debug, info, instrument};

pub struct SkinAnalysisOrchestrator {
    pipeline: SegmentationPipeline,
    config: SegmentationConfig,
}

impl SkinAnalysisOrchestrator {
    pub fn new(config: SegmentationConfig) -> Result<Self> {
        config.validate().map_err(AnalysisError::InvalidConfig)?;

        Ok(Self {
            pipeline: SegmentationPipeline::from_config(&config),
            config,
        })
    }

    /// Analyze a capture and produce masks, region statistics and a summary
    #[instrument(skip(self, capture), fields(source = %capture.source_name()))]
    pub fn analyze(&self, capture: &Capture) -> Result<SkinAnalysis> {
        let analysis_start = Instant::now();
        let (width, height) = capture.dimensions();
        if width == 0 || height == 0 {
            return Err(AnalysisError::EmptyImage);
        }

        let image = rescale_for_analysis(capture.image(), self.config.max_width);
        let context = AnalysisContext::new(image.clone());

        let segmentation = self.pipeline.process(&context);
        debug!(
            "Segmentation completed in {}us: {}",
            segmentation.processing_time_us, segmentation.reasoning
        );
        let segmentation = segmentation.result;

        let regions = region_statistics(&segmentation.masks, &self.config.regions);
        let (analyzed_w, analyzed_h) = image.dimensions();
        let region_bounds = self
            .config
            .regions
            .iter()
            .map(|r| r.to_pixels(analyzed_w, analyzed_h))
            .collect();
        let summary = summarize(&regions, &self.config);

        let processing_time_us = analysis_start.elapsed().as_micros() as u64;
        info!(
            "Skin analysis completed in {}us: {} overall, primary concern {:?}",
            processing_time_us, summary.overall_severity, summary.primary_concern
        );

        Ok(SkinAnalysis {
            capture_id: capture.capture_id(),
            source_name: capture.source_name().to_string(),
            analyzed_at: Utc::now(),
            analyzed_image: image,
            masks: segmentation.masks,
            regions,
            region_bounds,
            summary,
            texture_threshold: segmentation.texture_threshold,
            processing_time_us,
        })
    }

    /// Swap in new thresholds; detectors are rebuilt, nothing else changes.
    pub fn update_config(&mut self, new_config: SegmentationConfig) -> Result<()> {
        new_config.validate().map_err(AnalysisError::InvalidConfig)?;
        self.pipeline = SegmentationPipeline::from_config(&new_config);
        self.config = new_config;
        Ok(())
    }
}

impl Clone for SkinAnalysisOrchestrator {
    fn clone(&self) -> Self {
        // Detectors are rebuilt from the already-validated config
        Self {
            pipeline: SegmentationPipeline::from_config(&self.config),
            config: self.config.clone(),
        }
    }
}

impl Service<Capture> for SkinAnalysisOrchestrator {
    type Response = SkinAnalysis;
    type Error = AnalysisError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, capture: Capture) -> Self::Future {
        let result = self.analyze(&capture);
        if let Err(e) = &result {
            tracing::error!("Skin analysis failed: {}", e);
        }
        Box::pin(async move { result })
    }
}

/// Factory for creating different analysis configurations
pub struct SkinAnalysisFactory;

impl SkinAnalysisFactory {
    pub fn create_default() -> Result<SkinAnalysisOrchestrator> {
        SkinAnalysisOrchestrator::new(SegmentationConfig::default())
    }

    pub fn create_custom(config: SegmentationConfig) -> Result<SkinAnalysisOrchestrator> {
        SkinAnalysisOrchestrator::new(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::{Condition, Severity};
    use image::{ImageBuffer, Rgba, RgbaImage};
    use tower::ServiceExt;

    fn quadrant_image() -> RgbaImage {
        ImageBuffer::from_fn(300, 300, |x, y| {
            if x < 150 && y < 150 {
                Rgba([80, 60, 50, 255])
            } else {
                Rgba([200, 200, 200, 255])
            }
        })
    }

    fn stat<'a>(analysis: &'a SkinAnalysis, name: &str) -> &'a crate::pipeline::types::RegionStatistic {
        analysis.regions.iter().find(|r| r.name == name).unwrap()
    }

    #[test]
    fn quadrant_pigmentation_concentrates_in_upper_left_regions() {
        let orchestrator = SkinAnalysisFactory::create_default().unwrap();
        let analysis = orchestrator
            .analyze(&Capture::new("quadrant.png", quadrant_image()))
            .unwrap();

        let forehead = stat(&analysis, "Forehead");
        let left_cheek = stat(&analysis, "Left Cheek");
        assert!(forehead.pigmentation_pct >= 45, "forehead {}", forehead.pigmentation_pct);
        assert!(left_cheek.pigmentation_pct >= 35, "left cheek {}", left_cheek.pigmentation_pct);
        for name in ["Right Cheek", "Nose", "Chin"] {
            assert_eq!(stat(&analysis, name).pigmentation_pct, 0, "{name}");
        }
        for region in &analysis.regions {
            assert_eq!(region.erythema_pct, 0);
        }

        let primary = analysis.summary.primary_concern.as_deref().unwrap();
        assert!(primary == "Forehead" || primary == "Left Cheek", "{primary}");
    }

    #[test]
    fn repeated_runs_are_identical() {
        let orchestrator = SkinAnalysisFactory::create_default().unwrap();
        let capture = Capture::new("quadrant.png", quadrant_image());
        let first = orchestrator.analyze(&capture).unwrap();
        let second = orchestrator.analyze(&capture).unwrap();
        assert_eq!(first.masks, second.masks);
        assert_eq!(first.regions, second.regions);
        assert_eq!(first.summary, second.summary);
        assert_eq!(first.texture_threshold, second.texture_threshold);
    }

    #[test]
    fn one_pixel_image_reports_bounded_percentages() {
        let orchestrator = SkinAnalysisFactory::create_default().unwrap();
        let img = ImageBuffer::from_pixel(1, 1, Rgba([180, 100, 90, 255]));
        let analysis = orchestrator.analyze(&Capture::new("dot.png", img)).unwrap();
        assert_eq!(analysis.regions.len(), 5);
        for region in &analysis.regions {
            for pct in [region.pigmentation_pct, region.erythema_pct, region.texture_pct] {
                assert!(pct <= 100);
            }
        }
        assert_eq!(analysis.summary.overall_severity, Severity::Minimal);
    }

    #[test]
    fn flat_image_has_no_texture() {
        let orchestrator = SkinAnalysisFactory::create_default().unwrap();
        let img = ImageBuffer::from_pixel(120, 120, Rgba([210, 170, 150, 255]));
        let analysis = orchestrator.analyze(&Capture::new("flat.png", img)).unwrap();
        assert!(analysis.masks.texture.is_empty());
        assert_eq!(analysis.summary.average(Condition::Texture), 0.0);
    }

    #[test]
    fn wide_images_are_downscaled() {
        let orchestrator = SkinAnalysisFactory::create_default().unwrap();
        let img = ImageBuffer::from_pixel(1200, 600, Rgba([200, 200, 200, 255]));
        let analysis = orchestrator.analyze(&Capture::new("wide.png", img)).unwrap();
        assert_eq!(analysis.dimensions(), (900, 450));
        assert_eq!(analysis.masks.dimensions(), (900, 450));
    }

    #[test]
    fn wide_images_are_smoothed_at_analysis_size() {
        let orchestrator = SkinAnalysisFactory::create_default().unwrap();
        let img = ImageBuffer::from_pixel(1200, 40, Rgba([80, 60, 50, 255]));
        let analysis = orchestrator.analyze(&Capture::new("strip.png", img)).unwrap();
        let (w, h) = analysis.dimensions();
        assert_eq!(w, 900);
        assert!(!analysis.masks.pigmentation.get(0, 0));
        assert!(!analysis.masks.pigmentation.get(w - 1, h - 1));
        assert!(analysis.masks.pigmentation.get(w / 2, h / 2));
    }

    #[test]
    fn updated_config_applies_to_later_runs() {
        let mut orchestrator = SkinAnalysisFactory::create_default().unwrap();
        // Warm patch: red lead of 30 and dominance ~0.17 sit between the two gates
        let capture = Capture::new(
            "warm.png",
            ImageBuffer::from_pixel(50, 50, Rgba([180, 150, 120, 255])),
        );
        let before = orchestrator.analyze(&capture).unwrap();
        assert!(!before.masks.erythema.is_empty());

        orchestrator
            .update_config(SegmentationConfig::warm_skin_optimized())
            .unwrap();
        let after = orchestrator.analyze(&capture).unwrap();
        assert!(after.masks.erythema.is_empty());
        assert_eq!(after.summary.average(Condition::Erythema), 0.0);
    }

    #[test]
    fn update_config_rejects_invalid_thresholds() {
        let mut orchestrator = SkinAnalysisFactory::create_default().unwrap();
        let mut config = SegmentationConfig::default();
        config.max_width = 1200;
        assert!(matches!(
            orchestrator.update_config(config),
            Err(AnalysisError::InvalidConfig(_))
        ));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = SegmentationConfig::default();
        config.max_width = 0;
        assert!(matches!(
            SkinAnalysisOrchestrator::new(config),
            Err(AnalysisError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn service_call_returns_analysis() {
        let orchestrator = SkinAnalysisFactory::create_default().unwrap();
        let img = ImageBuffer::from_pixel(50, 50, Rgba([180, 100, 90, 255]));
        let analysis = orchestrator
            .oneshot(Capture::new("red.png", img))
            .await
            .unwrap();
        assert!(analysis.summary.average(Condition::Erythema) > 0.0);
    }
}
