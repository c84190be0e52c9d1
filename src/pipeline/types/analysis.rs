use super::{mask::MaskSet, region::RegionStatistic, summary::Summary};
use crate::pipeline::services::image::analysis::core::ImageRegion;
use chrono::{DateTime, Utc};
use image::RgbaImage;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// Result of one analysis run. Masks and the analysed image are kept so the
/// overlay can be re-rendered at a different opacity without re-segmenting.
#[derive(Debug, Clone)]
pub struct SkinAnalysis {
    pub capture_id: Uuid,
    pub source_name: String,
    pub analyzed_at: DateTime<Utc>,
    pub analyzed_image: Arc<RgbaImage>,
    pub masks: MaskSet,
    pub regions: Vec<RegionStatistic>,
    /// Pixel bounds of each entry in `regions`, same order.
    pub region_bounds: Vec<ImageRegion>,
    pub summary: Summary,
    pub texture_threshold: f32,
    pub processing_time_us: u64,
}

impl SkinAnalysis {
    pub fn dimensions(&self) -> (u32, u32) {
        self.analyzed_image.dimensions()
    }

    pub fn report(&self) -> AnalysisReport {
        let (width, height) = self.dimensions();
        AnalysisReport {
            capture_id: self.capture_id,
            source_name: self.source_name.clone(),
            analyzed_at: self.analyzed_at,
            width,
            height,
            texture_threshold: self.texture_threshold,
            processing_time_us: self.processing_time_us,
            regions: self.regions.clone(),
            summary: self.summary.clone(),
        }
    }
}

/// Serializable view of a [`SkinAnalysis`] without the pixel data.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub capture_id: Uuid,
    pub source_name: String,
    pub analyzed_at: DateTime<Utc>,
    pub width: u32,
    pub height: u32,
    pub texture_threshold: f32,
    pub processing_time_us: u64,
    pub regions: Vec<RegionStatistic>,
    pub summary: Summary,
}

impl AnalysisReport {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
