use super::color::{luma, Hsv};
use crate::pipeline::types::{Condition, Mask};
use image::{GrayImage, Luma, RgbaImage};
use std::sync::Arc;
use std::time::Instant;

/// Per-run analysis context shared by every detector. HSV and luma planes are
/// computed once up front so each detector reads precomputed values.
#[derive(Clone)]
pub struct AnalysisContext {
    pub image: Arc<RgbaImage>,
    pub hsv: Arc<Vec<Hsv>>,
    pub gray: Arc<GrayImage>,
    pub dimensions: (u32, u32),
}

impl AnalysisContext {
    pub fn new(image: Arc<RgbaImage>) -> Self {
        let dimensions = image.dimensions();
        let hsv = image
            .pixels()
            .map(|p| Hsv::from_rgb(p[0], p[1], p[2]))
            .collect();
        let gray = GrayImage::from_fn(dimensions.0, dimensions.1, |x, y| {
            let p = image.get_pixel(x, y);
            Luma([luma(p[0], p[1], p[2]).round().clamp(0.0, 255.0) as u8])
        });

        Self {
            image,
            hsv: Arc::new(hsv),
            gray: Arc::new(gray),
            dimensions,
        }
    }

    pub fn hsv_at(&self, x: u32, y: u32) -> Hsv {
        self.hsv[y as usize * self.dimensions.0 as usize + x as usize]
    }
}

/// Result of a detection operation with reasoning and timing.
#[derive(Debug, Clone)]
pub struct DetectionResult<T> {
    pub result: T,
    pub reasoning: String,
    pub processing_time_us: u64,
}

impl<T> DetectionResult<T> {
    pub fn new(result: T, reasoning: String) -> Self {
        Self {
            result,
            reasoning,
            processing_time_us: 0,
        }
    }

    pub fn with_timing(mut self, start_time: Instant) -> Self {
        self.processing_time_us = start_time.elapsed().as_micros() as u64;
        self
    }
}

/// Raw mask plus any threshold the detector derived from the image.
#[derive(Debug, Clone)]
pub struct ConditionMask {
    pub condition: Condition,
    pub mask: Mask,
    pub threshold: Option<f32>,
}

/// Rectangular region of an image in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ImageRegion {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Per-pixel condition classifier run by the segmentation pipeline.
pub trait MaskDetector: Send + Sync {
    fn detect(&self, context: &AnalysisContext) -> DetectionResult<ConditionMask>;
    fn condition(&self) -> Condition;
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};

    #[test]
    fn context_precomputes_planes() {
        let img = ImageBuffer::from_pixel(3, 2, Rgba([255u8, 255, 255, 255]));
        let ctx = AnalysisContext::new(Arc::new(img));
        assert_eq!(ctx.hsv.len(), 6);
        assert_eq!(ctx.gray.get_pixel(2, 1).0, [255]);
        assert_eq!(ctx.hsv_at(2, 1).value, 1.0);
    }

    #[test]
    fn region_area_is_width_times_height() {
        assert_eq!(ImageRegion::new(2, 2, 3, 3).area(), 9);
        assert_eq!(ImageRegion::new(0, 0, 0, 7).area(), 0);
    }
}
