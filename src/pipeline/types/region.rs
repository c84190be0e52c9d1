use crate::pipeline::services::image::analysis::core::ImageRegion;
use serde::{Deserialize, Serialize};

/// A named facial sub-area expressed as fractions of the image size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceRegion {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl FaceRegion {
    pub fn new(name: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            width,
            height,
        }
    }

    /// Forehead, left cheek, right cheek, nose and chin.
    pub fn default_face_regions() -> Vec<FaceRegion> {
        vec![
            FaceRegion::new("Forehead", 0.25, 0.08, 0.50, 0.20),
            FaceRegion::new("Left Cheek", 0.10, 0.40, 0.25, 0.25),
            FaceRegion::new("Right Cheek", 0.65, 0.40, 0.25, 0.25),
            FaceRegion::new("Nose", 0.40, 0.50, 0.20, 0.20),
            FaceRegion::new("Chin", 0.35, 0.78, 0.30, 0.15),
        ]
    }

    /// Pixel rectangle for an image of the given size, clamped to the image.
    pub fn to_pixels(&self, width: u32, height: u32) -> ImageRegion {
        let x = ((self.x * width as f64).floor().max(0.0) as u32).min(width);
        let y = ((self.y * height as f64).floor().max(0.0) as u32).min(height);
        let w = ((self.width * width as f64).floor().max(0.0) as u32).min(width - x);
        let h = ((self.height * height as f64).floor().max(0.0) as u32).min(height - y);
        ImageRegion::new(x, y, w, h)
    }

    pub fn validate(&self) -> Result<(), String> {
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        if !in_unit(self.x) || !in_unit(self.y) || !in_unit(self.width) || !in_unit(self.height) {
            return Err(format!(
                "Region '{}' must use fractional coordinates between 0.0 and 1.0",
                self.name
            ));
        }
        if self.x + self.width > 1.0 + f64::EPSILON || self.y + self.height > 1.0 + f64::EPSILON {
            return Err(format!("Region '{}' extends past the image", self.name));
        }
        Ok(())
    }
}

/// Coverage of each condition mask within one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionStatistic {
    pub name: String,
    pub pixel_count: u64,
    pub pigmentation_pct: u32,
    pub erythema_pct: u32,
    pub texture_pct: u32,
}

impl RegionStatistic {
    pub fn combined_pct(&self) -> u32 {
        self.pigmentation_pct + self.erythema_pct + self.texture_pct
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_pixels_floors_fractional_box() {
        let forehead = FaceRegion::new("Forehead", 0.25, 0.08, 0.50, 0.20);
        assert_eq!(forehead.to_pixels(300, 300), ImageRegion::new(75, 24, 150, 60));
    }

    #[test]
    fn to_pixels_degenerates_on_tiny_images() {
        for region in FaceRegion::default_face_regions() {
            let rect = region.to_pixels(1, 1);
            assert!(rect.x + rect.width <= 1);
            assert!(rect.y + rect.height <= 1);
        }
    }

    #[test]
    fn default_regions_are_valid() {
        let regions = FaceRegion::default_face_regions();
        assert_eq!(regions.len(), 5);
        assert!(regions.iter().all(|r| r.validate().is_ok()));
    }

    #[test]
    fn validate_rejects_overflowing_box() {
        let region = FaceRegion::new("Bad", 0.8, 0.1, 0.5, 0.1);
        assert!(region.validate().is_err());
    }
}
