use crate::error::{AnalysisError, Result};
use chrono::{DateTime, Utc};
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// A decoded photo queued for analysis.
#[derive(Clone)]
pub struct Capture {
    capture_id: Uuid,
    source_name: String,
    image: Arc<RgbaImage>,
    loaded_at: DateTime<Utc>,
}

impl Capture {
    pub fn new(source_name: impl Into<String>, image: RgbaImage) -> Self {
        Self {
            capture_id: Uuid::new_v4(),
            source_name: source_name.into(),
            image: Arc::new(image),
            loaded_at: Utc::now(),
        }
    }

    pub fn from_image(source_name: impl Into<String>, image: DynamicImage) -> Self {
        Self::new(source_name, image.to_rgba8())
    }

    /// Decodes a raster file. Files without a recognised image extension are
    /// rejected before any bytes are read.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = ImageFormat::from_path(path)
            .map_err(|_| AnalysisError::UnsupportedFormat(path.to_path_buf()))?;
        if !format.reading_enabled() {
            return Err(AnalysisError::UnsupportedFormat(path.to_path_buf()));
        }

        let image = image::open(path)?;
        if image.width() == 0 || image.height() == 0 {
            return Err(AnalysisError::EmptyImage);
        }
        debug!(
            "Loaded {} ({}x{}, {:?})",
            path.display(),
            image.width(),
            image.height(),
            format
        );

        let source_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self::from_image(source_name, image))
    }

    pub fn capture_id(&self) -> Uuid {
        self.capture_id
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn image(&self) -> &Arc<RgbaImage> {
        &self.image
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    #[test]
    fn cloning_capture_shares_image_buffer() {
        let img: DynamicImage = DynamicImage::ImageRgb8(
            ImageBuffer::<Rgb<u8>, Vec<u8>>::from_pixel(16, 16, Rgb([1, 2, 3])),
        );
        let c1 = Capture::from_image("face.png", img);
        let c2 = c1.clone();
        assert!(Arc::ptr_eq(c1.image(), c2.image()));
        assert_eq!(c1.capture_id(), c2.capture_id());
    }

    #[test]
    fn open_rejects_non_image_extension() {
        let result = Capture::open("notes/consent_form.txt");
        assert!(matches!(result, Err(AnalysisError::UnsupportedFormat(_))));
    }

    #[test]
    fn open_decodes_png_from_disk() {
        let path = std::env::temp_dir().join(format!("capture-{}.png", Uuid::new_v4()));
        ImageBuffer::<Rgb<u8>, Vec<u8>>::from_pixel(4, 3, Rgb([10, 20, 30]))
            .save(&path)
            .unwrap();

        let capture = Capture::open(&path).unwrap();
        assert_eq!(capture.dimensions(), (4, 3));
        assert_eq!(capture.image().get_pixel(0, 0).0, [10, 20, 30, 255]);
        assert!(capture.source_name().ends_with(".png"));

        std::fs::remove_file(&path).unwrap();
    }
}
