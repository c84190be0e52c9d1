use image::imageops::{self, FilterType};
use image::RgbaImage;
use std::sync::Arc;
use tracing::debug;

/// Target size for an image of `width` x `height` whose width must not exceed
/// `max_width`. Aspect ratio is preserved; height never drops below 1.
pub fn analysis_dimensions(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width <= max_width || width == 0 {
        return (width, height);
    }
    let scale = max_width as f64 / width as f64;
    let scaled_height = ((height as f64 * scale).round() as u32).max(1);
    (max_width, scaled_height)
}

/// Downscales images wider than `max_width`; anything else is shared as is.
pub fn rescale_for_analysis(image: &Arc<RgbaImage>, max_width: u32) -> Arc<RgbaImage> {
    let (width, height) = image.dimensions();
    let (target_w, target_h) = analysis_dimensions(width, height, max_width);
    if (target_w, target_h) == (width, height) {
        return Arc::clone(image);
    }

    debug!(
        "Rescaling {}x{} to {}x{} for analysis",
        width, height, target_w, target_h
    );
    Arc::new(imageops::resize(&**image, target_w, target_h, FilterType::Triangle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};

    #[test]
    fn small_images_are_untouched() {
        assert_eq!(analysis_dimensions(640, 480, 900), (640, 480));
        assert_eq!(analysis_dimensions(900, 1200, 900), (900, 1200));

        let img = Arc::new(ImageBuffer::from_pixel(10, 10, Rgba([1u8, 2, 3, 255])));
        assert!(Arc::ptr_eq(&img, &rescale_for_analysis(&img, 900)));
    }

    #[test]
    fn wide_images_keep_aspect_ratio() {
        assert_eq!(analysis_dimensions(1800, 1200, 900), (900, 600));
        assert_eq!(analysis_dimensions(4000, 3, 900), (900, 1));
        assert_eq!(analysis_dimensions(10000, 1, 900), (900, 1));
    }

    #[test]
    fn rescale_produces_target_size() {
        let img = Arc::new(ImageBuffer::from_pixel(1000, 500, Rgba([9u8, 9, 9, 255])));
        let scaled = rescale_for_analysis(&img, 900);
        assert_eq!(scaled.dimensions(), (900, 450));
        assert_eq!(scaled.get_pixel(450, 225).0, [9, 9, 9, 255]);
    }
}
