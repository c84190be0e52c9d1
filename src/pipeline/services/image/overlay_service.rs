use super::analysis::config::{clamp_opacity, DEFAULT_OVERLAY_OPACITY};
use super::analysis::core::ImageRegion;
use crate::error::Result;
use crate::pipeline::types::{Condition, SkinAnalysis};
use image::{ImageFormat, Rgb, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::info;

const OUTLINE_ALPHA: f32 = 0.55;
const OUTLINE_WIDTH: u32 = 2;
const ANNOTATED_SUFFIX: &str = "_annotated";

/// Source-over composite of a straight-alpha colour onto `dst`.
pub fn composite_over(dst: &mut Rgba<u8>, src: Rgb<u8>, alpha: f32) {
    let sa = alpha.clamp(0.0, 1.0);
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        *dst = Rgba([0, 0, 0, 0]);
        return;
    }

    let blend = |s: u8, d: u8| -> u8 {
        let c = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };
    *dst = Rgba([
        blend(src[0], dst[0]),
        blend(src[1], dst[1]),
        blend(src[2], dst[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ]);
}

/// Renders condition masks and region outlines onto a transparent layer
pub struct OverlayRenderer {
    opacity: f32,
    outline_width: u32,
    outline_alpha: f32,
    draw_outlines: bool,
}

impl OverlayRenderer {
    pub fn new(opacity: f32) -> Self {
        Self {
            opacity: clamp_opacity(opacity),
            outline_width: OUTLINE_WIDTH,
            outline_alpha: OUTLINE_ALPHA,
            draw_outlines: true,
        }
    }

    pub fn with_outlines(mut self, enabled: bool) -> Self {
        self.draw_outlines = enabled;
        self
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn render(&self, analysis: &SkinAnalysis) -> RgbaImage {
        let (width, height) = analysis.dimensions();
        let mut overlay = RgbaImage::new(width, height);

        for condition in Condition::ALL {
            let mask = analysis.masks.get(condition);
            let color = condition.overlay_color();
            for (x, y, px) in overlay.enumerate_pixels_mut() {
                if mask.get(x, y) {
                    composite_over(px, color, self.opacity);
                }
            }
        }

        if self.draw_outlines {
            for bounds in &analysis.region_bounds {
                self.stroke_rect(&mut overlay, *bounds);
            }
        }
        overlay
    }

    fn stroke_rect(&self, overlay: &mut RgbaImage, rect: ImageRegion) {
        if rect.width == 0 || rect.height == 0 {
            return;
        }
        let line = self.outline_width.min(rect.width).min(rect.height);
        let x_end = rect.x + rect.width;
        let y_end = rect.y + rect.height;
        for y in rect.y..y_end {
            for x in rect.x..x_end {
                let on_edge = x < rect.x + line
                    || x >= x_end - line
                    || y < rect.y + line
                    || y >= y_end - line;
                if on_edge {
                    if let Some(px) = overlay.get_pixel_mut_checked(x, y) {
                        composite_over(px, Rgb([0, 0, 0]), self.outline_alpha);
                    }
                }
            }
        }
    }
}

impl Default for OverlayRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_OVERLAY_OPACITY)
    }
}

/// Source-over of `overlay` onto `base`; both must share dimensions.
pub fn flatten(base: &RgbaImage, overlay: &RgbaImage) -> RgbaImage {
    let mut out = base.clone();
    for (x, y, px) in out.enumerate_pixels_mut() {
        if let Some(src) = overlay.get_pixel_checked(x, y) {
            let alpha = src[3] as f32 / 255.0;
            if alpha > 0.0 {
                composite_over(px, Rgb([src[0], src[1], src[2]]), alpha);
            }
        }
    }
    out
}

/// `face.jpg` becomes `face_annotated.png`.
pub fn annotated_file_name(source_name: &str) -> String {
    let stem = Path::new(source_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "image".to_string());
    format!("{}{}.png", stem, ANNOTATED_SUFFIX)
}

/// Flattened analysed image plus overlay.
pub fn annotate(analysis: &SkinAnalysis, renderer: &OverlayRenderer) -> RgbaImage {
    flatten(&analysis.analyzed_image, &renderer.render(analysis))
}

pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Writes the annotated PNG into `out_dir` and returns its path.
pub fn export_annotated_png(
    analysis: &SkinAnalysis,
    renderer: &OverlayRenderer,
    out_dir: &Path,
) -> Result<PathBuf> {
    std::fs::create_dir_all(out_dir)?;
    let path = out_dir.join(annotated_file_name(&analysis.source_name));
    let bytes = encode_png(&annotate(analysis, renderer))?;
    std::fs::write(&path, bytes)?;
    info!("Wrote annotated image to {}", path.display());
    Ok(path)
}
