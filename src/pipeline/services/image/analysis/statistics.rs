use crate::pipeline::types::{Condition, FaceRegion, MaskSet, RegionStatistic};

/// Coverage of `count` set pixels over `pixels`, rounded, in [0, 100].
pub fn coverage_pct(count: usize, pixels: u64) -> u32 {
    let denominator = pixels.max(1) as f64;
    ((count as f64 * 100.0 / denominator).round() as u32).min(100)
}

/// Per-region pixel counts and mask coverage.
pub fn region_statistics(masks: &MaskSet, regions: &[FaceRegion]) -> Vec<RegionStatistic> {
    let (width, height) = masks.dimensions();
    regions
        .iter()
        .map(|region| {
            let rect = region.to_pixels(width, height);
            let pixels = rect.area();
            let pct = |condition: Condition| coverage_pct(masks.get(condition).count_in(rect), pixels);
            RegionStatistic {
                name: region.name.clone(),
                pixel_count: pixels,
                pigmentation_pct: pct(Condition::Pigmentation),
                erythema_pct: pct(Condition::Erythema),
                texture_pct: pct(Condition::Texture),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::Mask;

    #[test]
    fn coverage_guards_zero_area() {
        assert_eq!(coverage_pct(0, 0), 0);
        assert_eq!(coverage_pct(1, 0), 100);
        assert_eq!(coverage_pct(1, 3), 33);
        assert_eq!(coverage_pct(2, 3), 67);
    }

    #[test]
    fn statistics_count_bits_inside_each_box() {
        let mut masks = MaskSet::empty(100, 100);
        masks.pigmentation = Mask::from_fn(100, 100, |x, _| x < 50);
        masks.texture = Mask::from_fn(100, 100, |_, _| true);
        let regions = vec![
            FaceRegion::new("Left", 0.0, 0.0, 0.5, 1.0),
            FaceRegion::new("Straddle", 0.25, 0.0, 0.5, 0.5),
        ];

        let stats = region_statistics(&masks, &regions);
        assert_eq!(stats[0].pixel_count, 5000);
        assert_eq!(stats[0].pigmentation_pct, 100);
        assert_eq!(stats[0].erythema_pct, 0);
        assert_eq!(stats[0].texture_pct, 100);
        assert_eq!(stats[1].pigmentation_pct, 50);
    }

    #[test]
    fn one_pixel_image_stays_in_bounds() {
        let mut masks = MaskSet::empty(1, 1);
        masks.erythema = Mask::from_fn(1, 1, |_, _| true);
        for stat in region_statistics(&masks, &FaceRegion::default_face_regions()) {
            for pct in [stat.pigmentation_pct, stat.erythema_pct, stat.texture_pct] {
                assert!(pct <= 100);
            }
        }
    }
}
