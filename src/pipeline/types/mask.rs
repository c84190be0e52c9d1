use super::condition::Condition;
use crate::pipeline::services::image::analysis::core::ImageRegion;

/// Dense boolean grid, row-major, same dimensions as the analysed image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Mask {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![false; width as usize * height as usize],
        }
    }

    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> bool,
    {
        let mut bits = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                bits.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            bits,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.bits[self.index(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, value: bool) {
        if x < self.width && y < self.height {
            let idx = self.index(x, y);
            self.bits[idx] = value;
        }
    }

    pub fn count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.bits.iter().any(|b| *b)
    }

    /// Number of set bits inside `region`, clipped to the mask bounds.
    pub fn count_in(&self, region: ImageRegion) -> usize {
        let x_end = (region.x + region.width).min(self.width);
        let y_end = (region.y + region.height).min(self.height);
        let mut count = 0;
        for y in region.y.min(y_end)..y_end {
            let row = self.index(0, y);
            count += self.bits[row + region.x.min(x_end) as usize..row + x_end as usize]
                .iter()
                .filter(|b| **b)
                .count();
        }
        count
    }
}

/// The three condition masks produced by one segmentation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskSet {
    pub pigmentation: Mask,
    pub erythema: Mask,
    pub texture: Mask,
}

impl MaskSet {
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            pigmentation: Mask::new(width, height),
            erythema: Mask::new(width, height),
            texture: Mask::new(width, height),
        }
    }

    pub fn get(&self, condition: Condition) -> &Mask {
        match condition {
            Condition::Pigmentation => &self.pigmentation,
            Condition::Erythema => &self.erythema,
            Condition::Texture => &self.texture,
        }
    }

    pub fn get_mut(&mut self, condition: Condition) -> &mut Mask {
        match condition {
            Condition::Pigmentation => &mut self.pigmentation,
            Condition::Erythema => &mut self.erythema,
            Condition::Texture => &mut self.texture,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pigmentation.dimensions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_in_clips_to_mask_bounds() {
        let mask = Mask::from_fn(10, 10, |x, _| x < 5);
        assert_eq!(mask.count(), 50);
        assert_eq!(mask.count_in(ImageRegion::new(0, 0, 10, 10)), 50);
        assert_eq!(mask.count_in(ImageRegion::new(3, 8, 20, 20)), 4);
        assert_eq!(mask.count_in(ImageRegion::new(12, 12, 4, 4)), 0);
    }

    #[test]
    fn out_of_bounds_access_is_ignored() {
        let mut mask = Mask::new(2, 2);
        mask.set(5, 5, true);
        assert!(mask.is_empty());
        assert!(!mask.get(5, 5));
    }
}
