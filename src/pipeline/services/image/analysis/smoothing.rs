use crate::pipeline::types::Mask;

/// Minimum set pixels in the 3x3 neighbourhood (centre included) for the
/// output pixel to be set.
pub const MAJORITY_MIN_SET: u8 = 5;

/// Single-pass 3x3 majority filter. Border pixels, which lack a full
/// neighbourhood, are always cleared.
pub fn majority_filter(mask: &Mask) -> Mask {
    let (width, height) = mask.dimensions();
    let mut out = Mask::new(width, height);
    if width < 3 || height < 3 {
        return out;
    }

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let mut set = 0u8;
            for ny in y - 1..=y + 1 {
                for nx in x - 1..=x + 1 {
                    if mask.get(nx, ny) {
                        set += 1;
                    }
                }
            }
            if set >= MAJORITY_MIN_SET {
                out.set(x, y, true);
            }
        }
    }
    out
}
