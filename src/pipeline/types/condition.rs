use image::Rgb;
use serde::{Deserialize, Serialize};

/// Skin conditions the segmentation engine produces a mask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Pigmentation,
    Erythema,
    Texture,
}

impl Condition {
    /// Rendering order of the overlay; later conditions composite over earlier ones.
    pub const ALL: [Condition; 3] = [
        Condition::Pigmentation,
        Condition::Erythema,
        Condition::Texture,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Condition::Pigmentation => "Hyperpigmentation",
            Condition::Erythema => "Erythema",
            Condition::Texture => "Texture / Scarring",
        }
    }

    pub fn overlay_color(&self) -> Rgb<u8> {
        match self {
            Condition::Pigmentation => Rgb([255, 223, 0]),
            Condition::Erythema => Rgb([255, 140, 0]),
            Condition::Texture => Rgb([30, 144, 255]),
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
