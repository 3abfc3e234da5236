// THEORY:
// The `FeatureVector` is the numeric summary of one full container image. It is a
// "dumb" data container produced by the stateless `feature_extractor` and copied
// onto the owning `Observation` at creation time; it carries no behavior beyond a
// presentation convenience. Keeping it separate from the extractor mirrors the
// separation between detection logic and the data it emits.

use serde::{Deserialize, Serialize};

/// The numeric summary derived from a single container image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Encoded file size in kilobytes, rounded to 2 decimals.
    pub size_kb: f64,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Arithmetic mean of the red channel across all pixels, rounded (0-255).
    pub mean_r: u8,
    /// Arithmetic mean of the green channel across all pixels, rounded (0-255).
    pub mean_g: u8,
    /// Arithmetic mean of the blue channel across all pixels, rounded (0-255).
    pub mean_b: u8,
    /// Rec. 601 luminance of the rounded mean color, rounded to 2 decimals.
    /// This is the brightness of the mean color, not the mean of per-pixel
    /// brightness values.
    pub luminance: f64,
    /// Spread between the brightest and darkest per-pixel luminance, rounded
    /// to 2 decimals.
    pub contrast: f64,
}

impl FeatureVector {
    /// The mean color as a `#rrggbb` string for presentation layers.
    pub fn mean_color_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.mean_r, self.mean_g, self.mean_b)
    }
}

#[cfg(test)]
mod tests {
    use super::FeatureVector;

    fn vector() -> FeatureVector {
        FeatureVector {
            size_kb: 12.5,
            width: 640,
            height: 480,
            mean_r: 255,
            mean_g: 128,
            mean_b: 0,
            luminance: 151.37,
            contrast: 80.0,
        }
    }

    #[test]
    fn mean_color_hex_is_lowercase_rgb() {
        assert_eq!(vector().mean_color_hex(), "#ff8000");
    }

    #[test]
    fn serializes_round_trip() {
        let vector = vector();
        let json = serde_json::to_string(&vector).unwrap();
        let back: FeatureVector = serde_json::from_str(&json).unwrap();
        assert_eq!(vector, back);
    }
}
