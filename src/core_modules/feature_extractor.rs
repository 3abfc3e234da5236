// THEORY:
// The `feature_extractor` is the engine of the image analysis layer. It turns the
// raw bytes of a submitted photo into the `FeatureVector` every downstream
// decision is based on.
//
// Key architectural principles & algorithm steps:
// 1.  **Byte-Level First**: The file size statistic comes from the encoded byte
//     length, before any decoding happens, so a heavily compressed photo and a
//     raw one with identical pixels still measure differently.
// 2.  **Canonical Color Space**: Whatever the source encoding (grayscale, RGBA,
//     palette), pixels are flattened to 3-channel RGB before any statistic is
//     computed, so the channel means always mean the same thing.
// 3.  **Two Brightness Statistics**: `luminance` is the Rec. 601 brightness of
//     the rounded mean color, a single number for "how dark is this photo",
//     while `contrast` is the span between the brightest and darkest individual
//     pixel. The two deliberately aggregate at different levels.
// 4.  **Stateless Utility**: `extract_features` takes bytes and produces a
//     vector for that image alone. It holds no state between calls; the
//     compute-once rule lives at the observation store boundary, not here.
//
// A decode failure is an expected input condition (corrupt uploads happen), not
// a crash: the error is surfaced to the caller, which logs it and stores the
// observation without features.

use crate::core_modules::feature_vector::FeatureVector;
use crate::core_modules::pixel::pixel::Pixel;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while deriving features from an encoded image.
#[derive(Error, Debug)]
pub enum FeatureError {
    #[error("image decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("image contains no pixels")]
    EmptyImage,
}

/// Rounds a value to two decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Derives the full feature vector from raw encoded image bytes.
pub fn extract_features(image_bytes: &[u8]) -> Result<FeatureVector, FeatureError> {
    let size_kb = round2(image_bytes.len() as f64 / 1024.0);

    let decoded = image::load_from_memory(image_bytes)?;

    // Flatten to 3-channel RGB regardless of the source color type.
    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();
    let pixels: Vec<Pixel> = rgb.as_raw().chunks_exact(3).map(Pixel::from).collect();
    if pixels.is_empty() {
        return Err(FeatureError::EmptyImage);
    }

    // --- Channel Means ---
    // Accumulate in u64 so even very large images cannot overflow.
    let mut sum_r = 0u64;
    let mut sum_g = 0u64;
    let mut sum_b = 0u64;
    for pixel in &pixels {
        sum_r += pixel.red as u64;
        sum_g += pixel.green as u64;
        sum_b += pixel.blue as u64;
    }
    let num_pixels = pixels.len() as f64;
    let mean_r = (sum_r as f64 / num_pixels).round() as u8;
    let mean_g = (sum_g as f64 / num_pixels).round() as u8;
    let mean_b = (sum_b as f64 / num_pixels).round() as u8;

    // --- Mean-Color Luminance ---
    // Brightness of the rounded mean color, not the average per-pixel brightness.
    let luminance = round2(Pixel::new(mean_r, mean_g, mean_b).luminance());

    // --- Contrast ---
    // Span between the brightest and darkest individual pixel.
    let mut min_luminance = f64::MAX;
    let mut max_luminance = f64::MIN;
    for pixel in &pixels {
        let value = pixel.luminance();
        min_luminance = min_luminance.min(value);
        max_luminance = max_luminance.max(value);
    }
    let contrast = round2(max_luminance - min_luminance);

    debug!(size_kb, width, height, luminance, contrast, "extracted image features");

    Ok(FeatureVector {
        size_kb,
        width,
        height,
        mean_r,
        mean_g,
        mean_b,
        luminance,
        contrast,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageEncoder;

    /// Encodes an RGB buffer as an in-memory PNG, the shape uploads arrive in.
    fn encode_png(width: u32, height: u32, buffer: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(std::io::Cursor::new(&mut bytes));
        encoder
            .write_image(buffer, width, height, image::ExtendedColorType::Rgb8)
            .expect("Error encoding fixture.");
        bytes
    }

    #[test]
    fn uniform_black_image_has_zero_statistics() {
        let buffer = vec![0u8; (10 * 10 * 3) as usize];
        let png = encode_png(10, 10, &buffer);

        let features = extract_features(&png).expect("Error extracting features.");

        assert_eq!(features.width, 10);
        assert_eq!(features.height, 10);
        assert_eq!((features.mean_r, features.mean_g, features.mean_b), (0, 0, 0));
        assert_eq!(features.luminance, 0.0);
        assert_eq!(features.contrast, 0.0);
        assert!(features.size_kb > 0.0);
    }

    #[test]
    fn half_black_half_white_image_spans_full_contrast() {
        let mut buffer = vec![0u8; (10 * 10 * 3) as usize];
        // Bottom half white.
        for byte in buffer.iter_mut().skip(10 * 5 * 3) {
            *byte = 255;
        }
        let png = encode_png(10, 10, &buffer);

        let features = extract_features(&png).expect("Error extracting features.");

        // Means of 0 and 255 in equal halves round to 128.
        assert_eq!((features.mean_r, features.mean_g, features.mean_b), (128, 128, 128));
        assert!((features.luminance - 128.0).abs() < 1e-9);
        assert!((features.contrast - 255.0).abs() < 1e-9);
    }

    #[test]
    fn size_is_reported_in_kilobytes() {
        let buffer = vec![40u8; (4 * 4 * 3) as usize];
        let png = encode_png(4, 4, &buffer);

        let features = extract_features(&png).expect("Error extracting features.");

        assert!((features.size_kb - round2(png.len() as f64 / 1024.0)).abs() < 1e-9);
    }

    #[test]
    fn grayscale_input_is_flattened_to_rgb() {
        let mut bytes = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(std::io::Cursor::new(&mut bytes));
        encoder
            .write_image(&[200u8; 9], 3, 3, image::ExtendedColorType::L8)
            .expect("Error encoding fixture.");

        let features = extract_features(&bytes).expect("Error extracting features.");

        assert_eq!((features.mean_r, features.mean_g, features.mean_b), (200, 200, 200));
        assert_eq!(features.contrast, 0.0);
    }

    #[test]
    fn garbage_bytes_yield_a_decode_error() {
        let result = extract_features(b"definitely not an image");
        assert!(matches!(result, Err(FeatureError::Decode(_))));
    }
}
