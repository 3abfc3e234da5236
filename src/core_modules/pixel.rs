// THEORY:
// The `Pixel` module is the most fundamental unit of the feature pipeline. It is a
// "dumb" data container for a single RGB pixel plus the one heuristic that can be
// computed from this pixel alone: its Rec. 601 luminance. Anything that needs the
// whole image (channel means, the contrast span) belongs one layer up, in the
// `feature_extractor` module.
//
// Key architectural principles:
// 1.  **Data Container**: A `Pixel` holds raw channel bytes and knows how to
//     summarize itself. It knows nothing about its neighbors or the image it
//     came from.
// 2.  **Single Heuristic**: `luminance()` interprets perceived brightness as a
//     weighted sum of R, G and B. It is the input for both the mean-color
//     brightness and the contrast statistics computed by the extractor.

pub mod pixel {
    pub type Byte = u8;
    pub type Channel = Byte;
    pub type Luminance = f64;

    const CHANNELS: usize = 3;

    /// A "dumb" data container representing a single RGB pixel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Pixel {
        /// The red channel value (0-255).
        pub red: Channel,
        /// The green channel value (0-255).
        pub green: Channel,
        /// The blue channel value (0-255).
        pub blue: Channel,
    }

    impl Pixel {
        pub fn new(red: Channel, green: Channel, blue: Channel) -> Self {
            Pixel { red, green, blue }
        }

        /// Luminance estimate (Rec. 601 luma).
        ///
        /// - Interprets perceived brightness as a weighted sum of RGB.
        /// - Uses 0..255 channels; cast to f64 for stability.
        pub fn luminance(&self) -> Luminance {
            0.299 * self.red as f64 + 0.587 * self.green as f64 + 0.114 * self.blue as f64
        }
    }

    impl From<&[Byte]> for Pixel {
        fn from(bytes: &[Byte]) -> Self {
            if bytes.len() != CHANNELS {
                panic!("Cannot convert {} bytes into pixel.", bytes.len());
            }
            Pixel::new(bytes[0], bytes[1], bytes[2])
        }
    }
}
