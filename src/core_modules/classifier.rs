// THEORY:
// The `classifier` maps a feature vector to a fullness label with an ordered
// decision list, not a scored model. Each rule is a named variant with its own
// guard; evaluation walks the list in declaration order and the first match
// decides. Overlaps are resolved by position in the list, never by comparing
// magnitudes, which keeps every future rule addition auditable and testable in
// isolation.
//
// An observation whose image never decoded has no feature vector at all, and
// stays `Unlabeled` without touching the rules.

use crate::core_modules::feature_extractor;
use crate::core_modules::feature_vector::FeatureVector;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Fullness state of a container, either human-assigned or rule-derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Full,
    Empty,
    #[default]
    Unlabeled,
}

/// One guarded rule of the decision list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// A dark photo with a heavy file: dense, cluttered content.
    DarkAndHeavy,
    /// A bright photo with a light file: uniform, empty content.
    BrightAndLight,
    /// A wide luminance span alone: visible waste against the container walls.
    HighContrast,
}

/// The decision list. Rules fire in this order; the first match wins.
pub const RULE_ORDER: [Rule; 3] = [Rule::DarkAndHeavy, Rule::BrightAndLight, Rule::HighContrast];

impl Rule {
    /// Whether this rule fires for the given features.
    pub fn matches(&self, features: &FeatureVector) -> bool {
        match self {
            Rule::DarkAndHeavy => features.luminance < 100.0 && features.size_kb > 500.0,
            Rule::BrightAndLight => features.luminance > 150.0 && features.size_kb < 300.0,
            Rule::HighContrast => features.contrast > 100.0,
        }
    }

    /// The label this rule assigns when it fires.
    pub fn label(&self) -> Label {
        match self {
            Rule::DarkAndHeavy | Rule::HighContrast => Label::Full,
            Rule::BrightAndLight => Label::Empty,
        }
    }
}

/// Classifies a feature vector by the first matching rule.
///
/// `None` (the image never produced features) and a list with no matching rule
/// both yield `Label::Unlabeled`. Purely deterministic in its inputs.
pub fn classify(features: Option<&FeatureVector>) -> Label {
    let Some(features) = features else {
        return Label::Unlabeled;
    };

    RULE_ORDER
        .iter()
        .find(|rule| rule.matches(features))
        .map(|rule| rule.label())
        .unwrap_or_default()
}

/// Derives features and the automatic label for a submitted image in one step.
///
/// This is the contract the ingestion path and external callers use; the two
/// halves stay independently callable. A decode failure is logged and yields
/// no features and `Label::Unlabeled`; it never propagates.
pub fn extract_and_classify(image_bytes: &[u8]) -> (Option<FeatureVector>, Label) {
    let features = match feature_extractor::extract_features(image_bytes) {
        Ok(features) => Some(features),
        Err(error) => {
            warn!(%error, "feature extraction failed; the record will carry no features");
            None
        }
    };
    let label = classify(features.as_ref());
    (features, label)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(luminance: f64, size_kb: f64, contrast: f64) -> FeatureVector {
        FeatureVector {
            size_kb,
            width: 100,
            height: 100,
            mean_r: 0,
            mean_g: 0,
            mean_b: 0,
            luminance,
            contrast,
        }
    }

    #[test]
    fn dark_heavy_image_is_full() {
        assert_eq!(classify(Some(&features(80.0, 600.0, 10.0))), Label::Full);
    }

    #[test]
    fn bright_light_image_is_empty() {
        assert_eq!(classify(Some(&features(180.0, 200.0, 10.0))), Label::Empty);
    }

    #[test]
    fn high_contrast_alone_is_full() {
        // Neither brightness rule matches; the contrast rule catches it.
        assert_eq!(classify(Some(&features(120.0, 400.0, 150.0))), Label::Full);
    }

    #[test]
    fn unremarkable_image_stays_unlabeled() {
        assert_eq!(classify(Some(&features(120.0, 400.0, 50.0))), Label::Unlabeled);
    }

    #[test]
    fn missing_features_stay_unlabeled() {
        assert_eq!(classify(None), Label::Unlabeled);
    }

    #[test]
    fn rule_order_beats_magnitude() {
        // Both the bright-and-light and high-contrast guards hold; the earlier
        // rule decides, so the result is Empty rather than Full.
        let overlapping = features(180.0, 200.0, 150.0);
        assert!(Rule::BrightAndLight.matches(&overlapping));
        assert!(Rule::HighContrast.matches(&overlapping));
        assert_eq!(classify(Some(&overlapping)), Label::Empty);
    }

    #[test]
    fn extract_and_classify_tolerates_undecodable_bytes() {
        let (features, label) = extract_and_classify(b"not an image");
        assert!(features.is_none());
        assert_eq!(label, Label::Unlabeled);
    }

    #[test]
    fn boundary_values_do_not_fire() {
        // All three guards are strict inequalities.
        assert_eq!(classify(Some(&features(100.0, 501.0, 100.0))), Label::Unlabeled);
        assert_eq!(classify(Some(&features(150.0, 299.0, 100.0))), Label::Unlabeled);
    }
}
