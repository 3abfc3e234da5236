// THEORY:
// The `observation` module is the record-keeping layer of the engine. An
// `Observation` is the durable trace of one submitted container photo: the
// human annotation, the machine annotation, the derived features and the
// optional capture coordinates. The `ObservationStore` owns the records'
// lifecycle the way a persistence collaborator would, and it is the API
// boundary that enforces the system's one non-negotiable invariant:
//
//     Features and the automatic label are derived exactly once, at creation.
//
// `create` is the only code path that runs extraction and classification, and
// `set_manual_label` is the only mutation offered afterwards, so "never
// recompute" is a structural property of the API, not a flag check scattered
// through call sites. Creation tolerates undecodable uploads: the record is
// still stored, with the numeric fields absent and the machine label left
// unlabeled.

use crate::core_modules::classifier::{self, Label};
use crate::core_modules::feature_vector::FeatureVector;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// One annotated waste-container record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Unique identifier, assigned by the store at creation.
    pub id: u64,
    /// When the photo was submitted.
    pub captured_at: DateTime<Utc>,
    /// Human-assigned fullness state, mutated by annotators after creation.
    pub manual_label: Label,
    /// Rule-derived fullness state, written exactly once at creation.
    pub auto_label: Label,
    /// Derived numeric features; `None` when the image never decoded.
    pub features: Option<FeatureVector>,
    /// Free-text location hint ("12 Riverside Walk").
    pub location: String,
    /// Capture latitude in degrees, when the device provided one.
    pub latitude: Option<f64>,
    /// Capture longitude in degrees, when the device provided one.
    pub longitude: Option<f64>,
}

impl Observation {
    /// Whether this record can take part in spatial clustering.
    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    #[error("no observation with id {0}")]
    UnknownId(u64),
}

/// In-memory persistence collaborator for observations.
///
/// Records are held in insertion order and never deleted; real persistence
/// sits outside the engine and round-trips records through serde.
#[derive(Debug, Default)]
pub struct ObservationStore {
    observations: Vec<Observation>,
    next_id: u64,
}

impl ObservationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an observation from a submitted image, deriving features and
    /// the automatic label synchronously and exactly once.
    ///
    /// A decode failure is logged and leaves the numeric fields absent; the
    /// record is still created and the call still succeeds.
    pub fn create(
        &mut self,
        image_bytes: &[u8],
        location: impl Into<String>,
        coordinates: Option<(f64, f64)>,
    ) -> u64 {
        let (features, auto_label) = classifier::extract_and_classify(image_bytes);

        let id = self.next_id;
        self.next_id += 1;
        debug!(id, ?auto_label, "created observation");

        self.observations.push(Observation {
            id,
            captured_at: Utc::now(),
            manual_label: Label::Unlabeled,
            auto_label,
            features,
            location: location.into(),
            latitude: coordinates.map(|(latitude, _)| latitude),
            longitude: coordinates.map(|(_, longitude)| longitude),
        });

        id
    }

    /// Looks up a record by identifier.
    pub fn get(&self, id: u64) -> Option<&Observation> {
        self.observations.iter().find(|o| o.id == id)
    }

    /// Records the human annotation for an observation.
    ///
    /// Derived features and the automatic label are left untouched; they were
    /// written once at creation and stay that way.
    pub fn set_manual_label(&mut self, id: u64, label: Label) -> Result<(), StoreError> {
        let observation = self
            .observations
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(StoreError::UnknownId(id))?;
        observation.manual_label = label;
        Ok(())
    }

    /// All records in insertion order.
    pub fn all(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageEncoder;

    fn white_png() -> Vec<u8> {
        let mut bytes = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(std::io::Cursor::new(&mut bytes));
        encoder
            .write_image(&[255u8; 10 * 10 * 3], 10, 10, image::ExtendedColorType::Rgb8)
            .expect("Error encoding fixture.");
        bytes
    }

    #[test]
    fn create_derives_features_and_auto_label() {
        let mut store = ObservationStore::new();
        let id = store.create(&white_png(), "depot east", Some((48.8566, 2.3522)));

        let observation = store.get(id).unwrap();
        // A tiny all-white photo is bright and light on disk: empty.
        assert_eq!(observation.auto_label, Label::Empty);
        assert_eq!(observation.manual_label, Label::Unlabeled);
        assert!(observation.features.is_some());
        assert!(observation.has_coordinates());
    }

    #[test]
    fn undecodable_upload_still_creates_a_record() {
        let mut store = ObservationStore::new();
        let id = store.create(b"corrupt bytes", "depot east", None);

        let observation = store.get(id).unwrap();
        assert_eq!(observation.auto_label, Label::Unlabeled);
        assert!(observation.features.is_none());
        assert!(!observation.has_coordinates());
    }

    #[test]
    fn annotating_never_touches_derived_fields() {
        let mut store = ObservationStore::new();
        let id = store.create(&white_png(), "depot east", None);

        let before = store.get(id).unwrap().clone();
        store.set_manual_label(id, Label::Full).unwrap();
        let after = store.get(id).unwrap();

        assert_eq!(after.manual_label, Label::Full);
        assert_eq!(after.features, before.features);
        assert_eq!(after.auto_label, before.auto_label);
    }

    #[test]
    fn annotating_a_missing_id_fails() {
        let mut store = ObservationStore::new();
        assert_eq!(
            store.set_manual_label(7, Label::Full),
            Err(StoreError::UnknownId(7))
        );
    }

    #[test]
    fn ids_are_assigned_in_insertion_order() {
        let mut store = ObservationStore::new();
        let first = store.create(b"junk", "a", None);
        let second = store.create(b"junk", "b", None);

        assert!(first < second);
        assert_eq!(store.len(), 2);
        assert_eq!(store.all()[0].id, first);
    }
}
