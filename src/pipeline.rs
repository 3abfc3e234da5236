// THEORY:
// The `pipeline` module is the final, top-level API for the annotation engine.
// It encapsulates the full stack (feature extraction, rule classification,
// spatial clustering, zone-risk aggregation) behind a single interface the
// web and presentation layers call into, without knowing the internal modules.

use crate::core_modules::cluster_engine::{ClusterPoint, cluster_engine};
use crate::core_modules::geodesy::{GeoPoint, GeodesyError};
use crate::core_modules::zone_risk::{self, ZoneSource};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

// Re-export key data structures and call contracts for the public API.
pub use crate::core_modules::classifier::{Label, extract_and_classify};
pub use crate::core_modules::feature_vector::FeatureVector;
pub use crate::core_modules::geodesy::distance;
pub use crate::core_modules::observation::{Observation, ObservationStore, StoreError};
pub use crate::core_modules::zone_risk::{RiskCategory, RiskSummary, RiskThresholds, Zone};

/// Configuration for the annotation pipeline, allowing for tunable policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Linkage radius for spatial clustering, in meters.
    pub cluster_radius_m: f64,
    /// Full-ratio boundaries for the zone risk categories.
    pub risk_thresholds: RiskThresholds,
    /// Window for the recent-activity counter, in days.
    pub recent_window_days: i64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            cluster_radius_m: 100.0,
            risk_thresholds: RiskThresholds::default(),
            recent_window_days: 7,
        }
    }
}

/// The zone listing and per-category zone counts for one dashboard render.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneReport {
    pub zones: Vec<Zone>,
    pub summary: RiskSummary,
}

/// Counts of observations per label value, for both label sources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelStats {
    pub total: usize,
    pub manual_full: usize,
    pub manual_empty: usize,
    pub manual_unlabeled: usize,
    pub auto_full: usize,
    pub auto_empty: usize,
    pub auto_unlabeled: usize,
}

/// The main, top-level struct for the annotation engine.
pub struct AnnotationPipeline {
    store: ObservationStore,
    config: PipelineConfig,
}

impl AnnotationPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            store: ObservationStore::new(),
            config,
        }
    }

    /// Ingests a submitted image: creates the observation and derives its
    /// features and automatic label exactly once. Undecodable input still
    /// produces a record, so the call never fails.
    pub fn ingest(
        &mut self,
        image_bytes: &[u8],
        location: &str,
        coordinates: Option<(f64, f64)>,
    ) -> u64 {
        self.store.create(image_bytes, location, coordinates)
    }

    /// Records a human annotation. Never recomputes derived features.
    pub fn annotate(&mut self, id: u64, label: Label) -> Result<(), StoreError> {
        self.store.set_manual_label(id, label)
    }

    pub fn observation(&self, id: u64) -> Option<&Observation> {
        self.store.get(id)
    }

    pub fn observations(&self) -> &[Observation] {
        self.store.all()
    }

    /// Clusters the stored geotagged observations into risk zones.
    pub fn zones(&self) -> Result<ZoneReport, GeodesyError> {
        compute_zones(self.store.all(), &self.config)
    }

    /// Label counts for the dashboard's summary tiles and charts.
    pub fn stats(&self) -> LabelStats {
        let mut stats = LabelStats {
            total: self.store.len(),
            ..LabelStats::default()
        };
        for observation in self.store.all() {
            match observation.manual_label {
                Label::Full => stats.manual_full += 1,
                Label::Empty => stats.manual_empty += 1,
                Label::Unlabeled => stats.manual_unlabeled += 1,
            }
            match observation.auto_label {
                Label::Full => stats.auto_full += 1,
                Label::Empty => stats.auto_empty += 1,
                Label::Unlabeled => stats.auto_unlabeled += 1,
            }
        }
        stats
    }

    /// Observations captured within the configured recent window.
    pub fn recent_count(&self) -> usize {
        let cutoff = Utc::now() - Duration::days(self.config.recent_window_days);
        self.store
            .all()
            .iter()
            .filter(|o| o.captured_at >= cutoff)
            .count()
    }
}

/// Computes the zone listing for an observation set.
///
/// Pure function of its input: rerunning on an unchanged set yields an
/// identical report. Observations without coordinates are skipped; an
/// out-of-range coordinate is a validation error.
pub fn compute_zones(
    observations: &[Observation],
    config: &PipelineConfig,
) -> Result<ZoneReport, GeodesyError> {
    // Stage 1: Admission. Only observations with both coordinates take part.
    let mut points: Vec<ClusterPoint> = Vec::new();
    let mut sources: Vec<ZoneSource> = Vec::new();
    for observation in observations {
        let (Some(latitude), Some(longitude)) = (observation.latitude, observation.longitude)
        else {
            continue;
        };
        points.push(ClusterPoint {
            id: observation.id,
            position: GeoPoint::new(latitude, longitude)?,
        });
        sources.push(ZoneSource {
            observation_id: observation.id,
            latitude,
            longitude,
            label: observation.manual_label,
            captured_at: observation.captured_at,
        });
    }

    // Stage 2: Spatial Grouping.
    let clusters = cluster_engine::find_clusters(&points, config.cluster_radius_m);

    // Stage 3: Risk Aggregation.
    let (zones, summary) = zone_risk::aggregate_zones(&sources, &clusters, &config.risk_thresholds);

    debug!(
        points = points.len(),
        clusters = clusters.len(),
        "computed zone report"
    );

    Ok(ZoneReport { zones, summary })
}
