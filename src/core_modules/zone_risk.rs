// THEORY:
// The `zone_risk` module is the aggregation layer above the cluster engine. It
// turns a raw partition of points into the zone records the outside world acts
// on: every clustered observation gets a zone identifier (shared across its
// cluster, numbered in discovery order) and the cluster's risk category.
//
// Key architectural principles:
// 1.  **Ratio for Groups, Label for Loners**: A cluster of two or more is
//     judged by the share of its members a human marked full. An isolated
//     point has no ratio worth the name, so its own label decides: a lone full
//     container is already a hotspot, a lone unannotated one is worth watching.
// 2.  **Zones, Not Points**: The summary counts distinct zone identifiers per
//     risk category. Ten containers in one critical zone are one critical zone.
// 3.  **Policy as Configuration**: The ratio boundaries are a `RiskThresholds`
//     value with the operational defaults, not literals buried in the logic.

use crate::core_modules::classifier::Label;
use crate::core_modules::cluster_engine::Cluster;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Risk category of a zone, derived from the share of full containers in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskCategory {
    Critical,
    Monitored,
    Safe,
}

/// The full-ratio boundaries separating the risk categories.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    /// Ratios strictly above this are critical.
    pub critical_above: f64,
    /// Ratios strictly above this (and not critical) are monitored.
    pub monitored_above: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            critical_above: 0.6,
            monitored_above: 0.3,
        }
    }
}

impl RiskThresholds {
    /// Categorizes a multi-point cluster by its share of full containers.
    pub fn categorize_ratio(&self, full_ratio: f64) -> RiskCategory {
        if full_ratio > self.critical_above {
            RiskCategory::Critical
        } else if full_ratio > self.monitored_above {
            RiskCategory::Monitored
        } else {
            RiskCategory::Safe
        }
    }

    /// Categorizes an isolated point directly from its own label.
    pub fn categorize_singleton(&self, label: Label) -> RiskCategory {
        match label {
            Label::Full => RiskCategory::Critical,
            Label::Empty => RiskCategory::Safe,
            Label::Unlabeled => RiskCategory::Monitored,
        }
    }
}

/// Everything the aggregator needs to know about one clustered observation.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneSource {
    pub observation_id: u64,
    pub latitude: f64,
    pub longitude: f64,
    pub label: Label,
    pub captured_at: DateTime<Utc>,
}

/// One observation's clustering outcome, shaped for the external map layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub observation_id: u64,
    pub latitude: f64,
    pub longitude: f64,
    /// The human annotation, which is what risk is judged on.
    pub label: Label,
    pub captured_at: DateTime<Utc>,
    /// Identifier shared by every member of the same cluster, assigned
    /// monotonically in cluster-discovery order.
    pub zone_id: usize,
    pub risk: RiskCategory,
}

/// Distinct-zone counts per risk category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskSummary {
    pub critical: usize,
    pub monitored: usize,
    pub safe: usize,
}

impl RiskSummary {
    fn record(&mut self, risk: RiskCategory) {
        match risk {
            RiskCategory::Critical => self.critical += 1,
            RiskCategory::Monitored => self.monitored += 1,
            RiskCategory::Safe => self.safe += 1,
        }
    }
}

/// Annotates every clustered observation with its zone identifier and the
/// cluster's risk category. `clusters` holds indices into `sources`.
pub fn aggregate_zones(
    sources: &[ZoneSource],
    clusters: &[Cluster],
    thresholds: &RiskThresholds,
) -> (Vec<Zone>, RiskSummary) {
    let mut zones = Vec::with_capacity(sources.len());
    let mut summary = RiskSummary::default();

    for (zone_id, cluster) in clusters.iter().enumerate() {
        let risk = match cluster.member_indices.as_slice() {
            [lone] => thresholds.categorize_singleton(sources[*lone].label),
            members => {
                let full = members
                    .iter()
                    .filter(|&&index| sources[index].label == Label::Full)
                    .count();
                thresholds.categorize_ratio(full as f64 / members.len() as f64)
            }
        };
        summary.record(risk);

        for &index in &cluster.member_indices {
            let source = &sources[index];
            zones.push(Zone {
                observation_id: source.observation_id,
                latitude: source.latitude,
                longitude: source.longitude,
                label: source.label,
                captured_at: source.captured_at,
                zone_id,
                risk,
            });
        }
    }

    (zones, summary)
}
