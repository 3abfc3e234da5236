// THEORY:
// The `cluster_engine` is the engine of the spatial grouping layer. It partitions
// geotagged observations into connected components under a linkage radius: two
// observations share a cluster exactly when a chain of hops, each within the
// radius, connects them. This is single-linkage clustering: no fixed cluster
// count, no centroids, so two containers 150 m apart still land in the same
// zone when a third one bridges them.
//
// Key architectural principles & algorithm steps:
// 1.  **Seeding**: Walk the input in order; every point not yet swallowed by an
//     earlier cluster seeds a new one. Clusters are therefore discovered in
//     input order, which keeps zone numbering stable for identical inputs.
// 2.  **BFS Expansion**: A queue grows the cluster outward. On each dequeue the
//     *full* point list is rescanned for unvisited points within the radius of
//     the dequeued point; matches are marked visited and enqueued. Membership
//     order is BFS discovery order.
// 3.  **Deliberate O(n^2)**: The rescan revisits every point on every dequeue.
//     At the intended scale (hundreds of containers per district) this is
//     cheaper and simpler than maintaining a spatial index, and it keeps the
//     traversal order exactly reproducible.
// 4.  **Stateless Utility**: `find_clusters` takes a snapshot of points and
//     produces the partition for that snapshot. It has no memory between calls.

use crate::core_modules::geodesy::GeoPoint;
use std::collections::VecDeque;

/// A geotagged observation as the clustering engine sees it: an identity plus
/// validated coordinates. Labels and timestamps stay out of this layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterPoint {
    /// Identifier of the backing observation.
    pub id: u64,
    /// Validated capture coordinates.
    pub position: GeoPoint,
}

/// A maximal set of mutually reachable points under the linkage radius.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    /// Indices into the input slice, in BFS discovery order.
    pub member_indices: Vec<usize>,
}

impl Cluster {
    /// The number of observations in this cluster.
    pub fn len(&self) -> usize {
        self.member_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.member_indices.is_empty()
    }
}

pub mod cluster_engine {
    use super::*;

    /// Partitions `points` into connected components under `radius_m`.
    pub fn find_clusters(points: &[ClusterPoint], radius_m: f64) -> Vec<Cluster> {
        let mut visited = vec![false; points.len()];
        let mut clusters: Vec<Cluster> = Vec::new();

        for seed in 0..points.len() {
            if visited[seed] {
                continue;
            }
            visited[seed] = true;

            let mut member_indices: Vec<usize> = Vec::new();
            let mut queue: VecDeque<usize> = VecDeque::new();
            queue.push_back(seed);

            while let Some(current) = queue.pop_front() {
                member_indices.push(current);

                // Rescan the whole list for unvisited neighbors of the
                // dequeued point.
                for (candidate, point) in points.iter().enumerate() {
                    if !visited[candidate]
                        && points[current].position.distance_to(&point.position) <= radius_m
                    {
                        visited[candidate] = true;
                        queue.push_back(candidate);
                    }
                }
            }

            clusters.push(Cluster { member_indices });
        }

        clusters
    }
}
