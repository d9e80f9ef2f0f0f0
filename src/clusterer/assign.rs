use serde::{Deserialize, Serialize};

use crate::clusterer::{
    similarity::{DistanceMetric, squared_kernel},
    types::{Cluster, ClusterResult, Embedding},
};
use crate::error::{Result, check_same_dim};

/// Nearest cluster for a new point. `cluster` is `None` when there was
/// nothing to compare against, in which case `distance` is infinite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterMatch {
    pub cluster: Option<usize>,
    pub distance: f64,
}

impl ClusterMatch {
    pub fn novel() -> Self {
        Self {
            cluster: None,
            distance: f64::INFINITY,
        }
    }

    /// True when the input could not be placed in any cluster
    pub fn is_novel(&self) -> bool {
        self.cluster.is_none()
    }
}

/// Closest density cluster to `embedding` by centroid distance.
///
/// Returns the matching cluster's `id`. Use the metric the clusters were
/// built with.
pub fn find_cluster_for_embedding(
    embedding: &Embedding,
    clusters: &[Cluster],
    metric: DistanceMetric,
) -> Result<ClusterMatch> {
    let mut best = ClusterMatch::novel();

    for cluster in clusters {
        let d = metric.distance(&embedding.vector, &cluster.centroid)?;
        if d < best.distance || best.cluster.is_none() {
            best = ClusterMatch {
                cluster: Some(cluster.id),
                distance: d,
            };
        }
    }

    Ok(best)
}

/// Index of the closest centroid by Euclidean distance
pub fn nearest_centroid(point: &[f64], centroids: &[Vec<f64>]) -> Result<ClusterMatch> {
    let mut best: Option<(usize, f64)> = None;

    for (c, center) in centroids.iter().enumerate() {
        check_same_dim(center, point)?;
        let d = squared_kernel(point, center);
        if best.map_or(true, |(_, b)| d < b) {
            best = Some((c, d));
        }
    }

    Ok(match best {
        Some((c, d)) => ClusterMatch {
            cluster: Some(c),
            distance: d.sqrt(),
        },
        None => ClusterMatch::novel(),
    })
}

impl ClusterResult {
    /// Assign a new point to the nearest centroid
    pub fn predict(&self, point: &[f64]) -> Result<ClusterMatch> {
        nearest_centroid(point, &self.centroids)
    }
}
