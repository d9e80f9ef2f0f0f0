use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::clusterer::{
    centroid::{compute_centroid, mean_pairwise_distance, medoid_of},
    silhouette::mean_silhouette,
    similarity::{DistanceMatrix, DistanceMetric},
    types::{Cluster, ClusterMetadata, ClusteringMetrics, ClusteringResult, Embedding},
};
use crate::error::{ClusterError, Result, check_finite, check_same_dim};

/// Parameters for neighbour-expansion clustering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DensityOptions {
    /// Smallest accepted cluster (inclusive)
    pub min_cluster_size: usize,
    /// Neighbours (excluding the point itself) needed to expand from a point
    pub min_samples: usize,
    /// Maximum distance for two points to be neighbours (inclusive)
    pub distance_threshold: f64,
    pub metric: DistanceMetric,
    pub compute_silhouette: bool,
}

impl Default for DensityOptions {
    fn default() -> Self {
        Self {
            min_cluster_size: 3,
            min_samples: 2,
            distance_threshold: 0.3,
            metric: DistanceMetric::Cosine,
            compute_silhouette: true,
        }
    }
}

impl DensityOptions {
    pub fn with_min_cluster_size(mut self, size: usize) -> Self {
        self.min_cluster_size = size;
        self
    }

    pub fn with_min_samples(mut self, samples: usize) -> Self {
        self.min_samples = samples;
        self
    }

    pub fn with_distance_threshold(mut self, threshold: f64) -> Self {
        self.distance_threshold = threshold;
        self
    }

    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_silhouette(mut self, enabled: bool) -> Self {
        self.compute_silhouette = enabled;
        self
    }
}

/// Group embeddings by neighbour expansion over a precomputed distance matrix.
///
/// A point with at least `min_samples` neighbours within
/// `distance_threshold` seeds a candidate cluster, which grows breadth-first
/// through unclaimed neighbours; only absorbed points that are themselves
/// dense keep expanding. Candidates smaller than `min_cluster_size` are
/// dropped and their points stay free for later seeds. Whatever is never
/// claimed is an outlier.
///
/// Deterministic: no randomness, fixed iteration order.
pub fn cluster_embeddings(embeddings: &[Embedding], options: &DensityOptions) -> Result<ClusteringResult> {
    if !options.distance_threshold.is_finite() || options.distance_threshold < 0.0 {
        return Err(ClusterError::InvalidArgument(format!(
            "distance threshold must be finite and non-negative, got {}",
            options.distance_threshold
        )));
    }

    let Some(first) = embeddings.first() else {
        return Ok(ClusteringResult::default());
    };
    for (i, e) in embeddings.iter().enumerate() {
        check_same_dim(&first.vector, &e.vector)?;
        check_finite(i, &e.vector)?;
    }

    let n = embeddings.len();
    if n < options.min_cluster_size {
        tracing::debug!(
            points = n,
            min_cluster_size = options.min_cluster_size,
            "too few points to form a cluster"
        );
        return Ok(ClusteringResult {
            clusters: vec![],
            outliers: embeddings.to_vec(),
            metrics: ClusteringMetrics::default(),
        });
    }

    let vectors: Vec<&[f64]> = embeddings.iter().map(|e| e.vector.as_slice()).collect();
    let matrix = DistanceMatrix::compute(&vectors, options.metric)?;
    let neighbors: Vec<Vec<usize>> = (0..n)
        .map(|i| matrix.neighbors(i, options.distance_threshold))
        .collect();

    let groups = expand_clusters(&neighbors, options);

    let mut labels = vec![usize::MAX; n];
    let mut clusters = Vec::with_capacity(groups.len());

    for (id, members) in groups.iter().enumerate() {
        for &m in members {
            labels[m] = id;
        }

        let member_vectors: Vec<&[f64]> = members.iter().map(|&m| vectors[m]).collect();
        let medoid = medoid_of(&matrix, members);

        clusters.push(Cluster {
            id,
            label: format!("cluster-{id}"),
            members: members.iter().map(|&m| embeddings[m].clone()).collect(),
            centroid: compute_centroid(&member_vectors)?,
            metadata: ClusterMetadata {
                size: members.len(),
                medoid_id: embeddings[medoid].id.clone(),
                mean_intra_distance: mean_pairwise_distance(&matrix, members),
            },
        });
    }

    let outliers: Vec<Embedding> = (0..n)
        .filter(|&i| labels[i] == usize::MAX)
        .map(|i| embeddings[i].clone())
        .collect();

    let silhouette = (options.compute_silhouette && !clusters.is_empty()).then(|| {
        let clustered: Vec<usize> = (0..n).filter(|&i| labels[i] != usize::MAX).collect();
        mean_silhouette(&labels, &clustered, |i, j| matrix.get(i, j))
    });

    tracing::debug!(
        clusters = clusters.len(),
        outliers = outliers.len(),
        silhouette = ?silhouette,
        "density clustering finished"
    );

    Ok(ClusteringResult {
        clusters,
        outliers,
        metrics: ClusteringMetrics { silhouette },
    })
}

/// Accepted clusters as sorted member index lists, in acceptance order
fn expand_clusters(neighbors: &[Vec<usize>], options: &DensityOptions) -> Vec<Vec<usize>> {
    let n = neighbors.len();
    let is_core = |i: usize| neighbors[i].len() >= options.min_samples;

    let mut claimed = vec![false; n];
    let mut in_candidate = vec![false; n];
    let mut queue = VecDeque::new();
    let mut accepted = Vec::new();

    for seed in 0..n {
        if claimed[seed] || !is_core(seed) {
            continue;
        }

        let mut members = vec![seed];
        in_candidate[seed] = true;
        queue.push_back(seed);

        while let Some(p) = queue.pop_front() {
            // Border points join but do not expand
            if !is_core(p) {
                continue;
            }
            for &q in &neighbors[p] {
                if !claimed[q] && !in_candidate[q] {
                    in_candidate[q] = true;
                    members.push(q);
                    queue.push_back(q);
                }
            }
        }

        for &m in &members {
            in_candidate[m] = false;
        }

        if members.len() >= options.min_cluster_size {
            members.sort_unstable();
            for &m in &members {
                claimed[m] = true;
            }
            accepted.push(members);
        } else {
            tracing::debug!(seed, size = members.len(), "rejected undersized candidate cluster");
        }
    }

    accepted
}
