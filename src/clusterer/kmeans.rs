use rand::Rng;
use rand::seq::index;
use serde::{Deserialize, Serialize};

use crate::clusterer::{
    silhouette::mean_silhouette,
    similarity::squared_kernel,
    types::{ClusterMetrics, ClusterResult},
};
use crate::error::{ClusterError, Result};
use crate::matrix::FeatureMatrix;

pub const DEFAULT_MAX_ITERATIONS: usize = 50;

/// Silhouette is O(n²); above this many points it is scored on a sample
pub const DEFAULT_SILHOUETTE_SAMPLE: usize = 1000;

/// Smallest `k` that actually partitions anything
pub const DEFAULT_K: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KMeansOptions {
    /// Requested cluster count. Clamped to the number of points.
    pub k: usize,
    pub max_iterations: usize,
    pub use_kmeans_plus_plus: bool,
    pub compute_silhouette: bool,
    /// `None` always scores every point
    pub silhouette_sample_size: Option<usize>,
}

impl Default for KMeansOptions {
    fn default() -> Self {
        Self::new(DEFAULT_K)
    }
}

impl KMeansOptions {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            use_kmeans_plus_plus: true,
            compute_silhouette: true,
            silhouette_sample_size: Some(DEFAULT_SILHOUETTE_SAMPLE),
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_kmeans_plus_plus(mut self, enabled: bool) -> Self {
        self.use_kmeans_plus_plus = enabled;
        self
    }

    pub fn with_silhouette(mut self, enabled: bool) -> Self {
        self.compute_silhouette = enabled;
        self
    }

    pub fn with_silhouette_sample_size(mut self, size: Option<usize>) -> Self {
        self.silhouette_sample_size = size;
        self
    }
}

/// Lloyd's k-means with squared Euclidean distance.
///
/// Centroids are seeded with k-means++ (or uniformly when disabled). A
/// centroid left without points by an update step is moved onto a random
/// input point. Stops when no assignment changes or after
/// `max_iterations`; in the latter case a last assignment step keeps
/// `assignments` consistent with the returned centroids.
pub fn kmeans<R>(points: &FeatureMatrix, options: &KMeansOptions, rng: &mut R) -> Result<ClusterResult>
where
    R: Rng + ?Sized,
{
    if options.k == 0 {
        return Err(ClusterError::InvalidArgument("k must be at least 1".to_string()));
    }
    if points.is_empty() {
        return Err(ClusterError::EmptyInput("cannot cluster zero points"));
    }

    let n = points.len();
    let k = if options.k > n {
        tracing::warn!(requested = options.k, points = n, "k exceeds point count, clamping");
        n
    } else {
        options.k
    };

    // 1. Seed centers
    let mut centroids = if options.use_kmeans_plus_plus {
        kmeans_plus_plus_init(points, k, rng)?
    } else {
        random_init(points, k, rng)?
    };

    let mut assignments = vec![usize::MAX; n];
    let mut inertia_history = Vec::new();
    let mut iterations = 0;
    let mut converged = false;

    for _ in 0..options.max_iterations {
        iterations += 1;

        // 2. Assign each point to its nearest centroid
        let (changed, inertia) = assign_points(points, &centroids, &mut assignments);
        inertia_history.push(inertia);

        if !changed {
            converged = true;
            break;
        }

        // 3. Recompute centroids, reseeding any that lost all their points
        for c in update_centroids(points, &assignments, &mut centroids) {
            let idx = rng.random_range(0..n);
            centroids[c] = points.row(idx).to_vec();
            tracing::debug!(cluster = c, point = idx, "reseeded empty cluster");
        }
    }

    if converged {
        tracing::debug!(iterations, k, "k-means converged");
    } else {
        let (_, inertia) = assign_points(points, &centroids, &mut assignments);
        inertia_history.push(inertia);
        tracing::debug!(iterations, k, "k-means hit iteration limit");
    }

    let inertia = inertia_history.last().copied().unwrap_or(0.0);
    let silhouette = options
        .compute_silhouette
        .then(|| sampled_silhouette(points, &assignments, k, options.silhouette_sample_size, rng));

    Ok(ClusterResult {
        centroids,
        assignments,
        iterations,
        converged,
        metrics: ClusterMetrics {
            inertia,
            silhouette,
        },
        inertia_history,
    })
}

/// k-means++ seeding: the first center is uniform, each next one is drawn
/// with probability proportional to its squared distance from the nearest
/// chosen center.
///
/// With `k >= points.len()` every point is returned once, in input order.
pub fn kmeans_plus_plus_init<R>(points: &FeatureMatrix, k: usize, rng: &mut R) -> Result<Vec<Vec<f64>>>
where
    R: Rng + ?Sized,
{
    check_init_args(points, k)?;

    let n = points.len();
    if k >= n {
        return Ok(points.to_rows());
    }

    let mut chosen = vec![false; n];
    let first = rng.random_range(0..n);
    chosen[first] = true;
    let mut centroids = vec![points.row(first).to_vec()];

    let mut nearest: Vec<f64> = points
        .rows()
        .map(|p| squared_kernel(p, &centroids[0]))
        .collect();

    while centroids.len() < k {
        let total: f64 = nearest.iter().sum();

        let next = if total > 0.0 {
            let target = rng.random::<f64>() * total;
            weighted_pick(&nearest, target)
        } else {
            None
        };

        // Every remaining point sits on a chosen center
        let next = match next {
            Some(i) if !chosen[i] => i,
            _ => {
                let unchosen: Vec<usize> = (0..n).filter(|&i| !chosen[i]).collect();
                unchosen[rng.random_range(0..unchosen.len())]
            }
        };

        chosen[next] = true;
        let center = points.row(next).to_vec();
        for (d, p) in nearest.iter_mut().zip(points.rows()) {
            *d = d.min(squared_kernel(p, &center));
        }
        centroids.push(center);
    }

    Ok(centroids)
}

/// `k` distinct points chosen uniformly, or every point when `k >= points.len()`
pub fn random_init<R>(points: &FeatureMatrix, k: usize, rng: &mut R) -> Result<Vec<Vec<f64>>>
where
    R: Rng + ?Sized,
{
    check_init_args(points, k)?;

    let n = points.len();
    if k >= n {
        return Ok(points.to_rows());
    }

    Ok(index::sample(rng, n, k)
        .into_iter()
        .map(|i| points.row(i).to_vec())
        .collect())
}

fn check_init_args(points: &FeatureMatrix, k: usize) -> Result<()> {
    if k == 0 {
        return Err(ClusterError::InvalidArgument("k must be at least 1".to_string()));
    }
    if points.is_empty() {
        return Err(ClusterError::EmptyInput("cannot seed centroids from zero points"));
    }
    Ok(())
}

/// First index whose running weight exceeds `target`. Zero-weight entries
/// are never picked.
fn weighted_pick(weights: &[f64], target: f64) -> Option<usize> {
    let mut cumulative = 0.0;
    let mut last_positive = None;

    for (i, &w) in weights.iter().enumerate() {
        if w <= 0.0 {
            continue;
        }
        cumulative += w;
        last_positive = Some(i);
        if cumulative > target {
            return Some(i);
        }
    }

    // Rounding left target at or above the final sum
    last_positive
}

/// Returns whether any assignment changed and the resulting inertia.
/// Ties go to the lowest centroid index.
fn assign_points(points: &FeatureMatrix, centroids: &[Vec<f64>], assignments: &mut [usize]) -> (bool, f64) {
    let mut changed = false;
    let mut inertia = 0.0;

    for (i, p) in points.rows().enumerate() {
        let mut best = 0;
        let mut best_dist = f64::INFINITY;

        for (c, center) in centroids.iter().enumerate() {
            let d = squared_kernel(p, center);
            if d < best_dist {
                best_dist = d;
                best = c;
            }
        }

        if assignments[i] != best {
            changed = true;
            assignments[i] = best;
        }
        inertia += best_dist;
    }

    (changed, inertia)
}

/// Move each centroid to the mean of its points. Returns the indices of
/// centroids that had no points and were left untouched.
fn update_centroids(points: &FeatureMatrix, assignments: &[usize], centroids: &mut [Vec<f64>]) -> Vec<usize> {
    let dim = points.dim();
    let mut sums = vec![vec![0.0; dim]; centroids.len()];
    let mut counts = vec![0usize; centroids.len()];

    for (p, &a) in points.rows().zip(assignments) {
        counts[a] += 1;
        for (s, x) in sums[a].iter_mut().zip(p) {
            *s += x;
        }
    }

    let mut empty = Vec::new();
    for (c, (sum, count)) in sums.into_iter().zip(counts).enumerate() {
        if count == 0 {
            empty.push(c);
            continue;
        }
        centroids[c] = sum.into_iter().map(|s| s / count as f64).collect();
    }

    empty
}

fn sampled_silhouette<R>(
    points: &FeatureMatrix,
    assignments: &[usize],
    k: usize,
    sample_size: Option<usize>,
    rng: &mut R,
) -> f64
where
    R: Rng + ?Sized,
{
    if k < 2 {
        return 0.0;
    }

    let n = points.len();
    let sample: Vec<usize> = match sample_size {
        Some(size) if size > 0 && size < n => {
            let mut idx = index::sample(rng, n, size).into_vec();
            idx.sort_unstable();
            idx
        }
        _ => (0..n).collect(),
    };

    mean_silhouette(assignments, &sample, |i, j| {
        squared_kernel(points.row(i), points.row(j)).sqrt()
    })
}
