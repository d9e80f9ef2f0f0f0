use crate::clusterer::similarity::squared_kernel;
use crate::error::{ClusterError, Result};
use crate::matrix::FeatureMatrix;

/// Mean simplified silhouette over the points in `sample`.
///
/// `labels[i]` is the cluster of point `i`; only points listed in `sample`
/// take part, both as scored points and as comparison targets. A point whose
/// cluster has no other sampled member, or with no other cluster present,
/// scores 0.
pub(crate) fn mean_silhouette<F>(labels: &[usize], sample: &[usize], dist: F) -> f64
where
    F: Fn(usize, usize) -> f64,
{
    if sample.is_empty() {
        return 0.0;
    }

    let n_labels = sample.iter().map(|&i| labels[i] + 1).max().unwrap_or(0);
    let mut sums = vec![0.0; n_labels];
    let mut counts = vec![0usize; n_labels];
    let mut total = 0.0;

    for &i in sample {
        sums.iter_mut().for_each(|s| *s = 0.0);
        counts.iter_mut().for_each(|c| *c = 0);

        for &j in sample {
            if i == j {
                continue;
            }
            sums[labels[j]] += dist(i, j);
            counts[labels[j]] += 1;
        }

        let own = labels[i];
        if counts[own] == 0 {
            continue;
        }
        let a = sums[own] / counts[own] as f64;

        let b = (0..n_labels)
            .filter(|&l| l != own && counts[l] > 0)
            .map(|l| sums[l] / counts[l] as f64)
            .fold(f64::INFINITY, f64::min);
        if !b.is_finite() {
            continue;
        }

        let denom = a.max(b);
        if denom > 0.0 {
            total += (b - a) / denom;
        }
    }

    total / sample.len() as f64
}

/// Mean silhouette of a k-means style labelling with Euclidean distance.
///
/// O(n²). Fails if `assignments` does not have one entry per point.
pub fn silhouette_score(points: &FeatureMatrix, assignments: &[usize]) -> Result<f64> {
    if assignments.len() != points.len() {
        return Err(ClusterError::DimensionMismatch {
            expected: points.len(),
            found: assignments.len(),
        });
    }

    let all: Vec<usize> = (0..points.len()).collect();
    Ok(mean_silhouette(assignments, &all, |i, j| {
        squared_kernel(points.row(i), points.row(j)).sqrt()
    }))
}
