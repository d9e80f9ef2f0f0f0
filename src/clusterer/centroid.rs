use crate::clusterer::similarity::{DistanceMatrix, DistanceMetric};
use crate::error::{ClusterError, Result, check_same_dim};

/// Per-dimension mean of `vectors`
pub fn compute_centroid(vectors: &[&[f64]]) -> Result<Vec<f64>> {
    let Some(first) = vectors.first() else {
        return Err(ClusterError::EmptyInput("cannot compute centroid of zero vectors"));
    };

    let dim = first.len();
    let mut out = vec![0.0; dim];

    for v in vectors {
        check_same_dim(first, v)?;
        for i in 0..dim {
            out[i] += v[i];
        }
    }

    let n = vectors.len() as f64;
    for x in &mut out {
        *x /= n;
    }

    Ok(out)
}

/// Index of the vector with the smallest summed distance to all others
pub fn compute_medoid(vectors: &[&[f64]], metric: DistanceMetric) -> Result<usize> {
    if vectors.is_empty() {
        return Err(ClusterError::EmptyInput("cannot compute medoid of zero vectors"));
    }

    let matrix = DistanceMatrix::compute(vectors, metric)?;
    let all: Vec<usize> = (0..vectors.len()).collect();
    Ok(medoid_of(&matrix, &all))
}

/// Medoid among `members` (non-empty) using a precomputed matrix. Returns a
/// value from `members`; ties go to the earliest.
pub(crate) fn medoid_of(matrix: &DistanceMatrix, members: &[usize]) -> usize {
    let mut best = members[0];
    let mut best_sum = f64::INFINITY;

    for &m in members {
        let sum: f64 = members.iter().map(|&o| matrix.get(m, o)).sum();
        if sum < best_sum {
            best_sum = sum;
            best = m;
        }
    }

    best
}

/// Mean pairwise distance among `members`, 0 when there is only one
pub(crate) fn mean_pairwise_distance(matrix: &DistanceMatrix, members: &[usize]) -> f64 {
    let mut total = 0.0;
    let mut pairs = 0usize;

    for (a, &i) in members.iter().enumerate() {
        for &j in &members[a + 1..] {
            total += matrix.get(i, j);
            pairs += 1;
        }
    }

    if pairs == 0 {
        0.0
    } else {
        total / pairs as f64
    }
}
