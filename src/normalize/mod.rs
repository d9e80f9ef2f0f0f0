//! Z-score feature normalization and its inverse.

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

use crate::error::{ClusterError, Result};
use crate::matrix::FeatureMatrix;

/// Standard deviations below this are treated as zero variance
pub const STD_EPSILON: f64 = 1e-10;

/// Per-dimension mean and population standard deviation of a reference set.
///
/// `std` never contains zero: near-constant dimensions are stored as 1 so
/// they pass through normalization shifted but unscaled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationStats {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

/// Normalized features together with the stats that produced them
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub features: FeatureMatrix,
    pub stats: NormalizationStats,
}

impl NormalizationStats {
    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    /// `(x - mean) / std` for a single vector
    pub fn normalize(&self, vector: &[f64]) -> Result<Vec<f64>> {
        self.check_dim(vector.len())?;
        Ok(vector
            .iter()
            .zip(self.mean.iter().zip(&self.std))
            .map(|(x, (m, s))| (x - m) / s)
            .collect())
    }

    /// `x * std + mean` for a single vector
    pub fn denormalize(&self, vector: &[f64]) -> Result<Vec<f64>> {
        self.check_dim(vector.len())?;
        Ok(vector
            .iter()
            .zip(self.mean.iter().zip(&self.std))
            .map(|(x, (m, s))| x * s + m)
            .collect())
    }

    fn check_dim(&self, found: usize) -> Result<()> {
        if found != self.dim() {
            return Err(ClusterError::DimensionMismatch {
                expected: self.dim(),
                found,
            });
        }
        Ok(())
    }
}

/// Compute per-dimension mean and population std over `vectors`.
///
/// Fails on an empty matrix.
pub fn compute_normalization_stats(vectors: &FeatureMatrix) -> Result<NormalizationStats> {
    if vectors.is_empty() {
        return Err(ClusterError::EmptyInput(
            "cannot compute normalization stats of zero vectors",
        ));
    }

    let dim = vectors.dim();
    let n = vectors.len() as f64;

    let mut mean = vec![0.0; dim];
    for row in vectors.rows() {
        for (m, x) in mean.iter_mut().zip(row) {
            *m += x;
        }
    }
    for m in &mut mean {
        *m /= n;
    }

    let mut variance = vec![0.0; dim];
    for row in vectors.rows() {
        for d in 0..dim {
            let diff = row[d] - mean[d];
            variance[d] += diff * diff;
        }
    }

    let std = variance
        .into_iter()
        .map(|v| {
            let s = (v / n).sqrt();
            if s < STD_EPSILON {
                1.0
            } else {
                s
            }
        })
        .collect();

    Ok(NormalizationStats { mean, std })
}

/// Z-score `vectors`. When `stats` is `None` they are computed in-sample.
pub fn normalize_features(
    vectors: &FeatureMatrix,
    stats: Option<&NormalizationStats>,
) -> Result<Normalized> {
    let stats = match stats {
        Some(s) => s.clone(),
        None => compute_normalization_stats(vectors)?,
    };

    let features = map_rows(vectors, &stats, NormalizationStats::normalize)?;
    Ok(Normalized { features, stats })
}

/// Exact inverse of [`normalize_features`]
pub fn denormalize_features(
    vectors: &FeatureMatrix,
    stats: &NormalizationStats,
) -> Result<FeatureMatrix> {
    map_rows(vectors, stats, NormalizationStats::denormalize)
}

fn map_rows(
    vectors: &FeatureMatrix,
    stats: &NormalizationStats,
    f: fn(&NormalizationStats, &[f64]) -> Result<Vec<f64>>,
) -> Result<FeatureMatrix> {
    if vectors.is_empty() {
        return Ok(FeatureMatrix::empty());
    }

    let mut data = Vec::with_capacity(vectors.len() * vectors.dim());
    for row in vectors.rows() {
        data.extend(f(stats, row)?);
    }
    Ok(FeatureMatrix::from_flat(vectors.dim(), data))
}
