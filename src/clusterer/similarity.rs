use serde::{Deserialize, Serialize};

use crate::error::{Result, check_same_dim};

/// Distance function used to compare two vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// `1 - cosine_similarity`, range [0, 2]
    #[default]
    Cosine,
    /// Straight-line distance
    Euclidean,
}

impl DistanceMetric {
    /// Distance between `a` and `b` under this metric
    pub fn distance(self, a: &[f64], b: &[f64]) -> Result<f64> {
        check_same_dim(a, b)?;
        Ok(self.distance_unchecked(a, b))
    }

    pub(crate) fn distance_unchecked(self, a: &[f64], b: &[f64]) -> f64 {
        match self {
            DistanceMetric::Cosine => 1.0 - cosine_kernel(a, b),
            DistanceMetric::Euclidean => squared_kernel(a, b).sqrt(),
        }
    }
}

/// Cosine similarity. Returns 0 when either vector has zero norm.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> Result<f64> {
    check_same_dim(a, b)?;
    Ok(cosine_kernel(a, b))
}

pub fn cosine_distance(a: &[f64], b: &[f64]) -> Result<f64> {
    Ok(1.0 - cosine_similarity(a, b)?)
}

/// Sum of squared per-dimension differences. Use for ordering comparisons.
pub fn squared_distance(a: &[f64], b: &[f64]) -> Result<f64> {
    check_same_dim(a, b)?;
    Ok(squared_kernel(a, b))
}

pub fn euclidean_distance(a: &[f64], b: &[f64]) -> Result<f64> {
    Ok(squared_distance(a, b)?.sqrt())
}

pub(crate) fn cosine_kernel(a: &[f64], b: &[f64]) -> f64 {
    let mut dot = 0.0;
    let mut na = 0.0;
    let mut nb = 0.0;

    for i in 0..a.len() {
        dot += a[i] * b[i];
        na += a[i] * a[i];
        nb += b[i] * b[i];
    }

    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }

    // Rounding can push identical vectors slightly past 1.0
    (dot / (na.sqrt() * nb.sqrt())).clamp(-1.0, 1.0)
}

pub(crate) fn squared_kernel(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Symmetric pairwise distance matrix with a zero diagonal.
///
/// Stored densely (`n * n`); intended for hundreds of points, not millions.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Compute all pairwise distances between `vectors` under `metric`.
    ///
    /// Fails if the vectors do not all share the first vector's dimension.
    pub fn compute(vectors: &[&[f64]], metric: DistanceMetric) -> Result<Self> {
        let n = vectors.len();
        if let Some(first) = vectors.first() {
            for v in vectors {
                check_same_dim(first, v)?;
            }
        }

        let mut data = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = metric.distance_unchecked(vectors[i], vectors[j]);
                data[i * n + j] = d;
                data[j * n + i] = d;
            }
        }

        Ok(Self { n, data })
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Distance between points `i` and `j`
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    /// Indices `j != i` with `distance(i, j) <= threshold`, ascending
    pub fn neighbors(&self, i: usize, threshold: f64) -> Vec<usize> {
        (0..self.n)
            .filter(|&j| j != i && self.get(i, j) <= threshold)
            .collect()
    }
}

/// Pairwise cosine distances between embedding vectors
pub fn compute_distance_matrix(vectors: &[&[f64]]) -> Result<DistanceMatrix> {
    DistanceMatrix::compute(vectors, DistanceMetric::Cosine)
}
