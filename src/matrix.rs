use crate::error::{ClusterError, Result, check_finite};

/// Row-major set of equal-length feature vectors.
///
/// Dimensions are validated once at construction so downstream code can
/// index rows without re-checking.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    dim: usize,
    data: Vec<f64>,
}

impl FeatureMatrix {
    /// Build from rows. Every row must match the first row's length, rows
    /// must not be empty vectors, and every value must be finite. Zero rows
    /// is allowed.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let Some(first) = rows.first() else {
            return Ok(Self::empty());
        };

        let dim = first.as_ref().len();
        if dim == 0 {
            return Err(ClusterError::EmptyInput("feature vector with zero dimensions"));
        }

        let mut data = Vec::with_capacity(rows.len() * dim);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != dim {
                return Err(ClusterError::DimensionMismatch {
                    expected: dim,
                    found: row.len(),
                });
            }
            check_finite(i, row)?;
            data.extend_from_slice(row);
        }

        Ok(Self { dim, data })
    }

    pub fn empty() -> Self {
        Self {
            dim: 0,
            data: Vec::new(),
        }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        if self.dim == 0 {
            0
        } else {
            self.data.len() / self.dim
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of features per row
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.dim..(i + 1) * self.dim]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        // chunks_exact panics on a zero chunk size
        self.data.chunks_exact(self.dim.max(1))
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.rows().map(<[f64]>::to_vec).collect()
    }

    /// Build from an already validated flat buffer.
    pub(crate) fn from_flat(dim: usize, data: Vec<f64>) -> Self {
        Self { dim, data }
    }
}
