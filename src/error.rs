use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClusterError {
    #[error("Dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("Empty input: {0}")]
    EmptyInput(&'static str),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Non-finite value in row {row} at column {col}")]
    NonFinite { row: usize, col: usize },

    #[error("Cell ({x}, {y}) is outside a {width}x{height} grid")]
    IndexOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}

pub type Result<T> = std::result::Result<T, ClusterError>;

/// Fail unless `a` and `b` have the same length.
pub(crate) fn check_same_dim(a: &[f64], b: &[f64]) -> Result<()> {
    if a.len() != b.len() {
        return Err(ClusterError::DimensionMismatch {
            expected: a.len(),
            found: b.len(),
        });
    }
    Ok(())
}

/// Fail on the first NaN or infinite entry of `values`, reported as `row`.
pub(crate) fn check_finite(row: usize, values: &[f64]) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(col) => Err(ClusterError::NonFinite { row, col }),
        None => Ok(()),
    }
}
