//! Error types for coordinate-map operations.
//!
//! Every failure is raised synchronously at the point of violation; no
//! partially constructed map or image is ever reachable afterwards.

use thiserror::Error;

/// Main error type for coordinate systems, maps and resampling.
#[derive(Error, Debug)]
pub enum CoordError {
    /// Array or matrix dimensions do not fit the operation.
    #[error("shape mismatch: expected {expected:?}, got {actual:?}")]
    Shape {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Adjacent maps do not share an axis sequence during composition.
    #[error("domain mismatch: output axes {codomain:?} do not match input axes {domain:?}")]
    DomainMismatch {
        codomain: Vec<String>,
        domain: Vec<String>,
    },

    /// The transform has no inverse.
    #[error("transform is not invertible: {0}")]
    NotInvertible(String),

    /// Image data rank differs from the coordinate-map domain.
    #[error("dimension mismatch: data has {data_ndim} axes, coordinate map domain has {domain_ndim}")]
    DimensionMismatch { data_ndim: usize, domain_ndim: usize },

    /// An axis label occurs more than once in a coordinate system.
    #[error("duplicate axis name {0:?} in coordinate system")]
    DuplicateAxis(String),

    /// The homogeneous matrix does not end in a [0, ..., 0, 1] row.
    #[error("matrix is not homogeneous: last row must be [0, ..., 0, 1]")]
    NonHomogeneous,

    /// The operation is only defined for affine coordinate maps.
    #[error("operation requires an affine coordinate map: {0}")]
    NonAffine(String),

    /// `compose` was called with no maps.
    #[error("cannot compose an empty sequence of coordinate maps")]
    EmptyComposition,
}

/// Result type for coordinate-map operations.
pub type Result<T> = std::result::Result<T, CoordError>;

impl CoordError {
    /// Create a shape-mismatch error.
    pub fn shape(expected: impl Into<Vec<usize>>, actual: impl Into<Vec<usize>>) -> Self {
        Self::Shape {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a not-invertible error.
    pub fn not_invertible(msg: impl Into<String>) -> Self {
        Self::NotInvertible(msg.into())
    }

    /// Create a non-affine error.
    pub fn non_affine(msg: impl Into<String>) -> Self {
        Self::NonAffine(msg.into())
    }
}
