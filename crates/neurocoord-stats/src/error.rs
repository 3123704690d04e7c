//! Error types for the activation-statistics layer.

use neurocoord_core::CoordError;
use thiserror::Error;

/// Errors raised by activation-cluster tools.
#[derive(Error, Debug)]
pub enum StatsError {
    /// No voxels survive the mask or threshold.
    #[error("no voxels above threshold")]
    EmptyMask,

    /// Array ranks disagree (map vs mask, labels vs mask).
    #[error("rank mismatch: expected {expected} axes, got {actual}")]
    RankMismatch { expected: usize, actual: usize },

    /// A p-value outside the open interval (0, 1).
    #[error("p-value {0} outside (0, 1)")]
    InvalidPValue(f64),

    /// A coordinate-map error from the core crate.
    #[error(transparent)]
    Coord(#[from] CoordError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StatsError>;
