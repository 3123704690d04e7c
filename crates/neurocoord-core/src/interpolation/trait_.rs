//! Interpolator trait for sampling values at fractional indices.

use ndarray::{Array1, Array2, ArrayD};

use crate::error::{CoordError, Result};

/// Sample an array at fractional index coordinates.
///
/// Implementations decide the out-of-bounds policy; all shipped
/// interpolators fill with a configurable constant (default 0.0).
pub trait Interpolator {
    /// Interpolate `data` at `coords`, a batch of shape `[N, data.ndim()]`
    /// of fractional indices. Returns one value per row.
    fn interpolate(&self, data: &ArrayD<f64>, coords: &Array2<f64>) -> Result<Array1<f64>>;
}

/// Shared entry check: one coordinate per data axis.
pub(crate) fn check_rank(data: &ArrayD<f64>, coords: &Array2<f64>) -> Result<()> {
    if data.ndim() == 0 || coords.ncols() != data.ndim() {
        return Err(CoordError::shape(
            vec![coords.nrows(), data.ndim()],
            vec![coords.nrows(), coords.ncols()],
        ));
    }
    Ok(())
}
