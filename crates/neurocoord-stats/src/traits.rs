//! Collaborator traits for cluster labeling and null-distribution
//! thresholding.
//!
//! The activation tools in this crate are written against these two seams
//! so that the morphological and statistical machinery stays pluggable:
//! callers bring their own connected-component labeler and their own null
//! model.

use ndarray::ArrayD;

use crate::error::Result;

/// Labels connected components of a boolean mask.
pub trait ComponentLabeler {
    /// Assign a label to every `true` voxel of `mask` and return the label
    /// array together with the number of components found.
    ///
    /// Label 0 is background; components are labeled `1..=count`. The label
    /// array has the shape of `mask`.
    fn label(&self, mask: &ArrayD<bool>) -> (ArrayD<u32>, u32);
}

/// Estimates an upper-tail significance threshold from a null sample.
pub trait NullThresholdEstimator {
    /// The value above which a sample is significant at level `pvalue`,
    /// given `samples` drawn under the null.
    fn threshold(&self, samples: &[f64], pvalue: f64) -> Result<f64>;
}
