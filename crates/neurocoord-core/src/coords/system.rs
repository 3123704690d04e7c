//! Coordinate systems: named, ordered axis sets.
//!
//! A coordinate system defines a vector space by an ordered list of axis
//! labels, e.g. voxel space `["i", "j", "k"]` or world space
//! `["x", "y", "z"]`. Coordinate arithmetic is `f64` throughout.

use serde::{Deserialize, Serialize};

use crate::error::{CoordError, Result};

/// A named, ordered set of axis labels defining a vector space.
///
/// Two coordinate systems are compatible for composition only when their
/// axis names match exactly, in order. The system name itself is a label
/// and never takes part in compatibility checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinateSystem {
    name: String,
    axes: Vec<String>,
}

impl CoordinateSystem {
    /// Create a coordinate system from a name and ordered axis labels.
    ///
    /// Fails with [`CoordError::DuplicateAxis`] when a label repeats.
    pub fn new<S, I, A>(name: S, axes: I) -> Result<Self>
    where
        S: Into<String>,
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        let axes: Vec<String> = axes.into_iter().map(Into::into).collect();
        for (i, axis) in axes.iter().enumerate() {
            if axes[..i].contains(axis) {
                return Err(CoordError::DuplicateAxis(axis.clone()));
            }
        }
        Ok(Self {
            name: name.into(),
            axes,
        })
    }

    /// Voxel-index space with the given axis labels.
    pub fn voxel<I, A>(axes: I) -> Result<Self>
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self::new("voxel", axes)
    }

    /// Physical/world space with the given axis labels.
    pub fn world<I, A>(axes: I) -> Result<Self>
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self::new("world", axes)
    }

    /// The system name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The ordered axis labels.
    pub fn axes(&self) -> &[String] {
        &self.axes
    }

    /// Dimensionality of the space.
    pub fn ndim(&self) -> usize {
        self.axes.len()
    }

    /// Whether another system has the same axis names in the same order.
    pub fn matches(&self, other: &CoordinateSystem) -> bool {
        self.axes == other.axes
    }

    /// A copy with the axis at `index` removed (used by image slicing).
    pub(crate) fn drop_axis(&self, index: usize) -> CoordinateSystem {
        let mut axes = self.axes.clone();
        axes.remove(index);
        CoordinateSystem {
            name: self.name.clone(),
            axes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_creation() {
        let cs = CoordinateSystem::voxel(["i", "j", "k"]).unwrap();
        assert_eq!(cs.ndim(), 3);
        assert_eq!(cs.axes(), ["i", "j", "k"]);
        assert_eq!(cs.name(), "voxel");
    }

    #[test]
    fn test_duplicate_axis_rejected() {
        let err = CoordinateSystem::world(["x", "y", "x"]).unwrap_err();
        assert!(matches!(err, CoordError::DuplicateAxis(axis) if axis == "x"));
    }

    #[test]
    fn test_matches_requires_order() {
        let a = CoordinateSystem::world(["x", "y"]).unwrap();
        let b = CoordinateSystem::new("other", ["x", "y"]).unwrap();
        let c = CoordinateSystem::world(["y", "x"]).unwrap();
        assert!(a.matches(&b));
        assert!(!a.matches(&c));
    }

    #[test]
    fn test_drop_axis() {
        let cs = CoordinateSystem::voxel(["i", "j", "k"]).unwrap();
        let reduced = cs.drop_axis(1);
        assert_eq!(reduced.axes(), ["i", "k"]);
    }
}
