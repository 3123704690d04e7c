//! Grid enumeration: explicit coordinates for every index of a shaped grid.
//!
//! [`ArrayCoordMap`] pairs a coordinate map with a grid shape and produces,
//! on demand, the physical coordinate of every grid point. Sub-indexing
//! along the leading axis fixes that coordinate in the map itself instead of
//! re-enumerating the full grid.

use ndarray::Array2;

use crate::coords::map::CoordinateMap;
use crate::error::{CoordError, Result};

/// A half-open, strided index range along one grid axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRange {
    pub start: usize,
    pub stop: usize,
    pub step: usize,
}

impl IndexRange {
    /// Unit-stride range `start..stop`.
    pub fn new(start: usize, stop: usize) -> Self {
        Self {
            start,
            stop,
            step: 1,
        }
    }

    /// Strided range `start..stop` taking every `step`-th index.
    pub fn with_step(start: usize, stop: usize, step: usize) -> Self {
        Self { start, stop, step }
    }

    /// Full range over an axis of length `len`.
    pub fn full(len: usize) -> Self {
        Self::new(0, len)
    }

    /// Number of indices in the range. A zero step yields no valid
    /// enumeration, so the range counts as empty.
    pub fn len(&self) -> usize {
        if self.step == 0 || self.stop <= self.start {
            0
        } else {
            (self.stop - self.start).div_ceil(self.step)
        }
    }

    /// Whether the range is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Enumerate the cartesian product of per-axis ranges in row-major order,
/// as an `[N, ndim]` array of grid indices.
pub(crate) fn enumerate_indices(ranges: &[IndexRange]) -> Array2<f64> {
    let ndim = ranges.len();
    let lens: Vec<usize> = ranges.iter().map(IndexRange::len).collect();
    let total: usize = lens.iter().product();

    let mut out = Array2::<f64>::zeros((total, ndim));
    let mut counter = vec![0usize; ndim];
    for mut row in out.outer_iter_mut() {
        for (c, &i) in counter.iter().enumerate() {
            row[c] = (ranges[c].start + i * ranges[c].step) as f64;
        }
        for axis in (0..ndim).rev() {
            counter[axis] += 1;
            if counter[axis] < lens[axis] {
                break;
            }
            counter[axis] = 0;
        }
    }
    out
}

/// A coordinate map paired with the shape of the discrete grid it is
/// sampled on.
#[derive(Debug, Clone)]
pub struct ArrayCoordMap {
    coordmap: CoordinateMap,
    shape: Vec<usize>,
}

impl ArrayCoordMap {
    /// Pair a coordinate map with a grid shape.
    ///
    /// Fails with [`CoordError::Shape`] when `shape` length differs from
    /// the map's domain dimensionality.
    pub fn from_shape(coordmap: CoordinateMap, shape: &[usize]) -> Result<Self> {
        if shape.len() != coordmap.domain().ndim() {
            return Err(CoordError::shape(
                vec![coordmap.domain().ndim()],
                vec![shape.len()],
            ));
        }
        Ok(Self {
            coordmap,
            shape: shape.to_vec(),
        })
    }

    /// The underlying coordinate map.
    pub fn coordmap(&self) -> &CoordinateMap {
        &self.coordmap
    }

    /// The grid shape.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Physical coordinates of every grid point, one row per point in
    /// row-major grid order: shape `[prod(shape), dim(codomain)]`.
    pub fn values(&self) -> Result<Array2<f64>> {
        let ranges: Vec<IndexRange> = self.shape.iter().map(|&n| IndexRange::full(n)).collect();
        self.coordmap.eval(&enumerate_indices(&ranges))
    }

    /// The sub-grid at index `k` along the leading axis.
    ///
    /// Equivalent to enumerating the full grid and keeping slice `k`, but
    /// computed by fixing the leading coordinate in the map itself.
    pub fn index(&self, k: usize) -> Result<ArrayCoordMap> {
        let Some((&first, rest)) = self.shape.split_first() else {
            return Err(CoordError::shape(vec![1], vec![0]));
        };
        if k >= first {
            return Err(CoordError::shape(vec![first], vec![k]));
        }
        Ok(ArrayCoordMap {
            coordmap: self.coordmap.fix_axis(0, k as f64),
            shape: rest.to_vec(),
        })
    }
}
