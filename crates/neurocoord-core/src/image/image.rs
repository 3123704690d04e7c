//! Image: an N-dimensional data array paired with a coordinate map.
//!
//! The coordinate map relates array indices (its domain) to physical
//! coordinates (its codomain). The map is fixed at construction; the data
//! may be mutated in place through [`Image::data_mut`].

use ndarray::{ArrayD, Axis, Slice};

use crate::coords::map::CoordinateMap;
use crate::error::{CoordError, Result};
use crate::evaluate::{ArrayCoordMap, IndexRange};

/// An N-dimensional image with a voxel-to-world coordinate map.
#[derive(Debug, Clone)]
pub struct Image {
    data: ArrayD<f64>,
    coordmap: CoordinateMap,
}

impl Image {
    /// Pair a data array with a coordinate map.
    ///
    /// Fails with [`CoordError::DimensionMismatch`] when the array rank
    /// differs from the map's domain dimensionality.
    pub fn new(data: ArrayD<f64>, coordmap: impl Into<CoordinateMap>) -> Result<Self> {
        let coordmap = coordmap.into();
        if data.ndim() != coordmap.domain().ndim() {
            return Err(CoordError::DimensionMismatch {
                data_ndim: data.ndim(),
                domain_ndim: coordmap.domain().ndim(),
            });
        }
        Ok(Self { data, coordmap })
    }

    /// The image data.
    pub fn data(&self) -> &ArrayD<f64> {
        &self.data
    }

    /// Mutable access to the image data. The coordinate map never changes.
    pub fn data_mut(&mut self) -> &mut ArrayD<f64> {
        &mut self.data
    }

    /// The voxel-to-world coordinate map.
    pub fn coordmap(&self) -> &CoordinateMap {
        &self.coordmap
    }

    /// The array shape.
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Number of array axes.
    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    /// The grid of physical coordinates this image is sampled on.
    pub fn grid(&self) -> Result<ArrayCoordMap> {
        ArrayCoordMap::from_shape(self.coordmap.clone(), self.shape())
    }

    /// The image at index `k` along `axis`: the data axis is removed and
    /// the coordinate map loses the matching domain axis, with the fixed
    /// index folded into the affine offset. The codomain keeps its full
    /// dimensionality, so a plane cut from a 3D volume still maps into 3D
    /// world space.
    ///
    /// Only affine coordinate maps support axis removal; general maps fail
    /// with [`CoordError::NonAffine`].
    pub fn index_axis(&self, axis: usize, k: usize) -> Result<Image> {
        self.check_axis(axis, k)?;
        if self.coordmap.as_affine().is_none() {
            return Err(CoordError::non_affine("cannot drop an axis of a general map"));
        }
        Ok(Image {
            data: self.data.index_axis(Axis(axis), k).to_owned(),
            coordmap: self.coordmap.fix_axis(axis, k as f64),
        })
    }

    /// The image restricted to `range` along `axis`, with the coordinate
    /// map's offset and per-axis step rewritten for the new origin and
    /// stride.
    pub fn slice_axis(&self, axis: usize, range: IndexRange) -> Result<Image> {
        if axis >= self.ndim() || range.stop > self.shape()[axis] || range.start > range.stop {
            return Err(CoordError::shape(
                vec![self.ndim(), self.shape().get(axis).copied().unwrap_or(0)],
                vec![axis, range.stop],
            ));
        }
        if range.step == 0 || range.is_empty() {
            return Err(CoordError::shape(vec![range.start + 1], vec![range.stop]));
        }
        let Some(affine) = self.coordmap.as_affine() else {
            return Err(CoordError::non_affine("cannot re-grid a general map"));
        };
        let data = self
            .data
            .slice_axis(
                Axis(axis),
                Slice::new(
                    range.start as isize,
                    Some(range.stop as isize),
                    range.step as isize,
                ),
            )
            .to_owned();
        let coordmap =
            CoordinateMap::Affine(affine.window_axis(axis, range.start as f64, range.step as f64));
        Ok(Image { data, coordmap })
    }

    fn check_axis(&self, axis: usize, k: usize) -> Result<()> {
        if axis >= self.ndim() {
            return Err(CoordError::shape(vec![self.ndim()], vec![axis]));
        }
        if k >= self.shape()[axis] {
            return Err(CoordError::shape(vec![self.shape()[axis]], vec![k]));
        }
        Ok(())
    }
}
