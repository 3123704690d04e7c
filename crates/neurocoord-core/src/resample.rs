//! Resampling images onto arbitrary target grids.
//!
//! Given a source image, a target coordinate map and a mapping between the
//! two output (world) spaces, `resample` evaluates the composed chain
//!
//! ```text
//! target voxel -> target world -> source world -> source voxel
//! ```
//!
//! at every target grid index and interpolates the source data at the
//! resulting fractional indices.

use std::sync::Arc;

use nalgebra::{DMatrix, DVector};
use ndarray::{Array2, ArrayD, IxDyn};

use crate::coords::affine::AffineTransform;
use crate::coords::map::{CoordinateMap, PointFn};
use crate::coords::system::CoordinateSystem;
use crate::error::{CoordError, Result};
use crate::evaluate::ArrayCoordMap;
use crate::image::Image;
use crate::interpolation::{BSplineInterpolator, Interpolator};

/// How the target's world space maps into the source's world space.
///
/// All forms are normalized once, at the resample entry point, into a
/// [`CoordinateMap`] from the target codomain to the source codomain.
pub enum ResampleMapping {
    /// A ready-made affine; its systems must match the two world spaces.
    Affine(AffineTransform),
    /// A square homogeneous matrix between equal-dimensional world spaces.
    Matrix(DMatrix<f64>),
    /// A linear part and offset vector: `y = A x + b`.
    LinearOffset {
        linear: DMatrix<f64>,
        offset: DVector<f64>,
    },
    /// An arbitrary point function, with no declared inverse.
    General(Arc<PointFn>),
}

impl From<AffineTransform> for ResampleMapping {
    fn from(t: AffineTransform) -> Self {
        Self::Affine(t)
    }
}

impl From<DMatrix<f64>> for ResampleMapping {
    fn from(matrix: DMatrix<f64>) -> Self {
        Self::Matrix(matrix)
    }
}

impl From<(DMatrix<f64>, DVector<f64>)> for ResampleMapping {
    fn from((linear, offset): (DMatrix<f64>, DVector<f64>)) -> Self {
        Self::LinearOffset { linear, offset }
    }
}

impl ResampleMapping {
    /// Wrap a point function as a world-to-world mapping.
    pub fn general<F>(forward: F) -> Self
    where
        F: Fn(&Array2<f64>) -> Array2<f64> + Send + Sync + 'static,
    {
        Self::General(Arc::new(forward))
    }

    /// Normalize into a coordinate map from `domain` (target world) to
    /// `codomain` (source world).
    fn into_coordmap(
        self,
        domain: &CoordinateSystem,
        codomain: &CoordinateSystem,
    ) -> Result<CoordinateMap> {
        match self {
            Self::Affine(t) => {
                if !t.domain().matches(domain) || !t.codomain().matches(codomain) {
                    return Err(CoordError::DomainMismatch {
                        codomain: t.domain().axes().to_vec(),
                        domain: domain.axes().to_vec(),
                    });
                }
                Ok(CoordinateMap::Affine(t))
            }
            Self::Matrix(matrix) => {
                if matrix.nrows() != matrix.ncols() {
                    return Err(CoordError::shape(
                        vec![matrix.nrows(), matrix.nrows()],
                        vec![matrix.nrows(), matrix.ncols()],
                    ));
                }
                let t = AffineTransform::from_params(domain.clone(), codomain.clone(), matrix)?;
                Ok(CoordinateMap::Affine(t))
            }
            Self::LinearOffset { linear, offset } => {
                let (n_out, n_in) = (codomain.ndim(), domain.ndim());
                if linear.nrows() != n_out || linear.ncols() != n_in || offset.len() != n_out {
                    return Err(CoordError::shape(
                        vec![n_out, n_in, n_out],
                        vec![linear.nrows(), linear.ncols(), offset.len()],
                    ));
                }
                let mut matrix = DMatrix::<f64>::zeros(n_out + 1, n_in + 1);
                matrix.view_mut((0, 0), (n_out, n_in)).copy_from(&linear);
                matrix.view_mut((0, n_in), (n_out, 1)).copy_from(&offset);
                matrix[(n_out, n_in)] = 1.0;
                let t = AffineTransform::from_params(domain.clone(), codomain.clone(), matrix)?;
                Ok(CoordinateMap::Affine(t))
            }
            Self::General(forward) => Ok(CoordinateMap::general(
                domain.clone(),
                codomain.clone(),
                move |points| forward(points),
            )),
        }
    }
}

/// Resampling filter: target grid description plus an interpolator.
///
/// The default interpolator is the prefiltered cubic B-spline with fill
/// value 0; swap it with [`Resampler::with_interpolator`].
pub struct Resampler<I: Interpolator = BSplineInterpolator> {
    interpolator: I,
}

impl Resampler<BSplineInterpolator> {
    /// Resampler with the default cubic B-spline interpolator.
    pub fn new() -> Self {
        Self {
            interpolator: BSplineInterpolator::new(),
        }
    }
}

impl Default for Resampler<BSplineInterpolator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Interpolator> Resampler<I> {
    /// Resampler with a caller-chosen interpolator.
    pub fn with_interpolator(interpolator: I) -> Self {
        Self { interpolator }
    }

    /// Resample `source` onto the grid of `target`, using `mapping` to
    /// relate the target world space to the source world space.
    ///
    /// `shape` is the target grid shape; its length must equal the target
    /// map's domain dimensionality. Source and target dimensionality may
    /// differ (e.g. a 3D volume onto a 2D plane) as long as the composed
    /// chain lines up. The returned image carries `target` as its
    /// coordinate map.
    pub fn run(
        &self,
        source: &Image,
        target: &CoordinateMap,
        mapping: impl Into<ResampleMapping>,
        shape: &[usize],
    ) -> Result<Image> {
        if shape.len() != target.domain().ndim() {
            return Err(CoordError::shape(
                vec![target.domain().ndim()],
                vec![shape.len()],
            ));
        }
        let bridge = mapping
            .into()
            .into_coordmap(target.codomain(), source.coordmap().codomain())?;
        let to_source_voxel = source.coordmap().inverse()?;
        let full_map = target.then(&bridge)?.then(&to_source_voxel)?;

        tracing::debug!(
            "resampling {:?} -> {:?} through composed coordinate map",
            source.shape(),
            shape
        );
        let grid = ArrayCoordMap::from_shape(full_map, shape)?;
        let coords = grid.values()?;
        let values = self.interpolator.interpolate(source.data(), &coords)?;

        let data = ArrayD::from_shape_vec(IxDyn(shape), values.to_vec())
            .map_err(|_| CoordError::shape(shape.to_vec(), vec![values.len()]))?;
        Image::new(data, target.clone())
    }
}

/// Resample with the default cubic B-spline interpolator and fill value 0.
pub fn resample(
    source: &Image,
    target: &CoordinateMap,
    mapping: impl Into<ResampleMapping>,
    shape: &[usize],
) -> Result<Image> {
    Resampler::new().run(source, target, mapping, shape)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DVector;
    use ndarray::ArrayD;

    fn plain_image(shape: &[usize]) -> Image {
        let axes = ["i", "j", "k"][..shape.len()].to_vec();
        let world = ["x", "y", "z"][..shape.len()].to_vec();
        let coordmap = AffineTransform::identity(
            CoordinateSystem::voxel(axes).unwrap(),
            CoordinateSystem::world(world).unwrap(),
        )
        .unwrap();
        Image::new(ArrayD::ones(IxDyn(shape)), coordmap).unwrap()
    }

    #[test]
    fn test_shape_rank_checked() {
        let img = plain_image(&[8, 8]);
        let target = img.coordmap().clone();
        let err = resample(&img, &target, DMatrix::<f64>::identity(3, 3), &[8]).unwrap_err();
        assert!(matches!(err, CoordError::Shape { .. }));
    }

    #[test]
    fn test_matrix_mapping_must_be_square() {
        let img = plain_image(&[8, 8]);
        let target = img.coordmap().clone();
        let err =
            resample(&img, &target, DMatrix::<f64>::identity(3, 2), &[8, 8]).unwrap_err();
        assert!(matches!(err, CoordError::Shape { .. }));
    }

    #[test]
    fn test_affine_mapping_axes_validated() {
        let img = plain_image(&[8, 8]);
        let target = img.coordmap().clone();
        let stranger = AffineTransform::identity(
            CoordinateSystem::world(["u", "v"]).unwrap(),
            CoordinateSystem::world(["x", "y"]).unwrap(),
        )
        .unwrap();
        let err = resample(&img, &target, stranger, &[8, 8]).unwrap_err();
        assert!(matches!(err, CoordError::DomainMismatch { .. }));
    }

    #[test]
    fn test_linear_offset_shape_validated() {
        let img = plain_image(&[8, 8]);
        let target = img.coordmap().clone();
        let mapping = (DMatrix::<f64>::identity(2, 2), DVector::from_vec(vec![1.0]));
        let err = resample(&img, &target, mapping, &[8, 8]).unwrap_err();
        assert!(matches!(err, CoordError::Shape { .. }));
    }

    #[test]
    fn test_non_invertible_source_rejected() {
        let data = ArrayD::ones(IxDyn(&[4, 4]));
        let curve = CoordinateMap::general(
            CoordinateSystem::voxel(["i", "j"]).unwrap(),
            CoordinateSystem::world(["x", "y"]).unwrap(),
            |points| points.clone(),
        );
        let img = Image::new(data, curve).unwrap();
        let target = img.coordmap().clone();
        let err = resample(&img, &target, DMatrix::<f64>::identity(3, 3), &[4, 4]).unwrap_err();
        assert!(matches!(err, CoordError::NotInvertible(_)));
    }
}
