//! Affine coordinate transforms in homogeneous form.
//!
//! An affine transform maps a domain coordinate system into a codomain
//! coordinate system through a matrix of shape
//! `(dim(codomain) + 1, dim(domain) + 1)` whose last row is `[0, ..., 0, 1]`.
//! Points travel through the homogeneous convention: append 1, multiply,
//! drop the last row.

use nalgebra::DMatrix;
use ndarray::Array2;

use crate::coords::system::CoordinateSystem;
use crate::error::{CoordError, Result};

/// An affine map between two coordinate systems.
///
/// Non-square matrices are allowed (e.g. a 2D slice plane embedded in 3D
/// world space); only square transforms with a non-singular linear block
/// are invertible.
#[derive(Debug, Clone, PartialEq)]
pub struct AffineTransform {
    domain: CoordinateSystem,
    codomain: CoordinateSystem,
    matrix: DMatrix<f64>,
}

impl AffineTransform {
    /// Build an affine transform from a homogeneous matrix.
    ///
    /// Fails with [`CoordError::Shape`] when the matrix shape is not
    /// `(dim(codomain) + 1, dim(domain) + 1)` and with
    /// [`CoordError::NonHomogeneous`] when the last row is not
    /// `[0, ..., 0, 1]`.
    pub fn from_params(
        domain: CoordinateSystem,
        codomain: CoordinateSystem,
        matrix: DMatrix<f64>,
    ) -> Result<Self> {
        let expected = [codomain.ndim() + 1, domain.ndim() + 1];
        if matrix.nrows() != expected[0] || matrix.ncols() != expected[1] {
            return Err(CoordError::shape(
                expected.to_vec(),
                vec![matrix.nrows(), matrix.ncols()],
            ));
        }
        let last = matrix.nrows() - 1;
        for c in 0..matrix.ncols() - 1 {
            if matrix[(last, c)] != 0.0 {
                return Err(CoordError::NonHomogeneous);
            }
        }
        if matrix[(last, matrix.ncols() - 1)] != 1.0 {
            return Err(CoordError::NonHomogeneous);
        }
        Ok(Self {
            domain,
            codomain,
            matrix,
        })
    }

    /// Diagonal affine mapping grid index `i` to `start[i] + step[i] * i`.
    ///
    /// Used to define uniformly sampled target grids, e.g. a 1D curve
    /// parametrization. Fails with [`CoordError::Shape`] when `start` or
    /// `step` length differs from the (equal) dimensionality of the two
    /// systems.
    pub fn from_start_step(
        domain: CoordinateSystem,
        codomain: CoordinateSystem,
        start: &[f64],
        step: &[f64],
    ) -> Result<Self> {
        let n = domain.ndim();
        if codomain.ndim() != n {
            return Err(CoordError::shape(vec![n], vec![codomain.ndim()]));
        }
        if start.len() != n || step.len() != n {
            return Err(CoordError::shape(vec![n, n], vec![start.len(), step.len()]));
        }
        let mut matrix = DMatrix::<f64>::identity(n + 1, n + 1);
        for i in 0..n {
            matrix[(i, i)] = step[i];
            matrix[(i, n)] = start[i];
        }
        Ok(Self {
            domain,
            codomain,
            matrix,
        })
    }

    /// The identity transform between two systems of equal dimensionality.
    pub fn identity(domain: CoordinateSystem, codomain: CoordinateSystem) -> Result<Self> {
        let n = domain.ndim();
        if codomain.ndim() != n {
            return Err(CoordError::shape(vec![n], vec![codomain.ndim()]));
        }
        Ok(Self::from_matrix_unchecked(
            domain,
            codomain,
            DMatrix::identity(n + 1, n + 1),
        ))
    }

    /// Internal constructor for matrices that are homogeneous by
    /// construction (composition, inversion, axis dropping).
    pub(crate) fn from_matrix_unchecked(
        domain: CoordinateSystem,
        codomain: CoordinateSystem,
        matrix: DMatrix<f64>,
    ) -> Self {
        Self {
            domain,
            codomain,
            matrix,
        }
    }

    /// The domain coordinate system.
    pub fn domain(&self) -> &CoordinateSystem {
        &self.domain
    }

    /// The codomain coordinate system.
    pub fn codomain(&self) -> &CoordinateSystem {
        &self.codomain
    }

    /// The homogeneous matrix.
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Compose with a following transform: `(self.then(next))(x) = next(self(x))`.
    ///
    /// Fails with [`CoordError::DomainMismatch`] when this codomain's axis
    /// names do not equal `next`'s domain axis names, in order.
    pub fn then(&self, next: &AffineTransform) -> Result<AffineTransform> {
        if !self.codomain.matches(next.domain()) {
            return Err(CoordError::DomainMismatch {
                codomain: self.codomain.axes().to_vec(),
                domain: next.domain().axes().to_vec(),
            });
        }
        Ok(AffineTransform::from_matrix_unchecked(
            self.domain.clone(),
            next.codomain.clone(),
            next.matrix() * &self.matrix,
        ))
    }

    /// The inverse transform, with domain and codomain swapped.
    ///
    /// Fails with [`CoordError::NotInvertible`] for non-square transforms
    /// or a singular linear block. The linear block is inverted directly so
    /// the homogeneous row of the result stays exact.
    pub fn inverse(&self) -> Result<AffineTransform> {
        let n_out = self.codomain.ndim();
        let n_in = self.domain.ndim();
        if n_out != n_in {
            return Err(CoordError::not_invertible(format!(
                "transform maps {} axes to {} axes",
                n_in, n_out
            )));
        }
        let linear = self.matrix.view((0, 0), (n_out, n_in)).into_owned();
        let inv_linear = linear
            .try_inverse()
            .ok_or_else(|| CoordError::not_invertible("singular linear block"))?;
        let offset = self.matrix.view((0, n_in), (n_out, 1)).into_owned();
        let inv_offset = -(&inv_linear * offset);

        let mut matrix = DMatrix::<f64>::zeros(n_in + 1, n_out + 1);
        matrix.view_mut((0, 0), (n_in, n_out)).copy_from(&inv_linear);
        matrix.view_mut((0, n_out), (n_in, 1)).copy_from(&inv_offset);
        matrix[(n_in, n_out)] = 1.0;

        Ok(AffineTransform::from_matrix_unchecked(
            self.codomain.clone(),
            self.domain.clone(),
            matrix,
        ))
    }

    /// Fix the domain axis at `axis` to `value`, producing a transform with
    /// one fewer input axis. The dropped column is folded into the offset
    /// column; the codomain is untouched, so a fixed 3D grid axis still
    /// yields points in 3D world space.
    pub(crate) fn fix_axis(&self, axis: usize, value: f64) -> AffineTransform {
        let n_in = self.domain.ndim();
        let n_out = self.codomain.ndim();
        let mut matrix = DMatrix::<f64>::zeros(n_out + 1, n_in);
        for r in 0..n_out {
            let mut dst = 0;
            for c in 0..n_in {
                if c != axis {
                    matrix[(r, dst)] = self.matrix[(r, c)];
                    dst += 1;
                }
            }
            matrix[(r, n_in - 1)] = self.matrix[(r, n_in)] + self.matrix[(r, axis)] * value;
        }
        matrix[(n_out, n_in - 1)] = 1.0;
        AffineTransform::from_matrix_unchecked(
            self.domain.drop_axis(axis),
            self.codomain.clone(),
            matrix,
        )
    }

    /// Restrict the domain axis at `axis` to `start + step * i`, rewriting
    /// the offset and per-axis step (range slicing of an image grid).
    pub(crate) fn window_axis(&self, axis: usize, start: f64, step: f64) -> AffineTransform {
        let mut matrix = self.matrix.clone();
        let n_in = self.domain.ndim();
        for r in 0..self.codomain.ndim() {
            matrix[(r, n_in)] += matrix[(r, axis)] * start;
            matrix[(r, axis)] *= step;
        }
        AffineTransform::from_matrix_unchecked(self.domain.clone(), self.codomain.clone(), matrix)
    }

    /// Apply the transform to a batch of points of shape `[N, dim(domain)]`.
    pub fn eval(&self, points: &Array2<f64>) -> Result<Array2<f64>> {
        if points.ncols() != self.domain.ndim() {
            return Err(CoordError::shape(
                vec![points.nrows(), self.domain.ndim()],
                vec![points.nrows(), points.ncols()],
            ));
        }
        Ok(self.eval_raw(points))
    }

    /// Apply the transform to a single point.
    pub fn eval_point(&self, point: &[f64]) -> Result<Vec<f64>> {
        let batch = Array2::from_shape_vec((1, point.len()), point.to_vec())
            .map_err(|_| CoordError::shape(vec![1, self.domain.ndim()], vec![point.len()]))?;
        Ok(self.eval(&batch)?.row(0).to_vec())
    }

    /// Batch evaluation without the entry shape check; callers have already
    /// validated `points.ncols() == dim(domain)`.
    pub(crate) fn eval_raw(&self, points: &Array2<f64>) -> Array2<f64> {
        let n_in = self.domain.ndim();
        let n_out = self.codomain.ndim();
        let mut out = Array2::<f64>::zeros((points.nrows(), n_out));
        for (mut out_row, point) in out.outer_iter_mut().zip(points.outer_iter()) {
            for r in 0..n_out {
                let mut acc = self.matrix[(r, n_in)];
                for c in 0..n_in {
                    acc += self.matrix[(r, c)] * point[c];
                }
                out_row[r] = acc;
            }
        }
        out
    }
}
