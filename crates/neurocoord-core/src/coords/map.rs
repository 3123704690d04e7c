//! Coordinate maps: affine or general functions between coordinate systems.
//!
//! A [`CoordinateMap`] is the tagged variant the rest of the crate works
//! with: affine maps compose into a single matrix, anything touching a
//! general (callable) map composes into a chained general map. An inverse
//! exists for an affine map when its matrix is invertible and for a general
//! map when one was declared at construction.

use std::fmt;
use std::sync::Arc;

use ndarray::Array2;

use crate::coords::affine::AffineTransform;
use crate::coords::system::CoordinateSystem;
use crate::error::{CoordError, Result};

/// Batch point function: `[N, dim(domain)]` in, `[N, dim(codomain)]` out.
///
/// Implementations must honor their declared shapes; the map validates the
/// batch it is handed, not what a closure produces mid-chain.
pub type PointFn = dyn Fn(&Array2<f64>) -> Array2<f64> + Send + Sync;

/// A non-affine coordinate map backed by a point function and an optional
/// declared inverse.
#[derive(Clone)]
pub struct GeneralMap {
    domain: CoordinateSystem,
    codomain: CoordinateSystem,
    forward: Arc<PointFn>,
    inverse: Option<Arc<PointFn>>,
}

impl fmt::Debug for GeneralMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneralMap")
            .field("domain", &self.domain)
            .field("codomain", &self.codomain)
            .field("has_inverse", &self.inverse.is_some())
            .finish()
    }
}

/// A function between two coordinate systems, optionally invertible.
#[derive(Debug, Clone)]
pub enum CoordinateMap {
    /// Matrix-backed map; composition and inversion stay in matrix form.
    Affine(AffineTransform),
    /// Arbitrary point function with an optional declared inverse.
    General(GeneralMap),
}

impl From<AffineTransform> for CoordinateMap {
    fn from(t: AffineTransform) -> Self {
        CoordinateMap::Affine(t)
    }
}

impl CoordinateMap {
    /// Wrap a point function as a general coordinate map with no inverse.
    pub fn general<F>(domain: CoordinateSystem, codomain: CoordinateSystem, forward: F) -> Self
    where
        F: Fn(&Array2<f64>) -> Array2<f64> + Send + Sync + 'static,
    {
        CoordinateMap::General(GeneralMap {
            domain,
            codomain,
            forward: Arc::new(forward),
            inverse: None,
        })
    }

    /// Wrap a point function and its declared inverse.
    ///
    /// Composing `forward` then `inverse` (or vice versa) must be the
    /// identity within numerical tolerance; this is the caller's contract.
    pub fn general_with_inverse<F, G>(
        domain: CoordinateSystem,
        codomain: CoordinateSystem,
        forward: F,
        inverse: G,
    ) -> Self
    where
        F: Fn(&Array2<f64>) -> Array2<f64> + Send + Sync + 'static,
        G: Fn(&Array2<f64>) -> Array2<f64> + Send + Sync + 'static,
    {
        CoordinateMap::General(GeneralMap {
            domain,
            codomain,
            forward: Arc::new(forward),
            inverse: Some(Arc::new(inverse)),
        })
    }

    /// The domain coordinate system.
    pub fn domain(&self) -> &CoordinateSystem {
        match self {
            CoordinateMap::Affine(t) => t.domain(),
            CoordinateMap::General(g) => &g.domain,
        }
    }

    /// The codomain coordinate system.
    pub fn codomain(&self) -> &CoordinateSystem {
        match self {
            CoordinateMap::Affine(t) => t.codomain(),
            CoordinateMap::General(g) => &g.codomain,
        }
    }

    /// The affine transform backing this map, when there is one.
    pub fn as_affine(&self) -> Option<&AffineTransform> {
        match self {
            CoordinateMap::Affine(t) => Some(t),
            CoordinateMap::General(_) => None,
        }
    }

    /// Apply the map to a batch of points of shape `[N, dim(domain)]`.
    pub fn eval(&self, points: &Array2<f64>) -> Result<Array2<f64>> {
        if points.ncols() != self.domain().ndim() {
            return Err(CoordError::shape(
                vec![points.nrows(), self.domain().ndim()],
                vec![points.nrows(), points.ncols()],
            ));
        }
        let out = self.eval_raw(points);
        if out.ncols() != self.codomain().ndim() {
            return Err(CoordError::shape(
                vec![points.nrows(), self.codomain().ndim()],
                vec![out.nrows(), out.ncols()],
            ));
        }
        Ok(out)
    }

    /// Apply the map to a single point.
    pub fn eval_point(&self, point: &[f64]) -> Result<Vec<f64>> {
        let batch = Array2::from_shape_vec((1, point.len()), point.to_vec())
            .map_err(|_| CoordError::shape(vec![1, self.domain().ndim()], vec![point.len()]))?;
        Ok(self.eval(&batch)?.row(0).to_vec())
    }

    pub(crate) fn eval_raw(&self, points: &Array2<f64>) -> Array2<f64> {
        match self {
            CoordinateMap::Affine(t) => t.eval_raw(points),
            CoordinateMap::General(g) => (g.forward)(points),
        }
    }

    /// The inverse map, with domain and codomain swapped.
    ///
    /// Fails with [`CoordError::NotInvertible`] for singular affines and
    /// for general maps constructed without an inverse.
    pub fn inverse(&self) -> Result<CoordinateMap> {
        match self {
            CoordinateMap::Affine(t) => Ok(CoordinateMap::Affine(t.inverse()?)),
            CoordinateMap::General(g) => {
                let inverse = g.inverse.clone().ok_or_else(|| {
                    CoordError::not_invertible("general map has no declared inverse")
                })?;
                Ok(CoordinateMap::General(GeneralMap {
                    domain: g.codomain.clone(),
                    codomain: g.domain.clone(),
                    forward: inverse,
                    inverse: Some(g.forward.clone()),
                }))
            }
        }
    }

    /// An `Arc`'d forward function for use inside chained closures.
    fn forward_fn(&self) -> Arc<PointFn> {
        match self {
            CoordinateMap::Affine(t) => {
                let t = t.clone();
                Arc::new(move |points| t.eval_raw(points))
            }
            CoordinateMap::General(g) => g.forward.clone(),
        }
    }

    /// The inverse as a point function, when one exists.
    fn inverse_fn(&self) -> Option<Arc<PointFn>> {
        match self {
            CoordinateMap::Affine(t) => {
                let inv = t.inverse().ok()?;
                Some(Arc::new(move |points| inv.eval_raw(points)))
            }
            CoordinateMap::General(g) => g.inverse.clone(),
        }
    }

    /// Fix the domain axis at `axis` to `value`, producing a map with one
    /// fewer input axis. Affine maps get matrix surgery; general maps get a
    /// wrapping closure that re-inserts the fixed coordinate.
    pub(crate) fn fix_axis(&self, axis: usize, value: f64) -> CoordinateMap {
        match self {
            CoordinateMap::Affine(t) => CoordinateMap::Affine(t.fix_axis(axis, value)),
            CoordinateMap::General(g) => {
                let forward = g.forward.clone();
                let ndim = g.domain.ndim();
                let widened: Arc<PointFn> = Arc::new(move |points| {
                    let mut full = Array2::<f64>::zeros((points.nrows(), ndim));
                    for (mut full_row, row) in full.outer_iter_mut().zip(points.outer_iter()) {
                        let mut src = 0;
                        for c in 0..ndim {
                            if c == axis {
                                full_row[c] = value;
                            } else {
                                full_row[c] = row[src];
                                src += 1;
                            }
                        }
                    }
                    forward(&full)
                });
                CoordinateMap::General(GeneralMap {
                    domain: g.domain.drop_axis(axis),
                    codomain: g.codomain.clone(),
                    forward: widened,
                    inverse: None,
                })
            }
        }
    }

    /// Compose with a following map: `(self.then(next))(x) = next(self(x))`.
    ///
    /// Two affine maps fold into one affine map. Otherwise the result is a
    /// general map whose inverse exists when both constituents invert.
    /// Fails with [`CoordError::DomainMismatch`] when this codomain's axis
    /// names do not equal `next`'s domain axis names, in order.
    pub fn then(&self, next: &CoordinateMap) -> Result<CoordinateMap> {
        if let (CoordinateMap::Affine(a), CoordinateMap::Affine(b)) = (self, next) {
            return Ok(CoordinateMap::Affine(a.then(b)?));
        }
        if !self.codomain().matches(next.domain()) {
            return Err(CoordError::DomainMismatch {
                codomain: self.codomain().axes().to_vec(),
                domain: next.domain().axes().to_vec(),
            });
        }

        let first = self.forward_fn();
        let second = next.forward_fn();
        let forward: Arc<PointFn> = Arc::new(move |points| second(&first(points)));

        let inverse = match (self.inverse_fn(), next.inverse_fn()) {
            (Some(first_inv), Some(second_inv)) => {
                let composed: Arc<PointFn> =
                    Arc::new(move |points| first_inv(&second_inv(points)));
                Some(composed)
            }
            _ => None,
        };

        Ok(CoordinateMap::General(GeneralMap {
            domain: self.domain().clone(),
            codomain: next.codomain().clone(),
            forward,
            inverse,
        }))
    }
}

/// Compose a sequence of maps, applying the first element first.
///
/// Fails with [`CoordError::EmptyComposition`] on an empty slice and with
/// [`CoordError::DomainMismatch`] when adjacent codomain/domain axis
/// sequences differ.
pub fn compose(maps: &[CoordinateMap]) -> Result<CoordinateMap> {
    let (first, rest) = maps.split_first().ok_or(CoordError::EmptyComposition)?;
    let mut composed = first.clone();
    for next in rest {
        composed = composed.then(next)?;
    }
    Ok(composed)
}
