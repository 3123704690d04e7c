//! Cubic B-spline prefiltering.
//!
//! Direct convolution with the cubic B-spline basis smooths the data; to
//! interpolate (reproduce the samples at integer positions) the data must
//! first be transformed into B-spline coefficients. This is the standard
//! separable causal/anticausal recursive filter with mirror boundary
//! conditions, run independently along every axis.

use ndarray::{ArrayD, Axis};

/// The single pole of the cubic B-spline filter: `sqrt(3) - 2`.
pub(crate) const POLE: f64 = -0.267_949_192_431_122_7;

/// Transform `data` into cubic B-spline coefficients.
pub(crate) fn spline_filter(data: &ArrayD<f64>) -> ArrayD<f64> {
    let mut coeffs = data.clone();
    for axis in 0..coeffs.ndim() {
        if coeffs.shape()[axis] < 2 {
            continue;
        }
        for mut lane in coeffs.lanes_mut(Axis(axis)) {
            let mut line = lane.to_vec();
            filter_line(&mut line);
            for (dst, v) in lane.iter_mut().zip(line) {
                *dst = v;
            }
        }
    }
    coeffs
}

/// In-place recursive filter over one line.
fn filter_line(line: &mut [f64]) {
    let z = POLE;
    let n = line.len();
    let gain = (1.0 - z) * (1.0 - 1.0 / z);
    for v in line.iter_mut() {
        *v *= gain;
    }
    line[0] = initial_causal(line, z);
    for k in 1..n {
        line[k] += z * line[k - 1];
    }
    line[n - 1] = initial_anticausal(line, z);
    for k in (0..n - 1).rev() {
        line[k] = z * (line[k + 1] - line[k]);
    }
}

/// Starting value of the causal recursion under mirror boundaries.
fn initial_causal(line: &[f64], z: f64) -> f64 {
    let n = line.len();
    // Beyond this many terms the geometric tail is below f64 resolution.
    let horizon = (f64::EPSILON.ln() / z.abs().ln()).ceil() as usize;
    if horizon < n {
        let mut zn = z;
        let mut sum = line[0];
        for &v in &line[1..horizon] {
            sum += zn * v;
            zn *= z;
        }
        sum
    } else {
        let iz = 1.0 / z;
        let mut zn = z;
        let mut z2n = z.powi(n as i32 - 1);
        let mut sum = line[0] + z2n * line[n - 1];
        z2n *= z2n * iz;
        for &v in &line[1..n - 1] {
            sum += (zn + z2n) * v;
            zn *= z;
            z2n *= iz;
        }
        sum / (1.0 - z.powi(2 * n as i32 - 2))
    }
}

/// Starting value of the anticausal recursion under mirror boundaries.
fn initial_anticausal(line: &[f64], z: f64) -> f64 {
    let n = line.len();
    (z / (z * z - 1.0)) * (z * line[n - 2] + line[n - 1])
}

/// Reflect an index into `[0, len)` with period `2 * (len - 1)` (mirror
/// without edge duplication), matching the filter's boundary model.
pub(crate) fn mirror(index: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let period = 2 * (len as isize - 1);
    let mut m = index % period;
    if m < 0 {
        m += period;
    }
    if m >= len as isize {
        m = period - m;
    }
    m as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolation::bspline::cubic_bspline;
    use ndarray::IxDyn;

    #[test]
    fn test_mirror_reflection() {
        assert_eq!(mirror(0, 5), 0);
        assert_eq!(mirror(4, 5), 4);
        assert_eq!(mirror(5, 5), 3);
        assert_eq!(mirror(-1, 5), 1);
        assert_eq!(mirror(-2, 5), 2);
        assert_eq!(mirror(8, 5), 0);
    }

    #[test]
    fn test_filter_inverts_bspline_convolution() {
        // Convolving the coefficients with the (1/6, 2/3, 1/6) cubic
        // B-spline footprint must reproduce the original samples.
        let samples = [3.0, -1.0, 4.0, 1.0, 5.0, -9.0, 2.0, 6.0];
        let data = ArrayD::from_shape_vec(IxDyn(&[8]), samples.to_vec()).unwrap();
        let coeffs = spline_filter(&data);
        for i in 0..8 {
            let mut acc = 0.0;
            for t in -1..=1 {
                let w = cubic_bspline(t as f64);
                acc += w * coeffs[[mirror(i as isize + t, 8)]];
            }
            assert!(
                (acc - samples[i]).abs() < 1e-9,
                "sample {} not reproduced: {} vs {}",
                i,
                acc,
                samples[i]
            );
        }
    }

    #[test]
    fn test_constant_line_unchanged() {
        let data = ArrayD::from_elem(IxDyn(&[4, 4]), 2.5);
        let coeffs = spline_filter(&data);
        for &v in coeffs.iter() {
            assert!((v - 2.5).abs() < 1e-9);
        }
    }
}
