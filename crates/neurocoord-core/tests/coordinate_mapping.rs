use nalgebra::DMatrix;
use ndarray::Array2;
use neurocoord_core::{compose, AffineTransform, CoordinateMap, CoordinateSystem};
use proptest::prelude::*;

/// A 3D affine with a rotation-scale block and translation. The diagonal
/// dominance of the rotation block keeps the matrix well-conditioned, so
/// every generated transform is invertible.
fn make_affine(
    angle: f64,
    scale: [f64; 3],
    offset: [f64; 3],
    domain: &str,
    codomain: &str,
) -> AffineTransform {
    let (c, s) = (angle.cos(), angle.sin());
    let mut matrix = DMatrix::<f64>::identity(4, 4);
    matrix[(0, 0)] = c * scale[0];
    matrix[(0, 1)] = -s * scale[1];
    matrix[(1, 0)] = s * scale[0];
    matrix[(1, 1)] = c * scale[1];
    matrix[(2, 2)] = scale[2];
    for (r, &o) in offset.iter().enumerate() {
        matrix[(r, 3)] = o;
    }
    AffineTransform::from_params(
        CoordinateSystem::new(domain, ["a0", "a1", "a2"].map(|a| format!("{}_{}", domain, a)))
            .unwrap(),
        CoordinateSystem::new(
            codomain,
            ["a0", "a1", "a2"].map(|a| format!("{}_{}", codomain, a)),
        )
        .unwrap(),
        matrix,
    )
    .unwrap()
}

proptest! {
    #[test]
    fn test_inverse_roundtrip(
        angle in -3.14f64..3.14,
        sx in 0.1f64..5.0, sy in 0.1f64..5.0, sz in 0.1f64..5.0,
        ox in -100.0f64..100.0, oy in -100.0f64..100.0, oz in -100.0f64..100.0,
        px in -50.0f64..50.0, py in -50.0f64..50.0, pz in -50.0f64..50.0
    ) {
        let t = make_affine(angle, [sx, sy, sz], [ox, oy, oz], "grid", "world");
        let inv = t.inverse().unwrap();

        let world = t.eval_point(&[px, py, pz]).unwrap();
        let back = inv.eval_point(&world).unwrap();

        prop_assert!((back[0] - px).abs() < 1e-6, "axis 0: {} vs {}", back[0], px);
        prop_assert!((back[1] - py).abs() < 1e-6, "axis 1: {} vs {}", back[1], py);
        prop_assert!((back[2] - pz).abs() < 1e-6, "axis 2: {} vs {}", back[2], pz);
    }

    #[test]
    fn test_compose_matches_sequential_eval(
        a1 in -3.14f64..3.14, a2 in -3.14f64..3.14,
        s1 in 0.1f64..5.0, s2 in 0.1f64..5.0,
        o1 in -20.0f64..20.0, o2 in -20.0f64..20.0,
        px in -50.0f64..50.0, py in -50.0f64..50.0, pz in -50.0f64..50.0
    ) {
        let t1 = CoordinateMap::from(make_affine(a1, [s1, s1, s1], [o1, o1, o1], "grid", "world"));
        let t2 = CoordinateMap::from(make_affine(a2, [s2, s2, s2], [o2, o2, o2], "world", "mni"));

        let chain = compose(&[t1.clone(), t2.clone()]).unwrap();
        prop_assert!(chain.as_affine().is_some());

        let step_by_step = t2.eval_point(&t1.eval_point(&[px, py, pz]).unwrap()).unwrap();
        let folded = chain.eval_point(&[px, py, pz]).unwrap();

        for axis in 0..3 {
            prop_assert!(
                (folded[axis] - step_by_step[axis]).abs() < 1e-8,
                "axis {}: {} vs {}", axis, folded[axis], step_by_step[axis]
            );
        }
    }

    #[test]
    fn test_batch_matches_pointwise(
        angle in -3.14f64..3.14,
        scale in 0.1f64..5.0,
        offset in -20.0f64..20.0,
        points in prop::collection::vec(-50.0f64..50.0, 3 * 8)
    ) {
        let t = make_affine(angle, [scale; 3], [offset; 3], "grid", "world");
        let batch = Array2::from_shape_vec((8, 3), points.clone()).unwrap();
        let out = t.eval(&batch).unwrap();

        for (row, point) in points.chunks(3).enumerate() {
            let single = t.eval_point(point).unwrap();
            for axis in 0..3 {
                prop_assert!((out[[row, axis]] - single[axis]).abs() < 1e-12);
            }
        }
    }
}
