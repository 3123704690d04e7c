//! Cut an oblique-free axial slice out of a synthetic volume.
//!
//! Builds a 3D volume with a bright cube, defines a z-plane in world
//! coordinates, and resamples the volume onto that plane.

use anyhow::Result;
use nalgebra::{DMatrix, DVector};
use ndarray::{s, ArrayD, IxDyn};
use neurocoord_core::{resample, zslice, AffineTransform, CoordinateSystem, Image};

fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    // A 64^3 volume at 0.5mm isotropic spacing with a bright cube.
    let mut data = ArrayD::ones(IxDyn(&[64, 64, 64]));
    data.slice_mut(s![20..30, 24..40, 28..34]).fill(5.0);

    let coordmap = AffineTransform::from_params(
        CoordinateSystem::voxel(["i", "j", "k"]).unwrap(),
        CoordinateSystem::world(["x", "y", "z"]).unwrap(),
        DMatrix::from_diagonal(&DVector::from_row_slice(&[0.5, 0.5, 0.5, 1.0])),
    )?;
    let volume = Image::new(data, coordmap)?;
    let world = volume.coordmap().codomain().clone();

    // An axial plane at z = 15mm, spanning the volume's x/y extent.
    let plane = zslice(15.0, (0.0, 31.5), (0.0, 31.5), &world, (64, 64))?;
    let slice = resample(
        &volume,
        plane.coordmap(),
        DMatrix::<f64>::identity(4, 4),
        plane.shape(),
    )?;

    let bright = slice.data().iter().filter(|&&v| v > 3.0).count();
    println!(
        "slice {:?} at z = 15mm: {} bright pixels, max {}",
        slice.shape(),
        bright,
        slice.data().iter().cloned().fold(f64::MIN, f64::max)
    );
    Ok(())
}
