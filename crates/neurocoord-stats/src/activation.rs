//! Locating activation clusters in statistical maps.
//!
//! The tools here work on plain `f64` arrays in voxel space; converting the
//! results to world coordinates goes through [`crate::bounds::coord_transform`]
//! with the image's affine.

use ndarray::{ArrayD, Dimension};
use tracing::debug;

use crate::error::{Result, StatsError};
use crate::traits::{ComponentLabeler, NullThresholdEstimator};

/// Zero out connected components of non-zero voxels smaller than `min_size`.
pub fn threshold_connected_components<L>(
    map: &ArrayD<f64>,
    min_size: usize,
    labeler: &L,
) -> Result<ArrayD<f64>>
where
    L: ComponentLabeler + ?Sized,
{
    let mask = map.mapv(|v| v != 0.0);
    let (labels, count) = labeler.label(&mask);
    if labels.ndim() != map.ndim() {
        return Err(StatsError::RankMismatch {
            expected: map.ndim(),
            actual: labels.ndim(),
        });
    }

    let mut sizes = vec![0usize; count as usize + 1];
    for &label in labels.iter() {
        sizes[label as usize] += 1;
    }
    debug!("{} components, min size {}", count, min_size);

    let mut out = map.clone();
    for (value, &label) in out.iter_mut().zip(labels.iter()) {
        if label != 0 && sizes[label as usize] < min_size {
            *value = 0.0;
        }
    }
    Ok(out)
}

/// Two-sided activation thresholds `(vmin, vmax)` at level `pvalue`.
///
/// Values of `map` inside `mask` feed the estimator twice: once as-is for
/// the upper threshold, once negated for the lower one.
pub fn find_activation<E>(
    map: &ArrayD<f64>,
    mask: &ArrayD<bool>,
    estimator: &E,
    pvalue: f64,
) -> Result<(f64, f64)>
where
    E: NullThresholdEstimator + ?Sized,
{
    let samples = masked_samples(map, mask, pvalue)?;
    let vmax = estimator.threshold(&samples, pvalue)?;
    let negated: Vec<f64> = samples.iter().map(|v| -v).collect();
    let vmin = -estimator.threshold(&negated, pvalue)?;
    Ok((vmin, vmax))
}

/// Upper activation threshold only.
pub fn find_positive_activation<E>(
    map: &ArrayD<f64>,
    mask: &ArrayD<bool>,
    estimator: &E,
    pvalue: f64,
) -> Result<f64>
where
    E: NullThresholdEstimator + ?Sized,
{
    let samples = masked_samples(map, mask, pvalue)?;
    estimator.threshold(&samples, pvalue)
}

fn masked_samples(map: &ArrayD<f64>, mask: &ArrayD<bool>, pvalue: f64) -> Result<Vec<f64>> {
    if !(pvalue > 0.0 && pvalue < 1.0) {
        return Err(StatsError::InvalidPValue(pvalue));
    }
    if map.ndim() != mask.ndim() {
        return Err(StatsError::RankMismatch {
            expected: map.ndim(),
            actual: mask.ndim(),
        });
    }
    let samples: Vec<f64> = map
        .iter()
        .zip(mask.iter())
        .filter_map(|(&v, &m)| m.then_some(v))
        .collect();
    if samples.is_empty() {
        return Err(StatsError::EmptyMask);
    }
    Ok(samples)
}

/// Voxel coordinates of the activation center of `map`.
///
/// Keeps the largest connected component above `threshold` (80th percentile
/// of `|map|` when `None`), sharpens it with a second threshold at the 60th
/// percentile of the component's magnitudes when enough voxels remain, and
/// returns the magnitude-weighted center of mass.
///
/// Fails with [`StatsError::EmptyMask`] when no voxel clears the threshold.
pub fn find_cut_coords<L>(
    map: &ArrayD<f64>,
    threshold: Option<f64>,
    labeler: &L,
) -> Result<Vec<f64>>
where
    L: ComponentLabeler + ?Sized,
{
    // Voxels that survive the second-level sharpening, below which the
    // refinement is considered unreliable and skipped.
    const REFINE_MIN_VOXELS: usize = 50;

    let magnitudes = map.mapv(f64::abs);
    let threshold = match threshold {
        Some(t) => t,
        None => percentile(magnitudes.iter().copied().collect(), 80.0)?,
    };

    let mask = magnitudes.mapv(|v| v >= threshold);
    let cluster = largest_component(&mask, labeler)?;
    debug!("activation threshold {}", threshold);

    let in_cluster: Vec<f64> = magnitudes
        .iter()
        .zip(cluster.iter())
        .filter_map(|(&v, &m)| m.then_some(v))
        .collect();
    let second = percentile(in_cluster, 60.0)?;
    let refined_mask = ndarray::Zip::from(&magnitudes)
        .and(&cluster)
        .map_collect(|&v, &m| m && v > second);
    let refined = if refined_mask.iter().filter(|&&m| m).count() > REFINE_MIN_VOXELS {
        largest_component(&refined_mask, labeler)?
    } else {
        cluster
    };

    let mut weight_sum = 0.0;
    let mut center = vec![0.0; map.ndim()];
    for ((idx, &v), &m) in magnitudes.indexed_iter().zip(refined.iter()) {
        if m {
            weight_sum += v;
            for (c, &i) in center.iter_mut().zip(idx.slice()) {
                *c += v * i as f64;
            }
        }
    }
    // A zero threshold on an all-zero map selects voxels with no mass.
    if weight_sum == 0.0 {
        return Err(StatsError::EmptyMask);
    }
    for c in center.iter_mut() {
        *c /= weight_sum;
    }
    Ok(center)
}

/// The largest connected component of `mask`, as a boolean array.
fn largest_component<L>(mask: &ArrayD<bool>, labeler: &L) -> Result<ArrayD<bool>>
where
    L: ComponentLabeler + ?Sized,
{
    let (labels, count) = labeler.label(mask);
    if count == 0 {
        return Err(StatsError::EmptyMask);
    }
    let mut sizes = vec![0usize; count as usize + 1];
    for &label in labels.iter() {
        sizes[label as usize] += 1;
    }
    let largest = (1..=count).max_by_key(|&l| sizes[l as usize]).unwrap_or(1);
    Ok(labels.mapv(|l| l == largest))
}

/// Score at percentile `q` (0-100) with linear interpolation between ranks.
fn percentile(mut values: Vec<f64>, q: f64) -> Result<f64> {
    if values.is_empty() {
        return Err(StatsError::EmptyMask);
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let rank = q / 100.0 * (values.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = rank - lower as f64;
    Ok(values[lower] + frac * (values[upper] - values[lower]))
}
