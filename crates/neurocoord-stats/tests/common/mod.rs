//! Collaborator doubles: a face-connectivity BFS labeler and a percentile
//! null estimator.

use std::collections::VecDeque;

use ndarray::{ArrayD, Dimension};
use neurocoord_stats::error::Result;
use neurocoord_stats::{ComponentLabeler, NullThresholdEstimator, StatsError};

/// Labels components connected through voxel faces (6-connectivity in 3D).
pub struct FaceConnectedLabeler;

impl ComponentLabeler for FaceConnectedLabeler {
    fn label(&self, mask: &ArrayD<bool>) -> (ArrayD<u32>, u32) {
        let shape = mask.shape().to_vec();
        let mut labels = ArrayD::<u32>::zeros(mask.raw_dim());
        let mut count = 0u32;

        let starts: Vec<Vec<usize>> = mask
            .indexed_iter()
            .filter_map(|(idx, &m)| m.then(|| idx.slice().to_vec()))
            .collect();
        for start in starts {
            if labels[start.as_slice()] != 0 {
                continue;
            }
            count += 1;
            let mut queue = VecDeque::from([start]);
            while let Some(voxel) = queue.pop_front() {
                if labels[voxel.as_slice()] != 0 {
                    continue;
                }
                labels[voxel.as_slice()] = count;
                for axis in 0..shape.len() {
                    for step in [-1isize, 1] {
                        let i = voxel[axis] as isize + step;
                        if i < 0 || i as usize >= shape[axis] {
                            continue;
                        }
                        let mut neighbor = voxel.clone();
                        neighbor[axis] = i as usize;
                        if mask[neighbor.as_slice()] && labels[neighbor.as_slice()] == 0 {
                            queue.push_back(neighbor);
                        }
                    }
                }
            }
        }
        (labels, count)
    }
}

/// Thresholds at the `1 - pvalue` empirical quantile of the samples.
pub struct PercentileEstimator;

impl NullThresholdEstimator for PercentileEstimator {
    fn threshold(&self, samples: &[f64], pvalue: f64) -> Result<f64> {
        if samples.is_empty() {
            return Err(StatsError::EmptyMask);
        }
        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let rank = (1.0 - pvalue) * (sorted.len() - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = rank.ceil() as usize;
        let frac = rank - lower as f64;
        Ok(sorted[lower] + frac * (sorted[upper] - sorted[lower]))
    }
}
