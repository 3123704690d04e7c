pub mod activation;
pub mod bounds;
pub mod error;
pub mod traits;

pub use activation::{
    find_activation, find_cut_coords, find_positive_activation, threshold_connected_components,
};
pub use bounds::{coord_transform, get_bounds, get_mask_bounds};
pub use error::{Result, StatsError};
pub use traits::{ComponentLabeler, NullThresholdEstimator};
