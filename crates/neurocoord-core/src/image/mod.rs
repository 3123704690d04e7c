//! Image types: array data paired with a coordinate map.

pub mod image;

pub use image::Image;
