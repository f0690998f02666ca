//! Data processing modules.

pub mod analysis;
pub mod catalog;

// Re-export key types for convenience
pub use analysis::{
    average_distance, closest_and_farthest, points_in_sphere, BoundingCube, PairExtremes,
    PointPair, Sphere,
};
pub use catalog::{list_entries, scan, CatalogError, CatalogScan, Rejection};
