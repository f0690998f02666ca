//! Validation and analysis of ASCII `.pt` point set files.
//!
//! This crate provides tools for:
//! - Validating the fixed four-line `.pt` header and reconciling point counts
//! - Loading suitable files into in-memory point lists
//! - Closest/farthest pairs, bounding cubes, sphere queries and average distances
//! - An interactive console menu over a directory of point files
//!
//! # Example
//!
//! ```no_run
//! use pointset_inspector::{core::loaders::load_point_file, processors::analysis::average_distance};
//!
//! let file = load_point_file("point_sets/cloud.pt").unwrap();
//! let avg = average_distance(&file.points);
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod processors;

pub use config::{CatalogConfig, InspectorConfig, ReportConfig};
pub use crate::core::header::{FileHeader, HeaderError};
pub use crate::core::loaders::{LoaderError, PointFile};
pub use crate::core::point::Point;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
