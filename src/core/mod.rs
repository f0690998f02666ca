//! Core data types and I/O operations.

pub mod header;
pub mod loaders;
pub mod point;
pub mod writers;

pub use header::{validate_header, DataEncoding, FileHeader, HeaderError, PointFormat};
pub use loaders::{is_header_line, load_point_file, read_point_file, LoaderError, PointFile};
pub use point::Point;
pub use writers::{write_point_file, WriteError};
