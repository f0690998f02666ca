//! Validation of the fixed four-line `.pt` header.
//!
//! A point file starts with:
//!
//! ```text
//! VERSION <int>
//! FORMAT x y z            (or: FORMAT x y z r g b)
//! POINTS <int>
//! DATA ascii
//! ```
//!
//! The checks here are pure functions over strings, so they can be exercised
//! without touching the filesystem.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Number of lines making up a header.
pub const HEADER_LINES: usize = 4;

const FORMAT_XYZ: &str = "FORMAT x y z";
const FORMAT_XYZRGB: &str = "FORMAT x y z r g b";
const DATA_ASCII: &str = "DATA ascii";

/// Errors produced while validating a header.
///
/// Line numbers are 1-based positions within the header.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    #[error("line {line}: missing header line, expected {expected}")]
    MissingLine { line: usize, expected: &'static str },

    #[error("line 1: invalid version format '{found}', expected 'VERSION <integer>'")]
    InvalidVersion { found: String },

    #[error("line 2: invalid format '{found}', should be 'x y z' or 'x y z r g b'")]
    InvalidFormat { found: String },

    #[error("line 3: invalid points count '{found}', expected 'POINTS <positive integer>'")]
    InvalidPointCount { found: String },

    #[error("line 4: data type must be 'ascii', found '{found}'")]
    InvalidData { found: String },
}

impl HeaderError {
    /// The 1-based header line that failed.
    pub fn line(&self) -> usize {
        match self {
            HeaderError::MissingLine { line, .. } => *line,
            HeaderError::InvalidVersion { .. } => 1,
            HeaderError::InvalidFormat { .. } => 2,
            HeaderError::InvalidPointCount { .. } => 3,
            HeaderError::InvalidData { .. } => 4,
        }
    }
}

/// Result type for header validation.
pub type Result<T> = std::result::Result<T, HeaderError>;

/// Per-point field layout declared by the FORMAT line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointFormat {
    /// `x y z`
    Xyz,
    /// `x y z r g b`; colors are read but discarded.
    XyzRgb,
}

impl fmt::Display for PointFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointFormat::Xyz => f.write_str("x y z"),
            PointFormat::XyzRgb => f.write_str("x y z r g b"),
        }
    }
}

/// Encoding of the data section. Only ASCII exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataEncoding {
    Ascii,
}

/// A validated header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub version: i64,
    pub format: PointFormat,
    /// Always strictly positive.
    pub declared_points: usize,
    pub encoding: DataEncoding,
}

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\s*VERSION\s+([+-]?\d+)\s*$").expect("valid regex"))
}

fn points_pattern() -> &'static Regex {
    // Anything after the integer token is ignored.
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\s*POINTS\s+([+-]?\d+)").expect("valid regex"))
}

/// Parses `VERSION <integer>` with nothing but whitespace after the integer.
pub fn check_version(line: &str) -> Option<i64> {
    version_pattern()
        .captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Matches the FORMAT line exactly, without whitespace tolerance.
pub fn check_format(line: &str) -> Option<PointFormat> {
    match line {
        FORMAT_XYZ => Some(PointFormat::Xyz),
        FORMAT_XYZRGB => Some(PointFormat::XyzRgb),
        _ => None,
    }
}

/// Parses `POINTS <integer>` and returns the count when it is strictly positive.
pub fn check_points_count(line: &str) -> Option<usize> {
    let count: i64 = points_pattern()
        .captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())?;

    if count > 0 {
        usize::try_from(count).ok()
    } else {
        None
    }
}

/// Matches `DATA ascii` exactly.
pub fn check_data(line: &str) -> Option<DataEncoding> {
    (line == DATA_ASCII).then_some(DataEncoding::Ascii)
}

/// Validates header lines positionally, stopping at the first failure.
///
/// `lines` holds the header lines in file order; only the first
/// [`HEADER_LINES`] are examined. A short slice fails at the first missing
/// position.
pub fn validate_header<S: AsRef<str>>(lines: &[S]) -> Result<FileHeader> {
    let line_at = |idx: usize, expected: &'static str| {
        lines
            .get(idx)
            .map(AsRef::<str>::as_ref)
            .ok_or(HeaderError::MissingLine {
                line: idx + 1,
                expected,
            })
    };

    let line = line_at(0, "'VERSION <integer>'")?;
    let version = check_version(line).ok_or_else(|| HeaderError::InvalidVersion {
        found: line.to_string(),
    })?;

    let line = line_at(1, "'FORMAT x y z' or 'FORMAT x y z r g b'")?;
    let format = check_format(line).ok_or_else(|| HeaderError::InvalidFormat {
        found: line.to_string(),
    })?;

    let line = line_at(2, "'POINTS <positive integer>'")?;
    let declared_points =
        check_points_count(line).ok_or_else(|| HeaderError::InvalidPointCount {
            found: line.to_string(),
        })?;

    let line = line_at(3, "'DATA ascii'")?;
    let encoding = check_data(line).ok_or_else(|| HeaderError::InvalidData {
        found: line.to_string(),
    })?;

    Ok(FileHeader {
        version,
        format,
        declared_points,
        encoding,
    })
}
