//! Loader for `.pt` point files.
//!
//! A file is accepted only when its header validates and the number of
//! parsed data rows equals the declared `POINTS` count. Anything else is
//! rejected as a whole; files are never truncated or padded.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

use super::header::{self, FileHeader, HeaderError, HEADER_LINES};
use super::point::Point;

/// Keywords whose presence marks a line as header text rather than data.
const HEADER_KEYWORDS: &[&str] = &[
    "VERSION",
    "FIELDS",
    "SIZE",
    "TYPE",
    "COUNT",
    "WIDTH",
    "HEIGHT",
    "VIEWPOINT",
    "POINTS",
    "DATA",
    "FORMAT",
];

/// Errors that can occur while loading a point file.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("error opening file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid header in {}: {source}", path.display())]
    InvalidHeader {
        path: PathBuf,
        #[source]
        source: HeaderError,
    },

    #[error("points count mismatch in {} (expected {expected}, got {actual})", path.display())]
    CountMismatch {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },
}

/// Result type for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;

/// A fully validated point file.
#[derive(Debug, Clone, PartialEq)]
pub struct PointFile {
    pub path: PathBuf,
    pub header: FileHeader,
    /// Points in file order; `points.len() == header.declared_points`.
    pub points: Vec<Point>,
}

impl PointFile {
    /// Returns the number of points in the file.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the file holds no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// File name for display, falling back to the full path.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Returns true if `line` contains any header keyword.
///
/// This is a plain substring test, so it is only meant to catch literal
/// header text. Numeric data lines never contain these words.
pub fn is_header_line(line: &str) -> bool {
    HEADER_KEYWORDS.iter().any(|keyword| line.contains(keyword))
}

/// Returns true if `name` ends in `.<extension>` with at least one character before it.
pub fn has_point_extension(name: &str, extension: &str) -> bool {
    name.len() > extension.len() + 1
        && name
            .strip_suffix(extension)
            .is_some_and(|stem| stem.ends_with('.'))
}

/// Parses one data line.
///
/// The first three tokens must be floats; any further tokens (colors) are
/// ignored. Returns `None` for lines that do not qualify.
pub fn parse_point_line(line: &str) -> Option<Point> {
    let mut tokens = line.split_whitespace();
    let x: f64 = tokens.next()?.parse().ok()?;
    let y: f64 = tokens.next()?.parse().ok()?;
    let z: f64 = tokens.next()?.parse().ok()?;
    Some(Point::new(x, y, z))
}

/// Reads the next raw line into `buf`, without its `\n` or `\r\n` ending.
///
/// Returns `false` at end of input.
fn next_line<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<bool> {
    buf.clear();
    if reader.read_until(b'\n', buf)? == 0 {
        return Ok(false);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    Ok(true)
}

/// Reads a point file from any buffered reader.
///
/// `path` is only used for reporting. The header is taken from the first
/// four non-blank lines.
pub fn read_point_file<R: BufRead>(mut reader: R, path: &Path) -> Result<PointFile> {
    let io_err = |source| LoaderError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut buf = Vec::new();

    // Undecodable bytes become U+FFFD, which fails the check for that line.
    let mut header_lines: Vec<String> = Vec::with_capacity(HEADER_LINES);
    while header_lines.len() < HEADER_LINES {
        if !next_line(&mut reader, &mut buf).map_err(io_err)? {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        if !line.trim().is_empty() {
            header_lines.push(line.into_owned());
        }
    }

    let header = header::validate_header(&header_lines).map_err(|source| {
        LoaderError::InvalidHeader {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let mut points = Vec::with_capacity(header.declared_points);
    let mut idx = 0;
    while next_line(&mut reader, &mut buf).map_err(io_err)? {
        idx += 1;
        let Ok(line) = std::str::from_utf8(&buf) else {
            debug!("{}: skipping non UTF-8 data line {} after header", path.display(), idx);
            continue;
        };
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }
        if is_header_line(trimmed) {
            debug!("{}: skipping header text after header: {}", path.display(), trimmed);
            continue;
        }

        match parse_point_line(trimmed) {
            Some(point) => points.push(point),
            None => debug!(
                "{}: skipping malformed data line {} after header",
                path.display(),
                idx
            ),
        }
    }

    if points.len() != header.declared_points {
        return Err(LoaderError::CountMismatch {
            path: path.to_path_buf(),
            expected: header.declared_points,
            actual: points.len(),
        });
    }

    Ok(PointFile {
        path: path.to_path_buf(),
        header,
        points,
    })
}

/// Opens and loads a point file from disk.
///
/// The handle is released as soon as the file has been consumed.
pub fn load_point_file<P: AsRef<Path>>(path: P) -> Result<PointFile> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoaderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_point_file(BufReader::new(file), path)
}
