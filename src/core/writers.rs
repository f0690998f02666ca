//! Writers for analysis reports, plus a `.pt` export helper.
//!
//! Report functions render to any [`Write`] sink so the console layer can be
//! tested against an in-memory buffer. Coordinates and distances use fixed
//! decimal formatting with a caller-supplied precision.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use super::header::{DataEncoding, FileHeader, PointFormat};
use super::point::Point;
use crate::processors::analysis::{BoundingCube, PairExtremes};

/// Errors that can occur while writing a point file.
#[derive(Error, Debug)]
pub enum WriteError {
    /// Failed to create parent directories.
    #[error("failed to create parent directories for '{path}': {source}")]
    CreateDirectory {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Failed to create or open file for writing.
    #[error("failed to create file '{path}': {source}")]
    CreateFile {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Failed to write data to file.
    #[error("failed to write to file '{path}': {source}")]
    WriteFile {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("a point file needs at least one point")]
    NoPoints,
}

/// Result type for write operations.
pub type Result<T> = std::result::Result<T, WriteError>;

fn ensure_parent_dirs(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| WriteError::CreateDirectory {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
    }
    Ok(())
}

/// Writes the four header lines for `header`.
pub fn write_header<W: Write>(out: &mut W, header: &FileHeader) -> io::Result<()> {
    writeln!(out, "VERSION {}", header.version)?;
    writeln!(out, "FORMAT {}", header.format)?;
    writeln!(out, "POINTS {}", header.declared_points)?;
    writeln!(out, "DATA ascii")
}

/// Write points to a `.pt` file with an `x y z` layout.
///
/// Export helper; the menu never writes files.
///
/// Parent directories are created as needed. An empty point list is refused
/// because the header requires a positive count.
pub fn write_point_file(path: &Path, version: i64, points: &[Point]) -> Result<()> {
    if points.is_empty() {
        return Err(WriteError::NoPoints);
    }

    ensure_parent_dirs(path)?;
    let file = File::create(path).map_err(|e| WriteError::CreateFile {
        path: path.display().to_string(),
        source: e,
    })?;
    let mut writer = BufWriter::new(file);

    let header = FileHeader {
        version,
        format: PointFormat::Xyz,
        declared_points: points.len(),
        encoding: DataEncoding::Ascii,
    };

    let write_all = |writer: &mut BufWriter<File>| -> io::Result<()> {
        write_header(writer, &header)?;
        for p in points {
            writeln!(writer, "{} {} {}", p.x, p.y, p.z)?;
        }
        writer.flush()
    };

    write_all(&mut writer).map_err(|e| WriteError::WriteFile {
        path: path.display().to_string(),
        source: e,
    })
}

/// Report the closest and farthest pairs.
pub fn write_pair_extremes<W: Write>(
    out: &mut W,
    extremes: Option<&PairExtremes>,
    precision: usize,
) -> io::Result<()> {
    let Some(found) = extremes else {
        return writeln!(out, "Not enough points to form a pair.");
    };

    for (label, pair) in [("Closest", &found.closest), ("Farthest", &found.farthest)] {
        writeln!(
            out,
            "{} points: {:.p$} and {:.p$}, distance {:.p$}",
            label,
            pair.first,
            pair.second,
            pair.distance,
            p = precision
        )?;
    }
    Ok(())
}

/// Report the eight corners of a file's bounding cube.
pub fn write_cube_corners<W: Write>(
    out: &mut W,
    name: &str,
    cube: Option<&BoundingCube>,
    precision: usize,
) -> io::Result<()> {
    let Some(cube) = cube else {
        return writeln!(out, "{}: no points, cube corners undefined.", name);
    };

    writeln!(out, "Corner points of the smallest cube for {}:", name)?;
    for corner in cube.corners() {
        writeln!(out, "  {:.p$}", corner, p = precision)?;
    }
    Ok(())
}

/// Report the points of a file found inside the query sphere.
pub fn write_sphere_hits<W: Write>(
    out: &mut W,
    name: &str,
    hits: &[Point],
    precision: usize,
) -> io::Result<()> {
    writeln!(out, "Points within sphere in {} ({} found):", name, hits.len())?;
    for point in hits {
        writeln!(out, "  {:.p$}", point, p = precision)?;
    }
    Ok(())
}

/// Report a file's average pairwise distance.
pub fn write_average_distance<W: Write>(
    out: &mut W,
    name: &str,
    average: f64,
    precision: usize,
) -> io::Result<()> {
    writeln!(
        out,
        "Average distance between points in {}: {:.p$}",
        name,
        average,
        p = precision
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::loaders::load_point_file;
    use crate::processors::analysis::{closest_and_farthest, PointPair};
    use tempfile::TempDir;

    fn render<F: FnOnce(&mut Vec<u8>) -> io::Result<()>>(f: F) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_write_point_file_loads_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("cloud.pt");
        let points = vec![Point::new(0.5, -1.0, 2.0), Point::new(3.0, 4.0, 5.25)];

        write_point_file(&path, 1, &points).unwrap();

        let loaded = load_point_file(&path).unwrap();
        assert_eq!(loaded.points, points);
        assert_eq!(loaded.header.format, PointFormat::Xyz);
    }

    #[test]
    fn test_write_point_file_refuses_empty() {
        let temp_dir = TempDir::new().unwrap();
        let err = write_point_file(&temp_dir.path().join("empty.pt"), 1, &[]).unwrap_err();
        assert!(matches!(err, WriteError::NoPoints));
    }

    #[test]
    fn test_pair_report() {
        let points = vec![Point::new(0.0, 0.0, 0.0), Point::new(1.0, 1.0, 1.0)];
        let extremes = closest_and_farthest([points.as_slice()]);
        let text = render(|out| write_pair_extremes(out, extremes.as_ref(), 3));

        assert_eq!(
            text,
            "Closest points: (0.000, 0.000, 0.000) and (1.000, 1.000, 1.000), distance 1.732\n\
             Farthest points: (0.000, 0.000, 0.000) and (1.000, 1.000, 1.000), distance 1.732\n"
        );
    }

    #[test]
    fn test_pair_report_without_pairs() {
        let text = render(|out| write_pair_extremes(out, None, 3));
        assert_eq!(text, "Not enough points to form a pair.\n");
    }

    #[test]
    fn test_pair_report_precision() {
        let pair = PointPair {
            first: Point::new(0.0, 0.0, 0.0),
            second: Point::new(1.0, 0.0, 0.0),
            distance: 1.0,
        };
        let extremes = PairExtremes {
            closest: pair,
            farthest: pair,
        };
        let text = render(|out| write_pair_extremes(out, Some(&extremes), 1));
        assert!(text.starts_with("Closest points: (0.0, 0.0, 0.0) and (1.0, 0.0, 0.0), distance 1.0"));
    }

    #[test]
    fn test_cube_report() {
        let cube = BoundingCube::from_points(&[Point::new(1.0, 2.0, 3.0)]);
        let text = render(|out| write_cube_corners(out, "one.pt", cube.as_ref(), 3));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "Corner points of the smallest cube for one.pt:");
        assert!(lines[1..].iter().all(|l| *l == "  (1.000, 2.000, 3.000)"));
    }

    #[test]
    fn test_cube_report_empty() {
        let text = render(|out| write_cube_corners(out, "none.pt", None, 3));
        assert_eq!(text, "none.pt: no points, cube corners undefined.\n");
    }

    #[test]
    fn test_sphere_and_average_reports() {
        let hits = vec![Point::new(0.0, 0.0, 0.0), Point::new(1.0, 0.0, 0.0)];
        let text = render(|out| write_sphere_hits(out, "line.pt", &hits, 2));
        assert_eq!(
            text,
            "Points within sphere in line.pt (2 found):\n  (0.00, 0.00, 0.00)\n  (1.00, 0.00, 0.00)\n"
        );

        let text = render(|out| write_average_distance(out, "line.pt", 4.0 / 3.0, 3));
        assert_eq!(text, "Average distance between points in line.pt: 1.333\n");
    }
}
