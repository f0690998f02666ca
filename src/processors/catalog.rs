//! Discovery and classification of point files in a directory.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use thiserror::Error;

use crate::core::loaders::{self, LoaderError, PointFile};
use crate::core::point::Point;

/// Errors that abort a catalog operation.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("error opening directory {}: {source}", path.display())]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Why a directory entry was excluded from the suitable set.
#[derive(Debug, Error)]
pub enum Rejection {
    #[error("file {name} does not have a .{extension} extension and will not be analyzed")]
    WrongExtension { name: String, extension: String },

    #[error(transparent)]
    Load(#[from] LoaderError),
}

/// Outcome of scanning a directory.
#[derive(Debug, Default)]
pub struct CatalogScan {
    /// Files that passed validation, in name order.
    pub suitable: Vec<PointFile>,
    /// Entries that did not, in name order.
    pub rejected: Vec<Rejection>,
}

impl CatalogScan {
    /// True when no entry was rejected.
    pub fn all_suitable(&self) -> bool {
        self.rejected.is_empty()
    }

    /// Point lists of the suitable files, for the analysis functions.
    pub fn point_sets(&self) -> impl Iterator<Item = &[Point]> + '_ {
        self.suitable.iter().map(|f| f.points.as_slice())
    }
}

/// Non-hidden entries of `dir` as (display name, path), sorted by name.
///
/// Only the display name is lossily decoded; the path is kept as returned
/// by the OS.
fn read_entries(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let entries = fs::read_dir(dir).map_err(|source| CatalogError::DirectoryUnreadable {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut found: Vec<(String, PathBuf)> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| (entry.file_name().to_string_lossy().into_owned(), entry.path()))
        .filter(|(name, _)| !name.starts_with('.'))
        .collect();

    found.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(found)
}

/// Lists entry names in `dir`, skipping names that start with `.`.
///
/// The listing is not recursive and is sorted by name.
pub fn list_entries(dir: &Path) -> Result<Vec<String>> {
    Ok(read_entries(dir)?.into_iter().map(|(name, _)| name).collect())
}

/// Classifies every entry in `dir`.
///
/// Entries without the extension are rejected outright; the rest are loaded
/// and rejected on any load failure. A bad file never stops the scan.
pub fn scan(dir: &Path, extension: &str) -> Result<CatalogScan> {
    let mut result = CatalogScan::default();

    for (name, path) in read_entries(dir)? {
        if !loaders::has_point_extension(&name, extension) {
            warn!("Skipping {}: not a .{} file", name, extension);
            result.rejected.push(Rejection::WrongExtension {
                name,
                extension: extension.to_string(),
            });
            continue;
        }

        match loaders::load_point_file(&path) {
            Ok(file) => result.suitable.push(file),
            Err(e) => {
                warn!("Rejected {}: {}", name, e);
                result.rejected.push(e.into());
            }
        }
    }

    info!(
        "Scanned {}: {} suitable, {} rejected",
        dir.display(),
        result.suitable.len(),
        result.rejected.len()
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn create_point_file(dir: &Path, name: &str, declared: usize, points: &[[f64; 3]]) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        writeln!(file, "VERSION 1").unwrap();
        writeln!(file, "FORMAT x y z").unwrap();
        writeln!(file, "POINTS {}", declared).unwrap();
        writeln!(file, "DATA ascii").unwrap();
        for p in points {
            writeln!(file, "{} {} {}", p[0], p[1], p[2]).unwrap();
        }
        path
    }

    #[test]
    fn test_list_entries_skips_hidden() {
        let temp_dir = TempDir::new().unwrap();
        File::create(temp_dir.path().join("b.pt")).unwrap();
        File::create(temp_dir.path().join("a.txt")).unwrap();
        File::create(temp_dir.path().join(".hidden.pt")).unwrap();

        let names = list_entries(temp_dir.path()).unwrap();
        assert_eq!(names, vec!["a.txt".to_string(), "b.pt".to_string()]);
    }

    #[test]
    fn test_list_entries_missing_dir() {
        let temp_dir = TempDir::new().unwrap();
        let err = list_entries(&temp_dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, CatalogError::DirectoryUnreadable { .. }));
    }

    #[test]
    fn test_scan_classifies_entries() {
        let temp_dir = TempDir::new().unwrap();
        create_point_file(temp_dir.path(), "good.pt", 2, &[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]);
        create_point_file(temp_dir.path(), "short.pt", 3, &[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]);
        File::create(temp_dir.path().join("readme.txt")).unwrap();

        let scan = scan(temp_dir.path(), "pt").unwrap();
        assert!(!scan.all_suitable());
        assert_eq!(scan.suitable.len(), 1);
        assert_eq!(scan.suitable[0].name(), "good.pt");
        assert_eq!(scan.rejected.len(), 2);

        assert!(scan.rejected.iter().any(|r| matches!(
            r,
            Rejection::Load(LoaderError::CountMismatch {
                expected: 3,
                actual: 2,
                ..
            })
        )));
        assert!(scan
            .rejected
            .iter()
            .any(|r| matches!(r, Rejection::WrongExtension { name, .. } if name == "readme.txt")));
    }

    #[test]
    fn test_scan_all_suitable() {
        let temp_dir = TempDir::new().unwrap();
        create_point_file(temp_dir.path(), "a.pt", 1, &[[1.0, 2.0, 3.0]]);
        create_point_file(temp_dir.path(), "b.pt", 1, &[[4.0, 5.0, 6.0]]);

        let scan = scan(temp_dir.path(), "pt").unwrap();
        assert!(scan.all_suitable());
        assert_eq!(scan.point_sets().count(), 2);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_scan_opens_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = TempDir::new().unwrap();
        let name = OsStr::from_bytes(b"cloud\xff.pt");
        fs::write(
            temp_dir.path().join(name),
            "VERSION 1\nFORMAT x y z\nPOINTS 1\nDATA ascii\n1 2 3\n",
        )
        .unwrap();

        let scan = scan(temp_dir.path(), "pt").unwrap();
        assert!(scan.all_suitable());
        assert_eq!(scan.suitable.len(), 1);
        assert_eq!(scan.suitable[0].path, temp_dir.path().join(name));
        assert_eq!(scan.suitable[0].name(), "cloud\u{FFFD}.pt");
    }

    #[test]
    fn test_scan_empty_dir_is_suitable() {
        let temp_dir = TempDir::new().unwrap();
        let scan = scan(temp_dir.path(), "pt").unwrap();
        assert!(scan.all_suitable());
        assert!(scan.suitable.is_empty());
    }

    #[test]
    fn test_scan_unreadable_point_file_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        // A directory with the extension cannot be read as a file.
        fs::create_dir(temp_dir.path().join("folder.pt")).unwrap();
        create_point_file(temp_dir.path(), "ok.pt", 1, &[[0.0, 0.0, 0.0]]);

        let scan = scan(temp_dir.path(), "pt").unwrap();
        assert_eq!(scan.suitable.len(), 1);
        assert_eq!(scan.rejected.len(), 1);
        assert!(matches!(scan.rejected[0], Rejection::Load(LoaderError::Io { .. })));
    }
}
