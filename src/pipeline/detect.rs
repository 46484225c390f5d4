//! File-type detection: infer a type from the contents of a directory.
//!
//! The input directory is expected to hold one data file (plus, possibly,
//! subdirectories). The type is the lowercase extension of the first entry
//! that is not a directory.
//!
//! Entries are sorted by file name before the scan. The order of a raw
//! directory read differs between platforms and file systems, and detection
//! must give the same answer for the same directory everywhere.

use crate::error::DetectionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

/// A lowercase file extension without its leading dot. May be empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetectedType(String);

impl DetectedType {
    /// Derive the type from a file name.
    ///
    /// The extension is everything after the last `.`, lowercased:
    /// `scan.PRZ` → `prz`, `a.tar.gz` → `gz`, `.hidden` → `hidden`,
    /// `noext` → empty.
    pub fn from_file_name(name: &str) -> Self {
        let ext = name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
        Self(ext.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for DetectedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Detect the file type of `dir` from its first non-directory entry.
///
/// Symlinks are classified by their own type, not their target's, so a
/// symlink to a directory counts as a file here.
///
/// # Errors
/// - [`DetectionError::Unreadable`] if `dir` cannot be listed
/// - [`DetectionError::NoRegularFile`] if every entry is a directory
pub fn detect_file_type(dir: &Path) -> Result<DetectedType, DetectionError> {
    let unreadable = |source: std::io::Error| DetectionError::Unreadable {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = std::fs::read_dir(dir)
        .map_err(unreadable)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(unreadable)?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let file_type = entry.file_type().map_err(unreadable)?;
        let name = entry.file_name();
        if file_type.is_dir() {
            debug!("Skipping subdirectory {:?}", name);
            continue;
        }
        let detected = DetectedType::from_file_name(&name.to_string_lossy());
        info!("Detected file type '{}' from {:?}", detected, name);
        return Ok(detected);
    }

    Err(DetectionError::NoRegularFile {
        path: dir.to_path_buf(),
    })
}
