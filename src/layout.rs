//! Install layout: where co-installed resources live.
//!
//! The extractor binary, the converter binary and the rule tables all travel
//! with the `oscem-reader` executable:
//!
//! ```text
//! <base>/
//!  ├─ oscem-reader
//!  ├─ dist/extractor_bin
//!  ├─ dist/converter_bin
//!  └─ csv/ms_conversions_<type>.csv
//! ```
//!
//! `<base>` is resolved once at startup from the running executable and then
//! passed explicitly to whatever needs it, so the current working directory
//! never matters.

use crate::error::PipelineError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory, relative to the base, holding helper binaries.
pub const DIST_DIR: &str = "dist";

/// File name of the extraction program.
pub const EXTRACTOR_BIN: &str = "extractor_bin";

/// File name of the conversion program.
pub const CONVERTER_BIN: &str = "converter_bin";

/// Resolved base directory plus the resource paths derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    base_dir: PathBuf,
}

impl InstallLayout {
    /// Resolve the layout from the directory containing the running executable.
    pub fn from_current_exe() -> Result<Self, PipelineError> {
        let exe = std::env::current_exe().map_err(PipelineError::ExecutableLocation)?;
        let base_dir = exe
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| {
                PipelineError::ExecutableLocation(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("executable path '{}' has no parent directory", exe.display()),
                ))
            })?;
        debug!("Install layout rooted at {}", base_dir.display());
        Ok(Self { base_dir })
    }

    /// Use an explicit base directory instead of the executable's.
    pub fn at(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// `<base>/dist/extractor_bin`
    pub fn extractor_path(&self) -> PathBuf {
        self.base_dir.join(DIST_DIR).join(EXTRACTOR_BIN)
    }

    /// `<base>/dist/converter_bin`
    pub fn converter_path(&self) -> PathBuf {
        self.base_dir.join(DIST_DIR).join(CONVERTER_BIN)
    }

    /// `<base>/csv`
    pub fn rules_dir(&self) -> PathBuf {
        self.base_dir.join(rule_tables::RULES_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_paths_derive_from_base() {
        let layout = InstallLayout::at("/opt/reader");
        assert_eq!(
            layout.extractor_path(),
            PathBuf::from("/opt/reader/dist/extractor_bin")
        );
        assert_eq!(
            layout.converter_path(),
            PathBuf::from("/opt/reader/dist/converter_bin")
        );
        assert_eq!(layout.rules_dir(), PathBuf::from("/opt/reader/csv"));
    }

    #[test]
    fn current_exe_layout_is_the_exe_parent() {
        let layout = InstallLayout::from_current_exe().expect("test binary has a location");
        let exe = std::env::current_exe().unwrap();
        assert_eq!(layout.base_dir(), exe.parent().unwrap());
    }
}
