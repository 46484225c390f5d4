//! Extraction stage: produce raw metadata for an input directory.
//!
//! The orchestrator only sees the [`Extractor`] trait. The shipped
//! implementation, [`ProcessExtractor`], runs an external program and
//! captures its stdout; an in-process extractor can be dropped in without
//! touching the orchestrator.

use crate::error::StageError;
use crate::layout::InstallLayout;
use crate::pipeline::subprocess::Invocation;
use async_trait::async_trait;
use std::borrow::Cow;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Raw metadata produced by the extraction stage.
///
/// Consumed immediately by the conversion stage; never retained past a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    bytes: Vec<u8>,
}

impl ExtractionResult {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The output as text. Invalid UTF-8 is replaced, not rejected.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// "Produce metadata from a directory."
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Extract raw metadata for the file in `input_dir`.
    async fn extract(&self, input_dir: &Path) -> Result<ExtractionResult, StageError>;

    /// Short human-readable description, used in logs and the run report.
    fn describe(&self) -> String;
}

/// Runs `program [leading_args..] <input_dir>` and captures its stdout.
#[derive(Debug, Clone)]
pub struct ProcessExtractor {
    program: PathBuf,
    leading_args: Vec<OsString>,
}

impl ProcessExtractor {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
        }
    }

    /// The co-installed `dist/extractor_bin`.
    pub fn from_layout(layout: &InstallLayout) -> Self {
        Self::new(layout.extractor_path())
    }

    /// Arguments placed before the input directory, e.g. a script path when
    /// `program` is an interpreter.
    pub fn leading_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

#[async_trait]
impl Extractor for ProcessExtractor {
    async fn extract(&self, input_dir: &Path) -> Result<ExtractionResult, StageError> {
        let stdout = Invocation::new(&self.program)
            .args(self.leading_args.iter().cloned())
            .arg(input_dir)
            .run()
            .await?;
        Ok(ExtractionResult::new(stdout))
    }

    fn describe(&self) -> String {
        self.program.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_extractor_is_dist_extractor_bin() {
        let e = ProcessExtractor::from_layout(&InstallLayout::at("/opt/reader"));
        assert_eq!(e.program(), Path::new("/opt/reader/dist/extractor_bin"));
        assert_eq!(e.describe(), "/opt/reader/dist/extractor_bin");
    }

    #[test]
    fn lossy_text_view() {
        let r = ExtractionResult::new(vec![b'o', b'k', 0xff]);
        assert_eq!(r.len(), 3);
        assert!(r.text().starts_with("ok"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn input_dir_is_the_last_argument() {
        let tmp = tempfile::tempdir().unwrap();
        let e = ProcessExtractor::new("/bin/sh").leading_args(["-c", "printf '%s' \"$1\"", "sh"]);
        let out = e.extract(tmp.path()).await.unwrap();
        assert_eq!(out.text(), tmp.path().to_string_lossy());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_extractor_reports_subprocess_error() {
        let e = ProcessExtractor::new("/bin/sh").leading_args(["-c", "exit 1", "sh"]);
        let err = e.extract(Path::new("/tmp")).await.unwrap_err();
        assert!(matches!(err, StageError::Subprocess(_)), "{err}");
    }
}
