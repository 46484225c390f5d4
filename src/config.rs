//! Configuration types for a pipeline run.
//!
//! A run is described by [`PipelineConfig`], built via its
//! [`PipelineConfigBuilder`]. The builder is the only place the input
//! invariants are checked: once a `PipelineConfig` exists, both paths are
//! non-empty.

use crate::error::PipelineError;
use crate::pipeline::convert::AuxiliaryParams;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::{Path, PathBuf};

/// Inputs of one pipeline run.
///
/// # Example
/// ```rust
/// use oscem_reader::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .input_dir("/data/session-42")
///     .output_path("/data/out/session-42.json")
///     .build()
///     .unwrap();
/// assert!(config.output_path().ends_with("session-42.json"));
/// ```
#[derive(Clone)]
pub struct PipelineConfig {
    /// Directory holding the file to process.
    input_dir: PathBuf,

    /// Where the converted artifact is written.
    output_path: PathBuf,

    /// Reserved converter parameters. Always empty today.
    pub aux: AuxiliaryParams,

    /// Stage event sink. `None` means no events are emitted.
    pub progress: Option<ProgressCallback>,
}

impl fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("input_dir", &self.input_dir)
            .field("output_path", &self.output_path)
            .field("aux", &self.aux)
            .field(
                "progress",
                &self.progress.as_ref().map(|_| "<dyn PipelineProgress>"),
            )
            .finish()
    }
}

impl PipelineConfig {
    /// Create a new builder for `PipelineConfig`.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}

/// Builder for [`PipelineConfig`].
#[derive(Default)]
pub struct PipelineConfigBuilder {
    input_dir: Option<PathBuf>,
    output_path: Option<PathBuf>,
    aux: AuxiliaryParams,
    progress: Option<ProgressCallback>,
}

impl fmt::Debug for PipelineConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineConfigBuilder")
            .field("input_dir", &self.input_dir)
            .field("output_path", &self.output_path)
            .finish_non_exhaustive()
    }
}

impl PipelineConfigBuilder {
    pub fn input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.input_dir = Some(dir.into());
        self
    }

    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    pub fn aux(mut self, aux: AuxiliaryParams) -> Self {
        self.aux = aux;
        self
    }

    pub fn progress(mut self, cb: ProgressCallback) -> Self {
        self.progress = Some(cb);
        self
    }

    /// Build the configuration, validating that both paths are present.
    pub fn build(self) -> Result<PipelineConfig, PipelineError> {
        let input_dir = non_empty(self.input_dir, "input directory")?;
        let output_path = non_empty(self.output_path, "output file")?;
        Ok(PipelineConfig {
            input_dir,
            output_path,
            aux: self.aux,
            progress: self.progress,
        })
    }
}

fn non_empty(path: Option<PathBuf>, what: &str) -> Result<PathBuf, PipelineError> {
    match path {
        Some(p) if !p.as_os_str().is_empty() => Ok(p),
        _ => Err(PipelineError::InvalidConfig(format!("{what} path is required"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoopProgress;
    use std::sync::Arc;

    #[test]
    fn build_with_both_paths() {
        let cfg = PipelineConfig::builder()
            .input_dir("in")
            .output_path("out/result.json")
            .progress(Arc::new(NoopProgress))
            .build()
            .unwrap();
        assert_eq!(cfg.input_dir(), Path::new("in"));
        assert_eq!(cfg.output_path(), Path::new("out/result.json"));
        assert!(cfg.aux.is_empty());
        assert!(cfg.progress.is_some());
    }

    #[test]
    fn missing_input_is_rejected() {
        let err = PipelineConfig::builder()
            .output_path("out.json")
            .build()
            .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidConfig(ref m) if m.contains("input")));
    }

    #[test]
    fn empty_output_is_rejected() {
        let err = PipelineConfig::builder()
            .input_dir("in")
            .output_path("")
            .build()
            .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidConfig(ref m) if m.contains("output")));
    }

    #[test]
    fn debug_hides_callback() {
        let cfg = PipelineConfig::builder()
            .input_dir("in")
            .output_path("out.json")
            .progress(Arc::new(NoopProgress))
            .build()
            .unwrap();
        let dbg = format!("{cfg:?}");
        assert!(dbg.contains("<dyn PipelineProgress>"));
    }
}
