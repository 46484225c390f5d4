//! Error types for the oscem-reader library.
//!
//! Three layers of error reflect three layers of the pipeline:
//!
//! * [`PipelineError`]: fatal, returned from [`crate::run::Pipeline::run`].
//!   Every variant names the stage it came from; its `Display` output is the
//!   stage-prefixed line the CLI prints before exiting with status 1.
//!
//! * [`StageError`]: what an [`crate::Extractor`] or [`crate::Converter`]
//!   returns. Opaque to the orchestrator: it is wrapped, never inspected.
//!
//! * [`SubprocessError`] / [`DetectionError`]: leaf errors from the process
//!   runner and the directory detector.
//!
//! Nothing here is retried. The first error ends the run.

use crate::progress::Stage;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// All fatal errors returned by the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    // ── Config errors ─────────────────────────────────────────────────────
    /// A required input is missing or empty.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Detection errors ──────────────────────────────────────────────────
    /// The input directory could not be read or holds no regular file.
    #[error("Failed to detect file type: {0}")]
    Detection(#[from] DetectionError),

    // ── Environment errors ────────────────────────────────────────────────
    /// The running executable's own location could not be determined.
    #[error("Failed to get executable path: {0}")]
    ExecutableLocation(#[source] std::io::Error),

    // ── Stage errors ──────────────────────────────────────────────────────
    /// The extraction collaborator failed.
    #[error("Extractor failed due to: {0}")]
    Extraction(#[source] StageError),

    /// The output file's parent directory could not be created.
    #[error("Failed to create output file directory '{path}': {source}")]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The conversion collaborator failed.
    #[error("Converter failed due to: {0}")]
    Conversion(#[source] StageError),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error (runtime construction, etc.).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PipelineError {
    /// The stage in which this error occurred.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::InvalidConfig(_) | PipelineError::Internal(_) => Stage::Configure,
            PipelineError::Detection(_) => Stage::Detect,
            PipelineError::ExecutableLocation(_) => Stage::LocateExtractor,
            PipelineError::Extraction(_) => Stage::Extract,
            PipelineError::OutputDirectory { .. } => Stage::PrepareOutput,
            PipelineError::Conversion(_) => Stage::Convert,
        }
    }
}

/// Directory type detection failures.
#[derive(Debug, Error)]
pub enum DetectionError {
    /// The directory could not be listed.
    #[error("cannot read directory '{path}': {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The directory holds only subdirectories (or nothing at all).
    #[error("no regular file found in directory '{path}'")]
    NoRegularFile { path: PathBuf },
}

/// A child process could not be started, waited on, or exited non-zero.
///
/// The pipeline treats every variant as fatal and does not branch on which
/// one occurred.
#[derive(Debug, Error)]
pub enum SubprocessError {
    /// The program could not be started (not found, not executable, …).
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Feeding stdin or waiting for the process failed.
    #[error("I/O error while running '{program}': {source}")]
    Io {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The program ran but reported failure.
    #[error("'{program}' {status}")]
    Exit { program: PathBuf, status: ExitStatus },
}

/// Failure reported by an extraction or conversion collaborator.
#[derive(Debug, Error)]
pub enum StageError {
    /// An out-of-process collaborator failed.
    #[error(transparent)]
    Subprocess(#[from] SubprocessError),

    /// An in-process collaborator failed; the message is passed through as is.
    #[error("{0}")]
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_display_has_stage_prefix() {
        let e = PipelineError::from(DetectionError::NoRegularFile {
            path: PathBuf::from("/data/in"),
        });
        let msg = e.to_string();
        assert!(msg.starts_with("Failed to detect file type:"), "got: {msg}");
        assert!(msg.contains("/data/in"));
        assert_eq!(e.stage(), Stage::Detect);
    }

    #[test]
    fn extraction_display_has_stage_prefix() {
        let e = PipelineError::Extraction(StageError::Subprocess(SubprocessError::Spawn {
            program: PathBuf::from("/opt/dist/extractor_bin"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        }));
        let msg = e.to_string();
        assert!(msg.starts_with("Extractor failed due to:"), "got: {msg}");
        assert!(msg.contains("extractor_bin"));
        assert_eq!(e.stage(), Stage::Extract);
    }

    #[test]
    fn conversion_display_passes_message_through() {
        let e = PipelineError::Conversion(StageError::Failed("bad rule table".into()));
        assert_eq!(e.to_string(), "Converter failed due to: bad rule table");
        assert_eq!(e.stage(), Stage::Convert);
    }

    #[test]
    fn output_directory_display() {
        let e = PipelineError::OutputDirectory {
            path: PathBuf::from("/ro/out"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(e.to_string().contains("/ro/out"));
        assert_eq!(e.stage(), Stage::PrepareOutput);
    }

    #[test]
    fn config_error_stage() {
        let e = PipelineError::InvalidConfig("input directory is required".into());
        assert_eq!(e.stage(), Stage::Configure);
        assert!(e.to_string().contains("input directory"));
    }
}
