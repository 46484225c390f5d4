//! Progress-callback trait for pipeline stage events.
//!
//! Inject an [`Arc<dyn PipelineProgress>`] via
//! [`crate::config::PipelineConfigBuilder::progress`] to be told when each
//! stage starts, finishes, or fails. Events are observational only: nothing a
//! callback does can change the course of a run.
//!
//! # Example
//!
//! ```rust
//! use oscem_reader::{PipelineProgress, Stage};
//!
//! struct Banner;
//!
//! impl PipelineProgress for Banner {
//!     fn on_stage_start(&self, stage: Stage) {
//!         if stage == Stage::Extract {
//!             println!("=== Running extractor ===");
//!         }
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// The ordered stages of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Validating inputs before any stage runs.
    Configure,
    /// Inferring the file type from the input directory.
    Detect,
    /// Resolving the extractor relative to the install layout.
    LocateExtractor,
    /// Creating the output file's parent directory.
    PrepareOutput,
    /// Running the extraction collaborator.
    Extract,
    /// Resolving the rule table and running the conversion collaborator.
    Convert,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Configure => "configure",
            Stage::Detect => "detect",
            Stage::LocateExtractor => "locate-extractor",
            Stage::PrepareOutput => "prepare-output",
            Stage::Extract => "extract",
            Stage::Convert => "convert",
        };
        f.write_str(s)
    }
}

/// Called by the orchestrator as it moves through the stages.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Runs are sequential, so calls never overlap.
pub trait PipelineProgress: Send + Sync {
    /// Called just before a stage begins.
    fn on_stage_start(&self, stage: Stage) {
        let _ = stage;
    }

    /// Called when a stage finishes successfully.
    ///
    /// # Arguments
    /// * `stage`: the stage that finished
    /// * `elapsed_ms`: wall-clock time spent in the stage
    fn on_stage_complete(&self, stage: Stage, elapsed_ms: u64) {
        let _ = (stage, elapsed_ms);
    }

    /// Called when a stage fails; the run ends right after.
    fn on_stage_error(&self, stage: Stage, error: &str) {
        let _ = (stage, error);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgress;

impl PipelineProgress for NoopProgress {}

/// Convenience alias matching the type stored in [`crate::config::PipelineConfig`].
pub type ProgressCallback = Arc<dyn PipelineProgress>;
