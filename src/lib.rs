//! # oscem-reader
//!
//! Convert raw instrument metadata into a standardised format through a
//! two-stage pipeline: an external extractor reads the data file, and a
//! converter maps its output using a rule table chosen by file type.
//!
//! ## Pipeline Overview
//!
//! ```text
//! input dir
//!  │
//!  ├─ 1. Detect    first non-directory entry → lowercase extension
//!  ├─ 2. Prepare   create the output file's parent directories
//!  ├─ 3. Extract   <exe-dir>/dist/extractor_bin <input dir>  → stdout bytes
//!  ├─ 4. Resolve   <exe-dir>/csv/ms_conversions_<type>.csv
//!  └─ 5. Convert   metadata + rule table → artifact at the output path + summary
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use oscem_reader::{InstallLayout, Pipeline, PipelineConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let layout = InstallLayout::from_current_exe()?;
//!     let config = PipelineConfig::builder()
//!         .input_dir("/data/session-42")
//!         .output_path("/data/out/session-42.json")
//!         .build()?;
//!     let output = Pipeline::from_layout(layout).run(&config).await?;
//!     println!("{}", output.summary);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `oscem-reader` and `fetch-rule-tables` binaries |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod layout;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod run;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{PipelineConfig, PipelineConfigBuilder};
pub use error::{DetectionError, PipelineError, StageError, SubprocessError};
pub use layout::InstallLayout;
pub use output::{PipelineOutput, PipelineStats};
pub use pipeline::convert::{
    AuxiliaryParams, ConversionOutcome, ConversionRequest, Converter, ProcessConverter,
};
pub use pipeline::detect::{detect_file_type, DetectedType};
pub use pipeline::extract::{ExtractionResult, Extractor, ProcessExtractor};
pub use pipeline::rules::rule_table_path;
pub use progress::{NoopProgress, PipelineProgress, ProgressCallback, Stage};
pub use run::Pipeline;
