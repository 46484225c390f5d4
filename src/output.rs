//! Output types returned by a successful pipeline run.

use crate::pipeline::detect::DetectedType;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Report of one completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutput {
    /// Type inferred from the input directory.
    pub detected_type: DetectedType,
    /// The extractor that ran, as reported by [`crate::Extractor::describe`].
    pub extractor: String,
    /// Rule table handed to the converter.
    pub rule_table: PathBuf,
    /// Where the converter wrote the artifact.
    pub output_path: PathBuf,
    /// Size of the raw extractor output.
    pub extracted_bytes: usize,
    /// Converter result summary.
    pub summary: String,
    pub stats: PipelineStats,
}

/// Wall-clock timings of a run, in milliseconds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineStats {
    pub detect_ms: u64,
    pub extract_ms: u64,
    pub convert_ms: u64,
    pub total_ms: u64,
}
