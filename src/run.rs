//! Pipeline orchestration: detect → prepare output → extract → convert.
//!
//! Every stage is terminal on failure. There are no retries and nothing is
//! rolled back: the first error is returned and no later stage runs. Stages
//! never overlap; the only suspension point is waiting for a collaborator.

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::layout::InstallLayout;
use crate::output::{PipelineOutput, PipelineStats};
use crate::pipeline::convert::{ConversionRequest, Converter, ProcessConverter};
use crate::pipeline::detect::detect_file_type;
use crate::pipeline::extract::{Extractor, ProcessExtractor};
use crate::pipeline::rules::rule_table_path;
use crate::progress::Stage;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// The orchestrator: an install layout plus the two collaborators.
#[derive(Clone)]
pub struct Pipeline {
    layout: InstallLayout,
    extractor: Arc<dyn Extractor>,
    converter: Arc<dyn Converter>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("layout", &self.layout)
            .field("extractor", &self.extractor.describe())
            .field("converter", &"<dyn Converter>")
            .finish()
    }
}

impl Pipeline {
    pub fn new(
        layout: InstallLayout,
        extractor: Arc<dyn Extractor>,
        converter: Arc<dyn Converter>,
    ) -> Self {
        Self {
            layout,
            extractor,
            converter,
        }
    }

    /// Pipeline using the co-installed `dist/extractor_bin` and
    /// `dist/converter_bin`.
    pub fn from_layout(layout: InstallLayout) -> Self {
        let extractor = Arc::new(ProcessExtractor::from_layout(&layout));
        let converter = Arc::new(ProcessConverter::from_layout(&layout));
        Self::new(layout, extractor, converter)
    }

    pub fn layout(&self) -> &InstallLayout {
        &self.layout
    }

    /// Run the whole pipeline once.
    ///
    /// # Errors
    /// The first [`PipelineError`] encountered; later stages do not run.
    pub async fn run(&self, config: &PipelineConfig) -> Result<PipelineOutput, PipelineError> {
        let total_start = Instant::now();
        info!(
            "Starting pipeline: {} → {}",
            config.input_dir().display(),
            config.output_path().display()
        );

        // ── Step 1: Detect file type ─────────────────────────────────────────
        let detect_start = begin(config, Stage::Detect);
        let detected = finish(
            config,
            Stage::Detect,
            detect_start,
            detect_file_type(config.input_dir()).map_err(PipelineError::from),
        )?;
        let detect_ms = elapsed_ms(detect_start);

        // ── Step 2: Ensure the output directory exists ───────────────────────
        let prepare_start = begin(config, Stage::PrepareOutput);
        finish(
            config,
            Stage::PrepareOutput,
            prepare_start,
            ensure_parent_dir(config.output_path()).await,
        )?;

        // ── Step 3: Extract ──────────────────────────────────────────────────
        let extractor = self.extractor.describe();
        debug!("Extractor located at {}", extractor);
        let extract_start = begin(config, Stage::Extract);
        let extracted = finish(
            config,
            Stage::Extract,
            extract_start,
            self.extractor
                .extract(config.input_dir())
                .await
                .map_err(PipelineError::Extraction),
        )?;
        let extract_ms = elapsed_ms(extract_start);
        info!("Extracted {} bytes of metadata", extracted.len());

        // ── Step 4: Resolve rule table and convert ───────────────────────────
        let convert_start = begin(config, Stage::Convert);
        let rule_table = rule_table_path(self.layout.base_dir(), &detected);
        debug!("Using rule table {}", rule_table.display());
        let request = ConversionRequest {
            metadata: extracted.as_bytes(),
            rule_table: &rule_table,
            aux: &config.aux,
            output_path: config.output_path(),
        };
        let outcome = finish(
            config,
            Stage::Convert,
            convert_start,
            self.converter
                .convert(request)
                .await
                .map_err(PipelineError::Conversion),
        )?;
        let convert_ms = elapsed_ms(convert_start);

        let stats = PipelineStats {
            detect_ms,
            extract_ms,
            convert_ms,
            total_ms: elapsed_ms(total_start),
        };
        info!("Pipeline complete in {}ms", stats.total_ms);

        Ok(PipelineOutput {
            detected_type: detected,
            extractor,
            rule_table,
            output_path: config.output_path().to_path_buf(),
            extracted_bytes: extracted.len(),
            summary: outcome.summary,
            stats,
        })
    }

    /// Synchronous wrapper around [`Pipeline::run`].
    ///
    /// Creates a single-threaded tokio runtime internally.
    pub fn run_sync(&self, config: &PipelineConfig) -> Result<PipelineOutput, PipelineError> {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| PipelineError::Internal(format!("Failed to create tokio runtime: {e}")))?
            .block_on(self.run(config))
    }
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Create the output file's parent directory and any missing ancestors.
async fn ensure_parent_dir(output_path: &Path) -> Result<(), PipelineError> {
    let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|source| PipelineError::OutputDirectory {
            path: parent.to_path_buf(),
            source,
        })
}

fn begin(config: &PipelineConfig, stage: Stage) -> Instant {
    if let Some(ref cb) = config.progress {
        cb.on_stage_start(stage);
    }
    Instant::now()
}

fn finish<T>(
    config: &PipelineConfig,
    stage: Stage,
    started: Instant,
    result: Result<T, PipelineError>,
) -> Result<T, PipelineError> {
    if let Some(ref cb) = config.progress {
        match &result {
            Ok(_) => cb.on_stage_complete(stage, elapsed_ms(started)),
            Err(e) => cb.on_stage_error(stage, &e.to_string()),
        }
    }
    result
}

fn elapsed_ms(since: Instant) -> u64 {
    since.elapsed().as_millis() as u64
}
