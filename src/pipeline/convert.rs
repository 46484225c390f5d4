//! Conversion stage: apply a rule table to extracted metadata.
//!
//! The converter writes the converted artifact to the requested output path
//! and hands back a human-readable summary. How the rule table is interpreted
//! is entirely the converter's business; the orchestrator only picks which
//! table to pass.

use crate::error::StageError;
use crate::layout::InstallLayout;
use crate::pipeline::subprocess::Invocation;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Two reserved converter parameters.
///
/// No options are recognised yet and both are always passed empty. They are
/// kept in the call so the converter contract does not change when the first
/// option arrives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuxiliaryParams {
    pub first: String,
    pub second: String,
}

impl AuxiliaryParams {
    pub fn is_empty(&self) -> bool {
        self.first.is_empty() && self.second.is_empty()
    }
}

/// Everything the conversion stage is given.
#[derive(Debug, Clone, Copy)]
pub struct ConversionRequest<'a> {
    /// Raw extractor output.
    pub metadata: &'a [u8],
    /// Rule table for the detected type.
    pub rule_table: &'a Path,
    pub aux: &'a AuxiliaryParams,
    /// Where the converted artifact must be written.
    pub output_path: &'a Path,
}

/// Result of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionOutcome {
    /// Human-readable result summary, printed by the CLI.
    pub summary: String,
}

/// "Produce an artifact from metadata + rules."
#[async_trait]
pub trait Converter: Send + Sync {
    async fn convert(
        &self,
        request: ConversionRequest<'_>,
    ) -> Result<ConversionOutcome, StageError>;
}

/// Runs `program [leading_args..] <rule_table> <aux.first> <aux.second> <output_path>`
/// with the metadata on stdin; stdout is the summary.
#[derive(Debug, Clone)]
pub struct ProcessConverter {
    program: PathBuf,
    leading_args: Vec<OsString>,
}

impl ProcessConverter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
        }
    }

    /// Arguments placed before the rule table, e.g. a script path when
    /// `program` is an interpreter.
    pub fn leading_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// The co-installed `dist/converter_bin`.
    pub fn from_layout(layout: &InstallLayout) -> Self {
        Self::new(layout.converter_path())
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

#[async_trait]
impl Converter for ProcessConverter {
    async fn convert(
        &self,
        request: ConversionRequest<'_>,
    ) -> Result<ConversionOutcome, StageError> {
        let stdout = Invocation::new(&self.program)
            .args(self.leading_args.iter().cloned())
            .arg(request.rule_table)
            .arg(&request.aux.first)
            .arg(&request.aux.second)
            .arg(request.output_path)
            .stdin_bytes(request.metadata)
            .run()
            .await?;

        let summary = String::from_utf8_lossy(&stdout).trim_end().to_string();
        Ok(ConversionOutcome { summary })
    }
}
