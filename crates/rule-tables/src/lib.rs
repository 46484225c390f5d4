//! # rule-tables
//!
//! Naming convention and download cache for the CSV conversion rule tables
//! consumed by the metadata converter.
//!
//! Each supported file type `T` has exactly one table, named
//! `ms_conversions_<T>.csv`, living in a `csv/` directory next to the
//! installed binary. Tables are provisioned ahead of time (packaging, CI or
//! the `fetch-rule-tables` tool); nothing in the conversion pipeline
//! downloads at run time.
//!
//! ## How provisioning works
//!
//! On a call to [`ensure_rule_tables`]:
//!
//! 1. Creates the destination directory if needed.
//! 2. Skips every table already on disk (unless `force` is set).
//! 3. Downloads the rest from the upstream converter repository.
//! 4. Writes each table through a temp file + rename so a failed download
//!    never leaves a truncated CSV behind.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use rule_tables::{ensure_rule_tables, table_path, KNOWN_TYPES};
//! use std::path::Path;
//!
//! let dir = Path::new("/opt/oscem-reader/csv");
//! ensure_rule_tables(dir, KNOWN_TYPES, false, None).expect("download failed");
//! assert!(table_path(dir, "prz").ends_with("ms_conversions_prz.csv"));
//! ```
//!
//! ## Environment variable overrides
//!
//! - `RULE_TABLES_BASE_URL`: fetch tables from a mirror instead of GitHub.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

// ── Public constants ─────────────────────────────────────────────────────────

/// Directory, relative to the install base, holding the rule tables.
pub const RULES_DIR: &str = "csv";

/// File-name prefix shared by every rule table.
pub const TABLE_PREFIX: &str = "ms_conversions_";

/// File-name suffix shared by every rule table.
pub const TABLE_SUFFIX: &str = ".csv";

/// File types the upstream repository publishes a rule table for.
pub const KNOWN_TYPES: &[&str] = &["emd", "prz"];

/// Raw-content URL of the upstream `csv/` directory.
pub const BASE_URL: &str =
    "https://raw.githubusercontent.com/osc-em/oscem-converter-extracted/refs/heads/main/csv";

// ── Error type ───────────────────────────────────────────────────────────────

/// Errors returned by rule-table provisioning.
#[derive(Error, Debug)]
pub enum RuleTablesError {
    /// The type string cannot name a table (empty, or contains a separator).
    #[error("Invalid file type '{0}': expected a bare lowercase extension")]
    InvalidType(String),

    /// Could not create the destination directory.
    #[error("Rule table directory error for '{path}': {source}")]
    RulesDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Network download failed.
    #[error("Download failed: {0}")]
    Download(String),

    /// The downloaded table could not be written to disk.
    #[error("Failed to write rule table '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ── Naming ───────────────────────────────────────────────────────────────────

/// File name of the rule table for `file_type`, e.g. `ms_conversions_prz.csv`.
pub fn table_file_name(file_type: &str) -> String {
    format!("{TABLE_PREFIX}{file_type}{TABLE_SUFFIX}")
}

/// Full path of the rule table for `file_type` inside `rules_dir`.
///
/// Pure path construction: the file is not required to exist.
pub fn table_path(rules_dir: &Path, file_type: &str) -> PathBuf {
    rules_dir.join(table_file_name(file_type))
}

/// Returns `true` if the table for `file_type` is already present.
pub fn is_table_cached(rules_dir: &Path, file_type: &str) -> bool {
    table_path(rules_dir, file_type).is_file()
}

/// Download URL for the table of `file_type`.
///
/// Honours `RULE_TABLES_BASE_URL` when set.
pub fn table_url(file_type: &str) -> String {
    let base = std::env::var("RULE_TABLES_BASE_URL")
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| BASE_URL.to_string());
    format!("{}/{}", base.trim_end_matches('/'), table_file_name(file_type))
}

// ── Provisioning ─────────────────────────────────────────────────────────────

/// Ensures the rule tables for `types` are present in `rules_dir`.
///
/// Tables already on disk are left alone unless `force` is set.
/// `on_progress` receives `(file_type, bytes_downloaded, total_size_option)`
/// during each download. Pass `None` to suppress progress callbacks.
///
/// Returns the path of every requested table, in request order.
pub fn ensure_rule_tables(
    rules_dir: &Path,
    types: &[&str],
    force: bool,
    on_progress: Option<&dyn Fn(&str, u64, Option<u64>)>,
) -> Result<Vec<PathBuf>, RuleTablesError> {
    for t in types {
        validate_type(t)?;
    }

    std::fs::create_dir_all(rules_dir).map_err(|source| RuleTablesError::RulesDir {
        path: rules_dir.to_path_buf(),
        source,
    })?;

    let mut paths = Vec::with_capacity(types.len());
    for file_type in types {
        let dest = table_path(rules_dir, file_type);
        if !force && dest.is_file() {
            paths.push(dest);
            continue;
        }

        let url = table_url(file_type);
        let bytes = download_bytes(&url, |done, total| {
            if let Some(cb) = on_progress {
                cb(file_type, done, total);
            }
        })?;
        write_atomic(&dest, &bytes)?;
        paths.push(dest);
    }

    Ok(paths)
}

// ── Internal helpers ─────────────────────────────────────────────────────────

fn validate_type(file_type: &str) -> Result<(), RuleTablesError> {
    let bad = file_type.is_empty()
        || file_type.contains(['/', '\\', '.'])
        || file_type.chars().any(|c| c.is_uppercase());
    if bad {
        return Err(RuleTablesError::InvalidType(file_type.to_string()));
    }
    Ok(())
}

/// Streams a URL into a `Vec<u8>`, calling `on_progress` every 16 KiB.
fn download_bytes(
    url: &str,
    on_progress: impl Fn(u64, Option<u64>),
) -> Result<Vec<u8>, RuleTablesError> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("rule-tables/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| RuleTablesError::Download(e.to_string()))?;

    let mut response = client
        .get(url)
        .send()
        .map_err(|e| RuleTablesError::Download(format!("GET {url}: {e}")))?;

    if !response.status().is_success() {
        return Err(RuleTablesError::Download(format!(
            "HTTP {} for {url}",
            response.status()
        )));
    }

    let total = response.content_length();
    let mut buf = Vec::with_capacity(total.unwrap_or(16 * 1024) as usize);
    let mut chunk = vec![0u8; 16 * 1024];
    let mut downloaded: u64 = 0;

    loop {
        match response.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                downloaded += n as u64;
                on_progress(downloaded, total);
            }
            Err(ref e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(RuleTablesError::Download(format!("Read error: {e}")));
            }
        }
    }

    Ok(buf)
}

fn write_atomic(dest: &Path, bytes: &[u8]) -> Result<(), RuleTablesError> {
    let tmp = dest.with_extension("csv.part");
    let write = || -> std::io::Result<()> {
        let mut f = std::fs::File::create(&tmp)?;
        f.write_all(bytes)?;
        f.sync_all()?;
        std::fs::rename(&tmp, dest)
    };
    write().map_err(|source| {
        let _ = std::fs::remove_file(&tmp);
        RuleTablesError::Write {
            path: dest.to_path_buf(),
            source,
        }
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
