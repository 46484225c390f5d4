//! Pipeline stages for metadata conversion.
//!
//! Each submodule implements exactly one step. The orchestrator in
//! [`crate::run`] sequences them; none of them knows about the others.
//!
//! ## Data Flow
//!
//! ```text
//! detect ──▶ extract ──▶ rules ──▶ convert
//! (type)     (stdout)    (csv)     (artifact + summary)
//! ```
//!
//! 1. [`detect`]: infer the file type from the input directory
//! 2. [`extract`]: produce raw metadata for the directory
//! 3. [`rules`]: map the detected type to its rule table
//! 4. [`convert`]: apply the rule table and write the artifact
//!
//! [`subprocess`] is the shared child-process runner behind the
//! out-of-process extractor and converter.

pub mod convert;
pub mod detect;
pub mod extract;
pub mod rules;
pub mod subprocess;
