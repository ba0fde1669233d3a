#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # concordance-pipeline
//!
//! Orchestration of a concordance build over a schema tree.
//!
//! The schema directory holds one subdirectory per version (or a flat set
//! of documents). Each version is collected and walked independently, on
//! blocking worker tasks when running in parallel, and the builder then
//! consumes the per-version results in chronological order. The coverage
//! checker compares a finished concordance against every element
//! declaration in the schemas.

pub mod coverage;
pub mod discovery;
pub mod pipeline;

pub use coverage::{CoverageChecker, CoverageEntry, CoverageReport, CoverageStatus, check_coverage};
pub use discovery::{UNKNOWN_VERSION, VersionSource, discover_versions, select_version};
pub use pipeline::{
    Pipeline, PipelineConfig, PipelineOutput, PipelineStats, VersionResult, process_version,
};

use thiserror::Error;

/// Errors that can occur in the pipeline
#[derive(Error, Debug)]
pub enum Error {
    #[error("Pipeline error during {operation} for '{path}': {message}")]
    Pipeline {
        operation: String,
        path: String,
        message: String,
    },

    #[error("Schema directory not found: {0}")]
    SchemaDirNotFound(String),

    #[error("No .xsd files found under {0}")]
    NoSchemas(String),

    #[error("Version '{version}' not found. Available: {available}")]
    VersionNotFound { version: String, available: String },

    #[error("Schema error: {0}")]
    Schema(#[from] concordance_schema::Error),

    #[error("Build error: {0}")]
    Build(#[from] concordance_matching::Error),

    #[error("IO error during {operation} for '{path}': {message}")]
    Io {
        operation: String,
        path: String,
        message: String,
    },
}

impl Error {
    /// Create a structured pipeline error with operation/path context.
    pub fn pipeline(
        operation: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Pipeline {
            operation: operation.into(),
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a structured I/O error with operation/path context.
    pub fn io(
        operation: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Io {
            operation: operation.into(),
            path: path.into(),
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::io("io", "<unknown>", e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
