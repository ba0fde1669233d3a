//! # concordance-adapter-csv
//!
//! Tabular export of a concordance.
//!
//! One row per canonical field with its representative (latest) path,
//! labels, types and version span, followed by one `xpath_<version>` column
//! per processed version.
//!
//! ## Example Usage
//!
//! ```rust
//! use concordance_adapter_csv::{ConcordanceCsvWriter, CsvConfig};
//!
//! let writer = ConcordanceCsvWriter::new()
//!     .with_config(CsvConfig::new().delimiter(';').list_separator("|"));
//! assert_eq!(writer.config().delimiter, ';');
//! ```

pub mod config;
pub mod errors;
pub mod writer;

// Re-export main types
pub use config::{CsvConfig, RecordTerminator};
pub use errors::{CsvError, CsvResult};
pub use writer::{BASE_COLUMNS, ConcordanceCsvWriter, FILE_NAME};

pub use errors::CsvError as Error;
pub type Result<T> = CsvResult<T>;
