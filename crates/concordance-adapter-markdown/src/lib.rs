//! # concordance-adapter-markdown
//!
//! Human-readable field reference (`field_reference.md`), one section per
//! schedule with non-repeating fields first and one subsection per
//! repeating group.

pub mod titles;
pub mod writer;

pub use titles::{KNOWN_FORMS, schedule_title};
pub use writer::{FILE_NAME, MarkdownConfig, MarkdownWriter};

use thiserror::Error;

/// Errors that can occur when writing the field reference
#[derive(Error, Debug)]
pub enum Error {
    #[error("Format error: {0}")]
    Format(#[from] std::fmt::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
