//! # concordance-adapter-json
//!
//! Persisted form of a concordance (`field_lookup.json`).
//!
//! The file carries run metadata, every canonical field keyed by canonical
//! name with its per-version paths, and the reverse path index. It is the
//! hand-off point to downstream consumers and can be loaded back into a
//! [`Concordance`](concordance_ir::Concordance) with [`JsonReader`].

pub mod document;
pub mod reader;
pub mod writer;

pub use document::{FieldEntry, LookupDocument};
pub use reader::JsonReader;
pub use writer::{FILE_NAME, JsonWriter};

use thiserror::Error;

/// Errors that can occur when writing or reading the lookup file
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid lookup file: {0}")]
    Invalid(String),

    #[error("Model error: {0}")]
    Model(#[from] concordance_ir::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
