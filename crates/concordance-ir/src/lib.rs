#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # concordance-ir
//!
//! Data model shared by every stage of the concordance build.
//!
//! A schema walk produces [`SchemaElement`] records, one per leaf field per
//! schema version. The builder folds those into [`CanonicalField`]s, each of
//! which maps every [`SchemaVersion`] it was observed in to the
//! [`StructuralPath`] that identified the field in that version. The finished
//! registry is a [`Concordance`].

/// Built registry of canonical fields plus reverse index and run metadata.
pub mod concordance;
/// Leaf field records emitted by the schema walker.
pub mod element;
/// Version-independent field identities.
pub mod field;
/// Structural paths from a document's logical root to a field.
pub mod path;
/// Chronologically ordered schema version identifiers.
pub mod version;

pub use concordance::{Concordance, RunMetadata};
pub use element::{MaxOccurs, Occurs, SchemaElement};
pub use field::CanonicalField;
pub use path::StructuralPath;
pub use version::{SchemaVersion, resolve_fallback};

use thiserror::Error;

/// Errors that can occur when working with the concordance model
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Canonical field not found: {name}")]
    FieldNotFound { name: String },

    #[error("Duplicate canonical name: {name}")]
    DuplicateName { name: String },
}

impl Error {
    /// Build an invalid-path error with input path and parsing reason.
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Build a field-not-found error for a canonical name.
    pub fn field_not_found(name: impl Into<String>) -> Self {
        Self::FieldNotFound { name: name.into() }
    }
}

/// Crate-local result type for model operations.
pub type Result<T> = std::result::Result<T, Error>;
