#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # concordance-schema
//!
//! XML Schema loading and traversal for the concordance build.
//!
//! For each schema version the [`TypeCollector`] loads every document under
//! the version directory (following includes and imports) into a
//! [`TypeRegistry`] of named complex types, groups and global elements. The
//! [`SchemaWalker`] then turns each document into leaf and repeating-container
//! [`concordance_ir::SchemaElement`] records, unwinding extension chains and
//! group references through [`inheritance::ContentExpander`].

pub mod collector;
pub mod inheritance;
pub mod loader;
pub mod model;
pub mod registry;
pub mod walker;

pub use collector::{TypeCollector, discover_xsd_files};
pub use loader::{SchemaLoader, XS_NS};
pub use model::{ElementDecl, ElementPattern, SchemaDocument};
pub use registry::TypeRegistry;
pub use walker::{GROUP_TYPE, MAX_DEPTH, SchemaWalker, element_pattern, schedule_name};

use thiserror::Error;

/// Errors that can occur when loading schemas
#[derive(Error, Debug)]
pub enum Error {
    #[error("Schema directory not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;
