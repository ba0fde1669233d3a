#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # concordance-matching
//!
//! Cross-version concordance builder.
//!
//! Leaf elements from every schema version are folded into canonical fields:
//! identical structural paths are grouped, paths that disappeared before the
//! latest version are reconciled through a short-circuiting chain of
//! [`MatchStrategy`] implementations, and identically documented fields with
//! non-overlapping versions are consolidated.
//!
//! ## Example Usage
//!
//! ```rust
//! use concordance_ir::{SchemaElement, SchemaVersion, StructuralPath};
//! use concordance_matching::ConcordanceBuilder;
//!
//! let mut builder = ConcordanceBuilder::new();
//! for version in ["2013v3.0", "2016v3.0"] {
//!     let path = StructuralPath::new(["IRS990", "EIN"]);
//!     let element = SchemaElement::new(path, "IRS990", SchemaVersion::new(version));
//!     builder.add_version(SchemaVersion::new(version), vec![element]);
//! }
//!
//! let output = builder.build().unwrap();
//! assert_eq!(output.concordance.len(), 1);
//! assert_eq!(output.concordance.fields()[0].canonical_name, "IRS990_EIN");
//! ```

pub mod engine;
pub mod index;
pub mod naming;
pub mod reporter;
pub mod rules;

pub use engine::{BuildOutput, BuilderConfig, ConcordanceBuilder};
pub use reporter::{MergeEvent, MergeReport};
pub use rules::{DescriptionStrategy, LeafNameStrategy, MatchKind, MatchOutcome, MatchStrategy};

use thiserror::Error;

/// Errors that can occur while building a concordance
#[derive(Error, Debug)]
pub enum Error {
    #[error("Model error: {0}")]
    Model(#[from] concordance_ir::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
