//! Lookup file reader

use crate::document::LookupDocument;
use crate::{Error, Result};
use concordance_ir::Concordance;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, warn};

/// Loads `field_lookup.json` back into a [`Concordance`]
#[derive(Debug, Clone, Default)]
pub struct JsonReader {
    strict_index: bool,
}

impl JsonReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail instead of warning when the stored reverse index disagrees with
    /// the field table
    #[must_use]
    pub fn with_strict_index(mut self, strict: bool) -> Self {
        self.strict_index = strict;
        self
    }

    pub fn read_str(&self, text: &str) -> Result<Concordance> {
        self.build_concordance(serde_json::from_str(text)?)
    }

    pub fn read<R: Read>(&self, reader: R) -> Result<Concordance> {
        self.build_concordance(serde_json::from_reader(reader)?)
    }

    pub fn read_file(&self, path: &Path) -> Result<Concordance> {
        let file = File::open(path)?;
        self.read(BufReader::new(file))
    }

    fn build_concordance(&self, document: LookupDocument) -> Result<Concordance> {
        let LookupDocument {
            metadata,
            fields,
            xpath_index,
        } = document;

        let mut versions = metadata.versions.clone();
        let mut table = Vec::with_capacity(fields.len());
        for (name, entry) in fields {
            if entry.xpaths.is_empty() {
                return Err(Error::Invalid(format!("field '{name}' has no paths")));
            }
            versions.extend(entry.xpaths.keys().cloned());
            table.push(entry.into_field(name));
        }

        let concordance = Concordance::new(metadata, versions, table)?;

        let derived = concordance.xpath_index();
        if !xpath_index.is_empty() && *derived != xpath_index {
            if self.strict_index {
                return Err(Error::Invalid(
                    "xpath_index does not match the field table".to_string(),
                ));
            }
            warn!(
                stored = xpath_index.len(),
                derived = derived.len(),
                "Stored xpath_index differs from field table; using field table"
            );
        }

        debug!(fields = concordance.len(), "Loaded lookup document");
        Ok(concordance)
    }
}
