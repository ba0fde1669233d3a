//! Lookup file writer

use crate::document::LookupDocument;
use crate::Result;
use concordance_ir::Concordance;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name used when writing into an output directory
pub const FILE_NAME: &str = "field_lookup.json";

/// Writes a concordance as `field_lookup.json`
#[derive(Debug, Clone)]
pub struct JsonWriter {
    pretty: bool,
}

impl JsonWriter {
    /// Create a writer producing indented output
    pub fn new() -> Self {
        Self { pretty: true }
    }

    /// Toggle indented output
    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Serialize to a string
    pub fn render(&self, concordance: &Concordance) -> Result<String> {
        let document = LookupDocument::from(concordance);
        let text = if self.pretty {
            serde_json::to_string_pretty(&document)?
        } else {
            serde_json::to_string(&document)?
        };
        Ok(text)
    }

    /// Write to any sink
    pub fn write<W: Write>(&self, mut writer: W, concordance: &Concordance) -> Result<()> {
        let document = LookupDocument::from(concordance);
        if self.pretty {
            serde_json::to_writer_pretty(&mut writer, &document)?;
        } else {
            serde_json::to_writer(&mut writer, &document)?;
        }
        writer.flush()?;
        debug!(
            fields = document.fields.len(),
            paths = document.xpath_index.len(),
            "Wrote lookup document"
        );
        Ok(())
    }

    /// Write `field_lookup.json` into `dir`, returning the file path
    pub fn write_to_dir(&self, dir: &Path, concordance: &Concordance) -> Result<PathBuf> {
        let path = dir.join(FILE_NAME);
        let file = BufWriter::new(File::create(&path)?);
        self.write(file, concordance)?;
        Ok(path)
    }
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new()
    }
}
