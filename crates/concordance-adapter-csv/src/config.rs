//! CSV export options

/// Configuration for the tabular concordance export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvConfig {
    /// Field delimiter character (default: comma)
    pub delimiter: char,
    /// Separator between entries of the `versions` column (default: `;`)
    pub list_separator: String,
    /// Whether to write the header row (default: true)
    pub has_header: bool,
    /// Whether to append one `xpath_<version>` column per version
    /// (default: true)
    pub version_columns: bool,
    /// Record terminator (default: LF)
    pub record_terminator: RecordTerminator,
}

/// Record terminator for writing CSV
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordTerminator {
    /// CRLF (Windows-style, RFC 4180)
    CRLF,
    /// LF (Unix-style)
    LF,
}

impl RecordTerminator {
    pub(crate) fn to_csv(self) -> csv::Terminator {
        match self {
            Self::CRLF => csv::Terminator::CRLF,
            Self::LF => csv::Terminator::Any(b'\n'),
        }
    }
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            list_separator: ";".to_string(),
            has_header: true,
            version_columns: true,
            record_terminator: RecordTerminator::LF,
        }
    }
}

impl CsvConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the delimiter character
    #[must_use]
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the separator used inside the `versions` column
    #[must_use]
    pub fn list_separator(mut self, separator: impl Into<String>) -> Self {
        self.list_separator = separator.into();
        self
    }

    /// Set whether to write a header row
    #[must_use]
    pub fn has_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Set whether per-version path columns are written
    #[must_use]
    pub fn version_columns(mut self, enabled: bool) -> Self {
        self.version_columns = enabled;
        self
    }

    /// Set the record terminator
    #[must_use]
    pub fn record_terminator(mut self, terminator: RecordTerminator) -> Self {
        self.record_terminator = terminator;
        self
    }

    /// Delimiter as a single byte
    ///
    /// # Errors
    ///
    /// Returns a configuration error for non-ASCII delimiters or delimiters
    /// that collide with the quote character.
    pub fn delimiter_byte(&self) -> crate::Result<u8> {
        if !self.delimiter.is_ascii() {
            return Err(crate::CsvError::config(format!(
                "delimiter must be ASCII, got '{}'",
                self.delimiter
            )));
        }
        if self.delimiter == '"' {
            return Err(crate::CsvError::config(
                "delimiter cannot be the quote character",
            ));
        }
        Ok(self.delimiter as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CsvConfig::default();
        assert_eq!(config.delimiter, ',');
        assert_eq!(config.list_separator, ";");
        assert!(config.has_header);
        assert!(config.version_columns);
        assert_eq!(config.record_terminator, RecordTerminator::LF);
    }

    #[test]
    fn test_builder_pattern() {
        let config = CsvConfig::new()
            .delimiter('\t')
            .list_separator("|")
            .has_header(false)
            .version_columns(false)
            .record_terminator(RecordTerminator::CRLF);

        assert_eq!(config.delimiter, '\t');
        assert_eq!(config.list_separator, "|");
        assert!(!config.has_header);
        assert!(!config.version_columns);
        assert_eq!(config.delimiter_byte().unwrap(), b'\t');
    }

    #[test]
    fn test_invalid_delimiters() {
        assert!(CsvConfig::new().delimiter('§').delimiter_byte().is_err());
        assert!(CsvConfig::new().delimiter('"').delimiter_byte().is_err());
    }
}
