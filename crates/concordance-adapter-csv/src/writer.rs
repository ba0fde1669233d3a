//! Concordance CSV writer

use crate::config::CsvConfig;
use crate::Result;
use concordance_ir::{CanonicalField, Concordance, SchemaVersion};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// File name used when writing into an output directory
pub const FILE_NAME: &str = "concordance.csv";

/// Fixed leading columns
pub const BASE_COLUMNS: [&str; 12] = [
    "canonical_name",
    "schedule",
    "xpath",
    "human_label",
    "data_type",
    "raw_xsd_type",
    "parent_group",
    "is_repeating",
    "description",
    "version_start",
    "version_end",
    "versions",
];

/// Writes one row per canonical field
#[derive(Debug, Clone, Default)]
pub struct ConcordanceCsvWriter {
    config: CsvConfig,
}

impl ConcordanceCsvWriter {
    /// Create a new writer with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create writer with configuration
    #[must_use]
    pub fn with_config(mut self, config: CsvConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &CsvConfig {
        &self.config
    }

    /// Header row: the fixed columns, then `xpath_<version>` per version
    pub fn headers(&self, versions: &[SchemaVersion]) -> Vec<String> {
        let mut headers: Vec<String> = BASE_COLUMNS.iter().map(|c| (*c).to_string()).collect();
        if self.config.version_columns {
            headers.extend(versions.iter().map(|v| format!("xpath_{v}")));
        }
        headers
    }

    /// One data row
    pub fn row(&self, field: &CanonicalField, versions: &[SchemaVersion]) -> Vec<String> {
        let present: Vec<&str> = field
            .versions_present()
            .into_iter()
            .map(SchemaVersion::as_str)
            .collect();

        let mut row = vec![
            field.canonical_name.clone(),
            field.schedule.clone(),
            field.latest_path().map(ToString::to_string).unwrap_or_default(),
            field.label.clone(),
            field.data_type.clone(),
            field.raw_type.clone(),
            field.group.clone().unwrap_or_default(),
            field.is_repeating.to_string(),
            field.description.clone(),
            present.first().map(|v| (*v).to_string()).unwrap_or_default(),
            present.last().map(|v| (*v).to_string()).unwrap_or_default(),
            present.join(&self.config.list_separator),
        ];
        if self.config.version_columns {
            row.extend(versions.iter().map(|v| {
                field
                    .path_for(v)
                    .map(ToString::to_string)
                    .unwrap_or_default()
            }));
        }
        row
    }

    /// Write the concordance as CSV
    pub fn write<W: Write>(&self, writer: W, concordance: &Concordance) -> Result<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(self.config.delimiter_byte()?)
            .terminator(self.config.record_terminator.to_csv())
            .from_writer(writer);

        let versions = concordance.versions();
        if self.config.has_header {
            csv_writer.write_record(self.headers(versions))?;
        }
        for field in concordance.fields() {
            let row = self.row(field, versions);
            trace!(name = %field.canonical_name, "Wrote CSV row");
            csv_writer.write_record(&row)?;
        }

        csv_writer.flush()?;
        debug!(record_count = concordance.len(), "Finished writing CSV");
        Ok(())
    }

    /// Write `concordance.csv` into `dir`, returning the file path
    pub fn write_to_dir(&self, dir: &Path, concordance: &Concordance) -> Result<PathBuf> {
        let path = dir.join(FILE_NAME);
        let file = File::create(&path)?;
        self.write(file, concordance)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RecordTerminator;
    use concordance_ir::RunMetadata;

    fn sample() -> Concordance {
        let mut revenue = CanonicalField::new("IRS990_TotalRevenueAmt2", "IRS990");
        revenue.label = "Total Revenue Amount2".to_string();
        revenue.data_type = "Dollar amount (USD)".to_string();
        revenue.raw_type = "USAmountType".to_string();
        revenue.description = "Total revenue, see instructions".to_string();
        revenue.insert_path(SchemaVersion::new("2013v3.0"), "/IRS990/TotalRevenueAmt".parse().unwrap());
        revenue.insert_path(SchemaVersion::new("2016v3.0"), "/IRS990/TotalRevenueAmt2".parse().unwrap());

        let mut name = CanonicalField::new("IRS990_OfficerGrp_PersonNm", "IRS990");
        name.group = Some("OfficerGrp".to_string());
        name.is_repeating = true;
        name.insert_path(SchemaVersion::new("2016v3.0"), "/IRS990/OfficerGrp/PersonNm".parse().unwrap());

        Concordance::new(
            RunMetadata::new("test", "sample"),
            vec![
                SchemaVersion::new("2013v3.0"),
                SchemaVersion::new("2015v2.1"),
                SchemaVersion::new("2016v3.0"),
            ],
            vec![revenue, name],
        )
        .unwrap()
    }

    fn write_to_string(writer: &ConcordanceCsvWriter) -> String {
        let mut output = Vec::new();
        writer.write(&mut output, &sample()).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_header_row() {
        let text = write_to_string(&ConcordanceCsvWriter::new());
        let header = text.lines().next().unwrap();
        assert_eq!(
            header,
            "canonical_name,schedule,xpath,human_label,data_type,raw_xsd_type,parent_group,\
             is_repeating,description,version_start,version_end,versions,\
             xpath_2013v3.0,xpath_2015v2.1,xpath_2016v3.0"
        );
    }

    #[test]
    fn test_rows_follow_field_order_and_blank_missing_versions() {
        let text = write_to_string(&ConcordanceCsvWriter::new());
        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);

        let officer = &rows[0];
        assert_eq!(&officer[0], "IRS990_OfficerGrp_PersonNm");
        assert_eq!(&officer[6], "OfficerGrp");
        assert_eq!(&officer[7], "true");

        let revenue = &rows[1];
        assert_eq!(&revenue[2], "/IRS990/TotalRevenueAmt2");
        assert_eq!(&revenue[8], "Total revenue, see instructions");
        assert_eq!(&revenue[9], "2013v3.0");
        assert_eq!(&revenue[10], "2016v3.0");
        assert_eq!(&revenue[11], "2013v3.0;2016v3.0");
        assert_eq!(&revenue[12], "/IRS990/TotalRevenueAmt");
        assert_eq!(&revenue[13], "");
        assert_eq!(&revenue[14], "/IRS990/TotalRevenueAmt2");
    }

    #[test]
    fn test_configured_delimiter_and_separator() {
        let writer = ConcordanceCsvWriter::new().with_config(
            CsvConfig::new()
                .delimiter(';')
                .list_separator("|")
                .version_columns(false)
                .record_terminator(RecordTerminator::CRLF),
        );
        let text = write_to_string(&writer);
        assert!(text.contains("2013v3.0|2016v3.0"));
        assert!(text.contains("\r\n"));
        assert!(!text.contains("xpath_2013v3.0"));
        assert_eq!(text.lines().next().unwrap().split(';').count(), BASE_COLUMNS.len());
    }

    #[test]
    fn test_write_without_header() {
        let writer = ConcordanceCsvWriter::new().with_config(CsvConfig::new().has_header(false));
        let text = write_to_string(&writer);
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with("IRS990_OfficerGrp_PersonNm"));
    }

    #[test]
    fn test_invalid_delimiter_is_rejected() {
        let writer = ConcordanceCsvWriter::new().with_config(CsvConfig::new().delimiter('§'));
        let mut output = Vec::new();
        assert!(writer.write(&mut output, &sample()).is_err());
    }

    #[test]
    fn test_write_to_dir_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = ConcordanceCsvWriter::new()
            .write_to_dir(dir.path(), &sample())
            .unwrap();
        assert_eq!(path, dir.path().join(FILE_NAME));
        let text = std::fs::read_to_string(path).unwrap();
        assert_eq!(text.lines().count(), 3);
    }
}
