//! CLI configuration file

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use concordance_adapter_csv::CsvConfig;
use serde::{Deserialize, Serialize};

use crate::CliError;

/// Export written by `build`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// field_lookup.json
    Json,
    /// concordance.csv
    Csv,
    /// field_reference.md
    Markdown,
}

/// Settings read from the `--config` YAML file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub output_dir: PathBuf,
    pub formats: Vec<OutputFormat>,
    /// Walk versions in parallel
    pub parallel: bool,
    /// Tracing filter directive, e.g. `concordance_matching=debug`
    pub log_filter: Option<String>,
    /// Description stored in run metadata
    pub description: Option<String>,
    pub csv_delimiter: char,
    pub list_separator: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./concordance_output"),
            formats: vec![OutputFormat::Json, OutputFormat::Csv, OutputFormat::Markdown],
            parallel: true,
            log_filter: None,
            description: None,
            csv_delimiter: ',',
            list_separator: ";".to_string(),
        }
    }
}

impl CliConfig {
    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("cannot read config file {}: {e}", path.display()))
        })?;
        Self::parse(&text)
            .map_err(|e| CliError::Config(format!("invalid config file {}: {e}", path.display())))
    }

    fn parse(text: &str) -> Result<Self, String> {
        let config: Self = if text.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(text).map_err(|e| e.to_string())?
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        if self.formats.is_empty() {
            return Err("formats must name at least one of json, csv, markdown".to_string());
        }
        self.csv_config()
            .delimiter_byte()
            .map_err(|e| e.to_string())?;
        Ok(())
    }

    pub fn csv_config(&self) -> CsvConfig {
        CsvConfig::new()
            .delimiter(self.csv_delimiter)
            .list_separator(self.list_separator.clone())
    }
}
