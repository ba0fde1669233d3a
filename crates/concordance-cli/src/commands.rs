//! Subcommand implementations

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use concordance_adapter_csv::ConcordanceCsvWriter;
use concordance_adapter_json::{FieldEntry, JsonReader, JsonWriter};
use concordance_adapter_markdown::{MarkdownConfig, MarkdownWriter};
use concordance_ir::{Concordance, SchemaVersion, StructuralPath};
use concordance_pipeline::{Pipeline, PipelineConfig, check_coverage};
use serde::Serialize;
use tracing::info;

use crate::config::{CliConfig, OutputFormat};

/// Resolved `build` settings, flags applied over the config file
#[derive(Debug)]
pub struct BuildOptions {
    pub schema_dir: PathBuf,
    pub output_dir: PathBuf,
    pub single_version: Option<String>,
    pub formats: Vec<OutputFormat>,
    pub parallel: bool,
    pub description: Option<String>,
}

pub async fn build(options: BuildOptions, config: &CliConfig) -> anyhow::Result<()> {
    let mut pipeline_config = PipelineConfig {
        parallel: options.parallel,
        only_version: options.single_version.clone(),
        ..PipelineConfig::default()
    };
    if let Some(description) = options.description {
        pipeline_config.builder.description = description;
    }

    let output = Pipeline::new(pipeline_config)
        .run(&options.schema_dir)
        .await
        .with_context(|| format!("building concordance from {}", options.schema_dir.display()))?;

    fs::create_dir_all(&options.output_dir).with_context(|| {
        format!("creating output directory {}", options.output_dir.display())
    })?;

    let concordance = &output.build.concordance;
    let mut written = Vec::new();
    for format in &options.formats {
        let path = match format {
            OutputFormat::Json => JsonWriter::new().write_to_dir(&options.output_dir, concordance)?,
            OutputFormat::Csv => ConcordanceCsvWriter::new()
                .with_config(config.csv_config())
                .write_to_dir(&options.output_dir, concordance)?,
            OutputFormat::Markdown => MarkdownWriter::new()
                .with_config(
                    MarkdownConfig::new().with_companion_file(concordance_adapter_csv::FILE_NAME),
                )
                .write_to_dir(&options.output_dir, concordance)?,
        };
        info!("Wrote {}", path.display());
        written.push(path);
    }

    println!("Versions processed:     {}", output.stats.versions);
    println!("Elements extracted:     {}", output.stats.elements);
    println!("Schedules:              {}", concordance.schedules().len());
    println!("{}", output.build.report);
    println!("Repeating fields:       {}", output.stats.repeating_fields);
    for path in written {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

/// Returns whether every declaration is covered
pub fn coverage(schema_dir: &Path, lookup_file: &Path, version: Option<&str>) -> anyhow::Result<bool> {
    let concordance = load(lookup_file)?;
    let report = check_coverage(schema_dir, version, &concordance)
        .with_context(|| format!("checking coverage of {}", schema_dir.display()))?;
    println!("{report}");
    Ok(report.is_complete())
}

#[derive(Serialize)]
struct LookupOutput<'a> {
    canonical_name: &'a str,
    #[serde(flatten)]
    entry: FieldEntry,
}

pub fn lookup(lookup_file: &Path, xpath: &str) -> anyhow::Result<()> {
    let concordance = load(lookup_file)?;
    let path: StructuralPath = xpath.parse()?;
    let field = concordance
        .lookup_path(&path)
        .ok_or_else(|| anyhow!("no canonical field owns {path}"))?;

    let output = LookupOutput {
        canonical_name: &field.canonical_name,
        entry: FieldEntry::from(field),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn resolve(lookup_file: &Path, name: &str, version: &str) -> anyhow::Result<()> {
    let concordance = load(lookup_file)?;
    let requested = SchemaVersion::new(version);
    let (used, path) = concordance
        .resolve(name, &requested)?
        .ok_or_else(|| anyhow!("{name} has no recorded paths"))?;

    if used == &requested {
        println!("{path}");
    } else {
        println!("{path}\t(from {used})");
    }
    Ok(())
}

fn load(lookup_file: &Path) -> anyhow::Result<Concordance> {
    JsonReader::new()
        .read_file(lookup_file)
        .with_context(|| format!("reading concordance {}", lookup_file.display()))
}
