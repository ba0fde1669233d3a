//! Field reference writer

use crate::titles::schedule_title;
use crate::Result;
use concordance_ir::{CanonicalField, Concordance, SchemaVersion};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name used when writing into an output directory
pub const FILE_NAME: &str = "field_reference.md";

/// Field reference options
#[derive(Debug, Clone)]
pub struct MarkdownConfig {
    /// Document heading
    pub title: String,
    /// Emit the explanatory list under the heading
    pub include_intro: bool,
    /// Name of the per-version export mentioned in path-change notes
    pub companion_file: String,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            title: "IRS Form 990 Field Reference".to_string(),
            include_intro: true,
            companion_file: "concordance.csv".to_string(),
        }
    }
}

impl MarkdownConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_intro(mut self, include: bool) -> Self {
        self.include_intro = include;
        self
    }

    #[must_use]
    pub fn with_companion_file(mut self, file_name: impl Into<String>) -> Self {
        self.companion_file = file_name.into();
        self
    }
}

/// Renders a concordance as a Markdown reference
#[derive(Debug, Clone, Default)]
pub struct MarkdownWriter {
    config: MarkdownConfig,
}

impl MarkdownWriter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(mut self, config: MarkdownConfig) -> Self {
        self.config = config;
        self
    }

    /// Render the full document
    pub fn render(&self, concordance: &Concordance) -> Result<String> {
        let mut out = String::new();
        self.write_header(&mut out)?;

        for schedule in concordance.schedules() {
            writeln!(out, "## {}\n", schedule_title(schedule))?;

            let fields = concordance.schedule_fields(schedule);
            let ungrouped: Vec<&CanonicalField> =
                fields.iter().filter(|f| f.group.is_none()).collect();
            let mut grouped: BTreeMap<&str, Vec<&CanonicalField>> = BTreeMap::new();
            for field in fields {
                if let Some(group) = field.group.as_deref() {
                    grouped.entry(group).or_default().push(field);
                }
            }

            if !ungrouped.is_empty() {
                writeln!(out, "### Non-Repeating Fields\n")?;
                for field in ungrouped {
                    self.write_field(&mut out, field)?;
                }
            }

            for (group, members) in grouped {
                writeln!(out, "### Repeating Group: `{group}`\n")?;
                writeln!(
                    out,
                    "*These fields repeat for each entry in the `{group}` group \
                     (e.g., one set per officer, per grant recipient, per related organization).*\n"
                )?;
                for field in members {
                    self.write_field(&mut out, field)?;
                }
            }

            writeln!(out, "---\n")?;
        }

        debug!(schedules = concordance.schedules().len(), "Rendered field reference");
        Ok(out)
    }

    /// Write `field_reference.md` into `dir`, returning the file path
    pub fn write_to_dir(&self, dir: &Path, concordance: &Concordance) -> Result<PathBuf> {
        let path = dir.join(FILE_NAME);
        fs::write(&path, self.render(concordance)?)?;
        Ok(path)
    }

    fn write_header(&self, out: &mut String) -> Result<()> {
        writeln!(out, "# {}\n", self.config.title)?;
        if self.config.include_intro {
            writeln!(
                out,
                "This document describes every field extracted from the IRS 990 XML schemas, \
                 organized by form and schedule. Each entry shows:\n"
            )?;
            writeln!(out, "- **What it is** (human-readable label and description)")?;
            writeln!(out, "- **Data type** (what kind of value to expect)")?;
            writeln!(out, "- **Where to find it** (xpath in the XML)")?;
            writeln!(out, "- **Which versions** include this field")?;
            writeln!(
                out,
                "- **Repeating group**, if the field appears once per entity \
                 (e.g., once per officer, once per grant)\n"
            )?;
        }
        writeln!(out, "---\n")?;
        Ok(())
    }

    fn write_field(&self, out: &mut String, field: &CanonicalField) -> Result<()> {
        writeln!(out, "#### {}\n", field.label)?;
        writeln!(out, "| Property | Value |")?;
        writeln!(out, "|----------|-------|")?;
        writeln!(out, "| **Canonical Name** | `{}` |", field.canonical_name)?;
        writeln!(out, "| **Data Type** | {} |", cell(&field.data_type))?;
        if !field.description.is_empty() {
            writeln!(out, "| **Description** | {} |", cell(&field.description))?;
        }

        let versions = field.versions_present();
        if let (Some(first), Some(last)) = (versions.first(), versions.last()) {
            let all: Vec<&str> = versions.iter().map(|v| v.as_str()).collect();
            writeln!(out, "| **First Version** | {first} |")?;
            writeln!(out, "| **Latest Version** | {last} |")?;
            writeln!(out, "| **All Versions** | {} |", all.join(", "))?;
        }
        if let Some(group) = &field.group {
            writeln!(out, "| **Repeating Group** | `{group}` |")?;
        }
        if let Some(path) = field.latest_path() {
            writeln!(out, "| **XPath** | `{path}` |")?;
        }
        if field.path_changed() {
            writeln!(
                out,
                "| **Note** | XPath changed across versions ({}); see {} for per-version xpaths |",
                changed_versions(field),
                self.config.companion_file
            )?;
        }
        writeln!(out)?;
        Ok(())
    }
}

/// Versions at which the path differs from the previous version's
fn changed_versions(field: &CanonicalField) -> String {
    let mut changes: Vec<&SchemaVersion> = Vec::new();
    let mut previous = None;
    for (version, path) in field.paths() {
        if previous.is_some_and(|p| p != path) {
            changes.push(version);
        }
        previous = Some(path);
    }
    let listed: Vec<&str> = changes.iter().map(|v| v.as_str()).collect();
    format!("changed in {}", listed.join(", "))
}

/// Table cell text: single line, pipes escaped
fn cell(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('|', "\\|")
}
