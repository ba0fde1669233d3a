//! Concordance coverage checking
//!
//! Every named element declaration in a form document is checked against a
//! finished concordance. A declaration is covered when its name is the leaf
//! of some concordance path, or when it appears as an intermediate segment
//! (a container whose children were extracted). Everything else is missing.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};

use concordance_ir::Concordance;
use concordance_schema::{ElementPattern, SchemaDocument, TypeCollector, element_pattern, schedule_name};
use tracing::{debug, info};

use crate::Result;
use crate::discovery::{discover_versions, select_version};

/// How a declaration is represented in the concordance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverageStatus {
    /// Name is the leaf of a concordance path
    Leaf,
    /// Name is an intermediate path segment
    Container,
    Missing,
}

/// A declaration found in the schemas
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageEntry {
    pub name: String,
    pub schedule: String,
    pub file: PathBuf,
    pub pattern: ElementPattern,
}

/// Outcome of a coverage check
#[derive(Debug, Clone, Default)]
pub struct CoverageReport {
    /// Distinct element names declared in form documents
    pub declared: usize,
    pub leaves: Vec<String>,
    pub containers: Vec<String>,
    pub missing: Vec<CoverageEntry>,
}

impl CoverageReport {
    pub fn covered(&self) -> usize {
        self.leaves.len() + self.containers.len()
    }

    /// Share of declarations covered, as a percentage
    pub fn coverage_percent(&self) -> f64 {
        if self.declared == 0 {
            return 0.0;
        }
        self.covered() as f64 / self.declared as f64 * 100.0
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// Missing declarations grouped by pattern, largest group first
    pub fn missing_by_pattern(&self) -> Vec<(String, Vec<&CoverageEntry>)> {
        let mut groups: BTreeMap<String, Vec<&CoverageEntry>> = BTreeMap::new();
        for entry in &self.missing {
            groups.entry(entry.pattern.to_string()).or_default().push(entry);
        }
        let mut groups: Vec<_> = groups.into_iter().collect();
        groups.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then_with(|| a.0.cmp(&b.0)));
        groups
    }

    /// Missing declarations grouped by schedule
    pub fn missing_by_schedule(&self) -> BTreeMap<&str, Vec<&CoverageEntry>> {
        let mut groups: BTreeMap<&str, Vec<&CoverageEntry>> = BTreeMap::new();
        for entry in &self.missing {
            groups.entry(entry.schedule.as_str()).or_default().push(entry);
        }
        groups
    }
}

impl fmt::Display for CoverageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Form elements in schemas:     {}", self.declared)?;
        writeln!(f, "Found as leaf fields:         {}", self.leaves.len())?;
        writeln!(f, "Covered as group containers:  {}", self.containers.len())?;
        writeln!(f, "Missing from concordance:     {}", self.missing.len())?;
        write!(f, "Coverage:                     {:.1}%", self.coverage_percent())?;

        if self.missing.is_empty() {
            return Ok(());
        }
        writeln!(f, "\n\nMissing elements by pattern:")?;
        for (pattern, entries) in self.missing_by_pattern() {
            writeln!(f, "  [{}] {}", entries.len(), pattern)?;
            let mut names: Vec<&CoverageEntry> = entries;
            names.sort_by(|a, b| a.name.cmp(&b.name));
            for entry in names.iter().take(10) {
                writeln!(f, "      {} ({})", entry.name, entry.file.display())?;
            }
            if names.len() > 10 {
                writeln!(f, "      ... and {} more", names.len() - 10)?;
            }
        }
        write!(f, "\nMissing elements by schedule:")?;
        for (schedule, entries) in self.missing_by_schedule() {
            write!(f, "\n  {}: {} missing", schedule, entries.len())?;
        }
        Ok(())
    }
}

/// Compares declarations against a concordance
#[derive(Debug)]
pub struct CoverageChecker<'a> {
    leaves: HashSet<&'a str>,
    segments: HashSet<&'a str>,
    seen: HashSet<String>,
    report: CoverageReport,
}

impl<'a> CoverageChecker<'a> {
    pub fn new(concordance: &'a Concordance) -> Self {
        let mut leaves = HashSet::new();
        let mut segments = HashSet::new();
        for field in concordance.fields() {
            for path in field.paths().values() {
                if let Some(leaf) = path.leaf() {
                    leaves.insert(leaf);
                }
                segments.extend(path.segments().iter().map(String::as_str));
            }
        }
        Self {
            leaves,
            segments,
            seen: HashSet::new(),
            report: CoverageReport::default(),
        }
    }

    pub fn status(&self, name: &str) -> CoverageStatus {
        if self.leaves.contains(name) {
            CoverageStatus::Leaf
        } else if self.segments.contains(name) {
            CoverageStatus::Container
        } else {
            CoverageStatus::Missing
        }
    }

    /// Check every named declaration of a form document. Documents without a
    /// top-level element are type libraries and are ignored. A name already
    /// seen in an earlier document is not counted again.
    pub fn add_document(&mut self, document: &SchemaDocument) {
        if !document.has_top_level_element() {
            return;
        }
        let schedule = schedule_name(document);
        for decl in document.element_declarations() {
            let Some(name) = decl.name.as_deref() else {
                continue;
            };
            if !self.seen.insert(name.to_string()) {
                continue;
            }
            self.report.declared += 1;
            match self.status(name) {
                CoverageStatus::Leaf => self.report.leaves.push(name.to_string()),
                CoverageStatus::Container => self.report.containers.push(name.to_string()),
                CoverageStatus::Missing => self.report.missing.push(CoverageEntry {
                    name: name.to_string(),
                    schedule: schedule.clone(),
                    file: document.path.clone(),
                    pattern: element_pattern(decl),
                }),
            }
        }
    }

    pub fn finish(self) -> CoverageReport {
        self.report
    }
}

/// Check `concordance` against the schemas under `schema_dir`, for one
/// version or for all of them
pub fn check_coverage(
    schema_dir: &Path,
    version: Option<&str>,
    concordance: &Concordance,
) -> Result<CoverageReport> {
    let mut sources = discover_versions(schema_dir)?;
    if let Some(name) = version {
        sources = select_version(sources, name)?;
    }

    let mut checker = CoverageChecker::new(concordance);
    for source in &sources {
        let mut collector = TypeCollector::new();
        collector.collect_directory(&source.root)?;
        debug!(
            "Checking {} documents of {}",
            collector.documents().len(),
            source.version
        );
        for document in collector.documents() {
            checker.add_document(document);
        }
    }

    let report = checker.finish();
    info!(
        "Coverage {:.1}% ({} of {} declarations)",
        report.coverage_percent(),
        report.covered(),
        report.declared
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use concordance_ir::{CanonicalField, RunMetadata, SchemaVersion};
    use concordance_schema::SchemaLoader;

    fn concordance(paths: &[&str]) -> Concordance {
        let fields = paths
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let mut field = CanonicalField::new(format!("F{i}"), "IRS990");
                field.insert_path(SchemaVersion::new("2016v3.0"), p.parse().unwrap());
                field
            })
            .collect();
        Concordance::new(RunMetadata::new("test", ""), vec![SchemaVersion::new("2016v3.0")], fields)
            .unwrap()
    }

    fn document(body: &str) -> SchemaDocument {
        let text = format!(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">{body}</xs:schema>"#
        );
        SchemaLoader::new().parse_str(&text).unwrap()
    }

    #[test]
    fn test_classifies_leaf_container_and_missing() {
        let concordance = concordance(&["/IRS990/OfficerGrp/PersonNm"]);
        let doc = document(
            r#"<xs:element name="IRS990"><xs:complexType><xs:sequence>
                 <xs:element name="OfficerGrp"><xs:complexType><xs:sequence>
                   <xs:element name="PersonNm" type="xs:string"/>
                 </xs:sequence></xs:complexType></xs:element>
                 <xs:element name="LostAmt">
                   <xs:complexType><xs:simpleContent>
                     <xs:extension base="USAmountType"/>
                   </xs:simpleContent></xs:complexType>
                 </xs:element>
               </xs:sequence></xs:complexType></xs:element>"#,
        );

        let mut checker = CoverageChecker::new(&concordance);
        checker.add_document(&doc);
        let report = checker.finish();

        assert_eq!(report.declared, 4);
        assert_eq!(report.leaves, vec!["PersonNm"]);
        assert_eq!(report.containers, vec!["IRS990", "OfficerGrp"]);
        assert_eq!(report.missing.len(), 1);
        assert_eq!(report.missing[0].name, "LostAmt");
        assert_eq!(report.missing[0].schedule, "IRS990");
        assert_eq!(report.missing[0].pattern.to_string(), "simpleContent[base=USAmountType]");
        assert!((report.coverage_percent() - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_type_libraries_and_repeated_names_ignored() {
        let concordance = concordance(&["/IRS990/EIN"]);
        let library = document(
            r#"<xs:complexType name="AddressType"><xs:sequence>
                 <xs:element name="CityNm" type="xs:string"/>
               </xs:sequence></xs:complexType>"#,
        );
        let form = document(
            r#"<xs:element name="IRS990"><xs:complexType><xs:sequence>
                 <xs:element name="EIN" type="EINType"/>
               </xs:sequence></xs:complexType></xs:element>"#,
        );

        let mut checker = CoverageChecker::new(&concordance);
        checker.add_document(&library);
        checker.add_document(&form);
        checker.add_document(&form);
        let report = checker.finish();

        assert_eq!(report.declared, 2);
        assert!(report.is_complete());
    }

    #[test]
    fn test_missing_grouping() {
        let entry = |name: &str, schedule: &str, pattern: ElementPattern| CoverageEntry {
            name: name.to_string(),
            schedule: schedule.to_string(),
            file: PathBuf::from("IRS990.xsd"),
            pattern,
        };
        let report = CoverageReport {
            declared: 3,
            missing: vec![
                entry("A", "IRS990", ElementPattern::Untyped),
                entry("B", "IRS990EZ", ElementPattern::SimpleTyped),
                entry("C", "IRS990", ElementPattern::SimpleTyped),
            ],
            ..CoverageReport::default()
        };

        let by_pattern = report.missing_by_pattern();
        assert_eq!(by_pattern[0].0, "simple_typed");
        assert_eq!(by_pattern[0].1.len(), 2);

        let by_schedule = report.missing_by_schedule();
        assert_eq!(by_schedule["IRS990"].len(), 2);
        assert!(report.to_string().contains("IRS990EZ: 1 missing"));
    }
}
