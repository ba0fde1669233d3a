//! Schema version discovery
//!
//! Two layouts are recognized. The nested layout has one subdirectory per
//! version, each holding any number of `.xsd` documents at any depth:
//!
//! ```text
//! schemas/
//!   2016v3.0/Common/efileTypes.xsd
//!   2016v3.0/TEGE/TEGE990/IRS990/IRS990.xsd
//!   2017v2.2/...
//! ```
//!
//! When no subdirectory holds schemas, every `.xsd` file below the root is
//! treated as a single version named [`UNKNOWN_VERSION`].

use crate::{Error, Result};
use concordance_ir::SchemaVersion;
use concordance_schema::discover_xsd_files;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Version name used for a flat schema directory
pub const UNKNOWN_VERSION: &str = "unknown";

/// One version's schema documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSource {
    pub version: SchemaVersion,
    /// Directory types and groups are collected from
    pub root: PathBuf,
    /// Every `.xsd` file under `root`, sorted
    pub files: Vec<PathBuf>,
}

/// Find the versions under `schema_dir`, in chronological order
pub fn discover_versions(schema_dir: &Path) -> Result<Vec<VersionSource>> {
    if !schema_dir.is_dir() {
        return Err(Error::SchemaDirNotFound(schema_dir.display().to_string()));
    }

    let mut subdirs = Vec::new();
    for entry in std::fs::read_dir(schema_dir)
        .map_err(|e| Error::io("read_dir", schema_dir.display().to_string(), e.to_string()))?
    {
        let path = entry?.path();
        if path.is_dir() {
            subdirs.push(path);
        }
    }
    subdirs.sort();

    let mut sources = Vec::new();
    for dir in subdirs {
        let files = discover_xsd_files(&dir)?;
        if files.is_empty() {
            debug!("No schema documents under {:?}", dir);
            continue;
        }
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        sources.push(VersionSource {
            version: SchemaVersion::new(name),
            root: dir,
            files,
        });
    }

    if sources.is_empty() {
        let files = discover_xsd_files(schema_dir)?;
        if files.is_empty() {
            return Err(Error::NoSchemas(schema_dir.display().to_string()));
        }
        debug!("Flat schema layout under {:?}", schema_dir);
        sources.push(VersionSource {
            version: SchemaVersion::new(UNKNOWN_VERSION),
            root: schema_dir.to_path_buf(),
            files,
        });
    }

    sources.sort_by(|a, b| a.version.cmp(&b.version));
    for source in &sources {
        info!("{}: {} .xsd files", source.version, source.files.len());
    }
    Ok(sources)
}

/// Keep only the version named `name`
pub fn select_version(sources: Vec<VersionSource>, name: &str) -> Result<Vec<VersionSource>> {
    let available: Vec<String> = sources.iter().map(|s| s.version.to_string()).collect();
    let selected: Vec<VersionSource> = sources
        .into_iter()
        .filter(|s| s.version.as_str() == name)
        .collect();
    if selected.is_empty() {
        return Err(Error::VersionNotFound {
            version: name.to_string(),
            available: available.join(", "),
        });
    }
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const EMPTY_SCHEMA: &str = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"/>"#;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, EMPTY_SCHEMA).unwrap();
    }

    #[test]
    fn test_nested_layout_sorted_chronologically() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("2016v3.0/TEGE/IRS990.xsd"));
        touch(&dir.path().join("2013v3.0/IRS990.xsd"));
        touch(&dir.path().join("2013v3.0/Common/efileTypes.xsd"));
        fs::create_dir_all(dir.path().join("notes")).unwrap();

        let sources = discover_versions(dir.path()).unwrap();
        let versions: Vec<&str> = sources.iter().map(|s| s.version.as_str()).collect();
        assert_eq!(versions, vec!["2013v3.0", "2016v3.0"]);
        assert_eq!(sources[0].files.len(), 2);
        assert!(sources[0].files.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_flat_layout_is_unknown_version() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("IRS990.xsd"));
        touch(&dir.path().join("efileTypes.xsd"));

        let sources = discover_versions(dir.path()).unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].version.as_str(), UNKNOWN_VERSION);
        assert_eq!(sources[0].root, dir.path());
    }

    #[test]
    fn test_missing_and_empty_directories() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            discover_versions(&dir.path().join("absent")),
            Err(Error::SchemaDirNotFound(_))
        ));
        assert!(matches!(discover_versions(dir.path()), Err(Error::NoSchemas(_))));
    }

    #[test]
    fn test_select_version() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("2013v3.0/IRS990.xsd"));
        touch(&dir.path().join("2016v3.0/IRS990.xsd"));
        let sources = discover_versions(dir.path()).unwrap();

        let selected = select_version(sources.clone(), "2016v3.0").unwrap();
        assert_eq!(selected.len(), 1);

        match select_version(sources, "2020v1.0") {
            Err(Error::VersionNotFound { available, .. }) => {
                assert_eq!(available, "2013v3.0, 2016v3.0");
            }
            other => panic!("expected VersionNotFound, got {other:?}"),
        }
    }
}
