//! Integration tests: walk schema text for several versions and build

use std::collections::HashSet;

use concordance_ir::{SchemaElement, SchemaVersion};
use concordance_matching::{ConcordanceBuilder, MatchKind};
use concordance_schema::{SchemaLoader, SchemaWalker, TypeRegistry};

fn walk(version: &str, body: &str) -> anyhow::Result<Vec<SchemaElement>> {
    let text = format!(
        r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">{body}</xsd:schema>"#
    );
    let document = SchemaLoader::new().parse_str(&text)?;
    let mut registry = TypeRegistry::new();
    registry.register_document(&document);
    Ok(SchemaWalker::new(&registry, SchemaVersion::new(version)).walk_document(&document))
}

fn form_990(revenue_element: &str, extra: &str) -> String {
    format!(
        r#"<xsd:element name="IRS990"><xsd:complexType><xsd:sequence>
             <xsd:element name="EIN" type="EINType"/>
             <xsd:element name="{revenue_element}" type="USAmountType">
               <xsd:annotation><xsd:documentation>Total revenue</xsd:documentation></xsd:annotation>
             </xsd:element>
             {extra}
           </xsd:sequence></xsd:complexType></xsd:element>"#
    )
}

fn form_990ez() -> String {
    r#"<xsd:element name="IRS990EZ"><xsd:complexType><xsd:sequence>
         <xsd:element name="EIN" type="EINType"/>
       </xsd:sequence></xsd:complexType></xsd:element>"#
        .to_string()
}

#[test]
fn test_multi_version_build() -> anyhow::Result<()> {
    let mut builder = ConcordanceBuilder::new();
    for (version, revenue) in [
        ("2016v3.0", "TotalRevenueAmt2"),
        ("2013v3.0", "TotalRevenueAmt"),
        ("2015v2.1", "TotalRevenueAmt"),
    ] {
        let mut elements = walk(version, &form_990(revenue, ""))?;
        elements.extend(walk(version, &form_990ez())?);
        builder.add_version(SchemaVersion::new(version), elements);
    }

    let output = builder.build()?;
    let concordance = &output.concordance;

    let versions: Vec<&str> = concordance.versions().iter().map(SchemaVersion::as_str).collect();
    assert_eq!(versions, vec!["2013v3.0", "2015v2.1", "2016v3.0"]);

    let revenue = concordance.get("IRS990_TotalRevenueAmt2").unwrap();
    assert_eq!(revenue.versions_present().len(), 3);
    assert_eq!(revenue.earliest_version().unwrap().as_str(), "2013v3.0");
    assert!(revenue.path_changed());
    assert_eq!(revenue.data_type, "Dollar amount (USD)");

    assert!(concordance.get("IRS990_EIN").is_some());
    assert!(concordance.get("IRS990EZ_EIN").is_some());
    assert_eq!(concordance.len(), 3);
    assert_eq!(output.report.events_of(MatchKind::Description).count(), 1);
    Ok(())
}

#[test]
fn test_invariants_hold_on_built_concordance() -> anyhow::Result<()> {
    let mut builder = ConcordanceBuilder::new();
    let repeating = r#"<xsd:element name="OfficerGrp" maxOccurs="unbounded">
        <xsd:complexType><xsd:sequence>
          <xsd:element name="PersonNm" type="PersonNameType"/>
          <xsd:element name="TitleTxt" type="StringType"/>
        </xsd:sequence></xsd:complexType></xsd:element>"#;
    builder.add_version(
        SchemaVersion::new("2013v3.0"),
        walk("2013v3.0", &form_990("TotalRevenueAmt", repeating))?,
    );
    builder.add_version(
        SchemaVersion::new("2014v5.0"),
        walk("2014v5.0", &form_990("TotalRevenueAmt", ""))?,
    );

    let output = builder.build()?;
    let concordance = &output.concordance;

    let names: HashSet<&str> = concordance
        .fields()
        .iter()
        .map(|f| f.canonical_name.as_str())
        .collect();
    assert_eq!(names.len(), concordance.len());

    for field in concordance.fields() {
        let keys: Vec<&SchemaVersion> = field.paths().keys().collect();
        assert_eq!(field.versions_present(), keys);
    }

    for (path, name) in concordance.xpath_index() {
        let owner = concordance.get(name).unwrap();
        assert!(owner.paths().values().any(|p| p.to_string() == *path));
    }

    let person = concordance.get("IRS990_OfficerGrp_PersonNm").unwrap();
    assert!(person.is_repeating);
    assert_eq!(person.group.as_deref(), Some("OfficerGrp"));
    assert_eq!(person.label, "Person Name");

    let officers = concordance.get("IRS990_OfficerGrp").unwrap();
    assert_eq!(officers.raw_type, "(group)");
    assert!(officers.is_repeating);
    assert_eq!(officers.group, None);
    assert_eq!(
        concordance.lookup_path(&"/IRS990/OfficerGrp".parse()?).map(|f| f.canonical_name.as_str()),
        Some("IRS990_OfficerGrp")
    );
    Ok(())
}
