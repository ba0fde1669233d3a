//! Schema walker
//!
//! Turns one parsed document into the [`SchemaElement`]s reachable from its
//! top-level element declarations: every leaf plus every repeating container.

use crate::inheritance::ContentExpander;
use crate::loader::SchemaLoader;
use crate::model::{ComplexTypeDef, ContentModel, ElementDecl, ElementPattern, SchemaDocument};
use crate::registry::TypeRegistry;
use concordance_ir::{Occurs, SchemaElement, SchemaVersion, StructuralPath};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, trace, warn};

/// Maximum element nesting depth below a top-level declaration
pub const MAX_DEPTH: usize = 30;

/// Type recorded for a repeating container element
pub const GROUP_TYPE: &str = "(group)";

/// Walks documents of one version against that version's registry
pub struct SchemaWalker<'a> {
    registry: &'a TypeRegistry,
    version: SchemaVersion,
    max_depth: usize,
}

/// An element declaration with any `ref=` indirection resolved
struct ResolvedDecl<'x> {
    name: &'x str,
    type_ref: Option<&'x str>,
    inline: Option<&'x ComplexTypeDef>,
    occurs: Occurs,
    documentation: Option<&'x str>,
}

/// Where a declaration sits in the document being walked
struct Position<'p> {
    path: StructuralPath,
    /// Nearest enclosing element that repeats
    repeating_ancestor: Option<&'p str>,
    depth: usize,
}

/// A named type or referenced global element being expanded on the current
/// ancestor chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expansion<'x> {
    Type(&'x str),
    Element(&'x str),
}

enum Shape<'x> {
    Leaf(String),
    Branch(Vec<&'x ElementDecl>),
}

impl<'a> SchemaWalker<'a> {
    pub fn new(registry: &'a TypeRegistry, version: SchemaVersion) -> Self {
        Self {
            registry,
            version,
            max_depth: MAX_DEPTH,
        }
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn version(&self) -> &SchemaVersion {
        &self.version
    }

    /// Load and walk a file. A document that cannot be read or parsed
    /// yields no elements.
    pub fn walk_file(&self, loader: &SchemaLoader, path: &Path) -> Vec<SchemaElement> {
        match loader.load_file(path) {
            Ok(document) => self.walk_document(&document),
            Err(e) => {
                warn!("Could not parse {:?}: {}", path, e);
                Vec::new()
            }
        }
    }

    /// Every leaf and repeating container reachable from the document's
    /// top-level elements
    pub fn walk_document(&self, document: &SchemaDocument) -> Vec<SchemaElement> {
        let schedule = schedule_name(document);
        let mut out = Vec::new();

        for decl in &document.top_level_elements {
            let Some(name) = decl.effective_name() else {
                continue;
            };
            let path = if name == schedule {
                StructuralPath::root(schedule.as_str())
            } else {
                StructuralPath::root(schedule.as_str()).child(name)
            };
            let position = Position {
                path,
                repeating_ancestor: None,
                depth: 0,
            };
            let mut chain = vec![Expansion::Element(name)];
            self.visit(decl, position, &schedule, &mut chain, &mut out);
        }

        // A global element also reached through a ref yields the same path
        let mut seen = HashSet::new();
        out.retain(|element| seen.insert(element.path.clone()));

        debug!(
            "Walked {:?} ({}): {} elements",
            document.path,
            self.version,
            out.len()
        );
        out
    }

    fn visit<'x>(
        &'x self,
        decl: &'x ElementDecl,
        position: Position<'_>,
        schedule: &str,
        chain: &mut Vec<Expansion<'x>>,
        out: &mut Vec<SchemaElement>,
    ) {
        if position.depth > self.max_depth {
            trace!("Depth limit reached at {}", position.path);
            return;
        }
        let Some(resolved) = self.resolve(decl) else {
            return;
        };

        let expansions = self.expansions(decl, &resolved);
        if expansions.iter().any(|e| chain.contains(e)) {
            trace!("Recursive type at {}; branch ends", position.path);
            return;
        }

        let repeats = resolved.occurs.permits_many();
        let is_repeating = repeats || position.repeating_ancestor.is_some();

        match self.shape(&resolved) {
            Shape::Leaf(xsd_type) => {
                trace!("Leaf {} ({})", position.path, xsd_type);
                let mut element =
                    SchemaElement::new(position.path, schedule, self.version.clone())
                        .with_type(xsd_type)
                        .with_documentation(resolved.documentation.map(str::to_string))
                        .with_occurs(resolved.occurs);
                if is_repeating {
                    element = element.repeating(position.repeating_ancestor.map(str::to_string));
                }
                out.push(element);
            }
            Shape::Branch(children) => {
                let child_ancestor = if repeats {
                    trace!("Repeating container {}", position.path);
                    out.push(
                        SchemaElement::new(position.path.clone(), schedule, self.version.clone())
                            .with_type(GROUP_TYPE)
                            .with_documentation(resolved.documentation.map(str::to_string))
                            .with_occurs(resolved.occurs)
                            .repeating(position.repeating_ancestor.map(str::to_string)),
                    );
                    Some(resolved.name)
                } else {
                    position.repeating_ancestor
                };

                let pushed = expansions.len();
                chain.extend(expansions);
                for child in children {
                    let Some(child_name) = child.effective_name() else {
                        continue;
                    };
                    let child_position = Position {
                        path: position.path.child(child_name),
                        repeating_ancestor: child_ancestor,
                        depth: position.depth + 1,
                    };
                    self.visit(child, child_position, schedule, chain, out);
                }
                chain.truncate(chain.len() - pushed);
            }
        }
    }

    /// Named types and global elements a declaration expands through
    fn expansions<'x>(
        &'x self,
        decl: &'x ElementDecl,
        resolved: &ResolvedDecl<'x>,
    ) -> Vec<Expansion<'x>> {
        let mut expansions = Vec::new();
        if let Some(reference) = decl.reference.as_deref() {
            expansions.push(Expansion::Element(reference));
        }
        if let Some(type_name) = resolved.type_ref {
            if self.registry.complex_type(type_name).is_some() {
                expansions.push(Expansion::Type(type_name));
            }
        }
        expansions
    }

    fn resolve<'x>(&'x self, decl: &'x ElementDecl) -> Option<ResolvedDecl<'x>> {
        if let Some(name) = decl.name.as_deref() {
            return Some(ResolvedDecl {
                name,
                type_ref: decl.type_ref.as_deref(),
                inline: decl.inline.as_deref(),
                occurs: decl.occurs,
                documentation: decl.documentation.as_deref(),
            });
        }

        let reference = decl.reference.as_deref()?;
        let registry: &'x TypeRegistry = self.registry;
        let target = registry.element(reference);
        Some(ResolvedDecl {
            name: reference,
            type_ref: target.and_then(|t| t.type_ref.as_deref()),
            inline: target.and_then(|t| t.inline.as_deref()),
            occurs: decl.occurs,
            documentation: decl
                .documentation
                .as_deref()
                .or_else(|| target.and_then(|t| t.documentation.as_deref())),
        })
    }

    fn shape<'x>(&'x self, decl: &ResolvedDecl<'x>) -> Shape<'x> {
        let registry: &'x TypeRegistry = self.registry;
        let declared = decl.type_ref.unwrap_or_default().to_string();

        if let Some(inline) = decl.inline {
            if let ContentModel::SimpleContent { base } = &inline.content {
                return Shape::Leaf(base.clone().unwrap_or(declared));
            }
            let children = ContentExpander::new(registry).expand(&inline.content);
            let fallback = decl
                .type_ref
                .or_else(|| inline.content.derivation_base())
                .unwrap_or_default()
                .to_string();
            return branch_or_leaf(children, fallback);
        }

        if let Some(type_name) = decl.type_ref {
            if let Some(definition) = registry.complex_type(type_name) {
                if let ContentModel::SimpleContent { base } = &definition.content {
                    return Shape::Leaf(base.clone().unwrap_or(declared));
                }
                let children = ContentExpander::new(registry).expand_type(type_name);
                return branch_or_leaf(children, declared);
            }
        }

        Shape::Leaf(declared)
    }
}

fn branch_or_leaf<'x>(children: Vec<&'x ElementDecl>, xsd_type: String) -> Shape<'x> {
    if children.is_empty() {
        Shape::Leaf(xsd_type)
    } else {
        Shape::Branch(children)
    }
}

/// Schedule identifier for a document: its first top-level element name,
/// else the file stem
pub fn schedule_name(document: &SchemaDocument) -> String {
    if let Some(name) = document.first_element_name() {
        return name.to_string();
    }
    document
        .path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Structural pattern of a declaration
pub fn element_pattern(decl: &ElementDecl) -> ElementPattern {
    ElementPattern::of(decl)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(xsd: &str) -> Vec<SchemaElement> {
        let document = SchemaLoader::new().parse_str(xsd).unwrap();
        let mut registry = TypeRegistry::new();
        registry.register_document(&document);
        SchemaWalker::new(&registry, SchemaVersion::new("2016v3.0")).walk_document(&document)
    }

    fn paths(elements: &[SchemaElement]) -> Vec<String> {
        elements.iter().map(|e| e.path.to_string()).collect()
    }

    fn schema(body: &str) -> String {
        format!(r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">{body}</xs:schema>"#)
    }

    #[test]
    fn test_schedule_root_and_simple_leaves() {
        let elements = walk(&schema(
            r#"<xs:element name="IRS990">
                 <xs:complexType><xs:sequence>
                   <xs:element name="EIN" type="efile:EINType">
                     <xs:annotation><xs:documentation>Employer ID</xs:documentation></xs:annotation>
                   </xs:element>
                   <xs:element name="TotalRevenueAmt" type="USAmountType"/>
                 </xs:sequence></xs:complexType>
               </xs:element>"#,
        ));
        assert_eq!(paths(&elements), vec!["/IRS990/EIN", "/IRS990/TotalRevenueAmt"]);
        assert_eq!(elements[0].xsd_type, "EINType");
        assert_eq!(elements[0].documentation.as_deref(), Some("Employer ID"));
        assert_eq!(elements[0].schedule, "IRS990");
        assert_eq!(elements[0].version.as_str(), "2016v3.0");
        assert!(!elements[0].is_repeating);
    }

    #[test]
    fn test_other_top_level_elements_nest_under_schedule() {
        let elements = walk(&schema(
            r#"<xs:element name="IRS990ScheduleA" type="xs:string"/>
               <xs:element name="Extra" type="xs:string"/>"#,
        ));
        assert_eq!(
            paths(&elements),
            vec!["/IRS990ScheduleA", "/IRS990ScheduleA/Extra"]
        );
    }

    #[test]
    fn test_named_type_and_extension_chain() {
        let elements = walk(&schema(
            r#"<xs:complexType name="BaseType"><xs:sequence>
                 <xs:element name="Name" type="xs:string"/>
               </xs:sequence></xs:complexType>
               <xs:complexType name="MidType"><xs:complexContent>
                 <xs:extension base="BaseType"><xs:sequence>
                   <xs:element name="Title" type="xs:string"/>
                 </xs:sequence></xs:extension>
               </xs:complexContent></xs:complexType>
               <xs:element name="F">
                 <xs:complexType><xs:sequence>
                   <xs:element name="Person">
                     <xs:complexType><xs:complexContent>
                       <xs:extension base="MidType"><xs:sequence>
                         <xs:element name="Hours" type="xs:decimal"/>
                       </xs:sequence></xs:extension>
                     </xs:complexContent></xs:complexType>
                   </xs:element>
                   <xs:element name="Other" type="MidType"/>
                 </xs:sequence></xs:complexType>
               </xs:element>"#,
        ));
        assert_eq!(
            paths(&elements),
            vec![
                "/F/Person/Name",
                "/F/Person/Title",
                "/F/Person/Hours",
                "/F/Other/Name",
                "/F/Other/Title",
            ]
        );
    }

    #[test]
    fn test_simple_content_types_are_leaves() {
        let elements = walk(&schema(
            r#"<xs:complexType name="AmtWithAttr"><xs:simpleContent>
                 <xs:extension base="USAmountType"/>
               </xs:simpleContent></xs:complexType>
               <xs:element name="F"><xs:complexType><xs:sequence>
                 <xs:element name="Named" type="AmtWithAttr"/>
                 <xs:element name="Inline"><xs:complexType><xs:simpleContent>
                   <xs:restriction base="StringType"/>
                 </xs:simpleContent></xs:complexType></xs:element>
               </xs:sequence></xs:complexType></xs:element>"#,
        ));
        assert_eq!(paths(&elements), vec!["/F/Named", "/F/Inline"]);
        assert_eq!(elements[0].xsd_type, "USAmountType");
        assert_eq!(elements[1].xsd_type, "StringType");
    }

    #[test]
    fn test_repeating_group_three_levels_deep() {
        let elements = walk(&schema(
            r#"<xs:element name="IRS990"><xs:complexType><xs:sequence>
                 <xs:element name="Flag" type="BooleanType"/>
                 <xs:element name="OfficerGrp" minOccurs="0" maxOccurs="unbounded">
                   <xs:complexType><xs:sequence>
                     <xs:element name="Name" type="xs:string"/>
                     <xs:element name="Address"><xs:complexType><xs:sequence>
                       <xs:element name="Detail"><xs:complexType><xs:sequence>
                         <xs:element name="CityNm" type="xs:string"/>
                       </xs:sequence></xs:complexType></xs:element>
                     </xs:sequence></xs:complexType></xs:element>
                   </xs:sequence></xs:complexType>
                 </xs:element>
               </xs:sequence></xs:complexType></xs:element>"#,
        ));
        let city = elements
            .iter()
            .find(|e| e.name == "CityNm")
            .unwrap();
        assert_eq!(city.path.to_string(), "/IRS990/OfficerGrp/Address/Detail/CityNm");
        assert!(city.is_repeating);
        assert_eq!(city.group.as_deref(), Some("OfficerGrp"));

        let flag = elements.iter().find(|e| e.name == "Flag").unwrap();
        assert!(!flag.is_repeating);
        assert_eq!(flag.group, None);
    }

    #[test]
    fn test_repeating_containers_are_recorded() {
        let elements = walk(&schema(
            r#"<xs:complexType name="DetailType"><xs:sequence>
                 <xs:element name="Amt" type="USAmountType"/>
               </xs:sequence></xs:complexType>
               <xs:element name="IRS990"><xs:complexType><xs:sequence>
                 <xs:element name="OfficerGrp" maxOccurs="unbounded">
                   <xs:annotation><xs:documentation>Officers</xs:documentation></xs:annotation>
                   <xs:complexType><xs:sequence>
                     <xs:element name="PersonNm" type="xs:string"/>
                     <xs:element name="DetailGrp" type="DetailType" maxOccurs="5"/>
                   </xs:sequence></xs:complexType>
                 </xs:element>
                 <xs:element name="Single"><xs:complexType><xs:sequence>
                   <xs:element name="Txt" type="xs:string"/>
                 </xs:sequence></xs:complexType></xs:element>
               </xs:sequence></xs:complexType></xs:element>"#,
        ));
        assert_eq!(
            paths(&elements),
            vec![
                "/IRS990/OfficerGrp",
                "/IRS990/OfficerGrp/PersonNm",
                "/IRS990/OfficerGrp/DetailGrp",
                "/IRS990/OfficerGrp/DetailGrp/Amt",
                "/IRS990/Single/Txt",
            ]
        );

        let officer = &elements[0];
        assert_eq!(officer.xsd_type, GROUP_TYPE);
        assert!(officer.is_repeating);
        assert_eq!(officer.group, None);
        assert_eq!(officer.documentation.as_deref(), Some("Officers"));

        let detail = &elements[2];
        assert_eq!(detail.xsd_type, GROUP_TYPE);
        assert_eq!(detail.group.as_deref(), Some("OfficerGrp"));
        assert_eq!(elements[3].group.as_deref(), Some("DetailGrp"));
    }

    #[test]
    fn test_repeating_leaf_has_no_group_of_its_own() {
        let elements = walk(&schema(
            r#"<xs:element name="F"><xs:complexType><xs:sequence>
                 <xs:element name="Desc" type="xs:string" maxOccurs="3"/>
               </xs:sequence></xs:complexType></xs:element>"#,
        ));
        assert!(elements[0].is_repeating);
        assert_eq!(elements[0].group, None);
    }

    #[test]
    fn test_group_refs_and_element_refs() {
        let elements = walk(&schema(
            r#"<xs:group name="AddressGroup"><xs:sequence>
                 <xs:element name="Street" type="xs:string"/>
               </xs:sequence></xs:group>
               <xs:element name="F"><xs:complexType><xs:sequence>
                 <xs:group ref="AddressGroup"/>
                 <xs:element ref="Shared"/>
               </xs:sequence></xs:complexType></xs:element>
               <xs:element name="Shared" type="CheckboxType">
                 <xs:annotation><xs:documentation>Shared box</xs:documentation></xs:annotation>
               </xs:element>"#,
        ));
        let street = elements.iter().find(|e| e.name == "Street").unwrap();
        assert_eq!(street.path.to_string(), "/F/Street");
        let shared = elements
            .iter()
            .find(|e| e.path.to_string() == "/F/Shared")
            .unwrap();
        assert_eq!(shared.xsd_type, "CheckboxType");
        assert_eq!(shared.documentation.as_deref(), Some("Shared box"));
    }

    #[test]
    fn test_empty_branch_becomes_leaf() {
        let elements = walk(&schema(
            r#"<xs:complexType name="EmptyType"><xs:sequence/></xs:complexType>
               <xs:element name="F"><xs:complexType><xs:sequence>
                 <xs:element name="Marker" type="EmptyType"/>
                 <xs:element name="Unresolved" type="UnknownType"/>
               </xs:sequence></xs:complexType></xs:element>"#,
        ));
        assert_eq!(paths(&elements), vec!["/F/Marker", "/F/Unresolved"]);
        assert_eq!(elements[0].xsd_type, "EmptyType");
    }

    #[test]
    fn test_nesting_stops_at_depth_limit() {
        let document = SchemaLoader::new()
            .parse_str(&schema(
                r#"<xs:element name="F"><xs:complexType><xs:sequence>
                     <xs:element name="A"><xs:complexType><xs:sequence>
                       <xs:element name="B"><xs:complexType><xs:sequence>
                         <xs:element name="C"><xs:complexType><xs:sequence>
                           <xs:element name="Value" type="xs:string"/>
                         </xs:sequence></xs:complexType></xs:element>
                       </xs:sequence></xs:complexType></xs:element>
                       <xs:element name="Shallow" type="xs:string"/>
                     </xs:sequence></xs:complexType></xs:element>
                   </xs:sequence></xs:complexType></xs:element>"#,
            ))
            .unwrap();
        let mut registry = TypeRegistry::new();
        registry.register_document(&document);
        let elements = SchemaWalker::new(&registry, SchemaVersion::new("2016v3.0"))
            .with_max_depth(2)
            .walk_document(&document);
        assert_eq!(paths(&elements), vec!["/F/A/Shallow"]);
    }

    #[test]
    fn test_self_recursive_type_ends_branch() {
        let elements = walk(&schema(
            r#"<xs:complexType name="NodeType"><xs:sequence>
                 <xs:element name="Value" type="xs:string"/>
                 <xs:element name="Left" type="NodeType" minOccurs="0"/>
                 <xs:element name="Right" type="NodeType" minOccurs="0"/>
               </xs:sequence></xs:complexType>
               <xs:element name="F"><xs:complexType><xs:sequence>
                 <xs:element name="Tree" type="NodeType"/>
                 <xs:element name="Other" type="NodeType"/>
               </xs:sequence></xs:complexType></xs:element>"#,
        ));
        assert_eq!(paths(&elements), vec!["/F/Tree/Value", "/F/Other/Value"]);
    }

    #[test]
    fn test_recursive_element_ref_ends_branch() {
        let elements = walk(&schema(
            r#"<xs:element name="F"><xs:complexType><xs:sequence>
                 <xs:element ref="Part"/>
               </xs:sequence></xs:complexType></xs:element>
               <xs:element name="Part"><xs:complexType><xs:sequence>
                 <xs:element name="Id" type="xs:string"/>
                 <xs:element ref="Part" minOccurs="0"/>
                 <xs:element ref="Part" minOccurs="0"/>
               </xs:sequence></xs:complexType></xs:element>"#,
        ));
        assert_eq!(paths(&elements), vec!["/F/Part/Id"]);
    }

    #[test]
    fn test_schedule_falls_back_to_file_stem() {
        let document = SchemaDocument {
            path: "/schemas/2016v3.0/IRS990ScheduleB.xsd".into(),
            ..SchemaDocument::default()
        };
        assert_eq!(schedule_name(&document), "IRS990ScheduleB");
    }

    #[test]
    fn test_walk_file_unparseable_returns_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("Broken.xsd");
        std::fs::write(&path, "<not-xml").unwrap();
        let registry = TypeRegistry::new();
        let walker = SchemaWalker::new(&registry, SchemaVersion::new("2016v3.0"));
        assert!(walker.walk_file(&SchemaLoader::new(), &path).is_empty());
    }
}
