//! XML Schema document model
//!
//! An owned subset of XSD covering exactly what is needed to recover element
//! identity and hierarchy: element declarations, complex types, model groups
//! and the inclusion edges between documents.

use concordance_ir::Occurs;
use std::fmt;
use std::path::PathBuf;

/// One parsed `.xsd` document
#[derive(Debug, Clone, Default)]
pub struct SchemaDocument {
    /// Canonicalized location on disk; empty for documents parsed from text
    pub path: PathBuf,
    /// Direct `xs:element` children of `xs:schema`, in document order
    pub top_level_elements: Vec<ElementDecl>,
    /// Named complex types declared anywhere in the document
    pub complex_types: Vec<ComplexTypeDef>,
    /// Named model groups declared anywhere in the document
    pub groups: Vec<GroupDef>,
    /// `schemaLocation` values of `xs:include` and `xs:import`
    pub includes: Vec<String>,
}

impl SchemaDocument {
    /// Whether the document defines at least one top-level element
    pub fn has_top_level_element(&self) -> bool {
        self.top_level_elements.iter().any(|e| e.name.is_some())
    }

    /// Name of the first named top-level element declaration
    pub fn first_element_name(&self) -> Option<&str> {
        self.top_level_elements
            .iter()
            .find_map(|e| e.name.as_deref())
    }

    /// Every element declaration in the document, depth-first: top-level
    /// elements, then declarations nested in named types and groups.
    pub fn element_declarations(&self) -> Vec<&ElementDecl> {
        let mut out = Vec::new();
        for element in &self.top_level_elements {
            collect_decls(element, &mut out);
        }
        for ct in &self.complex_types {
            for particle in ct.content.particles() {
                collect_particle_decls(particle, &mut out);
            }
        }
        for group in &self.groups {
            for particle in &group.particles {
                collect_particle_decls(particle, &mut out);
            }
        }
        out
    }
}

fn collect_decls<'a>(element: &'a ElementDecl, out: &mut Vec<&'a ElementDecl>) {
    out.push(element);
    if let Some(inline) = &element.inline {
        for particle in inline.content.particles() {
            collect_particle_decls(particle, out);
        }
    }
}

fn collect_particle_decls<'a>(particle: &'a Particle, out: &mut Vec<&'a ElementDecl>) {
    match particle {
        Particle::Element(element) => collect_decls(element, out),
        Particle::Compositor { particles, .. } => {
            for p in particles {
                collect_particle_decls(p, out);
            }
        }
        Particle::GroupRef(_) => {}
    }
}

/// An `xs:element` declaration
#[derive(Debug, Clone, Default)]
pub struct ElementDecl {
    /// `name` attribute
    pub name: Option<String>,
    /// `ref` attribute with namespace prefix removed
    pub reference: Option<String>,
    /// `type` attribute with namespace prefix removed
    pub type_ref: Option<String>,
    pub occurs: Occurs,
    pub documentation: Option<String>,
    /// Anonymous complex type declared inline
    pub inline: Option<Box<ComplexTypeDef>>,
}

impl ElementDecl {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Declared name, falling back to the referenced name
    pub fn effective_name(&self) -> Option<&str> {
        self.name.as_deref().or(self.reference.as_deref())
    }
}

/// An `xs:complexType`, named or anonymous
#[derive(Debug, Clone, Default)]
pub struct ComplexTypeDef {
    pub name: Option<String>,
    pub content: ContentModel,
    pub documentation: Option<String>,
}

/// Content of a complex type
#[derive(Debug, Clone, Default)]
pub enum ContentModel {
    /// Sequence/choice/all particles declared directly
    Particles(Vec<Particle>),
    /// `xs:simpleContent`: a value plus attributes
    SimpleContent { base: Option<String> },
    /// `xs:complexContent/xs:extension`
    Extension {
        base: String,
        particles: Vec<Particle>,
    },
    /// `xs:complexContent/xs:restriction`
    Restriction {
        base: String,
        particles: Vec<Particle>,
    },
    /// Attributes only
    #[default]
    Empty,
}

impl ContentModel {
    /// Locally declared particles, ignoring any base type
    pub fn particles(&self) -> &[Particle] {
        match self {
            Self::Particles(particles)
            | Self::Extension { particles, .. }
            | Self::Restriction { particles, .. } => particles,
            Self::SimpleContent { .. } | Self::Empty => &[],
        }
    }

    /// Base type of a complex-content derivation
    pub fn derivation_base(&self) -> Option<&str> {
        match self {
            Self::Extension { base, .. } | Self::Restriction { base, .. } => Some(base),
            _ => None,
        }
    }
}

/// Model group compositor kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compositor {
    Sequence,
    Choice,
    All,
}

/// One entry of a content model
#[derive(Debug, Clone)]
pub enum Particle {
    Element(ElementDecl),
    /// `xs:group ref="..."` with namespace prefix removed
    GroupRef(String),
    Compositor {
        kind: Compositor,
        particles: Vec<Particle>,
    },
}

/// A named `xs:group`
#[derive(Debug, Clone, Default)]
pub struct GroupDef {
    pub name: String,
    pub particles: Vec<Particle>,
}

/// Structural pattern of an element declaration, used when reporting
/// declarations missing from a concordance
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementPattern {
    /// `type="..."` and no inline type
    SimpleTyped,
    /// Neither a type attribute nor an inline type
    Untyped,
    SimpleContent { base: Option<String> },
    ComplexExtension { base: String },
    ComplexRestriction { base: String },
    /// Inline type with direct particles
    Particles,
    /// Inline type with attributes only
    EmptyComplex,
}

impl ElementPattern {
    pub fn of(decl: &ElementDecl) -> Self {
        let Some(inline) = &decl.inline else {
            return if decl.type_ref.is_some() {
                Self::SimpleTyped
            } else {
                Self::Untyped
            };
        };
        match &inline.content {
            ContentModel::SimpleContent { base } => Self::SimpleContent { base: base.clone() },
            ContentModel::Extension { base, .. } => Self::ComplexExtension { base: base.clone() },
            ContentModel::Restriction { base, .. } => {
                Self::ComplexRestriction { base: base.clone() }
            }
            ContentModel::Particles(_) => Self::Particles,
            ContentModel::Empty => Self::EmptyComplex,
        }
    }
}

impl fmt::Display for ElementPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SimpleTyped => f.write_str("simple_typed"),
            Self::Untyped => f.write_str("untyped"),
            Self::SimpleContent { base } => {
                write!(f, "simpleContent[base={}]", base.as_deref().unwrap_or("?"))
            }
            Self::ComplexExtension { base } => write!(f, "complexContent/extension[base={base}]"),
            Self::ComplexRestriction { base } => {
                write!(f, "complexContent/restriction[base={base}]")
            }
            Self::Particles => f.write_str("complexType[particles]"),
            Self::EmptyComplex => f.write_str("complexType[empty]"),
        }
    }
}

/// Remove a namespace prefix: `efile:USAmountType` → `USAmountType`
pub fn strip_prefix(qualified: &str) -> &str {
    qualified
        .split_once(':')
        .map_or(qualified, |(_, local)| local)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_prefix() {
        assert_eq!(strip_prefix("efile:USAmountType"), "USAmountType");
        assert_eq!(strip_prefix("xsd:string"), "string");
        assert_eq!(strip_prefix("BooleanType"), "BooleanType");
    }

    #[test]
    fn test_pattern_classification() {
        let mut decl = ElementDecl::named("Amt");
        assert_eq!(ElementPattern::of(&decl), ElementPattern::Untyped);

        decl.type_ref = Some("USAmountType".to_string());
        assert_eq!(ElementPattern::of(&decl), ElementPattern::SimpleTyped);

        decl.inline = Some(Box::new(ComplexTypeDef {
            content: ContentModel::Extension {
                base: "BaseType".to_string(),
                particles: Vec::new(),
            },
            ..ComplexTypeDef::default()
        }));
        assert_eq!(
            ElementPattern::of(&decl).to_string(),
            "complexContent/extension[base=BaseType]"
        );
    }

    #[test]
    fn test_element_declarations_walks_nested_particles() {
        let leaf = ElementDecl::named("Leaf");
        let container = ElementDecl {
            inline: Some(Box::new(ComplexTypeDef {
                content: ContentModel::Particles(vec![Particle::Compositor {
                    kind: Compositor::Sequence,
                    particles: vec![Particle::Element(leaf)],
                }]),
                ..ComplexTypeDef::default()
            })),
            ..ElementDecl::named("Container")
        };
        let doc = SchemaDocument {
            top_level_elements: vec![container],
            groups: vec![GroupDef {
                name: "G".to_string(),
                particles: vec![Particle::Element(ElementDecl::named("InGroup"))],
            }],
            ..SchemaDocument::default()
        };
        let names: Vec<&str> = doc
            .element_declarations()
            .into_iter()
            .filter_map(ElementDecl::effective_name)
            .collect();
        assert_eq!(names, vec!["Container", "Leaf", "InGroup"]);
        assert_eq!(doc.first_element_name(), Some("Container"));
    }
}
