//! XSD document loader
//!
//! Parses schema text with `roxmltree` and converts it into the owned model
//! in [`crate::model`]. Only nodes in the XML Schema namespace are
//! interpreted; annotations other than `xs:documentation` are ignored.

use crate::model::{
    ComplexTypeDef, Compositor, ContentModel, ElementDecl, GroupDef, Particle, SchemaDocument,
    strip_prefix,
};
use crate::{Error, Result};
use concordance_ir::Occurs;
use roxmltree::{Document, Node, ParsingOptions};
use std::path::Path;
use tracing::trace;

/// XML Schema namespace URI
pub const XS_NS: &str = "http://www.w3.org/2001/XMLSchema";

/// Largest schema document accepted, in bytes
pub const DEFAULT_MAX_DOCUMENT_SIZE: usize = 64 * 1024 * 1024;

/// Reads `.xsd` files into [`SchemaDocument`]s
#[derive(Debug, Clone)]
pub struct SchemaLoader {
    max_document_size: usize,
}

impl SchemaLoader {
    /// Create a loader with the default size limit
    pub fn new() -> Self {
        Self {
            max_document_size: DEFAULT_MAX_DOCUMENT_SIZE,
        }
    }

    /// Override the maximum accepted document size
    #[must_use]
    pub fn with_max_document_size(mut self, bytes: usize) -> Self {
        self.max_document_size = bytes;
        self
    }

    /// Load and parse a schema file
    pub fn load_file(&self, path: &Path) -> Result<SchemaDocument> {
        trace!("Loading schema document: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let mut document = self.parse_str(&content)?;
        document.path = path.to_path_buf();
        Ok(document)
    }

    /// Parse schema text
    pub fn parse_str(&self, content: &str) -> Result<SchemaDocument> {
        if content.len() > self.max_document_size {
            return Err(Error::Parse(format!(
                "document too large: {} bytes (max {})",
                content.len(),
                self.max_document_size
            )));
        }

        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let doc = Document::parse_with_options(content, options)
            .map_err(|e| Error::Parse(format!("XML: {e}")))?;
        let root = doc.root_element();
        if !is_xs(root, "schema") {
            return Err(Error::Parse(format!(
                "root element must be xs:schema, found '{}'",
                root.tag_name().name()
            )));
        }

        let mut document = SchemaDocument::default();

        for child in xs_children(root) {
            match child.tag_name().name() {
                "element" => document.top_level_elements.push(parse_element(child)),
                "include" | "import" | "redefine" => {
                    if let Some(location) = child.attribute("schemaLocation") {
                        document.includes.push(location.to_string());
                    }
                }
                _ => {}
            }
        }

        // Named definitions may also sit inside xs:redefine blocks
        for node in root.descendants().filter(|n| n.is_element()) {
            if is_xs(node, "complexType") && node.has_attribute("name") {
                document.complex_types.push(parse_complex_type(node));
            } else if is_xs(node, "group") {
                if let Some(name) = node.attribute("name") {
                    document.groups.push(GroupDef {
                        name: name.to_string(),
                        particles: parse_particles(node),
                    });
                }
            }
        }

        trace!(
            "Parsed schema: {} top-level elements, {} complex types, {} groups, {} includes",
            document.top_level_elements.len(),
            document.complex_types.len(),
            document.groups.len(),
            document.includes.len()
        );

        Ok(document)
    }
}

impl Default for SchemaLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn is_xs(node: Node<'_, '_>, local_name: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == local_name
        && node.tag_name().namespace() == Some(XS_NS)
}

fn xs_children<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(|n| n.is_element() && n.tag_name().namespace() == Some(XS_NS))
}

fn xs_child<'a, 'input>(node: Node<'a, 'input>, local_name: &str) -> Option<Node<'a, 'input>> {
    xs_children(node).find(|n| n.tag_name().name() == local_name)
}

/// Text of the first `xs:annotation/xs:documentation` child, trimmed
fn documentation(node: Node<'_, '_>) -> Option<String> {
    let doc = xs_child(node, "annotation").and_then(|a| xs_child(a, "documentation"))?;
    let text: String = doc
        .descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect();
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn prefixed_attribute(node: Node<'_, '_>, name: &str) -> Option<String> {
    node.attribute(name).map(|v| strip_prefix(v).to_string())
}

fn parse_element(node: Node<'_, '_>) -> ElementDecl {
    ElementDecl {
        name: node.attribute("name").map(str::to_string),
        reference: prefixed_attribute(node, "ref"),
        type_ref: prefixed_attribute(node, "type"),
        occurs: Occurs::from_attributes(node.attribute("minOccurs"), node.attribute("maxOccurs")),
        documentation: documentation(node),
        inline: xs_child(node, "complexType").map(|ct| Box::new(parse_complex_type(ct))),
    }
}

fn parse_complex_type(node: Node<'_, '_>) -> ComplexTypeDef {
    ComplexTypeDef {
        name: node.attribute("name").map(str::to_string),
        content: parse_content(node),
        documentation: documentation(node),
    }
}

fn parse_content(node: Node<'_, '_>) -> ContentModel {
    if let Some(simple) = xs_child(node, "simpleContent") {
        let base = xs_children(simple)
            .find(|n| matches!(n.tag_name().name(), "extension" | "restriction"))
            .and_then(|d| prefixed_attribute(d, "base"));
        return ContentModel::SimpleContent { base };
    }

    if let Some(complex) = xs_child(node, "complexContent") {
        if let Some(ext) = xs_child(complex, "extension") {
            return ContentModel::Extension {
                base: prefixed_attribute(ext, "base").unwrap_or_default(),
                particles: parse_particles(ext),
            };
        }
        if let Some(res) = xs_child(complex, "restriction") {
            return ContentModel::Restriction {
                base: prefixed_attribute(res, "base").unwrap_or_default(),
                particles: parse_particles(res),
            };
        }
        return ContentModel::Empty;
    }

    let particles = parse_particles(node);
    if particles.is_empty() {
        ContentModel::Empty
    } else {
        ContentModel::Particles(particles)
    }
}

/// Particles declared directly under `node` (a type, derivation, group or
/// compositor)
fn parse_particles(node: Node<'_, '_>) -> Vec<Particle> {
    xs_children(node).filter_map(parse_particle).collect()
}

fn parse_particle(node: Node<'_, '_>) -> Option<Particle> {
    match node.tag_name().name() {
        "element" => Some(Particle::Element(parse_element(node))),
        "group" => {
            if let Some(reference) = prefixed_attribute(node, "ref") {
                Some(Particle::GroupRef(reference))
            } else {
                // Anonymous group content is inlined as its compositor
                Some(Particle::Compositor {
                    kind: Compositor::Sequence,
                    particles: parse_particles(node),
                })
            }
        }
        "sequence" => Some(Particle::Compositor {
            kind: Compositor::Sequence,
            particles: parse_particles(node),
        }),
        "choice" => Some(Particle::Compositor {
            kind: Compositor::Choice,
            particles: parse_particles(node),
        }),
        "all" => Some(Particle::Compositor {
            kind: Compositor::All,
            particles: parse_particles(node),
        }),
        _ => None,
    }
}
