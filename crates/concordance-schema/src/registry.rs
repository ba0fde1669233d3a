//! Type and group registry

use crate::model::{ComplexTypeDef, ElementDecl, GroupDef, SchemaDocument};
use std::collections::HashMap;

/// Name-keyed definitions visible to one version's document tree
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    complex_types: HashMap<String, ComplexTypeDef>,
    groups: HashMap<String, GroupDef>,
    elements: HashMap<String, ElementDecl>,
}

impl TypeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every named definition of `document`. Later registrations
    /// replace earlier ones with the same name.
    pub fn register_document(&mut self, document: &SchemaDocument) {
        for ct in &document.complex_types {
            if let Some(name) = &ct.name {
                self.complex_types.insert(name.clone(), ct.clone());
            }
        }
        for group in &document.groups {
            self.groups.insert(group.name.clone(), group.clone());
        }
        for element in &document.top_level_elements {
            if let Some(name) = &element.name {
                self.elements.insert(name.clone(), element.clone());
            }
        }
    }

    pub fn register_type(&mut self, definition: ComplexTypeDef) {
        if let Some(name) = definition.name.clone() {
            self.complex_types.insert(name, definition);
        }
    }

    pub fn register_group(&mut self, definition: GroupDef) {
        self.groups.insert(definition.name.clone(), definition);
    }

    /// Get a complex type by name
    pub fn complex_type(&self, name: &str) -> Option<&ComplexTypeDef> {
        self.complex_types.get(name)
    }

    /// Get a named group by name
    pub fn group(&self, name: &str) -> Option<&GroupDef> {
        self.groups.get(name)
    }

    /// Get a global element declaration by name
    pub fn element(&self, name: &str) -> Option<&ElementDecl> {
        self.elements.get(name)
    }

    pub fn type_count(&self) -> usize {
        self.complex_types.len()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ContentModel;

    #[test]
    fn test_later_definition_replaces_earlier() {
        let mut registry = TypeRegistry::new();
        registry.register_type(ComplexTypeDef {
            name: Some("T".to_string()),
            ..ComplexTypeDef::default()
        });
        registry.register_type(ComplexTypeDef {
            name: Some("T".to_string()),
            content: ContentModel::SimpleContent { base: None },
            ..ComplexTypeDef::default()
        });
        assert_eq!(registry.type_count(), 1);
        assert!(matches!(
            registry.complex_type("T").unwrap().content,
            ContentModel::SimpleContent { .. }
        ));
    }

    #[test]
    fn test_anonymous_types_are_not_registered() {
        let mut registry = TypeRegistry::new();
        registry.register_type(ComplexTypeDef::default());
        assert_eq!(registry.type_count(), 0);
        assert!(registry.group("missing").is_none());
    }

    #[test]
    fn test_register_document_collects_global_elements() {
        let document = SchemaDocument {
            top_level_elements: vec![ElementDecl::named("IRS990")],
            groups: vec![GroupDef {
                name: "G".to_string(),
                particles: Vec::new(),
            }],
            ..SchemaDocument::default()
        };
        let mut registry = TypeRegistry::new();
        registry.register_document(&document);
        assert!(registry.element("IRS990").is_some());
        assert_eq!(registry.group_count(), 1);
        assert_eq!(registry.element_count(), 1);
    }
}
