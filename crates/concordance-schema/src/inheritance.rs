//! Content model expansion
//!
//! Flattens a content model into the element declarations it contributes:
//! compositors are opened, group references are replaced by the group's
//! particles, and complex-content derivations contribute their base type's
//! children before the locally declared ones. Names currently being expanded
//! are tracked so cyclic type or group graphs terminate, while acyclic chains
//! of any length unwind fully.

use crate::model::{ContentModel, ElementDecl, Particle};
use crate::registry::TypeRegistry;
use std::collections::HashSet;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Definition<'a> {
    Type(&'a str),
    Group(&'a str),
}

/// Expands content models against one version's registry
pub struct ContentExpander<'a> {
    registry: &'a TypeRegistry,
    visiting: HashSet<Definition<'a>>,
}

impl<'a> ContentExpander<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self {
            registry,
            visiting: HashSet::new(),
        }
    }

    /// Child element declarations of `content`, in declaration order.
    /// When two declarations share a name only the first is kept.
    pub fn expand(&mut self, content: &'a ContentModel) -> Vec<&'a ElementDecl> {
        let mut out = Vec::new();
        self.expand_content(content, &mut out);
        first_of_each_name(out)
    }

    /// Child element declarations of the named complex type, with the type
    /// itself marked as being expanded. Same ordering as [`Self::expand`].
    pub fn expand_type(&mut self, type_name: &'a str) -> Vec<&'a ElementDecl> {
        let mut out = Vec::new();
        self.expand_named_type(type_name, &mut out);
        first_of_each_name(out)
    }

    fn expand_content(&mut self, content: &'a ContentModel, out: &mut Vec<&'a ElementDecl>) {
        match content {
            ContentModel::Particles(particles) => self.expand_particles(particles, out),
            ContentModel::Extension { base, particles }
            | ContentModel::Restriction { base, particles } => {
                self.expand_named_type(base, out);
                self.expand_particles(particles, out);
            }
            ContentModel::SimpleContent { .. } | ContentModel::Empty => {}
        }
    }

    fn expand_named_type(&mut self, name: &'a str, out: &mut Vec<&'a ElementDecl>) {
        let registry = self.registry;
        let Some(definition) = registry.complex_type(name) else {
            trace!("Unresolved base type: {}", name);
            return;
        };
        let key = Definition::Type(name);
        if !self.visiting.insert(key) {
            trace!("Type cycle at {}", name);
            return;
        }
        self.expand_content(&definition.content, out);
        self.visiting.remove(&key);
    }

    fn expand_particles(&mut self, particles: &'a [Particle], out: &mut Vec<&'a ElementDecl>) {
        for particle in particles {
            match particle {
                Particle::Element(decl) => out.push(decl),
                Particle::Compositor { particles, .. } => self.expand_particles(particles, out),
                Particle::GroupRef(name) => self.expand_group(name, out),
            }
        }
    }

    fn expand_group(&mut self, name: &'a str, out: &mut Vec<&'a ElementDecl>) {
        let registry = self.registry;
        let Some(group) = registry.group(name) else {
            trace!("Unresolved group: {}", name);
            return;
        };
        let key = Definition::Group(name);
        if !self.visiting.insert(key) {
            trace!("Group cycle at {}", name);
            return;
        }
        self.expand_particles(&group.particles, out);
        self.visiting.remove(&key);
    }
}

fn first_of_each_name(mut decls: Vec<&ElementDecl>) -> Vec<&ElementDecl> {
    let mut seen = HashSet::new();
    decls.retain(|decl| match decl.effective_name() {
        Some(name) => seen.insert(name),
        None => false,
    });
    decls
}
