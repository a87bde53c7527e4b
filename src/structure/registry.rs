// Fri Oct 16 2026 - Alex

use crate::structure::slot::VirtualSlot;
use crate::symbol::QualifiedPath;
use indexmap::IndexMap;
use std::fmt;

/// A candidate class or struct recovered from a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Structure {
    pub name: String,
    /// Enclosing scopes, not including `name`.
    pub qualifiers: QualifiedPath,
    /// Slots in table order; the index is significant.
    pub symbols: Vec<VirtualSlot>,
}

impl Structure {
    pub fn new(name: &str, qualifiers: QualifiedPath) -> Self {
        Self {
            name: name.to_string(),
            qualifiers,
            symbols: Vec::new(),
        }
    }

    /// Builds a structure from its full path; `None` for an empty path.
    pub fn from_path(path: &QualifiedPath) -> Option<Self> {
        let (name, qualifiers) = path.split_last()?;
        Some(Self::new(name, qualifiers))
    }

    pub fn full_path(&self) -> QualifiedPath {
        self.qualifiers.child(&self.name)
    }

    pub fn push(&mut self, slot: VirtualSlot) {
        self.symbols.push(slot);
    }

    pub fn slot_at_offset(&self, offset: u32) -> Option<&VirtualSlot> {
        self.symbols.iter().find(|s| s.offset == offset)
    }

    pub fn is_abstract(&self) -> bool {
        self.symbols.iter().any(VirtualSlot::is_placeholder)
    }

    pub fn slot_count(&self) -> usize {
        self.symbols.len()
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{} slots]", self.full_path(), self.symbols.len())?;
        if self.is_abstract() {
            write!(f, " [abstract]")?;
        }
        Ok(())
    }
}

/// The parent structure plus the bases inferred while classifying its table,
/// in order of first appearance. Lives for one reconstruction.
#[derive(Debug, Clone)]
pub struct StructureRegistry {
    parent: Structure,
    derivatives: IndexMap<String, Structure>,
}

impl StructureRegistry {
    pub fn new(parent: Structure) -> Self {
        Self {
            parent,
            derivatives: IndexMap::new(),
        }
    }

    pub fn parent(&self) -> &Structure {
        &self.parent
    }

    pub fn parent_mut(&mut self) -> &mut Structure {
        &mut self.parent
    }

    pub fn derivative(&self, name: &str) -> Option<&Structure> {
        self.derivatives.get(name)
    }

    /// Looks up a base by its leaf name, creating it on first sight.
    pub fn derivative_or_insert(&mut self, name: &str, qualifiers: QualifiedPath) -> &mut Structure {
        self.derivatives
            .entry(name.to_string())
            .or_insert_with(|| {
                log::debug!("Inferred base structure {}", qualifiers.child(name));
                Structure::new(name, qualifiers)
            })
    }

    pub fn derivatives(&self) -> impl Iterator<Item = &Structure> {
        self.derivatives.values()
    }

    /// Split borrow used by passes that rewrite bases against the parent.
    pub fn split_mut(&mut self) -> (&Structure, impl Iterator<Item = &mut Structure>) {
        (&self.parent, self.derivatives.values_mut())
    }

    pub fn derivative_count(&self) -> usize {
        self.derivatives.len()
    }

    pub fn base_names(&self) -> Vec<&str> {
        self.derivatives.keys().map(String::as_str).collect()
    }

    /// Emission order: every base, then the parent.
    pub fn structures(&self) -> impl Iterator<Item = &Structure> {
        self.derivatives.values().chain(std::iter::once(&self.parent))
    }

    pub fn slot_count(&self) -> usize {
        self.structures().map(Structure::slot_count).sum()
    }
}
