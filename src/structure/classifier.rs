// Fri Oct 16 2026 - Alex

use crate::structure::error::ReconstructError;
use crate::structure::layout::VtableLayout;
use crate::structure::registry::{Structure, StructureRegistry};
use crate::structure::slot::VirtualSlot;
use crate::structure::vtable::{RawSlot, VtableDump, VTABLE_LABEL_PREFIX};
use crate::symbol::demangle::demangle_type_name;
use crate::symbol::{decompose, Demangle, QualifiedPath, WeakSymbolSet};

const VTABLE_MEMBER_SUFFIX: &str = "::__vt";

/// Result of sorting one table's slots into structures.
#[derive(Debug)]
pub struct Classification {
    pub registry: StructureRegistry,
    /// Slots that could not be decomposed; each was skipped.
    pub diagnostics: Vec<ReconstructError>,
    pub thunks_skipped: usize,
}

/// Decides, slot by slot, whether a symbol belongs to the table's own class
/// or to a base inferred from the symbol's scope chain.
pub struct SlotClassifier<'a> {
    demangler: &'a dyn Demangle,
    weak_symbols: Option<&'a WeakSymbolSet>,
    layout: VtableLayout,
}

impl<'a> SlotClassifier<'a> {
    pub fn new(demangler: &'a dyn Demangle, layout: VtableLayout) -> Self {
        Self {
            demangler,
            weak_symbols: None,
            layout,
        }
    }

    pub fn with_weak_symbols(mut self, weak_symbols: &'a WeakSymbolSet) -> Self {
        self.weak_symbols = Some(weak_symbols);
        self
    }

    /// Recovers the table's own class from its `__vt__` label.
    pub fn resolve_parent(&self, dump: &VtableDump) -> Result<Structure, ReconstructError> {
        let demangled = self.demangler.demangle(&dump.label);

        let qualified = match demangled.strip_suffix(VTABLE_MEMBER_SUFFIX) {
            Some(name) => name.to_string(),
            None if demangled.starts_with(VTABLE_LABEL_PREFIX) => {
                let mangled = dump.mangled_class();
                demangle_type_name(mangled).unwrap_or_else(|| mangled.to_string())
            }
            None => demangled,
        };

        Structure::from_path(&QualifiedPath::parse(&qualified))
            .ok_or_else(|| ReconstructError::UnresolvedLabel(dump.label.clone()))
    }

    pub fn classify(&self, dump: &VtableDump) -> Result<Classification, ReconstructError> {
        let parent = self.resolve_parent(dump)?;
        if dump.slot_count() == 0 {
            log::debug!("{} has no virtual slots", dump.label);
        }
        Ok(self.classify_slots(parent, dump.slots()))
    }

    pub fn classify_slots<I>(&self, parent: Structure, slots: I) -> Classification
    where
        I: IntoIterator<Item = (usize, RawSlot)>,
    {
        let parent_path = parent.full_path();
        let mut classification = Classification {
            registry: StructureRegistry::new(parent),
            diagnostics: Vec::new(),
            thunks_skipped: 0,
        };

        for (index, slot) in slots {
            let offset = self.layout.offset_of(index);

            match slot {
                RawSlot::Pure => {
                    classification
                        .registry
                        .parent_mut()
                        .push(VirtualSlot::placeholder(offset));
                }
                RawSlot::Thunk(raw) => {
                    log::debug!("Skipping thunk {} at {:#x}", raw, offset);
                    classification.thunks_skipped += 1;
                }
                RawSlot::Symbol(raw) => {
                    if let Err(e) = self.place_symbol(
                        &mut classification.registry,
                        &parent_path,
                        index,
                        &raw,
                    ) {
                        log::warn!("{}", e);
                        classification.diagnostics.push(e);
                    }
                }
            }
        }

        classification
    }

    fn place_symbol(
        &self,
        registry: &mut StructureRegistry,
        parent_path: &QualifiedPath,
        index: usize,
        raw: &str,
    ) -> Result<(), ReconstructError> {
        let offset = self.layout.offset_of(index);
        let demangled = self.demangler.demangle(raw);
        let decomposed = decompose(&demangled).map_err(|source| ReconstructError::MalformedSlot {
            index,
            line: raw.to_string(),
            source,
        })?;

        let is_weak = self.weak_symbols.map_or(false, |set| set.is_weak(raw));
        let qualified = decomposed.qualified_name();
        let qualifiers = decomposed.qualifiers;
        let slot = VirtualSlot::named(offset, qualifiers.clone(), decomposed.leaf, is_weak);

        // The whole chain has to match; a shared leaf under another scope is
        // a different type.
        if qualifiers == *parent_path {
            log::debug!("{:#x} {} -> {}", offset, qualified, parent_path);
            registry.parent_mut().push(slot);
            return Ok(());
        }

        match qualifiers.split_last() {
            Some((owner, scope)) => {
                log::debug!("{:#x} {} -> base {}", offset, qualified, owner);
                registry.derivative_or_insert(owner, scope).push(slot);
            }
            None => {
                // Free function in the table; no owner can be inferred.
                registry.parent_mut().push(slot);
            }
        }

        Ok(())
    }
}
