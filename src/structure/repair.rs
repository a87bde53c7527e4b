// Fri Oct 16 2026 - Alex

//! Offset repair for inferred bases.
//!
//! With single inheritance a base's own table is a prefix of the derived
//! table, so base slots the derived class did not override never show up
//! under the base's name. This pass fills those gaps, preferring the parent's
//! slot at the same offset and falling back to a pure virtual stub.
//!
//! The pass only runs when exactly one base was inferred. A class with two
//! bases of which only one introduces virtuals is still treated as single
//! inheritance and may come out wrong, so repaired layouts are advisory.

use crate::structure::layout::VtableLayout;
use crate::structure::registry::{Structure, StructureRegistry};
use crate::structure::slot::VirtualSlot;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RepairReport {
    pub copied_from_parent: usize,
    pub placeholders_inserted: usize,
    /// Set when more than one base was found and nothing was touched.
    pub skipped_multiple_bases: bool,
}

impl RepairReport {
    pub fn inserted(&self) -> usize {
        self.copied_from_parent + self.placeholders_inserted
    }

    fn absorb(&mut self, other: RepairReport) {
        self.copied_from_parent += other.copied_from_parent;
        self.placeholders_inserted += other.placeholders_inserted;
    }
}

pub fn repair_offsets(registry: &mut StructureRegistry, layout: VtableLayout) -> RepairReport {
    let mut report = RepairReport::default();

    match registry.derivative_count() {
        0 => return report,
        1 => {}
        n => {
            log::debug!(
                "{} has {} inferred bases, leaving base offsets as found",
                registry.parent().name,
                n
            );
            report.skipped_multiple_bases = true;
            return report;
        }
    }

    let (parent, derivatives) = registry.split_mut();
    for derived in derivatives {
        let (symbols, step) = repaired_symbols(derived, parent, layout);
        if step.inserted() > 0 {
            log::debug!(
                "Padded {} with {} slots ({} from {})",
                derived.name,
                step.inserted(),
                step.copied_from_parent,
                parent.name
            );
        }
        derived.symbols = symbols;
        report.absorb(step);
    }

    report
}

/// Rebuilds `derived`'s slot list so every slot sits at the offset its index
/// implies. Running it on an already repaired list returns the list unchanged.
pub fn repaired_symbols(
    derived: &Structure,
    parent: &Structure,
    layout: VtableLayout,
) -> (Vec<VirtualSlot>, RepairReport) {
    let mut report = RepairReport::default();
    let mut symbols = Vec::with_capacity(derived.symbols.len());

    for slot in &derived.symbols {
        loop {
            let expected = layout.offset_of(symbols.len());
            if expected >= slot.offset {
                break;
            }

            match parent.slot_at_offset(expected) {
                Some(inherited) => {
                    symbols.push(inherit_slot(inherited, derived));
                    report.copied_from_parent += 1;
                }
                None => {
                    symbols.push(VirtualSlot::placeholder(expected));
                    report.placeholders_inserted += 1;
                }
            }
        }

        symbols.push(slot.clone());
    }

    (symbols, report)
}

fn inherit_slot(inherited: &VirtualSlot, derived: &Structure) -> VirtualSlot {
    let mut slot = inherited.clone();
    if slot.is_destructor() {
        // Destructors are per class; the base gets its own.
        slot.name = Some(format!("~{}()", derived.name));
        slot.qualifiers = derived.full_path();
    }
    slot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::QualifiedPath;

    fn named(offset: u32, owner: &str, name: &str) -> VirtualSlot {
        VirtualSlot::named(offset, QualifiedPath::parse(owner), name.to_string(), false)
    }

    fn registry_with(parent_slots: Vec<VirtualSlot>, bases: &[(&str, Vec<VirtualSlot>)]) -> StructureRegistry {
        let mut parent = Structure::new("Derived", QualifiedPath::default());
        parent.symbols = parent_slots;
        let mut registry = StructureRegistry::new(parent);
        for (name, slots) in bases {
            registry.derivative_or_insert(name, QualifiedPath::default()).symbols = slots.clone();
        }
        registry
    }

    #[test]
    fn test_gap_filled_from_parent_destructor() {
        let mut registry = registry_with(
            vec![named(0x0C, "Derived", "~Derived()"), named(0x14, "Derived", "run()")],
            &[("Base", vec![named(0x08, "Base", "foo()"), named(0x10, "Base", "bar()")])],
        );

        let report = repair_offsets(&mut registry, VtableLayout::header());
        let base = registry.derivative("Base").unwrap();

        let names: Vec<_> = base.symbols.iter().map(|s| s.name.clone().unwrap()).collect();
        assert_eq!(names, vec!["foo()", "~Base()", "bar()"]);
        assert_eq!(base.symbols[1].offset, 0x0C);
        assert_eq!(report.copied_from_parent, 1);
        assert_eq!(report.placeholders_inserted, 0);
    }

    #[test]
    fn test_gap_without_parent_slot_gets_placeholder() {
        let mut registry = registry_with(
            vec![named(0x10, "Derived", "run()")],
            &[("Base", vec![named(0x0C, "Base", "foo()")])],
        );

        let report = repair_offsets(&mut registry, VtableLayout::header());
        let base = registry.derivative("Base").unwrap();

        assert_eq!(base.symbols[0], VirtualSlot::placeholder(0x08));
        assert_eq!(base.symbols[1].offset, 0x0C);
        assert_eq!(report.placeholders_inserted, 1);
    }

    #[test]
    fn test_offsets_match_positions_after_repair() {
        let mut registry = registry_with(
            vec![named(0x08, "Derived", "a()"), named(0x10, "Derived", "b()")],
            &[("Base", vec![named(0x0C, "Base", "c()"), named(0x18, "Base", "d()")])],
        );
        let layout = VtableLayout::header();
        repair_offsets(&mut registry, layout);

        for (index, slot) in registry.derivative("Base").unwrap().symbols.iter().enumerate() {
            assert_eq!(slot.offset, layout.offset_of(index));
        }
    }

    #[test]
    fn test_repair_is_idempotent() {
        let mut registry = registry_with(
            vec![named(0x08, "Derived", "~Derived()")],
            &[("Base", vec![named(0x10, "Base", "foo()")])],
        );
        let layout = VtableLayout::header();

        repair_offsets(&mut registry, layout);
        let once = registry.derivative("Base").unwrap().clone();

        let second = repair_offsets(&mut registry, layout);
        assert_eq!(second.inserted(), 0);
        assert_eq!(registry.derivative("Base").unwrap(), &once);
    }

    #[test]
    fn test_multiple_bases_are_left_alone() {
        let mut registry = registry_with(
            vec![named(0x08, "Derived", "a()")],
            &[
                ("A", vec![named(0x0C, "A", "x()")]),
                ("B", vec![named(0x10, "B", "y()")]),
            ],
        );

        let report = repair_offsets(&mut registry, VtableLayout::header());
        assert!(report.skipped_multiple_bases);
        assert_eq!(registry.derivative("A").unwrap().symbols.len(), 1);
        assert_eq!(registry.derivative("B").unwrap().symbols.len(), 1);
    }

    #[test]
    fn test_flat_layout() {
        let mut registry = registry_with(
            vec![named(0x00, "Derived", "a()")],
            &[("Base", vec![named(0x04, "Base", "b()")])],
        );
        repair_offsets(&mut registry, VtableLayout::flat());
        let base = registry.derivative("Base").unwrap();
        assert_eq!(base.symbols[0].name.as_deref(), Some("a()"));
        assert_eq!(base.symbols[0].offset, 0);
    }
}
