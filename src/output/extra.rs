// Fri Oct 16 2026 - Alex

use crate::structure::Structure;
use crate::symbol::{decompose, scope_prefix, Demangle, SymbolMap};
use indexmap::IndexSet;

/// Non-virtual members of `parent` found in the symbol map.
///
/// Return types are not part of the mangling, so everything that is not a
/// constructor or destructor is declared `void`.
pub fn extra_declarations(parent: &Structure, symbol_map: &SymbolMap, demangler: &dyn Demangle) -> Vec<String> {
    let prefix = scope_prefix(&parent.qualifiers, &parent.name);
    let parent_path = parent.full_path();
    let destructor = format!("~{}", parent.name);
    let mut declarations = IndexSet::new();

    for entry in symbol_map.members_of(&prefix) {
        let demangled = demangler.demangle(&entry.mangled_name);
        let Ok(name) = decompose(&demangled) else {
            continue;
        };

        if name.qualifiers != parent_path {
            continue;
        }

        let already_virtual = parent
            .symbols
            .iter()
            .any(|slot| slot.name.as_deref() == Some(name.leaf.as_str()));
        if already_virtual {
            continue;
        }

        let base = name.base_name();
        let declaration = if base == parent.name || base == destructor {
            format!("{};", name.leaf)
        } else {
            format!("void {};", name.leaf)
        };
        declarations.insert(declaration);
    }

    declarations.into_iter().collect()
}
