// Fri Oct 16 2026 - Alex

use crate::output::extra::extra_declarations;
use crate::structure::{Structure, StructureRegistry, VtableDump};
use crate::symbol::{Demangle, SymbolMap};
use itertools::Itertools;
use std::path::{Path, PathBuf};

pub const DISCLAIMER: &str = "// NOTE: reconstructed from a vtable dump. Scopes and slot offsets of every \
structure besides the vtable's own class may be wrong; review by hand before use.";

/// Header text for one reconstructed table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedHeader {
    /// Qualified name of the table's own class.
    pub class_name: String,
    /// Location below the output root, mirroring the scope chain.
    pub relative_path: PathBuf,
    pub text: String,
}

pub struct HeaderEmitter<'a> {
    demangler: &'a dyn Demangle,
    symbol_map: Option<&'a SymbolMap>,
    include_guard: bool,
    original_dump: bool,
    disclaimer: bool,
}

impl<'a> HeaderEmitter<'a> {
    pub fn new(demangler: &'a dyn Demangle) -> Self {
        Self {
            demangler,
            symbol_map: None,
            include_guard: true,
            original_dump: true,
            disclaimer: true,
        }
    }

    pub fn with_symbol_map(mut self, symbol_map: &'a SymbolMap) -> Self {
        self.symbol_map = Some(symbol_map);
        self
    }

    pub fn with_include_guard(mut self, include: bool) -> Self {
        self.include_guard = include;
        self
    }

    pub fn with_original_dump(mut self, include: bool) -> Self {
        self.original_dump = include;
        self
    }

    pub fn with_disclaimer(mut self, include: bool) -> Self {
        self.disclaimer = include;
        self
    }

    pub fn render(&self, registry: &StructureRegistry, dump: &VtableDump) -> RenderedHeader {
        let parent = registry.parent();
        let relative_path = header_path(parent);
        let guard = include_guard(&relative_path);
        let mut lines = Vec::new();

        if self.include_guard {
            lines.push(format!("#ifndef {}", guard));
            lines.push(format!("#define {}", guard));
            lines.push(String::new());
        }

        if self.original_dump {
            lines.push("/*".to_string());
            for line in &dump.source_lines {
                lines.push(format!("\t{}", line.trim()));
            }
            lines.push("*/".to_string());
            lines.push(String::new());
        }

        if self.disclaimer {
            lines.push(DISCLAIMER.to_string());
            lines.push(String::new());
        }

        for base in registry.derivatives() {
            lines.push(self.format_structure(base, &[], &[]));
            lines.push(String::new());
        }

        let extra = match self.symbol_map {
            Some(map) => extra_declarations(parent, map, self.demangler),
            None => Vec::new(),
        };
        lines.push(self.format_structure(parent, &registry.base_names(), &extra));

        if self.include_guard {
            lines.push(String::new());
            lines.push("#endif".to_string());
        }

        let mut text = lines.join("\n");
        text.push('\n');

        RenderedHeader {
            class_name: parent.full_path().to_string(),
            relative_path,
            text,
        }
    }

    pub fn format_structure(&self, structure: &Structure, bases: &[&str], extra: &[String]) -> String {
        let mut lines = Vec::new();

        for scope in structure.qualifiers.iter() {
            lines.push(format!("namespace {} {{", scope));
        }

        let mut header = format!("struct {}", structure.name);
        if !bases.is_empty() {
            header.push_str(" : ");
            header.push_str(&bases.iter().map(|b| format!("public {}", b)).join(", "));
        }
        header.push_str(" {");
        lines.push(header);

        let declarations: Vec<String> = structure.symbols.iter().map(|s| s.declaration()).collect();
        let width = declarations.iter().map(String::len).max().unwrap_or(0) + 1;
        for (declaration, slot) in declarations.iter().zip(&structure.symbols) {
            lines.push(format!("\t{:<width$} {}", declaration, slot.comment(), width = width));
        }

        if !extra.is_empty() {
            lines.push(String::new());
            for declaration in extra {
                lines.push(format!("\t{}", declaration));
            }
        }

        lines.push("};".to_string());

        for scope in structure.qualifiers.iter().rev() {
            lines.push(format!("}} // namespace {}", scope));
        }

        lines.join("\n")
    }
}

/// `Game/Piki.h` for `Game::Piki`.
pub fn header_path(structure: &Structure) -> PathBuf {
    let mut path: PathBuf = structure.qualifiers.iter().map(sanitize_component).collect();
    path.push(format!("{}.h", sanitize_component(&structure.name)));
    path
}

/// `_GAME_PIKI_H` for `Game/Piki.h`.
pub fn include_guard(path: &Path) -> String {
    let body: String = path
        .with_extension("")
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .join("_")
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect();
    format!("_{}_H", body.trim_start_matches('_'))
}

fn sanitize_component(component: &str) -> String {
    component
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '*' | '?' | '"' | '|' | '/' | '\\' | ',' | ' ' | '&' => '_',
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::VirtualSlot;
    use crate::symbol::{CodeWarriorDemangler, QualifiedPath};

    fn registry() -> StructureRegistry {
        let mut parent = Structure::new("Derived", QualifiedPath::parse("Game"));
        parent.push(VirtualSlot::named(
            0x0C,
            QualifiedPath::parse("Game::Derived"),
            "bar(int)".to_string(),
            true,
        ));
        parent.push(VirtualSlot::placeholder(0x10));

        let mut registry = StructureRegistry::new(parent);
        registry
            .derivative_or_insert("Base", QualifiedPath::default())
            .push(VirtualSlot::named(8, QualifiedPath::parse("Base"), "~Base()".to_string(), false));
        registry
    }

    #[test]
    fn test_paths_and_guards() {
        let s = Structure::new("Piki", QualifiedPath::parse("Game::Sub"));
        let path = header_path(&s);
        assert_eq!(path, PathBuf::from("Game").join("Sub").join("Piki.h"));
        assert_eq!(include_guard(&path), "_GAME_SUB_PIKI_H");

        let t = Structure::new("TVec<float>", QualifiedPath::default());
        assert_eq!(header_path(&t), PathBuf::from("TVec_float_.h"));
    }

    #[test]
    fn test_format_structure_aligns_comments() {
        let registry = registry();
        let emitter = HeaderEmitter::new(&CodeWarriorDemangler);
        let text = emitter.format_structure(registry.parent(), &registry.base_names(), &[]);

        let expected = "\
namespace Game {
struct Derived : public Base {
\tvirtual void bar(int);   // _0C (weak)
\tvirtual void _10() = 0;  // _10
};
} // namespace Game";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_render_full_header() {
        let registry = registry();
        let dump = VtableDump::from_operands("__vt__Q24Game7Derived", ["0", "0", "__dt__4BaseFv"]);
        let header = HeaderEmitter::new(&CodeWarriorDemangler).render(&registry, &dump);

        assert_eq!(header.class_name, "Game::Derived");
        assert!(header.text.starts_with("#ifndef _GAME_DERIVED_H\n#define _GAME_DERIVED_H\n"));
        assert!(header.text.contains("\t__vt__Q24Game7Derived:\n\t.4byte 0\n"));
        assert!(header.text.contains(DISCLAIMER));
        assert!(header.text.trim_end().ends_with("#endif"));

        let base = header.text.find("struct Base {").unwrap();
        let derived = header.text.find("struct Derived : public Base {").unwrap();
        assert!(base < derived);
        assert!(header.text.contains("\tvirtual ~Base();  // _08"));
    }

    #[test]
    fn test_console_variant_has_no_guard() {
        let registry = registry();
        let dump = VtableDump::from_operands("__vt__Q24Game7Derived", ["0", "0"]);
        let header = HeaderEmitter::new(&CodeWarriorDemangler)
            .with_include_guard(false)
            .with_original_dump(false)
            .render(&registry, &dump);

        assert!(!header.text.contains("#ifndef"));
        assert!(!header.text.contains("/*"));
        assert!(header.text.starts_with(DISCLAIMER));
    }
}
