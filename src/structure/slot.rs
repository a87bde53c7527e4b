// Fri Oct 16 2026 - Alex

use crate::symbol::QualifiedPath;
use std::fmt;

/// One virtual function slot of a reconstructed structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualSlot {
    /// Byte offset inside the table.
    pub offset: u32,
    /// Scope chain of the symbol, empty for placeholders.
    pub qualifiers: QualifiedPath,
    /// Signature without its scope, `None` for a pure virtual or filler slot.
    pub name: Option<String>,
    pub is_weak: bool,
}

impl VirtualSlot {
    pub fn named(offset: u32, qualifiers: QualifiedPath, name: String, is_weak: bool) -> Self {
        Self {
            offset,
            qualifiers,
            name: Some(name),
            is_weak,
        }
    }

    pub fn placeholder(offset: u32) -> Self {
        Self {
            offset,
            qualifiers: QualifiedPath::default(),
            name: None,
            is_weak: false,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.name.is_none()
    }

    pub fn is_destructor(&self) -> bool {
        self.name.as_deref().map_or(false, |n| n.starts_with('~'))
    }

    /// The line as it appears inside the struct body, without indentation.
    pub fn declaration(&self) -> String {
        match self.name.as_deref() {
            Some(name) if self.is_destructor() => format!("virtual {};", name),
            Some(name) => format!("virtual void {};", name),
            None => format!("virtual void {}() = 0;", format_offset(self.offset)),
        }
    }

    pub fn comment(&self) -> String {
        if self.is_weak {
            format!("// {} (weak)", format_offset(self.offset))
        } else {
            format!("// {}", format_offset(self.offset))
        }
    }
}

impl fmt::Display for VirtualSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.declaration(), self.comment())
    }
}

/// `_08`, `_0C`, `_100`: uppercase hex, at least two digits.
pub fn format_offset(offset: u32) -> String {
    format!("_{:02X}", offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declarations() {
        let path = QualifiedPath::parse("Game::Base");
        let named = VirtualSlot::named(8, path.clone(), "foo(int)".to_string(), false);
        let dtor = VirtualSlot::named(0xC, path, "~Base()".to_string(), true);
        let pure = VirtualSlot::placeholder(0x100);

        assert_eq!(named.declaration(), "virtual void foo(int);");
        assert_eq!(named.comment(), "// _08");
        assert_eq!(dtor.declaration(), "virtual ~Base();");
        assert_eq!(dtor.comment(), "// _0C (weak)");
        assert_eq!(pure.declaration(), "virtual void _100() = 0;");
        assert!(pure.is_placeholder());
        assert!(dtor.is_destructor());
    }
}
