// Fri Oct 16 2026 - Alex

use crate::symbol::error::SymbolError;
use serde::Serialize;
use std::fmt;

pub const SCOPE_SEPARATOR: &str = "::";

/// Marker the compiler puts into adjustor and covariant-return thunk names.
pub const THUNK_MARKER: char = '@';

const OPERATOR_KEYWORD: &str = "operator";
const OPERATOR_CHARS: &str = "<>=!+-*/%^&|~,[]";

/// Ordered chain of enclosing scopes, outermost first.
///
/// Never mutated after construction; operations that change the chain
/// return a new path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct QualifiedPath {
    components: Vec<String>,
}

impl QualifiedPath {
    pub fn new<I, S>(components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            components: components
                .into_iter()
                .map(Into::into)
                .filter(|c: &String| !c.trim().is_empty())
                .map(|c| c.trim().to_string())
                .collect(),
        }
    }

    /// Splits `A::B::C` on the scope separator, ignoring separators that sit
    /// inside template argument lists.
    pub fn parse(qualified: &str) -> Self {
        Self::new(split_scopes(qualified))
    }

    pub fn components(&self) -> &[String] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn last(&self) -> Option<&str> {
        self.components.last().map(String::as_str)
    }

    pub fn child(&self, name: &str) -> QualifiedPath {
        let mut components = self.components.clone();
        components.push(name.to_string());
        Self::new(components)
    }

    pub fn split_last(&self) -> Option<(&str, QualifiedPath)> {
        let (last, rest) = self.components.split_last()?;
        Some((last.as_str(), Self { components: rest.to_vec() }))
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &str> + '_ {
        self.components.iter().map(String::as_str)
    }
}

impl fmt::Display for QualifiedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.components.join(SCOPE_SEPARATOR))
    }
}

/// A demangled signature split into its scope chain and its own name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecomposedName {
    pub qualifiers: QualifiedPath,
    /// Function name together with its parameter list, e.g. `bar(int)`.
    pub leaf: String,
}

impl DecomposedName {
    pub fn base_name(&self) -> &str {
        match find_parameter_list(&self.leaf) {
            Some(idx) => &self.leaf[..idx],
            None => &self.leaf,
        }
    }

    pub fn is_destructor(&self) -> bool {
        self.leaf.starts_with('~')
    }

    /// Qualified name without the parameter list.
    pub fn qualified_name(&self) -> String {
        if self.qualifiers.is_empty() {
            self.base_name().to_string()
        } else {
            format!("{}{}{}", self.qualifiers, SCOPE_SEPARATOR, self.base_name())
        }
    }
}

pub fn decompose(signature: &str) -> Result<DecomposedName, SymbolError> {
    let signature = signature.trim();
    let paren = find_parameter_list(signature)
        .ok_or_else(|| SymbolError::MissingParameterList(signature.to_string()))?;

    let mut components = split_scopes(&signature[..paren]);
    let name = loop {
        match components.pop() {
            Some(c) if c.trim().is_empty() => continue,
            Some(c) => break c.trim().to_string(),
            None => return Err(SymbolError::EmptyName(signature.to_string())),
        }
    };

    Ok(DecomposedName {
        qualifiers: QualifiedPath::new(components),
        leaf: format!("{}{}", name, &signature[paren..]),
    })
}

pub fn is_thunk(raw: &str) -> bool {
    raw.contains(THUNK_MARKER)
}

/// Byte index just past the symbol of an `operator` name starting at `idx`,
/// so `<`, `<<` and `()` in `operator<<(int)` are not read as brackets.
fn operator_token_end(signature: &str, idx: usize) -> Option<usize> {
    let rest = signature.get(idx..)?.strip_prefix(OPERATOR_KEYWORD)?;
    let before = signature.get(..idx)?;
    if !before.is_empty() && !before.ends_with(SCOPE_SEPARATOR) {
        return None;
    }

    let token = if rest.starts_with("()") {
        2
    } else {
        rest.find(|c: char| !OPERATOR_CHARS.contains(c)).unwrap_or(rest.len())
    };
    Some(idx + OPERATOR_KEYWORD.len() + token)
}

fn find_parameter_list(signature: &str) -> Option<usize> {
    let bytes = signature.as_bytes();
    let mut depth = 0usize;
    let mut idx = 0;

    while idx < bytes.len() {
        if let Some(end) = operator_token_end(signature, idx) {
            idx = end;
            continue;
        }
        match bytes[idx] {
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            b'(' if depth == 0 => return Some(idx),
            _ => {}
        }
        idx += 1;
    }
    None
}

fn split_scopes(qualified: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let bytes = qualified.as_bytes();
    let mut idx = 0;

    while idx < bytes.len() {
        if let Some(end) = operator_token_end(qualified, idx) {
            idx = end;
            continue;
        }
        match bytes[idx] {
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(idx + 1) == Some(&b':') => {
                parts.push(&qualified[start..idx]);
                idx += 2;
                start = idx;
                continue;
            }
            _ => {}
        }
        idx += 1;
    }
    parts.push(&qualified[start..]);

    parts
}
