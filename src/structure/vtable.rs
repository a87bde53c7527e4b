// Fri Oct 16 2026 - Alex

use crate::structure::error::ReconstructError;
use crate::structure::layout::RTTI_WORDS;
use crate::symbol::is_thunk;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

pub const VTABLE_LABEL_PREFIX: &str = "__vt__";

/// Operand value of an abstract slot.
pub const PURE_VIRTUAL_OPERAND: &str = "0";

static OPERAND_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\.4byte\s+(?:"([^"]*)"|([^\s#]+))"#).expect("operand pattern compiles")
});

static ADDRESS_COMMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/\*.*?\*/\s*").expect("address comment pattern compiles"));

/// One operand of the table after the leading RTTI words were dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawSlot {
    Pure,
    Thunk(String),
    Symbol(String),
}

impl RawSlot {
    pub fn from_operand(operand: &str) -> Self {
        let operand = operand.trim().trim_matches('"');
        if operand == PURE_VIRTUAL_OPERAND {
            RawSlot::Pure
        } else if is_thunk(operand) {
            RawSlot::Thunk(operand.to_string())
        } else {
            RawSlot::Symbol(operand.to_string())
        }
    }
}

/// A `__vt__` label and the `.4byte` run that follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VtableDump {
    /// Mangled label without the trailing colon, e.g. `__vt__Q24Game3Foo`.
    pub label: String,
    /// Every operand, the two RTTI words included.
    pub operands: Vec<String>,
    /// The lines the dump was read from, kept for the header comment.
    pub source_lines: Vec<String>,
}

impl VtableDump {
    pub fn from_operands<I, S>(label: &str, operands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let operands: Vec<String> = operands.into_iter().map(Into::into).collect();
        let mut source_lines = vec![format!("{}:", label)];
        source_lines.extend(operands.iter().map(|op| format!(".4byte {}", op)));

        Self {
            label: label.to_string(),
            operands,
            source_lines,
        }
    }

    /// Parses the first vtable block found in `text`.
    pub fn parse(text: &str) -> Result<Self, ReconstructError> {
        Self::parse_all(text)
            .into_iter()
            .next()
            .ok_or(ReconstructError::MissingLabel)
    }

    /// Parses every vtable block in an assembly listing.
    pub fn parse_all(text: &str) -> Vec<Self> {
        let mut dumps = Vec::new();
        let mut lines = text.lines().peekable();

        while let Some(line) = lines.next() {
            let Some(label) = label_of(line) else {
                continue;
            };

            let mut dump = VtableDump {
                label: label.to_string(),
                operands: Vec::new(),
                source_lines: vec![line.to_string()],
            };

            while let Some(next) = lines.peek() {
                match operand_of(next) {
                    Some(operand) => {
                        dump.operands.push(operand);
                        dump.source_lines.push(next.to_string());
                        lines.next();
                    }
                    None => break,
                }
            }

            dumps.push(dump);
        }

        dumps
    }

    /// The label with its `__vt__` prefix removed.
    pub fn mangled_class(&self) -> &str {
        self.label
            .strip_prefix(VTABLE_LABEL_PREFIX)
            .unwrap_or(&self.label)
    }

    /// Virtual slots paired with their logical index; index 0 is the first
    /// operand after the RTTI words.
    pub fn slots(&self) -> impl Iterator<Item = (usize, RawSlot)> + '_ {
        self.operands
            .iter()
            .skip(RTTI_WORDS)
            .enumerate()
            .map(|(index, operand)| (index, RawSlot::from_operand(operand)))
    }

    pub fn slot_count(&self) -> usize {
        self.operands.len().saturating_sub(RTTI_WORDS)
    }
}

impl fmt::Display for VtableDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} slots)", self.label, self.slot_count())
    }
}

/// Returns the label name when `line` opens a vtable block.
pub fn label_of(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    let label = trimmed.strip_suffix(':')?.trim_matches('"');
    if label.starts_with(VTABLE_LABEL_PREFIX) && label.len() > VTABLE_LABEL_PREFIX.len() {
        Some(label)
    } else {
        None
    }
}

/// Returns the operand of a `.4byte` directive, ignoring a leading
/// `/* address */` comment some disassemblers emit.
pub fn operand_of(line: &str) -> Option<String> {
    let trimmed = line.trim();
    let trimmed = ADDRESS_COMMENT_RE.replace(trimmed, "");
    let captures = OPERAND_RE.captures(trimmed.as_ref())?;
    captures
        .get(1)
        .or_else(|| captures.get(2))
        .map(|m| m.as_str().to_string())
}
