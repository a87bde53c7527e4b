// Fri Oct 16 2026 - Alex

use crate::symbol::error::SymbolError;
use std::fs;
use std::path::Path;

pub const WEAK_MARKER: &str = "func,weak";

/// Linker map records that describe weakly bound functions.
#[derive(Debug, Clone, Default)]
pub struct WeakSymbolSet {
    lines: Vec<String>,
}

impl WeakSymbolSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lines = lines
            .into_iter()
            .filter(|l| l.as_ref().contains(WEAK_MARKER))
            .map(|l| l.as_ref().to_string())
            .collect();

        Self { lines }
    }

    pub fn load(path: &Path) -> Result<Self, SymbolError> {
        let contents = fs::read_to_string(path)?;
        let set = Self::from_lines(contents.lines());
        log::info!("Loaded {} weak records from {}", set.len(), path.display());
        Ok(set)
    }

    /// True when the raw mangled name occurs in any weak record.
    pub fn is_weak(&self, mangled: &str) -> bool {
        let mangled = mangled.trim();
        if mangled.is_empty() {
            return false;
        }
        self.lines.iter().any(|line| line.contains(mangled))
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
