// Fri Oct 16 2026 - Alex

use crate::symbol::SymbolError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReconstructError {
    #[error("Malformed slot {index} `{line}`: {source}")]
    MalformedSlot {
        index: usize,
        line: String,
        #[source]
        source: SymbolError,
    },
    #[error("Vtable dump has no __vt__ label")]
    MissingLabel,
    #[error("Cannot resolve a class name from label: {0}")]
    UnresolvedLabel(String),
}
