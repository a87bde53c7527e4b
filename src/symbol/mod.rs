// Fri Oct 16 2026 - Alex

pub mod demangle;
pub mod error;
pub mod linker_map;
pub mod qualifier;
pub mod symbol_map;

pub use demangle::{CodeWarriorDemangler, Demangle, PassthroughDemangler};
pub use error::SymbolError;
pub use linker_map::WeakSymbolSet;
pub use qualifier::{decompose, is_thunk, DecomposedName, QualifiedPath};
pub use symbol_map::{scope_prefix, SymbolMap, SymbolMapEntry};
