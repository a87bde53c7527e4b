// Fri Oct 16 2026 - Alex

pub mod config;
pub mod orchestration;
pub mod output;
pub mod structure;
pub mod symbol;
pub mod ui;

pub use config::Config;
pub use orchestration::{ReconstructionCoordinator, RunSummary, VtableSource};
pub use output::{HeaderEmitter, OutputSink, RenderedHeader};
pub use structure::{SlotClassifier, StructureRegistry, VtableDump, VtableLayout};
pub use symbol::{CodeWarriorDemangler, Demangle, QualifiedPath};
