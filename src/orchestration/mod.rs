// Fri Oct 16 2026 - Alex

pub mod coordinator;
pub mod discovery;

pub use coordinator::{FailedVtable, Reconstruction, ReconstructionCoordinator, RunSummary};
pub use discovery::{
    collect_console_input, discover_asm_files, scan_directory, scan_file, DiscoveryError, VtableSource,
};
