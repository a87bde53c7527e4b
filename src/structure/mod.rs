// Fri Oct 16 2026 - Alex

pub mod classifier;
pub mod error;
pub mod layout;
pub mod registry;
pub mod repair;
pub mod slot;
pub mod vtable;

pub use classifier::{Classification, SlotClassifier};
pub use error::ReconstructError;
pub use layout::{VtableLayout, RTTI_WORDS};
pub use registry::{Structure, StructureRegistry};
pub use repair::{repair_offsets, RepairReport};
pub use slot::{format_offset, VirtualSlot};
pub use vtable::{RawSlot, VtableDump};
