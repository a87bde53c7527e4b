// Fri Oct 16 2026 - Alex

pub mod error;
pub mod extra;
pub mod header;
pub mod writer;

pub use error::OutputError;
pub use extra::extra_declarations;
pub use header::{header_path, include_guard, HeaderEmitter, RenderedHeader, DISCLAIMER};
pub use writer::OutputSink;
