//! Output sink
//!
//! Append-only destinations for formatted user records. Records from
//! different workers interleave in completion order; no ordering is implied.

pub mod api;
pub mod error;
pub mod file;
pub mod format;
pub mod memory;
pub mod traits;

pub use error::{SinkError, SinkResult};
pub use file::FileSink;
pub use format::RecordFormat;
pub use memory::MemorySink;
pub use traits::Sink;
