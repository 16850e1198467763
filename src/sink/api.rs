//! Sink API

pub use crate::sink::error::{SinkError, SinkResult};
pub use crate::sink::file::FileSink;
pub use crate::sink::format::RecordFormat;
pub use crate::sink::memory::MemorySink;
pub use crate::sink::traits::Sink;
