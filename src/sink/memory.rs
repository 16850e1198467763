//! In-memory sink

use crate::core::sync::handle_mutex_poison;
use crate::sink::error::{SinkError, SinkResult};
use crate::sink::traits::Sink;
use async_trait::async_trait;
use std::sync::Mutex;

/// Collects records in memory, in write order
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything written so far
    pub fn records(&self) -> SinkResult<Vec<String>> {
        let records = handle_mutex_poison(self.records.lock(), |message| {
            SinkError::Poisoned { message }
        })?;
        Ok(records.clone())
    }
}

#[async_trait]
impl Sink for MemorySink {
    async fn write(&self, record: &str) -> SinkResult<()> {
        let mut records = handle_mutex_poison(self.records.lock(), |message| {
            SinkError::Poisoned { message }
        })?;
        records.push(record.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_in_write_order() {
        let sink = MemorySink::new();
        sink.write("a\n").await.unwrap();
        sink.write("b\n").await.unwrap();
        assert_eq!(sink.records().unwrap(), vec!["a\n", "b\n"]);
    }
}
