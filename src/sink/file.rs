//! File-backed sink

use crate::sink::error::{SinkError, SinkResult};
use crate::sink::traits::Sink;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Appends records to a file, one writer at a time
///
/// The file is opened once in create+append mode, so existing content is kept
/// and concurrent runs against the same path only ever append.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileSink {
    pub async fn open(path: impl AsRef<Path>) -> SinkResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| SinkError::io(&path, &e))?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Sink for FileSink {
    async fn write(&self, record: &str) -> SinkResult<()> {
        let mut file = self.file.lock().await;
        file.write_all(record.as_bytes())
            .await
            .map_err(|e| SinkError::io(&self.path, &e))?;
        file.flush().await.map_err(|e| SinkError::io(&self.path, &e))
    }
}
