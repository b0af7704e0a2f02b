//! JSON-lines file sink.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::error::Result;
use crate::models::Record;
use crate::storage::RecordSink;

/// Appends one UTF-8 JSON object per line to a file.
pub struct JsonLinesSink {
    path: PathBuf,
    writer: BufWriter<File>,
    written: usize,
}

impl JsonLinesSink {
    /// Open `path` for appending, creating it and its parent directories.
    pub async fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        log::debug!("Writing records to {}", path.display());

        Ok(Self {
            path,
            writer: BufWriter::new(file),
            written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records written through this sink.
    pub fn written(&self) -> usize {
        self.written
    }
}

#[async_trait]
impl RecordSink for JsonLinesSink {
    async fn write(&mut self, record: &Record) -> Result<()> {
        let mut line = record.to_json_line()?;
        line.push('\n');
        self.writer.write_all(line.as_bytes()).await?;
        self.written += 1;
        Ok(())
    }

    async fn flush(&mut self) -> Result<()> {
        self.writer.flush().await?;
        Ok(())
    }
}
