//! Record persistence.
//!
//! Records leave the crawler through a `RecordSink`. The default sink writes
//! JSON lines:
//!
//! ```text
//! {"region":"...","area_committee":"...","row_headers":[...],...,"md5":"..."}
//! {"region":"...","area_committee":"...","territory":"...",...}
//! ```

mod jsonl;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Record;

pub use jsonl::JsonLinesSink;

/// Destination for emitted records.
#[async_trait]
pub trait RecordSink: Send {
    /// Persist one record. Records are never modified after this call.
    async fn write(&mut self, record: &Record) -> Result<()>;

    /// Flush buffered records to the underlying storage.
    async fn flush(&mut self) -> Result<()>;
}
