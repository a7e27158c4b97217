//! Generic async record store the console reads and writes through.
//!
//! Records are BSON documents addressed by `(collection, id)`. The id is
//! always stored under `_id`.

mod memory;
mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

use async_trait::async_trait;
use bson::{Bson, Document};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    #[error("Record {collection}/{id} not found")]
    NotFound { collection: String, id: String },
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Single-record fetch. `Ok(None)` when the record does not exist.
    async fn get_record(&self, collection: &str, id: &str) -> StoreResult<Option<Document>>;

    /// Records whose `field` equals `value`, or contains it when the field is an array.
    async fn list_where(
        &self,
        collection: &str,
        field: &str,
        value: Bson,
    ) -> StoreResult<Vec<Document>>;

    /// Create or fully replace a record.
    async fn set_record(&self, collection: &str, id: &str, value: Document) -> StoreResult<()>;

    /// Merge `partial` into an existing record. Fails with `NotFound` when missing.
    async fn update_record(
        &self,
        collection: &str,
        id: &str,
        partial: Document,
    ) -> StoreResult<()>;

    /// Returns whether a record was removed. Deleting a missing record is not an error.
    async fn delete_record(&self, collection: &str, id: &str) -> StoreResult<bool>;
}
