use std::marker::PhantomData;
use std::sync::Arc;

use bson::{Bson, Document};
use octavian_db::{DocumentStore, StoreError};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum DaoError {
    #[error("Store error: {0}")]
    Store(StoreError),
    #[error("BSON serialization error: {0}")]
    BsonSer(#[from] bson::ser::Error),
    #[error("BSON deserialization error: {0}")]
    BsonDe(#[from] bson::de::Error),
    #[error("Entity not found")]
    NotFound,
}

impl From<StoreError> for DaoError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => DaoError::NotFound,
            other => DaoError::Store(other),
        }
    }
}

pub type DaoResult<T> = Result<T, DaoError>;

/// Typed view over one collection of a [`DocumentStore`].
pub struct BaseDao<T> {
    store: Arc<dyn DocumentStore>,
    collection: &'static str,
    _record: PhantomData<fn() -> T>,
}

impl<T> BaseDao<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(store: Arc<dyn DocumentStore>, collection: &'static str) -> Self {
        Self {
            store,
            collection,
            _record: PhantomData,
        }
    }

    pub async fn find_optional(&self, id: &str) -> DaoResult<Option<T>> {
        match self.store.get_record(self.collection, id).await? {
            Some(doc) => Ok(Some(bson::from_document(doc)?)),
            None => Ok(None),
        }
    }

    pub async fn find_where(&self, field: &str, value: impl Into<Bson>) -> DaoResult<Vec<T>> {
        let docs = self
            .store
            .list_where(self.collection, field, value.into())
            .await?;
        docs.into_iter()
            .map(|doc| bson::from_document(doc).map_err(DaoError::from))
            .collect()
    }

    pub async fn set(&self, id: &str, record: &T) -> DaoResult<()> {
        let doc = bson::to_document(record)?;
        self.store.set_record(self.collection, id, doc).await?;
        debug!(collection = self.collection, id, "Stored document");
        Ok(())
    }

    pub async fn update_by_id(&self, id: &str, partial: Document) -> DaoResult<()> {
        self.store
            .update_record(self.collection, id, partial)
            .await?;
        Ok(())
    }

    pub async fn delete_by_id(&self, id: &str) -> DaoResult<bool> {
        Ok(self.store.delete_record(self.collection, id).await?)
    }
}
