use std::collections::BTreeMap;

use async_trait::async_trait;
use bson::{Bson, Document};
use dashmap::DashMap;

use super::{DocumentStore, StoreError, StoreResult};

/// Process-local store with the same matching rules as [`super::MongoStore`].
#[derive(Default)]
pub struct MemoryStore {
    collections: DashMap<String, BTreeMap<String, Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .get(collection)
            .map(|records| records.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }
}

fn matches(doc: &Document, field: &str, value: &Bson) -> bool {
    match doc.get(field) {
        Some(Bson::Array(items)) => items.contains(value),
        Some(other) => other == value,
        None => false,
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get_record(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        Ok(self
            .collections
            .get(collection)
            .and_then(|records| records.get(id).cloned()))
    }

    async fn list_where(
        &self,
        collection: &str,
        field: &str,
        value: Bson,
    ) -> StoreResult<Vec<Document>> {
        let Some(records) = self.collections.get(collection) else {
            return Ok(Vec::new());
        };
        Ok(records
            .values()
            .filter(|doc| matches(doc, field, &value))
            .cloned()
            .collect())
    }

    async fn set_record(&self, collection: &str, id: &str, value: Document) -> StoreResult<()> {
        let mut value = value;
        value.insert("_id", id);
        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), value);
        Ok(())
    }

    async fn update_record(
        &self,
        collection: &str,
        id: &str,
        partial: Document,
    ) -> StoreResult<()> {
        let not_found = || StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        };

        let mut records = self.collections.get_mut(collection).ok_or_else(not_found)?;
        let record = records.get_mut(id).ok_or_else(not_found)?;
        for (key, value) in partial {
            record.insert(key, value);
        }
        Ok(())
    }

    async fn delete_record(&self, collection: &str, id: &str) -> StoreResult<bool> {
        Ok(self
            .collections
            .get_mut(collection)
            .map(|mut records| records.remove(id).is_some())
            .unwrap_or(false))
    }
}
