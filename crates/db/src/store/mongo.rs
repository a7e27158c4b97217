use async_trait::async_trait;
use bson::{Bson, Document, doc};
use futures::TryStreamExt;
use mongodb::{Collection, Database};
use tracing::debug;

use super::{DocumentStore, StoreError, StoreResult};

pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.db.collection::<Document>(name)
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn get_record(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        Ok(self.collection(collection).find_one(doc! { "_id": id }).await?)
    }

    async fn list_where(
        &self,
        collection: &str,
        field: &str,
        value: Bson,
    ) -> StoreResult<Vec<Document>> {
        // Mongo matches array fields by membership for a scalar filter value.
        let mut filter = Document::new();
        filter.insert(field, value);

        let mut cursor = self
            .collection(collection)
            .find(filter)
            .sort(doc! { "_id": 1 })
            .await?;

        let mut results = Vec::new();
        while let Some(doc) = cursor.try_next().await? {
            results.push(doc);
        }
        Ok(results)
    }

    async fn set_record(&self, collection: &str, id: &str, value: Document) -> StoreResult<()> {
        let mut value = value;
        value.insert("_id", id);
        self.collection(collection)
            .replace_one(doc! { "_id": id }, value)
            .upsert(true)
            .await?;
        debug!(collection, id, "Record written");
        Ok(())
    }

    async fn update_record(
        &self,
        collection: &str,
        id: &str,
        partial: Document,
    ) -> StoreResult<()> {
        let result = self
            .collection(collection)
            .update_one(doc! { "_id": id }, doc! { "$set": partial })
            .await?;

        if result.matched_count == 0 {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn delete_record(&self, collection: &str, id: &str) -> StoreResult<bool> {
        let result = self
            .collection(collection)
            .delete_one(doc! { "_id": id })
            .await?;
        Ok(result.deleted_count > 0)
    }
}
