use mongodb::{Database, IndexModel, options::IndexOptions};
use tracing::info;

use crate::models::{Customer, SocialAccount};

pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    // Customers are queried by tenant membership
    create_indexes(
        db,
        Customer::COLLECTION,
        vec![index(bson::doc! { "past_activity": 1 })],
    )
    .await?;

    // Social accounts: one per platform per tenant
    create_indexes(
        db,
        SocialAccount::COLLECTION,
        vec![
            index_unique(bson::doc! { "tenant_id": 1, "platform": 1 }),
            index(bson::doc! { "tenant_id": 1, "secret_expiry": 1 }),
        ],
    )
    .await?;

    info!("MongoDB indexes ensured");
    Ok(())
}

async fn create_indexes(
    db: &Database,
    collection: &str,
    indexes: Vec<IndexModel>,
) -> Result<(), mongodb::error::Error> {
    db.collection::<bson::Document>(collection)
        .create_indexes(indexes)
        .await?;
    info!(collection, "Indexes created");
    Ok(())
}

fn index(keys: bson::Document) -> IndexModel {
    IndexModel::builder().keys(keys).build()
}

fn index_unique(keys: bson::Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
}
