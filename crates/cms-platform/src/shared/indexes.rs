//! MongoDB Index Initialization
//!
//! Creates indexes for all collections on application startup.

use mongodb::{bson::doc, options::IndexOptions, Database, IndexModel};
use tracing::info;

use crate::audit::AUDIT_LOG_COLLECTION;

/// Initialize all MongoDB indexes
pub async fn initialize_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    info!("Initializing MongoDB indexes...");

    create_page_indexes(db).await?;
    create_link_indexes(db).await?;
    create_tag_indexes(db).await?;
    create_sitemap_indexes(db).await?;
    create_audit_log_indexes(db).await?;

    info!("MongoDB indexes initialized successfully");
    Ok(())
}

async fn create_index(db: &Database, collection: &str, keys: mongodb::bson::Document) -> Result<(), mongodb::error::Error> {
    db.collection::<mongodb::bson::Document>(collection)
        .create_index(
            IndexModel::builder()
                .keys(keys)
                .options(IndexOptions::builder().background(true).build())
                .build(),
        )
        .await?;
    Ok(())
}

async fn create_page_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    // URL lookup
    create_index(db, "pages", doc! { "pageUrlHash": 1, "audit.isDeleted": 1 }).await?;
    // Translations
    create_index(db, "pages", doc! { "languageGroupIdentifier": 1, "title": 1 }).await?;
    create_index(db, "pages", doc! { "isMasterPage": 1 }).await?;

    info!("Created indexes on pages");
    Ok(())
}

async fn create_link_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    create_index(db, "master_pages", doc! { "pageId": 1 }).await?;
    create_index(db, "master_pages", doc! { "masterId": 1 }).await?;
    create_index(db, "page_contents", doc! { "pageId": 1, "order": 1 }).await?;

    info!("Created indexes on page links");
    Ok(())
}

async fn create_tag_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    create_index(db, "tags", doc! { "name": 1 }).await?;
    create_index(db, "tags", doc! { "normalizedName": 1 }).await?;
    create_index(db, "page_tags", doc! { "pageId": 1 }).await?;

    info!("Created indexes on tags");
    Ok(())
}

async fn create_sitemap_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    create_index(db, "sitemap_nodes", doc! { "pageId": 1 }).await?;
    create_index(db, "sitemap_nodes", doc! { "sitemapId": 1, "displayOrder": 1 }).await?;
    create_index(db, "sitemap_archives", doc! { "sitemapId": 1 }).await?;

    info!("Created indexes on sitemaps");
    Ok(())
}

async fn create_audit_log_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    create_index(db, AUDIT_LOG_COLLECTION, doc! { "entityType": 1, "entityId": 1 }).await?;
    create_index(db, AUDIT_LOG_COLLECTION, doc! { "performedAt": -1 }).await?;

    info!("Created indexes on audit logs");
    Ok(())
}
