//! Database configuration module for `BomBuddy`.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs without hand-written SQL.

use crate::entities::{CatalogItem, FgComponent, FinishedGood};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::{debug, info};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/bom_buddy.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable, falling back to
/// a local `SQLite` file.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    debug!(%database_url, "connecting to database");
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates all tables that do not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut catalog_table = schema.create_table_from_entity(CatalogItem);
    let mut finished_good_table = schema.create_table_from_entity(FinishedGood);
    let mut component_table = schema.create_table_from_entity(FgComponent);
    catalog_table.if_not_exists();
    finished_good_table.if_not_exists();
    component_table.if_not_exists();

    db.execute(builder.build(&catalog_table)).await?;
    db.execute(builder.build(&finished_good_table)).await?;
    db.execute(builder.build(&component_table)).await?;

    info!("database tables ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        catalog_item::Model as CatalogItemModel, fg_component::Model as FgComponentModel,
        finished_good::Model as FinishedGoodModel,
    };
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<CatalogItemModel> = CatalogItem::find().limit(1).all(&db).await?;
        let _: Vec<FinishedGoodModel> = FinishedGood::find().limit(1).all(&db).await?;
        let _: Vec<FgComponentModel> = FgComponent::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_repeatable() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }
}
