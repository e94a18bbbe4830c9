//! Shared test utilities for `BomBuddy`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{
        catalog::{self, CatalogItem},
        costing::{BomLineItem, ItemKind, LineDefaults},
        finished_good,
        submission::build_submission,
    },
    entities,
    errors::Result,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a catalog item with a rate of 1.0 per square inch.
pub async fn create_test_item(
    db: &DatabaseConnection,
    kind: ItemKind,
    name: &str,
) -> Result<entities::catalog_item::Model> {
    catalog::create_item(db, kind, name.to_string(), dec!(1)).await
}

/// Creates a catalog item with a custom rate.
pub async fn create_custom_item(
    db: &DatabaseConnection,
    kind: ItemKind,
    name: &str,
    sq_inch_rate: Decimal,
) -> Result<entities::catalog_item::Model> {
    catalog::create_item(db, kind, name.to_string(), sq_inch_rate).await
}

/// Converts a stored catalog row into the view the BOM editor works with.
pub fn catalog_view(model: entities::catalog_item::Model) -> Result<CatalogItem> {
    CatalogItem::try_from(model)
}

/// Creates a finished good with default overheads and no materials.
pub async fn create_test_finished_good(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::finished_good::Model> {
    let line = BomLineItem::new(name, &LineDefaults::default());
    finished_good::create_finished_good(db, &build_submission(line)).await
}
