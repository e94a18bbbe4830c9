//! Catalog business logic - raw materials and semi-finished goods.
//!
//! Catalog items are what BOM rows consume. Each one carries a per-square-inch rate
//! that a row multiplies by its cut area and quantity. Items are soft deleted so
//! finished goods that already reference them keep resolving.

use crate::{
    core::costing::{ItemKind, ItemRef},
    entities::{CatalogItem as CatalogItemEntity, amount_from_text, amount_to_text, catalog_item},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::HashMap;
use tracing::{info, instrument};

/// Kind-agnostic view of a catalog item, as the BOM editor needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    /// Kind and id
    pub item: ItemRef,
    /// Display name
    pub name: String,
    /// Cost per square inch
    pub sq_inch_rate: Decimal,
}

impl TryFrom<catalog_item::Model> for CatalogItem {
    type Error = Error;

    fn try_from(model: catalog_item::Model) -> Result<Self> {
        Ok(Self {
            item: ItemRef {
                kind: model.kind.parse()?,
                id: model.id,
            },
            name: model.name,
            sq_inch_rate: amount_from_text(&model.sq_inch_rate)?,
        })
    }
}

fn validate(name: &str, sq_inch_rate: Decimal) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Item name cannot be empty".to_string(),
        });
    }
    if sq_inch_rate < Decimal::ZERO {
        return Err(Error::InvalidAmount {
            amount: sq_inch_rate,
        });
    }
    Ok(())
}

/// Retrieves all active items of one kind, ordered alphabetically by name.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_all_active_items(
    db: &DatabaseConnection,
    kind: ItemKind,
) -> Result<Vec<catalog_item::Model>> {
    CatalogItemEntity::find()
        .filter(catalog_item::Column::Kind.eq(kind.as_str()))
        .filter(catalog_item::Column::IsDeleted.eq(false))
        .order_by_asc(catalog_item::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an active item of one kind by name.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_item_by_name<C>(
    db: &C,
    kind: ItemKind,
    name: &str,
) -> Result<Option<catalog_item::Model>>
where
    C: ConnectionTrait,
{
    CatalogItemEntity::find()
        .filter(catalog_item::Column::Kind.eq(kind.as_str()))
        .filter(catalog_item::Column::Name.eq(name.trim()))
        .filter(catalog_item::Column::IsDeleted.eq(false))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds an active item by name, trying raw materials before semi-finished goods.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn find_item_by_name(db: &DatabaseConnection, name: &str) -> Result<Option<CatalogItem>> {
    for kind in [ItemKind::RawMaterial, ItemKind::SemiFinishedGood] {
        if let Some(model) = get_item_by_name(db, kind, name).await? {
            return CatalogItem::try_from(model).map(Some);
        }
    }
    Ok(None)
}

/// Looks up an item by reference, including soft-deleted items.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_item(db: &DatabaseConnection, item: ItemRef) -> Result<Option<catalog_item::Model>> {
    CatalogItemEntity::find_by_id(item.id)
        .filter(catalog_item::Column::Kind.eq(item.kind.as_str()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Current square-inch rates of every active item, keyed by reference.
///
/// # Errors
/// Returns an error if the database query fails or a stored kind is unknown.
pub async fn get_active_rates(db: &DatabaseConnection) -> Result<HashMap<ItemRef, Decimal>> {
    CatalogItemEntity::find()
        .filter(catalog_item::Column::IsDeleted.eq(false))
        .all(db)
        .await?
        .into_iter()
        .map(|model| CatalogItem::try_from(model).map(|item| (item.item, item.sq_inch_rate)))
        .collect()
}

/// Names of every item ever created, deleted ones included, for display.
///
/// # Errors
/// Returns an error if the database query fails or a stored kind is unknown.
pub async fn get_item_names(db: &DatabaseConnection) -> Result<HashMap<ItemRef, String>> {
    CatalogItemEntity::find()
        .all(db)
        .await?
        .into_iter()
        .map(|model| CatalogItem::try_from(model).map(|item| (item.item, item.name)))
        .collect()
}

/// Creates a catalog item after validating its name and rate.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or whitespace-only
/// - An active item of the same kind already has this name
/// - The rate is negative
/// - The database insert fails
///
/// The duplicate check and the insert share one transaction.
#[instrument(skip(db))]
pub async fn create_item(
    db: &DatabaseConnection,
    kind: ItemKind,
    name: String,
    sq_inch_rate: Decimal,
) -> Result<catalog_item::Model> {
    validate(&name, sq_inch_rate)?;

    let txn = db.begin().await?;
    if get_item_by_name(&txn, kind, &name).await?.is_some() {
        return Err(Error::Validation {
            message: format!("A {} named '{}' already exists", kind.label(), name.trim()),
        });
    }

    let now = chrono::Utc::now().naive_utc();
    let item = catalog_item::ActiveModel {
        kind: Set(kind.as_str().to_string()),
        name: Set(name.trim().to_string()),
        sq_inch_rate: Set(amount_to_text(sq_inch_rate)),
        is_deleted: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let created = item.insert(&txn).await?;
    txn.commit().await?;
    info!(id = created.id, kind = %kind, "catalog item created");
    Ok(created)
}

async fn find_active(db: &DatabaseConnection, item: ItemRef) -> Result<catalog_item::ActiveModel> {
    let model = get_item(db, item)
        .await?
        .filter(|model| !model.is_deleted)
        .ok_or_else(|| Error::ItemNotFound {
            name: format!("{}#{}", item.kind, item.id),
        })?;
    Ok(model.into())
}

/// Changes an item's square-inch rate.
///
/// Finished goods pick the new rate up the next time they are loaded and saved.
///
/// # Errors
/// Returns an error if the rate is negative, the item does not exist or is deleted,
/// or the database update fails.
#[instrument(skip(db))]
pub async fn update_item_rate(
    db: &DatabaseConnection,
    item: ItemRef,
    sq_inch_rate: Decimal,
) -> Result<catalog_item::Model> {
    if sq_inch_rate < Decimal::ZERO {
        return Err(Error::InvalidAmount {
            amount: sq_inch_rate,
        });
    }

    let mut active = find_active(db, item).await?;
    active.sq_inch_rate = Set(amount_to_text(sq_inch_rate));
    active.updated_at = Set(chrono::Utc::now().naive_utc());
    active.update(db).await.map_err(Into::into)
}

/// Soft deletes an item.
///
/// # Errors
/// Returns an error if the item does not exist or is already deleted, or the
/// database update fails.
#[instrument(skip(db))]
pub async fn delete_item(db: &DatabaseConnection, item: ItemRef) -> Result<catalog_item::Model> {
    let mut active = find_active(db, item).await?;
    active.is_deleted = Set(true);
    active.updated_at = Set(chrono::Utc::now().naive_utc());
    active.update(db).await.map_err(Into::into)
}
