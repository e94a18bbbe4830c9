//! Catalog item entity - Raw materials and semi-finished goods.
//!
//! Both kinds live in one table, told apart by `kind` ("rm" or "sfg"). Each item
//! carries the per-square-inch rate that BOM rows multiply by their cut area.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Catalog item database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "catalog_items")]
pub struct Model {
    /// Unique identifier for the item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Item kind code, `"rm"` or `"sfg"`
    pub kind: String,
    /// Name of the item (e.g., "Canvas 12oz", "Printed Panel")
    pub name: String,
    /// Cost per square inch, as decimal text
    pub sq_inch_rate: String,
    /// Soft delete flag - if true, item is hidden but BOM history still resolves
    pub is_deleted: bool,
    /// When the item was created
    pub created_at: DateTime,
    /// When the item was last modified
    pub updated_at: DateTime,
}

/// Catalog items are referenced from BOM components by kind and id, not by foreign key.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
