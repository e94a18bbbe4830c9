//! Finished good entity - A priced product and its cost inputs.
//!
//! The header row stores every line-level cost input alongside the derived unit
//! prices as decimal text; the consumed materials live in `fg_components`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Finished good database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "finished_goods")]
pub struct Model {
    /// Unique identifier for the finished good
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the finished good
    pub name: String,
    pub stitching: String,
    pub printing: String,
    pub others: String,
    pub rejection: String,
    pub qc: String,
    pub machine_maintainance: String,
    pub material_handling: String,
    pub packaging: String,
    pub shipping: String,
    pub company_over_head: String,
    pub indirect_expense: String,
    pub b2b: String,
    pub d2c: String,
    /// Derived standard unit price
    pub unit_rate: String,
    /// Derived B2B unit price
    pub unit_b2b_rate: String,
    /// Derived D2C unit price
    pub unit_d2c_rate: String,
    /// Soft delete flag
    pub is_deleted: bool,
    /// When the finished good was created
    pub created_at: DateTime,
    /// When the finished good was last modified
    pub updated_at: DateTime,
}

/// Defines relationships between `FinishedGood` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One finished good has many components
    #[sea_orm(has_many = "super::fg_component::Entity")]
    Components,
}

impl Related<super::fg_component::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Components.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
