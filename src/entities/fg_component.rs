//! Finished good component entity - One consumable BOM row.
//!
//! Only rows that passed the submission filter are stored. `position` keeps entry
//! order within each kind. Amounts are decimal text, see [`super::amount_to_text`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// BOM component database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fg_components")]
pub struct Model {
    /// Unique identifier for the component row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Finished good this row belongs to
    pub finished_good_id: i64,
    /// `"rm"` or `"sfg"`
    pub item_kind: String,
    /// Id of the consumed catalog item
    pub item_id: i64,
    /// Order within the finished good's rows of the same kind
    pub position: i32,
    /// Piece height in inches
    pub height: String,
    /// Piece width in inches
    pub width: String,
    /// Pieces per unit
    pub qty: String,
    /// Row cost at the time of saving
    pub rate: String,
}

/// Defines relationships between `FgComponent` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each component belongs to one finished good
    #[sea_orm(
        belongs_to = "super::finished_good::Entity",
        from = "Column::FinishedGoodId",
        to = "super::finished_good::Column::Id"
    )]
    FinishedGood,
}

impl Related<super::finished_good::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FinishedGood.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
