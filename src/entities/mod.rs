//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod catalog_item;
pub mod fg_component;
pub mod finished_good;

// Re-export specific types to avoid conflicts
pub use catalog_item::{
    Column as CatalogItemColumn, Entity as CatalogItem, Model as CatalogItemModel,
};
pub use fg_component::{
    Column as FgComponentColumn, Entity as FgComponent, Model as FgComponentModel,
};
pub use finished_good::{
    Column as FinishedGoodColumn, Entity as FinishedGood, Model as FinishedGoodModel,
};

use crate::errors::{Error, Result};
use rust_decimal::Decimal;

/// Decimal amounts are stored as text: SQLite would otherwise hand them back as
/// `REAL`, dropping digits past f64 precision and the scale.
#[must_use]
pub fn amount_to_text(amount: Decimal) -> String {
    amount.to_string()
}

/// Parses an amount written by [`amount_to_text`].
///
/// # Errors
/// Returns [`Error::StoredAmount`] if the text is not an exact decimal.
pub fn amount_from_text(text: &str) -> Result<Decimal> {
    Decimal::from_str_exact(text).map_err(|_| Error::StoredAmount {
        value: text.to_string(),
    })
}
