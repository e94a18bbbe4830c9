//! Unified error types for `BomBuddy`.
//!
//! Every fallible operation in the crate returns [`Result`], so database, serialization
//! and Discord framework failures all funnel into one [`Error`] enum that the bot layer
//! can match on when deciding what to tell the user.

use rust_decimal::Decimal;
use thiserror::Error;

/// All errors that can occur in `BomBuddy`.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
    },

    /// User-supplied data failed a business rule (blank name, duplicate name, ...)
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable description of the problem
        message: String,
    },

    /// A monetary amount or rate was negative
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// No active raw material or semi-finished good matched
    #[error("Catalog item not found: {name}")]
    ItemNotFound {
        /// Name or id that was looked up
        name: String,
    },

    /// No active finished good matched
    #[error("Finished good not found: {name}")]
    FinishedGoodNotFound {
        /// Name or id that was looked up
        name: String,
    },

    /// A material row index was outside the BOM
    #[error("Material row {index} does not exist")]
    MaterialRowNotFound {
        /// Zero-based row index
        index: usize,
    },

    /// A field name did not match any editable BOM field
    #[error("Unknown field: {name}")]
    UnknownField {
        /// The unrecognized field name
        name: String,
    },

    /// An item kind other than `rm` or `sfg` was encountered
    #[error("Unknown item kind: {kind}")]
    UnknownItemKind {
        /// The unrecognized kind string
        kind: String,
    },

    /// A stored amount did not parse back into a decimal
    #[error("Stored amount '{value}' is not a decimal")]
    StoredAmount {
        /// The text found in the database
        value: String,
    },

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// JSON serialization of a submission failed
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Required environment variable missing
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Serenity/Poise framework error
    #[error("Serenity/Poise framework error: {0}")]
    #[allow(clippy::enum_variant_names)]
    FrameworkError(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::FrameworkError(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
