//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Raw material and semi-finished good catalog commands
pub mod catalog;

/// Finished good BOM and pricing commands
pub mod finished_good;

/// General utility commands
pub mod general;

// Export commands
pub use catalog::*;
pub use finished_good::*;
pub use general::*;
