//! Core business logic - framework-agnostic costing, catalog and persistence.
//!
//! `costing`, `input`, `submission` and `report` are pure and synchronous. `catalog`
//! and `finished_good` talk to the database through SeaORM.

pub mod catalog;
pub mod costing;
pub mod finished_good;
pub mod input;
pub mod report;
pub mod submission;
