//! mg-core - Core library for migrato
//!
//! This crate provides the migration file model, the [`Catalog`] that
//! discovers and validates migration pairs on disk, the pure [`plan`]ner that
//! turns a [`Request`] into an ordered [`Schedule`], and the layered YAML
//! database configuration.

pub mod catalog;
pub mod config;
pub mod error;
pub mod migration;
pub mod planner;
pub mod version;

pub use catalog::Catalog;
pub use config::DatabaseSettings;
pub use error::{CoreError, CoreResult};
pub use migration::{Direction, MigrationFile, MigrationPair};
pub use planner::{plan, Plan, Request, Schedule};
pub use version::Version;
