//! # verde-core: Renewable Dataset Domain Model
//!
//! Core data structures and computations for the renewable-energy dashboard.
//!
//! ## Design Philosophy
//!
//! Datasets are plain polars `DataFrame`s wrapped with their logical name and
//! kept in a load-once [`Registry`]:
//! - The registry is populated at startup and never mutated afterwards, so
//!   request handlers read it concurrently without locking.
//! - Filter operations tolerate zero-or-more matches; `(Entity, Year)` is not
//!   unique in the source data and callers take the first matching row.
//! - All fallible operations return [`VerdeResult`] and the HTTP layer maps
//!   [`VerdeError`] variants onto status codes.
//!
//! ## Modules
//!
//! - [`dataset`] - Named tables, registry, and the query operations on them
//! - [`calculator`] - The solar-share calculation
//! - [`error`] - Unified error type
//!
//! ## Integration with verde-io
//!
//! The verde-io crate reads the configured CSV sources from disk and
//! constructs the [`Registry`] consumed here.

pub mod calculator;
pub mod dataset;
pub mod error;

pub use calculator::{
    calculate, CalculationRequest, ShareCalculation, SOLAR_DATASET, SOLAR_PCT_COLUMN,
    SOLAR_TWH_COLUMN,
};
pub use dataset::{first_f64, Dataset, Registry, ENTITY_COLUMN, YEAR_COLUMN};
pub use error::{VerdeError, VerdeResult};
