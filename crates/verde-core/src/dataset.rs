//! Named tables and the load-once registry they live in.
//!
//! A [`Dataset`] wraps one CSV source as a polars [`DataFrame`] together with
//! its logical name ("Solar", "Eólica", ...). The [`Registry`] keeps datasets
//! in insertion order, which is also the order table fragments are rendered
//! in. `(Entity, Year)` is not guaranteed unique within a dataset, so filter
//! operations return zero-or-more rows and callers take the first match.

use std::collections::BTreeSet;

use polars::prelude::*;

use crate::error::{VerdeError, VerdeResult};

/// Column holding the country/region identifier in every source dataset.
pub const ENTITY_COLUMN: &str = "Entity";
/// Column holding the observation year.
pub const YEAR_COLUMN: &str = "Year";

/// A named table loaded from one CSV source.
#[derive(Debug, Clone)]
pub struct Dataset {
    name: String,
    frame: DataFrame,
}

impl Dataset {
    pub fn new(name: impl Into<String>, frame: DataFrame) -> Self {
        Self {
            name: name.into(),
            frame,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Rows where `Entity == country`.
    pub fn filter_country(&self, country: &str) -> VerdeResult<DataFrame> {
        let mask = self.frame.column(ENTITY_COLUMN)?.utf8()?.equal(country);
        Ok(self.frame.filter(&mask)?)
    }

    /// Rows where `Entity == country && Year == year`.
    pub fn filter_country_year(&self, country: &str, year: i64) -> VerdeResult<DataFrame> {
        let entity_mask = self.frame.column(ENTITY_COLUMN)?.utf8()?.equal(country);
        let years = self.frame.column(YEAR_COLUMN)?.cast(&DataType::Int64)?;
        let year_mask = years.i64()?.equal(year);
        Ok(self.frame.filter(&(entity_mask & year_mask))?)
    }

    /// Rows where `Year == year`.
    pub fn filter_year(&self, year: i64) -> VerdeResult<DataFrame> {
        let years = self.frame.column(YEAR_COLUMN)?.cast(&DataType::Int64)?;
        let mask = years.i64()?.equal(year);
        Ok(self.frame.filter(&mask)?)
    }

    /// Maximum value of the `Year` column, `None` when the table is empty.
    pub fn max_year(&self) -> VerdeResult<Option<i64>> {
        let years = self.frame.column(YEAR_COLUMN)?.cast(&DataType::Int64)?;
        let max = years.i64()?.max();
        Ok(max)
    }

    /// Sorted distinct `Entity` values.
    pub fn entities(&self) -> VerdeResult<Vec<String>> {
        let entities = self.frame.column(ENTITY_COLUMN)?.utf8()?;
        let unique: BTreeSet<String> = entities.into_iter().flatten().map(String::from).collect();
        Ok(unique.into_iter().collect())
    }
}

/// First-row value of a numeric column, cast to f64.
pub fn first_f64(frame: &DataFrame, column: &str) -> VerdeResult<f64> {
    let values = frame.column(column)?.cast(&DataType::Float64)?;
    values
        .f64()?
        .get(0)
        .ok_or_else(|| VerdeError::Calculation(format!("la columna '{column}' no tiene valores")))
}

/// Insertion-ordered collection of named datasets.
///
/// Populated once at startup and read-only afterwards; handlers share it
/// behind an `Arc` without locking.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    datasets: Vec<Dataset>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a dataset, replacing any previous one with the same name.
    pub fn insert(&mut self, dataset: Dataset) {
        if let Some(existing) = self.datasets.iter_mut().find(|d| d.name() == dataset.name()) {
            *existing = dataset;
        } else {
            self.datasets.push(dataset);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dataset> {
        self.datasets.iter()
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}
