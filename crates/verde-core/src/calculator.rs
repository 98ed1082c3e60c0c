//! Solar-share calculation over the "Solar" dataset.
//!
//! Given a country, a consumption figure and an optional year, looks up the
//! matching Solar row and reports which share of the consumption comes from
//! solar energy, as a number and as the formatted result sentence.

use serde::Serialize;

use crate::dataset::{first_f64, Registry};
use crate::error::{VerdeError, VerdeResult};

/// Logical name of the dataset the calculator reads from.
pub const SOLAR_DATASET: &str = "Solar";
/// Solar electricity generated, in terawatt-hours.
pub const SOLAR_TWH_COLUMN: &str = "Electricity from solar (TWh)";
/// Solar share of primary energy, as a percentage.
pub const SOLAR_PCT_COLUMN: &str = "Solar (% equivalent primary energy)";

/// A validated calculation request.
#[derive(Debug, Clone)]
pub struct CalculationRequest {
    pub country: String,
    /// User-supplied consumption figure; must be positive.
    pub consumption: f64,
    /// `None` selects the most recent year in the Solar dataset.
    pub year: Option<i64>,
}

/// Outcome of a share calculation.
#[derive(Debug, Clone, Serialize)]
pub struct ShareCalculation {
    pub country: String,
    /// The year the lookup resolved to.
    pub year: i64,
    /// Solar electricity for that row, in TWh.
    pub solar_twh: f64,
    /// Solar share of the consumption, rounded to two decimals.
    pub share: f64,
    /// Formatted result sentence.
    pub sentence: String,
}

/// Computes the solar share of `request.consumption` for one country/year.
///
/// Fails with `Validation` on an empty country or non-positive consumption,
/// `NotFound` when no Solar row matches, and `Calculation` when the Solar
/// dataset itself is unavailable or a column read goes wrong.
pub fn calculate(registry: &Registry, request: &CalculationRequest) -> VerdeResult<ShareCalculation> {
    if request.country.trim().is_empty() || request.consumption <= 0.0 {
        return Err(VerdeError::Validation(
            "Debe seleccionar un país e ingresar el consumo".into(),
        ));
    }

    let solar = registry.get(SOLAR_DATASET).ok_or_else(|| {
        VerdeError::Calculation(format!("el conjunto de datos '{SOLAR_DATASET}' no está cargado"))
    })?;

    let year = match request.year {
        Some(year) => year,
        None => solar.max_year()?.ok_or_else(|| {
            VerdeError::Calculation(format!("'{SOLAR_DATASET}' no contiene años"))
        })?,
    };

    let rows = solar.filter_country_year(&request.country, year)?;
    if rows.height() == 0 {
        return Err(VerdeError::NotFound("No hay datos para este país y año".into()));
    }

    let solar_twh = first_f64(&rows, SOLAR_TWH_COLUMN)?;
    let pct = first_f64(&rows, SOLAR_PCT_COLUMN)?;

    // Round-trips through the consumption figure; the share reduces to the
    // stored percentage. Kept as two steps.
    let energy_used = request.consumption * (pct / 100.0);
    let share = (energy_used / request.consumption) * 100.0;
    let share = (share * 100.0).round() / 100.0;

    let sentence = format!(
        "Para {} en {}, el {:.2}% de su consumo proviene de energía solar.",
        request.country, year, share
    );

    Ok(ShareCalculation {
        country: request.country.clone(),
        year,
        solar_twh,
        share,
        sentence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Dataset, ENTITY_COLUMN, YEAR_COLUMN};
    use polars::prelude::*;

    fn registry() -> Registry {
        let frame = df![
            ENTITY_COLUMN => &["Chile", "Chile", "France"],
            YEAR_COLUMN => &[2019i64, 2020, 2020],
            SOLAR_TWH_COLUMN => &[4.0, 5.0, 12.5],
            SOLAR_PCT_COLUMN => &[6.25, 8.5, 3.1],
        ]
        .unwrap();
        let mut registry = Registry::new();
        registry.insert(Dataset::new(SOLAR_DATASET, frame));
        registry
    }

    fn request(country: &str, consumption: f64, year: Option<i64>) -> CalculationRequest {
        CalculationRequest {
            country: country.to_string(),
            consumption,
            year,
        }
    }

    #[test]
    fn share_equals_stored_percentage() {
        let result = calculate(&registry(), &request("Chile", 1000.0, Some(2020))).unwrap();
        assert_eq!(result.share, 8.5);
        assert_eq!(result.solar_twh, 5.0);
        assert_eq!(result.year, 2020);
    }

    #[test]
    fn share_is_independent_of_consumption() {
        let small = calculate(&registry(), &request("Chile", 1.0, Some(2020))).unwrap();
        let large = calculate(&registry(), &request("Chile", 100000.0, Some(2020))).unwrap();
        assert_eq!(small.share, large.share);
    }

    #[test]
    fn sentence_embeds_country_year_and_share() {
        let result = calculate(&registry(), &request("Chile", 1000.0, Some(2020))).unwrap();
        assert_eq!(
            result.sentence,
            "Para Chile en 2020, el 8.50% de su consumo proviene de energía solar."
        );
    }

    #[test]
    fn empty_country_fails_validation() {
        let err = calculate(&registry(), &request("", 10.0, None)).unwrap_err();
        assert!(matches!(err, VerdeError::Validation(_)));
    }

    #[test]
    fn non_positive_consumption_fails_validation() {
        let err = calculate(&registry(), &request("Chile", 0.0, None)).unwrap_err();
        assert!(matches!(err, VerdeError::Validation(_)));
        let err = calculate(&registry(), &request("Chile", -3.0, None)).unwrap_err();
        assert!(matches!(err, VerdeError::Validation(_)));
    }

    #[test]
    fn unknown_country_is_not_found() {
        let err = calculate(&registry(), &request("Nonexistent", 10.0, None)).unwrap_err();
        assert!(matches!(err, VerdeError::NotFound(_)));
    }

    #[test]
    fn missing_year_defaults_to_most_recent() {
        let result = calculate(&registry(), &request("Chile", 10.0, None)).unwrap();
        assert_eq!(result.year, 2020);
        assert_eq!(result.share, 8.5);
    }

    #[test]
    fn year_without_rows_is_not_found() {
        let err = calculate(&registry(), &request("Chile", 10.0, Some(1990))).unwrap_err();
        assert!(matches!(err, VerdeError::NotFound(_)));
    }

    #[test]
    fn missing_solar_dataset_is_a_calculation_error() {
        let err = calculate(&Registry::new(), &request("Chile", 10.0, None)).unwrap_err();
        assert!(matches!(err, VerdeError::Calculation(_)));
    }

    #[test]
    fn result_serializes_to_json() {
        let result = calculate(&registry(), &request("Chile", 1000.0, Some(2020))).unwrap();
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"share\":8.5"));
        assert!(json.contains("\"year\":2020"));
    }

    #[test]
    fn first_matching_row_wins_on_duplicates() {
        let frame = df![
            ENTITY_COLUMN => &["Chile", "Chile"],
            YEAR_COLUMN => &[2020i64, 2020],
            SOLAR_TWH_COLUMN => &[5.0, 99.0],
            SOLAR_PCT_COLUMN => &[8.5, 50.0],
        ]
        .unwrap();
        let mut registry = Registry::new();
        registry.insert(Dataset::new(SOLAR_DATASET, frame));
        let result = calculate(&registry, &request("Chile", 10.0, Some(2020))).unwrap();
        assert_eq!(result.share, 8.5);
        assert_eq!(result.solar_twh, 5.0);
    }
}
