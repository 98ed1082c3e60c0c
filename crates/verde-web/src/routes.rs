//! Request handlers and the error-to-status mapping.

use std::fmt::Write as _;
use std::sync::Arc;

use axum::{
    extract::{Extension, Form},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use verde_core::{CalculationRequest, Registry, VerdeError, VerdeResult, SOLAR_DATASET};
use verde_viz::{escape_html, render_bar_chart, render_capacity_overview, render_pie_chart, render_table};

pub struct AppState {
    pub registry: Registry,
}

/// Raw `POST /calculate` form fields. Everything arrives as optional strings
/// and is validated server-side.
#[derive(Deserialize)]
pub struct CalculateForm {
    pub country: Option<String>,
    pub consumption: Option<String>,
    pub year: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct CalculateResponse {
    pub resultado: String,
    pub tabla_html: String,
    pub graph_barras_html: String,
    pub graph_pie_html: String,
}

/// Wraps [`VerdeError`] with the HTTP mapping: validation and lookup
/// failures are client errors, everything else is a server error.
#[derive(Debug)]
pub struct ApiError(VerdeError);

impl From<VerdeError> for ApiError {
    fn from(err: VerdeError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            VerdeError::Validation(message) | VerdeError::NotFound(message) => {
                (StatusCode::BAD_REQUEST, message)
            }
            VerdeError::Calculation(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error en el cálculo: {message}"),
            ),
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error en el cálculo: {other}"),
            ),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// `GET /`: country selector, calculation form, and the full table.
pub async fn index(Extension(state): Extension<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    let countries = match state.registry.get(SOLAR_DATASET) {
        Some(solar) => solar.entities()?,
        None => Vec::new(),
    };
    let table = render_table(&state.registry, None)?;
    Ok(Html(index_page(&countries, &table)))
}

/// `POST /calculate`: the full compute-and-render pipeline for one request.
pub async fn calculate(
    Extension(state): Extension<Arc<AppState>>,
    Form(form): Form<CalculateForm>,
) -> Result<Json<CalculateResponse>, ApiError> {
    let request = parse_request(&form)?;
    let calculation = verde_core::calculate(&state.registry, &request)?;
    let tabla_html = render_table(&state.registry, Some(&request.country))?;
    let graph_barras_html = render_bar_chart(&state.registry, &request.country)?;
    let graph_pie_html = render_pie_chart(&state.registry, &request.country)?;

    Ok(Json(CalculateResponse {
        resultado: calculation.sentence,
        tabla_html,
        graph_barras_html,
        graph_pie_html,
    }))
}

/// `GET /capacidad`: installed-capacity overview for the latest year.
pub async fn capacity_overview(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let fragment = render_capacity_overview(&state.registry)?;
    let content_type = if fragment.starts_with("<svg") {
        "image/svg+xml"
    } else {
        "text/html; charset=utf-8"
    };
    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .body(fragment.into())
        .unwrap())
}

fn parse_request(form: &CalculateForm) -> VerdeResult<CalculationRequest> {
    let country = form.country.clone().unwrap_or_default();
    // An absent consumption falls through to the validation check; a present
    // but non-numeric one is an unexpected failure.
    let consumption = match form.consumption.as_deref() {
        None => 0.0,
        Some(raw) => raw.trim().parse::<f64>().map_err(|_| {
            VerdeError::Calculation(format!("valor de consumo no válido: '{raw}'"))
        })?,
    };
    let year = form.year.as_deref().and_then(parse_year);
    Ok(CalculationRequest {
        country,
        consumption,
        year,
    })
}

/// A blank or non-numeric year means "use the most recent one".
fn parse_year(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="es">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Panel de Energía Renovable</title>
<style>
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 0; padding: 20px; background: #f5f5f5; }
.container { max-width: 1100px; margin: 0 auto; background: white; padding: 30px; border-radius: 8px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
h1 { color: #333; border-bottom: 3px solid #00cc96; padding-bottom: 10px; }
h3 { color: #666; }
form { margin: 20px 0; display: flex; gap: 12px; flex-wrap: wrap; align-items: end; }
label { display: block; font-size: 13px; color: #555; }
input, select { padding: 6px 8px; border: 1px solid #ccc; border-radius: 4px; }
button { padding: 8px 16px; background: #00cc96; color: white; border: none; border-radius: 4px; cursor: pointer; }
#resultado { font-weight: 600; }
table.table { border-collapse: collapse; width: 100%; margin-bottom: 24px; }
table.table th, table.table td { border: 1px solid #ddd; padding: 6px 10px; text-align: left; font-size: 13px; }
table.table-striped tbody tr:nth-child(odd) { background: #fafafa; }
</style>
</head>
<body>
<div class="container">
<h1>Panel de Energía Renovable</h1>
<form id="solarForm">
<div><label for="pais">País</label>
"#;

const PAGE_FORM_TAIL: &str = r#"</div>
<div><label for="consumo">Consumo (kWh)</label>
<input type="text" id="consumo" name="consumption"></div>
<div><label for="year">Año (opcional)</label>
<input type="text" id="year" name="year"></div>
<button type="submit">Calcular</button>
</form>
<p id="resultado"></p>
<div id="graficos"></div>
"#;

const PAGE_SCRIPT: &str = r#"</div>
<script>
document.getElementById('solarForm').addEventListener('submit', async (event) => {
  event.preventDefault();
  const body = new URLSearchParams(new FormData(event.target));
  const response = await fetch('/calculate', { method: 'POST', body });
  const data = await response.json();
  if (!response.ok) {
    document.getElementById('resultado').textContent = data.error;
    return;
  }
  document.getElementById('resultado').textContent = data.resultado;
  document.getElementById('graficos').innerHTML = data.graph_barras_html + data.graph_pie_html;
  document.getElementById('tabla').innerHTML = data.tabla_html;
});
</script>
</body>
</html>
"#;

fn index_page(countries: &[String], table: &str) -> String {
    let mut page = String::from(PAGE_HEAD);
    page.push_str("<select id=\"pais\" name=\"country\">\n");
    page.push_str("<option value=\"\">Seleccione un país</option>\n");
    for country in countries {
        let escaped = escape_html(country);
        let _ = writeln!(page, "<option value=\"{escaped}\">{escaped}</option>");
    }
    page.push_str("</select>");
    page.push_str(PAGE_FORM_TAIL);
    page.push_str("<div id=\"tabla\">\n");
    page.push_str(table);
    page.push_str("</div>\n");
    page.push_str(PAGE_SCRIPT);
    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;
    use verde_core::{Dataset, ENTITY_COLUMN, SOLAR_PCT_COLUMN, SOLAR_TWH_COLUMN, YEAR_COLUMN};

    fn state() -> Extension<Arc<AppState>> {
        let solar = df![
            ENTITY_COLUMN => &["Chile", "Chile", "France"],
            YEAR_COLUMN => &[2019i64, 2020, 2020],
            SOLAR_TWH_COLUMN => &[4.0, 5.0, 12.5],
            SOLAR_PCT_COLUMN => &[6.25, 8.5, 3.1],
        ]
        .unwrap();
        let mut registry = Registry::new();
        registry.insert(Dataset::new(SOLAR_DATASET, solar));
        Extension(Arc::new(AppState { registry }))
    }

    fn form(country: Option<&str>, consumption: Option<&str>, year: Option<&str>) -> Form<CalculateForm> {
        Form(CalculateForm {
            country: country.map(String::from),
            consumption: consumption.map(String::from),
            year: year.map(String::from),
        })
    }

    #[tokio::test]
    async fn calculate_returns_sentence_and_fragments() {
        let Json(body) = calculate(state(), form(Some("Chile"), Some("1000"), Some("2020")))
            .await
            .unwrap();
        assert_eq!(
            body.resultado,
            "Para Chile en 2020, el 8.50% de su consumo proviene de energía solar."
        );
        assert!(body.tabla_html.contains("<td>Chile</td>"));
        assert!(!body.tabla_html.contains("France"));
        assert!(body.graph_barras_html.starts_with("<svg"));
        assert!(body.graph_pie_html.starts_with("<svg"));
    }

    #[tokio::test]
    async fn omitted_year_uses_most_recent() {
        let Json(body) = calculate(state(), form(Some("Chile"), Some("500"), None))
            .await
            .unwrap();
        assert!(body.resultado.contains("en 2020"));
    }

    #[tokio::test]
    async fn non_numeric_year_uses_most_recent() {
        let Json(body) = calculate(state(), form(Some("Chile"), Some("500"), Some("todos")))
            .await
            .unwrap();
        assert!(body.resultado.contains("en 2020"));
    }

    #[tokio::test]
    async fn missing_country_is_bad_request() {
        let err = calculate(state(), form(None, Some("10"), None)).await.unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let payload: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            payload["error"],
            "Debe seleccionar un país e ingresar el consumo"
        );
    }

    #[tokio::test]
    async fn unknown_country_is_bad_request() {
        let err = calculate(state(), form(Some("Atlantis"), Some("10"), None))
            .await
            .unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn non_numeric_consumption_is_server_error() {
        let err = calculate(state(), form(Some("Chile"), Some("diez"), None))
            .await
            .unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let payload: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let message = payload["error"].as_str().unwrap();
        assert!(message.starts_with("Error en el cálculo:"));
    }

    #[tokio::test]
    async fn index_lists_countries_and_table() {
        let Html(page) = index(state()).await.unwrap();
        assert!(page.contains("<option value=\"Chile\">Chile</option>"));
        assert!(page.contains("<option value=\"France\">France</option>"));
        assert!(page.contains("<h3>Solar</h3>"));
        assert!(page.contains("id=\"solarForm\""));
    }

    #[tokio::test]
    async fn index_without_solar_has_no_countries() {
        let state = Extension(Arc::new(AppState {
            registry: Registry::new(),
        }));
        let Html(page) = index(state).await.unwrap();
        assert!(!page.contains("<option value=\"Chile\""));
        assert!(page.contains("Seleccione un país"));
    }

    #[test]
    fn parse_year_accepts_digits_only() {
        assert_eq!(parse_year("2020"), Some(2020));
        assert_eq!(parse_year(" 2020 "), Some(2020));
        assert_eq!(parse_year(""), None);
        assert_eq!(parse_year("todos"), None);
    }
}
