//! HTML table fragments for the loaded datasets.

use std::fmt::Write as _;

use polars::prelude::*;
use verde_core::{Registry, VerdeResult};

/// Escapes text for embedding in HTML/SVG markup.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Renders one `<h3>` heading plus `<table>` fragment per dataset, in
/// registry order.
///
/// With a country given, each dataset is filtered to that country first.
/// Datasets that are empty, or whose filtered result is empty, are skipped.
/// `None` and `Some("")` both mean "all rows".
pub fn render_table(registry: &Registry, country: Option<&str>) -> VerdeResult<String> {
    let filter = country.filter(|c| !c.is_empty());
    let mut html = String::new();

    for dataset in registry.iter() {
        if dataset.is_empty() {
            continue;
        }
        let frame = match filter {
            Some(country) => dataset.filter_country(country)?,
            None => dataset.frame().clone(),
        };
        if frame.height() == 0 {
            continue;
        }
        let _ = writeln!(html, "<h3>{}</h3>", escape_html(dataset.name()));
        frame_to_table(&frame, &mut html);
    }

    Ok(html)
}

fn frame_to_table(frame: &DataFrame, out: &mut String) {
    out.push_str("<table class=\"table table-striped\">\n<thead><tr>");
    for name in frame.get_column_names() {
        let _ = write!(out, "<th>{}</th>", escape_html(name));
    }
    out.push_str("</tr></thead>\n<tbody>\n");

    let columns = frame.get_columns();
    for row in 0..frame.height() {
        out.push_str("<tr>");
        for series in columns {
            let cell = series
                .get(row)
                .map(|value| format_cell(&value))
                .unwrap_or_default();
            let _ = write!(out, "<td>{}</td>", escape_html(&cell));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");
}

fn format_cell(value: &AnyValue) -> String {
    match value {
        AnyValue::Utf8(text) => (*text).to_string(),
        AnyValue::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verde_core::{Dataset, ENTITY_COLUMN, YEAR_COLUMN};

    fn registry() -> Registry {
        let solar = df![
            ENTITY_COLUMN => &["Chile", "France"],
            YEAR_COLUMN => &[2020i64, 2020],
            "Electricity from solar (TWh)" => &[5.0, 12.5],
        ]
        .unwrap();
        let wind = df![
            ENTITY_COLUMN => &["France"],
            YEAR_COLUMN => &[2020i64],
            "Wind Generation (TWh)" => &[39.7],
        ]
        .unwrap();
        let empty = DataFrame::new(vec![
            Series::new(ENTITY_COLUMN, Vec::<String>::new()),
            Series::new(YEAR_COLUMN, Vec::<i64>::new()),
        ])
        .unwrap();

        let mut registry = Registry::new();
        registry.insert(Dataset::new("Solar", solar));
        registry.insert(Dataset::new("Eólica", wind));
        registry.insert(Dataset::new("Geotermia", empty));
        registry
    }

    #[test]
    fn unfiltered_table_covers_every_nonempty_dataset() {
        let html = render_table(&registry(), None).unwrap();
        assert!(html.contains("<h3>Solar</h3>"));
        assert!(html.contains("<h3>Eólica</h3>"));
        assert!(!html.contains("Geotermia"));
        assert!(html.contains("<th>Entity</th>"));
        assert!(html.contains("<td>Chile</td>"));
    }

    #[test]
    fn empty_country_means_unfiltered() {
        let all = render_table(&registry(), None).unwrap();
        let blank = render_table(&registry(), Some("")).unwrap();
        assert_eq!(all, blank);
    }

    #[test]
    fn country_filter_omits_datasets_without_rows() {
        let html = render_table(&registry(), Some("Chile")).unwrap();
        assert!(html.contains("<h3>Solar</h3>"));
        assert!(html.contains("<td>Chile</td>"));
        // Eólica has no Chile rows at all
        assert!(!html.contains("Eólica"));
        assert!(!html.contains("France"));
    }

    #[test]
    fn cells_are_escaped() {
        let frame = df![
            ENTITY_COLUMN => &["<script>"],
            YEAR_COLUMN => &[2020i64],
        ]
        .unwrap();
        let mut registry = Registry::new();
        registry.insert(Dataset::new("Solar", frame));
        let html = render_table(&registry, None).unwrap();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }
}
