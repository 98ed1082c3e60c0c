//! Hand-rendered SVG chart fragments.
//!
//! Bar and pie charts over the Solar dataset for one country, plus the
//! capacity overview across all countries for the latest year. Fragments are
//! self-contained `<svg>` elements meant to be injected into the page; when
//! there is nothing to draw the renderers return [`NO_DATA_FRAGMENT`]
//! instead.

use std::f64::consts::PI;
use std::fmt::Write as _;

use polars::prelude::*;
use verde_core::{
    Registry, VerdeResult, ENTITY_COLUMN, SOLAR_DATASET, SOLAR_PCT_COLUMN, SOLAR_TWH_COLUMN,
    YEAR_COLUMN,
};

use crate::table::escape_html;

/// Placeholder fragment when a chart has no rows to draw.
pub const NO_DATA_FRAGMENT: &str = "<p>No hay datos disponibles para este gráfico.</p>";

/// Dataset and measurement column behind the capacity overview.
pub const CAPACITY_DATASET: &str = "Capacidad Solar";
pub const CAPACITY_COLUMN: &str = "Solar Capacity";

const CHART_WIDTH: f64 = 720.0;
const CHART_HEIGHT: f64 = 420.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 56.0;
const MARGIN_BOTTOM: f64 = 70.0;

// Qualitative palette for bars and pie slices.
const PALETTE: &[&str] = &[
    "#636efa", "#ef553b", "#00cc96", "#ab63fa", "#ffa15a", "#19d3f3", "#ff6692", "#b6e880",
    "#ff97ff", "#fecb52",
];

/// Bar chart of the country's solar electricity (TWh) by year.
pub fn render_bar_chart(registry: &Registry, country: &str) -> VerdeResult<String> {
    let pairs = match solar_year_values(registry, country, SOLAR_TWH_COLUMN)? {
        Some(pairs) => pairs,
        None => return Ok(NO_DATA_FRAGMENT.to_string()),
    };

    let title = format!("Producción de Energía Solar en {}", escape_html(country));
    let labels: Vec<String> = pairs.iter().map(|(year, _)| year.to_string()).collect();
    let values: Vec<f64> = pairs.iter().map(|(_, value)| *value).collect();
    Ok(vertical_bars(
        &title,
        "Año",
        "Electricidad Solar (TWh)",
        &labels,
        &values,
        CHART_WIDTH,
    ))
}

/// Pie chart of the country's solar percentage of primary energy by year.
pub fn render_pie_chart(registry: &Registry, country: &str) -> VerdeResult<String> {
    let pairs = match solar_year_values(registry, country, SOLAR_PCT_COLUMN)? {
        Some(pairs) => pairs,
        None => return Ok(NO_DATA_FRAGMENT.to_string()),
    };

    let slices: Vec<(String, f64)> = pairs
        .into_iter()
        .filter(|(_, value)| *value > 0.0)
        .map(|(year, value)| (year.to_string(), value))
        .collect();
    let total: f64 = slices.iter().map(|(_, value)| value).sum();
    if slices.is_empty() || total <= 0.0 {
        return Ok(NO_DATA_FRAGMENT.to_string());
    }

    let title = format!("Porcentaje de Energía Solar en {}", escape_html(country));
    Ok(pie(&title, &slices, total))
}

/// Bar chart of installed solar capacity by country for the latest year in
/// the "Capacidad Solar" dataset.
pub fn render_capacity_overview(registry: &Registry) -> VerdeResult<String> {
    let capacity = match registry.get(CAPACITY_DATASET) {
        Some(dataset) if !dataset.is_empty() => dataset,
        _ => return Ok(NO_DATA_FRAGMENT.to_string()),
    };
    let year = match capacity.max_year()? {
        Some(year) => year,
        None => return Ok(NO_DATA_FRAGMENT.to_string()),
    };
    let frame = capacity.filter_year(year)?;
    let pairs = label_values(&frame, ENTITY_COLUMN, CAPACITY_COLUMN)?;
    if pairs.is_empty() {
        return Ok(NO_DATA_FRAGMENT.to_string());
    }

    let title = format!("Producción de Energía Solar en el Año {year}");
    let labels: Vec<String> = pairs.iter().map(|(label, _)| label.clone()).collect();
    let values: Vec<f64> = pairs.iter().map(|(_, value)| *value).collect();
    let width = (MARGIN_LEFT + MARGIN_RIGHT + labels.len() as f64 * 22.0).max(CHART_WIDTH);
    Ok(vertical_bars(
        &title,
        "Región o País",
        "Capacidad Instalada de Energía Solar (GW o MW)",
        &labels,
        &values,
        width,
    ))
}

/// Solar rows for one country as sorted `(year, value)` pairs; `None` when
/// the dataset is absent or the country has no rows.
fn solar_year_values(
    registry: &Registry,
    country: &str,
    column: &str,
) -> VerdeResult<Option<Vec<(i64, f64)>>> {
    let solar = match registry.get(SOLAR_DATASET) {
        Some(dataset) => dataset,
        None => return Ok(None),
    };
    let rows = solar.filter_country(country)?;
    if rows.height() == 0 {
        return Ok(None);
    }

    let years = rows.column(YEAR_COLUMN)?.cast(&DataType::Int64)?;
    let values = rows.column(column)?.cast(&DataType::Float64)?;
    let mut pairs = Vec::new();
    for (year, value) in years.i64()?.into_iter().zip(values.f64()?.into_iter()) {
        if let (Some(year), Some(value)) = (year, value) {
            pairs.push((year, value));
        }
    }
    pairs.sort_by_key(|(year, _)| *year);
    if pairs.is_empty() {
        return Ok(None);
    }
    Ok(Some(pairs))
}

fn label_values(
    frame: &DataFrame,
    label_column: &str,
    value_column: &str,
) -> VerdeResult<Vec<(String, f64)>> {
    let labels = frame.column(label_column)?.utf8()?;
    let values = frame.column(value_column)?.cast(&DataType::Float64)?;
    let mut pairs = Vec::new();
    for (label, value) in labels.into_iter().zip(values.f64()?.into_iter()) {
        if let (Some(label), Some(value)) = (label, value) {
            pairs.push((label.to_string(), value));
        }
    }
    Ok(pairs)
}

fn vertical_bars(
    title: &str,
    x_label: &str,
    y_label: &str,
    labels: &[String],
    values: &[f64],
    width: f64,
) -> String {
    let plot_w = width - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let max_value = values.iter().copied().fold(0.0f64, f64::max).max(f64::MIN_POSITIVE);
    let slot = plot_w / labels.len() as f64;
    let bar_w = (slot * 0.8).min(40.0);

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        "<svg xmlns='http://www.w3.org/2000/svg' width='{width:.0}' height='{CHART_HEIGHT:.0}' viewBox='0 0 {width:.0} {CHART_HEIGHT:.0}' role='img'>"
    );
    let _ = writeln!(
        svg,
        "  <text x='{:.0}' y='28' text-anchor='middle' font-family='sans-serif' font-size='18'>{}</text>",
        width / 2.0,
        title
    );

    // horizontal gridlines and y-axis tick values
    for tick in 0..=4 {
        let value = max_value * f64::from(tick) / 4.0;
        let y = MARGIN_TOP + plot_h - (value / max_value) * plot_h;
        let _ = writeln!(
            svg,
            "  <line x1='{MARGIN_LEFT:.0}' y1='{y:.1}' x2='{:.0}' y2='{y:.1}' stroke='#e5e5e5'/>",
            width - MARGIN_RIGHT
        );
        let _ = writeln!(
            svg,
            "  <text x='{:.0}' y='{:.1}' text-anchor='end' font-family='sans-serif' font-size='11'>{}</text>",
            MARGIN_LEFT - 8.0,
            y + 4.0,
            format_number(value)
        );
    }

    for (i, (label, value)) in labels.iter().zip(values.iter()).enumerate() {
        let height = (value.max(0.0) / max_value) * plot_h;
        let x = MARGIN_LEFT + i as f64 * slot + (slot - bar_w) / 2.0;
        let y = MARGIN_TOP + plot_h - height;
        let _ = writeln!(
            svg,
            "  <rect x='{x:.1}' y='{y:.1}' width='{bar_w:.1}' height='{height:.1}' fill='{}'><title>{}: {}</title></rect>",
            PALETTE[0],
            escape_html(label),
            format_number(*value)
        );
    }

    // x-axis labels, thinned and rotated when there are many bars
    let step = (labels.len() + 15) / 16;
    for (i, label) in labels.iter().enumerate() {
        if i % step != 0 {
            continue;
        }
        let x = MARGIN_LEFT + i as f64 * slot + slot / 2.0;
        let y = MARGIN_TOP + plot_h + 16.0;
        let _ = writeln!(
            svg,
            "  <text x='{x:.1}' y='{y:.1}' text-anchor='end' font-family='sans-serif' font-size='11' transform='rotate(-45 {x:.1} {y:.1})'>{}</text>",
            escape_html(label)
        );
    }

    let _ = writeln!(
        svg,
        "  <line x1='{MARGIN_LEFT:.0}' y1='{:.0}' x2='{:.0}' y2='{:.0}' stroke='#444'/>",
        MARGIN_TOP + plot_h,
        width - MARGIN_RIGHT,
        MARGIN_TOP + plot_h
    );
    let _ = writeln!(
        svg,
        "  <text x='{:.0}' y='{:.0}' text-anchor='middle' font-family='sans-serif' font-size='13'>{}</text>",
        width / 2.0,
        CHART_HEIGHT - 8.0,
        escape_html(x_label)
    );
    let _ = writeln!(
        svg,
        "  <text x='16' y='{:.0}' text-anchor='middle' font-family='sans-serif' font-size='13' transform='rotate(-90 16 {:.0})'>{}</text>",
        MARGIN_TOP + plot_h / 2.0,
        MARGIN_TOP + plot_h / 2.0,
        escape_html(y_label)
    );
    svg.push_str("</svg>\n");
    svg
}

fn pie(title: &str, slices: &[(String, f64)], total: f64) -> String {
    let legend_height = 60.0 + slices.len() as f64 * 18.0;
    let height = CHART_HEIGHT.max(legend_height);
    let cx = CHART_WIDTH * 0.38;
    let cy = MARGIN_TOP + (height - MARGIN_TOP - 20.0) / 2.0;
    let r = ((height - MARGIN_TOP - 40.0) / 2.0).min(150.0);
    let legend_x = CHART_WIDTH * 0.68;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        "<svg xmlns='http://www.w3.org/2000/svg' width='{CHART_WIDTH:.0}' height='{height:.0}' viewBox='0 0 {CHART_WIDTH:.0} {height:.0}' role='img'>"
    );
    let _ = writeln!(
        svg,
        "  <text x='{:.0}' y='28' text-anchor='middle' font-family='sans-serif' font-size='18'>{}</text>",
        CHART_WIDTH / 2.0,
        title
    );

    let mut angle = -PI / 2.0;
    for (i, (label, value)) in slices.iter().enumerate() {
        let fraction = value / total;
        let color = PALETTE[i % PALETTE.len()];
        let tooltip = format!("{}: {} ({:.1}%)", escape_html(label), format_number(*value), fraction * 100.0);
        if fraction >= 0.999 {
            let _ = writeln!(
                svg,
                "  <circle cx='{cx:.1}' cy='{cy:.1}' r='{r:.1}' fill='{color}'><title>{tooltip}</title></circle>"
            );
            angle += fraction * 2.0 * PI;
            continue;
        }
        let end = angle + fraction * 2.0 * PI;
        let (x1, y1) = (cx + r * angle.cos(), cy + r * angle.sin());
        let (x2, y2) = (cx + r * end.cos(), cy + r * end.sin());
        let large_arc = i32::from(fraction > 0.5);
        let _ = writeln!(
            svg,
            "  <path d='M {cx:.1} {cy:.1} L {x1:.1} {y1:.1} A {r:.1} {r:.1} 0 {large_arc} 1 {x2:.1} {y2:.1} Z' fill='{color}' stroke='#fff' stroke-width='1'><title>{tooltip}</title></path>"
        );
        angle = end;
    }

    for (i, (label, value)) in slices.iter().enumerate() {
        let y = 56.0 + i as f64 * 18.0;
        let color = PALETTE[i % PALETTE.len()];
        let _ = writeln!(
            svg,
            "  <rect x='{legend_x:.0}' y='{:.1}' width='12' height='12' fill='{color}'/>",
            y - 10.0
        );
        let _ = writeln!(
            svg,
            "  <text x='{:.0}' y='{y:.1}' font-family='sans-serif' font-size='12'>{}: {}</text>",
            legend_x + 18.0,
            escape_html(label),
            format_number(*value)
        );
    }
    svg.push_str("</svg>\n");
    svg
}

fn format_number(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}
