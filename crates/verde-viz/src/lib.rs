//! # verde-viz: Table and Chart Fragments
//!
//! Turns registry data into presentation fragments: HTML tables per dataset
//! and self-contained SVG bar/pie charts. Everything is returned as a
//! `String` for the web layer to embed; renderers with nothing to draw
//! return the [`chart::NO_DATA_FRAGMENT`] placeholder.

pub mod chart;
pub mod table;

pub use chart::{
    render_bar_chart, render_capacity_overview, render_pie_chart, CAPACITY_COLUMN,
    CAPACITY_DATASET, NO_DATA_FRAGMENT,
};
pub use table::{escape_html, render_table};
