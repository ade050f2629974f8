//! Charts module - plot-ready tables for the presenter

mod table;

pub use table::{chart_tables, ChartError, ChartKind, ChartTable};
