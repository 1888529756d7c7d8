// Chart-ready models derived from domain tables.
// Pure data: rendering lives in ui::plot_layers.

pub mod chart_data;

// Re-export key types for convenience
pub use chart_data::{
    ChartPayload, ChartSeries, ComparisonChartOptions, ComparisonMetric, DrawKind,
    PriceChartOptions, ValueUnit, create_comparison_chart_data, create_price_chart_data,
};
