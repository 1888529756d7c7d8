// Pure derivations over fetched tables: windowing, markers, summary ranking
pub mod investment_markers;
pub mod series_filter;
pub mod summary_stats;

// Re-export commonly used types
pub use investment_markers::{InvestmentMarker, InvestmentMarkers, build_markers};
pub use series_filter::{filter_window, window_for_dates};
pub use summary_stats::{
    CellColor, ColorScale, SummaryMetric, SummaryRange, SummaryRanges, compute_summary_range,
};
