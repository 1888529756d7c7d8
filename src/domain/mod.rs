// Domain types and value objects
pub mod named;
pub mod series;
pub mod strategy;
pub mod ticker;
pub mod window;

// Re-export commonly used types
pub use named::Named;
pub use series::TimeSeriesTable;
pub use strategy::{
    ComparisonSet, Frequency, StrategyCatalog, StrategyComparison, StrategyForm, StrategyRequest,
    StrategyResult, StrategySummary,
};
pub use ticker::{TickerInfo, TickerPayload};
pub use window::{IndexWindow, WindowSource, WindowSync};
