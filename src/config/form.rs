//! Defaults for the strategy form and ticker search.

use crate::domain::strategy::Frequency;

pub struct FormDefaults {
    pub initial_investment: f64,
    pub regular_investment: f64,
    pub frequency: Frequency,
    /// Quick-pick buttons under the ticker search box
    pub suggested_tickers: &'static [&'static str],
    /// Strategy-specific parameters per row in the form grid
    pub parameter_columns: usize,
    pub currency_symbol: &'static str,
}

pub const FORM_DEFAULTS: FormDefaults = FormDefaults {
    initial_investment: 1000.0,
    regular_investment: 100.0,
    frequency: Frequency::Months,
    suggested_tickers: &["^GSPC", "TSLA", "MSFT"],
    parameter_columns: 2,
    currency_symbol: "$",
};
