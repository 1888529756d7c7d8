use serde::Deserialize;

use crate::domain::series::TimeSeriesTable;

/// Instrument metadata as reported by the backend (a subset of the quote info).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerInfo {
    pub symbol: String,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default, rename = "logo_url")]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub regular_market_price: Option<f64>,
}

impl TickerInfo {
    /// Current price, falling back to the regular market price.
    pub fn display_price(&self) -> Option<f64> {
        self.current_price
            .filter(|p| p.is_finite())
            .or(self.regular_market_price)
    }

    pub fn display_name(&self) -> String {
        match self.short_name.as_deref() {
            Some(name) if !name.is_empty() => format!("{} ({})", name, self.symbol),
            _ => self.symbol.clone(),
        }
    }
}

/// Response of the price-history lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct TickerPayload {
    pub info: TickerInfo,
    pub data: TimeSeriesTable,
}
