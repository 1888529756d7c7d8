use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::config::PLOT_CONFIG;
use crate::domain::series::{INVESTMENT_FIELD, OPEN_FIELD, TimeSeriesTable};
use crate::utils::maths_utils::{min_max_nonempty, scale};

/// A bubble on the price line for one non-zero investment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvestmentMarker {
    pub date: NaiveDate,
    pub price: f64,
    /// Display radius within `PLOT_CONFIG.marker_radius_range`
    pub radius: f64,
}

/// Markers plus the `date -> amount` lookup used by tooltips.
/// Markers are a sparse subset of the date axis, so tooltips resolve amounts by date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvestmentMarkers {
    pub markers: Vec<InvestmentMarker>,
    pub investments: BTreeMap<NaiveDate, f64>,
}

impl InvestmentMarkers {
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn amount_on(&self, date: NaiveDate) -> Option<f64> {
        self.investments.get(&date).copied()
    }
}

/// Extract the investment events of a strategy table (`Date`, `Open`, `investment`).
///
/// The radius domain is `[min, max]` over the non-zero amounts only; including the
/// zeros would push nearly every bubble to the minimum radius. A table with no
/// non-zero investment gives empty markers.
pub fn build_markers(table: &TimeSeriesTable) -> Result<InvestmentMarkers> {
    let prices = table
        .column(OPEN_FIELD)
        .ok_or_else(|| anyhow!("table has no '{}' column", OPEN_FIELD))?;
    let amounts = table
        .column(INVESTMENT_FIELD)
        .ok_or_else(|| anyhow!("table has no '{}' column", INVESTMENT_FIELD))?;

    let events: Vec<usize> = amounts
        .iter()
        .enumerate()
        .filter(|&(_, &amount)| amount != 0.0 && amount.is_finite())
        .map(|(i, _)| i)
        .collect();

    let non_zero: Vec<f64> = events.iter().map(|&i| amounts[i]).collect();
    let Some((min, max)) = min_max_nonempty(&non_zero) else {
        return Ok(InvestmentMarkers::default());
    };

    let (r_min, r_max) = PLOT_CONFIG.marker_radius_range;
    let mut result = InvestmentMarkers::default();

    for i in events {
        let Some(date) = table.date(i) else {
            continue;
        };
        let amount = amounts[i];
        result.markers.push(InvestmentMarker {
            date,
            price: prices[i],
            radius: scale(amount, min, max, r_min, r_max),
        });
        result.investments.insert(date, amount);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time_utils::parse_date;

    fn dates(n: usize) -> Vec<NaiveDate> {
        let start = parse_date("2022-03-01").unwrap();
        (0..n as u64)
            .map(|i| start.checked_add_days(chrono::Days::new(i)).unwrap())
            .collect()
    }

    fn table(prices: Vec<f64>, amounts: Vec<f64>) -> TimeSeriesTable {
        TimeSeriesTable::from_columns(
            dates(prices.len()),
            [(OPEN_FIELD, prices), (INVESTMENT_FIELD, amounts)],
        )
        .unwrap()
    }

    #[test]
    fn all_zero_investments_give_no_markers() {
        let result = build_markers(&table(vec![1.0, 2.0, 3.0], vec![0.0, 0.0, 0.0])).unwrap();
        assert!(result.markers.is_empty());
        assert!(result.investments.is_empty());
    }

    #[test]
    fn markers_sit_on_the_price_line() {
        let result =
            build_markers(&table(vec![10.0, 11.0, 12.0, 13.0], vec![1000.0, 0.0, 100.0, 0.0]))
                .unwrap();

        assert_eq!(result.markers.len(), 2);
        let first = result.markers[0];
        assert_eq!(first.date, dates(4)[0]);
        assert_eq!(first.price, 10.0);
        assert_eq!(result.markers[1].price, 12.0);
        assert_eq!(result.amount_on(dates(4)[2]), Some(100.0));
        assert_eq!(result.amount_on(dates(4)[1]), None);
    }

    #[test]
    fn radius_spans_the_configured_range() {
        let result =
            build_markers(&table(vec![1.0; 4], vec![100.0, 0.0, 550.0, 1000.0])).unwrap();
        let radii: Vec<f64> = result.markers.iter().map(|m| m.radius).collect();
        let (r_min, r_max) = PLOT_CONFIG.marker_radius_range;

        assert_eq!(radii[0], r_min);
        assert!((radii[1] - (r_min + r_max) / 2.0).abs() < 1e-9);
        assert_eq!(radii[2], r_max);
    }

    #[test]
    fn radius_is_monotonic_in_amount() {
        let amounts = vec![300.0, 0.0, 50.0, 1200.0, 0.0, 75.0, 300.0];
        let result = build_markers(&table(vec![5.0; amounts.len()], amounts)).unwrap();

        let mut pairs: Vec<(f64, f64)> = result
            .markers
            .iter()
            .map(|m| (result.amount_on(m.date).unwrap(), m.radius))
            .collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        assert!(pairs.windows(2).all(|w| w[0].1 <= w[1].1));
    }

    #[test]
    fn equal_amounts_use_the_minimum_radius() {
        let result = build_markers(&table(vec![1.0, 2.0], vec![100.0, 100.0])).unwrap();
        assert!(result.markers.iter().all(|m| m.radius == PLOT_CONFIG.marker_radius_range.0));
    }

    #[test]
    fn missing_columns_are_an_error() {
        let prices_only =
            TimeSeriesTable::from_columns(dates(2), [(OPEN_FIELD, vec![1.0, 2.0])]).unwrap();
        assert!(build_markers(&prices_only).is_err());
    }
}
