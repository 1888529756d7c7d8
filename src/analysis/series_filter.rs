use chrono::NaiveDate;

use crate::domain::series::TimeSeriesTable;
use crate::domain::window::IndexWindow;

/// Rows of `table` inside `window` (inclusive), every column sliced alike.
///
/// The window is clamped to the table first, so a window taken from an older
/// snapshot never panics. An empty table yields an empty table.
pub fn filter_window(table: &TimeSeriesTable, window: IndexWindow) -> TimeSeriesTable {
    match window.clamp_to(table.len()) {
        Some(w) if w.is_full(table.len()) => table.clone(),
        Some(w) => table.slice(w.min, w.max),
        None => table.clone(),
    }
}

/// Rows of `table` dated within `[from, to]`, as an index window.
/// Lets a window chosen on one table (the price history) select rows of another
/// table with its own axis (a strategy result). `None` when nothing falls inside.
pub fn window_for_dates(table: &TimeSeriesTable, from: NaiveDate, to: NaiveDate) -> Option<IndexWindow> {
    let dates = table.dates();
    let lo = dates.partition_point(|d| *d < from);
    let hi = dates.partition_point(|d| *d <= to);
    if lo >= hi {
        return None;
    }
    Some(IndexWindow::new(lo, hi - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::{INVESTMENT_FIELD, OPEN_FIELD};
    use crate::utils::time_utils::parse_date;

    fn table() -> TimeSeriesTable {
        let dates: Vec<NaiveDate> = ["2023-01-02", "2023-01-03", "2023-01-04", "2023-01-05", "2023-01-06"]
            .iter()
            .map(|s| parse_date(s).unwrap())
            .collect();
        TimeSeriesTable::from_columns(
            dates,
            [
                (OPEN_FIELD, vec![10.0, 11.0, 12.0, 13.0, 14.0]),
                (INVESTMENT_FIELD, vec![100.0, 0.0, 0.0, 50.0, 0.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn slices_every_column_inclusively() {
        let filtered = filter_window(&table(), IndexWindow::new(1, 3));

        assert_eq!(filtered.len(), 3);
        assert_eq!(filtered.first_date(), parse_date("2023-01-03").ok());
        assert_eq!(filtered.last_date(), parse_date("2023-01-05").ok());
        assert_eq!(filtered.column(OPEN_FIELD), Some(&[11.0, 12.0, 13.0][..]));
        assert_eq!(filtered.column(INVESTMENT_FIELD), Some(&[0.0, 0.0, 50.0][..]));
    }

    #[test]
    fn full_window_is_identity() {
        let t = table();
        assert_eq!(filter_window(&t, IndexWindow::new(0, 4)), t);
    }

    #[test]
    fn single_row_window() {
        let filtered = filter_window(&table(), IndexWindow::new(2, 2));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.value(OPEN_FIELD, 0), Some(12.0));
    }

    #[test]
    fn out_of_range_window_is_clamped() {
        let filtered = filter_window(&table(), IndexWindow::new(3, 99));
        assert_eq!(filtered.len(), 2);

        let inverted = filter_window(&table(), IndexWindow::new(3, 1));
        assert_eq!(inverted.len(), 3);
    }

    #[test]
    fn empty_table_stays_empty() {
        let empty = TimeSeriesTable::default();
        assert!(filter_window(&empty, IndexWindow::new(0, 10)).is_empty());
    }

    #[test]
    fn date_range_maps_to_rows() {
        let t = table();
        let d = |s: &str| parse_date(s).unwrap();

        assert_eq!(window_for_dates(&t, d("2023-01-03"), d("2023-01-05")), Some(IndexWindow::new(1, 3)));
        // Bounds between rows snap inward
        assert_eq!(window_for_dates(&t, d("2022-12-25"), d("2023-01-03")), Some(IndexWindow::new(0, 1)));
        assert_eq!(window_for_dates(&t, d("2023-02-01"), d("2023-03-01")), None);
        assert_eq!(window_for_dates(&t, d("2023-01-05"), d("2023-01-03")), None);
    }
}
