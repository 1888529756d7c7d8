use anyhow::{Result, bail};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;

pub const DATE_FIELD: &str = "Date";
pub const OPEN_FIELD: &str = "Open";
pub const INVESTMENT_FIELD: &str = "investment";

// ============================================================================
// TimeSeriesTable: index-aligned columns sharing one date axis
// ============================================================================

/// A set of parallel columns keyed by field name, all aligned on `dates`.
///
/// Invariants (checked on construction and decoding):
/// - every column has exactly `dates.len()` entries
/// - `dates` is strictly ascending
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "RawTable")]
pub struct TimeSeriesTable {
    dates: Vec<NaiveDate>,
    columns: BTreeMap<String, Vec<f64>>,
}

/// Wire shape: `{"Date": ["2023-01-02", ...], "Open": [1.0, ...], ...}`
#[derive(Deserialize)]
struct RawTable {
    #[serde(rename = "Date", default)]
    dates: Vec<NaiveDate>,
    #[serde(flatten)]
    columns: BTreeMap<String, Vec<Option<f64>>>,
}

impl TryFrom<RawTable> for TimeSeriesTable {
    type Error = anyhow::Error;

    fn try_from(raw: RawTable) -> Result<Self> {
        let columns = raw
            .columns
            .into_iter()
            .map(|(name, values)| {
                // Missing values (pandas NaN -> null) keep their slot
                let values = values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect();
                (name, values)
            })
            .collect();
        TimeSeriesTable::new(raw.dates, columns)
    }
}

impl TimeSeriesTable {
    pub fn new(dates: Vec<NaiveDate>, columns: BTreeMap<String, Vec<f64>>) -> Result<Self> {
        for (name, values) in &columns {
            if values.len() != dates.len() {
                bail!(
                    "column '{}' has {} values but the date axis has {}",
                    name,
                    values.len(),
                    dates.len()
                );
            }
        }
        if let Some(pos) = dates.windows(2).position(|pair| pair[0] >= pair[1]) {
            bail!(
                "dates must be strictly ascending ({} is followed by {})",
                dates[pos],
                dates[pos + 1]
            );
        }
        Ok(Self { dates, columns })
    }

    /// Convenience constructor from `(name, values)` pairs.
    pub fn from_columns<'a>(
        dates: Vec<NaiveDate>,
        columns: impl IntoIterator<Item = (&'a str, Vec<f64>)>,
    ) -> Result<Self> {
        let columns = columns
            .into_iter()
            .map(|(name, values)| (name.to_string(), values))
            .collect();
        Self::new(dates, columns)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn last_index(&self) -> Option<usize> {
        self.len().checked_sub(1)
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn date(&self, index: usize) -> Option<NaiveDate> {
        self.dates.get(index).copied()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    pub fn value(&self, name: &str, index: usize) -> Option<f64> {
        self.column(name).and_then(|values| values.get(index).copied())
    }

    pub fn has_field(&self, name: &str) -> bool {
        name == DATE_FIELD || self.columns.contains_key(name)
    }

    /// Value column names (the date axis is not included).
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.columns
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Position of `date` on the axis, if present.
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }

    /// Rows `start..=end` of every column. Bounds are capped at the last row;
    /// an inverted or out-of-range request yields an empty table with the same fields.
    pub fn slice(&self, start: usize, end: usize) -> Self {
        let end = end.min(self.len().saturating_sub(1));
        let rows = if self.is_empty() || start > end {
            0..0
        } else {
            start..end + 1
        };

        Self {
            dates: self.dates[rows.clone()].to_vec(),
            columns: self
                .columns
                .iter()
                .map(|(name, values)| (name.clone(), values[rows.clone()].to_vec()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time_utils::parse_date;

    fn d(text: &str) -> NaiveDate {
        parse_date(text).unwrap()
    }

    #[test]
    fn decodes_backend_payload() {
        let json = r#"{
            "Date": ["2023-01-02", "2023-01-03", "2023-01-04"],
            "Open": [10.0, 11.5, null],
            "investment": [100, 0, 50]
        }"#;
        let table: TimeSeriesTable = serde_json::from_str(json).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.date(1), Some(d("2023-01-03")));
        assert_eq!(table.value(OPEN_FIELD, 1), Some(11.5));
        assert!(table.value(OPEN_FIELD, 2).unwrap().is_nan());
        assert_eq!(table.column(INVESTMENT_FIELD), Some(&[100.0, 0.0, 50.0][..]));
        assert_eq!(table.field_names().collect::<Vec<_>>(), vec!["Open", "investment"]);
        assert!(table.has_field(DATE_FIELD));
        assert_eq!(table.index_of(d("2023-01-04")), Some(2));
        assert_eq!(table.index_of(d("2023-01-05")), None);
    }

    #[test]
    fn rejects_ragged_columns() {
        let json = r#"{"Date": ["2023-01-02", "2023-01-03"], "Open": [1.0]}"#;
        assert!(serde_json::from_str::<TimeSeriesTable>(json).is_err());
    }

    #[test]
    fn rejects_unordered_dates() {
        let result = TimeSeriesTable::from_columns(
            vec![d("2023-01-03"), d("2023-01-02")],
            [("Open", vec![1.0, 2.0])],
        );
        assert!(result.is_err());

        let duplicate = TimeSeriesTable::from_columns(vec![d("2023-01-03"), d("2023-01-03")], []);
        assert!(duplicate.is_err());
    }

    #[test]
    fn empty_table() {
        let table = TimeSeriesTable::default();
        assert!(table.is_empty());
        assert_eq!(table.last_index(), None);
        assert_eq!(table.first_date(), None);
    }
}
