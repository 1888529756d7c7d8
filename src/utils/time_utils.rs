use anyhow::{Result, anyhow};
use chrono::{Datelike, Days, NaiveDate};

use crate::domain::series::TimeSeriesTable;

pub struct TimeUtils;

impl TimeUtils {
    pub const DAYS_IN_YEAR: f64 = 365.2425;
    pub const DAYS_IN_MONTH: f64 = 30.437;
    pub const DAYS_IN_WEEK: f64 = 7.0;
    pub const STANDARD_DATE_FORMAT: &str = "%Y-%m-%d";
}

pub fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), TimeUtils::STANDARD_DATE_FORMAT)
        .map_err(|e| anyhow!("invalid date '{}': {}", text, e))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(TimeUtils::STANDARD_DATE_FORMAT).to_string()
}

/// Calendar subtraction. Saturates at the earliest representable date.
pub fn subtract_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(days))
        .unwrap_or(NaiveDate::MIN)
}

/// Earliest and latest date across every table's `Date` axis.
pub fn union_date_range<'a>(
    tables: impl IntoIterator<Item = &'a TimeSeriesTable>,
) -> Result<(NaiveDate, NaiveDate)> {
    let mut range: Option<(NaiveDate, NaiveDate)> = None;

    for table in tables {
        // Dates are strictly ascending, so the ends are the extremes
        let (Some(first), Some(last)) = (table.dates().first(), table.dates().last()) else {
            continue;
        };
        range = Some(match range {
            None => (*first, *last),
            Some((lo, hi)) => (lo.min(*first), hi.max(*last)),
        });
    }

    range.ok_or_else(|| anyhow!("no dates available to build a date range"))
}

/// Human duration using the two largest non-zero units, e.g. `1Y 1M`, `1W 3D`.
pub fn format_duration(days: i64) -> String {
    let x = days.max(0) as f64;

    let years = (x / TimeUtils::DAYS_IN_YEAR).floor();
    let after_years = x - TimeUtils::DAYS_IN_YEAR * years;
    let months = (after_years / TimeUtils::DAYS_IN_MONTH).floor();
    let after_months = after_years - TimeUtils::DAYS_IN_MONTH * months;
    let mut weeks = (after_months / TimeUtils::DAYS_IN_WEEK).floor();
    let mut rest = (after_months - TimeUtils::DAYS_IN_WEEK * weeks).round();
    if rest >= TimeUtils::DAYS_IN_WEEK {
        weeks += 1.0;
        rest -= TimeUtils::DAYS_IN_WEEK;
    }

    let (years, months, weeks, rest) = (years as i64, months as i64, weeks as i64, rest as i64);
    if years > 0 {
        format!("{}Y {}M", years, months)
    } else if months > 0 {
        format!("{}M {}W", months, weeks)
    } else if weeks > 0 {
        format!("{}W {}D", weeks, rest)
    } else {
        format!("{}D", rest)
    }
}

/// `1st Jan 2020` style date for tables.
pub fn format_long_date(date: NaiveDate) -> String {
    let day = date.day();
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{} {}", day, suffix, date.format("%b %Y"))
}

/// Continuous x coordinate for date axes (days since the Common Era).
pub fn date_to_plot_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

pub fn plot_x_to_date(x: f64) -> Option<NaiveDate> {
    if !x.is_finite() {
        return None;
    }
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn d(text: &str) -> NaiveDate {
        parse_date(text).unwrap()
    }

    fn table(dates: &[&str]) -> TimeSeriesTable {
        TimeSeriesTable::new(dates.iter().map(|s| d(s)).collect(), BTreeMap::new()).unwrap()
    }

    #[test]
    fn subtract_days_crosses_month_and_year() {
        assert_eq!(subtract_days(d("2023-03-01"), 1), d("2023-02-28"));
        assert_eq!(subtract_days(d("2024-03-01"), 1), d("2024-02-29"));
        assert_eq!(subtract_days(d("2023-01-01"), 1), d("2022-12-31"));
        assert_eq!(subtract_days(d("2023-01-10"), 40), d("2022-12-01"));
    }

    #[test]
    fn union_range_spans_all_series() {
        let a = table(&["2023-01-01", "2023-01-05"]);
        let b = table(&["2022-12-01", "2023-01-03"]);
        let range = union_date_range([&a, &b]).unwrap();
        assert_eq!(range, (d("2022-12-01"), d("2023-01-05")));
    }

    #[test]
    fn union_range_of_nothing_is_an_error() {
        assert!(union_date_range(std::iter::empty()).is_err());
        let empty = table(&[]);
        assert!(union_date_range([&empty]).is_err());
    }

    #[test]
    fn durations() {
        assert_eq!(format_duration(0), "0D");
        assert_eq!(format_duration(6), "6D");
        assert_eq!(format_duration(10), "1W 3D");
        assert_eq!(format_duration(45), "1M 2W");
        assert_eq!(format_duration(400), "1Y 1M");
        assert_eq!(format_duration(1400), "3Y 9M");
        assert_eq!(format_duration(-3), "0D");
    }

    #[test]
    fn long_dates_have_ordinals() {
        assert_eq!(format_long_date(d("2020-01-01")), "1st Jan 2020");
        assert_eq!(format_long_date(d("2021-03-02")), "2nd Mar 2021");
        assert_eq!(format_long_date(d("2021-03-13")), "13th Mar 2021");
        assert_eq!(format_long_date(d("2021-05-23")), "23rd May 2021");
    }

    #[test]
    fn plot_x_round_trips_dates() {
        let date = d("2023-07-14");
        assert_eq!(plot_x_to_date(date_to_plot_x(date)), Some(date));
        assert_eq!(plot_x_to_date(f64::NAN), None);
    }
}
