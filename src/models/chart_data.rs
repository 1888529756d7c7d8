use chrono::NaiveDate;
use eframe::egui::Color32;
use std::collections::BTreeMap;
use strum_macros::{Display, EnumIter};

use crate::analysis::investment_markers::InvestmentMarkers;
use crate::config::PLOT_CONFIG;
use crate::domain::series::{OPEN_FIELD, TimeSeriesTable};
use crate::domain::strategy::StrategyComparison;
use crate::domain::window::IndexWindow;
use crate::utils::format_utils::{format_money, format_percent};
use crate::utils::time_utils::{date_to_plot_x, format_date, plot_x_to_date, union_date_range};

pub const PRICE_SERIES_LABEL: &str = "Price";
pub const INVESTMENT_SERIES_LABEL: &str = "Investment";

const X_PADDING: f64 = 0.25;

// ============================================================================
// Payload
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawKind {
    /// Continuous line, optionally filled down to the axis
    Line,
    /// Points with a per-point radius
    Bubble,
    /// Point series joined by a thin line
    Scatter,
}

/// One named series with its visual encoding. Independent of the plotting backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub kind: DrawKind,
    pub points: Vec<[f64; 2]>,
    /// Per-point radius; only filled for `DrawKind::Bubble`
    pub radii: Vec<f64>,
    pub color: Color32,
    pub fill: bool,
    /// Stacking order: lower values are drawn on top
    pub order: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartPayload {
    pub series: Vec<ChartSeries>,
}

impl ChartPayload {
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.points.is_empty())
    }

    /// Series in paint order (highest `order` first, so `order == 0` ends up on top).
    pub fn back_to_front(&self) -> Vec<&ChartSeries> {
        let mut series: Vec<&ChartSeries> = self.series.iter().collect();
        series.sort_by(|a, b| b.order.cmp(&a.order));
        series
    }

    pub fn series(&self, label: &str) -> Option<&ChartSeries> {
        self.series.iter().find(|s| s.label == label)
    }
}

/// Parse a `#rrggbb` palette entry. Unparseable entries fall back to grey.
pub fn html_color(hex: &str) -> Color32 {
    match colorgrad::Color::from_html(hex) {
        Ok(color) => {
            let [r, g, b, a] = color.to_rgba8();
            Color32::from_rgba_unmultiplied(r, g, b, a)
        }
        Err(_) => Color32::GRAY,
    }
}

/// Palette colour for the `index`-th series, cycling when there are more series than colours.
pub fn palette_color(index: usize) -> Color32 {
    let palette = PLOT_CONFIG.comparison_palette;
    if palette.is_empty() {
        return Color32::GRAY;
    }
    html_color(palette[index % palette.len()])
}

// ============================================================================
// Price + investment chart
// ============================================================================

/// Price line of the visible `table` plus, when given, investment bubbles on top.
///
/// `offset` is the absolute index of the table's first row, so x values stay
/// absolute indices into the full price history whatever the window.
pub fn create_price_chart_data(
    table: &TimeSeriesTable,
    markers: Option<&InvestmentMarkers>,
    offset: usize,
) -> ChartPayload {
    let prices = table.column(OPEN_FIELD).unwrap_or_default();
    let price_points: Vec<[f64; 2]> = prices
        .iter()
        .enumerate()
        .filter(|(_, price)| price.is_finite())
        .map(|(i, &price)| [(offset + i) as f64, price])
        .collect();

    let mut series = vec![ChartSeries {
        label: PRICE_SERIES_LABEL.to_string(),
        kind: DrawKind::Line,
        points: price_points,
        radii: Vec::new(),
        color: PLOT_CONFIG.price_line_color,
        fill: true,
        order: 1,
    }];

    if let Some(markers) = markers.filter(|m| !m.is_empty()) {
        let (points, radii): (Vec<[f64; 2]>, Vec<f64>) = markers
            .markers
            .iter()
            .filter_map(|marker| {
                // Markers whose date is outside the visible table are dropped
                let i = table.index_of(marker.date)?;
                Some(([(offset + i) as f64, marker.price], marker.radius))
            })
            .unzip();

        series.push(ChartSeries {
            label: INVESTMENT_SERIES_LABEL.to_string(),
            kind: DrawKind::Bubble,
            points,
            radii,
            color: PLOT_CONFIG.marker_color,
            fill: true,
            order: 0,
        });
    }

    ChartPayload { series }
}

/// Axis, tooltip and zoom behaviour of the price chart.
pub struct PriceChartOptions<'a> {
    /// Rows currently shown
    pub table: &'a TimeSeriesTable,
    /// Absolute index of `table`'s first row
    pub offset: usize,
    /// Row count of the full price history
    pub total_len: usize,
    pub currency: &'a str,
    /// Investment amounts for tooltip lookup, by date
    pub investments: Option<&'a BTreeMap<NaiveDate, f64>>,
}

impl<'a> PriceChartOptions<'a> {
    /// Window currently on screen, in absolute indices.
    pub fn visible_window(&self) -> Option<IndexWindow> {
        let last = self.table.last_index()?;
        Some(IndexWindow::new(self.offset, self.offset + last))
    }

    /// Bounds the chart should show for the visible window, padded by a quarter row
    /// so the bounds read back by `zoom_window` land on the same rows.
    pub fn x_bounds(&self) -> Option<(f64, f64)> {
        self.visible_window()
            .map(|w| (w.min as f64 - X_PADDING, w.max as f64 + X_PADDING))
    }

    fn date_at(&self, x: f64) -> Option<NaiveDate> {
        if !x.is_finite() || x < 0.0 {
            return None;
        }
        let index = (x.round() as usize).checked_sub(self.offset)?;
        self.table.date(index)
    }

    /// Tooltip heading: the date under the cursor.
    pub fn tooltip_title(&self, x: f64) -> Option<String> {
        self.date_at(x).map(format_date)
    }

    /// Tooltip body. Investment bubbles resolve their amount by date, not by position.
    pub fn tooltip_label(&self, series: &str, x: f64, y: f64) -> String {
        if series == INVESTMENT_SERIES_LABEL {
            let amount = self
                .date_at(x)
                .and_then(|date| self.investments?.get(&date).copied());
            if let Some(amount) = amount {
                return format!("{}: {}", INVESTMENT_SERIES_LABEL, format_money(self.currency, amount));
            }
        }
        format!("{}: {}", PRICE_SERIES_LABEL, format_money(self.currency, y))
    }

    /// Index window covered by visible plot bounds `[x_min, x_max]`.
    /// Only whole rows inside the bounds count; a box narrower than one row keeps
    /// the nearest row.
    pub fn zoom_window(&self, x_min: f64, x_max: f64) -> Option<IndexWindow> {
        if !x_min.is_finite() || !x_max.is_finite() {
            return None;
        }
        let lo = x_min.ceil().max(0.0);
        let hi = x_max.floor().max(0.0);
        let window = if hi < lo {
            let nearest = ((x_min + x_max) / 2.0).round().max(0.0) as usize;
            IndexWindow::new(nearest, nearest)
        } else {
            IndexWindow::new(lo as usize, hi as usize)
        };
        window.clamp_to(self.total_len)
    }

    /// Hand the zoomed window to its owner when the visible bounds no longer match
    /// the rows on screen.
    pub fn report_zoom(&self, x_min: f64, x_max: f64, on_zoom: impl FnOnce(IndexWindow)) {
        let Some(zoomed) = self.zoom_window(x_min, x_max) else {
            return;
        };
        if Some(zoomed) != self.visible_window() {
            on_zoom(zoomed);
        }
    }
}

// ============================================================================
// Comparison charts
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueUnit {
    Currency,
    Percent,
}

/// Result columns plotted side by side for every strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display)]
pub enum ComparisonMetric {
    #[strum(to_string = "Amount Invested")]
    InvestmentCum,
    #[strum(to_string = "Total Value")]
    TotalValue,
    #[strum(to_string = "Percentage Returns")]
    PercentageReturns,
}

impl ComparisonMetric {
    pub fn column(self) -> &'static str {
        match self {
            ComparisonMetric::InvestmentCum => "investment_cum",
            ComparisonMetric::TotalValue => "total_value",
            ComparisonMetric::PercentageReturns => "percentage_returns",
        }
    }

    pub fn unit(self) -> ValueUnit {
        match self {
            ComparisonMetric::PercentageReturns => ValueUnit::Percent,
            _ => ValueUnit::Currency,
        }
    }
}

/// One scatter series per strategy, coloured by its position in the comparison.
pub fn create_comparison_chart_data(
    results: &StrategyComparison,
    metric: ComparisonMetric,
) -> ChartPayload {
    let series = results
        .iter()
        .enumerate()
        .map(|(i, (name, result))| {
            let points = match result.data.column(metric.column()) {
                Some(values) => result
                    .data
                    .dates()
                    .iter()
                    .zip(values)
                    .filter(|(_, v)| v.is_finite())
                    .map(|(date, &v)| [date_to_plot_x(*date), v])
                    .collect(),
                None => {
                    log::warn!("Strategy {} has no '{}' column", name, metric.column());
                    Vec::new()
                }
            };
            ChartSeries {
                label: name.to_string(),
                kind: DrawKind::Scatter,
                points,
                radii: Vec::new(),
                color: palette_color(i),
                fill: false,
                order: i as u32,
            }
        })
        .collect();

    ChartPayload { series }
}

pub struct ComparisonChartOptions<'a> {
    pub metric: ComparisonMetric,
    pub currency: &'a str,
    /// Union date range of every strategy, as plot x
    pub x_bounds: Option<(f64, f64)>,
}

impl<'a> ComparisonChartOptions<'a> {
    pub fn new(results: &StrategyComparison, metric: ComparisonMetric, currency: &'a str) -> Self {
        let x_bounds = union_date_range(results.values().map(|r| &r.data))
            .ok()
            .map(|(lo, hi)| (date_to_plot_x(lo), date_to_plot_x(hi)));
        Self {
            metric,
            currency,
            x_bounds,
        }
    }

    pub fn title(&self) -> String {
        self.metric.to_string()
    }

    pub fn tooltip_title(&self, x: f64) -> Option<String> {
        plot_x_to_date(x).map(format_date)
    }

    /// `"A: $1,000.00"` for money, `"A: 12.50%"` for percentages.
    pub fn tooltip_label(&self, series: &str, y: f64) -> String {
        let value = self.format_value(y);
        if series.is_empty() {
            value
        } else {
            format!("{}: {}", series, value)
        }
    }

    pub fn format_value(&self, y: f64) -> String {
        match self.metric.unit() {
            ValueUnit::Currency => format_money(self.currency, y),
            ValueUnit::Percent => format_percent(y),
        }
    }

    /// Narrow the union range to the selected dates, so the comparison follows the
    /// price chart window. Falls back to the union range when the two don't overlap.
    pub fn visible_x_bounds(&self, window_dates: Option<(NaiveDate, NaiveDate)>) -> Option<(f64, f64)> {
        let (lo, hi) = self.x_bounds?;
        let Some((from, to)) = window_dates else {
            return Some((lo, hi));
        };
        let (from, to) = (date_to_plot_x(from).max(lo), date_to_plot_x(to).min(hi));
        if from <= to {
            Some((from, to))
        } else {
            Some((lo, hi))
        }
    }
}
