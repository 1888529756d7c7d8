use eframe::egui::{self, PointerButton, Slider};
use std::ops::RangeInclusive;
use egui_plot::{Corner, Legend, Plot};
use strum::IntoEnumIterator;

use crate::analysis::InvestmentMarkers;
use crate::config::{FORM_DEFAULTS, PLOT_CONFIG};
use crate::domain::{IndexWindow, TimeSeriesTable, WindowSource};
use crate::models::{
    ChartPayload, ComparisonChartOptions, ComparisonMetric, PriceChartOptions,
    create_comparison_chart_data, create_price_chart_data,
};
use crate::ui::app_state::DashboardState;
use crate::ui::config::UI_TEXT;
use crate::ui::plot_layers::{
    ComparisonLayer, InvestmentLayer, LayerContext, PlotLayer, PriceLineLayer,
};
use crate::ui::styles::UiStyleExt;
use crate::ui::utils::colored_subsection_heading;
use crate::utils::format_utils::format_money;
use crate::utils::maths_utils::min_max_nonempty;
use crate::utils::time_utils::{format_date, format_long_date, parse_date, plot_x_to_date};

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

/// Vertical margin around the data, as a fraction of its range
const Y_MARGIN: f64 = 0.05;

/// Price chart inputs for one (window, data version) pair.
struct PriceCache {
    key: (Option<IndexWindow>, u64),
    table: TimeSeriesTable,
    window: IndexWindow,
    payload: ChartPayload,
    markers: Option<InvestmentMarkers>,
}

struct ComparisonCache {
    data_version: u64,
    charts: Vec<(ComparisonMetric, ChartPayload)>,
}

#[derive(Default)]
pub struct PlotView {
    price_cache: Option<PriceCache>,
    comparison_cache: Option<ComparisonCache>,
}

impl PlotView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invalidate(&mut self) {
        self.price_cache = None;
        self.comparison_cache = None;
    }

    fn price_cache(&mut self, state: &DashboardState) -> Option<&PriceCache> {
        let key = (state.window.window(), state.data_version());
        let stale = self.price_cache.as_ref().is_none_or(|c| c.key != key);
        if stale {
            self.price_cache = state.visible_prices().map(|(table, window)| {
                let markers = state.investment_markers();
                let payload = create_price_chart_data(&table, markers.as_ref(), window.min);
                PriceCache {
                    key,
                    table,
                    window,
                    payload,
                    markers,
                }
            });
        }
        self.price_cache.as_ref()
    }

    /// Price line with investment bubbles. Drag a box to zoom; the zoom is handed to
    /// the window owner and comes back as the new visible slice.
    pub fn show_price_chart(&mut self, ui: &mut egui::Ui, state: &mut DashboardState) {
        let total_len = state.window.len();
        let Some(cache) = self.price_cache(state) else {
            return;
        };

        let currency = FORM_DEFAULTS.currency_symbol;
        let options = PriceChartOptions {
            table: &cache.table,
            offset: cache.window.min,
            total_len,
            currency,
            investments: cache.markers.as_ref().map(|m| &m.investments),
        };

        let x_bounds = options.x_bounds();
        let (y_min, y_max) = x_bounds
            .and_then(|(lo, hi)| y_range(&cache.payload, lo, hi))
            .unwrap_or((0.0, 1.0));
        let sync = state.window.take_chart_sync();

        let response = Plot::new("price_chart")
            .height(PLOT_CONFIG.price_plot_height)
            .legend(Legend::default().position(Corner::LeftTop))
            .allow_drag(false)
            .allow_scroll(false)
            .allow_zoom(false)
            .allow_double_click_reset(false)
            .allow_boxed_zoom(true)
            .boxed_zoom_pointer_button(PointerButton::Primary)
            .x_axis_formatter(|mark, _range| options.tooltip_title(mark.value).unwrap_or_default())
            .y_axis_formatter(|mark, _range| format_money(currency, mark.value))
            .label_formatter(|name, point| match options.tooltip_title(point.x) {
                Some(title) => format!("{}\n{}", title, options.tooltip_label(name, point.x, point.y)),
                None => String::new(),
            })
            .show(ui, |plot_ui| {
                if sync {
                    if let Some((lo, hi)) = x_bounds {
                        plot_ui.set_plot_bounds_x(lo..=hi);
                    }
                    plot_ui.set_plot_bounds_y(y_min..=y_max);
                }

                let ctx = LayerContext {
                    payload: &cache.payload,
                    fill_base: y_min as f32,
                };

                // Back to front
                let layers: Vec<Box<dyn PlotLayer>> =
                    vec![Box::new(PriceLineLayer), Box::new(InvestmentLayer)];
                for layer in layers {
                    layer.render(plot_ui, &ctx);
                }
            });

        if !sync {
            let bounds = response.transform.bounds();
            options.report_zoom(bounds.min()[0], bounds.max()[0], |zoomed| {
                #[cfg(debug_assertions)]
                if DEBUG_FLAGS.print_ui_interactions {
                    log::info!("Chart zoom -> {:?}", zoomed);
                }
                state.window.propose(WindowSource::ChartZoom, zoomed);
            });
        }
    }

    /// Range sliders under the price chart, with the selected dates spelled out.
    pub fn show_window_controls(&mut self, ui: &mut egui::Ui, state: &mut DashboardState) {
        let Some(ticker) = state.ticker.as_ref() else {
            return;
        };
        let prices = &ticker.prices;
        let (Some(window), Some(last)) = (state.window.window(), prices.last_index()) else {
            return;
        };

        let (mut lo, mut hi) = (window.min, window.max);
        let date_label = |v: f64, _: RangeInclusive<usize>| {
            prices
                .date(v.max(0.0) as usize)
                .map(format_date)
                .unwrap_or_default()
        };
        let date_index = |text: &str| {
            let date = parse_date(text.trim()).ok()?;
            Some(prices.dates().partition_point(|d| *d < date).min(last) as f64)
        };

        let mut proposal = None;
        egui::Grid::new("window_controls")
            .num_columns(2)
            .show(ui, |ui| {
                ui.label(UI_TEXT.window_from_label);
                let from = ui.add(
                    Slider::new(&mut lo, 0..=last)
                        .show_value(true)
                        .custom_formatter(date_label)
                        .custom_parser(date_index),
                );
                if from.changed() {
                    hi = hi.max(lo);
                    proposal = Some(IndexWindow::new(lo, hi));
                }
                ui.end_row();

                ui.label(UI_TEXT.window_to_label);
                let to = ui.add(
                    Slider::new(&mut hi, 0..=last)
                        .show_value(true)
                        .custom_formatter(date_label)
                        .custom_parser(date_index),
                );
                if to.changed() {
                    lo = lo.min(hi);
                    proposal = Some(IndexWindow::new(lo, hi));
                }
                ui.end_row();
            });

        if let Some((from, to)) = state.window.caption_dates(prices) {
            ui.label_subdued(format!("{}  -  {}", format_long_date(from), format_long_date(to)));
        }

        ui.horizontal(|ui| {
            if !state.window.is_full_range() && ui.button(UI_TEXT.reset_zoom_button).clicked() {
                state.window.reset();
            }
            ui.label_subdued(UI_TEXT.zoom_hint);
        });

        if let Some(window) = proposal {
            state.window.propose(WindowSource::Slider, window);
        }
    }

    /// One chart per comparison metric, following the price chart's date window.
    pub fn show_comparison_charts(&mut self, ui: &mut egui::Ui, state: &DashboardState) {
        let Some(results) = state.results.as_ref() else {
            return;
        };

        let version = state.data_version();
        if self
            .comparison_cache
            .as_ref()
            .is_none_or(|c| c.data_version != version)
        {
            let charts = ComparisonMetric::iter()
                .map(|metric| (metric, create_comparison_chart_data(results, metric)))
                .collect();
            self.comparison_cache = Some(ComparisonCache {
                data_version: version,
                charts,
            });
        }
        let Some(cache) = self.comparison_cache.as_ref() else {
            return;
        };

        let window_dates = state.window_dates();
        let currency = FORM_DEFAULTS.currency_symbol;

        for (metric, payload) in &cache.charts {
            let options = ComparisonChartOptions::new(results, *metric, currency);
            let x_bounds = options.visible_x_bounds(window_dates);
            let y_bounds = x_bounds.and_then(|(lo, hi)| y_range(payload, lo, hi));

            ui.add_space(5.0);
            ui.label(colored_subsection_heading(options.title()));

            Plot::new(format!("comparison_{}", metric.column()))
                .height(PLOT_CONFIG.comparison_plot_height)
                .legend(Legend::default().position(Corner::LeftTop))
                .allow_drag(false)
                .allow_scroll(false)
                .allow_zoom(false)
                .allow_boxed_zoom(false)
                .allow_double_click_reset(false)
                .x_axis_formatter(|mark, _range| {
                    plot_x_to_date(mark.value).map(format_date).unwrap_or_default()
                })
                .y_axis_formatter(|mark, _range| options.format_value(mark.value))
                .label_formatter(|name, point| {
                    format!(
                        "{}\n{}",
                        options.tooltip_title(point.x).unwrap_or_default(),
                        options.tooltip_label(name, point.y)
                    )
                })
                .show(ui, |plot_ui| {
                    if let Some((lo, hi)) = x_bounds {
                        plot_ui.set_plot_bounds_x(lo..=hi);
                    }
                    if let Some((lo, hi)) = y_bounds {
                        plot_ui.set_plot_bounds_y(lo..=hi);
                    }
                    let ctx = LayerContext {
                        payload,
                        fill_base: 0.0,
                    };
                    ComparisonLayer.render(plot_ui, &ctx);
                });
        }
    }
}

/// Min/max y of the points with x in `[x_lo, x_hi]`, widened by a small margin.
/// `None` when no point falls inside.
fn y_range(payload: &ChartPayload, x_lo: f64, x_hi: f64) -> Option<(f64, f64)> {
    let ys: Vec<f64> = payload
        .series
        .iter()
        .flat_map(|s| s.points.iter())
        .filter(|[x, y]| (x_lo..=x_hi).contains(x) && y.is_finite())
        .map(|[_, y]| *y)
        .collect();
    let (min, max) = min_max_nonempty(&ys)?;

    let margin = if max > min {
        (max - min) * Y_MARGIN
    } else {
        min.abs().max(1.0) * Y_MARGIN
    };
    Some((min - margin, max + margin))
}
