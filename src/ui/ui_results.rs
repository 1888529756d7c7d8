use eframe::egui::{Grid, RichText, Ui};
use strum::IntoEnumIterator;

use crate::analysis::{CellColor, ColorScale, SummaryMetric, SummaryRanges};
use crate::config::FORM_DEFAULTS;
use crate::domain::{StrategyComparison, StrategySummary};
use crate::models::chart_data::palette_color;
use crate::ui::config::{UI_CONFIG, UI_TEXT};
use crate::ui::styles::UiStyleExt;
use crate::ui::utils::{section_heading, signed_color};
use crate::utils::format_utils::{format_money, format_percent};
use crate::utils::time_utils::{format_duration, format_long_date};

/// Summary row per strategy. Invested and returns columns are shaded from worst
/// to best across the strategies in the comparison.
pub fn render_results_table(ui: &mut Ui, results: &StrategyComparison, ranges: Option<&SummaryRanges>) {
    section_heading(ui, UI_TEXT.results_heading);

    // One scale per coloured column; a broken gradient just leaves cells unshaded
    let scales: Vec<(SummaryMetric, Option<ColorScale>)> = SummaryMetric::iter()
        .map(|metric| {
            let scale = ranges.and_then(|r| {
                ColorScale::for_metric(r, metric)
                    .inspect_err(|e| log::warn!("No colour scale for {}: {}", metric, e))
                    .ok()
            });
            (metric, scale)
        })
        .collect();
    let color_of = |metric: SummaryMetric, summary: &StrategySummary| {
        scales
            .iter()
            .find(|(m, _)| *m == metric)
            .and_then(|(_, scale)| scale.as_ref())
            .map(|scale| scale.color_for(metric.value(summary)))
            .unwrap_or(CellColor::Neutral)
    };

    let currency = FORM_DEFAULTS.currency_symbol;
    let width = UI_CONFIG.results_table_min_col_width;

    Grid::new("results_table")
        .num_columns(7)
        .striped(true)
        .spacing([4.0, 4.0])
        .show(ui, |ui| {
            for header in [
                UI_TEXT.col_strategy,
                UI_TEXT.col_start,
                UI_TEXT.col_duration,
                UI_TEXT.col_invested,
                UI_TEXT.col_value,
                UI_TEXT.col_returns,
                UI_TEXT.col_percentage_returns,
            ] {
                ui.label_subheader(header);
            }
            ui.end_row();

            for (index, (name, result)) in results.iter().enumerate() {
                let summary = &result.summary;

                ui.label(RichText::new(name).color(palette_color(index)));
                ui.label(summary.start_date().map(format_long_date).unwrap_or_default());
                ui.label(format_duration(summary.investment_time_days));
                ui.colored_cell(
                    format_money(currency, summary.total_invested),
                    color_of(SummaryMetric::TotalInvested, summary),
                    width,
                );
                ui.label(
                    summary
                        .value
                        .map(|v| format_money(currency, v))
                        .unwrap_or_else(|| format_money(currency, summary.total_invested + summary.returns)),
                );
                ui.colored_cell(
                    format_money(currency, summary.returns),
                    color_of(SummaryMetric::Returns, summary),
                    width,
                );
                ui.colored_cell(
                    format_percent(summary.percentage_returns),
                    color_of(SummaryMetric::PercentageReturns, summary),
                    width,
                );
                ui.end_row();
            }
        });

    // Single strategy: spell out the outcome as well
    if let Some((_, only)) = results.first().filter(|_| results.len() == 1) {
        ui.add_space(5.0);
        ui.metric(
            UI_TEXT.col_returns,
            &format_percent(only.summary.percentage_returns),
            signed_color(only.summary.percentage_returns),
        );
    }
}
