use egui_plot::{Line, MarkerShape, PlotPoints, PlotUi, Points};

use crate::config::PLOT_CONFIG;
use crate::models::{ChartPayload, ChartSeries, DrawKind};

/// Context passed to every layer during rendering.
pub struct LayerContext<'a> {
    pub payload: &'a ChartPayload,
    /// Baseline for filled lines (bottom of the visible y range)
    pub fill_base: f32,
}

/// A standardized layer in the plot stack.
pub trait PlotLayer {
    fn render(&self, ui: &mut PlotUi, ctx: &LayerContext);
}

/// Series of `kind` in paint order.
fn series_of<'a>(ctx: &'a LayerContext, kind: DrawKind) -> impl Iterator<Item = &'a ChartSeries> {
    ctx.payload
        .back_to_front()
        .into_iter()
        .filter(move |s| s.kind == kind)
}

// ============================================================================
// PRICE LINE
// ============================================================================
pub struct PriceLineLayer;

impl PlotLayer for PriceLineLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        for series in series_of(ctx, DrawKind::Line) {
            let mut line = Line::new(series.label.as_str(), PlotPoints::from(series.points.clone()))
                .color(series.color)
                .width(PLOT_CONFIG.price_line_width);
            if series.fill {
                line = line.fill(ctx.fill_base);
            }
            plot_ui.line(line);
        }
    }
}

// ============================================================================
// INVESTMENT BUBBLES
// ============================================================================
pub struct InvestmentLayer;

impl PlotLayer for InvestmentLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        for series in series_of(ctx, DrawKind::Bubble) {
            // One item per bubble since radius is per item; the shared name keeps
            // a single legend entry
            for (point, radius) in series.points.iter().zip(&series.radii) {
                plot_ui.points(
                    Points::new(series.label.as_str(), vec![*point])
                        .shape(MarkerShape::Circle)
                        .radius(*radius as f32)
                        .filled(series.fill)
                        .color(series.color),
                );
            }
        }
    }
}

// ============================================================================
// COMPARISON SERIES
// ============================================================================
pub struct ComparisonLayer;

impl PlotLayer for ComparisonLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        for series in series_of(ctx, DrawKind::Scatter) {
            plot_ui.line(
                Line::new(series.label.as_str(), PlotPoints::from(series.points.clone()))
                    .color(series.color)
                    .width(PLOT_CONFIG.comparison_line_width),
            );
            plot_ui.points(
                Points::new(series.label.as_str(), series.points.clone())
                    .shape(MarkerShape::Circle)
                    .radius(PLOT_CONFIG.comparison_point_radius)
                    .filled(true)
                    .color(series.color),
            );
        }
    }
}
