use eframe::egui::{Align2, CentralPanel, Context, Frame, RichText, ScrollArea, SidePanel, Window};

use crate::config::FORM_DEFAULTS;
use crate::ui::config::{UI_CONFIG, UI_TEXT};
use crate::ui::styles::UiStyleExt;
use crate::ui::ui_panels::{
    ComparisonEvent, ComparisonPanel, Panel, StrategyFormEvent, StrategyFormPanel, TickerEvent,
    TickerPanel,
};
use crate::ui::ui_results::render_results_table;
use crate::ui::utils::{colored_heading, section_heading, spaced_separator};
use crate::utils::format_utils::format_money;

use super::app::{AppError, DashboardApp};

impl DashboardApp {
    pub(super) fn render_side_panel(&mut self, ctx: &Context) {
        let side_panel_frame = Frame::new()
            .fill(UI_CONFIG.colors.side_panel)
            .inner_margin(8.0);
        SidePanel::left("left_panel")
            .default_width(UI_CONFIG.side_panel_width)
            .frame(side_panel_frame)
            .show(ctx, |ui| {
                ScrollArea::vertical().id_salt("side_panel").show(ui, |ui| {
                    // The ticker is fixed once a comparison set refers to its history
                    let mut ticker_events = Vec::new();
                    if self.state.comparisons.is_empty() {
                        let loading = self.state.is_looking_up();
                        let enabled = !self.state.running;
                        ticker_events =
                            TickerPanel::new(&mut self.state.ticker_input, loading, enabled)
                                .render(ui);
                        spaced_separator(ui);
                    }

                    let start_bounds = self.state.start_date_bounds();
                    let form_events = StrategyFormPanel::new(
                        &mut self.state.form,
                        &self.state.catalog,
                        start_bounds,
                        self.state.running,
                        self.state.editing.as_deref(),
                    )
                    .render(ui);

                    spaced_separator(ui);

                    let comparison_events = ComparisonPanel::new(
                        &self.state.comparisons,
                        &self.state.catalog,
                        self.state.editing.as_deref(),
                    )
                    .render(ui);

                    for event in ticker_events {
                        match event {
                            TickerEvent::Search(symbol) => self.start_ticker_lookup(&symbol),
                        }
                    }
                    for event in form_events {
                        self.handle_form_event(event);
                    }
                    for event in comparison_events {
                        match event {
                            ComparisonEvent::Edit(name) => self.state.select_comparison(&name),
                            ComparisonEvent::Remove(name) => self.state.remove_comparison(&name),
                        }
                    }
                });
            });
    }

    fn handle_form_event(&mut self, event: StrategyFormEvent) {
        match event {
            StrategyFormEvent::Run => self.start_strategy_run(),
            StrategyFormEvent::AddToComparison => {
                if let Err(e) = self.state.add_to_comparison() {
                    self.state.alert = Some(e);
                }
            }
            StrategyFormEvent::SaveComparison => {
                if !self.state.save_comparison() {
                    log::warn!("Nothing to save: entry {:?} is gone", self.state.editing);
                    self.state.stop_editing();
                }
            }
            StrategyFormEvent::NewEntry => self.state.new_entry(),
        }
    }

    pub(super) fn render_central_panel(&mut self, ctx: &Context) {
        let central_panel_frame = Frame::new()
            .fill(UI_CONFIG.colors.central_panel)
            .inner_margin(10.0);
        CentralPanel::default()
            .frame(central_panel_frame)
            .show(ctx, |ui| {
                ScrollArea::vertical().id_salt("central_panel").show(ui, |ui| {
                    let Some(ticker) = self.state.ticker.as_ref() else {
                        ui.add_space(20.0);
                        ui.label_subdued(UI_TEXT.ticker_placeholder);
                        return;
                    };

                    ui.heading(RichText::new(ticker.info.display_name()).color(UI_CONFIG.colors.heading));
                    if let Some(price) = ticker.info.display_price() {
                        ui.metric(
                            UI_TEXT.ticker_price_label,
                            &format_money(FORM_DEFAULTS.currency_symbol, price),
                            UI_CONFIG.colors.label,
                        );
                    }

                    section_heading(ui, UI_TEXT.price_chart_heading);
                    self.plot_view.show_price_chart(ui, &mut self.state);
                    self.plot_view.show_window_controls(ui, &mut self.state);

                    if let Some(results) = self.state.results.as_ref() {
                        spaced_separator(ui);
                        render_results_table(ui, results, self.state.summary_ranges.as_ref());

                        spaced_separator(ui);
                        section_heading(ui, UI_TEXT.comparison_charts_heading);
                        self.plot_view.show_comparison_charts(ui, &self.state);
                    }
                });
            });
    }

    /// Blocking alert: stays on top until dismissed.
    pub(super) fn render_alert(&mut self, ctx: &Context) {
        let Some(alert) = self.state.alert.as_ref() else {
            return;
        };

        let mut dismissed = false;
        Window::new(colored_heading(UI_TEXT.alert_title))
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                if matches!(alert, AppError::TickerNotFound(_)) {
                    ui.label(alert.to_string());
                } else {
                    ui.label_error(alert.to_string());
                }
                ui.add_space(8.0);
                if ui.button(UI_TEXT.alert_dismiss).clicked() {
                    dismissed = true;
                }
            });

        if dismissed {
            self.state.alert = None;
        }
    }
}
