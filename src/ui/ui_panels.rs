use chrono::{Days, NaiveDate};
use eframe::egui::{Button, ComboBox, DragValue, Grid, Key, RichText, Slider, TextEdit, Ui};
use strum::IntoEnumIterator;

use crate::config::FORM_DEFAULTS;
use crate::domain::{ComparisonSet, Frequency, StrategyCatalog, StrategyForm};
use crate::ui::config::{UI_CONFIG, UI_TEXT};
use crate::ui::styles::UiStyleExt;
use crate::ui::utils::{colored_subsection_heading, section_heading, spaced_separator};
use crate::utils::time_utils::{format_date, parse_date};

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

/// Trait for UI panels that can be rendered
pub trait Panel {
    type Event;
    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event>;
}

// ============================================================================
// Ticker search
// ============================================================================

pub struct TickerPanel<'a> {
    input: &'a mut String,
    loading: bool,
    /// Greyed out while a strategy run is in flight
    enabled: bool,
}

impl<'a> TickerPanel<'a> {
    pub fn new(input: &'a mut String, loading: bool, enabled: bool) -> Self {
        Self {
            input,
            loading,
            enabled,
        }
    }
}

#[derive(Debug)]
pub enum TickerEvent {
    Search(String),
}

impl<'a> Panel for TickerPanel<'a> {
    type Event = TickerEvent;
    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event> {
        let mut events = Vec::new();
        section_heading(ui, UI_TEXT.ticker_heading);

        ui.add_enabled_ui(self.enabled, |ui| {
            ui.horizontal(|ui| {
                let response = ui.add(
                    TextEdit::singleline(self.input)
                        .hint_text(UI_TEXT.ticker_hint)
                        .desired_width(140.0),
                );
                let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
                if ui.button(UI_TEXT.ticker_search_button).clicked() || submitted {
                    events.push(TickerEvent::Search(self.input.trim().to_string()));
                }
                if self.loading {
                    ui.spinner();
                }
            });

            ui.horizontal_wrapped(|ui| {
                ui.label_subdued(UI_TEXT.ticker_suggestions_label);
                for symbol in FORM_DEFAULTS.suggested_tickers {
                    if ui.small_button(*symbol).clicked() {
                        *self.input = symbol.to_string();
                        events.push(TickerEvent::Search(symbol.to_string()));
                    }
                }
            });
        });

        if self.loading {
            ui.label_subdued(UI_TEXT.ticker_loading);
        }

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_ui_interactions {
            for event in &events {
                log::info!("Ticker panel: {:?}", event);
            }
        }
        events
    }
}

// ============================================================================
// Strategy form
// ============================================================================

pub struct StrategyFormPanel<'a> {
    form: &'a mut StrategyForm,
    catalog: &'a StrategyCatalog,
    /// Selectable range for the start date; `None` until a ticker is loaded
    start_bounds: Option<(NaiveDate, NaiveDate)>,
    running: bool,
    editing: Option<&'a str>,
}

impl<'a> StrategyFormPanel<'a> {
    pub fn new(
        form: &'a mut StrategyForm,
        catalog: &'a StrategyCatalog,
        start_bounds: Option<(NaiveDate, NaiveDate)>,
        running: bool,
        editing: Option<&'a str>,
    ) -> Self {
        Self {
            form,
            catalog,
            start_bounds,
            running,
            editing,
        }
    }

    fn render_amounts(&mut self, ui: &mut Ui) {
        let currency = FORM_DEFAULTS.currency_symbol;
        Grid::new("strategy_amounts")
            .num_columns(2)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                ui.label(UI_TEXT.initial_investment_label);
                ui.add(
                    DragValue::new(&mut self.form.initial_investment)
                        .speed(10.0)
                        .range(0.0..=f64::MAX)
                        .prefix(currency),
                );
                ui.end_row();

                ui.label(UI_TEXT.regular_investment_label);
                ui.add(
                    DragValue::new(&mut self.form.regular_investment)
                        .speed(10.0)
                        .range(0.0..=f64::MAX)
                        .prefix(currency),
                );
                ui.end_row();

                ui.label(UI_TEXT.frequency_label);
                let enabled = self.form.frequency_enabled();
                ui.add_enabled_ui(enabled, |ui| {
                    let frequency = &mut self.form.regular_investment_frequency;
                    ComboBox::from_id_salt("regular_investment_frequency")
                        .selected_text(frequency.to_string())
                        .show_ui(ui, |ui| {
                            for option in Frequency::iter() {
                                ui.selectable_value(frequency, option, option.to_string());
                            }
                        });
                });
                ui.end_row();
            });
    }

    fn render_start_date(&mut self, ui: &mut Ui) {
        ui.label(colored_subsection_heading(UI_TEXT.start_date_label));
        let Some((earliest, latest)) = self.start_bounds else {
            ui.label_subdued(UI_TEXT.ticker_placeholder);
            return;
        };

        let span = (latest - earliest).num_days().max(0) as u64;
        let current = self.form.start_date.unwrap_or(earliest);
        let mut offset = (current - earliest).num_days().clamp(0, span as i64) as u64;

        let response = ui.add(
            Slider::new(&mut offset, 0..=span)
                .custom_formatter(move |v, _| {
                    earliest
                        .checked_add_days(Days::new(v.max(0.0) as u64))
                        .map(format_date)
                        .unwrap_or_default()
                })
                .custom_parser(move |text| {
                    let date = parse_date(text.trim()).ok()?;
                    Some((date - earliest).num_days() as f64)
                }),
        );

        if response.changed() {
            self.form.start_date = earliest.checked_add_days(Days::new(offset));
            #[cfg(debug_assertions)]
            if DEBUG_FLAGS.print_ui_interactions {
                log::info!("Start date -> {:?}", self.form.start_date);
            }
        } else if self.form.start_date.is_none() {
            self.form.start_date = Some(earliest);
        }
    }

    fn render_strategy_selector(&mut self, ui: &mut Ui) {
        ui.label(colored_subsection_heading(UI_TEXT.strategy_label));
        if self.catalog.is_empty() {
            ui.label_error(UI_TEXT.catalog_unavailable);
            return;
        }

        let selected = self
            .form
            .strategy
            .as_deref()
            .and_then(|key| self.catalog.get(key))
            .map(|def| def.display_name.clone())
            .unwrap_or_default();

        ComboBox::from_id_salt("strategy_selector")
            .selected_text(selected)
            .width(UI_CONFIG.side_panel_width - 40.0)
            .show_ui(ui, |ui| {
                for definition in self.catalog.iter() {
                    ui.selectable_value(
                        &mut self.form.strategy,
                        Some(definition.key.clone()),
                        &definition.display_name,
                    );
                }
            });
    }

    fn render_parameters(&mut self, ui: &mut Ui) {
        let Some(key) = self.form.strategy.clone() else {
            return;
        };
        let catalog = self.catalog;
        let rows = catalog.parameter_rows(&key, FORM_DEFAULTS.parameter_columns);
        if rows.is_empty() {
            return;
        }

        ui.add_space(5.0);
        ui.label(colored_subsection_heading(UI_TEXT.strategy_parameters_heading));

        let mut problems = Vec::new();
        Grid::new("strategy_parameters")
            .num_columns(FORM_DEFAULTS.parameter_columns * 2)
            .spacing([8.0, 6.0])
            .show(ui, |ui| {
                for row in rows {
                    for spec in row {
                        let text = self
                            .form
                            .parameters
                            .entry(spec.name.clone())
                            .or_insert_with(|| spec.default_text());
                        ui.label(&spec.label);
                        ui.add(TextEdit::singleline(text).desired_width(60.0));
                        if let Err(e) = spec.coerce(text) {
                            problems.push(e.to_string());
                        }
                    }
                    ui.end_row();
                }
            });

        for problem in problems {
            ui.label_error(problem);
        }
    }
}

#[derive(Debug)]
pub enum StrategyFormEvent {
    Run,
    AddToComparison,
    SaveComparison,
    NewEntry,
}

impl<'a> Panel for StrategyFormPanel<'a> {
    type Event = StrategyFormEvent;
    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event> {
        let mut events = Vec::new();
        section_heading(ui, UI_TEXT.strategy_heading);

        self.render_amounts(ui);
        ui.add_space(5.0);
        self.render_start_date(ui);
        ui.add_space(5.0);
        self.render_strategy_selector(ui);
        self.render_parameters(ui);

        spaced_separator(ui);

        let can_submit = self.start_bounds.is_some() && self.form.strategy.is_some();
        ui.horizontal(|ui| {
            if self.running {
                ui.add_enabled(false, Button::new(UI_TEXT.running_label));
                ui.spinner();
            } else if ui
                .add_enabled(can_submit, Button::new(UI_TEXT.run_button))
                .clicked()
            {
                events.push(StrategyFormEvent::Run);
            }

            if ui
                .add_enabled(can_submit, Button::new(UI_TEXT.add_to_compare_button))
                .clicked()
            {
                events.push(StrategyFormEvent::AddToComparison);
            }
        });

        if let Some(name) = self.editing {
            ui.horizontal(|ui| {
                if ui.button(format!("{} {}", UI_TEXT.save_button, name)).clicked() {
                    events.push(StrategyFormEvent::SaveComparison);
                }
                if ui.button(UI_TEXT.new_entry_button).clicked() {
                    events.push(StrategyFormEvent::NewEntry);
                }
            });
        }

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_ui_interactions {
            for event in &events {
                log::info!("Strategy form: {:?}", event);
            }
        }
        events
    }
}

// ============================================================================
// Comparison list
// ============================================================================

pub struct ComparisonPanel<'a> {
    comparisons: &'a ComparisonSet,
    catalog: &'a StrategyCatalog,
    editing: Option<&'a str>,
}

impl<'a> ComparisonPanel<'a> {
    pub fn new(
        comparisons: &'a ComparisonSet,
        catalog: &'a StrategyCatalog,
        editing: Option<&'a str>,
    ) -> Self {
        Self {
            comparisons,
            catalog,
            editing,
        }
    }
}

#[derive(Debug)]
pub enum ComparisonEvent {
    Edit(String),
    Remove(String),
}

impl<'a> Panel for ComparisonPanel<'a> {
    type Event = ComparisonEvent;
    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event> {
        let mut events = Vec::new();
        section_heading(ui, UI_TEXT.comparison_heading);

        if self.comparisons.is_empty() {
            ui.label_subdued(UI_TEXT.comparison_empty);
            return events;
        }

        for (name, form) in self.comparisons.iter() {
            let is_selected = self.editing == Some(name);
            ui.horizontal(|ui| {
                let strategy = form
                    .strategy
                    .as_deref()
                    .and_then(|key| self.catalog.get(key))
                    .map(|def| def.display_name.as_str())
                    .unwrap_or_default();
                let label = RichText::new(name).color(if is_selected {
                    UI_CONFIG.colors.selected_entry
                } else {
                    UI_CONFIG.colors.label
                });
                if ui
                    .selectable_label(is_selected, label)
                    .on_hover_text(strategy)
                    .clicked()
                {
                    events.push(ComparisonEvent::Edit(name.to_string()));
                }
                if ui.small_button(UI_TEXT.remove_button).clicked() {
                    events.push(ComparisonEvent::Remove(name.to_string()));
                }
            });
        }

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_ui_interactions {
            for event in &events {
                log::info!("Comparison list: {:?}", event);
            }
        }
        events
    }
}
