use eframe::egui::Color32;

pub use crate::ui::ui_text::{UI_TEXT, UiText};

/// UI Colors for consistent theming
#[derive(Clone, Copy, Default)]
pub struct UiColors {
    pub label: Color32,
    pub heading: Color32,
    pub subsection_heading: Color32,
    pub central_panel: Color32,
    pub side_panel: Color32,
    pub positive: Color32,
    pub negative: Color32,
    pub selected_entry: Color32,
}

/// Main UI configuration struct that holds all UI-related settings
#[derive(Default, Clone, Copy)]
pub struct UiConfig {
    pub colors: UiColors,
    pub side_panel_width: f32,
    pub results_table_min_col_width: f32,
}

/// Global UI configuration instance
pub static UI_CONFIG: UiConfig = UiConfig {
    colors: UiColors {
        label: Color32::GRAY,     // This sets every label globally to this color
        heading: Color32::YELLOW, // Sets every heading
        subsection_heading: Color32::ORANGE, // Sets every subsection heading
        central_panel: Color32::from_rgb(30, 32, 38),
        side_panel: Color32::from_rgb(25, 25, 25),
        positive: Color32::from_rgb(88, 214, 141),
        negative: Color32::from_rgb(241, 148, 138),
        selected_entry: Color32::from_rgb(255, 215, 0),
    },
    side_panel_width: 320.0,
    results_table_min_col_width: 90.0,
};
