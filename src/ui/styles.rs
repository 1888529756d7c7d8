use eframe::egui::{Align, Color32, Frame, Layout, Margin, RichText, Ui, vec2};

use crate::analysis::CellColor;
use crate::ui::config::UI_CONFIG;
use crate::ui::utils::cell_fill;

/// Extension trait to add semantic styling methods directly to `egui::Ui`.
pub trait UiStyleExt {
    /// Renders small, gray text (good for labels like "Invested:").
    fn label_subdued(&mut self, text: impl Into<String>);

    /// Renders a "Label: Value" pair. The label is subdued, the value is colored.
    fn metric(&mut self, label: &str, value: &str, color: Color32);

    /// Renders a sub-section header using the configured global color.
    fn label_subheader(&mut self, text: impl Into<String>);

    /// Renders an error message (Red).
    fn label_error(&mut self, text: impl Into<String>);

    /// Right-aligned table cell with a gradient background.
    fn colored_cell(&mut self, text: impl Into<String>, color: CellColor, min_width: f32);
}

impl UiStyleExt for Ui {
    fn label_subdued(&mut self, text: impl Into<String>) {
        self.label(RichText::new(text).small().color(Color32::GRAY));
    }

    fn metric(&mut self, label: &str, value: &str, color: Color32) {
        self.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 2.0; // Tight spacing
            ui.label_subdued(format!("{}:", label));
            ui.label(RichText::new(value).color(color));
        });
    }

    fn label_subheader(&mut self, text: impl Into<String>) {
        self.label(RichText::new(text).color(UI_CONFIG.colors.subsection_heading));
    }

    fn label_error(&mut self, text: impl Into<String>) {
        self.label(RichText::new(text).small().color(Color32::from_rgb(255, 100, 100)));
    }

    fn colored_cell(&mut self, text: impl Into<String>, color: CellColor, min_width: f32) {
        let fill = cell_fill(color);
        // Dark text on the pastel gradient, regular text when there is no fill
        let text_color = if fill == Color32::TRANSPARENT {
            self.visuals().text_color()
        } else {
            Color32::BLACK
        };
        Frame::new()
            .fill(fill)
            .inner_margin(Margin::symmetric(6, 2))
            .show(self, |ui| {
                ui.allocate_ui_with_layout(
                    vec2(min_width, ui.spacing().interact_size.y),
                    Layout::right_to_left(Align::Center),
                    |ui| ui.label(RichText::new(text).monospace().color(text_color)),
                );
            });
    }
}
