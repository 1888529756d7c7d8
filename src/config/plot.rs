//! Plot visualization configuration

use eframe::egui::Color32;

pub struct PlotConfig {
    /// Price line, filled down to the bottom of the plot
    pub price_line_color: Color32,
    pub price_line_width: f32,
    /// Investment bubbles drawn over the price line
    pub marker_color: Color32,
    /// Bubble radius (points) for the smallest and largest non-zero investment
    pub marker_radius_range: (f64, f64),
    /// Categorical palette for comparison series, cycled by insertion order ("Set1")
    pub comparison_palette: &'static [&'static str],
    pub comparison_line_width: f32,
    /// Summary table cell gradient, worst to best
    pub summary_gradient_colors: &'static [&'static str],
    /// Opacity applied to summary cell colours so the text stays readable
    pub summary_cell_opacity_pct: f32,
    pub price_plot_height: f32,
    pub comparison_plot_height: f32,
    /// Radius of the dots on comparison lines
    pub comparison_point_radius: f32,
}

pub const PLOT_CONFIG: PlotConfig = PlotConfig {
    price_line_color: Color32::from_rgb(54, 162, 235),
    price_line_width: 1.5,
    marker_color: Color32::from_rgb(255, 99, 132),
    marker_radius_range: (2.0, 7.0),
    comparison_palette: &[
        "#e41a1c", // Red
        "#377eb8", // Blue
        "#4daf4a", // Green
        "#984ea3", // Purple
        "#ff7f00", // Orange
        "#ffff33", // Yellow
        "#a65628", // Brown
        "#f781bf", // Pink
        "#999999", // Grey
    ],
    comparison_line_width: 1.5,
    summary_gradient_colors: &[
        "#F1948A", // Soft red
        "#FAFA33", // Yellow
        "#58D68D", // Soft green
    ],
    summary_cell_opacity_pct: 0.85,
    price_plot_height: 320.0,
    comparison_plot_height: 220.0,
    comparison_point_radius: 1.5,
};
