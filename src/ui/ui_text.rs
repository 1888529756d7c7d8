/// All user-facing strings, kept together so wording stays consistent.
pub struct UiText {
    pub app_title: &'static str,

    // Ticker search
    pub ticker_heading: &'static str,
    pub ticker_hint: &'static str,
    pub ticker_search_button: &'static str,
    pub ticker_suggestions_label: &'static str,
    pub ticker_loading: &'static str,
    pub ticker_not_found: &'static str,
    pub ticker_price_label: &'static str,
    pub ticker_placeholder: &'static str,

    // Strategy form
    pub strategy_heading: &'static str,
    pub initial_investment_label: &'static str,
    pub regular_investment_label: &'static str,
    pub frequency_label: &'static str,
    pub start_date_label: &'static str,
    pub strategy_label: &'static str,
    pub strategy_parameters_heading: &'static str,
    pub run_button: &'static str,
    pub running_label: &'static str,
    pub add_to_compare_button: &'static str,
    pub save_button: &'static str,
    pub new_entry_button: &'static str,
    pub catalog_unavailable: &'static str,

    // Comparison list
    pub comparison_heading: &'static str,
    pub comparison_empty: &'static str,
    pub remove_button: &'static str,

    // Charts
    pub price_chart_heading: &'static str,
    pub reset_zoom_button: &'static str,
    pub window_from_label: &'static str,
    pub window_to_label: &'static str,
    pub zoom_hint: &'static str,
    pub comparison_charts_heading: &'static str,

    // Results
    pub results_heading: &'static str,
    pub col_strategy: &'static str,
    pub col_start: &'static str,
    pub col_duration: &'static str,
    pub col_invested: &'static str,
    pub col_value: &'static str,
    pub col_returns: &'static str,
    pub col_percentage_returns: &'static str,

    // Alerts
    pub alert_title: &'static str,
    pub alert_dismiss: &'static str,
}

pub const UI_TEXT: UiText = UiText {
    app_title: "Backtest Dashboard",

    ticker_heading: "Ticker",
    ticker_hint: "e.g. MSFT",
    ticker_search_button: "Search",
    ticker_suggestions_label: "Try:",
    ticker_loading: "Looking up ticker...",
    ticker_not_found: "The ticker does not exist, please try another",
    ticker_price_label: "Current price",
    ticker_placeholder: "Search for a ticker to get started.",

    strategy_heading: "Strategy",
    initial_investment_label: "Initial investment",
    regular_investment_label: "Regular investment",
    frequency_label: "Every",
    start_date_label: "Start date",
    strategy_label: "Strategy",
    strategy_parameters_heading: "Strategy parameters",
    run_button: "Run",
    running_label: "Running...",
    add_to_compare_button: "Add to compare",
    save_button: "Save",
    new_entry_button: "New",
    catalog_unavailable: "Strategies unavailable (is the backend running?)",

    comparison_heading: "Compare",
    comparison_empty: "Add strategies to compare them side by side.",
    remove_button: "Remove",

    price_chart_heading: "Price",
    reset_zoom_button: "Reset",
    window_from_label: "From",
    window_to_label: "To",
    zoom_hint: "Drag on the chart to zoom",
    comparison_charts_heading: "Comparison",

    results_heading: "Results",
    col_strategy: "Strategy",
    col_start: "Start",
    col_duration: "Duration",
    col_invested: "Invested",
    col_value: "Value",
    col_returns: "Returns",
    col_percentage_returns: "% Returns",

    alert_title: "Something went wrong",
    alert_dismiss: "OK",
};
