use chrono::NaiveDate;

use crate::analysis::{InvestmentMarkers, SummaryRanges, build_markers, filter_window, window_for_dates};
use crate::domain::strategy::start_date_bounds;
use crate::domain::{
    ComparisonSet, IndexWindow, StrategyCatalog, StrategyComparison, StrategyForm,
    StrategyRequest, TickerInfo, TickerPayload, TimeSeriesTable, WindowSync,
};
use crate::ui::app::AppError;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

/// Price history currently on screen.
#[derive(Debug, Clone)]
pub struct LoadedTicker {
    pub info: TickerInfo,
    pub prices: TimeSeriesTable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerRequest {
    pub id: u64,
    pub symbol: String,
}

/// Everything the dashboard shows, with every transition as a plain method so the
/// request/response flow can be exercised without a window.
#[derive(Debug, Default)]
pub struct DashboardState {
    pub ticker_input: String,
    pub ticker: Option<LoadedTicker>,
    pub window: WindowSync,

    pub catalog: StrategyCatalog,
    pub form: StrategyForm,
    pub comparisons: ComparisonSet,
    /// Comparison entry loaded into the form, if any
    pub editing: Option<String>,

    pub results: Option<StrategyComparison>,
    pub summary_ranges: Option<SummaryRanges>,
    /// A strategy submission is in flight
    pub running: bool,

    pub alert: Option<AppError>,

    /// Bumped whenever `ticker` or `results` is replaced; keys render caches
    data_version: u64,
    last_ticker_request: u64,
    pending_ticker: Option<u64>,
    /// Bumped on every successful ticker load
    ticker_loads: u64,
    /// `ticker_loads` at the time the in-flight run was submitted
    run_for_load: Option<u64>,
}

impl DashboardState {
    pub fn data_version(&self) -> u64 {
        self.data_version
    }

    pub fn is_looking_up(&self) -> bool {
        self.pending_ticker.is_some()
    }

    /// The ticker is fixed while a run is in flight or a comparison set exists,
    /// since both refer to the loaded history.
    pub fn can_change_ticker(&self) -> bool {
        !self.running && self.comparisons.is_empty()
    }

    // ------------------------------------------------------------------
    // Ticker lookup (last request wins)
    // ------------------------------------------------------------------

    /// Tag a new lookup. Any response to an earlier lookup is discarded from now on.
    pub fn begin_ticker_lookup(&mut self, symbol: &str) -> Option<TickerRequest> {
        let symbol = symbol.trim();
        if symbol.is_empty() || !self.can_change_ticker() {
            return None;
        }
        self.last_ticker_request += 1;
        self.pending_ticker = Some(self.last_ticker_request);
        Some(TickerRequest {
            id: self.last_ticker_request,
            symbol: symbol.to_string(),
        })
    }

    /// Apply a lookup response. Returns `true` when a new ticker was loaded.
    /// A failed lookup raises the alert and leaves the current ticker untouched.
    pub fn finish_ticker_lookup(
        &mut self,
        id: u64,
        result: Result<TickerPayload, AppError>,
    ) -> bool {
        if self.pending_ticker != Some(id) {
            #[cfg(debug_assertions)]
            if DEBUG_FLAGS.print_requests {
                log::info!("Discarding stale ticker response #{}", id);
            }
            return false;
        }
        self.pending_ticker = None;

        let payload = match result {
            Ok(payload) if !payload.data.is_empty() => payload,
            Ok(payload) => {
                self.alert = Some(AppError::TickerNotFound(payload.info.symbol));
                return false;
            }
            Err(e) => {
                self.alert = Some(e);
                return false;
            }
        };

        self.window.load(payload.data.len());
        self.results = None;
        self.summary_ranges = None;
        self.data_version += 1;
        self.ticker_loads += 1;

        self.form.start_date = start_date_bounds(&payload.data).map(|(earliest, _)| earliest);

        log::info!(
            "Loaded {} ({} rows)",
            payload.info.display_name(),
            payload.data.len()
        );
        self.ticker = Some(LoadedTicker {
            info: payload.info,
            prices: payload.data,
        });
        true
    }

    // ------------------------------------------------------------------
    // Strategy catalog and form
    // ------------------------------------------------------------------

    pub fn apply_catalog(&mut self, catalog: StrategyCatalog) {
        for (name, default) in catalog.default_parameters() {
            self.form.parameters.entry(name).or_insert(default);
        }
        let known = self
            .form
            .strategy
            .as_deref()
            .is_some_and(|key| catalog.get(key).is_some());
        if !known {
            self.form.strategy = catalog.first_key().map(str::to_string);
        }
        self.catalog = catalog;
    }

    pub fn start_date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.ticker.as_ref().and_then(|t| start_date_bounds(&t.prices))
    }

    pub fn add_to_comparison(&mut self) -> Result<String, AppError> {
        let name = self
            .comparisons
            .add(self.form.clone())
            .map_err(|e| AppError::InvalidForm(e.to_string()))?;
        // The form goes back to creating a new entry
        self.editing = None;
        Ok(name)
    }

    /// Load a comparison entry into the form for editing.
    pub fn select_comparison(&mut self, name: &str) {
        if let Some(form) = self.comparisons.get(name) {
            self.form = form.clone();
            self.editing = Some(name.to_string());
        }
    }

    /// Write the form back into the entry being edited.
    pub fn save_comparison(&mut self) -> bool {
        match self.editing.clone() {
            Some(name) => self.comparisons.update(&name, self.form.clone()),
            None => false,
        }
    }

    pub fn remove_comparison(&mut self, name: &str) {
        self.comparisons.remove(name);
        if self.editing.as_deref() == Some(name) {
            self.editing = None;
        }
    }

    pub fn stop_editing(&mut self) {
        self.editing = None;
    }

    /// Fresh form with catalog defaults, detached from any comparison entry.
    pub fn new_entry(&mut self) {
        let start = self.start_date_bounds().map(|(earliest, _)| earliest);
        self.form = StrategyForm::with_catalog(&self.catalog, start);
        self.editing = None;
    }

    // ------------------------------------------------------------------
    // Strategy runs (one at a time)
    // ------------------------------------------------------------------

    /// Build the submission for the current form or comparison set.
    /// `Ok(None)` while a run is already in flight.
    pub fn begin_strategy_run(&mut self) -> Result<Option<StrategyRequest>, AppError> {
        if self.running {
            return Ok(None);
        }
        let ticker = self.ticker.as_ref().ok_or(AppError::NoTickerLoaded)?;
        let symbol = ticker.info.symbol.as_str();

        let request = if self.comparisons.is_empty() {
            StrategyRequest::from_form(&self.form, &self.catalog, symbol)
        } else {
            StrategyRequest::from_comparisons(&self.comparisons, &self.catalog, symbol)
        }
        .map_err(|e| AppError::InvalidForm(format!("{:#}", e)))?;

        self.running = true;
        self.run_for_load = Some(self.ticker_loads);
        Ok(Some(request))
    }

    /// Results replace the previous run wholesale. A failure is logged and the form
    /// is kept for a retry. Results for a ticker that is no longer loaded are dropped.
    pub fn finish_strategy_run(&mut self, result: Result<StrategyComparison, AppError>) {
        self.running = false;
        if self.run_for_load.take() != Some(self.ticker_loads) {
            log::warn!("Discarding strategy results for a ticker that is no longer loaded");
            return;
        }
        match result {
            Ok(results) if results.is_empty() => {
                log::warn!("Strategy run returned no results");
                self.results = None;
                self.summary_ranges = None;
            }
            Ok(results) => {
                self.summary_ranges = SummaryRanges::from_results(&results)
                    .inspect_err(|e| log::warn!("No summary ranges: {}", e))
                    .ok();
                self.results = Some(results);
            }
            Err(e) => {
                log::error!("Strategy run failed: {}", e);
                return;
            }
        }
        self.data_version += 1;
    }

    // ------------------------------------------------------------------
    // Derived views
    // ------------------------------------------------------------------

    /// First and last date of the selected window.
    pub fn window_dates(&self) -> Option<(NaiveDate, NaiveDate)> {
        let ticker = self.ticker.as_ref()?;
        self.window.caption_dates(&ticker.prices)
    }

    /// Investment bubbles for the selected window. Only shown for a single strategy;
    /// with several results the bubbles would be ambiguous.
    pub fn investment_markers(&self) -> Option<InvestmentMarkers> {
        let results = self.results.as_ref().filter(|r| r.len() == 1)?;
        let (_, result) = results.first()?;
        let (from, to) = self.window_dates()?;
        let rows = window_for_dates(&result.data, from, to)?;

        build_markers(&filter_window(&result.data, rows))
            .inspect_err(|e| log::warn!("Cannot place investment markers: {}", e))
            .ok()
    }

    /// Visible slice of the price history and the absolute index of its first row.
    pub fn visible_prices(&self) -> Option<(TimeSeriesTable, IndexWindow)> {
        let ticker = self.ticker.as_ref()?;
        let window = self.window.window()?.clamp_to(ticker.prices.len())?;
        Some((filter_window(&ticker.prices, window), window))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WindowSource;
    use crate::domain::strategy::{StrategiesResponse, StrategyResult};
    use serde_json::json;

    fn payload(symbol: &str, dates: &[&str]) -> TickerPayload {
        serde_json::from_value(json!({
            "info": {"symbol": symbol, "shortName": format!("{} Inc", symbol)},
            "data": {
                "Date": dates,
                "Open": (0..dates.len()).map(|i| 10.0 + i as f64).collect::<Vec<_>>()
            }
        }))
        .unwrap()
    }

    fn catalog() -> StrategyCatalog {
        let json = r#"{"strategies": {
            "RegularInvestment": [],
            "MovingAverage": [{"name": "window", "label": "Window", "type": "integer", "default": 20}]
        }}"#;
        serde_json::from_str::<StrategiesResponse>(json).unwrap().into_catalog()
    }

    fn result(dates: &[&str], investments: Vec<f64>) -> StrategyResult {
        let n = dates.len();
        serde_json::from_value(json!({
            "data": {
                "Date": dates,
                "Open": (0..n).map(|i| 10.0 + i as f64).collect::<Vec<_>>(),
                "investment": investments
            },
            "summary": {"total_invested": 100.0, "returns": 5.0, "percentage_returns": 5.0,
                        "investment_date": [dates[0]], "investment_time_days": 3}
        }))
        .unwrap()
    }

    const DATES: [&str; 4] = ["2023-01-02", "2023-01-03", "2023-01-04", "2023-01-05"];

    fn run(state: &mut DashboardState, results: Vec<(&str, StrategyResult)>) {
        state.begin_strategy_run().unwrap().unwrap();
        state.finish_strategy_run(Ok(results
            .into_iter()
            .map(|(name, result)| (name.to_string(), result))
            .collect()));
    }

    fn loaded_state() -> DashboardState {
        let mut state = DashboardState::default();
        state.apply_catalog(catalog());
        let request = state.begin_ticker_lookup("MSFT").unwrap();
        assert!(state.finish_ticker_lookup(request.id, Ok(payload("MSFT", &DATES))));
        state
    }

    #[test]
    fn blank_symbol_does_not_start_a_lookup() {
        let mut state = DashboardState::default();
        assert_eq!(state.begin_ticker_lookup("   "), None);
        assert!(!state.is_looking_up());
    }

    #[test]
    fn stale_ticker_responses_are_discarded() {
        let mut state = DashboardState::default();
        let first = state.begin_ticker_lookup("AAPL").unwrap();
        let second = state.begin_ticker_lookup("MSFT").unwrap();

        assert!(state.finish_ticker_lookup(second.id, Ok(payload("MSFT", &DATES))));
        // The older request resolves late and must not overwrite the newer one
        assert!(!state.finish_ticker_lookup(first.id, Ok(payload("AAPL", &DATES))));
        assert_eq!(state.ticker.as_ref().unwrap().info.symbol, "MSFT");
    }

    #[test]
    fn failed_lookup_keeps_the_previous_ticker() {
        let mut state = loaded_state();
        let request = state.begin_ticker_lookup("NOPE").unwrap();

        assert!(!state.finish_ticker_lookup(request.id, Err(AppError::TickerNotFound("NOPE".into()))));
        assert_eq!(state.alert, Some(AppError::TickerNotFound("NOPE".into())));
        assert_eq!(state.ticker.as_ref().unwrap().info.symbol, "MSFT");
        assert!(!state.is_looking_up());
    }

    #[test]
    fn new_ticker_resets_window_and_results() {
        let mut state = loaded_state();
        state.window.end_frame();
        state.window.propose(WindowSource::Slider, IndexWindow::new(1, 2));
        run(&mut state, vec![("default", result(&DATES, vec![100.0, 0.0, 0.0, 0.0]))]);
        assert!(state.results.is_some());

        let request = state.begin_ticker_lookup("TSLA").unwrap();
        state.finish_ticker_lookup(request.id, Ok(payload("TSLA", &DATES[..3])));

        assert!(state.results.is_none());
        assert!(state.summary_ranges.is_none());
        assert_eq!(state.window.window(), Some(IndexWindow::new(0, 2)));
        assert_eq!(state.form.start_date, crate::utils::time_utils::parse_date("2023-01-02").ok());
    }

    #[test]
    fn only_one_strategy_run_at_a_time() {
        let mut state = loaded_state();
        let request = state.begin_strategy_run().unwrap().unwrap();
        assert_eq!(request.ticker, "MSFT");
        assert!(request.strategy.contains("default"));
        assert!(state.running);

        assert_eq!(state.begin_strategy_run(), Ok(None));

        let form_before = state.form.clone();
        state.finish_strategy_run(Err(AppError::RequestFailed("timeout".into())));
        assert!(!state.running);
        assert_eq!(state.form, form_before);
        assert!(state.results.is_none());
    }

    #[test]
    fn results_for_a_replaced_ticker_are_dropped() {
        let mut state = loaded_state();
        // Lookup starts, the run is submitted against MSFT, then TSLA lands
        let tsla = state.begin_ticker_lookup("TSLA").unwrap();
        state.begin_strategy_run().unwrap().unwrap();
        assert!(state.finish_ticker_lookup(tsla.id, Ok(payload("TSLA", &DATES))));

        state.finish_strategy_run(Ok([("default".to_string(), result(&DATES, vec![100.0, 0.0, 0.0, 0.0]))]
            .into_iter()
            .collect()));

        assert!(!state.running);
        assert_eq!(state.ticker.as_ref().unwrap().info.symbol, "TSLA");
        assert!(state.results.is_none());
        assert!(state.investment_markers().is_none());

        // The next run against the new ticker goes through
        run(&mut state, vec![("default", result(&DATES, vec![100.0, 0.0, 0.0, 0.0]))]);
        assert!(state.results.is_some());
    }

    #[test]
    fn ticker_is_locked_while_running_or_comparing() {
        let mut state = loaded_state();
        state.begin_strategy_run().unwrap().unwrap();
        assert!(!state.can_change_ticker());
        assert_eq!(state.begin_ticker_lookup("TSLA"), None);

        state.finish_strategy_run(Err(AppError::RequestFailed("timeout".into())));
        assert!(state.can_change_ticker());

        state.add_to_comparison().unwrap();
        assert_eq!(state.begin_ticker_lookup("TSLA"), None);
        assert!(!state.is_looking_up());

        state.remove_comparison("RegularInvestment_1");
        assert!(state.begin_ticker_lookup("TSLA").is_some());
    }

    #[test]
    fn new_ticker_resets_the_start_date_to_its_earliest_day() {
        let mut state = loaded_state();
        state.form.start_date = crate::utils::time_utils::parse_date("2023-01-03").ok();

        let request = state.begin_ticker_lookup("TSLA").unwrap();
        assert!(state.finish_ticker_lookup(request.id, Ok(payload("TSLA", &DATES))));
        assert_eq!(state.form.start_date, crate::utils::time_utils::parse_date("2023-01-02").ok());
    }

    #[test]
    fn strategy_needs_a_ticker() {
        let mut state = DashboardState::default();
        state.apply_catalog(catalog());
        assert_eq!(state.begin_strategy_run(), Err(AppError::NoTickerLoaded));
        assert!(!state.running);
    }

    #[test]
    fn comparison_set_drives_the_request() {
        let mut state = loaded_state();
        assert_eq!(state.add_to_comparison().unwrap(), "RegularInvestment_1");
        // Adding leaves the form in create mode
        assert_eq!(state.editing, None);
        state.form.strategy = Some("MovingAverage".into());
        assert_eq!(state.add_to_comparison().unwrap(), "MovingAverage_1");

        state.select_comparison("RegularInvestment_1");
        state.form.initial_investment = 42.0;
        assert!(state.save_comparison());
        assert_eq!(state.comparisons.get("RegularInvestment_1").unwrap().initial_investment, 42.0);

        let request = state.begin_strategy_run().unwrap().unwrap();
        assert_eq!(
            request.strategy.names().collect::<Vec<_>>(),
            vec!["RegularInvestment_1", "MovingAverage_1"]
        );

        state.remove_comparison("RegularInvestment_1");
        assert_eq!(state.editing, None);
    }

    #[test]
    fn new_entry_resets_the_form() {
        let mut state = loaded_state();
        state.form.initial_investment = 5.0;
        state.form.strategy = Some("MovingAverage".into());
        state.add_to_comparison().unwrap();

        state.new_entry();
        assert_eq!(state.editing, None);
        assert_eq!(state.form.strategy.as_deref(), Some("RegularInvestment"));
        assert_eq!(state.form.initial_investment, 1000.0);
        assert_eq!(state.form.parameters.get("window").map(String::as_str), Some("20"));
        assert_eq!(state.form.start_date, crate::utils::time_utils::parse_date("2023-01-02").ok());
    }

    #[test]
    fn markers_follow_the_window_for_a_single_result() {
        let mut state = loaded_state();
        run(&mut state, vec![("default", result(&DATES, vec![100.0, 0.0, 50.0, 0.0]))]);
        assert_eq!(state.investment_markers().unwrap().markers.len(), 2);

        state.window.end_frame();
        state.window.propose(WindowSource::Slider, IndexWindow::new(1, 3));
        let markers = state.investment_markers().unwrap();
        assert_eq!(markers.markers.len(), 1);
        assert_eq!(markers.markers[0].date, crate::utils::time_utils::parse_date("2023-01-04").unwrap());
    }

    #[test]
    fn no_markers_when_comparing_several_results() {
        let mut state = loaded_state();
        run(
            &mut state,
            vec![
                ("A_1", result(&DATES, vec![100.0, 0.0, 50.0, 0.0])),
                ("B_1", result(&DATES, vec![10.0, 0.0, 0.0, 0.0])),
            ],
        );
        assert!(state.summary_ranges.is_some());
        assert!(state.investment_markers().is_none());
    }

    #[test]
    fn visible_prices_follow_the_window() {
        let mut state = loaded_state();
        state.window.end_frame();
        state.window.propose(WindowSource::Slider, IndexWindow::new(2, 3));
        let (visible, window) = state.visible_prices().unwrap();
        assert_eq!(visible.len(), 2);
        assert_eq!(window.min, 2);
    }
}
