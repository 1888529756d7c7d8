use eframe::{Frame, egui};
use poll_promise::Promise;
use std::fmt;

use crate::data::{ApiClient, ApiError};
use crate::domain::{StrategyCatalog, StrategyComparison};
use crate::ui::app_async::TickerResponse;
use crate::ui::app_state::DashboardState;
use crate::ui::config::UI_TEXT;
use crate::ui::ui_plot_view::PlotView;
use crate::ui::utils::setup_custom_visuals;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

/// Error types for application operations
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// The backend could not return data for this symbol
    TickerNotFound(String),
    /// A strategy was submitted before any price history was loaded
    NoTickerLoaded,
    /// The strategy form could not be turned into a request
    InvalidForm(String),
    /// Transport or decoding failure talking to the backend
    RequestFailed(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::TickerNotFound(_) => write!(f, "{}", UI_TEXT.ticker_not_found),
            AppError::NoTickerLoaded => write!(f, "Load a ticker before running a strategy"),
            AppError::InvalidForm(msg) => write!(f, "Invalid strategy: {}", msg),
            AppError::RequestFailed(msg) => write!(f, "Request failed: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<ApiError> for AppError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::TickerNotFound(ticker) => AppError::TickerNotFound(ticker),
            other => AppError::RequestFailed(other.to_string()),
        }
    }
}

pub struct DashboardApp {
    pub(super) state: DashboardState,
    /// `None` when the configured base URL is unusable; requests are then skipped
    pub(super) client: Option<ApiClient>,
    pub(super) plot_view: PlotView,

    // In-flight requests
    pub(super) ticker_promises: Vec<Promise<TickerResponse>>,
    pub(super) catalog_promise: Option<Promise<Result<StrategyCatalog, AppError>>>,
    pub(super) strategy_promise: Option<Promise<Result<StrategyComparison, AppError>>>,
}

impl DashboardApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        api_url: &str,
        initial_ticker: Option<String>,
    ) -> Self {
        setup_custom_visuals(&cc.egui_ctx);

        let mut state = DashboardState::default();
        let client = match ApiClient::new(api_url) {
            Ok(client) => Some(client),
            Err(e) => {
                log::error!("Cannot use backend at '{}': {}", api_url, e);
                state.alert = Some(AppError::from(e));
                None
            }
        };

        let mut app = Self {
            state,
            client,
            plot_view: PlotView::new(),
            ticker_promises: Vec::new(),
            catalog_promise: None,
            strategy_promise: None,
        };

        app.start_catalog_load();
        if let Some(ticker) = initial_ticker {
            app.state.ticker_input = ticker.clone();
            app.start_ticker_lookup(&ticker);
        }

        app
    }
}

impl eframe::App for DashboardApp {
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        // Detached worker threads finish on their own; just drop the receivers
        self.ticker_promises.clear();
        self.catalog_promise = None;
        self.strategy_promise = None;

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_shutdown {
            log::info!("Application shutdown complete.");
        }
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.poll_async(ctx);

        self.render_side_panel(ctx);
        self.render_central_panel(ctx);
        self.render_alert(ctx);

        // Releases the slider suppression token armed by programmatic window changes
        self.state.window.end_frame();
    }
}
