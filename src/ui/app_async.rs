use eframe::egui;
use poll_promise::Promise;
use std::time::Instant;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::domain::TickerPayload;
use crate::ui::app::{AppError, DashboardApp};

/// A finished ticker lookup, tagged with the request id it answers.
pub(super) struct TickerResponse {
    pub(super) id: u64,
    pub(super) result: Result<TickerPayload, AppError>,
}

impl DashboardApp {
    /// Every search starts a new request; older ones keep running but their
    /// responses are dropped by `DashboardState::finish_ticker_lookup`.
    pub(super) fn start_ticker_lookup(&mut self, symbol: &str) {
        let Some(client) = self.client.clone() else {
            log::warn!("No backend configured; ignoring lookup of '{}'", symbol);
            return;
        };
        let Some(request) = self.state.begin_ticker_lookup(symbol) else {
            return;
        };

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_requests {
            log::info!("Ticker lookup #{} for '{}'", request.id, request.symbol);
        }

        let promise = Promise::spawn_thread("ticker_lookup", move || {
            let start = Instant::now();
            let result = client.get_data(&request.symbol).map_err(AppError::from);

            log::debug!("Ticker lookup #{} finished in {:?}", request.id, start.elapsed());

            TickerResponse {
                id: request.id,
                result,
            }
        });
        self.ticker_promises.push(promise);
    }

    pub(super) fn start_catalog_load(&mut self) {
        if self.catalog_promise.is_some() {
            return;
        }
        let Some(client) = self.client.clone() else {
            return;
        };

        self.catalog_promise = Some(Promise::spawn_thread("strategy_catalog", move || {
            client.get_all_strategies().map_err(AppError::from)
        }));
    }

    /// Submit the current form (or comparison set). A second click while a run is
    /// in flight is ignored.
    pub(super) fn start_strategy_run(&mut self) {
        let Some(client) = self.client.clone() else {
            return;
        };

        let request = match self.state.begin_strategy_run() {
            Ok(Some(request)) => request,
            Ok(None) => return,
            Err(e) => {
                self.state.alert = Some(e);
                return;
            }
        };

        self.strategy_promise = Some(Promise::spawn_thread("strategy_run", move || {
            client.post_strategy(&request).map_err(AppError::from)
        }));
    }

    /// Drain whatever finished since last frame.
    pub(super) fn poll_async(&mut self, ctx: &egui::Context) {
        let mut pending = Vec::with_capacity(self.ticker_promises.len());
        for promise in self.ticker_promises.drain(..) {
            match promise.try_take() {
                Ok(response) => {
                    if self.state.finish_ticker_lookup(response.id, response.result) {
                        self.plot_view.invalidate();
                    }
                }
                Err(promise) => pending.push(promise),
            }
        }
        self.ticker_promises = pending;

        if let Some(promise) = self.catalog_promise.take() {
            match promise.try_take() {
                Ok(Ok(catalog)) => {
                    log::info!("Loaded {} strategies", catalog.len());
                    self.state.apply_catalog(catalog);
                }
                Ok(Err(e)) => {
                    log::error!("Failed to load strategies: {}", e);
                }
                Err(promise) => self.catalog_promise = Some(promise),
            }
        }

        if let Some(promise) = self.strategy_promise.take() {
            match promise.try_take() {
                Ok(result) => {
                    self.state.finish_strategy_run(result);
                    self.plot_view.invalidate();
                }
                Err(promise) => self.strategy_promise = Some(promise),
            }
        }

        if !self.ticker_promises.is_empty()
            || self.catalog_promise.is_some()
            || self.strategy_promise.is_some()
        {
            ctx.request_repaint();
        }
    }
}
