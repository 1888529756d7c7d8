#![allow(clippy::collapsible_if)]
#![allow(clippy::type_complexity)]

// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod models;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use data::{ApiClient, ApiError};
pub use domain::{IndexWindow, StrategyComparison, StrategyRequest, TimeSeriesTable, WindowSync};
pub use ui::DashboardApp;

// CLI argument parsing
use clap::Parser;

use crate::config::API;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the backtest backend
    #[arg(long, default_value = API.base_url)]
    pub api_url: String,

    /// Look this ticker up as soon as the window opens
    #[arg(long)]
    pub ticker: Option<String>,
}

/// Main application entry point - creates the GUI app
pub fn run_app(cc: &eframe::CreationContext, args: &Cli) -> Box<dyn eframe::App> {
    let app = ui::DashboardApp::new(cc, &args.api_url, args.ticker.clone());
    Box::new(app)
}
