//! Configuration module for the backtest dashboard.

pub mod api;
pub mod form;

mod debug; // Private: use crate::config::DEBUG_FLAGS
pub use debug::DEBUG_FLAGS;

pub mod plot;

// Re-export commonly used items
pub use api::API;
pub use form::FORM_DEFAULTS;
pub use plot::PLOT_CONFIG;
