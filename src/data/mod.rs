// Backend access
pub mod api_client;

// Re-export commonly used types
pub use api_client::{ApiClient, ApiError};
