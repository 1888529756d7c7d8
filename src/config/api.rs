//! Backend REST API configuration.

/// Endpoint paths, relative to the base URL
pub struct ApiEndpoints {
    /// Price history + instrument info, `?ticker=<symbol>`
    pub get_data: &'static str,
    /// Strategy catalog with parameter schemas
    pub get_all_strategies: &'static str,
    /// Runs one or more strategies (POST, JSON body)
    pub post_strategy: &'static str,
}

/// Default values for the HTTP client
pub struct ClientDefaults {
    pub timeout_ms: u64,
    pub user_agent: &'static str,
}

/// The Master Configuration Struct
pub struct ApiConfig {
    pub base_url: &'static str,
    pub endpoints: ApiEndpoints,
    pub client: ClientDefaults,
}

pub const API: ApiConfig = ApiConfig {
    base_url: "http://127.0.0.1:8080",
    endpoints: ApiEndpoints {
        get_data: "/api/get_data/",
        get_all_strategies: "/api/get_all_strategies/",
        post_strategy: "/api/post_strategy/",
    },
    client: ClientDefaults {
        // Strategy runs over long histories can take a while server-side
        timeout_ms: 60_000,
        user_agent: concat!("backtest-dashboard/", env!("CARGO_PKG_VERSION")),
    },
};
