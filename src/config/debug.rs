//! Debugging feature flags.
//!
//! Toggle individual diagnostics here; keep them `false` by default so debug
//! builds stay readable. Every use site is further gated by `cfg(debug_assertions)`.

pub struct DebugFlags {
    /// Emit UI interaction logs (ticker searches, form submissions, comparison edits).
    pub print_ui_interactions: bool,
    /// Emit every accepted or ignored window proposal (slider / zoom / reset / load).
    pub print_window_sync: bool,
    /// Emit request lifecycle logs (sent, completed, discarded as stale).
    pub print_requests: bool,
    /// Emit shutdown app messages.
    pub print_shutdown: bool,
}

pub const DEBUG_FLAGS: DebugFlags = DebugFlags {
    print_ui_interactions: true,
    print_window_sync: false,
    print_requests: true,
    print_shutdown: false,
};
