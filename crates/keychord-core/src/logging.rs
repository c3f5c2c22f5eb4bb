//! Tracing integration for keychord.
//!
//! keychord uses the `tracing` crate for instrumentation. To see logs,
//! install a subscriber in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("keychord=debug,keychord_core=trace")
//!     .init();
//! ```
//!
//! Raw events and cursor movement log at `trace`, matches and listener
//! attach/detach at `debug`.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Timer queue target.
    pub const TIMER: &str = "keychord_core::timer";
    /// Input source target.
    pub const SOURCE: &str = "keychord_core::source";
    /// Registration and scope switching.
    pub const REGISTRY: &str = "keychord::registry";
    /// Key event state machine.
    pub const DISPATCH: &str = "keychord::dispatch";
    /// Configuration loading.
    pub const CONFIG: &str = "keychord::config";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Used to group everything logged while one raw event is handled.
#[derive(Debug)]
pub struct EventSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl EventSpan {
    /// Enter a span for handling one event of the given kind.
    pub fn new(kind: &'static str) -> Self {
        let span = tracing::trace_span!(target: targets::DISPATCH, "key_event", kind);
        Self {
            span: span.entered(),
        }
    }
}
