#![forbid(unsafe_code)]

//! Dispatch configuration for observable records.
//!
//! [`RecordConfig`] is fixed when a record is created. It is never read from
//! the environment implicitly; call [`RecordConfig::from_env`] to opt in.
//!
//! # Environment
//!
//! | Variable               | Values                    | Default     |
//! |------------------------|---------------------------|-------------|
//! | `PROPWIRE_DISPATCH`    | `propagate` \| `isolate`  | `propagate` |
//! | `PROPWIRE_TRACE_SPANS` | `1` `true` `yes` `on`     | off         |
//!
//! Unrecognized values fall back to the default.

/// Environment variable selecting the [`DispatchPolicy`].
pub const DISPATCH_ENV: &str = "PROPWIRE_DISPATCH";

/// Environment variable enabling per-dispatch tracing spans.
pub const TRACE_SPANS_ENV: &str = "PROPWIRE_TRACE_SPANS";

/// What happens when an observer panics during notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchPolicy {
    /// The panic unwinds out of the mutating call; later observers in the
    /// same cycle are not notified.
    #[default]
    Propagate,
    /// The panic is caught and logged; remaining observers still run.
    Isolate,
}

impl DispatchPolicy {
    /// Parse a policy name (case-insensitive, surrounding whitespace ignored).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "propagate" | "fail-fast" => Some(Self::Propagate),
            "isolate" => Some(Self::Isolate),
            _ => None,
        }
    }

    /// Stable name of the policy.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Propagate => "propagate",
            Self::Isolate => "isolate",
        }
    }
}

/// Configuration for an observable record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordConfig {
    /// Observer panic policy.
    pub dispatch: DispatchPolicy,
    /// Wrap each notification cycle in a `debug` span.
    pub trace_spans: bool,
}

impl RecordConfig {
    /// Default configuration: propagate panics, no spans.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dispatch policy.
    #[must_use]
    pub fn with_dispatch(mut self, dispatch: DispatchPolicy) -> Self {
        self.dispatch = dispatch;
        self
    }

    /// Enable or disable per-dispatch spans.
    #[must_use]
    pub fn with_trace_spans(mut self, enabled: bool) -> Self {
        self.trace_spans = enabled;
        self
    }

    /// Read configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Read configuration through `get_env`.
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let dispatch = get_env(DISPATCH_ENV)
            .and_then(|v| DispatchPolicy::parse(&v))
            .unwrap_or_default();
        let trace_spans = get_env(TRACE_SPANS_ENV).is_some_and(|v| env_flag(&v));
        Self {
            dispatch,
            trace_spans,
        }
    }
}

/// Whether an environment value turns a flag on (`1`, `true`, `yes`, `on`).
#[inline]
#[must_use]
pub fn env_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
