use thiserror::Error;

/// Errors raised while building a [`crate::Debouncer`].
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The quiet period is negative, NaN or infinite.
    #[error("invalid configuration: quiet period must be a finite non-negative number of milliseconds (got {quiet_period_ms})")]
    InvalidConfiguration { quiet_period_ms: f64 },
}
