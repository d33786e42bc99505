use alloc::string::String;

use crate::DebounceState;

/// A lightweight, serializable snapshot of a debouncer.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DebounceSnapshot {
    pub state: DebounceState,
    /// When the pending value settles, in the host's millisecond clock.
    pub deadline_ms: Option<u64>,
    pub quiet_period_ms: u64,
}

/// A lightweight, serializable summary of a projection's current view.
///
/// This is useful for status lines ("3 of 10 users") without exposing the items themselves.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewState {
    pub query: String,
    pub matched: usize,
    pub total: usize,
}
