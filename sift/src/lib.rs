//! A headless debounced search engine.
//!
//! For adapter-level utilities (a search controller, load tracking, a tokio timer host), see the
//! `sift-adapter` crate.
//!
//! This crate focuses on the two pieces of logic behind a "search as you type" box:
//! - coalescing a burst of keystrokes into one settled query ([`Debouncer`])
//! - filtering a collection by case-insensitive substring, memoized on its inputs
//!   ([`Projection`], [`filter`])
//!
//! It is UI-agnostic. A TUI/GUI layer is expected to provide:
//! - a millisecond clock (`now_ms`) and a tick/timer to drive the debouncer
//! - the collection to filter, and a way to select each item's searchable text
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(all(test, not(feature = "std")))]
extern crate std;

#[macro_use]
mod macros;

mod debouncer;
mod error;
pub mod filter;
mod options;
mod projection;
mod state;
mod types;


pub use debouncer::Debouncer;
pub use error::ConfigError;
pub use filter::{compute_view, compute_view_indexes, for_each_match, matches};
pub use options::{
    DEFAULT_QUIET_PERIOD_MS, DebounceConfig, DebouncerOptions, ItemKeyFn, OnViewChangeCallback,
    ProjectionOptions, SettleCallback, TextSelector,
};
pub use projection::Projection;
pub use state::{DebounceSnapshot, ViewState};
pub use types::{DebounceState, ItemKey, Query, ViewItemKeyed};
