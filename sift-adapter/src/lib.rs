//! Adapter utilities for the `sift` crate.
//!
//! The `sift` crate is UI-agnostic and focuses on the debounce and filtering logic. This crate
//! provides small, framework-neutral helpers commonly needed by adapters:
//!
//! - A search controller tying a debounced input box to a filtered view
//! - Load tracking for the collection being searched (loading flag, last error, stale responses)
//! - A tokio-backed debouncer for adapters without a frame loop (feature `tokio`)
//!
//! This crate is intentionally framework-agnostic (no ratatui/egui bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(all(test, not(feature = "std")))]
extern crate std;

#[macro_use]
mod macros;

mod controller;
mod load;
#[cfg(feature = "tokio")]
mod timer;

#[cfg(test)]
mod tests;

pub use controller::SearchController;
pub use load::{FetchError, LoadSource, LoadStatus, LoadTicket, LoadTracker};
#[cfg(feature = "tokio")]
pub use timer::TimedDebouncer;
