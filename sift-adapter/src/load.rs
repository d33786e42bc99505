use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::String;
use alloc::vec::Vec;

use thiserror::Error;

/// A failed data-source fetch, as reported by the adapter's own HTTP/IO layer.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FetchError {
    pub message: String,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Names one independent data source (one collection).
///
/// Loads from different sources never supersede each other; only a newer load of the same source
/// does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoadSource(pub u32);

impl LoadSource {
    /// The source whose collection is searched.
    pub const PRIMARY: Self = Self(0);
}

/// Identifies one in-flight load. Tickets are ordered by issue time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoadTicket {
    seq: u64,
    source: LoadSource,
}

impl LoadTicket {
    pub fn id(self) -> u64 {
        self.seq
    }

    pub fn source(self) -> LoadSource {
        self.source
    }
}

/// A lightweight, serializable snapshot of the data-source state, for loading/error indicators.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoadStatus {
    pub in_flight: usize,
    pub last_error: Option<String>,
    /// The ticket whose result is currently displayed, one per source.
    pub applied: Vec<LoadTicket>,
}

impl LoadStatus {
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }
}

/// Tracks concurrent loads from one or more data sources.
///
/// - `is_loading` stays `true` until every issued ticket has completed, across all sources.
/// - A successful result is accepted only if no newer ticket of the same source has already
///   delivered one, so a slow, older response never overwrites fresher data.
/// - A failure records its message and keeps the current data. The next accepted result clears
///   the error.
#[derive(Clone, Debug, Default)]
pub struct LoadTracker {
    next_seq: u64,
    in_flight: BTreeSet<LoadTicket>,
    applied: BTreeMap<LoadSource, LoadTicket>,
    last_error: Option<String>,
}

impl LoadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a load of the primary source.
    pub fn begin(&mut self) -> LoadTicket {
        self.begin_from(LoadSource::PRIMARY)
    }

    pub fn begin_from(&mut self, source: LoadSource) -> LoadTicket {
        let ticket = LoadTicket {
            seq: self.next_seq,
            source,
        };
        self.next_seq = self.next_seq.wrapping_add(1);
        self.in_flight.insert(ticket);
        atrace!(
            ticket = ticket.seq,
            source = source.0,
            in_flight = self.in_flight.len(),
            "load begin"
        );
        ticket
    }

    /// Completes `ticket`, returning the value when it should be applied.
    pub fn complete<T>(&mut self, ticket: LoadTicket, result: Result<T, FetchError>) -> Option<T> {
        if !self.in_flight.remove(&ticket) {
            awarn!(ticket = ticket.seq, "load completed twice or never issued; ignoring");
            return None;
        }
        match result {
            Ok(value) => {
                let newer_applied = self
                    .applied
                    .get(&ticket.source)
                    .is_some_and(|applied| applied.seq > ticket.seq);
                if newer_applied {
                    awarn!(
                        ticket = ticket.seq,
                        source = ticket.source.0,
                        "dropping stale load result"
                    );
                    return None;
                }
                adebug!(
                    ticket = ticket.seq,
                    source = ticket.source.0,
                    in_flight = self.in_flight.len(),
                    "load applied"
                );
                self.applied.insert(ticket.source, ticket);
                self.last_error = None;
                Some(value)
            }
            Err(err) => {
                adebug!(ticket = ticket.seq, error = %err, "load failed");
                self.last_error = Some(err.message);
                None
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        !self.in_flight.is_empty()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// The ticket currently displayed for `source`.
    pub fn applied(&self, source: LoadSource) -> Option<LoadTicket> {
        self.applied.get(&source).copied()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn status(&self) -> LoadStatus {
        LoadStatus {
            in_flight: self.in_flight.len(),
            last_error: self.last_error.clone(),
            applied: self.applied.values().copied().collect(),
        }
    }
}
