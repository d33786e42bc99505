use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::sync::Arc;

use sift::{
    ConfigError, Debouncer, DebouncerOptions, ItemKey, Projection, ProjectionOptions, Query,
};

use crate::{FetchError, LoadSource, LoadStatus, LoadTicket, LoadTracker};

/// A framework-neutral search controller: a debounced input feeding a memoized filtered view,
/// plus load tracking for the collection being searched.
///
/// This type does not hold any UI objects. Adapters drive it by calling:
/// - `on_input(text, now_ms)` on every keystroke
/// - `tick(now_ms)` each frame/timer tick, to settle the query once typing pauses
/// - `begin_load` / `complete_load` around each fetch of the searched collection
/// - `begin_load_from(source)` for other collections shown next to it (unfiltered)
///
/// Render from `projection()` and `collection(source)` (and `is_loading()` / `last_error()` for
/// indicators).
#[derive(Clone, Debug)]
pub struct SearchController<E, K = ItemKey> {
    input: Debouncer<String>,
    projection: Projection<E, K>,
    secondary: BTreeMap<LoadSource, Arc<[E]>>,
    loads: LoadTracker,
}

impl<E, K> SearchController<E, K> {
    pub fn new(
        input: DebouncerOptions<String>,
        projection: ProjectionOptions<E, K>,
    ) -> Result<Self, ConfigError> {
        Ok(Self::from_parts(
            Debouncer::new(input)?,
            Projection::new(projection),
        ))
    }

    pub fn from_parts(input: Debouncer<String>, projection: Projection<E, K>) -> Self {
        Self {
            input,
            projection,
            secondary: BTreeMap::new(),
            loads: LoadTracker::new(),
        }
    }

    pub fn debouncer(&self) -> &Debouncer<String> {
        &self.input
    }

    pub fn projection(&self) -> &Projection<E, K> {
        &self.projection
    }

    pub fn projection_mut(&mut self) -> &mut Projection<E, K> {
        &mut self.projection
    }

    /// The settled query the view is filtered by.
    pub fn query(&self) -> &Query {
        self.projection.query()
    }

    /// Raw input that has not settled yet.
    pub fn pending_input(&self) -> Option<&str> {
        self.input.pending_value().map(String::as_str)
    }

    /// Call this when the input box text changes.
    pub fn on_input(&mut self, text: impl Into<String>, now_ms: u64) {
        self.input.submit(text.into(), now_ms);
    }

    /// Advances the controller.
    ///
    /// Returns `true` when a settled query changed the view.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        match self.input.tick(now_ms) {
            Some(query) => self.apply_query(query),
            None => false,
        }
    }

    /// Settles pending input immediately (e.g. the user pressed Enter).
    ///
    /// Returns `true` when the view changed.
    pub fn flush(&mut self) -> bool {
        match self.input.flush() {
            Some(query) => self.apply_query(query),
            None => false,
        }
    }

    pub fn set_items(&mut self, items: impl Into<Arc<[E]>>) {
        self.projection.set_items(items);
    }

    /// Registers a fetch of the searched collection. Pass the ticket back to `complete_load`.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.loads.begin()
    }

    /// Registers a fetch of another collection.
    ///
    /// `LoadSource::PRIMARY` is the searched collection; any other source is kept unfiltered and
    /// read back with `collection`.
    pub fn begin_load_from(&mut self, source: LoadSource) -> LoadTicket {
        self.loads.begin_from(source)
    }

    /// Completes a fetch started with `begin_load` or `begin_load_from`.
    ///
    /// A successful result replaces its source's collection unless a newer load of that source
    /// already delivered. A failure is recorded in `last_error` and leaves the current data in
    /// place.
    ///
    /// Returns `true` when a collection was replaced.
    pub fn complete_load<I: Into<Arc<[E]>>>(
        &mut self,
        ticket: LoadTicket,
        result: Result<I, FetchError>,
    ) -> bool {
        let Some(items) = self.loads.complete(ticket, result) else {
            return false;
        };
        let source = ticket.source();
        if source == LoadSource::PRIMARY {
            self.projection.set_items(items);
        } else {
            self.secondary.insert(source, items.into());
        }
        true
    }

    /// The last delivered collection of `source`, unfiltered.
    pub fn collection(&self, source: LoadSource) -> Option<&Arc<[E]>> {
        if source == LoadSource::PRIMARY {
            Some(self.projection.items())
        } else {
            self.secondary.get(&source)
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loads.is_loading()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.loads.last_error()
    }

    pub fn load_status(&self) -> LoadStatus {
        self.loads.status()
    }

    /// Stops the input debouncer. Later input is ignored; the current view stays readable.
    pub fn dispose(&mut self) {
        adebug!(pending = self.input.is_pending(), "SearchController::dispose");
        self.input.dispose();
    }

    pub fn is_disposed(&self) -> bool {
        self.input.is_disposed()
    }

    fn apply_query(&mut self, query: String) -> bool {
        let before = self.projection.recompute_count();
        self.projection.set_query(query);
        let changed = self.projection.recompute_count() != before;
        atrace!(query = self.projection.query().as_str(), changed, "query settled");
        changed
    }
}
