use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::filter::for_each_match_folded;
use crate::{ItemKey, ProjectionOptions, Query, ViewItemKeyed, ViewState};

/// The inputs a view was last computed from.
#[derive(Clone, Debug)]
struct ComputedFor<E> {
    query: Query,
    items: Arc<[E]>,
    items_version: u64,
}

/// A memoized, filtered view over a collection.
///
/// The view is a pure function of `(query, items)`: every entry of `items` whose selected text
/// contains the query (ignoring case), in source order. It is recomputed only when one of the
/// inputs actually changes:
/// - the query selects differently (case-folded text changed)
/// - the collection is a different allocation, or `touch_items` was called
///
/// Identical inputs are a memo hit and leave the view (and `recompute_count`) untouched.
/// Results are the same either way.
#[derive(Clone, Debug)]
pub struct Projection<E, K = ItemKey> {
    options: ProjectionOptions<E, K>,
    query: Query,
    items: Arc<[E]>,
    items_version: u64,

    view: Vec<usize>,
    computed_for: Option<ComputedFor<E>>,
    recomputes: u64,

    batch_depth: usize,
}

impl<E, K> Projection<E, K> {
    /// Creates an empty projection (no items, empty query).
    pub fn new(options: ProjectionOptions<E, K>) -> Self {
        Self::with_items(options, Vec::new())
    }

    /// Creates a projection over `items` with an empty query.
    ///
    /// The initial view is computed eagerly and does not fire `on_change`.
    pub fn with_items(options: ProjectionOptions<E, K>, items: impl Into<Arc<[E]>>) -> Self {
        let mut p = Self {
            options,
            query: Query::default(),
            items: items.into(),
            items_version: 0,
            view: Vec::new(),
            computed_for: None,
            recomputes: 0,
            batch_depth: 0,
        };
        sdebug!(count = p.items.len(), "Projection::new");
        p.recompute();
        p
    }

    pub fn options(&self) -> &ProjectionOptions<E, K> {
        &self.options
    }

    /// Replaces the options.
    ///
    /// The cached view is dropped when the text selector is a different closure.
    pub fn set_options(&mut self, options: ProjectionOptions<E, K>) {
        let selector_unchanged = Arc::ptr_eq(&self.options.select_text, &options.select_text);
        self.options = options;
        if !selector_unchanged {
            self.computed_for = None;
        }
        self.refresh();
    }

    /// Clones the current options, applies `f`, then delegates to `set_options`.
    pub fn update_options(&mut self, f: impl FnOnce(&mut ProjectionOptions<E, K>)) {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next);
    }

    pub fn set_on_change(&mut self, on_change: impl Fn(&Projection<E, K>) + Send + Sync + 'static) {
        self.options.on_change = Some(Arc::new(on_change));
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<Query>) {
        self.query = query.into();
        self.refresh();
    }

    pub fn items(&self) -> &Arc<[E]> {
        &self.items
    }

    pub fn set_items(&mut self, items: impl Into<Arc<[E]>>) {
        self.items = items.into();
        self.refresh();
    }

    /// Marks the current collection as changed.
    ///
    /// Use this after items changed through interior mutability (e.g. a lazily resolved label):
    /// the allocation is the same, so it would otherwise be a memo hit.
    pub fn touch_items(&mut self) {
        self.items_version = self.items_version.wrapping_add(1);
        self.refresh();
    }

    pub fn items_version(&self) -> u64 {
        self.items_version
    }

    /// Batches multiple updates into a single recompute and `on_change` notification.
    ///
    /// For example, a data source delivering new items while the query also settled in the same
    /// frame only filters once.
    pub fn batch_update(&mut self, f: impl FnOnce(&mut Self)) {
        self.batch_depth = self.batch_depth.saturating_add(1);

        f(self);

        debug_assert!(self.batch_depth > 0, "batch_depth underflow");
        self.batch_depth = self.batch_depth.saturating_sub(1);
        if self.batch_depth == 0 {
            self.refresh();
        }
    }

    /// How many times the view has been computed (memo hits excluded).
    pub fn recompute_count(&self) -> u64 {
        self.recomputes
    }

    /// Whether the inputs changed since the view was computed.
    ///
    /// Only observable inside `batch_update`.
    pub fn is_stale(&self) -> bool {
        match &self.computed_for {
            None => true,
            Some(c) => {
                !c.query.same_match(&self.query)
                    || !Arc::ptr_eq(&c.items, &self.items)
                    || c.items_version != self.items_version
            }
        }
    }

    /// Source indexes of the matching items, in source order.
    pub fn view_indexes(&self) -> &[usize] {
        &self.view
    }

    /// Number of matching items.
    pub fn len(&self) -> usize {
        self.view.len()
    }

    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    /// Number of items in the source collection.
    pub fn total_count(&self) -> usize {
        self.items.len()
    }

    /// The matching item at `position` in the view.
    pub fn item(&self, position: usize) -> Option<&E> {
        let index = *self.view.get(position)?;
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &E> + '_ {
        self.view.iter().filter_map(|&i| self.items.get(i))
    }

    pub fn for_each_view_item(&self, mut f: impl FnMut(&E)) {
        for item in self.iter() {
            f(item);
        }
    }

    pub fn key_for(&self, index: usize) -> Option<K> {
        let item = self.items.get(index)?;
        Some((self.options.get_item_key)(index, item))
    }

    /// Iterates the view with stable keys, for renderers that diff rows by identity.
    pub fn for_each_view_item_keyed(&self, mut f: impl FnMut(ViewItemKeyed<K>, &E)) {
        for (position, &index) in self.view.iter().enumerate() {
            let Some(item) = self.items.get(index) else {
                continue;
            };
            let key = (self.options.get_item_key)(index, item);
            f(
                ViewItemKeyed {
                    key,
                    index,
                    position,
                },
                item,
            );
        }
    }

    pub fn view_state(&self) -> ViewState {
        ViewState {
            query: String::from(self.query.as_str()),
            matched: self.view.len(),
            total: self.items.len(),
        }
    }

    fn refresh(&mut self) {
        if self.batch_depth > 0 {
            return;
        }
        if !self.is_stale() {
            strace!(query = self.query.as_str(), "Projection memo hit");
            return;
        }
        self.recompute();
        self.notify();
    }

    fn recompute(&mut self) {
        let mut view = Vec::new();
        for_each_match_folded(
            self.query.folded(),
            &self.items,
            &*self.options.select_text,
            |i| view.push(i),
        );
        strace!(
            query = self.query.as_str(),
            matched = view.len(),
            total = self.items.len(),
            "Projection recompute"
        );
        self.view = view;
        self.computed_for = Some(ComputedFor {
            query: self.query.clone(),
            items: Arc::clone(&self.items),
            items_version: self.items_version,
        });
        self.recomputes = self.recomputes.saturating_add(1);
    }

    fn notify(&self) {
        if let Some(cb) = &self.options.on_change {
            cb(self);
        }
    }
}

impl<E: Clone, K> Projection<E, K> {
    /// Clears `out` and fills it with the matching items.
    pub fn collect_view(&self, out: &mut Vec<E>) {
        out.clear();
        out.extend(self.iter().cloned());
    }

    pub fn to_vec(&self) -> Vec<E> {
        self.iter().cloned().collect()
    }
}
