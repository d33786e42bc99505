use alloc::sync::Arc;

use crate::error::ConfigError;
use crate::projection::Projection;
use crate::ItemKey;

/// The quiet period used when none is configured, in milliseconds.
pub const DEFAULT_QUIET_PERIOD_MS: f64 = 400.0;

/// A callback fired with the settled value once the quiet period elapses.
pub type SettleCallback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Selects the searchable text of an item. `None` is matched as the empty string.
pub type TextSelector<E> = Arc<dyn Fn(&E) -> Option<&str> + Send + Sync>;

/// Maps an item (and its index in the source collection) to a stable identity.
pub type ItemKeyFn<E, K> = Arc<dyn Fn(usize, &E) -> K + Send + Sync>;

/// A callback fired after a projection recomputes its view.
pub type OnViewChangeCallback<E, K> = Arc<dyn Fn(&Projection<E, K>) + Send + Sync>;

/// Configuration for [`crate::Debouncer`].
///
/// `quiet_period_ms` is validated by `Debouncer::new`: it must be finite and non-negative.
/// Fractional milliseconds are truncated.
pub struct DebouncerOptions<T> {
    pub quiet_period_ms: f64,
    pub on_settle: Option<SettleCallback<T>>,
}

impl<T> DebouncerOptions<T> {
    pub fn new(quiet_period_ms: f64) -> Self {
        Self {
            quiet_period_ms,
            on_settle: None,
        }
    }

    pub fn with_quiet_period_ms(mut self, quiet_period_ms: f64) -> Self {
        self.quiet_period_ms = quiet_period_ms;
        self
    }

    pub fn with_on_settle(mut self, on_settle: impl Fn(&T) + Send + Sync + 'static) -> Self {
        self.on_settle = Some(Arc::new(on_settle));
        self
    }

    pub(crate) fn validated_quiet_period_ms(&self) -> Result<u64, ConfigError> {
        let ms = self.quiet_period_ms;
        if !ms.is_finite() || ms < 0.0 {
            return Err(ConfigError::InvalidConfiguration {
                quiet_period_ms: ms,
            });
        }
        Ok(ms as u64)
    }
}

impl<T> Default for DebouncerOptions<T> {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD_MS)
    }
}

impl<T> Clone for DebouncerOptions<T> {
    fn clone(&self) -> Self {
        Self {
            quiet_period_ms: self.quiet_period_ms,
            on_settle: self.on_settle.clone(),
        }
    }
}

impl<T> core::fmt::Debug for DebouncerOptions<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DebouncerOptions")
            .field("quiet_period_ms", &self.quiet_period_ms)
            .field("on_settle", &self.on_settle.as_ref().map(|_| ".."))
            .finish()
    }
}

/// Plain-data debounce settings, e.g. loaded from a host's settings file.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DebounceConfig {
    pub quiet_period_ms: f64,
}

impl DebounceConfig {
    pub fn options<T>(&self) -> DebouncerOptions<T> {
        DebouncerOptions::new(self.quiet_period_ms)
    }
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            quiet_period_ms: DEFAULT_QUIET_PERIOD_MS,
        }
    }
}

/// Configuration for [`crate::Projection`].
///
/// Cheap to clone: closures are stored in `Arc`s. `Projection::set_options` compares the text
/// selector by pointer to decide whether the cached view is still valid.
pub struct ProjectionOptions<E, K = ItemKey> {
    pub select_text: TextSelector<E>,
    pub get_item_key: ItemKeyFn<E, K>,
    /// Optional callback fired after the view is recomputed.
    ///
    /// Memo hits (identical query and items) do not fire it.
    pub on_change: Option<OnViewChangeCallback<E, K>>,
}

impl<E> ProjectionOptions<E, ItemKey> {
    /// Creates options for a collection keyed by source index (`ItemKey = u64`).
    pub fn new(select_text: impl Fn(&E) -> Option<&str> + Send + Sync + 'static) -> Self {
        Self {
            select_text: Arc::new(select_text),
            get_item_key: Arc::new(|i: usize, _: &E| i as u64),
            on_change: None,
        }
    }
}

impl<E, K> ProjectionOptions<E, K> {
    /// Creates options with a custom identity, e.g. a database id.
    ///
    /// The key is only used for stable iteration; it never influences matching.
    pub fn new_with_key(
        select_text: impl Fn(&E) -> Option<&str> + Send + Sync + 'static,
        get_item_key: impl Fn(&E) -> K + Send + Sync + 'static,
    ) -> Self {
        Self {
            select_text: Arc::new(select_text),
            get_item_key: Arc::new(move |_: usize, item: &E| get_item_key(item)),
            on_change: None,
        }
    }

    pub fn with_select_text(
        mut self,
        select_text: impl Fn(&E) -> Option<&str> + Send + Sync + 'static,
    ) -> Self {
        self.select_text = Arc::new(select_text);
        self
    }

    pub fn with_get_item_key(
        mut self,
        get_item_key: impl Fn(&E) -> K + Send + Sync + 'static,
    ) -> Self {
        self.get_item_key = Arc::new(move |_: usize, item: &E| get_item_key(item));
        self
    }

    pub fn with_on_change(
        mut self,
        on_change: impl Fn(&Projection<E, K>) + Send + Sync + 'static,
    ) -> Self {
        self.on_change = Some(Arc::new(on_change));
        self
    }
}

impl<E, K> Clone for ProjectionOptions<E, K> {
    fn clone(&self) -> Self {
        Self {
            select_text: Arc::clone(&self.select_text),
            get_item_key: Arc::clone(&self.get_item_key),
            on_change: self.on_change.clone(),
        }
    }
}

impl<E, K> core::fmt::Debug for ProjectionOptions<E, K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProjectionOptions")
            .field("on_change", &self.on_change.is_some())
            .finish_non_exhaustive()
    }
}
