use alloc::string::String;
use alloc::sync::Arc;
use core::fmt;

use crate::filter::fold;

/// An immutable search query.
///
/// The case-folded form is computed once, so a query can be matched against many items (and
/// compared for memoization) without re-folding.
///
/// With `feature = "serde"`, this type serializes as a plain string.
#[derive(Clone)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "String", into = "String")
)]
pub struct Query {
    text: Arc<str>,
    folded: Arc<str>,
}

impl Query {
    pub fn new(text: impl AsRef<str>) -> Self {
        let text = text.as_ref();
        Self {
            text: Arc::from(text),
            folded: Arc::from(&*fold(text)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The case-folded text used for matching.
    pub fn folded(&self) -> &str {
        &self.folded
    }

    /// An empty query matches every item.
    pub fn is_empty(&self) -> bool {
        self.folded.is_empty()
    }

    /// Returns `true` when both queries select the same items, e.g. `"ANGU"` and `"angu"`.
    pub fn same_match(&self, other: &Query) -> bool {
        Arc::ptr_eq(&self.folded, &other.folded) || self.folded == other.folded
    }
}

impl Default for Query {
    fn default() -> Self {
        Self::new("")
    }
}

impl PartialEq for Query {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Query {}

impl fmt::Debug for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Query").field(&&*self.text).finish()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for Query {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Query {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&String> for Query {
    fn from(text: &String) -> Self {
        Self::new(text)
    }
}

impl From<Query> for String {
    fn from(query: Query) -> Self {
        String::from(&*query.text)
    }
}

/// Lifecycle of a [`crate::Debouncer`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DebounceState {
    /// No invocation is scheduled.
    #[default]
    Idle,
    /// A value is waiting for the quiet period to elapse.
    Pending,
    /// Terminal: submissions are ignored and nothing will fire again.
    Disposed,
}

pub type ItemKey = u64;

/// One entry of a filtered view, with its stable key.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewItemKeyed<K> {
    pub key: K,
    /// Index into the source collection.
    pub index: usize,
    /// Position inside the filtered view.
    pub position: usize,
}
