//! Case-insensitive substring filtering.
//!
//! All functions here are pure: the output only depends on the query, the items and the text
//! selector, and input order is always preserved. A selector returning `None` (a missing field)
//! is treated as the empty string.

use alloc::borrow::Cow;
use alloc::vec::Vec;

/// Case-folds `text` for matching. Borrows when `text` is already folded ASCII.
pub fn fold(text: &str) -> Cow<'_, str> {
    if text.is_ascii() {
        if text.bytes().any(|b| b.is_ascii_uppercase()) {
            Cow::Owned(text.to_ascii_lowercase())
        } else {
            Cow::Borrowed(text)
        }
    } else {
        Cow::Owned(text.to_lowercase())
    }
}

/// Returns `true` when `text` contains `query`, ignoring case.
pub fn matches(query: &str, text: &str) -> bool {
    matches_folded(&fold(query), text)
}

pub(crate) fn matches_folded(folded_query: &str, text: &str) -> bool {
    if folded_query.is_empty() {
        return true;
    }
    fold(text).contains(folded_query)
}

/// Emits the index of every item whose selected text contains `query`, in ascending order.
///
/// This is the zero-allocation building block: callers push indexes straight into their own
/// buffers.
pub fn for_each_match<E>(
    query: &str,
    items: &[E],
    select_text: impl Fn(&E) -> Option<&str>,
    f: impl FnMut(usize),
) {
    for_each_match_folded(&fold(query), items, &select_text, f);
}

pub(crate) fn for_each_match_folded<E, S>(
    folded_query: &str,
    items: &[E],
    select_text: &S,
    mut f: impl FnMut(usize),
) where
    S: Fn(&E) -> Option<&str> + ?Sized,
{
    if folded_query.is_empty() {
        (0..items.len()).for_each(f);
        return;
    }
    for (i, item) in items.iter().enumerate() {
        if matches_folded(folded_query, select_text(item).unwrap_or("")) {
            f(i);
        }
    }
}

/// Returns the indexes of the matching items, in input order.
pub fn compute_view_indexes<E>(
    query: &str,
    items: &[E],
    select_text: impl Fn(&E) -> Option<&str>,
) -> Vec<usize> {
    let mut out = Vec::new();
    for_each_match(query, items, select_text, |i| out.push(i));
    out
}

/// Returns the matching items, in input order.
///
/// An empty query returns every item.
pub fn compute_view<E: Clone>(
    query: &str,
    items: &[E],
    select_text: impl Fn(&E) -> Option<&str>,
) -> Vec<E> {
    let mut out = Vec::new();
    for_each_match(query, items, select_text, |i| out.push(items[i].clone()));
    out
}

