//! Duplicate detection for error entries.
//!
//! Two entries are similar when their commands match (ignoring case) and
//! either their error texts match exactly (ignoring case) or the Jaccard
//! similarity of their lowercase word sets reaches the threshold.

use std::collections::HashSet;

use crate::entry::{Comparable, ErrorEntry};
use crate::store::EntryStore;

/// Default Jaccard threshold for treating two errors as the same problem.
pub const DEFAULT_THRESHOLD: f64 = 0.85;

/// Lowercase whitespace-separated words of `text`, as a set.
fn word_set(text: &str) -> HashSet<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// Jaccard similarity of the word sets of `a` and `b`.
///
/// Returns `None` when either side has no words.
pub fn jaccard(a: &str, b: &str) -> Option<f64> {
    let left = word_set(a);
    let right = word_set(b);
    if left.is_empty() || right.is_empty() {
        return None;
    }
    let intersection = left.intersection(&right).count();
    let union = left.union(&right).count();
    #[allow(clippy::cast_precision_loss)]
    Some(intersection as f64 / union as f64)
}

/// Whether `a` duplicates `b`. The command must match before error text is compared.
pub fn is_similar(a: &impl Comparable, b: &impl Comparable, threshold: f64) -> bool {
    if a.command().to_lowercase() != b.command().to_lowercase() {
        return false;
    }
    if a.error().to_lowercase() == b.error().to_lowercase() {
        return true;
    }
    jaccard(a.error(), b.error()).is_some_and(|score| score >= threshold)
}

/// Every stored entry similar to `candidate`, in store order.
///
/// # Errors
/// Returns an error if the store cannot be read.
pub fn find_similar_entries(
    store: &EntryStore,
    candidate: &impl Comparable,
    threshold: f64,
) -> anyhow::Result<Vec<ErrorEntry>> {
    let entries = store.get_all_entries()?;
    let scanned = entries.len();
    let similar: Vec<ErrorEntry> = entries
        .into_iter()
        .filter(|existing| is_similar(candidate, existing, threshold))
        .collect();
    tracing::debug!(scanned, matched = similar.len(), threshold, "similarity scan");
    Ok(similar)
}
