//! Dedup guard recording every URL ever admitted to the crawl

use std::collections::HashSet;
use std::sync::Mutex;

/// The set of URLs admitted during the current run.
///
/// `try_mark` is the only mutating entry point; the check-and-insert is a
/// single `HashSet::insert` under the lock, so two concurrent callers with
/// the same URL cannot both be told it is new. Entries are never removed:
/// a URL is processed at most once per run.
#[derive(Debug, Default)]
pub struct SeenSet {
    inner: Mutex<HashSet<String>>,
}

impl SeenSet {
    /// Creates an empty seen-set
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `id` if it has not been seen before.
    ///
    /// Returns true iff the URL was newly recorded by this call.
    pub fn try_mark(&self, id: &str) -> bool {
        self.inner.lock().unwrap().insert(id.to_string())
    }

    /// Returns whether `id` has already been recorded
    pub fn contains(&self, id: &str) -> bool {
        self.inner.lock().unwrap().contains(id)
    }

    /// Returns the number of URLs recorded so far
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    /// Returns whether no URL has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().is_empty()
    }
}
