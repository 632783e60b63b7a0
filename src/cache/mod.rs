use std::cell::RefCell;
use std::collections::HashMap;

/// Hierarchical query key, e.g. `["notes"]` or `["notes", "slug", "salam"]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    pub fn starts_with(&self, prefix: &[&str]) -> bool {
        self.0.len() >= prefix.len() && self.0.iter().zip(prefix).all(|(a, b)| a == b)
    }
}

/// A group of keys that a mutation can invalidate in one go.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum QueryScope {
    /// Every note query: the list and all point lookups.
    Notes,
}

impl QueryScope {
    pub fn prefix(self) -> &'static [&'static str] {
        match self {
            Self::Notes => &["notes"],
        }
    }
}

#[derive(Clone, Debug)]
struct Entry<V> {
    value: V,
    fetched_ms: i64,
}

/// Keyed result cache with a fixed freshness window.
#[derive(Clone, Debug)]
pub(crate) struct QueryCache<V> {
    stale_ms: i64,
    entries: HashMap<QueryKey, Entry<V>>,
}

impl<V: Clone> QueryCache<V> {
    pub fn new(stale_ms: i64) -> Self {
        Self {
            stale_ms,
            entries: HashMap::new(),
        }
    }

    /// The cached value if it was fetched less than `stale_ms` ago.
    pub fn fresh(&self, key: &QueryKey, now_ms: i64) -> Option<V> {
        self.entries
            .get(key)
            .filter(|e| now_ms - e.fetched_ms < self.stale_ms)
            .map(|e| e.value.clone())
    }

    /// The cached value regardless of age.
    pub fn peek(&self, key: &QueryKey) -> Option<V> {
        self.entries.get(key).map(|e| e.value.clone())
    }

    pub fn insert(&mut self, key: QueryKey, value: V, now_ms: i64) {
        self.entries.insert(
            key,
            Entry {
                value,
                fetched_ms: now_ms,
            },
        );
    }

    /// Drop every entry under `scope`. Returns how many were dropped.
    pub fn invalidate(&mut self, scope: QueryScope) -> usize {
        let before = self.entries.len();
        self.entries.retain(|k, _| !k.starts_with(scope.prefix()));
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// What the note service needs from a cache. Implemented by the reactive
/// app-wide client and by a plain `RefCell` for non-reactive callers.
pub(crate) trait QueryStore<V> {
    fn fresh(&self, key: &QueryKey, now_ms: i64) -> Option<V>;
    fn peek(&self, key: &QueryKey) -> Option<V>;
    fn store(&self, key: QueryKey, value: V, now_ms: i64);
    fn invalidate(&self, scope: QueryScope);
}

impl<V: Clone> QueryStore<V> for RefCell<QueryCache<V>> {
    fn fresh(&self, key: &QueryKey, now_ms: i64) -> Option<V> {
        self.borrow().fresh(key, now_ms)
    }

    fn peek(&self, key: &QueryKey) -> Option<V> {
        self.borrow().peek(key)
    }

    fn store(&self, key: QueryKey, value: V, now_ms: i64) {
        self.borrow_mut().insert(key, value, now_ms);
    }

    fn invalidate(&self, scope: QueryScope) {
        self.borrow_mut().invalidate(scope);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIVE_MIN: i64 = 5 * 60 * 1000;

    #[test]
    fn entries_are_fresh_inside_window_only() {
        let mut c = QueryCache::new(FIVE_MIN);
        let key = QueryKey::new(["notes"]);
        c.insert(key.clone(), 1, 1_000);

        assert_eq!(c.fresh(&key, 1_000), Some(1));
        assert_eq!(c.fresh(&key, 1_000 + FIVE_MIN - 1), Some(1));
        assert_eq!(c.fresh(&key, 1_000 + FIVE_MIN), None);
        // Stale entries are still visible to peek.
        assert_eq!(c.peek(&key), Some(1));
    }

    #[test]
    fn scope_invalidation_is_by_prefix() {
        let mut c = QueryCache::new(FIVE_MIN);
        c.insert(QueryKey::new(["notes"]), "list", 0);
        c.insert(QueryKey::new(["notes", "slug", "a"]), "a", 0);
        c.insert(QueryKey::new(["notes", "id", "1"]), "1", 0);
        c.insert(QueryKey::new(["profile"]), "p", 0);
        c.insert(QueryKey::new(["notesx"]), "x", 0);

        assert_eq!(c.invalidate(QueryScope::Notes), 3);
        assert_eq!(c.len(), 2);
        assert_eq!(c.peek(&QueryKey::new(["profile"])), Some("p"));
        assert_eq!(c.peek(&QueryKey::new(["notesx"])), Some("x"));
    }

    #[test]
    fn refcell_store_delegates() {
        let store = RefCell::new(QueryCache::new(FIVE_MIN));
        let key = QueryKey::new(["notes"]);
        store.store(key.clone(), 7, 0);
        assert_eq!(QueryStore::fresh(&store, &key, 10), Some(7));
        QueryStore::invalidate(&store, QueryScope::Notes);
        assert_eq!(QueryStore::peek(&store, &key), None);
    }
}
