use crate::api::ApiClient;
use crate::cache::{QueryCache, QueryKey, QueryScope, QueryStore};
use crate::config::EnvConfig;
use crate::models::Session;
use crate::notes::{CachedQuery, NOTES_STALE_MS};
use leptos::prelude::*;

/// App-wide query cache.
///
/// Reads subscribe to `notes_generation`; every invalidation of the notes
/// scope bumps it, so mounted hooks refetch.
#[derive(Clone, Copy)]
pub(crate) struct QueryClient {
    cache: StoredValue<QueryCache<CachedQuery>>,
    notes_generation: RwSignal<u64>,
}

impl QueryClient {
    pub fn new() -> Self {
        Self {
            cache: StoredValue::new(QueryCache::new(NOTES_STALE_MS)),
            notes_generation: RwSignal::new(0),
        }
    }

    /// Tracked read of the notes scope generation.
    pub fn notes_generation(&self) -> u64 {
        self.notes_generation.get()
    }

    /// Drop everything, e.g. when the user changes.
    pub fn clear(&self) {
        self.cache.update_value(|c| c.clear());
        self.notes_generation.update(|g| *g = g.wrapping_add(1));
    }
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryStore<CachedQuery> for QueryClient {
    fn fresh(&self, key: &QueryKey, now_ms: i64) -> Option<CachedQuery> {
        self.cache.with_value(|c| c.fresh(key, now_ms))
    }

    fn peek(&self, key: &QueryKey) -> Option<CachedQuery> {
        self.cache.with_value(|c| c.peek(key))
    }

    fn store(&self, key: QueryKey, value: CachedQuery, now_ms: i64) {
        self.cache.update_value(|c| c.insert(key, value, now_ms));
    }

    fn invalidate(&self, scope: QueryScope) {
        let dropped = self.cache.try_update_value(|c| c.invalidate(scope));
        tracing::debug!(?scope, ?dropped, "query scope invalidated");
        match scope {
            QueryScope::Notes => {
                self.notes_generation.try_update(|g| *g = g.wrapping_add(1));
            }
        }
    }
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub config: EnvConfig,
    pub queries: QueryClient,
}

impl AppState {
    pub fn new(config: EnvConfig) -> Self {
        Self {
            config,
            queries: QueryClient::new(),
        }
    }

    /// Backend client, authenticated when a session is given.
    pub fn api_client(&self, session: Option<&Session>) -> ApiClient {
        let client = ApiClient::new(&self.config);
        match session {
            Some(s) => client.with_session(s),
            None => client,
        }
    }
}

#[derive(Clone)]
pub(crate) struct AppContext(pub AppState);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AuthUser;
    use crate::notes::notes_list_key;

    #[test]
    fn invalidation_bumps_generation_and_drops_entries() {
        let q = QueryClient::new();
        q.store(notes_list_key(), CachedQuery::List(vec![]), 0);
        assert!(q.fresh(&notes_list_key(), 1).is_some());

        let before = q.notes_generation.get_untracked();
        q.invalidate(QueryScope::Notes);
        assert_eq!(q.notes_generation.get_untracked(), before + 1);
        assert!(q.peek(&notes_list_key()).is_none());
    }

    #[test]
    fn clear_also_bumps_generation() {
        let q = QueryClient::new();
        q.store(notes_list_key(), CachedQuery::List(vec![]), 0);
        q.clear();
        assert_eq!(q.notes_generation.get_untracked(), 1);
        assert!(q.peek(&notes_list_key()).is_none());
    }

    #[test]
    fn api_client_carries_session_token() {
        let state = AppState::new(EnvConfig::default());
        assert!(!state.api_client(None).is_authenticated());

        let session = Session {
            access_token: "jwt".to_string(),
            refresh_token: None,
            expires_at: None,
            user: AuthUser {
                id: "u".to_string(),
                email: None,
            },
        };
        assert!(state.api_client(Some(&session)).is_authenticated());
    }
}
