use super::{NoteKey, NoteService};
use crate::api::{ApiError, ApiErrorKind, ApiResult};
use crate::auth::{use_auth, AuthContext};
use crate::models::{NewNote, Note};
use crate::state::{AppContext, QueryClient};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::future::Future;
use std::pin::Pin;

type LocalFuture<O> = Pin<Box<dyn Future<Output = ApiResult<O>>>>;

/// Monotonic request ids; only the latest request may write its result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct RequestGuard {
    latest: u64,
}

impl RequestGuard {
    pub fn begin(&mut self) -> u64 {
        self.latest = self.latest.wrapping_add(1);
        self.latest
    }

    pub fn is_current(&self, id: u64) -> bool {
        self.latest == id
    }
}

/// Read-side signals of a notes query.
pub(crate) struct QueryState<T: 'static> {
    pub data: RwSignal<Option<T>>,
    pub loading: RwSignal<bool>,
    pub error: RwSignal<Option<ApiError>>,
}

impl<T: 'static> Clone for QueryState<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for QueryState<T> {}

fn report(auth: AuthContext, e: &ApiError) {
    if e.kind() == ApiErrorKind::AuthRequired {
        spawn_local(auth.renew());
    }
}

/// Runs `fetch` whenever `source` yields a value, the session changes or the
/// notes scope is invalidated.
fn use_notes_query<K, T, F, Fut>(source: impl Fn() -> Option<K> + 'static, fetch: F) -> QueryState<T>
where
    K: 'static,
    T: Send + Sync + 'static,
    F: Fn(AuthContext, QueryClient, K) -> Fut + 'static,
    Fut: Future<Output = ApiResult<T>> + 'static,
{
    let auth = use_auth();
    let queries = expect_context::<AppContext>().0.queries;

    let state = QueryState {
        data: RwSignal::new(None),
        loading: RwSignal::new(true),
        error: RwSignal::new(None),
    };
    let guard = StoredValue::new(RequestGuard::default());

    Effect::new(move |_| {
        // Keyed on the token so a refreshed session refetches.
        let token = auth.with_state(|s| s.session().map(|s| s.access_token.clone()));
        let _generation = queries.notes_generation();
        let input = source();

        let (Some(_), Some(input)) = (token, input) else {
            state.loading.set(false);
            return;
        };

        let mut id = 0;
        guard.update_value(|g| id = g.begin());
        state.loading.set(true);
        state.error.set(None);

        let fut = fetch(auth, queries, input);
        spawn_local(async move {
            let result = fut.await;
            if !guard.try_with_value(|g| g.is_current(id)).unwrap_or(false) {
                return;
            }
            match result {
                Ok(value) => {
                    state.data.try_set(Some(value));
                }
                Err(e) => {
                    report(auth, &e);
                    state.error.try_set(Some(e));
                }
            }
            state.loading.try_set(false);
        });
    });

    state
}

pub(crate) fn use_notes() -> QueryState<Vec<Note>> {
    use_notes_query(
        || Some(()),
        |auth, queries, ()| async move {
            let client = auth.client();
            let session = auth.session_untracked();
            NoteService::new(&client, &queries, session.as_ref())
                .list()
                .await
        },
    )
}

fn use_note_by_key(key: impl Fn() -> Option<NoteKey> + 'static) -> QueryState<Note> {
    use_notes_query(key, |auth, queries, key| async move {
        let client = auth.client();
        let session = auth.session_untracked();
        NoteService::new(&client, &queries, session.as_ref())
            .get(&key)
            .await
    })
}

pub(crate) fn use_note_by_slug(slug: Signal<String>) -> QueryState<Note> {
    use_note_by_key(move || {
        let slug = slug.get();
        (!slug.trim().is_empty()).then(|| NoteKey::Slug(slug))
    })
}

pub(crate) fn use_note_by_id(id: Signal<Option<String>>) -> QueryState<Note> {
    use_note_by_key(move || id.get().filter(|id| !id.trim().is_empty()).map(NoteKey::Id))
}

/// A note mutation: `pending`/`error` signals plus `mutate`.
pub(crate) struct MutationHandle<I: 'static, O: 'static> {
    pub pending: RwSignal<bool>,
    pub error: RwSignal<Option<ApiError>>,
    auth: AuthContext,
    queries: QueryClient,
    run: fn(AuthContext, QueryClient, I) -> LocalFuture<O>,
}

impl<I: 'static, O: 'static> Clone for MutationHandle<I, O> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I: 'static, O: 'static> Copy for MutationHandle<I, O> {}

impl<I: 'static, O: 'static> MutationHandle<I, O> {
    fn new(run: fn(AuthContext, QueryClient, I) -> LocalFuture<O>) -> Self {
        Self {
            pending: RwSignal::new(false),
            error: RwSignal::new(None),
            auth: use_auth(),
            queries: expect_context::<AppContext>().0.queries,
            run,
        }
    }

    /// Start the mutation. `on_success` is skipped if the owner is gone by
    /// the time the response arrives.
    pub fn mutate(&self, input: I, on_success: impl FnOnce(O) + 'static) {
        let this = *self;
        this.pending.set(true);
        this.error.set(None);

        let fut = (this.run)(this.auth, this.queries, input);
        spawn_local(async move {
            let result = fut.await;
            if this.pending.try_set(false).is_some() {
                return;
            }
            match result {
                Ok(out) => on_success(out),
                Err(e) => {
                    report(this.auth, &e);
                    this.error.try_set(Some(e));
                }
            }
        });
    }
}

pub(crate) fn use_add_note() -> MutationHandle<NewNote, Note> {
    MutationHandle::new(|auth, queries, input| {
        Box::pin(async move {
            let client = auth.client();
            let session = auth.session_untracked();
            NoteService::new(&client, &queries, session.as_ref())
                .create(input)
                .await
        })
    })
}

/// Input is `(note id, new content)`.
pub(crate) fn use_update_note() -> MutationHandle<(String, NewNote), Note> {
    MutationHandle::new(|auth, queries, (id, input)| {
        Box::pin(async move {
            let client = auth.client();
            let session = auth.session_untracked();
            NoteService::new(&client, &queries, session.as_ref())
                .update(&id, input)
                .await
        })
    })
}

/// Input is the note slug.
pub(crate) fn use_delete_note() -> MutationHandle<String, ()> {
    MutationHandle::new(|auth, queries, slug| {
        Box::pin(async move {
            let client = auth.client();
            let session = auth.session_untracked();
            NoteService::new(&client, &queries, session.as_ref())
                .delete(&slug)
                .await
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_request_is_current() {
        let mut g = RequestGuard::default();
        let first = g.begin();
        let second = g.begin();
        assert!(!g.is_current(first));
        assert!(g.is_current(second));
    }

    #[test]
    fn fresh_guard_accepts_nothing() {
        let g = RequestGuard::default();
        assert!(!g.is_current(1));
    }
}
