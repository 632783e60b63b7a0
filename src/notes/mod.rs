pub(crate) mod categories;
pub(crate) mod hooks;
pub(crate) mod slug;

use crate::api::{ApiError, ApiResult};
use crate::cache::{QueryKey, QueryScope, QueryStore};
use crate::models::{NewNote, Note, NoteInsert, NotePatch, Session};
use crate::util::{iso_from_ms, now_ms};
use slug::{derive_slug, unique_slug};

/// Notes stay fresh for five minutes before the next read refetches them.
pub(crate) const NOTES_STALE_MS: i64 = 5 * 60 * 1000;

/// Point-lookup key for a single note.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum NoteKey {
    Slug(String),
    Id(String),
}

impl NoteKey {
    pub fn column(&self) -> &'static str {
        match self {
            Self::Slug(_) => "slug",
            Self::Id(_) => "id",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::Slug(v) | Self::Id(v) => v,
        }
    }

    fn query_key(&self) -> QueryKey {
        QueryKey::new(["notes", self.column(), self.value()])
    }
}

pub(crate) fn notes_list_key() -> QueryKey {
    QueryKey::new(["notes"])
}

/// Cached payloads under the `notes` scope.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum CachedQuery {
    List(Vec<Note>),
    One(Note),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum NoteMutation {
    Create,
    Update,
    Delete,
}

impl NoteMutation {
    /// Cache scopes a successful mutation invalidates.
    pub fn invalidates(self) -> &'static [QueryScope] {
        match self {
            Self::Create | Self::Update | Self::Delete => &[QueryScope::Notes],
        }
    }
}

/// Remote operations on the notes table. Every call is scoped by owner.
#[allow(async_fn_in_trait)]
pub(crate) trait NotesBackend {
    async fn select_notes(&self, user_id: &str) -> ApiResult<Vec<Note>>;
    async fn select_note(&self, user_id: &str, key: &NoteKey) -> ApiResult<Option<Note>>;
    async fn insert_note(&self, row: &NoteInsert) -> ApiResult<Note>;
    async fn update_note(&self, user_id: &str, id: &str, patch: &NotePatch)
        -> ApiResult<Option<Note>>;
    async fn delete_note(&self, user_id: &str, slug: &str) -> ApiResult<bool>;
}

/// Note lifecycle on top of a backend and a cache, for one session.
pub(crate) struct NoteService<'a, B, C> {
    backend: &'a B,
    cache: &'a C,
    session: Option<&'a Session>,
    clock: fn() -> i64,
}

impl<'a, B, C> NoteService<'a, B, C>
where
    B: NotesBackend,
    C: QueryStore<CachedQuery>,
{
    pub fn new(backend: &'a B, cache: &'a C, session: Option<&'a Session>) -> Self {
        Self {
            backend,
            cache,
            session,
            clock: now_ms,
        }
    }

    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    fn user_id(&self) -> ApiResult<&'a str> {
        self.session
            .map(|s| s.user_id())
            .ok_or(ApiError::AuthRequired)
    }

    fn invalidate_after(&self, mutation: NoteMutation) {
        for scope in mutation.invalidates() {
            self.cache.invalidate(*scope);
        }
    }

    pub async fn list(&self) -> ApiResult<Vec<Note>> {
        let user_id = self.user_id()?;
        let key = notes_list_key();
        let now = (self.clock)();

        if let Some(CachedQuery::List(notes)) = self.cache.fresh(&key, now) {
            return Ok(notes);
        }

        let notes = self.backend.select_notes(user_id).await?;
        tracing::debug!(count = notes.len(), "notes fetched");
        self.cache.store(key, CachedQuery::List(notes.clone()), now);
        Ok(notes)
    }

    pub async fn get(&self, key: &NoteKey) -> ApiResult<Note> {
        let user_id = self.user_id()?;
        let cache_key = key.query_key();
        let now = (self.clock)();

        if let Some(CachedQuery::One(note)) = self.cache.fresh(&cache_key, now) {
            return Ok(note);
        }

        let note = self
            .backend
            .select_note(user_id, key)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Note \"{}\"", key.value())))?;
        self.cache.store(cache_key, CachedQuery::One(note.clone()), now);
        Ok(note)
    }

    /// Slugs already used by the owner. A stale cached list is not trusted.
    async fn taken_slugs(&self, user_id: &str) -> ApiResult<Vec<String>> {
        let notes = match self.cache.fresh(&notes_list_key(), (self.clock)()) {
            Some(CachedQuery::List(notes)) => notes,
            _ => self.backend.select_notes(user_id).await?,
        };
        Ok(notes.into_iter().map(|n| n.slug).collect())
    }

    pub async fn create(&self, input: NewNote) -> ApiResult<Note> {
        let user_id = self.user_id()?;

        let base = derive_slug(&input.learning_text, &input.native_text);
        let taken = self.taken_slugs(user_id).await?;
        let slug = unique_slug(&base, taken.iter().map(|s| s.as_str()));

        let stamp = iso_from_ms((self.clock)());
        let row = NoteInsert {
            slug,
            native_text: input.native_text,
            learning_text: input.learning_text,
            pronunciation: input.pronunciation,
            category: input.category,
            tags: input.tags,
            note_type: input.note_type,
            difficulty: input.difficulty,
            review_count: 0,
            ease: None,
            last_reviewed_at: None,
            next_review_at: None,
            created_at: stamp.clone(),
            updated_at: stamp,
            user_id: user_id.to_string(),
        };

        let note = self.backend.insert_note(&row).await?;
        tracing::info!(slug = %note.slug, "note created");
        self.invalidate_after(NoteMutation::Create);
        Ok(note)
    }

    pub async fn update(&self, id: &str, input: NewNote) -> ApiResult<Note> {
        let user_id = self.user_id()?;

        let patch = NotePatch {
            native_text: input.native_text,
            learning_text: input.learning_text,
            pronunciation: input.pronunciation,
            category: input.category,
            tags: input.tags,
            note_type: input.note_type,
            difficulty: input.difficulty,
            updated_at: iso_from_ms((self.clock)()),
        };

        let note = self
            .backend
            .update_note(user_id, id, &patch)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Note \"{id}\"")))?;
        tracing::info!(slug = %note.slug, "note updated");
        self.invalidate_after(NoteMutation::Update);
        Ok(note)
    }

    pub async fn delete(&self, slug: &str) -> ApiResult<()> {
        let user_id = self.user_id()?;

        if !self.backend.delete_note(user_id, slug).await? {
            return Err(ApiError::NotFound(format!("Note \"{slug}\"")));
        }
        tracing::info!(slug, "note deleted");
        self.invalidate_after(NoteMutation::Delete);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::QueryCache;
    use crate::models::{AuthUser, NoteExample, NoteType};
    use std::cell::{Cell, RefCell};

    thread_local! {
        static NOW: Cell<i64> = const { Cell::new(1_700_000_000_000) };
    }

    fn test_clock() -> i64 {
        NOW.with(|n| n.get())
    }

    fn advance(ms: i64) {
        NOW.with(|n| n.set(n.get() + ms));
    }

    #[derive(Default)]
    struct MemoryBackend {
        rows: RefCell<Vec<Note>>,
        next_id: Cell<u32>,
        reads: Cell<usize>,
        writes: Cell<usize>,
    }

    impl MemoryBackend {
        fn seed(&self, note: Note) {
            self.rows.borrow_mut().push(note);
        }
    }

    impl NotesBackend for MemoryBackend {
        async fn select_notes(&self, user_id: &str) -> ApiResult<Vec<Note>> {
            self.reads.set(self.reads.get() + 1);
            Ok(self
                .rows
                .borrow()
                .iter()
                .filter(|n| n.user_id == user_id)
                .map(|n| Note {
                    examples: vec![],
                    ..n.clone()
                })
                .collect())
        }

        async fn select_note(&self, user_id: &str, key: &NoteKey) -> ApiResult<Option<Note>> {
            self.reads.set(self.reads.get() + 1);
            Ok(self
                .rows
                .borrow()
                .iter()
                .find(|n| {
                    n.user_id == user_id
                        && match key {
                            NoteKey::Slug(s) => &n.slug == s,
                            NoteKey::Id(id) => &n.id == id,
                        }
                })
                .cloned())
        }

        async fn insert_note(&self, row: &NoteInsert) -> ApiResult<Note> {
            self.writes.set(self.writes.get() + 1);
            if self
                .rows
                .borrow()
                .iter()
                .any(|n| n.user_id == row.user_id && n.slug == row.slug)
            {
                return Err(ApiError::Remote("duplicate key value".to_string()));
            }
            self.next_id.set(self.next_id.get() + 1);
            let note = Note {
                id: format!("id-{}", self.next_id.get()),
                slug: row.slug.clone(),
                native_text: row.native_text.clone(),
                learning_text: row.learning_text.clone(),
                pronunciation: row.pronunciation.clone(),
                category: row.category.clone(),
                tags: row.tags.clone(),
                note_type: row.note_type,
                difficulty: row.difficulty,
                review_count: row.review_count,
                ease: row.ease,
                last_reviewed_at: row.last_reviewed_at.clone(),
                next_review_at: row.next_review_at.clone(),
                created_at: row.created_at.clone(),
                updated_at: row.updated_at.clone(),
                user_id: row.user_id.clone(),
                examples: vec![],
            };
            self.rows.borrow_mut().push(note.clone());
            Ok(note)
        }

        async fn update_note(
            &self,
            user_id: &str,
            id: &str,
            patch: &NotePatch,
        ) -> ApiResult<Option<Note>> {
            self.writes.set(self.writes.get() + 1);
            let mut rows = self.rows.borrow_mut();
            let Some(n) = rows.iter_mut().find(|n| n.id == id && n.user_id == user_id) else {
                return Ok(None);
            };
            n.native_text = patch.native_text.clone();
            n.learning_text = patch.learning_text.clone();
            n.pronunciation = patch.pronunciation.clone();
            n.category = patch.category.clone();
            n.tags = patch.tags.clone();
            n.note_type = patch.note_type;
            n.difficulty = patch.difficulty;
            n.updated_at = patch.updated_at.clone();
            Ok(Some(n.clone()))
        }

        async fn delete_note(&self, user_id: &str, slug: &str) -> ApiResult<bool> {
            self.writes.set(self.writes.get() + 1);
            let mut rows = self.rows.borrow_mut();
            let before = rows.len();
            rows.retain(|n| !(n.slug == slug && n.user_id == user_id));
            Ok(rows.len() != before)
        }
    }

    fn session(user_id: &str) -> Session {
        Session {
            access_token: "jwt".to_string(),
            refresh_token: None,
            expires_at: None,
            user: AuthUser {
                id: user_id.to_string(),
                email: None,
            },
        }
    }

    fn cache() -> RefCell<QueryCache<CachedQuery>> {
        RefCell::new(QueryCache::new(NOTES_STALE_MS))
    }

    fn input(native: &str, learning: &str) -> NewNote {
        NewNote {
            native_text: native.to_string(),
            learning_text: learning.to_string(),
            pronunciation: None,
            category: None,
            tags: vec![],
            note_type: NoteType::Word,
            difficulty: None,
        }
    }

    #[test]
    fn every_mutation_invalidates_exactly_the_notes_scope() {
        for m in [NoteMutation::Create, NoteMutation::Update, NoteMutation::Delete] {
            assert_eq!(m.invalidates(), &[QueryScope::Notes]);
        }
    }

    #[tokio::test]
    async fn create_without_session_writes_nothing() {
        let backend = MemoryBackend::default();
        let cache = cache();
        let svc = NoteService::new(&backend, &cache, None).with_clock(test_clock);

        let err = svc.create(input("Bonjour", "سلام")).await.expect_err("no session");
        assert_eq!(err, ApiError::AuthRequired);
        assert_eq!(backend.writes.get(), 0);
        assert_eq!(backend.reads.get(), 0);
    }

    #[tokio::test]
    async fn reads_without_session_are_auth_required() {
        let backend = MemoryBackend::default();
        let cache = cache();
        let svc = NoteService::new(&backend, &cache, None);
        assert_eq!(svc.list().await, Err(ApiError::AuthRequired));
        assert_eq!(
            svc.get(&NoteKey::Slug("x".to_string())).await,
            Err(ApiError::AuthRequired)
        );
        assert_eq!(svc.delete("x").await, Err(ApiError::AuthRequired));
    }

    #[tokio::test]
    async fn created_note_shows_up_in_next_list() {
        let backend = MemoryBackend::default();
        let cache = cache();
        let s = session("user-1");
        let svc = NoteService::new(&backend, &cache, Some(&s)).with_clock(test_clock);

        assert!(svc.list().await.expect("list").is_empty());
        assert_eq!(backend.reads.get(), 1);

        let note = svc.create(input("Bonjour", "سلام")).await.expect("create");
        assert_eq!(note.user_id, "user-1");
        assert_eq!(note.slug, "سلام-bonjour");
        assert_eq!(note.review_count, 0);
        assert!(note.ease.is_none() && note.next_review_at.is_none());
        assert!(!note.created_at.is_empty());
        assert_eq!(note.created_at, note.updated_at);
        // Slug check used the cached list; no extra read.
        assert_eq!(backend.reads.get(), 1);
        assert!(cache.borrow().peek(&notes_list_key()).is_none());

        let notes = svc.list().await.expect("list");
        assert_eq!(backend.reads.get(), 2);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].native_text, "Bonjour");
        assert_eq!(notes[0].review_count, 0);
    }

    #[tokio::test]
    async fn list_is_cached_for_five_minutes() {
        let backend = MemoryBackend::default();
        let cache = cache();
        let s = session("u");
        let svc = NoteService::new(&backend, &cache, Some(&s)).with_clock(test_clock);

        svc.list().await.expect("list");
        advance(NOTES_STALE_MS - 1);
        svc.list().await.expect("list");
        assert_eq!(backend.reads.get(), 1);

        advance(1);
        svc.list().await.expect("list");
        assert_eq!(backend.reads.get(), 2);
    }

    #[tokio::test]
    async fn duplicate_text_gets_suffixed_slug() {
        let backend = MemoryBackend::default();
        let cache = cache();
        let s = session("u");
        let svc = NoteService::new(&backend, &cache, Some(&s)).with_clock(test_clock);

        let a = svc.create(input("Merci", "Shukran")).await.expect("create");
        let b = svc.create(input("merci!", "shukran")).await.expect("create");
        assert_eq!(a.slug, "shukran-merci");
        assert_eq!(b.slug, "shukran-merci-2");
    }

    #[tokio::test]
    async fn stale_list_is_refetched_before_picking_a_slug() {
        let backend = MemoryBackend::default();
        let s = session("u");
        let cache_a = cache();
        let cache_b = cache();
        let tab_a = NoteService::new(&backend, &cache_a, Some(&s)).with_clock(test_clock);
        let tab_b = NoteService::new(&backend, &cache_b, Some(&s)).with_clock(test_clock);

        assert!(tab_a.list().await.expect("list").is_empty());
        tab_b.create(input("Merci", "Shukran")).await.expect("create");

        advance(2 * NOTES_STALE_MS);
        let note = tab_a.create(input("Merci", "Shukran")).await.expect("create");
        assert_eq!(note.slug, "shukran-merci-2");
    }

    #[tokio::test]
    async fn notes_are_scoped_to_owner() {
        let backend = MemoryBackend::default();
        let owner = session("owner");
        let other = session("other");
        let cache_a = cache();
        let cache_b = cache();

        let mine = NoteService::new(&backend, &cache_a, Some(&owner)).with_clock(test_clock);
        let note = mine.create(input("Bonjour", "Salam")).await.expect("create");

        let theirs = NoteService::new(&backend, &cache_b, Some(&other)).with_clock(test_clock);
        assert!(theirs.list().await.expect("list").is_empty());
        assert!(matches!(
            theirs.get(&NoteKey::Slug(note.slug.clone())).await,
            Err(ApiError::NotFound(_))
        ));
        assert!(matches!(
            theirs.update(&note.id, input("x", "y")).await,
            Err(ApiError::NotFound(_))
        ));
        assert!(matches!(theirs.delete(&note.slug).await, Err(ApiError::NotFound(_))));
        assert_eq!(backend.rows.borrow().len(), 1);
    }

    #[tokio::test]
    async fn update_restamps_and_keeps_slug() {
        let backend = MemoryBackend::default();
        let cache = cache();
        let s = session("u");
        let svc = NoteService::new(&backend, &cache, Some(&s)).with_clock(test_clock);

        let note = svc.create(input("Bonjour", "Salam")).await.expect("create");
        let by_id = NoteKey::Id(note.id.clone());
        svc.get(&by_id).await.expect("get");

        advance(60_000);
        let updated = svc
            .update(&note.id, input("Bonsoir", "Masa el khir"))
            .await
            .expect("update");
        assert_eq!(updated.slug, note.slug);
        assert_eq!(updated.created_at, note.created_at);
        assert_ne!(updated.updated_at, note.updated_at);

        // Point lookups are invalidated with the list.
        assert_eq!(svc.get(&by_id).await.expect("get").native_text, "Bonsoir");
    }

    #[tokio::test]
    async fn point_lookup_returns_examples_or_not_found() {
        let backend = MemoryBackend::default();
        let cache = cache();
        let s = session("u");
        let svc = NoteService::new(&backend, &cache, Some(&s)).with_clock(test_clock);

        let mut note = svc.create(input("Merci", "Shukran")).await.expect("create");
        note.examples = vec![NoteExample {
            id: "e1".to_string(),
            note_id: note.id.clone(),
            native: "Merci beaucoup".to_string(),
            learning: "Shukran bzaf".to_string(),
            pronunciation: None,
            created_at: String::new(),
            updated_at: String::new(),
        }];
        backend.rows.borrow_mut().clear();
        backend.seed(note.clone());

        let found = svc.get(&NoteKey::Slug(note.slug.clone())).await.expect("get");
        assert_eq!(found.examples.len(), 1);

        let missing = svc.get(&NoteKey::Slug("nope".to_string())).await;
        assert_eq!(missing, Err(ApiError::NotFound("Note \"nope\"".to_string())));
        assert_eq!(
            missing.map_err(|e| e.to_string()),
            Err("Note \"nope\" not found".to_string())
        );
    }

    #[tokio::test]
    async fn delete_removes_and_invalidates() {
        let backend = MemoryBackend::default();
        let cache = cache();
        let s = session("u");
        let svc = NoteService::new(&backend, &cache, Some(&s)).with_clock(test_clock);

        let note = svc.create(input("Merci", "Shukran")).await.expect("create");
        assert_eq!(svc.list().await.expect("list").len(), 1);

        svc.delete(&note.slug).await.expect("delete");
        assert!(svc.list().await.expect("list").is_empty());
        assert!(matches!(svc.delete(&note.slug).await, Err(ApiError::NotFound(_))));
    }
}
