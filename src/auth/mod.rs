use crate::api::{ApiClient, ApiError, ApiResult, AuthGrant};
use crate::config::EnvConfig;
use crate::models::{AuthUser, Session};
use crate::state::{AppContext, QueryClient};
use crate::storage::{clear_session, load_session, parse_session_value, save_session, SESSION_KEY};
use crate::util::{now_ms, now_secs};
use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dom::helpers::window_event_listener;

/// A stored session expiring within this many seconds is refreshed before use.
pub(crate) const REFRESH_SKEW_SECS: i64 = 60;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum SessionState {
    Loading,
    SignedOut,
    SignedIn(Session),
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum AuthEvent {
    InitialSession(Option<Session>),
    SignedIn(Session),
    TokenRefreshed(Session),
    SignedOut,
}

impl SessionState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::SignedIn(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    fn user_id(&self) -> Option<&str> {
        self.session().map(|s| s.user_id())
    }

    /// Whether `event` changes anything from this state.
    ///
    /// The initial session only lands while still loading, and a refreshed
    /// token only replaces a session for the same user.
    pub fn accepts(&self, event: &AuthEvent) -> bool {
        match event {
            AuthEvent::InitialSession(_) => self.is_loading(),
            AuthEvent::TokenRefreshed(s) => self.user_id() == Some(s.user_id()),
            AuthEvent::SignedIn(_) | AuthEvent::SignedOut => true,
        }
    }

    pub fn apply(self, event: AuthEvent) -> Self {
        if !self.accepts(&event) {
            return self;
        }
        match event {
            AuthEvent::InitialSession(Some(s))
            | AuthEvent::SignedIn(s)
            | AuthEvent::TokenRefreshed(s) => Self::SignedIn(s),
            AuthEvent::InitialSession(None) | AuthEvent::SignedOut => Self::SignedOut,
        }
    }
}

/// Event for a `storage` change of the session key seen from another tab.
pub(crate) fn storage_event(current: &SessionState, new_value: Option<Session>) -> AuthEvent {
    match new_value {
        None => AuthEvent::SignedOut,
        Some(s) if current.user_id() == Some(s.user_id()) => AuthEvent::TokenRefreshed(s),
        Some(s) => AuthEvent::SignedIn(s),
    }
}

/// Owns the release of an external listener. Released at most once, either
/// explicitly or on drop.
pub(crate) struct AuthSubscription {
    release: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl AuthSubscription {
    pub fn new(release: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    /// Returns `true` only on the call that actually released.
    pub fn release(&mut self) -> bool {
        match self.release.take() {
            Some(f) => {
                f();
                true
            }
            None => false,
        }
    }
}

impl Drop for AuthSubscription {
    fn drop(&mut self) {
        self.release();
    }
}

#[allow(async_fn_in_trait)]
pub(crate) trait SessionBackend {
    async fn refresh(&self, refresh_token: &str) -> ApiResult<Session>;
    async fn current_user(&self, session: &Session) -> ApiResult<AuthUser>;
}

impl SessionBackend for ApiClient {
    async fn refresh(&self, refresh_token: &str) -> ApiResult<Session> {
        self.refresh_session(refresh_token).await
    }

    async fn current_user(&self, session: &Session) -> ApiResult<AuthUser> {
        self.clone().with_session(session).get_user().await
    }
}

async fn refresh_stored<B: SessionBackend>(backend: &B, stored: &Session) -> Option<Session> {
    let token = stored.refresh_token.as_deref()?;
    match backend.refresh(token).await {
        Ok(s) => Some(s),
        Err(e) => {
            tracing::warn!(error = %e, "session refresh failed");
            None
        }
    }
}

/// Resolve the persisted session at startup. `None` means signed out.
pub(crate) async fn restore_session<B: SessionBackend>(
    backend: &B,
    stored: Option<Session>,
    now_secs: i64,
) -> Option<Session> {
    let stored = stored?;

    if stored.is_expired(now_secs, REFRESH_SKEW_SECS) {
        return refresh_stored(backend, &stored).await;
    }

    match backend.current_user(&stored).await {
        Ok(user) => Some(Session { user, ..stored }),
        Err(ApiError::AuthRequired) => refresh_stored(backend, &stored).await,
        Err(e) => {
            tracing::warn!(error = %e, "could not validate stored session, keeping it");
            Some(stored)
        }
    }
}

/// A token obtained by renewal within this window that is rejected again
/// signs out instead of refreshing in a loop.
pub(crate) const RENEW_RETRY_MS: i64 = 60_000;

/// Whether `token` is the one the last renewal produced, and that renewal
/// happened less than [`RENEW_RETRY_MS`] ago.
pub(crate) fn rejected_right_after_renewal(
    last: Option<&(String, i64)>,
    token: &str,
    now_ms: i64,
) -> bool {
    last.is_some_and(|(renewed, at)| renewed == token && now_ms - at < RENEW_RETRY_MS)
}

/// Event for a session the backend just rejected mid-use: the refreshed
/// session if the refresh token still works, otherwise sign out.
pub(crate) async fn renew_rejected<B: SessionBackend>(backend: &B, current: &Session) -> AuthEvent {
    match refresh_stored(backend, current).await {
        Some(fresh) => AuthEvent::TokenRefreshed(fresh),
        None => AuthEvent::SignedOut,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum AuthOutcome {
    Success(AuthUser),
    Failure(String),
}

#[derive(Clone, Copy)]
pub(crate) struct AuthContext {
    state: RwSignal<SessionState>,
    config: StoredValue<EnvConfig>,
    queries: QueryClient,
    renewing: StoredValue<bool>,
    last_renewal: StoredValue<Option<(String, i64)>>,
}

impl AuthContext {
    pub fn new(config: EnvConfig, queries: QueryClient) -> Self {
        Self {
            state: RwSignal::new(SessionState::Loading),
            config: StoredValue::new(config),
            queries,
            renewing: StoredValue::new(false),
            last_renewal: StoredValue::new(None),
        }
    }

    pub fn with_state<T>(&self, f: impl FnOnce(&SessionState) -> T) -> T {
        self.state.with(f)
    }

    pub fn session(&self) -> Option<Session> {
        self.state.with(|s| s.session().cloned())
    }

    pub fn session_untracked(&self) -> Option<Session> {
        self.state.with_untracked(|s| s.session().cloned())
    }

    /// Backend client for the current session.
    pub fn client(&self) -> ApiClient {
        let client = self.config.with_value(ApiClient::new);
        match self.session_untracked() {
            Some(s) => client.with_session(&s),
            None => client,
        }
    }

    /// Apply an event to the in-memory state only. Returns whether it took
    /// effect. Cached queries are dropped whenever the user changes.
    pub fn dispatch(&self, event: AuthEvent) -> bool {
        let Some(prev) = self.state.try_get_untracked() else {
            return false;
        };
        if !prev.accepts(&event) {
            tracing::debug!(?event, "auth event ignored");
            return false;
        }

        let prev_user = prev.user_id().map(|s| s.to_string());
        let next = prev.apply(event);
        if next.user_id() != prev_user.as_deref() {
            self.queries.clear();
        }
        self.state.try_set(next);
        true
    }

    /// Apply an event raised in this tab and persist the result.
    fn commit(&self, event: AuthEvent) {
        let persist = match &event {
            AuthEvent::InitialSession(Some(s))
            | AuthEvent::SignedIn(s)
            | AuthEvent::TokenRefreshed(s) => Some(s.clone()),
            AuthEvent::InitialSession(None) | AuthEvent::SignedOut => None,
        };
        if !self.dispatch(event) {
            return;
        }
        match persist {
            Some(s) => save_session(&s),
            None => clear_session(),
        }
    }

    /// Called by the data layer when the backend rejects the access token.
    /// One refresh runs at a time; only a failed refresh signs out.
    pub async fn renew(self) {
        let Some(current) = self.state.try_with_untracked(|s| s.session().cloned()).flatten() else {
            return;
        };
        if self.renewing.try_get_value().unwrap_or(true) {
            return;
        }
        self.renewing.set_value(true);

        let again = self
            .last_renewal
            .with_value(|last| rejected_right_after_renewal(last.as_ref(), &current.access_token, now_ms()));
        let event = if again {
            AuthEvent::SignedOut
        } else {
            let client = self.config.with_value(ApiClient::new);
            renew_rejected(&client, &current).await
        };
        if let AuthEvent::TokenRefreshed(fresh) = &event {
            self.last_renewal
                .try_set_value(Some((fresh.access_token.clone(), now_ms())));
        }
        if event == AuthEvent::SignedOut {
            tracing::warn!("session rejected by backend, signing out");
        } else {
            tracing::debug!("access token refreshed after rejection");
        }
        self.commit(event);
        self.renewing.try_set_value(false);
    }

    pub async fn sign_in(self, email: String, password: String) -> AuthOutcome {
        let email = email.trim().to_lowercase();
        let client = self.config.with_value(ApiClient::new);

        match client.sign_in_with_password(&email, &password).await {
            Ok(session) => {
                let user = session.user.clone();
                tracing::info!(user_id = %user.id, "signed in");
                self.commit(AuthEvent::SignedIn(session));
                AuthOutcome::Success(user)
            }
            Err(e) => {
                tracing::warn!(error = %e, "sign in failed");
                AuthOutcome::Failure(e.to_string())
            }
        }
    }

    pub async fn sign_up(self, email: String, password: String) -> AuthOutcome {
        let email = email.trim().to_lowercase();
        let client = self.config.with_value(ApiClient::new);

        match client.sign_up(&email, &password).await {
            Ok(AuthGrant::Session(session)) => {
                let user = session.user.clone();
                tracing::info!(user_id = %user.id, "signed up");
                self.commit(AuthEvent::SignedIn(session));
                AuthOutcome::Success(user)
            }
            Ok(AuthGrant::PendingConfirmation(user)) => {
                tracing::info!(user_id = %user.id, "signed up, awaiting email confirmation");
                AuthOutcome::Success(user)
            }
            Err(e) => {
                tracing::warn!(error = %e, "sign up failed");
                AuthOutcome::Failure(e.to_string())
            }
        }
    }

    /// Best-effort: local state is signed out whatever the backend says.
    pub async fn sign_out(self) {
        if let Err(e) = self.client().sign_out().await {
            tracing::warn!(error = %e, "backend sign out failed");
        }
        self.commit(AuthEvent::SignedOut);
    }
}

pub(crate) fn use_auth() -> AuthContext {
    use_context::<AuthContext>()
        .unwrap_or_else(|| panic!("use_auth must be used within an AuthProvider"))
}

#[component]
pub fn AuthProvider(children: Children) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let auth = AuthContext::new(app_state.0.config.clone(), app_state.0.queries);
    provide_context(auth);

    let client = app_state.0.api_client(None);
    spawn_local(async move {
        let restored = restore_session(&client, load_session(), now_secs()).await;
        tracing::debug!(signed_in = restored.is_some(), "session restored");
        auth.commit(AuthEvent::InitialSession(restored));
    });

    // Other tabs signing in, out or refreshing.
    let handle = window_event_listener(ev::storage, move |e: web_sys::StorageEvent| {
        if e.key().is_some_and(|k| k != SESSION_KEY) {
            return;
        }
        let new_value = parse_session_value(e.new_value().as_deref());
        let Some(event) = auth
            .state
            .try_with_untracked(|s| storage_event(s, new_value))
        else {
            return;
        };
        auth.dispatch(event);
    });

    let subscription = AuthSubscription::new(move || handle.remove());
    on_cleanup(move || {
        let mut subscription = subscription;
        subscription.release();
    });

    children()
}
