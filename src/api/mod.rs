use crate::config::EnvConfig;
use crate::models::{AuthUser, Note, NoteInsert, NotePatch, Session};
use crate::notes::{NoteKey, NotesBackend};
use crate::util::now_secs;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

pub(crate) const NOTES_TABLE: &str = "Notes";
pub(crate) const EXAMPLES_RELATION: &str = "NoteExample";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    AuthRequired,
    NotFound,
    Remote,
    Network,
    Parse,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub(crate) enum ApiError {
    #[error("You need to sign in to continue")]
    AuthRequired,
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    Remote(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Unexpected response: {0}")]
    Parse(String),
}

impl ApiError {
    pub fn kind(&self) -> ApiErrorKind {
        match self {
            Self::AuthRequired => ApiErrorKind::AuthRequired,
            Self::NotFound(_) => ApiErrorKind::NotFound,
            Self::Remote(_) => ApiErrorKind::Remote,
            Self::Network(_) => ApiErrorKind::Network,
            Self::Parse(_) => ApiErrorKind::Parse,
        }
    }

    fn network(e: reqwest::Error) -> Self {
        Self::Network(e.to_string())
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self::Parse(e.to_string())
    }

    /// Map a non-success HTTP response to an error.
    pub(crate) fn from_status(status: u16, body: &str) -> Self {
        if status == 401 {
            return Self::AuthRequired;
        }
        Self::Remote(error_message(status, body))
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

/// Pull a human message out of a GoTrue / PostgREST error body.
pub(crate) fn error_message(status: u16, body: &str) -> String {
    let parsed = serde_json::from_str::<Value>(body).ok();
    let from_json = parsed.as_ref().and_then(|v| {
        ["error_description", "msg", "message", "error"]
            .iter()
            .find_map(|k| v.get(*k).and_then(|m| m.as_str()))
            .map(|s| s.to_string())
    });

    match from_json {
        Some(m) if !m.trim().is_empty() => m,
        _ if !body.trim().is_empty() && parsed.is_none() => {
            format!("Request failed ({status}): {}", body.trim())
        }
        _ => format!("Request failed ({status})"),
    }
}

/// Result of a sign-up: either an immediate session, or a user that still
/// has to confirm their email.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum AuthGrant {
    Session(Session),
    PendingConfirmation(AuthUser),
}

pub(crate) fn parse_session(data: &Value, now_secs: i64) -> ApiResult<Session> {
    let access_token = data
        .get("access_token")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::parse("missing access_token"))?;

    let user: AuthUser = data
        .get("user")
        .cloned()
        .ok_or_else(|| ApiError::parse("missing user"))
        .and_then(|u| serde_json::from_value(u).map_err(ApiError::parse))?;

    let expires_at = data.get("expires_at").and_then(|v| v.as_i64()).or_else(|| {
        data.get("expires_in")
            .and_then(|v| v.as_i64())
            .map(|secs| now_secs + secs)
    });

    Ok(Session {
        access_token: access_token.to_string(),
        refresh_token: data
            .get("refresh_token")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string()),
        expires_at,
        user,
    })
}

pub(crate) fn parse_auth_grant(data: &Value, now_secs: i64) -> ApiResult<AuthGrant> {
    if data.get("access_token").is_some() {
        return parse_session(data, now_secs).map(AuthGrant::Session);
    }

    // Email confirmation pending: the body is the user itself (or wraps it).
    let user = data.get("user").unwrap_or(data).clone();
    serde_json::from_value::<AuthUser>(user)
        .map(AuthGrant::PendingConfirmation)
        .map_err(ApiError::parse)
}

/// Build a PostgREST path for the notes table with `eq.` filters.
pub(crate) fn notes_path(select: &str, filters: &[(&str, &str)], limit: Option<u32>) -> String {
    let mut path = format!("/rest/v1/{NOTES_TABLE}?select={select}");
    for (column, value) in filters {
        path.push_str(&format!("&{column}=eq.{}", urlencoding::encode(value)));
    }
    if let Some(n) = limit {
        path.push_str(&format!("&limit={n}"));
    }
    path
}

fn point_select() -> String {
    format!("*,{EXAMPLES_RELATION}(*)")
}

fn parse_rows(data: Value) -> ApiResult<Vec<Note>> {
    match data {
        Value::Null => Ok(vec![]),
        Value::Array(_) => serde_json::from_value(data).map_err(ApiError::parse),
        // Single-object responses are accepted too.
        Value::Object(_) => serde_json::from_value::<Note>(data)
            .map(|n| vec![n])
            .map_err(ApiError::parse),
        other => Err(ApiError::parse(format!("expected rows, got {other}"))),
    }
}

#[derive(Clone, Debug)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
    pub(crate) anon_key: String,
    pub(crate) token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &EnvConfig) -> Self {
        Self {
            base_url: config.supabase_url.clone(),
            anon_key: config.anon_key.clone(),
            token: None,
        }
    }

    pub fn with_session(mut self, session: &Session) -> Self {
        self.token = Some(session.access_token.clone());
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {t}"))
    }

    async fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        prefer: Option<&str>,
    ) -> ApiResult<Value> {
        let client = reqwest::Client::new();
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, path, "backend request");

        let mut req = client
            .request(method.clone(), url)
            .header("apikey", &self.anon_key);
        if let Some(header) = self.auth_header() {
            req = req.header("Authorization", header);
        }
        if let Some(p) = prefer {
            req = req.header("Prefer", p);
        }
        if let Some(b) = body {
            req = req.json(b);
        }

        let res = req.send().await.map_err(ApiError::network)?;
        let status = res.status();
        let text = res.text().await.unwrap_or_default();

        if status.is_success() {
            if text.trim().is_empty() {
                return Ok(Value::Null);
            }
            serde_json::from_str(&text).map_err(ApiError::parse)
        } else {
            let err = ApiError::from_status(status.as_u16(), &text);
            tracing::warn!(%method, path, status = status.as_u16(), error = %err, "backend request failed");
            Err(err)
        }
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> ApiResult<AuthGrant> {
        let data = self
            .request(
                Method::POST,
                "/auth/v1/signup",
                Some(&serde_json::json!({ "email": email, "password": password })),
                None,
            )
            .await?;
        parse_auth_grant(&data, now_secs())
    }

    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> ApiResult<Session> {
        let data = self
            .request(
                Method::POST,
                "/auth/v1/token?grant_type=password",
                Some(&serde_json::json!({ "email": email, "password": password })),
                None,
            )
            .await
            .map_err(|e| match e {
                // A wrong password is a 400 from GoTrue, but keep a 401 readable too.
                ApiError::AuthRequired => ApiError::Remote("Invalid login credentials".to_string()),
                other => other,
            })?;
        parse_session(&data, now_secs())
    }

    pub async fn refresh_session(&self, refresh_token: &str) -> ApiResult<Session> {
        let data = self
            .request(
                Method::POST,
                "/auth/v1/token?grant_type=refresh_token",
                Some(&serde_json::json!({ "refresh_token": refresh_token })),
                None,
            )
            .await?;
        parse_session(&data, now_secs())
    }

    pub async fn get_user(&self) -> ApiResult<AuthUser> {
        if !self.is_authenticated() {
            return Err(ApiError::AuthRequired);
        }
        let data = self
            .request::<Value>(Method::GET, "/auth/v1/user", None, None)
            .await?;
        serde_json::from_value(data).map_err(ApiError::parse)
    }

    pub async fn sign_out(&self) -> ApiResult<()> {
        if !self.is_authenticated() {
            return Ok(());
        }
        self.request::<Value>(Method::POST, "/auth/v1/logout", None, None)
            .await
            .map(|_| ())
    }
}

impl NotesBackend for ApiClient {
    async fn select_notes(&self, user_id: &str) -> ApiResult<Vec<Note>> {
        let path = notes_path("*", &[("user_id", user_id)], None);
        let data = self.request::<Value>(Method::GET, &path, None, None).await?;
        parse_rows(data)
    }

    async fn select_note(&self, user_id: &str, key: &NoteKey) -> ApiResult<Option<Note>> {
        let path = notes_path(
            &point_select(),
            &[("user_id", user_id), (key.column(), key.value())],
            Some(1),
        );
        let data = self.request::<Value>(Method::GET, &path, None, None).await?;
        Ok(parse_rows(data)?.into_iter().next())
    }

    async fn insert_note(&self, row: &NoteInsert) -> ApiResult<Note> {
        let path = format!("/rest/v1/{NOTES_TABLE}?select=*");
        let data = self
            .request(
                Method::POST,
                &path,
                Some(&[row]),
                Some("return=representation"),
            )
            .await?;
        parse_rows(data)?
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::parse("insert returned no row"))
    }

    async fn update_note(
        &self,
        user_id: &str,
        id: &str,
        patch: &NotePatch,
    ) -> ApiResult<Option<Note>> {
        let path = notes_path("*", &[("id", id), ("user_id", user_id)], None);
        let data = self
            .request(
                Method::PATCH,
                &path,
                Some(patch),
                Some("return=representation"),
            )
            .await?;
        Ok(parse_rows(data)?.into_iter().next())
    }

    async fn delete_note(&self, user_id: &str, slug: &str) -> ApiResult<bool> {
        let path = notes_path("*", &[("slug", slug), ("user_id", user_id)], None);
        let data = self
            .request::<Value>(
                Method::DELETE,
                &path,
                None,
                Some("return=representation"),
            )
            .await?;
        Ok(!parse_rows(data)?.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new(&EnvConfig::default())
    }

    #[test]
    fn new_client_is_anonymous() {
        let c = client();
        assert_eq!(c.base_url, "http://localhost:54321");
        assert!(!c.is_authenticated());
        assert!(c.auth_header().is_none());
    }

    #[test]
    fn session_sets_bearer_header() {
        let session = Session {
            access_token: "jwt".to_string(),
            refresh_token: None,
            expires_at: None,
            user: AuthUser {
                id: "u".to_string(),
                email: None,
            },
        };
        let c = client().with_session(&session);
        assert_eq!(c.auth_header().as_deref(), Some("Bearer jwt"));
    }

    #[test]
    fn password_grant_contract_deserializes() {
        let json = serde_json::json!({
            "access_token": "jwt",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "r1",
            "user": {"id": "u-1", "email": "a@b.io", "aud": "authenticated"}
        });
        let s = parse_session(&json, 1_000).expect("session should parse");
        assert_eq!(s.access_token, "jwt");
        assert_eq!(s.expires_at, Some(4_600));
        assert_eq!(s.user.email.as_deref(), Some("a@b.io"));
    }

    #[test]
    fn explicit_expires_at_wins_over_expires_in() {
        let json = serde_json::json!({
            "access_token": "jwt", "expires_in": 3600, "expires_at": 42,
            "user": {"id": "u"}
        });
        assert_eq!(parse_session(&json, 0).map(|s| s.expires_at), Ok(Some(42)));
    }

    #[test]
    fn signup_without_session_is_pending_confirmation() {
        let json = serde_json::json!({"id": "u-2", "email": "new@b.io", "confirmation_sent_at": "x"});
        let grant = parse_auth_grant(&json, 0).expect("grant should parse");
        assert_eq!(
            grant,
            AuthGrant::PendingConfirmation(AuthUser {
                id: "u-2".to_string(),
                email: Some("new@b.io".to_string())
            })
        );
    }

    #[test]
    fn signup_with_session_signs_in() {
        let json = serde_json::json!({"access_token": "t", "user": {"id": "u"}});
        assert!(matches!(
            parse_auth_grant(&json, 0),
            Ok(AuthGrant::Session(_))
        ));
    }

    #[test]
    fn error_bodies_pass_message_through() {
        assert_eq!(
            error_message(400, r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#),
            "Invalid login credentials"
        );
        assert_eq!(
            error_message(409, r#"{"code":"23505","message":"duplicate key value"}"#),
            "duplicate key value"
        );
        assert_eq!(error_message(502, "Bad gateway"), "Request failed (502): Bad gateway");
        assert_eq!(error_message(500, ""), "Request failed (500)");
    }

    #[test]
    fn unauthorized_maps_to_auth_required() {
        assert_eq!(ApiError::from_status(401, "{}"), ApiError::AuthRequired);
        assert_eq!(ApiError::from_status(401, "{}").kind(), ApiErrorKind::AuthRequired);
        assert_eq!(ApiError::from_status(500, "{}").kind(), ApiErrorKind::Remote);
    }

    #[test]
    fn notes_path_scopes_and_encodes_filters() {
        assert_eq!(
            notes_path("*", &[("user_id", "u 1")], None),
            "/rest/v1/Notes?select=*&user_id=eq.u%201"
        );
        assert_eq!(
            notes_path(&point_select(), &[("user_id", "u"), ("slug", "salam-bonjour")], Some(1)),
            "/rest/v1/Notes?select=*,NoteExample(*)&user_id=eq.u&slug=eq.salam-bonjour&limit=1"
        );
    }

    #[test]
    fn rows_accept_array_object_and_empty() {
        let row = serde_json::json!({
            "id": "1", "slug": "s", "nativeText": "a", "learningText": "b",
            "noteType": "word", "createdAt": "", "updatedAt": "", "user_id": "u"
        });
        assert_eq!(parse_rows(serde_json::json!([row.clone()])).map(|v| v.len()), Ok(1));
        assert_eq!(parse_rows(row).map(|v| v.len()), Ok(1));
        assert_eq!(parse_rows(Value::Null).map(|v| v.len()), Ok(0));
        assert!(parse_rows(serde_json::json!(3)).is_err());
    }
}
