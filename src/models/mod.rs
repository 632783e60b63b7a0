use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Display, AsRefStr, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub(crate) enum NoteType {
    #[default]
    Word,
    Phrase,
    Sentence,
    Grammar,
}

impl NoteType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Word => "Word",
            Self::Phrase => "Phrase",
            Self::Sentence => "Sentence",
            Self::Grammar => "Grammar",
        }
    }
}

#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Display, AsRefStr, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub(crate) enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn label(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }
}

/// A bilingual vocabulary entry, as stored in the `Notes` table.
///
/// Column names follow the backend table (camelCase, except `user_id`).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Note {
    pub id: String,
    pub slug: String,

    pub native_text: String,
    pub learning_text: String,
    #[serde(default)]
    pub pronunciation: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub note_type: NoteType,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,

    /// Review state. Carried as-is; this client never computes a schedule.
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub ease: Option<f64>,
    #[serde(default)]
    pub last_reviewed_at: Option<String>,
    #[serde(default)]
    pub next_review_at: Option<String>,

    pub created_at: String,
    pub updated_at: String,

    #[serde(rename = "user_id")]
    pub user_id: String,

    /// Only present on point lookups (`select=*,NoteExample(*)`).
    #[serde(rename = "NoteExample", default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<NoteExample>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NoteExample {
    pub id: String,
    pub note_id: String,
    pub native: String,
    pub learning: String,
    #[serde(default)]
    pub pronunciation: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Validated note content, i.e. the insert shape minus anything the client
/// stamps or the server assigns.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct NewNote {
    pub native_text: String,
    pub learning_text: String,
    pub pronunciation: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub note_type: NoteType,
    pub difficulty: Option<Difficulty>,
}

/// Row sent on insert. `id` is omitted so the server assigns it.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NoteInsert {
    pub slug: String,
    pub native_text: String,
    pub learning_text: String,
    pub pronunciation: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub note_type: NoteType,
    pub difficulty: Option<Difficulty>,
    pub review_count: u32,
    pub ease: Option<f64>,
    pub last_reviewed_at: Option<String>,
    pub next_review_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(rename = "user_id")]
    pub user_id: String,
}

/// Columns written by the edit flow.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NotePatch {
    pub native_text: String,
    pub learning_text: String,
    pub pronunciation: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub note_type: NoteType,
    pub difficulty: Option<Difficulty>,
    pub updated_at: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// A signed-in session as returned by the token endpoints.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Unix seconds.
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: AuthUser,
}

impl Session {
    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    /// True when the token expires within `skew_secs` of `now_secs`.
    pub fn is_expired(&self, now_secs: i64, skew_secs: i64) -> bool {
        self.expires_at
            .map(|at| at <= now_secs + skew_secs)
            .unwrap_or(false)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct CategoryCount {
    pub label: String,
    pub count: usize,
}
