use crate::models::{Difficulty, NewNote, Note, NoteType};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;
use std::str::FromStr;

pub(crate) const MIN_PASSWORD_LEN: usize = 8;

pub(crate) const CATEGORY_PRESETS: [&str; 3] = ["Darija Basics", "Travel Phrases", "Food & Drink"];

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(
        r"^[A-Za-z0-9_'+\-.]+@[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?)*\.[A-Za-z]{2,}$",
    )
    .expect("Failed to compile email regex");
}

/// Field name -> message, in field order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(|s| s.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Credentials {
    pub email: String,
    pub password: String,
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.starts_with('.') || email.contains("..") {
        return false;
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn validate_sign_in(email: &str, password: &str) -> Result<Credentials, FieldErrors> {
    let mut errors = FieldErrors::default();
    if !is_valid_email(email) {
        errors.insert("email", "Please enter a valid email address.");
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        errors.insert("password", "Password must be at least 8 characters.");
    }
    errors.into_result(|| Credentials {
        email: email.trim().to_lowercase(),
        password: password.to_string(),
    })
}

pub(crate) fn validate_sign_up(
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<Credentials, FieldErrors> {
    let mut errors = match validate_sign_in(email, password) {
        Ok(_) => FieldErrors::default(),
        Err(e) => e,
    };
    if password != confirm_password {
        errors.insert("confirm_password", "Passwords do not match");
    }
    errors.into_result(|| Credentials {
        email: email.trim().to_lowercase(),
        password: password.to_string(),
    })
}

/// Raw editor state. Every field is what the user typed or picked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct NoteDraft {
    pub native_text: String,
    pub learning_text: String,
    pub pronunciation: String,
    pub note_type: String,
    pub category: String,
    pub difficulty: String,
    pub tags: Vec<String>,
}

impl Default for NoteDraft {
    fn default() -> Self {
        Self {
            native_text: String::new(),
            learning_text: String::new(),
            pronunciation: String::new(),
            note_type: NoteType::Word.to_string(),
            category: CATEGORY_PRESETS[0].to_string(),
            difficulty: Difficulty::Beginner.to_string(),
            tags: vec![],
        }
    }
}

impl From<&Note> for NoteDraft {
    fn from(note: &Note) -> Self {
        Self {
            native_text: note.native_text.clone(),
            learning_text: note.learning_text.clone(),
            pronunciation: note.pronunciation.clone().unwrap_or_default(),
            note_type: note.note_type.to_string(),
            category: note.category.clone().unwrap_or_default(),
            difficulty: note.difficulty.map(|d| d.to_string()).unwrap_or_default(),
            tags: note.tags.clone(),
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    let t = s.trim();
    (!t.is_empty()).then(|| t.to_string())
}

/// Trim, drop blanks and keep the first occurrence of each tag.
pub(crate) fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for t in tags.iter().filter_map(|t| non_empty(t)) {
        if !out.contains(&t) {
            out.push(t);
        }
    }
    out
}

pub(crate) fn validate_note(draft: &NoteDraft) -> Result<NewNote, FieldErrors> {
    let mut errors = FieldErrors::default();

    let native_text = non_empty(&draft.native_text);
    if native_text.is_none() {
        errors.insert("native_text", "Native text is required");
    }
    let learning_text = non_empty(&draft.learning_text);
    if learning_text.is_none() {
        errors.insert("learning_text", "Learning text is required");
    }

    let note_type = NoteType::from_str(draft.note_type.trim()).ok();
    if note_type.is_none() {
        errors.insert("note_type", "Invalid note type");
    }

    let difficulty = match non_empty(&draft.difficulty) {
        None => Ok(None),
        Some(d) => Difficulty::from_str(&d).map(Some),
    };
    if difficulty.is_err() {
        errors.insert("difficulty", "Invalid difficulty");
    }

    match (native_text, learning_text, note_type, difficulty) {
        (Some(native_text), Some(learning_text), Some(note_type), Ok(difficulty))
            if errors.is_empty() =>
        {
            Ok(NewNote {
                native_text,
                learning_text,
                pronunciation: non_empty(&draft.pronunciation),
                category: non_empty(&draft.category),
                tags: normalize_tags(&draft.tags),
                note_type,
                difficulty,
            })
        }
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(native: &str, learning: &str) -> NoteDraft {
        NoteDraft {
            native_text: native.to_string(),
            learning_text: learning.to_string(),
            ..NoteDraft::default()
        }
    }

    #[test]
    fn valid_draft_is_normalized() {
        let mut d = draft("  Bonjour ", "سلام");
        d.pronunciation = "   ".to_string();
        d.tags = vec![" greeting".to_string(), "".to_string(), "greeting".to_string(), "basic".to_string()];
        d.difficulty = String::new();

        let note = validate_note(&d).expect("draft should validate");
        assert_eq!(note.native_text, "Bonjour");
        assert_eq!(note.learning_text, "سلام");
        assert_eq!(note.pronunciation, None);
        assert_eq!(note.category.as_deref(), Some("Darija Basics"));
        assert_eq!(note.tags, vec!["greeting".to_string(), "basic".to_string()]);
        assert_eq!(note.note_type, NoteType::Word);
        assert_eq!(note.difficulty, None);
    }

    #[test]
    fn every_note_type_and_difficulty_is_accepted() {
        for t in ["word", "phrase", "sentence", "grammar"] {
            for diff in ["beginner", "intermediate", "advanced"] {
                let mut d = draft("a", "b");
                d.note_type = t.to_string();
                d.difficulty = diff.to_string();
                assert!(validate_note(&d).is_ok(), "{t}/{diff} should be accepted");
            }
        }
    }

    #[test]
    fn empty_required_texts_are_rejected() {
        let errors = validate_note(&draft("", "  ")).expect_err("should be rejected");
        assert_eq!(errors.get("native_text"), Some("Native text is required"));
        assert_eq!(errors.get("learning_text"), Some("Learning text is required"));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn out_of_set_enums_are_rejected() {
        let mut d = draft("a", "b");
        d.note_type = "idiom".to_string();
        d.difficulty = "expert".to_string();
        let errors = validate_note(&d).expect_err("should be rejected");
        assert_eq!(errors.get("note_type"), Some("Invalid note type"));
        assert_eq!(errors.get("difficulty"), Some("Invalid difficulty"));
        assert!(errors.get("native_text").is_none());
    }

    #[test]
    fn sign_in_rules() {
        let ok = validate_sign_in(" User@Example.COM ", "password1").expect("should validate");
        assert_eq!(ok.email, "user@example.com");

        let errors = validate_sign_in("not-an-email", "short").expect_err("should be rejected");
        assert_eq!(errors.get("email"), Some("Please enter a valid email address."));
        assert_eq!(errors.get("password"), Some("Password must be at least 8 characters."));
    }

    #[test]
    fn email_pattern_compiles_and_accepts_plain_address() {
        lazy_static::initialize(&EMAIL_RE);
        assert!(EMAIL_RE.is_match("user@example.com"));
    }

    #[test]
    fn email_syntax() {
        assert!(is_valid_email("a.b+tag@sub.example.org"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email(".a@b.io"));
        assert!(!is_valid_email("a..b@b.io"));
        assert!(!is_valid_email("a b@b.io"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn sign_up_requires_matching_confirmation() {
        assert!(validate_sign_up("a@b.io", "password1", "password1").is_ok());
        let errors =
            validate_sign_up("a@b.io", "password1", "password2").expect_err("should be rejected");
        assert_eq!(errors.get("confirm_password"), Some("Passwords do not match"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn draft_round_trips_from_note() {
        let json = serde_json::json!({
            "id": "n1", "slug": "s", "nativeText": "Merci", "learningText": "شكرا",
            "noteType": "phrase", "difficulty": "advanced", "category": "Food & Drink",
            "tags": ["x"], "createdAt": "", "updatedAt": "", "user_id": "u"
        });
        let note: Note = serde_json::from_value(json).expect("row should parse");
        let d = NoteDraft::from(&note);
        assert_eq!(d.note_type, "phrase");
        assert_eq!(d.difficulty, "advanced");
        let validated = validate_note(&d).expect("should validate");
        assert_eq!(validated.category.as_deref(), Some("Food & Drink"));
        assert_eq!(validated.tags, vec!["x".to_string()]);
    }
}
