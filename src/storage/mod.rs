use crate::models::Session;
use serde::{Deserialize, Serialize};

pub(crate) const SESSION_KEY: &str = "lingua_session";

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

pub(crate) fn load_json_from_storage<T: for<'de> Deserialize<'de>>(key: &str) -> Option<T> {
    let json = local_storage()?.get_item(key).ok().flatten()?;
    serde_json::from_str(&json).ok()
}

pub(crate) fn save_json_to_storage<T: Serialize>(key: &str, value: &T) {
    if let Ok(json) = serde_json::to_string(value) {
        if let Some(storage) = local_storage() {
            if storage.set_item(key, &json).is_err() {
                tracing::warn!(key, "failed to write localStorage");
            }
        }
    }
}

pub(crate) fn remove_from_storage(key: &str) {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(key);
    }
}

pub(crate) fn load_session() -> Option<Session> {
    load_json_from_storage::<Session>(SESSION_KEY)
}

pub(crate) fn save_session(session: &Session) {
    save_json_to_storage(SESSION_KEY, session);
}

pub(crate) fn clear_session() {
    remove_from_storage(SESSION_KEY);
}

/// Parse the `newValue` of a `storage` event for the session key.
///
/// `None` means the key was removed (or holds garbage), i.e. signed out.
pub(crate) fn parse_session_value(raw: Option<&str>) -> Option<Session> {
    raw.and_then(|s| serde_json::from_str(s).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_event_value_parses() {
        let raw = r#"{"access_token":"a","refresh_token":"r","expires_at":10,"user":{"id":"u","email":"x@y.io"}}"#;
        let s = parse_session_value(Some(raw)).expect("session should parse");
        assert_eq!(s.user_id(), "u");
        assert_eq!(s.refresh_token.as_deref(), Some("r"));
    }

    #[test]
    fn removed_or_garbage_value_is_signed_out() {
        assert!(parse_session_value(None).is_none());
        assert!(parse_session_value(Some("not json")).is_none());
    }
}
