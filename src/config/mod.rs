use serde::{Deserialize, Serialize};

pub(crate) const DEFAULT_SUPABASE_URL: &str = "http://localhost:54321";
pub(crate) const DEFAULT_LOG_LEVEL: &str = "info";

/// Runtime configuration injected by the hosting page as `window.ENV`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct EnvConfig {
    pub supabase_url: String,
    pub anon_key: String,
    pub log_level: String,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            supabase_url: DEFAULT_SUPABASE_URL.to_string(),
            anon_key: String::new(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl EnvConfig {
    pub fn load() -> Self {
        let mut cfg = Self::default();

        let Some(env) = web_sys::window().and_then(|w| w.get("ENV")) else {
            return cfg;
        };
        if env.is_undefined() || !env.is_object() {
            return cfg;
        }

        // Both the upper-case keys (documented) and lower-case keys are accepted.
        let read = |upper: &str, lower: &str| -> Option<String> {
            [upper, lower].iter().find_map(|k| {
                js_sys::Reflect::get(&env, &(*k).into())
                    .ok()
                    .and_then(|v| v.as_string())
                    .filter(|s| !s.trim().is_empty())
            })
        };

        if let Some(url) = read("SUPABASE_URL", "supabase_url") {
            cfg.supabase_url = normalize_base_url(&url);
        }
        if let Some(key) = read("SUPABASE_ANON_KEY", "supabase_anon_key") {
            cfg.anon_key = key;
        }
        if let Some(level) = read("LOG_LEVEL", "log_level") {
            cfg.log_level = level;
        }

        cfg
    }
}

pub(crate) fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
