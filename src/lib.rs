mod api;
mod app;
mod auth;
mod cache;
mod components;
mod config;
mod logging;
mod models;
mod notes;
mod pages;
mod schema;
mod state;
mod storage;
mod util;

use crate::app::App;
use crate::config::EnvConfig;
use leptos::prelude::*;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use crate::models::{AuthUser, Session};
    use crate::storage::{clear_session, load_session, save_session};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn session_storage_roundtrip() {
        clear_session();
        assert!(load_session().is_none());

        let session = Session {
            access_token: "t1".to_string(),
            refresh_token: Some("r1".to_string()),
            expires_at: Some(1_700_000_000),
            user: AuthUser {
                id: "u1".to_string(),
                email: Some("u1@example.com".to_string()),
            },
        };
        save_session(&session);
        assert_eq!(load_session(), Some(session));

        clear_session();
        assert!(load_session().is_none());
    }

    fn mount_host() -> web_sys::HtmlElement {
        use wasm_bindgen::JsCast;
        let document = leptos::prelude::document();
        let host = document.create_element("div").expect("create host");
        document
            .body()
            .expect("body")
            .append_child(&host)
            .expect("attach host");
        host.unchecked_into()
    }

    #[wasm_bindgen_test]
    fn recorder_buttons_do_not_submit_the_form() {
        use crate::components::shared::VoiceRecorder;
        use leptos::prelude::*;

        let host = mount_host();
        let _handle = leptos::mount::mount_to(host.clone(), || view! { <VoiceRecorder /> });
        let button = host
            .query_selector("button")
            .expect("query")
            .expect("record button should render");
        assert_eq!(button.get_attribute("type").as_deref(), Some("button"));
    }

    #[wasm_bindgen_test]
    fn skeleton_renders_without_children() {
        use crate::components::ui::Skeleton;
        use leptos::prelude::*;

        let host = mount_host();
        let _handle = leptos::mount::mount_to(host.clone(), || view! { <Skeleton class="h-4" /> });
        let el = host
            .query_selector("[data-name='Skeleton']")
            .expect("query")
            .expect("skeleton should render");
        let class = el.get_attribute("class").unwrap_or_default();
        assert!(class.contains("animate-pulse"));
        assert!(class.contains("h-4"));
    }

    #[wasm_bindgen_test]
    fn config_defaults_without_window_env() {
        let config = crate::config::EnvConfig::load();
        assert!(!config.supabase_url.ends_with('/'));
    }
}

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();

    let config = EnvConfig::load();
    logging::init(&config.log_level);
    tracing::info!(backend = %config.supabase_url, "starting lingua note");

    mount_to_body(move || view! { <App config=config /> });
}
