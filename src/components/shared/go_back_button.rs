use crate::components::ui::{Button, ButtonSize, ButtonVariant};
use icons::ArrowLeft;
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

/// Back in history, or to `fallback` when there is nothing to go back to.
#[component]
pub fn GoBackButton(#[prop(into, default = "/".to_string())] fallback: String) -> impl IntoView {
    let navigate = use_navigate();

    let on_click = move |_| {
        let history = window().history().ok();
        let has_previous = history
            .as_ref()
            .and_then(|h| h.length().ok())
            .is_some_and(|len| len > 1);

        match history {
            Some(h) if has_previous => {
                if h.back().is_err() {
                    navigate(&fallback, Default::default());
                }
            }
            _ => navigate(&fallback, Default::default()),
        }
    };

    view! {
        <Button
            variant=ButtonVariant::Ghost
            size=ButtonSize::Icon
            attr:aria-label="Go back"
            on:click=on_click
        >
            <ArrowLeft />
        </Button>
    }
}
