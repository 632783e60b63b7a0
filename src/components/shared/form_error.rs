use leptos::prelude::*;

/// Inline validation message under a form field. Renders nothing when empty.
#[component]
pub fn FormError(#[prop(into)] message: Signal<Option<String>>) -> impl IntoView {
    move || {
        message.get().map(|m| {
            view! { <p data-name="FormError" class="text-xs text-destructive" role="alert">{m}</p> }
        })
    }
}
