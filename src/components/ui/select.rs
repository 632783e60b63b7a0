use leptos::prelude::*;
use tw_merge::tw_merge;
use wasm_bindgen::JsCast;

/// Native `<select>` bound to a string signal. Options are `(value, label)`.
#[component]
pub fn NativeSelect(
    #[prop(into, optional)] class: String,
    #[prop(into, optional)] id: String,
    #[prop(into, optional)] disabled: Signal<bool>,
    #[prop(into, optional)] invalid: Signal<bool>,
    options: Vec<(String, String)>,
    #[prop(into)] bind_value: RwSignal<String>,
) -> impl IntoView {
    let merged_class = tw_merge!(
        "border-input flex h-9 w-full rounded-md border bg-transparent px-3 py-1 text-base shadow-xs outline-none md:text-sm",
        "focus-visible:border-ring focus-visible:ring-ring/50 focus-visible:ring-2",
        "aria-invalid:border-destructive disabled:cursor-not-allowed disabled:opacity-50",
        class
    );

    let on_change = move |ev: web_sys::Event| {
        if let Some(select) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlSelectElement>().ok())
        {
            bind_value.set(select.value());
        }
    };

    view! {
        <select
            data-name="NativeSelect"
            id=id
            class=merged_class
            disabled=move || disabled.get()
            aria-invalid=move || invalid.get().then_some("true")
            prop:value=move || bind_value.get()
            on:change=on_change
        >
            {options
                .into_iter()
                .map(|(value, label)| {
                    let v = value.clone();
                    view! {
                        <option value=value selected=move || bind_value.get() == v>
                            {label}
                        </option>
                    }
                })
                .collect_view()}
        </select>
    }
}
