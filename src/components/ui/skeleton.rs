use leptos::prelude::*;
use tw_merge::tw_merge;

/// Pulsing placeholder block. Usually empty; sized through `class`.
#[component]
pub fn Skeleton(
    #[prop(into, optional)] class: String,
    #[prop(optional)] children: Option<Children>,
) -> impl IntoView {
    let merged_class = tw_merge!("animate-pulse rounded-md bg-muted", class);

    view! {
        <div data-name="Skeleton" class=merged_class aria-hidden="true">
            {children.map(|c| c())}
        </div>
    }
}
