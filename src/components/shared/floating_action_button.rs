use icons::Plus;
use leptos::prelude::*;

#[component]
pub fn FloatingActionButton(
    #[prop(into)] href: String,
    #[prop(into)] label: String,
) -> impl IntoView {
    view! {
        <a
            data-name="FloatingActionButton"
            href=href
            aria-label=label.clone()
            title=label
            class="fixed right-4 bottom-20 z-30 inline-flex size-14 items-center justify-center rounded-full bg-primary text-primary-foreground shadow-lg transition-transform hover:bg-primary/90 active:scale-95"
        >
            <Plus class="size-6" />
        </a>
    }
}
