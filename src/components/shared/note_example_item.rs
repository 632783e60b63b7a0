use crate::models::NoteExample;
use leptos::prelude::*;

#[component]
pub fn NoteExampleItem(example: NoteExample) -> impl IntoView {
    let NoteExample {
        learning,
        native,
        pronunciation,
        ..
    } = example;

    view! {
        <li class="rounded-lg border bg-muted/30 px-3 py-2">
            <p class="text-sm font-medium" dir="auto">{learning}</p>
            {pronunciation
                .filter(|p| !p.trim().is_empty())
                .map(|p| view! { <p class="text-xs italic text-muted-foreground">{p}</p> })}
            <p class="text-sm text-muted-foreground" dir="auto">{native}</p>
        </li>
    }
}
