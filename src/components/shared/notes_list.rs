use super::NoteCard;
use crate::models::Note;
use leptos::prelude::*;

#[component]
pub fn NotesList(
    notes: Vec<Note>,
    #[prop(into, default = "No notes yet. Tap + to add your first one.".to_string())]
    empty_message: String,
) -> impl IntoView {
    if notes.is_empty() {
        return view! {
            <div class="rounded-xl border border-dashed px-4 py-10 text-center text-sm text-muted-foreground">
                {empty_message}
            </div>
        }
        .into_any();
    }

    view! {
        <ul class="flex flex-col gap-3">
            {notes
                .into_iter()
                .map(|note| view! { <li><NoteCard note=note /></li> })
                .collect_view()}
        </ul>
    }
    .into_any()
}
