use super::QueryError;
use crate::cache::{QueryScope, QueryStore};
use crate::components::layout::{AppBarConfig, MainLayout};
use crate::components::shared::{FloatingActionButton, NotesList, SkeletonList};
use crate::components::ui::{Button, ButtonSize, ButtonVariant};
use crate::models::Note;
use crate::notes::hooks::use_notes;
use crate::state::AppContext;
use icons::{Languages, RefreshCw, X};
use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

/// Notes in `category`, or all of them when no filter is set.
pub(crate) fn filter_by_category(notes: &[Note], category: Option<&str>) -> Vec<Note> {
    match category.map(str::trim).filter(|c| !c.is_empty()) {
        Some(category) => notes
            .iter()
            .filter(|n| n.category.as_deref() == Some(category))
            .cloned()
            .collect(),
        None => notes.to_vec(),
    }
}

#[component]
pub fn HomePage() -> impl IntoView {
    let notes = use_notes();
    let queries = expect_context::<AppContext>().0.queries;
    let query = use_query_map();
    let category = Memo::new(move |_| query.with(|q| q.get("category")));

    let refresh = move || {
        view! {
            <Button
                variant=ButtonVariant::Ghost
                size=ButtonSize::Icon
                attr:title="Refresh"
                attr:aria-label="Refresh"
                on:click=move |_| queries.invalidate(QueryScope::Notes)
            >
                <RefreshCw class="size-4" />
            </Button>
        }
    };
    let config = AppBarConfig::new("Lingua Note")
        .left(|| view! { <Languages class="size-5 text-primary" /> })
        .right(refresh);

    view! {
        <MainLayout config=config>
            {move || {
                category.get().map(|c| {
                    view! {
                        <div class="mb-3 flex items-center justify-between rounded-lg bg-muted px-3 py-2 text-xs">
                            <span>"Category: " <span class="font-medium">{c}</span></span>
                            <a href="/" class="text-muted-foreground hover:text-foreground" aria-label="Clear filter">
                                <X class="size-4" />
                            </a>
                        </div>
                    }
                })
            }}

            {move || {
                if let Some(e) = notes.error.get() {
                    return view! { <QueryError error=e /> }.into_any();
                }
                match notes.data.get() {
                    Some(list) => {
                        let filtered = category.with(|c| filter_by_category(&list, c.as_deref()));
                        let empty = if category.with(Option::is_some) {
                            "No notes in this category yet."
                        } else {
                            "No notes yet. Tap + to add your first one."
                        };
                        view! { <NotesList notes=filtered empty_message=empty /> }.into_any()
                    }
                    None => view! { <SkeletonList /> }.into_any(),
                }
            }}

            <FloatingActionButton href="/editor/add" label="Add note" />
        </MainLayout>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NoteType;

    fn note(slug: &str, category: Option<&str>) -> Note {
        Note {
            id: slug.to_string(),
            slug: slug.to_string(),
            native_text: "n".to_string(),
            learning_text: "l".to_string(),
            pronunciation: None,
            category: category.map(str::to_string),
            tags: vec![],
            note_type: NoteType::Word,
            difficulty: None,
            review_count: 0,
            ease: None,
            last_reviewed_at: None,
            next_review_at: None,
            created_at: String::new(),
            updated_at: String::new(),
            user_id: "u".to_string(),
            examples: vec![],
        }
    }

    #[test]
    fn no_filter_keeps_everything() {
        let notes = vec![note("a", Some("Food")), note("b", None)];
        assert_eq!(filter_by_category(&notes, None).len(), 2);
        assert_eq!(filter_by_category(&notes, Some("  ")).len(), 2);
    }

    #[test]
    fn filter_matches_exact_category() {
        let notes = vec![
            note("a", Some("Food")),
            note("b", Some("Travel")),
            note("c", Some("Food")),
        ];
        let slugs: Vec<_> = filter_by_category(&notes, Some("Food"))
            .into_iter()
            .map(|n| n.slug)
            .collect();
        assert_eq!(slugs, ["a", "c"]);
    }

    #[test]
    fn unknown_category_is_empty() {
        let notes = vec![note("a", Some("Food"))];
        assert!(filter_by_category(&notes, Some("Verbs")).is_empty());
    }
}
