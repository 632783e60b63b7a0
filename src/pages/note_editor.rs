use super::QueryError;
use crate::components::layout::{AppBarConfig, MainLayout};
use crate::components::shared::{GoBackButton, NoteForm, SkeletonCard};
use crate::components::ui::ErrorBanner;
use crate::models::{NewNote, Note};
use crate::notes::hooks::{use_add_note, use_note_by_id, use_update_note};
use crate::schema::NoteDraft;
use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_params};
use leptos_router::params::Params;

#[derive(Params, PartialEq, Clone, Debug)]
pub struct EditorParams {
    pub action: Option<String>,
    pub note_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum EditorMode {
    Add,
    Edit(String),
    Invalid,
}

impl EditorMode {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Add => "Add new note",
            Self::Edit(_) => "Edit note",
            Self::Invalid => "Editor",
        }
    }
}

/// `add` ignores any id; `edit` needs one.
pub(crate) fn editor_mode(action: Option<&str>, note_id: Option<&str>) -> EditorMode {
    let note_id = note_id.map(str::trim).filter(|id| !id.is_empty());
    match (action, note_id) {
        (Some("add"), _) => EditorMode::Add,
        (Some("edit"), Some(id)) => EditorMode::Edit(id.to_string()),
        _ => EditorMode::Invalid,
    }
}

/// The draft an edit form starts from. Taken from the first load of `id`
/// and kept while the user edits, so a background refetch cannot reset it.
pub(crate) fn edit_baseline(
    prev: Option<(String, NoteDraft)>,
    id: &str,
    loaded: Option<&Note>,
) -> Option<(String, NoteDraft)> {
    match prev {
        Some((prev_id, draft)) if prev_id == id => Some((prev_id, draft)),
        _ => loaded
            .filter(|note| note.id == id)
            .map(|note| (id.to_string(), NoteDraft::from(note))),
    }
}

#[component]
pub fn NoteEditorPage() -> impl IntoView {
    let params = use_params::<EditorParams>();
    let mode = Memo::new(move |_| {
        params.with(|p| match p {
            Ok(p) => editor_mode(p.action.as_deref(), p.note_id.as_deref()),
            Err(_) => EditorMode::Invalid,
        })
    });

    let edit_id = Signal::derive(move || match mode.get() {
        EditorMode::Edit(id) => Some(id),
        _ => None,
    });
    let existing = use_note_by_id(edit_id);
    let baseline = Memo::new(move |prev: Option<&Option<(String, NoteDraft)>>| {
        let id = edit_id.get()?;
        existing
            .data
            .with(|note| edit_baseline(prev.cloned().flatten(), &id, note.as_ref()))
    });

    let add = use_add_note();
    let update = use_update_note();
    let navigate = StoredValue::new(use_navigate());

    let pending = Signal::derive(move || add.pending.get() || update.pending.get());
    let mutation_error = move || add.error.get().or_else(|| update.error.get());

    let go_home = move |_| navigate.with_value(|nav| nav("/", Default::default()));

    let on_submit = Callback::new(move |input: NewNote| match mode.get_untracked() {
        EditorMode::Add => add.mutate(input, go_home),
        EditorMode::Edit(id) => update.mutate((id, input), go_home),
        EditorMode::Invalid => {}
    });

    let config = AppBarConfig::new(mode.get_untracked().title())
        .left(|| view! { <GoBackButton /> })
        .with_border();

    view! {
        <MainLayout config=config>
            {move || mutation_error().map(|e| view! { <ErrorBanner message=e.to_string() /> })}
            {move || match mode.get() {
                EditorMode::Add => view! {
                    <NoteForm
                        initial=NoteDraft::default()
                        submit_label="Save Note"
                        pending=pending
                        on_submit=on_submit
                    />
                }
                .into_any(),
                EditorMode::Edit(_) => {
                    match baseline.get() {
                        Some((_, draft)) => view! {
                            <NoteForm
                                initial=draft
                                submit_label="Edit Note"
                                pending=pending
                                on_submit=on_submit
                            />
                        }
                        .into_any(),
                        None => match existing.error.get() {
                            Some(e) => view! { <QueryError error=e /> }.into_any(),
                            None => view! { <SkeletonCard /> }.into_any(),
                        },
                    }
                }
                EditorMode::Invalid => view! {
                    <div class="px-4 py-10 text-center text-sm text-muted-foreground">
                        "Unknown editor action."
                    </div>
                }
                .into_any(),
            }}
        </MainLayout>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_ignores_note_id() {
        assert_eq!(editor_mode(Some("add"), None), EditorMode::Add);
        assert_eq!(editor_mode(Some("add"), Some("x")), EditorMode::Add);
    }

    #[test]
    fn edit_requires_an_id() {
        assert_eq!(
            editor_mode(Some("edit"), Some("n-1")),
            EditorMode::Edit("n-1".to_string())
        );
        assert_eq!(editor_mode(Some("edit"), None), EditorMode::Invalid);
        assert_eq!(editor_mode(Some("edit"), Some("  ")), EditorMode::Invalid);
    }

    #[test]
    fn unknown_action_is_invalid() {
        assert_eq!(editor_mode(Some("copy"), Some("n-1")), EditorMode::Invalid);
        assert_eq!(editor_mode(None, None), EditorMode::Invalid);
    }

    fn note(id: &str, native: &str) -> Note {
        serde_json::from_value(serde_json::json!({
            "id": id, "slug": "s", "nativeText": native, "learningText": "x",
            "noteType": "word", "tags": [], "createdAt": "", "updatedAt": "", "user_id": "u"
        }))
        .expect("row should parse")
    }

    #[test]
    fn refetched_note_does_not_replace_the_draft() {
        let first = edit_baseline(None, "n-1", Some(&note("n-1", "Merci")));
        assert_eq!(first.as_ref().map(|(_, d)| d.native_text.as_str()), Some("Merci"));

        let after_refetch = edit_baseline(first.clone(), "n-1", Some(&note("n-1", "Shukran")));
        assert_eq!(after_refetch, first);
    }

    #[test]
    fn switching_notes_takes_the_new_draft() {
        assert_eq!(edit_baseline(None, "n-1", None), None);
        let first = edit_baseline(None, "n-1", Some(&note("n-1", "Merci")));
        assert_eq!(edit_baseline(first.clone(), "n-2", Some(&note("n-1", "Merci"))), None);
        let second = edit_baseline(first, "n-2", Some(&note("n-2", "Salam")));
        assert_eq!(second.map(|(id, d)| (id, d.native_text)), Some(("n-2".into(), "Salam".into())));
    }

    #[test]
    fn titles_follow_mode() {
        assert_eq!(EditorMode::Add.title(), "Add new note");
        assert_eq!(EditorMode::Edit("1".into()).title(), "Edit note");
    }
}
