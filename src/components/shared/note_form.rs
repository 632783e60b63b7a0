use super::{FormError, VoiceRecorder};
use crate::components::ui::{Badge, BadgeTone, Button, Input, Label, NativeSelect, Spinner};
use crate::models::{Difficulty, NewNote, NoteType};
use crate::schema::{normalize_tags, validate_note, FieldErrors, NoteDraft, CATEGORY_PRESETS};
use icons::X;
use leptos::prelude::*;
use strum::IntoEnumIterator;

pub(crate) const CUSTOM_CATEGORY: &str = "custom";

/// Select value and free-text value for a stored category.
pub(crate) fn split_category(category: &str) -> (String, String) {
    if CATEGORY_PRESETS.contains(&category) {
        (category.to_string(), String::new())
    } else {
        (CUSTOM_CATEGORY.to_string(), category.to_string())
    }
}

pub(crate) fn join_category(choice: &str, custom: &str) -> String {
    if choice == CUSTOM_CATEGORY {
        custom.to_string()
    } else {
        choice.to_string()
    }
}

/// Add a trimmed tag unless it is blank or already present.
pub(crate) fn push_tag(tags: &mut Vec<String>, raw: &str) -> bool {
    let tag = raw.trim();
    if tag.is_empty() || tags.iter().any(|t| t == tag) {
        return false;
    }
    tags.push(tag.to_string());
    true
}

/// Tags to save, including text still sitting in the tag input.
pub(crate) fn tags_with_pending(tags: &[String], pending: &str) -> Vec<String> {
    let mut out = tags.to_vec();
    push_tag(&mut out, pending);
    out
}

fn category_options() -> Vec<(String, String)> {
    CATEGORY_PRESETS
        .iter()
        .map(|c| (c.to_string(), c.to_string()))
        .chain([(CUSTOM_CATEGORY.to_string(), "Custom".to_string())])
        .collect()
}

fn note_type_options() -> Vec<(String, String)> {
    NoteType::iter()
        .map(|t| (t.to_string(), t.label().to_string()))
        .collect()
}

fn difficulty_options() -> Vec<(String, String)> {
    [(String::new(), "Not set".to_string())]
        .into_iter()
        .chain(Difficulty::iter().map(|d| (d.to_string(), d.label().to_string())))
        .collect()
}

#[component]
pub fn NoteForm(
    initial: NoteDraft,
    submit_label: &'static str,
    #[prop(into)] pending: Signal<bool>,
    on_submit: Callback<NewNote>,
) -> impl IntoView {
    let (category_choice, category_custom) = split_category(&initial.category);

    let learning_text = RwSignal::new(initial.learning_text);
    let native_text = RwSignal::new(initial.native_text);
    let pronunciation = RwSignal::new(initial.pronunciation);
    let note_type = RwSignal::new(initial.note_type);
    let difficulty = RwSignal::new(initial.difficulty);
    let category_choice = RwSignal::new(category_choice);
    let category_custom = RwSignal::new(category_custom);
    let tags = RwSignal::new(normalize_tags(&initial.tags));
    let tag_input = RwSignal::new(String::new());

    let errors: RwSignal<FieldErrors> = RwSignal::new(FieldErrors::default());
    let error_for = move |field: &'static str| {
        Signal::derive(move || errors.with(|e| e.get(field).map(str::to_string)))
    };
    let invalid = move |field: &'static str| {
        Signal::derive(move || errors.with(|e| e.get(field).is_some()))
    };

    let on_tag_key = Callback::new(move |ev: web_sys::KeyboardEvent| {
        if ev.key() != "Enter" {
            return;
        }
        ev.prevent_default();
        let raw = tag_input.get_untracked();
        if tags.try_update(|t| push_tag(t, &raw)).unwrap_or(false) {
            tag_input.set(String::new());
        }
    });

    let on_form_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if pending.get_untracked() {
            return;
        }

        let all_tags = tags_with_pending(&tags.get_untracked(), &tag_input.get_untracked());
        if all_tags.len() != tags.with_untracked(Vec::len) {
            tags.set(all_tags.clone());
        }
        tag_input.set(String::new());

        let draft = NoteDraft {
            native_text: native_text.get_untracked(),
            learning_text: learning_text.get_untracked(),
            pronunciation: pronunciation.get_untracked(),
            note_type: note_type.get_untracked(),
            category: join_category(&category_choice.get_untracked(), &category_custom.get_untracked()),
            difficulty: difficulty.get_untracked(),
            tags: all_tags,
        };

        match validate_note(&draft) {
            Ok(note) => {
                errors.set(FieldErrors::default());
                on_submit.run(note);
            }
            Err(e) => errors.set(e),
        }
    };

    view! {
        <form class="flex flex-col gap-4" on:submit=on_form_submit novalidate=true>
            <div class="flex flex-col gap-1.5">
                <Label html_for="learning_text" class="text-xs">"Learning text"</Label>
                <Input
                    id="learning_text"
                    placeholder="سلام"
                    bind_value=learning_text
                    invalid=invalid("learning_text")
                    disabled=pending
                />
                <FormError message=error_for("learning_text") />
            </div>

            <div class="flex flex-col gap-1.5">
                <Label html_for="native_text" class="text-xs">"Native text"</Label>
                <Input
                    id="native_text"
                    placeholder="Hello"
                    bind_value=native_text
                    invalid=invalid("native_text")
                    disabled=pending
                />
                <FormError message=error_for("native_text") />
            </div>

            <div class="flex flex-col gap-1.5">
                <Label html_for="pronunciation" class="text-xs">"Pronunciation"</Label>
                <Input id="pronunciation" placeholder="salam" bind_value=pronunciation disabled=pending />
                <VoiceRecorder />
            </div>

            <div class="grid grid-cols-2 gap-3">
                <div class="flex flex-col gap-1.5">
                    <Label html_for="note_type" class="text-xs">"Type"</Label>
                    <NativeSelect
                        id="note_type"
                        options=note_type_options()
                        bind_value=note_type
                        invalid=invalid("note_type")
                        disabled=pending
                    />
                    <FormError message=error_for("note_type") />
                </div>

                <div class="flex flex-col gap-1.5">
                    <Label html_for="difficulty" class="text-xs">"Difficulty"</Label>
                    <NativeSelect
                        id="difficulty"
                        options=difficulty_options()
                        bind_value=difficulty
                        invalid=invalid("difficulty")
                        disabled=pending
                    />
                    <FormError message=error_for("difficulty") />
                </div>
            </div>

            <div class="flex flex-col gap-1.5">
                <Label html_for="category" class="text-xs">"Category"</Label>
                <NativeSelect id="category" options=category_options() bind_value=category_choice disabled=pending />
                <Show when=move || category_choice.get() == CUSTOM_CATEGORY>
                    <Input
                        id="category_custom"
                        placeholder="Your category"
                        bind_value=category_custom
                        disabled=pending
                    />
                </Show>
            </div>

            <div class="flex flex-col gap-1.5">
                <Label html_for="tag_input" class="text-xs">"Tags"</Label>
                <Input
                    id="tag_input"
                    placeholder="Type a tag and press Enter"
                    bind_value=tag_input
                    on_keydown=on_tag_key
                    disabled=pending
                />
                <div class="flex flex-wrap gap-1.5">
                    <For
                        each=move || tags.get()
                        key=|t| t.clone()
                        children=move |tag| {
                            let removed = tag.clone();
                            view! {
                                <Badge tone=BadgeTone::Neutral class="gap-1 pr-1">
                                    {tag}
                                    <button
                                        type="button"
                                        class="rounded-full p-0.5 hover:bg-background/60"
                                        aria-label="Remove tag"
                                        on:click=move |_| tags.update(|t| t.retain(|x| *x != removed))
                                    >
                                        <X class="size-3" />
                                    </button>
                                </Badge>
                            }
                        }
                    />
                </div>
            </div>

            <Button class="w-full" attr:disabled=move || pending.get()>
                <span class="inline-flex items-center gap-2">
                    <Show when=move || pending.get()>
                        <Spinner />
                    </Show>
                    {submit_label}
                </span>
            </Button>
        </form>
    }
}
