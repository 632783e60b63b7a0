use super::QueryError;
use crate::components::layout::{AppBarConfig, MainLayout};
use crate::components::shared::{GoBackButton, NoteExampleItem, SkeletonCard};
use crate::components::ui::{
    Badge, BadgeTone, Button, ButtonSize, ButtonVariant, Card, CardContent, ErrorBanner,
    Separator,
};
use crate::models::Note;
use crate::notes::hooks::{use_delete_note, use_note_by_slug};
use icons::{Pencil, Trash2};
use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_params};
use leptos_router::params::Params;

#[derive(Params, PartialEq, Clone, Debug)]
pub struct NoteSlugParams {
    pub slug: Option<String>,
}

/// Path params may still be percent-encoded.
pub(crate) fn decode_slug(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

/// Calendar date part of an ISO timestamp.
pub(crate) fn short_date(iso: &str) -> &str {
    iso.split_once('T').map_or(iso, |(day, _)| day)
}

pub(crate) fn edit_href(id: &str) -> String {
    format!("/editor/edit/{}", urlencoding::encode(id))
}

#[component]
fn NoteDetails(note: Note) -> impl IntoView {
    let Note {
        native_text,
        learning_text,
        pronunciation,
        category,
        tags,
        note_type,
        difficulty,
        review_count,
        created_at,
        examples,
        ..
    } = note;

    let created = short_date(&created_at).to_string();

    view! {
        <div class="flex flex-col gap-4">
            <Card>
                <CardContent class="flex flex-col gap-3">
                    <div class="flex flex-wrap items-center gap-1.5">
                        <Badge tone=BadgeTone::from(note_type)>{note_type.label()}</Badge>
                        {difficulty.map(|d| view! { <Badge tone=BadgeTone::from(d)>{d.label()}</Badge> })}
                        {category
                            .filter(|c| !c.trim().is_empty())
                            .map(|c| view! { <Badge tone=BadgeTone::Outline>{c}</Badge> })}
                    </div>
                    <p class="text-2xl font-semibold" dir="auto">{learning_text}</p>
                    {pronunciation
                        .filter(|p| !p.trim().is_empty())
                        .map(|p| view! { <p class="text-sm italic text-muted-foreground">{format!("/{p}/")}</p> })}
                    <Separator />
                    <p class="text-lg" dir="auto">{native_text}</p>
                </CardContent>
            </Card>

            {(!tags.is_empty()).then(|| view! {
                <section class="flex flex-col gap-2">
                    <h2 class="text-xs font-medium text-muted-foreground">"Tags"</h2>
                    <div class="flex flex-wrap gap-1.5">
                        {tags
                            .into_iter()
                            .map(|t| view! { <Badge tone=BadgeTone::Outline>{format!("#{t}")}</Badge> })
                            .collect_view()}
                    </div>
                </section>
            })}

            {(!examples.is_empty()).then(|| view! {
                <section class="flex flex-col gap-2">
                    <h2 class="text-xs font-medium text-muted-foreground">"Examples"</h2>
                    <ul class="flex flex-col gap-2">
                        {examples
                            .into_iter()
                            .map(|example| view! { <NoteExampleItem example=example /> })
                            .collect_view()}
                    </ul>
                </section>
            })}

            <div class="flex justify-between text-xs text-muted-foreground">
                <span>{format!("Reviewed {review_count} times")}</span>
                <span>{format!("Added {created}")}</span>
            </div>
        </div>
    }
}

#[component]
pub fn NoteDetailsPage() -> impl IntoView {
    let params = use_params::<NoteSlugParams>();
    let slug = Signal::derive(move || {
        params
            .get()
            .ok()
            .and_then(|p| p.slug)
            .map(|s| decode_slug(&s))
            .unwrap_or_default()
    });

    let note = use_note_by_slug(slug);
    let delete = use_delete_note();
    let navigate = StoredValue::new(use_navigate());

    let on_delete = move |_| {
        if delete.pending.get_untracked() {
            return;
        }
        let confirmed = web_sys::window()
            .and_then(|w| w.confirm_with_message("Delete this note?").ok())
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        delete.mutate(slug.get_untracked(), move |()| {
            navigate.with_value(|nav| nav("/", Default::default()));
        });
    };

    let actions = move || {
        let edit = move || note.data.with(|n| n.as_ref().map(|n| edit_href(&n.id)));
        view! {
            {move || edit().map(|href| view! {
                <a
                    href=href
                    aria-label="Edit note"
                    class="inline-flex size-9 items-center justify-center rounded-md hover:bg-accent"
                >
                    <Pencil class="size-4" />
                </a>
            })}
            <Button
                variant=ButtonVariant::Ghost
                size=ButtonSize::Icon
                attr:aria-label="Delete note"
                attr:disabled=move || delete.pending.get() || note.data.with(Option::is_none)
                on:click=on_delete
            >
                <Trash2 class="size-4 text-destructive" />
            </Button>
        }
    };

    let config = AppBarConfig::new("Note")
        .left(|| view! { <GoBackButton /> })
        .right(actions);

    view! {
        <MainLayout config=config>
            {move || delete.error.get().map(|e| view! { <ErrorBanner message=e.to_string() /> })}
            {move || {
                if let Some(e) = note.error.get() {
                    return view! { <QueryError error=e /> }.into_any();
                }
                match note.data.get() {
                    Some(n) => view! { <NoteDetails note=n /> }.into_any(),
                    None => view! { <SkeletonCard /> }.into_any(),
                }
            }}
        </MainLayout>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_encoded_slugs() {
        assert_eq!(decode_slug("%D8%B3%D9%84%D8%A7%D9%85-bonjour"), "سلام-bonjour");
        assert_eq!(decode_slug("plain-slug"), "plain-slug");
    }

    #[test]
    fn short_date_keeps_day() {
        assert_eq!(short_date("2024-05-01T10:00:00.000Z"), "2024-05-01");
        assert_eq!(short_date("2024-05-01"), "2024-05-01");
    }

    #[test]
    fn edit_link_uses_note_id() {
        assert_eq!(edit_href("abc-123"), "/editor/edit/abc-123");
    }
}
