use crate::components::ui::{Badge, BadgeTone, Card, CardContent};
use crate::models::{Note, NoteType};
use icons::{GraduationCap, MessageSquare, Quote, Type};
use leptos::prelude::*;

#[component]
fn NoteTypeIcon(note_type: NoteType) -> impl IntoView {
    let class = "size-4 text-muted-foreground";
    match note_type {
        NoteType::Word => view! { <Type class=class /> }.into_any(),
        NoteType::Phrase => view! { <MessageSquare class=class /> }.into_any(),
        NoteType::Sentence => view! { <Quote class=class /> }.into_any(),
        NoteType::Grammar => view! { <GraduationCap class=class /> }.into_any(),
    }
}

pub(crate) fn note_href(slug: &str) -> String {
    format!("/notes/{}", urlencoding::encode(slug))
}

#[component]
pub fn NoteCard(note: Note) -> impl IntoView {
    let href = note_href(&note.slug);
    let Note {
        native_text,
        learning_text,
        note_type,
        difficulty,
        tags,
        ..
    } = note;

    view! {
        <a href=href class="block rounded-xl focus-visible:outline-none focus-visible:ring-2 focus-visible:ring-ring/50">
            <Card class="gap-2 py-4 transition-colors hover:bg-accent/40">
                <CardContent class="flex flex-col gap-2 px-4">
                    <div class="flex items-start gap-2">
                        <NoteTypeIcon note_type=note_type />
                        <div class="min-w-0 flex-1">
                            <p class="truncate text-base font-semibold" dir="auto">{learning_text}</p>
                            <p class="truncate text-sm text-muted-foreground" dir="auto">{native_text}</p>
                        </div>
                        <Badge tone=BadgeTone::from(note_type)>{note_type.label()}</Badge>
                    </div>

                    <div class="flex flex-wrap items-center gap-1.5">
                        {difficulty.map(|d| view! { <Badge tone=BadgeTone::from(d)>{d.label()}</Badge> })}
                        {tags
                            .into_iter()
                            .map(|t| view! { <Badge tone=BadgeTone::Outline>{format!("#{t}")}</Badge> })
                            .collect_view()}
                    </div>
                </CardContent>
            </Card>
        </a>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_links_encode_slug() {
        assert_eq!(note_href("salam-bonjour"), "/notes/salam-bonjour");
        assert_eq!(note_href("سلام"), "/notes/%D8%B3%D9%84%D8%A7%D9%85");
    }
}
