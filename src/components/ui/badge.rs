use crate::models::{Difficulty, NoteType};
use leptos::prelude::*;
use tw_merge::*;

#[component]
pub fn Badge(
    #[prop(into, optional)] tone: Signal<BadgeTone>,
    #[prop(into, optional)] class: String,
    children: Children,
) -> impl IntoView {
    let merged_class = move || {
        let badge = BadgeClass { tone: tone.get() };
        badge.with_class(class.clone())
    };

    view! {
        <span data-name="Badge" class=merged_class>
            {children()}
        </span>
    }
}

#[derive(TwClass, Default)]
#[tw(class = "inline-flex items-center rounded-full border px-2 py-0.5 text-[11px] font-medium whitespace-nowrap")]
pub struct BadgeClass {
    tone: BadgeTone,
}

#[derive(TwVariant)]
pub enum BadgeTone {
    #[tw(default, class = "border-transparent bg-secondary text-secondary-foreground")]
    Neutral,
    #[tw(class = "text-muted-foreground")]
    Outline,
    #[tw(class = "border-transparent bg-emerald-100 text-emerald-800")]
    Green,
    #[tw(class = "border-transparent bg-amber-100 text-amber-800")]
    Amber,
    #[tw(class = "border-transparent bg-rose-100 text-rose-800")]
    Red,
    #[tw(class = "border-transparent bg-sky-100 text-sky-800")]
    Blue,
}

impl From<Difficulty> for BadgeTone {
    fn from(d: Difficulty) -> Self {
        match d {
            Difficulty::Beginner => Self::Green,
            Difficulty::Intermediate => Self::Amber,
            Difficulty::Advanced => Self::Red,
        }
    }
}

impl From<NoteType> for BadgeTone {
    fn from(t: NoteType) -> Self {
        match t {
            NoteType::Grammar => Self::Blue,
            _ => Self::Neutral,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_colours_by_level() {
        assert!(matches!(BadgeTone::from(Difficulty::Beginner), BadgeTone::Green));
        assert!(matches!(BadgeTone::from(Difficulty::Intermediate), BadgeTone::Amber));
        assert!(matches!(BadgeTone::from(Difficulty::Advanced), BadgeTone::Red));
        assert!(matches!(BadgeTone::from(NoteType::Grammar), BadgeTone::Blue));
    }
}
