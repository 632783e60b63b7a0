use crate::models::{CategoryCount, Note};
use leptos::prelude::*;
use std::collections::HashMap;

/// Count notes per non-blank category, in order of first appearance.
pub(crate) fn saved_categories(notes: Option<&[Note]>) -> Vec<CategoryCount> {
    let Some(notes) = notes else {
        return vec![];
    };

    let mut out: Vec<CategoryCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for category in notes.iter().filter_map(|n| n.category.as_deref()) {
        if category.trim().is_empty() {
            continue;
        }
        match index.get(category) {
            Some(&i) => out[i].count += 1,
            None => {
                index.insert(category, out.len());
                out.push(CategoryCount {
                    label: category.to_string(),
                    count: 1,
                });
            }
        }
    }

    out
}

/// Memoized category counts over a notes signal (`None` while loading).
pub(crate) fn use_saved_categories(notes: Signal<Option<Vec<Note>>>) -> Memo<Vec<CategoryCount>> {
    Memo::new(move |_| notes.with(|n| saved_categories(n.as_deref())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NoteType;

    fn note(category: Option<&str>) -> Note {
        Note {
            id: String::new(),
            slug: String::new(),
            native_text: "a".to_string(),
            learning_text: "b".to_string(),
            pronunciation: None,
            category: category.map(|c| c.to_string()),
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

    fn count(label: &str, count: usize) -> CategoryCount {
        CategoryCount {
            label: label.to_string(),
            count,
        }
    }

    #[test]
    fn groups_and_skips_empty_categories() {
        let notes = vec![
            note(Some("Food")),
            note(Some("Food")),
            note(Some("")),
            note(Some("Travel")),
        ];
        assert_eq!(
            saved_categories(Some(&notes)),
            vec![count("Food", 2), count("Travel", 1)]
        );
    }

    #[test]
    fn loading_collection_is_empty() {
        assert!(saved_categories(None).is_empty());
        assert!(saved_categories(Some(&[])).is_empty());
    }

    #[test]
    fn missing_and_blank_categories_are_skipped() {
        let notes = vec![note(None), note(Some("  ")), note(Some("Verbs"))];
        assert_eq!(saved_categories(Some(&notes)), vec![count("Verbs", 1)]);
    }

    #[test]
    fn order_follows_first_appearance() {
        let notes = vec![
            note(Some("Travel")),
            note(Some("Food")),
            note(Some("Travel")),
        ];
        assert_eq!(
            saved_categories(Some(&notes)),
            vec![count("Travel", 2), count("Food", 1)]
        );
    }
}
