use super::QueryError;
use crate::components::layout::{AppBarConfig, MainLayout};
use crate::components::shared::{CategoryList, SkeletonList};
use crate::notes::categories::use_saved_categories;
use crate::notes::hooks::use_notes;
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

/// Home filtered down to one category.
pub(crate) fn category_href(category: &str) -> String {
    format!("/?category={}", urlencoding::encode(category))
}

#[component]
pub fn NotebookPage() -> impl IntoView {
    let notes = use_notes();
    let categories = use_saved_categories(notes.data.into());
    let navigate = StoredValue::new(use_navigate());

    let on_select = Callback::new(move |category: String| {
        navigate.with_value(|nav| nav(&category_href(&category), Default::default()));
    });

    view! {
        <MainLayout config=AppBarConfig::new("My Notebook").with_border()>
            <h2 class="mb-3 text-sm font-medium text-muted-foreground">"Saved categories"</h2>
            {move || {
                if let Some(e) = notes.error.get() {
                    return view! { <QueryError error=e /> }.into_any();
                }
                if notes.data.with(Option::is_none) {
                    return view! { <SkeletonList count=4 /> }.into_any();
                }
                if categories.with(Vec::is_empty) {
                    return view! {
                        <div class="rounded-xl border border-dashed px-4 py-10 text-center text-sm text-muted-foreground">
                            "Categorize your notes and they will show up here."
                        </div>
                    }
                    .into_any();
                }
                view! { <CategoryList categories=categories on_select=on_select /> }.into_any()
            }}
        </MainLayout>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_href_is_query_encoded() {
        assert_eq!(category_href("Food"), "/?category=Food");
        assert_eq!(category_href("Small talk"), "/?category=Small%20talk");
        assert_eq!(category_href("a&b"), "/?category=a%26b");
    }
}
