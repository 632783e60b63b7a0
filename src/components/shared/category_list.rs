use super::CategoryCard;
use crate::models::CategoryCount;
use leptos::prelude::*;

#[component]
pub fn CategoryList(
    #[prop(into)] categories: Signal<Vec<CategoryCount>>,
    on_select: Callback<String>,
) -> impl IntoView {
    view! {
        <ul class="flex flex-col gap-3">
            <For
                each=move || categories.get()
                key=|c| c.label.clone()
                children=move |category| {
                    view! { <li><CategoryCard category=category on_select=on_select /></li> }
                }
            />
        </ul>
    }
}
