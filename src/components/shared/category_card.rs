use crate::components::ui::{Card, CardContent};
use crate::models::CategoryCount;
use icons::ChevronRight;
use leptos::prelude::*;

fn count_label(count: usize) -> String {
    match count {
        1 => "1 note".to_string(),
        n => format!("{n} notes"),
    }
}

#[component]
pub fn CategoryCard(category: CategoryCount, on_select: Callback<String>) -> impl IntoView {
    let CategoryCount { label, count } = category;
    let selected = label.clone();

    view! {
        <button
            type="button"
            class="block w-full rounded-xl text-left focus-visible:outline-none focus-visible:ring-2 focus-visible:ring-ring/50"
            on:click=move |_| on_select.run(selected.clone())
        >
            <Card class="gap-0 py-4 transition-colors hover:bg-accent/40">
                <CardContent class="flex items-center gap-3 px-4">
                    <div class="min-w-0 flex-1">
                        <p class="truncate font-medium">{label}</p>
                        <p class="text-xs text-muted-foreground">{count_label(count)}</p>
                    </div>
                    <ChevronRight class="size-4 text-muted-foreground" />
                </CardContent>
            </Card>
        </button>
    }
}
