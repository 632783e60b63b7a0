use super::QueryError;
use crate::components::layout::{AppBarConfig, MainLayout};
use crate::components::ui::{Card, CardContent, CardDescription, CardHeader, CardTitle, Skeleton};
use crate::notes::hooks::use_notes;
use icons::Brain;
use leptos::prelude::*;

// Scheduling is not implemented yet; the page only reports what is available.
#[component]
pub fn ReviewPage() -> impl IntoView {
    let notes = use_notes();
    let total = move || notes.data.with(|n| n.as_ref().map(Vec::len));

    view! {
        <MainLayout config=AppBarConfig::new("Review Session").with_border()>
            {move || notes.error.get().map(|e| view! { <QueryError error=e /> })}
            <Card>
                <CardHeader class="items-center text-center">
                    <Brain class="mx-auto size-8 text-primary" />
                    <CardTitle class="text-base">"Spaced review is coming soon"</CardTitle>
                    <CardDescription class="text-xs">
                        "Keep adding notes; they will be scheduled for review here."
                    </CardDescription>
                </CardHeader>
                <CardContent class="text-center">
                    {move || match total() {
                        Some(n) => view! {
                            <p class="text-sm">
                                <span class="text-2xl font-semibold">{n}</span>
                                <span class="ml-1 text-muted-foreground">
                                    {if n == 1 { "note in your collection" } else { "notes in your collection" }}
                                </span>
                            </p>
                        }
                        .into_any(),
                        None => view! { <Skeleton class="mx-auto h-8 w-32" /> }.into_any(),
                    }}
                </CardContent>
            </Card>
        </MainLayout>
    }
}
