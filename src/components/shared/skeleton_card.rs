use crate::components::ui::{Card, CardContent, Skeleton};
use leptos::prelude::*;

#[component]
pub fn SkeletonCard() -> impl IntoView {
    view! {
        <Card class="gap-3 py-4" attr:aria-hidden="true">
            <CardContent class="flex flex-col gap-2 px-4">
                <Skeleton class="h-4 w-2/3" />
                <Skeleton class="h-3 w-1/2" />
                <div class="flex gap-2 pt-1">
                    <Skeleton class="h-4 w-14 rounded-full" />
                    <Skeleton class="h-4 w-10 rounded-full" />
                </div>
            </CardContent>
        </Card>
    }
}

#[component]
pub fn SkeletonList(#[prop(default = 3)] count: usize) -> impl IntoView {
    view! {
        <div class="flex flex-col gap-3" aria-busy="true">
            {(0..count).map(|_| view! { <SkeletonCard /> }).collect_view()}
        </div>
    }
}
