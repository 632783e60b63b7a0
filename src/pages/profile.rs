use super::QueryError;
use crate::auth::use_auth;
use crate::components::layout::{AppBarConfig, MainLayout};
use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, Card, CardContent, CardHeader, CardTitle, Separator,
    SeparatorOrientation, Spinner,
};
use crate::notes::categories::use_saved_categories;
use crate::notes::hooks::use_notes;
use icons::LogOut;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
fn Stat(label: &'static str, #[prop(into)] value: Signal<Option<usize>>) -> impl IntoView {
    view! {
        <div class="flex flex-1 flex-col items-center gap-1">
            <span class="text-xl font-semibold">
                {move || value.get().map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())}
            </span>
            <span class="text-xs text-muted-foreground">{label}</span>
        </div>
    }
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth = use_auth();
    let notes = use_notes();
    let categories = use_saved_categories(notes.data.into());
    let signing_out = RwSignal::new(false);

    let email = move || {
        auth.session()
            .and_then(|s| s.user.email)
            .unwrap_or_else(|| "Signed in".to_string())
    };
    let note_count = Signal::derive(move || notes.data.with(|n| n.as_ref().map(Vec::len)));
    let reviewed = Signal::derive(move || {
        notes
            .data
            .with(|n| n.as_ref().map(|n| n.iter().filter(|n| n.review_count > 0).count()))
    });
    let category_count = Signal::derive(move || {
        notes
            .data
            .with(Option::is_some)
            .then(|| categories.with(Vec::len))
    });

    let on_sign_out = move |_| {
        if signing_out.get_untracked() {
            return;
        }
        signing_out.set(true);
        // Clearing the session unmounts this page via the route guard.
        spawn_local(auth.sign_out());
    };

    view! {
        <MainLayout config=AppBarConfig::new("Profile").with_border()>
            <div class="flex flex-col gap-4">
                <Card>
                    <CardHeader>
                        <CardTitle class="truncate text-base">{email}</CardTitle>
                    </CardHeader>
                    <CardContent>
                        <div class="flex items-center">
                            <Stat label="Notes" value=note_count />
                            <Separator orientation=SeparatorOrientation::Vertical class="h-8" />
                            <Stat label="Categories" value=category_count />
                            <Separator orientation=SeparatorOrientation::Vertical class="h-8" />
                            <Stat label="Reviewed" value=reviewed />
                        </div>
                    </CardContent>
                </Card>

                {move || notes.error.get().map(|e| view! { <QueryError error=e /> })}

                <Button
                    variant=ButtonVariant::Outline
                    size=ButtonSize::Sm
                    class="w-full"
                    attr:disabled=move || signing_out.get()
                    on:click=on_sign_out
                >
                    <Show when=move || signing_out.get() fallback=|| view! { <LogOut class="size-4" /> }>
                        <Spinner />
                    </Show>
                    "Sign out"
                </Button>
            </div>
        </MainLayout>
    }
}
