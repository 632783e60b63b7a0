use super::AuthShell;
use crate::auth::{use_auth, AuthOutcome};
use crate::components::shared::FormError;
use crate::components::ui::{
    Alert, AlertDescription, Button, ButtonSize, Card, CardContent, CardDescription, CardHeader,
    CardTitle, Input, Label, Spinner,
};
use crate::schema::{validate_sign_in, FieldErrors};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn SignInPage() -> impl IntoView {
    let email: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());
    let field_errors: RwSignal<FieldErrors> = RwSignal::new(FieldErrors::default());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);

    let auth = use_auth();

    let field_error = move |field: &'static str| {
        Signal::derive(move || field_errors.with(|e| e.get(field).map(str::to_string)))
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if loading.get_untracked() {
            return;
        }

        let credentials = match validate_sign_in(&email.get_untracked(), &password.get_untracked()) {
            Ok(c) => c,
            Err(e) => {
                field_errors.set(e);
                return;
            }
        };

        field_errors.set(FieldErrors::default());
        error.set(None);
        loading.set(true);

        // On success the public route guard sends the user home.
        spawn_local(async move {
            if let AuthOutcome::Failure(message) =
                auth.sign_in(credentials.email, credentials.password).await
            {
                error.try_set(Some(message));
            }
            loading.try_set(false);
        });
    };

    view! {
        <AuthShell>
            <Card>
                <CardHeader>
                    <CardTitle class="text-lg">"Sign in"</CardTitle>
                    <CardDescription class="text-xs">"Use your email and password to continue."</CardDescription>
                </CardHeader>

                <CardContent>
                    <form class="flex flex-col gap-3" on:submit=on_submit novalidate=true>
                        <div class="flex flex-col gap-1.5">
                            <Label html_for="email" class="text-xs">"Email"</Label>
                            <Input
                                id="email"
                                r#type="email"
                                autocomplete="email"
                                placeholder="you@example.com"
                                bind_value=email
                                invalid=Signal::derive(move || field_errors.with(|e| e.get("email").is_some()))
                                class="h-8 text-sm"
                            />
                            <FormError message=field_error("email") />
                        </div>

                        <div class="flex flex-col gap-1.5">
                            <Label html_for="password" class="text-xs">"Password"</Label>
                            <Input
                                id="password"
                                r#type="password"
                                autocomplete="current-password"
                                placeholder="••••••••"
                                bind_value=password
                                invalid=Signal::derive(move || field_errors.with(|e| e.get("password").is_some()))
                                class="h-8 text-sm"
                            />
                            <FormError message=field_error("password") />
                        </div>

                        {move || {
                            error.get().map(|e| {
                                view! {
                                    <Alert class="border-destructive/30">
                                        <AlertDescription class="text-destructive text-xs">{e}</AlertDescription>
                                    </Alert>
                                }
                            })
                        }}

                        <Button class="w-full" size=ButtonSize::Sm attr:disabled=move || loading.get()>
                            <span class="inline-flex items-center gap-2">
                                <Show when=move || loading.get()>
                                    <Spinner />
                                </Show>
                                {move || if loading.get() { "Signing in..." } else { "Sign in" }}
                            </span>
                        </Button>

                        <div class="pt-1 text-xs text-muted-foreground">
                            "No account? "
                            <a class="text-primary underline underline-offset-4" href="/signup">"Sign up"</a>
                        </div>
                    </form>
                </CardContent>
            </Card>
        </AuthShell>
    }
}
