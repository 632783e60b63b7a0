use super::AuthShell;
use crate::auth::{use_auth, AuthOutcome};
use crate::components::shared::FormError;
use crate::components::ui::{
    Alert, AlertDescription, Button, ButtonSize, Card, CardContent, CardDescription, CardHeader,
    CardTitle, Input, Label, Spinner,
};
use crate::schema::{validate_sign_up, FieldErrors};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn SignUpPage() -> impl IntoView {
    let email: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());
    let confirm_password: RwSignal<String> = RwSignal::new(String::new());
    let field_errors: RwSignal<FieldErrors> = RwSignal::new(FieldErrors::default());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);
    // Set when the account exists but the email still has to be confirmed.
    let awaiting_confirmation: RwSignal<Option<String>> = RwSignal::new(None);

    let auth = use_auth();

    let field_error = move |field: &'static str| {
        Signal::derive(move || field_errors.with(|e| e.get(field).map(str::to_string)))
    };
    let invalid = move |field: &'static str| {
        Signal::derive(move || field_errors.with(|e| e.get(field).is_some()))
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if loading.get_untracked() {
            return;
        }

        let credentials = match validate_sign_up(
            &email.get_untracked(),
            &password.get_untracked(),
            &confirm_password.get_untracked(),
        ) {
            Ok(c) => c,
            Err(e) => {
                field_errors.set(e);
                return;
            }
        };

        field_errors.set(FieldErrors::default());
        error.set(None);
        loading.set(true);

        spawn_local(async move {
            let email = credentials.email.clone();
            match auth.sign_up(credentials.email, credentials.password).await {
                // With a session the public route guard takes over.
                AuthOutcome::Success(_) if auth.session_untracked().is_some() => {}
                AuthOutcome::Success(user) => {
                    awaiting_confirmation.try_set(Some(user.email.unwrap_or(email)));
                }
                AuthOutcome::Failure(message) => {
                    error.try_set(Some(message));
                }
            }
            loading.try_set(false);
        });
    };

    view! {
        <AuthShell>
            <Card>
                <CardHeader>
                    <CardTitle class="text-lg">"Create account"</CardTitle>
                    <CardDescription class="text-xs">"Start collecting words and phrases."</CardDescription>
                </CardHeader>
                <CardContent>
                    <Show
                        when=move || awaiting_confirmation.get().is_none()
                        fallback=move || view! {
                            <Alert>
                                <AlertDescription class="text-xs">
                                    "We sent a confirmation link to "
                                    <span class="font-medium">{move || awaiting_confirmation.get().unwrap_or_default()}</span>
                                    ". Confirm your email, then "
                                    <a class="text-primary underline underline-offset-4" href="/signin">"sign in"</a>
                                    "."
                                </AlertDescription>
                            </Alert>
                        }
                    >
                        <form class="flex flex-col gap-3" on:submit=on_submit novalidate=true>
                            <div class="flex flex-col gap-1.5">
                                <Label html_for="email" class="text-xs">"Email"</Label>
                                <Input
                                    id="email"
                                    r#type="email"
                                    autocomplete="email"
                                    placeholder="you@example.com"
                                    bind_value=email
                                    invalid=invalid("email")
                                    class="h-8 text-sm"
                                />
                                <FormError message=field_error("email") />
                            </div>

                            <div class="flex flex-col gap-1.5">
                                <Label html_for="password" class="text-xs">"Password"</Label>
                                <Input
                                    id="password"
                                    r#type="password"
                                    autocomplete="new-password"
                                    placeholder="••••••••"
                                    bind_value=password
                                    invalid=invalid("password")
                                    class="h-8 text-sm"
                                />
                                <FormError message=field_error("password") />
                            </div>

                            <div class="flex flex-col gap-1.5">
                                <Label html_for="confirm_password" class="text-xs">"Confirm password"</Label>
                                <Input
                                    id="confirm_password"
                                    r#type="password"
                                    autocomplete="new-password"
                                    placeholder="••••••••"
                                    bind_value=confirm_password
                                    invalid=invalid("confirm_password")
                                    class="h-8 text-sm"
                                />
                                <FormError message=field_error("confirm_password") />
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
                                    {move || if loading.get() { "Creating..." } else { "Create account" }}
                                </span>
                            </Button>

                            <div class="pt-1 text-xs text-muted-foreground">
                                "Already have an account? "
                                <a class="text-primary underline underline-offset-4" href="/signin">"Sign in"</a>
                            </div>
                        </form>
                    </Show>
                </CardContent>
            </Card>
        </AuthShell>
    }
}
