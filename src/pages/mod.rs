mod home;
mod note_details;
mod note_editor;
mod notebook;
mod profile;
mod review;
mod signin;
mod signup;

pub use home::HomePage;
pub use note_details::NoteDetailsPage;
pub use note_editor::NoteEditorPage;
pub use notebook::NotebookPage;
pub use profile::ProfilePage;
pub use review::ReviewPage;
pub use signin::SignInPage;
pub use signup::SignUpPage;

use crate::api::{ApiError, ApiErrorKind};
use crate::components::ui::ErrorBanner;
use leptos::prelude::*;

/// `NotFound` is a page-level message; everything else is a banner.
#[component]
fn QueryError(error: ApiError) -> impl IntoView {
    match error.kind() {
        ApiErrorKind::NotFound => view! {
            <div class="px-4 py-10 text-center">
                <p class="text-sm font-medium">{error.to_string()}</p>
                <a class="mt-2 inline-block text-xs text-primary underline underline-offset-4" href="/">
                    "Back to your notes"
                </a>
            </div>
        }
        .into_any(),
        _ => view! { <ErrorBanner message=error.to_string() /> }.into_any(),
    }
}

/// Centered card shell for the sign-in and sign-up pages.
#[component]
fn AuthShell(children: Children) -> impl IntoView {
    view! {
        <div class="min-h-screen bg-background">
            <div class="mx-auto flex min-h-screen w-full max-w-sm flex-col justify-center px-4 py-10">
                <div class="mb-6 flex items-center justify-center">
                    <a href="/" class="text-sm font-medium text-foreground">"Lingua Note"</a>
                </div>
                {children()}
            </div>
        </div>
    }
}

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! { <div class="px-4 py-8 text-xs text-muted-foreground">"Not found"</div> }
}
