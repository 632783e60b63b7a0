use crate::auth::AuthProvider;
use crate::components::route_guard::{PrivateRoute, PublicRoute};
use crate::config::EnvConfig;
use crate::pages::{
    HomePage, NotFoundPage, NoteDetailsPage, NoteEditorPage, NotebookPage, ProfilePage,
    ReviewPage, SignInPage, SignUpPage,
};
use crate::state::{AppContext, AppState};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

/// Shares the already loaded config and a fresh query cache with the tree.
pub(crate) fn provide_app_state(config: EnvConfig) -> AppContext {
    let ctx = AppContext(AppState::new(config));
    provide_context(ctx.clone());
    ctx
}

#[component]
pub fn App(config: EnvConfig) -> impl IntoView {
    provide_app_state(config);

    // Router hooks need the <Router> context; auth hooks need <AuthProvider>.
    view! {
        <AuthProvider>
            <Router>
                <Routes fallback=NotFoundPage>
                    <Route path=path!("signin") view=move || view! {
                        <PublicRoute>
                            <SignInPage />
                        </PublicRoute>
                    } />
                    <Route path=path!("signup") view=move || view! {
                        <PublicRoute>
                            <SignUpPage />
                        </PublicRoute>
                    } />
                    <Route path=path!("") view=move || view! {
                        <PrivateRoute>
                            <HomePage />
                        </PrivateRoute>
                    } />
                    <Route path=path!("notebook") view=move || view! {
                        <PrivateRoute>
                            <NotebookPage />
                        </PrivateRoute>
                    } />
                    <Route path=path!("notes/:slug") view=move || view! {
                        <PrivateRoute>
                            <NoteDetailsPage />
                        </PrivateRoute>
                    } />
                    <Route path=path!("review") view=move || view! {
                        <PrivateRoute>
                            <ReviewPage />
                        </PrivateRoute>
                    } />
                    <Route path=path!("editor/:action") view=move || view! {
                        <PrivateRoute>
                            <NoteEditorPage />
                        </PrivateRoute>
                    } />
                    <Route path=path!("editor/:action/:note_id") view=move || view! {
                        <PrivateRoute>
                            <NoteEditorPage />
                        </PrivateRoute>
                    } />
                    <Route path=path!("profile") view=move || view! {
                        <PrivateRoute>
                            <ProfilePage />
                        </PrivateRoute>
                    } />
                </Routes>
            </Router>
        </AuthProvider>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provided_state_uses_the_given_config() {
        let config = EnvConfig {
            supabase_url: "https://lingua.test".to_string(),
            anon_key: "anon".to_string(),
            log_level: "debug".to_string(),
        };
        let owner = Owner::new();
        owner.with(|| {
            provide_app_state(config.clone());
            let ctx = use_context::<AppContext>().expect("app state should be provided");
            assert_eq!(ctx.0.config, config);
        });
    }
}
