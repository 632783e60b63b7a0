use crate::auth::{use_auth, SessionState};
use crate::components::ui::Spinner;
use leptos::prelude::*;
use leptos_router::components::Redirect;

pub(crate) const SIGN_IN_PATH: &str = "/signin";
pub(crate) const HOME_PATH: &str = "/";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum GuardOutcome {
    Loading,
    Redirect(&'static str),
    Render,
}

/// Protected routes: wait for the session, then require one.
pub(crate) fn guard_outcome(state: &SessionState) -> GuardOutcome {
    match state {
        SessionState::Loading => GuardOutcome::Loading,
        SessionState::SignedOut => GuardOutcome::Redirect(SIGN_IN_PATH),
        SessionState::SignedIn(_) => GuardOutcome::Render,
    }
}

/// Sign-in / sign-up: render right away, send signed-in users home.
pub(crate) fn public_outcome(state: &SessionState) -> GuardOutcome {
    match state {
        SessionState::SignedIn(_) => GuardOutcome::Redirect(HOME_PATH),
        SessionState::Loading | SessionState::SignedOut => GuardOutcome::Render,
    }
}

#[component]
fn GuardLoading() -> impl IntoView {
    view! {
        <div class="flex min-h-screen items-center justify-center text-muted-foreground">
            <Spinner class="size-6" />
        </div>
    }
}

fn guarded(outcome: Memo<GuardOutcome>, children: ChildrenFn) -> impl IntoView {
    // Store children so the view closure stays `Fn`.
    let children = StoredValue::new(children);

    move || match outcome.get() {
        GuardOutcome::Loading => view! { <GuardLoading /> }.into_any(),
        GuardOutcome::Redirect(path) => view! { <Redirect path=path /> }.into_any(),
        GuardOutcome::Render => children.with_value(|c| c()).into_any(),
    }
}

#[component]
pub fn PrivateRoute(children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();
    let outcome = Memo::new(move |_| auth.with_state(guard_outcome));
    guarded(outcome, children)
}

#[component]
pub fn PublicRoute(children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();
    let outcome = Memo::new(move |_| auth.with_state(public_outcome));
    guarded(outcome, children)
}
