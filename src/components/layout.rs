use icons::{BookOpen, Brain, House, User};
use leptos::prelude::*;
use leptos_router::hooks::use_location;
use tw_merge::tw_merge;

/// What a page puts in the top bar. Built per page and handed to
/// [`MainLayout`]; nothing about it is shared between pages.
#[derive(Clone, Default)]
pub(crate) struct AppBarConfig {
    pub title: String,
    pub left: Option<ViewFn>,
    pub right: Option<ViewFn>,
    pub border_bottom: bool,
}

impl AppBarConfig {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn left(mut self, view: impl Into<ViewFn>) -> Self {
        self.left = Some(view.into());
        self
    }

    pub fn right(mut self, view: impl Into<ViewFn>) -> Self {
        self.right = Some(view.into());
        self
    }

    pub fn with_border(mut self) -> Self {
        self.border_bottom = true;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum NavIcon {
    Home,
    Notebook,
    Review,
    Profile,
}

const NAV_ITEMS: [(&str, &str, NavIcon); 4] = [
    ("Home", "/", NavIcon::Home),
    ("Notebook", "/notebook", NavIcon::Notebook),
    ("Review", "/review", NavIcon::Review),
    ("Profile", "/profile", NavIcon::Profile),
];

/// `/` only matches itself; other items also match nested paths.
pub(crate) fn is_nav_active(href: &str, path: &str) -> bool {
    if href == "/" {
        return path == "/";
    }
    path == href
        || path
            .strip_prefix(href)
            .is_some_and(|rest| rest.starts_with('/'))
}

#[component]
fn NavItem(label: &'static str, href: &'static str, icon: NavIcon) -> impl IntoView {
    let location = use_location();
    let active = move || location.pathname.with(|p| is_nav_active(href, p));

    let class = move || {
        tw_merge!(
            "flex flex-1 flex-col items-center gap-1 py-2 text-[11px] text-muted-foreground transition-colors",
            if active() { "text-primary font-medium" } else { "hover:text-foreground" }
        )
    };

    view! {
        <a href=href class=class aria-current=move || active().then_some("page")>
            {match icon {
                NavIcon::Home => view! { <House class="size-5" /> }.into_any(),
                NavIcon::Notebook => view! { <BookOpen class="size-5" /> }.into_any(),
                NavIcon::Review => view! { <Brain class="size-5" /> }.into_any(),
                NavIcon::Profile => view! { <User class="size-5" /> }.into_any(),
            }}
            <span>{label}</span>
        </a>
    }
}

#[component]
pub fn BottomNavigation() -> impl IntoView {
    view! {
        <nav class="fixed inset-x-0 bottom-0 z-20 border-t bg-background/95 backdrop-blur">
            <div class="mx-auto flex max-w-md">
                {NAV_ITEMS
                    .into_iter()
                    .map(|(label, href, icon)| view! { <NavItem label=label href=href icon=icon /> })
                    .collect_view()}
            </div>
        </nav>
    }
}

#[component]
pub fn MainLayout(config: AppBarConfig, children: Children) -> impl IntoView {
    let AppBarConfig {
        title,
        left,
        right,
        border_bottom,
    } = config;

    let header_class = tw_merge!(
        "sticky top-0 z-10 flex h-14 items-center gap-2 bg-background px-4",
        if border_bottom { "border-b" } else { "" }
    );

    view! {
        <div class="flex min-h-screen flex-col bg-background">
            <header data-name="AppBar" class=header_class>
                <div class="flex min-w-9 items-center">{left.map(|v| v.run())}</div>
                <h1 class="flex-1 truncate text-center text-base font-semibold">{title}</h1>
                <div class="flex min-w-9 items-center justify-end gap-1">{right.map(|v| v.run())}</div>
            </header>
            <main class="mx-auto w-full max-w-md flex-1 px-4 pt-4 pb-24">{children()}</main>
            <BottomNavigation />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_matches_only_root() {
        assert!(is_nav_active("/", "/"));
        assert!(!is_nav_active("/", "/notebook"));
    }

    #[test]
    fn sections_match_nested_paths() {
        assert!(is_nav_active("/notebook", "/notebook"));
        assert!(is_nav_active("/review", "/review/today"));
        assert!(!is_nav_active("/review", "/reviewer"));
        assert!(!is_nav_active("/profile", "/"));
    }

    #[test]
    fn each_path_has_one_active_item() {
        for path in ["/", "/notebook", "/review", "/profile"] {
            let active = NAV_ITEMS
                .iter()
                .filter(|(_, href, _)| is_nav_active(href, path))
                .count();
            assert_eq!(active, 1, "{path}");
        }
    }

    #[test]
    fn app_bar_builder() {
        let bar = AppBarConfig::new("My Notebook");
        assert_eq!(bar.title, "My Notebook");
        assert!(bar.left.is_none() && bar.right.is_none());
        assert!(!bar.border_bottom);

        let bar = bar.with_border().right(|| "x");
        assert!(bar.border_bottom);
        assert!(bar.right.is_some());
    }
}
