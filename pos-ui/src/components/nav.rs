//! Navigation Component
//!
//! Header navigation bar with brand, page links and session actions.

use leptos::*;
use leptos_router::*;
use pos_client::routes::{nav_routes, Route as Page};

use crate::state::global::GlobalState;

/// Navigation header component
#[component]
pub fn Nav() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let navigate = use_navigate();

    let me = state.me;

    let links = move || {
        let current = me.get();
        nav_routes(current.as_ref())
            .into_iter()
            .filter(|page| *page != Page::Profile)
            .map(|page| view! { <NavLink page=page /> })
            .collect_view()
    };

    let username = move || me.get().map(|me| me.username).unwrap_or_default();

    let logout = move |_| {
        state.logout();
        navigate(Page::Login.path(), Default::default());
    };

    view! {
        <nav class="bg-gray-800 border-b border-gray-700">
            <div class="container mx-auto px-4">
                <div class="flex items-center justify-between h-16">
                    // Logo and brand
                    <A href=Page::Pos.path() class="flex items-center space-x-3">
                        <span class="text-2xl">"🛒"</span>
                        <span class="text-xl font-bold text-amber-400">"GranPirula · POS"</span>
                    </A>

                    // Navigation links
                    <div class="flex items-center space-x-1 overflow-x-auto">
                        {links}
                    </div>

                    // Session
                    <div class="flex items-center space-x-2">
                        <span class="text-sm text-gray-400">{username}</span>
                        <NavLink page=Page::Profile />
                        <button
                            on:click=logout
                            class="px-3 py-2 rounded-lg text-gray-300 hover:text-white hover:bg-red-700 transition-colors"
                        >
                            "Salir"
                        </button>
                    </div>
                </div>
            </div>
        </nav>
    }
}

/// Individual navigation link
#[component]
fn NavLink(page: Page) -> impl IntoView {
    view! {
        <A
            href=page.path()
            class="px-3 py-2 rounded-lg text-sm text-gray-300 hover:text-white hover:bg-gray-700 transition-colors whitespace-nowrap"
            active_class="bg-gray-700 text-white"
        >
            {page.label()}
        </A>
    }
}
