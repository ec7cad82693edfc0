//! Spinners

use leptos::*;

/// Block spinner shown while a page fetches its lists
#[component]
pub fn Loading(#[prop(default = "Cargando…")] caption: &'static str) -> impl IntoView {
    view! {
        <div class="flex items-center justify-center gap-3 py-8 text-gray-400 text-sm">
            <div class="loading-spinner w-6 h-6" />
            <span>{caption}</span>
        </div>
    }
}

#[component]
pub fn InlineLoading() -> impl IntoView {
    view! { <span class="inline-block align-middle loading-spinner w-4 h-4" /> }
}
