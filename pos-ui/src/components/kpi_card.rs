//! KPI Card Component
//!
//! One headline number with a caption.

use leptos::*;

#[component]
pub fn KpiCard(
    label: &'static str,
    #[prop(into)]
    value: Signal<String>,
    /// Optional small print under the value
    #[prop(optional, into)]
    hint: Option<Signal<String>>,
    #[prop(default = "text-white")]
    accent: &'static str,
) -> impl IntoView {
    view! {
        <div class="bg-gray-800 rounded-lg p-4 border border-gray-700">
            <span class="text-gray-400 text-sm">{label}</span>
            <div class=format!("text-3xl font-bold mt-2 {}", accent)>
                {move || value.get()}
            </div>
            {hint.map(|hint| view! {
                <div class="text-xs text-gray-500 mt-1">{move || hint.get()}</div>
            })}
        </div>
    }
}
