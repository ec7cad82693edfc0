//! Toast Component
//!
//! Floating banner for the global success and error messages. Clicking a
//! banner dismisses it before its timer runs out.

use leptos::*;

use crate::state::global::GlobalState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Ok,
    Failure,
}

impl Tone {
    fn classes(self) -> &'static str {
        match self {
            Tone::Ok => "bg-emerald-700 border-emerald-500",
            Tone::Failure => "bg-red-700 border-red-500",
        }
    }
}

#[component]
pub fn Toast() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let success = state.success;
    let error = state.error;

    view! {
        <div class="fixed top-16 left-1/2 -translate-x-1/2 z-50 w-full max-w-md space-y-2 px-4">
            {move || error.get().map(|text| view! {
                <Banner text=text tone=Tone::Failure on_dismiss=Callback::new(move |_| error.set(None)) />
            })}
            {move || success.get().map(|text| view! {
                <Banner text=text tone=Tone::Ok on_dismiss=Callback::new(move |_| success.set(None)) />
            })}
        </div>
    }
}

#[component]
fn Banner(text: String, tone: Tone, on_dismiss: Callback<()>) -> impl IntoView {
    view! {
        <button
            on:click=move |_| on_dismiss.call(())
            role="status"
            class=format!(
                "w-full text-left text-white text-sm font-medium px-4 py-3 rounded-lg border shadow-lg {}",
                tone.classes()
            )
        >
            {text}
        </button>
    }
}
