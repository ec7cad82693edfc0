//! PIN confirmation dialog
//!
//! Sellers confirm drawer operations with the supervisor PIN.

use leptos::*;

#[component]
pub fn PinModal(
    #[prop(into)]
    title: Signal<String>,
    /// Receives the typed PIN
    #[prop(into)]
    on_confirm: Callback<String>,
    #[prop(into)]
    on_cancel: Callback<()>,
) -> impl IntoView {
    let (pin, set_pin) = create_signal(String::new());

    let submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        on_confirm.call(pin.get());
    };

    view! {
        <div class="fixed inset-0 z-40 bg-black/60 flex items-center justify-center">
            <form on:submit=submit class="bg-gray-800 rounded-xl p-6 w-80 space-y-4 border border-gray-700">
                <h3 class="text-lg font-semibold">{move || title.get()}</h3>
                <p class="text-sm text-gray-400">"Ingresa tu PIN para continuar."</p>
                <input
                    type="password"
                    autofocus=true
                    prop:value=move || pin.get()
                    on:input=move |ev| set_pin.set(event_target_value(&ev))
                    class="w-full bg-gray-700 rounded-lg px-4 py-2 border border-gray-600 focus:border-amber-500 focus:outline-none"
                />
                <div class="flex justify-end space-x-2">
                    <button
                        type="button"
                        on:click=move |_| on_cancel.call(())
                        class="px-4 py-2 bg-gray-600 hover:bg-gray-500 rounded-lg"
                    >
                        "Cancelar"
                    </button>
                    <button type="submit" class="px-4 py-2 bg-amber-600 hover:bg-amber-700 rounded-lg font-medium">
                        "Confirmar"
                    </button>
                </div>
            </form>
        </div>
    }
}
