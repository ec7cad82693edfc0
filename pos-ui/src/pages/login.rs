//! Login Page

use leptos::*;
use leptos_router::use_navigate;
use pos_client::messages;
use pos_client::routes::Route as Page;

use crate::api;
use crate::state::global::GlobalState;

#[component]
pub fn Login() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let navigate = use_navigate();

    let (username, set_username) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (submitting, set_submitting) = create_signal(false);
    let (failure, set_failure) = create_signal(None::<String>);

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        set_failure.set(None);
        set_submitting.set(true);

        let state = state.clone();
        let navigate = navigate.clone();
        spawn_local(async move {
            match state.api.login(username.get_untracked().trim(), &password.get_untracked()).await {
                Ok(_) => {
                    state.on_login();
                    navigate(Page::Pos.path(), Default::default());
                }
                Err(e) => set_failure.set(Some(messages::LOGIN.describe(&e))),
            }
            set_submitting.set(false);
        });
    };

    view! {
        <div class="flex items-center justify-center min-h-[70vh]">
            <form on:submit=on_submit class="bg-gray-800 rounded-xl p-8 w-full max-w-sm space-y-4 border border-gray-700">
                <h1 class="text-2xl font-bold text-amber-400">"Bienvenido"</h1>
                <p class="text-sm text-gray-400">"GranPirula · POS"</p>

                <div>
                    <label class="block text-sm text-gray-400 mb-2">"Usuario"</label>
                    <input
                        type="text"
                        autocomplete="username"
                        prop:value=move || username.get()
                        on:input=move |ev| set_username.set(event_target_value(&ev))
                        class="w-full bg-gray-700 rounded-lg px-4 py-3 border border-gray-600 focus:border-amber-500 focus:outline-none"
                    />
                </div>
                <div>
                    <label class="block text-sm text-gray-400 mb-2">"Contraseña"</label>
                    <input
                        type="password"
                        autocomplete="current-password"
                        prop:value=move || password.get()
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                        class="w-full bg-gray-700 rounded-lg px-4 py-3 border border-gray-600 focus:border-amber-500 focus:outline-none"
                    />
                </div>

                {move || failure.get().map(|msg| view! { <p class="text-sm text-red-400">{msg}</p> })}

                <button
                    type="submit"
                    disabled=move || submitting.get()
                    class="w-full py-3 bg-amber-600 hover:bg-amber-700 disabled:bg-gray-700 rounded-lg font-medium transition-colors"
                >
                    {move || if submitting.get() { "Ingresando..." } else { "Ingresar" }}
                </button>

                <p class="text-xs text-gray-500">{format!("API: {}", api::get_api_base())}</p>
            </form>
        </div>
    }
}
