//! Profile Page
//!
//! The signed-in account. Admins can change their email and password.

use leptos::*;
use pos_client::messages;
use pos_client::users::profile_update;

use crate::state::global::GlobalState;

#[component]
pub fn Profile() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let me = state.me;
    let (email, set_email) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (saving, set_saving) = create_signal(false);

    // Prefill once the account is known
    create_effect(move |_| {
        if let Some(current) = me.get() {
            set_email.set(current.email);
        }
    });

    let on_submit = {
        let state = state.clone();
        move |ev: ev::SubmitEvent| {
            ev.prevent_default();
            state.clear_messages();
            let Some(current) = me.get_untracked() else {
                return;
            };
            let update = match profile_update(&email.get_untracked(), &password.get_untracked()) {
                Ok(update) => update,
                Err(e) => return state.show_error(&e.to_string()),
            };
            let state = state.clone();
            set_saving.set(true);
            spawn_local(async move {
                match state.api.update_profile(current.id, &update).await {
                    Ok(_) => {
                        set_password.set(String::new());
                        state.show_success("Perfil actualizado.");
                        state.load_me();
                    }
                    Err(e) => state.report(&messages::UPDATE_PROFILE, &e),
                }
                set_saving.set(false);
            });
        }
    };

    let is_admin = move || me.with(|m| m.as_ref().map(|m| m.is_admin()).unwrap_or(false));

    view! {
        <div class="max-w-xl space-y-6">
            <h1 class="text-3xl font-bold">"Mi perfil"</h1>

            <section class="bg-gray-800 rounded-xl p-6 space-y-2">
                {move || me.get().map(|m| view! {
                    <div><span class="text-gray-400">"Usuario: "</span>{m.username.clone()}</div>
                    <div>
                        <span class="text-gray-400">"Email: "</span>
                        {if m.email.is_empty() { "-".to_string() } else { m.email.clone() }}
                    </div>
                    <div><span class="text-gray-400">"Rol: "</span>{m.role.label().to_string()}</div>
                })}
            </section>

            <Show
                when=is_admin
                fallback=|| view! {
                    <p class="text-sm text-gray-500">"Solo un administrador puede modificar estos datos."</p>
                }
            >
                <form on:submit=on_submit.clone() class="bg-gray-800 rounded-xl p-6 space-y-4">
                    <h2 class="text-xl font-semibold">"Editar datos"</h2>
                    <label class="block">
                        <span class="block text-sm text-gray-400 mb-1">"Email"</span>
                        <input
                            type="email"
                            prop:value=move || email.get()
                            on:input=move |ev| set_email.set(event_target_value(&ev))
                            class="w-full bg-gray-700 rounded-lg px-4 py-2 border border-gray-600"
                        />
                    </label>
                    <label class="block">
                        <span class="block text-sm text-gray-400 mb-1">"Nueva clave (opcional, 6+)"</span>
                        <input
                            type="password"
                            prop:value=move || password.get()
                            on:input=move |ev| set_password.set(event_target_value(&ev))
                            class="w-full bg-gray-700 rounded-lg px-4 py-2 border border-gray-600"
                        />
                    </label>
                    <button
                        type="submit"
                        disabled=move || saving.get()
                        class="px-4 py-2 bg-amber-600 hover:bg-amber-700 disabled:bg-gray-700 rounded-lg font-medium"
                    >
                        {move || if saving.get() { "Guardando..." } else { "Guardar" }}
                    </button>
                </form>
            </Show>
        </div>
    }
}
