//! User Administration Page
//!
//! Staff accounts: creation, role, activation and deletion.

use leptos::*;
use pos_client::messages;
use pos_client::users::{check_delete, filter_users, role_options, NewUserForm};
use pos_client::{Role, User};

use crate::browser;
use crate::components::Loading;
use crate::state::global::GlobalState;

#[component]
pub fn Admin() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let users = create_rw_signal(Vec::<User>::new());
    let (loading, set_loading) = create_signal(true);
    let (needle, set_needle) = create_signal(String::new());
    let form = create_rw_signal(NewUserForm::default());

    let load = {
        let state = state.clone();
        move || {
            let state = state.clone();
            set_loading.set(true);
            spawn_local(async move {
                match state.api.list_users().await {
                    Ok(list) => users.set(list),
                    Err(e) => state.report(&messages::LOAD_USERS, &e),
                }
                set_loading.set(false);
            });
        }
    };
    load();

    let replace = move |saved: User| {
        users.update(|list| {
            if let Some(u) = list.iter_mut().find(|u| u.id == saved.id) {
                *u = saved;
            }
        });
    };

    let on_create = {
        let state = state.clone();
        let load = load.clone();
        move |ev: ev::SubmitEvent| {
            ev.prevent_default();
            state.clear_messages();
            let user = match form.with_untracked(NewUserForm::validate) {
                Ok(user) => user,
                Err(e) => return state.show_error(&e.to_string()),
            };
            let state = state.clone();
            let load = load.clone();
            spawn_local(async move {
                match state.api.create_user(&user).await {
                    Ok(created) => {
                        state.show_success(&format!("Usuario \"{}\" creado.", created.username));
                        form.set(NewUserForm::default());
                        load();
                    }
                    Err(e) => state.report(&messages::CREATE_USER, &e),
                }
            });
        }
    };

    let change_role = {
        let state = state.clone();
        move |id: pos_client::Id, role: Role| {
            let state = state.clone();
            spawn_local(async move {
                match state.api.set_user_role(id, role).await {
                    Ok(saved) => replace(saved),
                    Err(e) => state.report(&messages::SET_ROLE, &e),
                }
            });
        }
    };

    let toggle_active = {
        let state = state.clone();
        move |user: User| {
            let state = state.clone();
            spawn_local(async move {
                match state.api.set_user_active(user.id, !user.is_active).await {
                    Ok(saved) => replace(saved),
                    Err(e) => state.report(&messages::SET_USER_ACTIVE, &e),
                }
            });
        }
    };

    let remove = {
        let state = state.clone();
        move |user: User| {
            let Some(me) = state.me.get_untracked() else {
                return;
            };
            if let Err(e) = check_delete(&me, user.id) {
                return state.show_error(&e.to_string());
            }
            if !browser::confirm(&format!("Eliminar el usuario \"{}\"?", user.username)) {
                return;
            }
            let state = state.clone();
            spawn_local(async move {
                match state.api.delete_user(user.id).await {
                    Ok(()) => {
                        users.update(|list| list.retain(|u| u.id != user.id));
                        state.show_success("Usuario eliminado.");
                    }
                    Err(e) => state.report(&messages::DELETE_USER, &e),
                }
            });
        }
    };

    let rows = move || {
        let shown: Vec<User> =
            users.with(|all| filter_users(all, &needle.get()).into_iter().cloned().collect());
        if shown.is_empty() {
            return view! {
                <tr><td colspan="5" class="py-3 text-gray-500">"Sin usuarios"</td></tr>
            }
            .into_view();
        }
        shown
            .into_iter()
            .map(|user| {
                let id = user.id;
                let current_role = user.role.clone();
                let change_role = change_role.clone();
                let toggle_active = toggle_active.clone();
                let remove = remove.clone();
                let for_toggle = user.clone();
                let for_remove = user.clone();
                view! {
                    <tr class="border-t border-gray-700">
                        <td>{user.username.clone()}</td>
                        <td>{if user.email.is_empty() { "-".to_string() } else { user.email.clone() }}</td>
                        <td>
                            <select
                                on:change=move |ev| change_role(id, Role::from_code(&event_target_value(&ev)))
                                class="bg-gray-700 rounded px-2 py-1 border border-gray-600"
                            >
                                {role_options().into_iter().map(|(role, label)| {
                                    let selected = role == current_role;
                                    view! {
                                        <option value=role.code().to_string() selected=selected>{label}</option>
                                    }
                                }).collect_view()}
                            </select>
                        </td>
                        <td class="text-center">
                            <button
                                on:click=move |_| toggle_active(for_toggle.clone())
                                class=if user.is_active {
                                    "px-2 py-1 bg-emerald-700 hover:bg-emerald-600 rounded"
                                } else {
                                    "px-2 py-1 bg-gray-600 hover:bg-gray-500 rounded"
                                }
                            >
                                {if user.is_active { "Activo" } else { "Inactivo" }}
                            </button>
                        </td>
                        <td class="text-right">
                            <button
                                on:click=move |_| remove(for_remove.clone())
                                class="px-2 py-1 bg-red-700 hover:bg-red-600 rounded"
                            >
                                "Eliminar"
                            </button>
                        </td>
                    </tr>
                }
            })
            .collect_view()
    };

    view! {
        <div class="space-y-6">
            <h1 class="text-3xl font-bold">"Administración de usuarios"</h1>

            <form on:submit=on_create class="bg-gray-800 rounded-xl p-6 grid grid-cols-1 md:grid-cols-5 gap-3">
                <input
                    placeholder="Usuario"
                    prop:value=move || form.with(|f| f.username.clone())
                    on:input=move |ev| form.update(|f| f.username = event_target_value(&ev))
                    class="bg-gray-700 rounded-lg px-3 py-2 border border-gray-600"
                />
                <input
                    type="email"
                    placeholder="Email"
                    prop:value=move || form.with(|f| f.email.clone())
                    on:input=move |ev| form.update(|f| f.email = event_target_value(&ev))
                    class="bg-gray-700 rounded-lg px-3 py-2 border border-gray-600"
                />
                <input
                    type="password"
                    placeholder="Clave (6+)"
                    prop:value=move || form.with(|f| f.password.clone())
                    on:input=move |ev| form.update(|f| f.password = event_target_value(&ev))
                    class="bg-gray-700 rounded-lg px-3 py-2 border border-gray-600"
                />
                <select
                    on:change=move |ev| form.update(|f| f.role = Role::from_code(&event_target_value(&ev)))
                    class="bg-gray-700 rounded-lg px-3 py-2 border border-gray-600"
                >
                    {role_options().into_iter().map(|(role, label)| {
                        let code = role.code().to_string();
                        view! {
                            <option value=code selected=move || form.with(|f| f.role == role)>{label}</option>
                        }
                    }).collect_view()}
                </select>
                <button type="submit" class="px-4 py-2 bg-amber-600 hover:bg-amber-700 rounded-lg font-medium">
                    "Crear usuario"
                </button>
            </form>

            <section class="bg-gray-800 rounded-xl p-4 overflow-x-auto space-y-3">
                <input
                    placeholder="Buscar por usuario o email…"
                    prop:value=move || needle.get()
                    on:input=move |ev| set_needle.set(event_target_value(&ev))
                    class="w-full bg-gray-700 rounded-lg px-3 py-2 border border-gray-600"
                />
                {move || loading.get().then(|| view! { <Loading /> })}
                <table class="w-full text-sm">
                    <thead class="text-gray-400">
                        <tr>
                            <th class="text-left">"Usuario"</th>
                            <th class="text-left">"Email"</th>
                            <th class="text-left">"Rol"</th>
                            <th>"Estado"</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>{rows}</tbody>
                </table>
            </section>
        </div>
    }
}
