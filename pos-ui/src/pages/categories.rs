//! Categories Page

use leptos::*;
use pos_client::inventory::filter_categories;
use pos_client::messages;
use pos_client::models::Id;
use pos_client::Category;

use crate::browser;
use crate::components::Loading;
use crate::state::global::GlobalState;

#[component]
pub fn Categories() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let categories = create_rw_signal(Vec::<Category>::new());
    let (loading, set_loading) = create_signal(true);
    let (name, set_name) = create_signal(String::new());
    let (needle, set_needle) = create_signal(String::new());
    let editing = create_rw_signal(None::<(Id, String)>);

    let load = {
        let state = state.clone();
        move || {
            let state = state.clone();
            set_loading.set(true);
            spawn_local(async move {
                match state.api.list_categories().await {
                    Ok(list) => categories.set(list),
                    Err(e) => state.report(&messages::LOAD_CATEGORIES, &e),
                }
                set_loading.set(false);
            });
        }
    };
    load();

    let on_create = {
        let state = state.clone();
        let load = load.clone();
        move |ev: ev::SubmitEvent| {
            ev.prevent_default();
            let new_name = name.get_untracked().trim().to_string();
            if new_name.is_empty() {
                return state.show_error("El nombre es obligatorio.");
            }
            let state = state.clone();
            let load = load.clone();
            spawn_local(async move {
                match state.api.create_category(&new_name).await {
                    Ok(_) => {
                        set_name.set(String::new());
                        state.show_success("Categoría creada.");
                        load();
                    }
                    Err(e) => state.report(&messages::CREATE_CATEGORY, &e),
                }
            });
        }
    };

    let save_rename = {
        let state = state.clone();
        move || {
            let Some((id, new_name)) = editing.get_untracked() else {
                return;
            };
            let new_name = new_name.trim().to_string();
            if new_name.is_empty() {
                return state.show_error("El nombre es obligatorio.");
            }
            let state = state.clone();
            spawn_local(async move {
                match state.api.rename_category(id, &new_name).await {
                    Ok(saved) => {
                        categories.update(|list| {
                            if let Some(c) = list.iter_mut().find(|c| c.id == saved.id) {
                                *c = saved;
                            }
                        });
                        editing.set(None);
                    }
                    Err(e) => state.report(&messages::RENAME_CATEGORY, &e),
                }
            });
        }
    };

    let remove = {
        let state = state.clone();
        move |category: Category| {
            if !browser::confirm(&format!("¿Eliminar la categoría \"{}\"?", category.name)) {
                return;
            }
            let state = state.clone();
            spawn_local(async move {
                match state.api.delete_category(category.id).await {
                    Ok(()) => {
                        categories.update(|list| list.retain(|c| c.id != category.id));
                        state.show_success("Categoría eliminada.");
                    }
                    Err(e) => state.report(&messages::DELETE_CATEGORY, &e),
                }
            });
        }
    };

    let rows = move || {
        let list: Vec<Category> = categories
            .with(|all| filter_categories(all, &needle.get()).into_iter().cloned().collect());
        if list.is_empty() {
            return view! { <li class="py-3 text-gray-500">"No hay categorías"</li> }.into_view();
        }
        list.into_iter()
            .map(|category| {
                let id = category.id;
                let is_editing = move || editing.with(|e| matches!(e, Some((eid, _)) if *eid == id));
                let save_rename = save_rename.clone();
                let remove = remove.clone();
                view! {
                    <li class="flex items-center justify-between py-2 border-t border-gray-700">
                        {move || if is_editing() {
                            let save_rename = save_rename.clone();
                            let save_on_enter = save_rename.clone();
                            view! {
                                <input
                                    prop:value=move || editing.with(|e| e.as_ref().map(|(_, n)| n.clone()).unwrap_or_default())
                                    on:input=move |ev| {
                                        let value = event_target_value(&ev);
                                        editing.update(|e| {
                                            if let Some((_, n)) = e {
                                                *n = value;
                                            }
                                        });
                                    }
                                    on:keydown=move |ev| {
                                        if ev.key() == "Enter" {
                                            save_on_enter();
                                        }
                                    }
                                    class="flex-1 mr-2 bg-gray-700 rounded px-3 py-1 border border-gray-600"
                                />
                                <div class="space-x-1">
                                    <button on:click=move |_| save_rename() class="px-2 py-1 bg-amber-600 rounded">"Guardar"</button>
                                    <button on:click=move |_| editing.set(None) class="px-2 py-1 bg-gray-600 rounded">"Cancelar"</button>
                                </div>
                            }.into_view()
                        } else {
                            let category = category.clone();
                            let remove = remove.clone();
                            let label = category.name.clone();
                            let current = category.name.clone();
                            view! {
                                <span>{label}</span>
                                <div class="space-x-1">
                                    <button
                                        on:click=move |_| editing.set(Some((id, current.clone())))
                                        class="px-2 py-1 bg-gray-700 hover:bg-gray-600 rounded"
                                    >
                                        "Renombrar"
                                    </button>
                                    <button
                                        on:click=move |_| remove(category.clone())
                                        class="px-2 py-1 bg-red-700 hover:bg-red-600 rounded"
                                    >
                                        "Eliminar"
                                    </button>
                                </div>
                            }.into_view()
                        }}
                    </li>
                }
            })
            .collect_view()
    };

    view! {
        <div class="max-w-2xl space-y-6">
            <h1 class="text-3xl font-bold">"Categorías"</h1>

            <form on:submit=on_create class="flex space-x-2">
                <input
                    placeholder="Nueva categoría"
                    prop:value=move || name.get()
                    on:input=move |ev| set_name.set(event_target_value(&ev))
                    class="flex-1 bg-gray-700 rounded-lg px-4 py-2 border border-gray-600"
                />
                <button type="submit" class="px-4 py-2 bg-amber-600 hover:bg-amber-700 rounded-lg">
                    "Crear"
                </button>
            </form>

            <section class="bg-gray-800 rounded-xl p-4 space-y-3">
                <input
                    placeholder="Buscar categoría…"
                    prop:value=move || needle.get()
                    on:input=move |ev| set_needle.set(event_target_value(&ev))
                    class="w-full bg-gray-700 rounded-lg px-3 py-2 border border-gray-600"
                />
                {move || loading.get().then(|| view! { <Loading /> })}
                <ul>{rows}</ul>
            </section>
        </div>
    }
}
