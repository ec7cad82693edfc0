//! New Product Page

use leptos::*;
use pos_client::inventory::NewProductForm;
use pos_client::messages;
use pos_client::Category;

use crate::browser;
use crate::state::global::GlobalState;

#[component]
pub fn NewProduct() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let form = create_rw_signal(NewProductForm::default());
    let categories = create_rw_signal(Vec::<Category>::new());
    let (saving, set_saving) = create_signal(false);

    {
        let state = state.clone();
        spawn_local(async move {
            match state.api.list_categories().await {
                Ok(list) => categories.set(list),
                Err(e) => state.report(&messages::LOAD_CATEGORIES, &e),
            }
        });
    }

    // Creates a category on the fly and selects it
    let quick_category = {
        let state = state.clone();
        move |_| {
            let Some(name) = browser::prompt("Nombre de la categoría:") else {
                return;
            };
            let name = name.trim().to_string();
            if name.is_empty() {
                return;
            }
            let state = state.clone();
            spawn_local(async move {
                match state.api.create_category(&name).await {
                    Ok(created) => {
                        let id = created.id;
                        categories.update(|list| {
                            list.push(created);
                            list.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
                        });
                        form.update(|f| f.category = Some(id));
                    }
                    Err(e) => state.report(&messages::QUICK_CATEGORY, &e),
                }
            });
        }
    };

    let on_submit = {
        let state = state.clone();
        move |ev: ev::SubmitEvent| {
            ev.prevent_default();
            state.clear_messages();
            let product = match form.with_untracked(NewProductForm::validate) {
                Ok(product) => product,
                Err(e) => return state.show_error(&e.to_string()),
            };
            let state = state.clone();
            set_saving.set(true);
            spawn_local(async move {
                match state.api.create_product(&product).await {
                    Ok(created) => {
                        state.show_success(&format!("Producto \"{}\" creado.", created.name));
                        form.set(NewProductForm::default());
                    }
                    Err(e) => state.report(&messages::CREATE_PRODUCT, &e),
                }
                set_saving.set(false);
            });
        }
    };

    let text_field = move |label: &'static str,
                           kind: &'static str,
                           get: fn(&NewProductForm) -> String,
                           set: fn(&mut NewProductForm, String)| {
        view! {
            <label class="block">
                <span class="block text-sm text-gray-400 mb-1">{label}</span>
                <input
                    type=kind
                    prop:value=move || form.with(get)
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        form.update(|f| set(f, value));
                    }
                    class="w-full bg-gray-700 rounded-lg px-4 py-2 border border-gray-600"
                />
            </label>
        }
    };

    view! {
        <div class="max-w-xl space-y-6">
            <h1 class="text-3xl font-bold">"Nuevo producto"</h1>

            <form on:submit=on_submit class="bg-gray-800 rounded-xl p-6 space-y-4">
                {text_field("Código (SKU / EAN)", "text", |f| f.code.clone(), |f, v| f.code = v)}
                {text_field("Nombre", "text", |f| f.name.clone(), |f, v| f.name = v)}

                <label class="block">
                    <span class="block text-sm text-gray-400 mb-1">"Categoría"</span>
                    <div class="flex space-x-2">
                        <select
                            on:change=move |ev| form.update(|f| f.category = event_target_value(&ev).parse().ok())
                            class="flex-1 bg-gray-700 rounded-lg px-3 py-2 border border-gray-600"
                        >
                            <option value="" selected=move || form.with(|f| f.category.is_none())>
                                "Sin categoría"
                            </option>
                            {move || categories.get().into_iter().map(|c| {
                                let id = c.id;
                                view! {
                                    <option
                                        value=id.to_string()
                                        selected=move || form.with(|f| f.category == Some(id))
                                    >
                                        {c.name}
                                    </option>
                                }
                            }).collect_view()}
                        </select>
                        <button
                            type="button"
                            on:click=quick_category
                            class="px-3 py-2 bg-gray-700 hover:bg-gray-600 rounded-lg text-sm"
                        >
                            "+ Categoría"
                        </button>
                    </div>
                </label>

                <div class="grid grid-cols-2 gap-4">
                    {text_field("Precio", "number", |f| f.price.clone(), |f, v| f.price = v)}
                    {text_field("Stock inicial", "number", |f| f.stock.clone(), |f, v| f.stock = v)}
                </div>

                <label class="flex items-center space-x-2">
                    <input
                        type="checkbox"
                        prop:checked=move || form.with(|f| f.top_seller)
                        on:change=move |ev| form.update(|f| f.top_seller = event_target_checked(&ev))
                    />
                    <span>"Más vendido"</span>
                </label>

                <button
                    type="submit"
                    disabled=move || saving.get()
                    class="w-full py-2 bg-amber-600 hover:bg-amber-700 disabled:bg-gray-700 rounded-lg font-medium"
                >
                    {move || if saving.get() { "Guardando..." } else { "Crear producto" }}
                </button>
            </form>
        </div>
    }
}
