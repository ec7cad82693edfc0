//! Promotions Page
//!
//! Percentage or fixed discounts scoped to a category or a product list.

use leptos::*;
use pos_client::messages;
use pos_client::promotions::{pickable_products, scope_label, value_label, PromotionForm};
use pos_client::{Category, Product, Promotion, PromotionKind};

use crate::browser;
use crate::components::Loading;
use crate::state::global::GlobalState;

#[component]
pub fn Promotions() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let promotions = create_rw_signal(Vec::<Promotion>::new());
    let categories = create_rw_signal(Vec::<Category>::new());
    let products = create_rw_signal(Vec::<Product>::new());
    let (loading, set_loading) = create_signal(true);
    let form = create_rw_signal(PromotionForm::default());
    let (needle, set_needle) = create_signal(String::new());

    let load = {
        let state = state.clone();
        move || {
            let state = state.clone();
            set_loading.set(true);
            spawn_local(async move {
                match state.api.list_promotions().await {
                    Ok(list) => promotions.set(list),
                    Err(e) => state.report(&messages::LOAD_PROMOTIONS, &e),
                }
                if let Ok(list) = state.api.list_categories().await {
                    categories.set(list);
                }
                if let Ok(list) = state.api.list_products().await {
                    products.set(list);
                }
                set_loading.set(false);
            });
        }
    };
    load();

    let on_submit = {
        let state = state.clone();
        let load = load.clone();
        move |ev: ev::SubmitEvent| {
            ev.prevent_default();
            state.clear_messages();
            let promotion = match form.with_untracked(PromotionForm::validate) {
                Ok(promotion) => promotion,
                Err(e) => return state.show_error(&e.to_string()),
            };
            let state = state.clone();
            let load = load.clone();
            spawn_local(async move {
                match state.api.create_promotion(&promotion).await {
                    Ok(_) => {
                        state.show_success("Promoción creada.");
                        form.set(PromotionForm::default());
                        set_needle.set(String::new());
                        load();
                    }
                    Err(e) => state.report(&messages::CREATE_PROMOTION, &e),
                }
            });
        }
    };

    let toggle_active = {
        let state = state.clone();
        let load = load.clone();
        move |promotion: Promotion| {
            let state = state.clone();
            let load = load.clone();
            spawn_local(async move {
                match state.api.set_promotion_active(promotion.id, !promotion.active).await {
                    Ok(_) => load(),
                    Err(e) => state.report(&messages::TOGGLE_PROMOTION, &e),
                }
            });
        }
    };

    let remove = {
        let state = state.clone();
        let load = load.clone();
        move |promotion: Promotion| {
            if !browser::confirm(&format!("¿Eliminar la promoción \"{}\"?", promotion.name)) {
                return;
            }
            let state = state.clone();
            let load = load.clone();
            spawn_local(async move {
                match state.api.delete_promotion(promotion.id).await {
                    Ok(()) => {
                        state.show_success("Promoción eliminada.");
                        load();
                    }
                    Err(e) => state.report(&messages::DELETE_PROMOTION, &e),
                }
            });
        }
    };

    let picker = move || {
        let needle = needle.get();
        products.with(|all| {
            pickable_products(all, &needle)
                .into_iter()
                .map(|p| {
                    let id = p.id;
                    view! {
                        <label class="flex items-center space-x-2 py-1 text-sm">
                            <input
                                type="checkbox"
                                prop:checked=move || form.with(|f| f.is_selected(id))
                                on:change=move |_| form.update(|f| f.toggle_product(id))
                            />
                            <span>{format!("{} ({})", p.name, p.code)}</span>
                            <span class="text-gray-500">{format!("stock {}", p.stock)}</span>
                        </label>
                    }
                })
                .collect_view()
        })
    };

    let rows = move || {
        let list = promotions.get();
        if list.is_empty() {
            return view! {
                <tr><td colspan="6" class="py-3 text-gray-500">"No hay promociones"</td></tr>
            }
            .into_view();
        }
        list.into_iter()
            .map(|promotion| {
                let scope = categories.with(|c| scope_label(&promotion, c));
                let toggle_active = toggle_active.clone();
                let remove = remove.clone();
                let for_toggle = promotion.clone();
                let for_remove = promotion.clone();
                view! {
                    <tr class="border-t border-gray-700">
                        <td>{promotion.name.clone()}</td>
                        <td class="text-center">{promotion.kind.badge()}</td>
                        <td class="text-right">{value_label(promotion.kind, promotion.value)}</td>
                        <td>{scope}</td>
                        <td class="text-center">
                            <span class=if promotion.active { "text-emerald-400" } else { "text-gray-500" }>
                                {if promotion.active { "Activa" } else { "Inactiva" }}
                            </span>
                        </td>
                        <td class="text-right space-x-1 whitespace-nowrap">
                            <button
                                on:click=move |_| toggle_active(for_toggle.clone())
                                class="px-2 py-1 bg-gray-700 hover:bg-gray-600 rounded"
                            >
                                {if promotion.active { "Desactivar" } else { "Activar" }}
                            </button>
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
            <h1 class="text-3xl font-bold">"Promociones"</h1>

            <form on:submit=on_submit class="bg-gray-800 rounded-xl p-6 space-y-4">
                <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                    <input
                        placeholder="Nombre"
                        prop:value=move || form.with(|f| f.name.clone())
                        on:input=move |ev| form.update(|f| f.name = event_target_value(&ev))
                        class="bg-gray-700 rounded-lg px-4 py-2 border border-gray-600"
                    />
                    <select
                        on:change=move |ev| {
                            if let Some(kind) = PromotionKind::from_code(&event_target_value(&ev)) {
                                form.update(|f| f.kind = kind);
                            }
                        }
                        class="bg-gray-700 rounded-lg px-3 py-2 border border-gray-600"
                    >
                        <option value="PCT" selected=move || form.with(|f| f.kind == PromotionKind::Percent)>
                            "Porcentaje (%)"
                        </option>
                        <option value="FIXED" selected=move || form.with(|f| f.kind == PromotionKind::Fixed)>
                            "Monto fijo ($)"
                        </option>
                    </select>
                    <input
                        type="number"
                        placeholder="Valor"
                        prop:value=move || form.with(|f| f.value.clone())
                        on:input=move |ev| form.update(|f| f.value = event_target_value(&ev))
                        class="bg-gray-700 rounded-lg px-4 py-2 border border-gray-600"
                    />
                </div>

                <label class="block">
                    <span class="block text-sm text-gray-400 mb-1">"Categoría (opcional)"</span>
                    <select
                        on:change=move |ev| form.update(|f| f.category = event_target_value(&ev).parse().ok())
                        class="w-full bg-gray-700 rounded-lg px-3 py-2 border border-gray-600"
                    >
                        <option value="" selected=move || form.with(|f| f.category.is_none())>"Ninguna"</option>
                        {move || categories.get().into_iter().map(|c| {
                            let id = c.id;
                            view! {
                                <option value=id.to_string() selected=move || form.with(|f| f.category == Some(id))>
                                    {c.name}
                                </option>
                            }
                        }).collect_view()}
                    </select>
                </label>

                <div class="space-y-2">
                    <div class="flex items-center justify-between">
                        <span class="text-sm text-gray-400">
                            {move || format!("Productos seleccionados: {}", form.with(|f| f.products.len()))}
                        </span>
                        <input
                            placeholder="Filtrar productos…"
                            prop:value=move || needle.get()
                            on:input=move |ev| set_needle.set(event_target_value(&ev))
                            class="bg-gray-700 rounded-lg px-3 py-1 border border-gray-600 text-sm"
                        />
                    </div>
                    <div class="max-h-56 overflow-auto bg-gray-900/40 rounded-lg p-2">{picker}</div>
                </div>

                <button type="submit" class="px-4 py-2 bg-amber-600 hover:bg-amber-700 rounded-lg font-medium">
                    "Crear promoción"
                </button>
            </form>

            <section class="bg-gray-800 rounded-xl p-4 overflow-x-auto">
                {move || loading.get().then(|| view! { <Loading /> })}
                <table class="w-full text-sm">
                    <thead class="text-gray-400">
                        <tr>
                            <th class="text-left">"Nombre"</th>
                            <th>"Tipo"</th>
                            <th class="text-right">"Valor"</th>
                            <th class="text-left">"Aplica a"</th>
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
