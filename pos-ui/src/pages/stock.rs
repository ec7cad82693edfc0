//! Stock Page
//!
//! Inventory KPIs, filters and the product table. Admins edit rows inline,
//! toggle top sellers and delete products.

use leptos::*;
use pos_client::inventory::{
    critical_threshold, kpis, min_threshold, stock_status, ProductForm, StockFilter, StockStatus,
};
use pos_client::messages;
use pos_client::money::format_clp;
use pos_client::models::Id;
use pos_client::{Category, Product};

use crate::components::{KpiCard, Loading};
use crate::state::global::GlobalState;

type FormField = (fn(&ProductForm) -> String, fn(&mut ProductForm, String));

const NAME: FormField = (|f| f.name.clone(), |f, v| f.name = v);
const PRICE: FormField = (|f| f.price.clone(), |f, v| f.price = v);
const STOCK: FormField = (|f| f.stock.clone(), |f, v| f.stock = v);
const MIN: FormField = (|f| f.min_stock.clone(), |f, v| f.min_stock = v);
const CRITICAL: FormField = (|f| f.critical_stock.clone(), |f, v| f.critical_stock = v);

fn status_class(status: StockStatus) -> &'static str {
    match status {
        StockStatus::Low => "bg-red-700",
        StockStatus::Medium => "bg-yellow-700",
        StockStatus::Normal => "bg-green-700",
    }
}

#[component]
pub fn Stock() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let products = create_rw_signal(Vec::<Product>::new());
    let categories = create_rw_signal(Vec::<Category>::new());
    let (loading, set_loading) = create_signal(true);
    let filter = create_rw_signal(StockFilter::default());
    let (show_thresholds, set_show_thresholds) = create_signal(false);
    let editing = create_rw_signal(None::<(Id, ProductForm)>);
    let deleting = create_rw_signal(None::<Product>);

    let load = {
        let state = state.clone();
        move || {
            let state = state.clone();
            set_loading.set(true);
            spawn_local(async move {
                match state.api.list_products().await {
                    Ok(list) => products.set(list),
                    Err(e) => {
                        state.report(&messages::LOAD_STOCK, &e);
                        products.set(Vec::new());
                    }
                }
                // The category filter is optional
                if let Ok(list) = state.api.list_categories().await {
                    categories.set(list);
                }
                set_loading.set(false);
            });
        }
    };
    load();

    let is_admin = {
        let me = state.me;
        move || me.with(|m| m.as_ref().map(|m| m.is_admin()).unwrap_or(false))
    };

    let save = {
        let state = state.clone();
        move || {
            let Some((id, form)) = editing.get_untracked() else {
                return;
            };
            let update = match form.validate() {
                Ok(update) => update,
                Err(e) => return state.show_error(&e.to_string()),
            };
            let state = state.clone();
            spawn_local(async move {
                match state.api.update_product(id, &update).await {
                    Ok(saved) => {
                        products.update(|list| {
                            if let Some(p) = list.iter_mut().find(|p| p.id == saved.id) {
                                *p = saved;
                            }
                        });
                        editing.set(None);
                        state.show_success("Producto actualizado.");
                    }
                    Err(e) => state.report(&messages::UPDATE_PRODUCT, &e),
                }
            });
        }
    };

    let toggle_top = {
        let state = state.clone();
        move |product: Product| {
            let state = state.clone();
            spawn_local(async move {
                match state.api.set_top_seller(product.id, !product.top_seller).await {
                    Ok(saved) => products.update(|list| {
                        if let Some(p) = list.iter_mut().find(|p| p.id == saved.id) {
                            p.top_seller = saved.top_seller;
                        }
                    }),
                    Err(e) => state.report(&messages::TOGGLE_TOP_SELLER, &e),
                }
            });
        }
    };

    let confirm_delete = {
        let state = state.clone();
        move |_| {
            let Some(product) = deleting.get_untracked() else {
                return;
            };
            let state = state.clone();
            spawn_local(async move {
                match state.api.delete_product(product.id).await {
                    Ok(()) => {
                        products.update(|list| list.retain(|p| p.id != product.id));
                        state.show_success("Producto eliminado.");
                    }
                    Err(e) => state.report(&messages::DELETE_PRODUCT, &e),
                }
                deleting.set(None);
            });
        }
    };

    let stats = move || products.with(|list| kpis(list));

    let rows = move || {
        let admin = is_admin();
        let thresholds = show_thresholds.get();
        let visible: Vec<Product> = products.with(|list| {
            filter.with(|f| f.apply(list).into_iter().cloned().collect())
        });
        if visible.is_empty() {
            return view! {
                <tr><td colspan="10" class="py-3 text-gray-500">"Sin productos"</td></tr>
            }
            .into_view();
        }
        visible
            .into_iter()
            .map(|product| {
                let id = product.id;
                let is_editing = move || editing.with(|e| matches!(e, Some((eid, _)) if *eid == id));
                let status = stock_status(&product);
                let save = save.clone();
                let toggle_top = toggle_top.clone();
                let for_edit = product.clone();
                let for_top = product.clone();
                let for_delete = product.clone();
                view! {
                    <tr class="border-t border-gray-700">
                        <td>{product.code.clone()}</td>
                        <td>
                            {
                                let name = product.name.clone();
                                move || if is_editing() {
                                    edit_input(editing, NAME, "text").into_view()
                                } else {
                                    name.clone().into_view()
                                }
                            }
                        </td>
                        <td>{product.category_name.clone().unwrap_or_else(|| "-".to_string())}</td>
                        <td class="text-right">
                            {
                                let price = format_clp(product.price);
                                move || if is_editing() {
                                    edit_input(editing, PRICE, "number").into_view()
                                } else {
                                    price.clone().into_view()
                                }
                            }
                        </td>
                        <td class="text-center">
                            {
                                let stock = product.stock;
                                move || if is_editing() {
                                    edit_input(editing, STOCK, "number").into_view()
                                } else {
                                    stock.into_view()
                                }
                            }
                        </td>
                        {thresholds.then(|| {
                            let min = min_threshold(&product);
                            let critical = critical_threshold(&product);
                            view! {
                                <td class="text-center">
                                    {move || if is_editing() {
                                        edit_input(editing, MIN, "number").into_view()
                                    } else {
                                        min.into_view()
                                    }}
                                </td>
                                <td class="text-center">
                                    {move || if is_editing() {
                                        edit_input(editing, CRITICAL, "number").into_view()
                                    } else {
                                        critical.into_view()
                                    }}
                                </td>
                            }
                        })}
                        <td class="text-center">
                            <span class=format!("px-2 py-0.5 rounded text-xs {}", status_class(status))>
                                {status.label()}
                            </span>
                        </td>
                        <td class="text-center">
                            <button
                                disabled=!admin
                                on:click=move |_| toggle_top(for_top.clone())
                                class="disabled:opacity-60"
                            >
                                {if product.top_seller { "⭐" } else { "☆" }}
                            </button>
                        </td>
                        {admin.then(|| view! {
                            <td class="text-right space-x-1 whitespace-nowrap">
                                {move || if is_editing() {
                                    let save = save.clone();
                                    view! {
                                        <button on:click=move |_| save() class="px-2 py-1 bg-amber-600 rounded">"Guardar"</button>
                                        <button on:click=move |_| editing.set(None) class="px-2 py-1 bg-gray-600 rounded">"Cancelar"</button>
                                    }.into_view()
                                } else {
                                    let for_edit = for_edit.clone();
                                    let for_delete = for_delete.clone();
                                    view! {
                                        <button
                                            on:click=move |_| editing.set(Some((for_edit.id, ProductForm::from_product(&for_edit))))
                                            class="px-2 py-1 bg-gray-700 hover:bg-gray-600 rounded"
                                        >
                                            "Editar"
                                        </button>
                                        <button
                                            on:click=move |_| deleting.set(Some(for_delete.clone()))
                                            class="px-2 py-1 bg-red-700 hover:bg-red-600 rounded"
                                        >
                                            "Eliminar"
                                        </button>
                                    }.into_view()
                                }}
                            </td>
                        })}
                    </tr>
                }
            })
            .collect_view()
    };

    let reload = load;

    view! {
        <div class="space-y-6">
            <div class="flex items-center justify-between">
                <div>
                    <h1 class="text-3xl font-bold">"Gestión de Inventario"</h1>
                    <p class="text-gray-400 mt-1">"Stock, precios y umbrales por producto"</p>
                </div>
                <button on:click=move |_| reload() class="px-4 py-2 bg-gray-700 hover:bg-gray-600 rounded-lg">
                    "Actualizar"
                </button>
            </div>

            <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                <KpiCard label="Productos" value=Signal::derive(move || stats().products.to_string()) />
                <KpiCard label="Unidades" value=Signal::derive(move || stats().units.to_string()) />
                <KpiCard label="Stock bajo" value=Signal::derive(move || stats().low.to_string()) accent="text-red-400" />
            </div>

            <div class="flex flex-wrap items-center gap-4">
                <input
                    placeholder="Buscar por nombre, código o categoría…"
                    prop:value=move || filter.with(|f| f.needle.clone())
                    on:input=move |ev| filter.update(|f| f.needle = event_target_value(&ev))
                    class="flex-1 bg-gray-700 rounded-lg px-4 py-2 border border-gray-600"
                />
                <select
                    on:change=move |ev| filter.update(|f| f.category = event_target_value(&ev).parse().ok())
                    class="bg-gray-700 rounded-lg px-3 py-2 border border-gray-600"
                >
                    <option value="">"Todas las categorías"</option>
                    {move || categories.get().into_iter().map(|c| view! {
                        <option value=c.id.to_string()>{c.name}</option>
                    }).collect_view()}
                </select>
                <label class="flex items-center space-x-2 text-sm">
                    <input
                        type="checkbox"
                        prop:checked=move || filter.with(|f| f.only_low)
                        on:change=move |ev| filter.update(|f| f.only_low = event_target_checked(&ev))
                    />
                    <span>"Solo stock bajo"</span>
                </label>
                <label class="flex items-center space-x-2 text-sm">
                    <input
                        type="checkbox"
                        prop:checked=move || show_thresholds.get()
                        on:change=move |ev| set_show_thresholds.set(event_target_checked(&ev))
                    />
                    <span>"Mostrar umbrales"</span>
                </label>
            </div>

            <section class="bg-gray-800 rounded-xl p-4 overflow-x-auto">
                {move || loading.get().then(|| view! { <Loading /> })}
                <table class="w-full text-sm">
                    <thead class="text-gray-400">
                        <tr>
                            <th class="text-left">"SKU"</th>
                            <th class="text-left">"Producto"</th>
                            <th class="text-left">"Categoría"</th>
                            <th class="text-right">"Precio"</th>
                            <th>"Stock"</th>
                            {move || show_thresholds.get().then(|| view! { <th>"Mín"</th><th>"Crítico"</th> })}
                            <th>"Estado"</th>
                            <th>"Top"</th>
                            {move || is_admin().then(|| view! { <th class="text-right">"Acciones"</th> })}
                        </tr>
                    </thead>
                    <tbody>{rows}</tbody>
                </table>
            </section>

            {move || deleting.get().map(|product| {
                let confirm_delete = confirm_delete.clone();
                view! {
                    <div class="fixed inset-0 z-40 bg-black/60 flex items-center justify-center">
                        <div class="bg-gray-800 rounded-xl p-6 w-96 space-y-4 border border-gray-700">
                            <h3 class="text-lg font-semibold">"Eliminar producto"</h3>
                            <p class="text-sm text-gray-300">
                                {format!("¿Seguro que deseas eliminar \"{}\" ({})?", product.name, product.code)}
                            </p>
                            <div class="flex justify-end space-x-2">
                                <button on:click=move |_| deleting.set(None) class="px-4 py-2 bg-gray-600 rounded-lg">
                                    "Cancelar"
                                </button>
                                <button on:click=confirm_delete class="px-4 py-2 bg-red-700 hover:bg-red-600 rounded-lg">
                                    "Eliminar"
                                </button>
                            </div>
                        </div>
                    </div>
                }
            })}
        </div>
    }
}

/// Input bound to one field of the row being edited
fn edit_input(editing: RwSignal<Option<(Id, ProductForm)>>, field: FormField, kind: &'static str) -> impl IntoView {
    let (get, set) = field;
    view! {
        <input
            type=kind
            prop:value=move || editing.with(|e| e.as_ref().map(|(_, f)| get(f)).unwrap_or_default())
            on:input=move |ev| {
                let value = event_target_value(&ev);
                editing.update(|e| {
                    if let Some((_, form)) = e {
                        set(form, value);
                    }
                });
            }
            class="w-24 bg-gray-700 rounded px-2 py-1 border border-gray-600"
        />
    }
}
