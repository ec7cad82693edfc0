//! Sales of the Day Page
//!
//! Today's tickets with their items on demand, and voiding.

use chrono::Local;
use leptos::*;
use pos_client::messages;
use pos_client::models::{Id, Sale, SaleItem, SaleStatus};
use pos_client::money::format_clp;
use pos_client::sales_day::{day_total, item_totals, line_total, sales_on};
use std::collections::{HashMap, HashSet};

use crate::browser;
use crate::components::Loading;
use crate::state::global::GlobalState;

#[component]
pub fn SalesToday() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let sales = create_rw_signal(Vec::<Sale>::new());
    let (loading, set_loading) = create_signal(false);
    let (only_ok, set_only_ok) = create_signal(true);
    let expanded = create_rw_signal(HashSet::<Id>::new());
    // `None` while the detail request is in flight
    let items = create_rw_signal(HashMap::<Id, Option<Vec<SaleItem>>>::new());

    let load = {
        let state = state.clone();
        move || {
            let state = state.clone();
            set_loading.set(true);
            spawn_local(async move {
                match state.api.list_sales().await {
                    Ok(list) => sales.set(list),
                    Err(e) => {
                        state.report(&messages::LOAD_SALES, &e);
                        sales.set(Vec::new());
                    }
                }
                set_loading.set(false);
            });
        }
    };
    load();

    let toggle = {
        let state = state.clone();
        move |id: Id| {
            let mut opened = false;
            expanded.update(|set| {
                opened = set.insert(id);
                if !opened {
                    set.remove(&id);
                }
            });
            if !opened || items.with(|m| m.contains_key(&id)) {
                return;
            }
            items.update(|m| {
                m.insert(id, None);
            });
            let api = state.api.clone();
            spawn_local(async move {
                let loaded = match api.get_sale(id).await {
                    Ok(sale) => sale.items,
                    Err(e) => {
                        browser::log_error("Failed to load sale items", &e);
                        Vec::new()
                    }
                };
                items.update(|m| {
                    m.insert(id, Some(loaded));
                });
            });
        }
    };

    let void = {
        let state = state.clone();
        let load = load.clone();
        move |id: Id| {
            let Some(reason) = browser::prompt("Motivo de anulación:") else {
                return;
            };
            let state = state.clone();
            let load = load.clone();
            spawn_local(async move {
                match state.api.void_sale(id, &reason).await {
                    Ok(_) => {
                        state.show_success("Venta anulada.");
                        items.update(|m| {
                            m.remove(&id);
                        });
                        load();
                    }
                    Err(e) => state.report(&messages::VOID_SALE, &e),
                }
            });
        }
    };

    let today = Local::now().date_naive();
    let visible = move || {
        sales.with(|all| {
            sales_on(all, today, &Local, only_ok.get())
                .into_iter()
                .cloned()
                .collect::<Vec<Sale>>()
        })
    };
    let total = move || {
        let shown = visible();
        let refs: Vec<&Sale> = shown.iter().collect();
        format_clp(day_total(&refs))
    };

    let reload = load.clone();

    view! {
        <div class="space-y-6">
            <div class="flex flex-wrap items-center justify-between gap-4">
                <h1 class="text-3xl font-bold">"Ventas del día"</h1>
                <div class="flex items-center space-x-4">
                    <label class="flex items-center space-x-2 text-sm">
                        <input
                            type="checkbox"
                            prop:checked=move || only_ok.get()
                            on:change=move |ev| set_only_ok.set(event_target_checked(&ev))
                        />
                        <span>"Mostrar solo ventas OK"</span>
                    </label>
                    <button
                        on:click=move |_| reload()
                        disabled=move || loading.get()
                        class="px-4 py-2 bg-gray-700 hover:bg-gray-600 disabled:bg-gray-800 rounded-lg"
                    >
                        {move || if loading.get() { "Actualizando..." } else { "Actualizar" }}
                    </button>
                </div>
            </div>

            <h2 class="text-xl text-amber-400">{move || format!("Total del día: {}", total())}</h2>

            <section class="bg-gray-800 rounded-xl p-4 overflow-x-auto">
                <table class="w-full text-sm">
                    <thead class="text-gray-400">
                        <tr>
                            <th></th>
                            <th class="text-left">"#"</th>
                            <th>"Hora"</th>
                            <th>"Vendedor"</th>
                            <th>"Método"</th>
                            <th>"Estado"</th>
                            <th class="text-right">"Total"</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || {
                            let rows = visible();
                            if rows.is_empty() && !loading.get() {
                                return view! {
                                    <tr><td colspan="8" class="py-3 text-gray-500">"Sin ventas hoy"</td></tr>
                                }.into_view();
                            }
                            rows.into_iter().map(|sale| {
                                let id = sale.id;
                                let toggle = toggle.clone();
                                let void = void.clone();
                                let is_open = move || expanded.with(|set| set.contains(&id));
                                view! {
                                    <tr class="border-t border-gray-700">
                                        <td class="w-10">
                                            <button
                                                on:click=move |_| toggle(id)
                                                class="px-2 bg-gray-700 hover:bg-gray-600 rounded"
                                            >
                                                {move || if is_open() { "−" } else { "+" }}
                                            </button>
                                        </td>
                                        <td>{id}</td>
                                        <td class="text-center">
                                            {sale.created_at.with_timezone(&Local).format("%H:%M:%S").to_string()}
                                        </td>
                                        <td class="text-center">{sale.seller_name.clone().unwrap_or_else(|| "-".to_string())}</td>
                                        <td class="text-center">{sale.payment_method.label().to_string()}</td>
                                        <td class="text-center">{if sale.is_ok() { "OK" } else { "VOID" }}</td>
                                        <td class="text-right">{format_clp(sale.total)}</td>
                                        <td class="text-right">
                                            {if sale.status == SaleStatus::Ok {
                                                view! {
                                                    <button
                                                        on:click=move |_| void(id)
                                                        class="px-3 py-1 bg-red-700 hover:bg-red-600 rounded"
                                                    >
                                                        "Anular"
                                                    </button>
                                                }.into_view()
                                            } else {
                                                view! { <em class="text-gray-500">"Anulada"</em> }.into_view()
                                            }}
                                        </td>
                                    </tr>
                                    {move || is_open().then(|| view! {
                                        <tr>
                                            <td colspan="8" class="bg-gray-900/40">
                                                <SaleItems items=Signal::derive(move || items.with(|m| m.get(&id).cloned().flatten())) />
                                            </td>
                                        </tr>
                                    })}
                                }
                            }).collect_view()
                        }}
                    </tbody>
                </table>
            </section>
        </div>
    }
}

/// Expanded ticket detail
#[component]
fn SaleItems(items: Signal<Option<Vec<SaleItem>>>) -> impl IntoView {
    move || match items.get() {
        None => view! { <Loading /> }.into_view(),
        Some(list) if list.is_empty() => {
            view! { <p class="p-2 text-gray-500">"Sin ítems"</p> }.into_view()
        }
        Some(list) => {
            let totals = item_totals(&list);
            view! {
                <table class="w-full text-sm m-2">
                    <thead class="text-gray-400">
                        <tr>
                            <th class="text-left">"Producto"</th>
                            <th>"Cant."</th>
                            <th class="text-right">"Precio"</th>
                            <th class="text-right">"Desc."</th>
                            <th class="text-right">"Total"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {list.iter().map(|item| {
                            let name = item
                                .product_name
                                .clone()
                                .or_else(|| item.product_code.clone())
                                .unwrap_or_else(|| format!("#{}", item.product));
                            view! {
                                <tr>
                                    <td>{name}</td>
                                    <td class="text-center">{item.qty}</td>
                                    <td class="text-right">{format_clp(item.unit_price)}</td>
                                    <td class="text-right">{format_clp(item.discount)}</td>
                                    <td class="text-right">{format_clp(line_total(item))}</td>
                                </tr>
                            }
                        }).collect_view()}
                    </tbody>
                </table>
                <div class="text-right text-sm pr-2 pb-2 space-x-4">
                    <span>{format!("Descuento: {}", format_clp(totals.discount))}</span>
                    <strong>{format!("Neto: {}", format_clp(totals.net))}</strong>
                </div>
            }
            .into_view()
        }
    }
}
