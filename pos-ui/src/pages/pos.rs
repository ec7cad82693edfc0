//! Point of Sale Page
//!
//! Product search, barcode scanning, cart with promotion preview and
//! checkout.

use gloo_timers::callback::Timeout;
use leptos::*;
use pos_client::api::CodeLookup;
use pos_client::cart::{should_search, SEARCH_DEBOUNCE_MS};
use pos_client::messages;
use pos_client::money::format_clp;
use pos_client::{Cart, PaymentMethod, Product, SalePreview};

use crate::browser;
use crate::components::{BarcodeScanner, InlineLoading, ProductRow};
use crate::state::global::GlobalState;

const LOOKUP_MISS_MS: u32 = 3500;
const CHECKOUT_FAILED_MS: u32 = 4000;

#[component]
pub fn Pos() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let (query, set_query) = create_signal(String::new());
    let (found, set_found) = create_signal(Vec::<Product>::new());
    let (searching, set_searching) = create_signal(false);
    let (scanning, set_scanning) = create_signal(false);
    let cart = create_rw_signal(Cart::new());
    let preview = create_rw_signal(None::<SalePreview>);
    let (previewing, set_previewing) = create_signal(false);
    let (method, set_method) = create_signal(PaymentMethod::Cash);
    let (checking_out, set_checking_out) = create_signal(false);

    // Only the newest search / preview may write its result
    let search_seq = store_value(0u32);
    let preview_seq = store_value(0u32);

    let search_ref = create_node_ref::<html::Input>();
    let focus_search = move || {
        if let Some(input) = search_ref.get_untracked() {
            let _ = input.focus();
        }
    };
    search_ref.on_load(|input| {
        let _ = input.focus();
    });

    // Debounced search-as-you-type
    let api = state.api.clone();
    create_effect(move |_| {
        let q = query.get();
        search_seq.update_value(|n| *n += 1);
        let seq = search_seq.get_value();

        if !should_search(&q) {
            set_found.set(Vec::new());
            set_searching.set(false);
            return;
        }

        let api = api.clone();
        Timeout::new(SEARCH_DEBOUNCE_MS, move || {
            if search_seq.get_value() != seq {
                return;
            }
            set_searching.set(true);
            spawn_local(async move {
                let result = api.search_products(&q).await;
                if search_seq.get_value() != seq {
                    return;
                }
                match result {
                    Ok(products) => set_found.set(products),
                    Err(e) => {
                        browser::log_error("Search failed", &e);
                        set_found.set(Vec::new());
                    }
                }
                set_searching.set(false);
            });
        })
        .forget();
    });

    // Backend pricing of the cart, promotions included
    let api = state.api.clone();
    create_effect(move |_| {
        let current = cart.get();
        preview_seq.update_value(|n| *n += 1);
        let seq = preview_seq.get_value();

        if current.is_empty() {
            preview.set(None);
            set_previewing.set(false);
            return;
        }

        set_previewing.set(true);
        let request = current.preview_request();
        let api = api.clone();
        spawn_local(async move {
            let result = api.preview_sale(&request).await;
            if preview_seq.get_value() != seq {
                return;
            }
            match result {
                Ok(priced) => preview.set(Some(priced)),
                Err(e) => {
                    browser::log_error("Preview failed", &e);
                    preview.set(None);
                }
            }
            set_previewing.set(false);
        });
    });

    // Exact code lookup shared by Enter and the scanner
    let lookup = {
        let state = state.clone();
        move |code: String| {
            let code = code.trim().to_string();
            if code.is_empty() {
                return;
            }
            let state = state.clone();
            spawn_local(async move {
                match state.api.lookup_code(&code).await {
                    Ok(CodeLookup::Found(product)) => {
                        cart.update(|c| c.add(&product));
                        state.show_success(&format!("✅ {} agregado al carrito.", product.name));
                        set_query.set(String::new());
                        set_found.set(Vec::new());
                    }
                    Ok(CodeLookup::Candidates(products)) => {
                        set_found.set(products);
                        state.show_error_for(
                            &format!("⚠️ No encontramos productos con el código {}.", code),
                            LOOKUP_MISS_MS,
                        );
                    }
                    Err(e) => {
                        browser::log_error("Code lookup failed", &e);
                        state.show_error_for(
                            &format!("⚠️ No se pudo buscar el código {}.", code),
                            LOOKUP_MISS_MS,
                        );
                    }
                }
                focus_search();
            });
        }
    };

    let lookup_typed = lookup.clone();
    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        lookup_typed(query.get_untracked());
    };

    let on_scan = Callback::new(move |code: String| {
        set_scanning.set(false);
        lookup(code);
    });

    let on_add = Callback::new(move |product: Product| cart.update(|c| c.add(&product)));

    let checkout = {
        let state = state.clone();
        move |_| {
            let current = cart.get_untracked();
            if current.is_empty() {
                return;
            }
            let request = current.checkout_request(method.get_untracked());
            let state = state.clone();
            set_checking_out.set(true);
            spawn_local(async move {
                match state.api.checkout(&request).await {
                    Ok(_) => {
                        cart.set(Cart::new());
                        set_query.set(String::new());
                        set_found.set(Vec::new());
                        state.show_success("✅ Venta realizada con éxito.");
                    }
                    Err(e) => {
                        browser::log_error("Checkout failed", &e);
                        state.show_error_for(
                            &format!("❌ {}", messages::CHECKOUT.describe(&e)),
                            CHECKOUT_FAILED_MS,
                        );
                    }
                }
                set_checking_out.set(false);
            });
        }
    };

    let lines = move || {
        let priced = preview.with(|p| cart.with(|c| c.priced_lines(p.as_ref())));
        if priced.is_empty() {
            return view! { <li class="py-2 text-gray-500">"Sin ítems"</li> }.into_view();
        }
        priced
            .into_iter()
            .map(|line| {
                let id = line.line.product_id;
                view! {
                    <li class="flex items-center justify-between py-2 border-b border-dashed border-gray-700">
                        <div>
                            <div>
                                <strong>{line.line.name.clone()}</strong>
                                <small class="text-gray-400">{format!(" ({})", line.line.code)}</small>
                            </div>
                            <div class="text-sm text-gray-300">
                                {format!(
                                    "{} − {} × {} = ",
                                    format_clp(line.line.unit_price),
                                    format_clp(line.discount_unit),
                                    line.line.qty
                                )}
                                <strong>{format_clp(line.net_total)}</strong>
                                {line.promoted().then(|| view! {
                                    <span class="ml-2 text-emerald-400">"(promo)"</span>
                                })}
                            </div>
                        </div>
                        <div class="flex space-x-1">
                            <button
                                on:click=move |_| cart.update(|c| c.decrement(id))
                                class="px-3 py-1 bg-gray-700 hover:bg-gray-600 rounded"
                            >
                                "-"
                            </button>
                            <button
                                on:click=move |_| cart.update(|c| c.increment(id))
                                class="px-3 py-1 bg-gray-700 hover:bg-gray-600 rounded"
                            >
                                "+"
                            </button>
                            <button
                                on:click=move |_| cart.update(|c| c.remove(id))
                                class="px-3 py-1 bg-red-700 hover:bg-red-600 rounded text-sm"
                            >
                                "Quitar"
                            </button>
                        </div>
                    </li>
                }
            })
            .collect_view()
    };

    let totals = move || preview.with(|p| cart.with(|c| c.totals(p.as_ref())));

    view! {
        <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
            // Search
            <section class="bg-gray-800 rounded-xl p-6 space-y-4">
                <div class="flex items-center justify-between">
                    <h1 class="text-2xl font-bold">"Punto de Venta"</h1>
                    <button
                        on:click=move |_| set_scanning.update(|open| *open = !*open)
                        class="px-3 py-2 bg-gray-700 hover:bg-gray-600 rounded-lg text-sm"
                    >
                        {move || if scanning.get() { "Cerrar cámara" } else { "📷 Escanear" }}
                    </button>
                </div>

                {move || scanning.get().then(|| view! { <BarcodeScanner on_result=on_scan /> })}

                <form on:submit=on_submit>
                    <input
                        node_ref=search_ref
                        placeholder="Buscar por código o nombre (2+ letras)…"
                        prop:value=move || query.get()
                        on:input=move |ev| set_query.set(event_target_value(&ev))
                        class="w-full bg-gray-700 rounded-lg px-4 py-3 border border-gray-600 focus:border-amber-500 focus:outline-none"
                    />
                </form>

                {move || searching.get().then(|| view! {
                    <p class="text-sm text-gray-400"><InlineLoading />" Buscando…"</p>
                })}

                <ul class="max-h-96 overflow-auto">
                    {move || found.get().into_iter().map(|product| view! {
                        <ProductRow product=product on_add=on_add />
                    }).collect_view()}
                    {move || {
                        let empty = !searching.get() && found.with(Vec::is_empty) && should_search(&query.get());
                        empty.then(|| view! { <li class="py-2 text-gray-500">"No hay resultados"</li> })
                    }}
                </ul>
            </section>

            // Cart
            <section class="bg-gray-800 rounded-xl p-6 space-y-4">
                <h2 class="text-2xl font-bold">"Carrito"</h2>
                <ul>{lines}</ul>

                <div class="space-y-1">
                    <div>{move || format!("Subtotal: {}", format_clp(totals().subtotal))}</div>
                    <div>
                        {move || if previewing.get() {
                            "Descuento: …".to_string()
                        } else {
                            format!("Descuento: {}", format_clp(totals().discount))
                        }}
                    </div>
                    <h3 class="text-xl font-semibold text-amber-400">
                        {move || if previewing.get() {
                            "Total a cobrar: …".to_string()
                        } else {
                            format!("Total a cobrar: {}", format_clp(totals().total))
                        }}
                    </h3>
                </div>

                <div class="flex flex-wrap items-center justify-between gap-2">
                    <label class="flex items-center space-x-2">
                        <span>"Método de pago:"</span>
                        <select
                            on:change=move |ev| set_method.set(PaymentMethod::from_code(&event_target_value(&ev)))
                            class="bg-gray-700 rounded-lg px-3 py-2 border border-gray-600"
                        >
                            {PaymentMethod::CHECKOUT.iter().map(|m| {
                                let code = m.code().to_string();
                                let selected = m.clone();
                                view! {
                                    <option value=code selected=move || method.get() == selected>
                                        {m.label().to_string()}
                                    </option>
                                }
                            }).collect_view()}
                        </select>
                    </label>
                    <div class="flex space-x-2">
                        <button
                            on:click=checkout
                            disabled=move || cart.with(Cart::is_empty) || previewing.get() || checking_out.get()
                            class="px-4 py-2 bg-amber-600 hover:bg-amber-700 disabled:bg-gray-700 rounded-lg font-medium"
                        >
                            "Cobrar"
                        </button>
                        <button
                            on:click=move |_| cart.set(Cart::new())
                            disabled=move || cart.with(Cart::is_empty)
                            class="px-4 py-2 bg-gray-600 hover:bg-gray-500 disabled:bg-gray-700 rounded-lg"
                        >
                            "Limpiar carrito"
                        </button>
                    </div>
                </div>
            </section>
        </div>
    }
}
