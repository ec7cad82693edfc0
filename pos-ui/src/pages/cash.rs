//! Cash Drawer Page
//!
//! Opening and closing the drawer, plus the session history. Sellers
//! confirm both operations with the supervisor PIN.

use chrono::Local;
use leptos::*;
use pos_client::cash::{check_pin, open_session, parse_closing, parse_opening, require_open, DEFAULT_SELLER_PIN};
use pos_client::messages;
use pos_client::models::CashSession;
use pos_client::money::format_clp;

use crate::components::PinModal;
use crate::state::global::GlobalState;

/// PIN baked in at build time, else the default
fn seller_pin() -> &'static str {
    option_env!("POS_SELLER_PIN").unwrap_or(DEFAULT_SELLER_PIN)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DrawerAction {
    Open,
    Close,
}

impl DrawerAction {
    fn title(self) -> &'static str {
        match self {
            DrawerAction::Open => "Abrir caja",
            DrawerAction::Close => "Cerrar caja",
        }
    }
}

#[component]
pub fn Cash() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let sessions = create_rw_signal(Vec::<CashSession>::new());
    let (loading, set_loading) = create_signal(false);
    let (opening, set_opening) = create_signal(String::new());
    let (closing, set_closing) = create_signal(String::new());
    let pending = create_rw_signal(None::<DrawerAction>);

    let load = {
        let state = state.clone();
        move || {
            let state = state.clone();
            set_loading.set(true);
            spawn_local(async move {
                match state.api.list_cash_sessions().await {
                    Ok(list) => sessions.set(list),
                    Err(e) => state.report(&messages::LOAD_CASH, &e),
                }
                set_loading.set(false);
            });
        }
    };
    load();

    let is_open = move || sessions.with(|s| open_session(s).is_some());

    // Runs the operation once validated (and PIN-confirmed for sellers)
    let run = {
        let state = state.clone();
        let load = load.clone();
        move |action: DrawerAction| {
            let state = state.clone();
            let load = load.clone();
            match action {
                DrawerAction::Open => {
                    let amount = match parse_opening(&opening.get_untracked()) {
                        Ok(amount) => amount,
                        Err(e) => return state.show_error(&e.to_string()),
                    };
                    spawn_local(async move {
                        match state.api.open_cash(amount).await {
                            Ok(_) => {
                                set_opening.set(String::new());
                                state.show_success("Caja abierta correctamente.");
                                load();
                            }
                            Err(e) => state.report(&messages::OPEN_CASH, &e),
                        }
                    });
                }
                DrawerAction::Close => {
                    let session_id = match sessions.with_untracked(|s| require_open(s).map(|s| s.id)) {
                        Ok(id) => id,
                        Err(e) => return state.show_error(&e.to_string()),
                    };
                    let amount = match parse_closing(&closing.get_untracked()) {
                        Ok(amount) => amount,
                        Err(e) => return state.show_error(&e.to_string()),
                    };
                    spawn_local(async move {
                        match state.api.close_cash(session_id, amount).await {
                            Ok(receipt) => {
                                set_closing.set(String::new());
                                state.show_success(&format!(
                                    "Caja cerrada correctamente. Diferencia: {}",
                                    format_clp(receipt.diff)
                                ));
                                load();
                            }
                            Err(e) => state.report(&messages::CLOSE_CASH, &e),
                        }
                    });
                }
            }
        }
    };

    let request = {
        let state = state.clone();
        let run = run.clone();
        move |action: DrawerAction| {
            state.clear_messages();
            if state.is_seller() {
                pending.set(Some(action));
            } else {
                run(action);
            }
        }
    };

    let on_pin = {
        let state = state.clone();
        let run = run.clone();
        Callback::new(move |pin: String| {
            let Some(action) = pending.get_untracked() else {
                return;
            };
            pending.set(None);
            match check_pin(&pin, seller_pin()) {
                Ok(()) => run(action),
                Err(e) => state.show_error(&e.to_string()),
            }
        })
    };
    let on_cancel = Callback::new(move |_: ()| pending.set(None));

    let request_open = request.clone();
    let submit_open = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        request_open(DrawerAction::Open);
    };
    let request_close = request;
    let submit_close = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        request_close(DrawerAction::Close);
    };

    let seller_hint = {
        let state = state.clone();
        move || {
            state.is_seller().then(|| view! {
                <small class="text-gray-500">"Se solicitará contraseña al confirmar."</small>
            })
        }
    };
    let seller_hint_close = seller_hint.clone();
    let reload = load;

    view! {
        <div class="space-y-6">
            <h1 class="text-3xl font-bold">"Caja"</h1>

            <div class="text-lg">
                {move || sessions.with(|s| match open_session(s) {
                    Some(open) => format!(
                        "Caja abierta #{} por {} con {}",
                        open.id,
                        open.opened_by_display(),
                        format_clp(open.opening_amount)
                    ),
                    None => "No hay caja abierta.".to_string(),
                })}
            </div>

            <div class="grid grid-cols-1 md:grid-cols-2 gap-6">
                <form on:submit=submit_open class="bg-gray-800 rounded-xl p-6 space-y-3">
                    <h2 class="text-xl font-semibold">"Abrir caja"</h2>
                    <label class="block text-sm text-gray-400">"Monto de apertura"</label>
                    <input
                        type="number"
                        min="0"
                        step="1"
                        prop:value=move || opening.get()
                        on:input=move |ev| set_opening.set(event_target_value(&ev))
                        class="w-full bg-gray-700 rounded-lg px-4 py-2 border border-gray-600"
                    />
                    <button
                        type="submit"
                        disabled=is_open
                        class="px-4 py-2 bg-amber-600 hover:bg-amber-700 disabled:bg-gray-700 rounded-lg"
                    >
                        "Abrir"
                    </button>
                    {seller_hint}
                </form>

                <form on:submit=submit_close class="bg-gray-800 rounded-xl p-6 space-y-3">
                    <h2 class="text-xl font-semibold">"Cerrar caja"</h2>
                    <label class="block text-sm text-gray-400">"Monto de cierre"</label>
                    <input
                        type="number"
                        min="0"
                        step="1"
                        prop:value=move || closing.get()
                        on:input=move |ev| set_closing.set(event_target_value(&ev))
                        class="w-full bg-gray-700 rounded-lg px-4 py-2 border border-gray-600"
                    />
                    <button
                        type="submit"
                        disabled=move || !is_open()
                        class="px-4 py-2 bg-amber-600 hover:bg-amber-700 disabled:bg-gray-700 rounded-lg"
                    >
                        "Cerrar"
                    </button>
                    {seller_hint_close}
                </form>
            </div>

            <section class="bg-gray-800 rounded-xl p-4 overflow-x-auto">
                <div class="flex items-center justify-between mb-3">
                    <h2 class="text-xl font-semibold">"Historial de sesiones"</h2>
                    <button
                        on:click=move |_| reload()
                        disabled=move || loading.get()
                        class="px-4 py-2 bg-gray-700 hover:bg-gray-600 rounded-lg"
                    >
                        {move || if loading.get() { "Actualizando..." } else { "Actualizar" }}
                    </button>
                </div>
                <table class="w-full text-sm">
                    <thead class="text-gray-400">
                        <tr>
                            <th class="text-left">"#"</th>
                            <th>"Estado"</th>
                            <th>"Apertura"</th>
                            <th>"Cierre"</th>
                            <th class="text-right">"Monto apertura"</th>
                            <th class="text-right">"Monto cierre"</th>
                            <th class="text-right">"Diferencia"</th>
                            <th>"Abierta por"</th>
                            <th>"Cerrada por"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || sessions.get().into_iter().map(|s| {
                            let when = |t: chrono::DateTime<chrono::Utc>| {
                                t.with_timezone(&Local).format("%d/%m/%Y %H:%M").to_string()
                            };
                            let money = |v: Option<rust_decimal::Decimal>| v.map(format_clp).unwrap_or_else(|| "-".to_string());
                            view! {
                                <tr class="border-t border-gray-700">
                                    <td>{s.id}</td>
                                    <td class="text-center">{if s.is_open() { "OPEN" } else { "CLOSED" }}</td>
                                    <td class="text-center">{when(s.opened_at)}</td>
                                    <td class="text-center">{s.closed_at.map(when).unwrap_or_else(|| "-".to_string())}</td>
                                    <td class="text-right">{format_clp(s.opening_amount)}</td>
                                    <td class="text-right">{money(s.closing_amount)}</td>
                                    <td class="text-right">{money(s.diff)}</td>
                                    <td class="text-center">{s.opened_by_display()}</td>
                                    <td class="text-center">{s.closed_by_display()}</td>
                                </tr>
                            }
                        }).collect_view()}
                    </tbody>
                </table>
            </section>

            {move || pending.get().map(|action| view! {
                <PinModal
                    title=Signal::derive(move || action.title().to_string())
                    on_confirm=on_pin
                    on_cancel=on_cancel
                />
            })}
        </div>
    }
}
