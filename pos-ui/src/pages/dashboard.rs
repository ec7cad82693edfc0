//! Dashboard Page
//!
//! Sales KPIs and charts for a date range, refreshed every few seconds and
//! whenever the window regains focus.

use chrono::{Local, NaiveDate};
use gloo_timers::callback::Interval;
use leptos::*;
use pos_client::cash::open_session;
use pos_client::dashboard::{DashboardInput, DashboardMetrics, DateRange, REFRESH_INTERVAL_MS};
use pos_client::messages;
use pos_client::money::{format_clp, format_number};
use pos_client::{CashSession, Category, Product, Sale};

use crate::components::{Chart, ChartKind, InlineLoading, KpiCard};
use crate::state::global::GlobalState;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[component]
pub fn Dashboard() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let sales = create_rw_signal(Vec::<Sale>::new());
    let products = create_rw_signal(Vec::<Product>::new());
    let categories = create_rw_signal(Vec::<Category>::new());
    let sessions = create_rw_signal(Vec::<CashSession>::new());
    let (loading, set_loading) = create_signal(false);
    let range = create_rw_signal(DateRange::default_for(Local::now().date_naive()));

    let load = {
        let state = state.clone();
        move || {
            if loading.get_untracked() {
                return;
            }
            let state = state.clone();
            set_loading.set(true);
            spawn_local(async move {
                let fetched = async {
                    let s = state.api.list_sales().await?;
                    let p = state.api.list_products().await?;
                    let c = state.api.list_categories().await?;
                    let k = state.api.list_cash_sessions().await?;
                    Ok::<_, pos_client::ApiError>((s, p, c, k))
                }
                .await;
                match fetched {
                    Ok((s, p, c, k)) => {
                        sales.set(s);
                        products.set(p);
                        categories.set(c);
                        sessions.set(k);
                    }
                    Err(e) => state.report(&messages::LOAD_DASHBOARD, &e),
                }
                set_loading.set(false);
            });
        }
    };
    load();

    let tick = load.clone();
    let interval = Interval::new(REFRESH_INTERVAL_MS, move || tick());
    let refocus = load.clone();
    let focus = window_event_listener(ev::focus, move |_| refocus());
    on_cleanup(move || {
        drop(interval);
        focus.remove();
    });

    let metrics = create_memo(move |_| {
        let range = range.get();
        sales.with(|sales| {
            products.with(|products| {
                categories.with(|categories| {
                    sessions.with(|sessions| {
                        let input = DashboardInput {
                            sales,
                            products,
                            categories,
                            open_session: open_session(sessions),
                        };
                        DashboardMetrics::compute(input, range, &Local)
                    })
                })
            })
        })
    });

    let set_bound = {
        let state = state.clone();
        move |value: String, is_from: bool| {
            let Ok(day) = NaiveDate::parse_from_str(&value, DATE_FORMAT) else {
                return;
            };
            let current = range.get_untracked();
            let next = if is_from {
                DateRange::try_new(day, current.to)
            } else {
                DateRange::try_new(current.from, day)
            };
            match next {
                Some(next) => range.set(next),
                None => state.show_error("La fecha inicial debe ser anterior a la final."),
            }
        }
    };
    let set_from = set_bound.clone();
    let set_to = set_bound;

    let since_open_hint = move || {
        metrics.with(|m| match m.since_open {
            Some(open) => format!("{} tickets desde la apertura", open.tickets),
            None => "Caja cerrada".to_string(),
        })
    };

    view! {
        <div class="space-y-6">
            <div class="flex flex-wrap items-center justify-between gap-4">
                <div>
                    <h1 class="text-3xl font-bold">"Dashboard"</h1>
                    <p class="text-gray-400 mt-1">
                        "Ventas OK del período"
                        {move || loading.get().then(|| view! { <span class="ml-2"><InlineLoading /></span> })}
                    </p>
                </div>
                <div class="flex items-center space-x-2 text-sm">
                    <label>"Desde"</label>
                    <input
                        type="date"
                        prop:value=move || range.with(|r| r.from.format(DATE_FORMAT).to_string())
                        on:change=move |ev| set_from(event_target_value(&ev), true)
                        class="bg-gray-700 rounded-lg px-3 py-2 border border-gray-600"
                    />
                    <label>"Hasta"</label>
                    <input
                        type="date"
                        prop:value=move || range.with(|r| r.to.format(DATE_FORMAT).to_string())
                        on:change=move |ev| set_to(event_target_value(&ev), false)
                        class="bg-gray-700 rounded-lg px-3 py-2 border border-gray-600"
                    />
                </div>
            </div>

            <div class="grid grid-cols-2 lg:grid-cols-5 gap-4">
                <KpiCard label="Ventas" value=Signal::derive(move || metrics.with(|m| format_clp(m.total))) accent="text-amber-400" />
                <KpiCard label="Tickets" value=Signal::derive(move || metrics.with(|m| m.tickets.to_string())) />
                <KpiCard label="Unidades" value=Signal::derive(move || metrics.with(|m| format_number(m.units.into()))) />
                <KpiCard label="Categoría top" value=Signal::derive(move || metrics.with(|m| m.top_category.clone())) />
                <KpiCard
                    label="Desde apertura de caja"
                    value=Signal::derive(move || metrics.with(|m| {
                        m.since_open.map(|o| format_clp(o.total)).unwrap_or_else(|| "-".to_string())
                    }))
                    hint=Signal::derive(since_open_hint)
                />
            </div>

            <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
                <Chart title="Ventas por día" points=Signal::derive(move || metrics.with(|m| m.by_day.clone())) kind=ChartKind::Line />
                <Chart title="Ventas por mes" points=Signal::derive(move || metrics.with(|m| m.by_month.clone())) />
                <Chart title="Por método de pago" points=Signal::derive(move || metrics.with(|m| m.by_payment.clone())) />
                <Chart title="Por categoría" points=Signal::derive(move || metrics.with(|m| m.by_category.clone())) />
            </div>

            <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
                <section class="bg-gray-800 rounded-xl p-4">
                    <h2 class="text-lg font-semibold mb-2">"Stock bajo"</h2>
                    <table class="w-full text-sm">
                        <thead class="text-gray-400">
                            <tr><th class="text-left">"Producto"</th><th class="text-right">"Stock"</th></tr>
                        </thead>
                        <tbody>
                            {move || metrics.with(|m| m.low_stock.iter().map(|p| view! {
                                <tr class="border-t border-gray-700">
                                    <td>{format!("{} ({})", p.name, p.code)}</td>
                                    <td class="text-right text-red-400">{p.stock}</td>
                                </tr>
                            }).collect_view())}
                        </tbody>
                    </table>
                </section>

                <section class="bg-gray-800 rounded-xl p-4">
                    <h2 class="text-lg font-semibold mb-2">"Últimas ventas"</h2>
                    <table class="w-full text-sm">
                        <thead class="text-gray-400">
                            <tr>
                                <th class="text-left">"#"</th>
                                <th>"Fecha"</th>
                                <th>"Método"</th>
                                <th class="text-right">"Total"</th>
                            </tr>
                        </thead>
                        <tbody>
                            {move || metrics.with(|m| m.recent.iter().map(|s| view! {
                                <tr class="border-t border-gray-700">
                                    <td>{s.id}</td>
                                    <td class="text-center">
                                        {s.created_at.with_timezone(&Local).format("%d/%m %H:%M").to_string()}
                                    </td>
                                    <td class="text-center">{s.payment_method.label().to_string()}</td>
                                    <td class="text-right">{format_clp(s.total)}</td>
                                </tr>
                            }).collect_view())}
                        </tbody>
                    </table>
                </section>
            </div>
        </div>
    }
}
