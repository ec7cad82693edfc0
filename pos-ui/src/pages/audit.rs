//! Audit Log Page

use chrono::Local;
use leptos::*;
use pos_client::audit::{action_label, actor_display, changes_summary, known_actions, AuditFilter};
use pos_client::messages;
use pos_client::AuditEvent;

use crate::components::Loading;
use crate::state::global::GlobalState;

#[component]
pub fn Audit() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let events = create_rw_signal(Vec::<AuditEvent>::new());
    let (loading, set_loading) = create_signal(true);
    let filter = create_rw_signal(AuditFilter::default());

    let load = move || {
        let state = state.clone();
        set_loading.set(true);
        spawn_local(async move {
            match state.api.list_audit_events().await {
                Ok(list) => events.set(list),
                Err(e) => {
                    state.report(&messages::LOAD_AUDIT, &e);
                    events.set(Vec::new());
                }
            }
            set_loading.set(false);
        });
    };
    load();

    let rows = move || {
        let shown: Vec<AuditEvent> =
            events.with(|all| filter.with(|f| f.apply(all).into_iter().cloned().collect()));
        if shown.is_empty() {
            return view! {
                <tr><td colspan="6" class="py-3 text-gray-500">"Sin eventos"</td></tr>
            }
            .into_view();
        }
        shown
            .into_iter()
            .map(|event| {
                let when = event
                    .ts
                    .map(|t| t.with_timezone(&Local).format("%d/%m/%Y %H:%M:%S").to_string())
                    .unwrap_or_else(|| "-".to_string());
                view! {
                    <tr class="border-t border-gray-700 align-top">
                        <td class="whitespace-nowrap">{when}</td>
                        <td>{actor_display(&event)}</td>
                        <td>{action_label(&event.action).to_string()}</td>
                        <td>{event.model.clone()}</td>
                        <td>{event.obj_id.clone()}</td>
                        <td class="font-mono text-xs text-gray-400 break-all">{changes_summary(&event.changes)}</td>
                    </tr>
                }
            })
            .collect_view()
    };

    view! {
        <div class="space-y-6">
            <div class="flex items-center justify-between">
                <h1 class="text-3xl font-bold">"Bitácora"</h1>
                <button
                    on:click=move |_| load()
                    disabled=move || loading.get()
                    class="px-4 py-2 bg-gray-700 hover:bg-gray-600 rounded-lg"
                >
                    {move || if loading.get() { "Actualizando..." } else { "Actualizar" }}
                </button>
            </div>

            <div class="flex flex-wrap gap-4">
                <select
                    on:change=move |ev| filter.update(|f| f.action = event_target_value(&ev))
                    class="bg-gray-700 rounded-lg px-3 py-2 border border-gray-600"
                >
                    <option value="">"Todas las acciones"</option>
                    {move || events.with(|all| known_actions(all)).into_iter().map(|action| {
                        let label = action_label(&action).to_string();
                        let current = action.clone();
                        view! {
                            <option value=action selected=move || filter.with(|f| f.action == current)>
                                {label}
                            </option>
                        }
                    }).collect_view()}
                </select>
                <input
                    placeholder="Modelo (Sale, Product…)"
                    prop:value=move || filter.with(|f| f.model.clone())
                    on:input=move |ev| filter.update(|f| f.model = event_target_value(&ev))
                    class="bg-gray-700 rounded-lg px-3 py-2 border border-gray-600"
                />
                <input
                    placeholder="Buscar usuario, acción o id…"
                    prop:value=move || filter.with(|f| f.text.clone())
                    on:input=move |ev| filter.update(|f| f.text = event_target_value(&ev))
                    class="flex-1 bg-gray-700 rounded-lg px-3 py-2 border border-gray-600"
                />
            </div>

            <section class="bg-gray-800 rounded-xl p-4 overflow-x-auto">
                {move || loading.get().then(|| view! { <Loading /> })}
                <table class="w-full text-sm">
                    <thead class="text-gray-400">
                        <tr>
                            <th class="text-left">"Fecha"</th>
                            <th class="text-left">"Usuario"</th>
                            <th class="text-left">"Acción"</th>
                            <th class="text-left">"Modelo"</th>
                            <th class="text-left">"ID"</th>
                            <th class="text-left">"Cambios"</th>
                        </tr>
                    </thead>
                    <tbody>{rows}</tbody>
                </table>
            </section>
        </div>
    }
}
