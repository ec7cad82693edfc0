//! Search result row of the point of sale

use leptos::*;
use pos_client::money::format_clp;
use pos_client::Product;

#[component]
pub fn ProductRow(
    product: Product,
    #[prop(into)]
    on_add: Callback<Product>,
) -> impl IntoView {
    let price = format_clp(product.price);
    let label = format!("{} ({})", product.name, product.code);
    let stock = product.stock;

    view! {
        <li class="flex items-center justify-between py-2 border-b border-gray-700">
            <div>
                <div class="font-medium">{label}</div>
                <div class="text-xs text-gray-400">{format!("{} · stock {}", price, stock)}</div>
            </div>
            <button
                on:click=move |_| on_add.call(product.clone())
                class="px-3 py-1 bg-amber-600 hover:bg-amber-700 rounded-lg text-sm"
            >
                "Agregar"
            </button>
        </li>
    }
}
