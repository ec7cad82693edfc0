//! GranPirula POS
//!
//! Point-of-sale front end built with Leptos (WASM).
//!
//! # Pages
//!
//! - Point of sale with barcode scanning and promotion preview
//! - Sales of the day with voids, cash drawer sessions
//! - Stock, products, categories and promotions management
//! - Client-side sales dashboard, audit log, users and profile
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. All backend calls go through `pos_client::ApiClient`, with a
//! gloo-net transport and tokens kept in `localStorage`.

use leptos::*;

mod api;
mod app;
mod browser;
mod components;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
