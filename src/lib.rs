//! # POS Client
//!
//! Client side of a retail point-of-sale system: a typed REST client for the
//! POS backend plus the view logic of every page of the web front end.
//!
//! The crate has no browser dependencies. The Leptos UI in `pos-ui/` plugs
//! in a gloo-net [`api::Transport`] and a `localStorage` [`api::TokenStore`];
//! the `pos` CLI uses reqwest and a JSON file.
//!
//! ## Modules
//!
//! - [`api`]: REST client with bearer auth and one refresh-on-401 retry
//! - [`models`]: Backend resources (products, sales, cash sessions, ...)
//! - [`messages`]: HTTP failure to user message mapping
//! - [`cart`]: Point-of-sale cart and totals
//! - [`inventory`]: Stock status, KPIs and product forms
//! - [`sales_day`]: Sales of one calendar day
//! - [`dashboard`]: Sales metrics computed from raw lists
//! - [`cash`], [`promotions`], [`users`], [`audit`]: Page rules and filters
//! - [`routes`]: Page paths and access guards
//! - [`scanner`]: Barcode scanner tuning
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pos_client::api::{ApiClient, FileTokenStore, ReqwestTransport};
//! use pos_client::cart::Cart;
//! use pos_client::models::PaymentMethod;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = ReqwestTransport::new(std::time::Duration::from_secs(15))?;
//!     let api = ApiClient::new(
//!         "http://localhost:8000/api",
//!         transport,
//!         FileTokenStore::new(FileTokenStore::default_path()),
//!     );
//!     api.login("caja1", "secret").await?;
//!
//!     let mut cart = Cart::new();
//!     for product in api.search_products("leche").await?.iter().take(1) {
//!         cart.add(product);
//!     }
//!
//!     let preview = api.preview_sale(&cart.preview_request()).await?;
//!     println!("Total a cobrar: {}", preview.total_neto);
//!
//!     api.checkout(&cart.checkout_request(PaymentMethod::Cash)).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod audit;
pub mod cart;
pub mod cash;
pub mod dashboard;
pub mod inventory;
pub mod messages;
pub mod models;
pub mod money;
pub mod promotions;
pub mod routes;
pub mod sales_day;
pub mod scanner;
pub mod users;

#[cfg(not(target_arch = "wasm32"))]
pub mod config;

pub use api::{ApiClient, ApiError, ApiResult, MemoryTokenStore, TokenStore, Transport};
pub use cart::{Cart, CartLine, CartTotals, PricedLine};
pub use messages::ErrorMessages;
pub use models::{
    AuditEvent, CashSession, Category, Id, Me, PaymentMethod, Product, Promotion,
    PromotionKind, Role, Sale, SalePreview, User,
};
pub use routes::{resolve_access, Access, Guard, Route};

#[cfg(not(target_arch = "wasm32"))]
pub use config::ClientConfig;
