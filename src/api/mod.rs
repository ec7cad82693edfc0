//! POS REST API Client
//!
//! Typed access to the POS backend, shared by the web UI and the CLI.
//!
//! # Endpoints
//!
//! ## Auth
//! - `POST /auth/login/` - Obtain access + refresh tokens
//! - `POST /auth/refresh/` - Exchange the refresh token for a new access token
//! - `GET /auth/me/` - Current user
//!
//! ## Catalog
//! - `GET|POST /products/`, `GET /products/?search=`, `PATCH|DELETE /products/:id/`
//! - `GET|POST /categories/`, `PATCH|DELETE /categories/:id/`
//! - `GET|POST /promotions/`, `PATCH|DELETE /promotions/:id/`
//!
//! ## Sales
//! - `GET|POST /sales/`, `GET /sales/:id/`
//! - `POST /sales/preview/` - Price a cart with promotions applied
//! - `POST /sales/:id/void/`
//!
//! ## Cash desk
//! - `GET|POST /cash/`, `POST /cash/:id/close/`
//!
//! ## Administration
//! - `GET|POST /users/`, `PATCH|DELETE /users/:id/`
//! - `GET /audit/`
//!
//! Every call attaches the stored access token. A 401 triggers exactly one
//! refresh through `/auth/refresh/`; if that fails the session is cleared and
//! the session-expired hook runs.
//!
//! # Example
//!
//! ```rust,ignore
//! use pos_client::api::{ApiClient, FileTokenStore, ReqwestTransport};
//!
//! let transport = ReqwestTransport::new(std::time::Duration::from_secs(15))?;
//! let api = ApiClient::new("http://localhost:8000/api", transport, FileTokenStore::new("session.json"));
//! api.login("caja1", "secret").await?;
//! let products = api.search_products("coca").await?;
//! ```

pub mod client;
pub mod dto;
pub mod error;
pub mod products;
pub mod session;
pub mod transport;

mod audit;
mod auth;
mod cash;
mod categories;
mod promotions;
mod sales;
mod users;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{ApiClient, DEFAULT_API_BASE, REFRESH_PATH};
pub use error::{ApiError, ApiResult};
pub use products::{find_exact_code, CodeLookup};
pub use session::{MemoryTokenStore, TokenStore, Tokens};
pub use transport::{HttpRequest, HttpResponse, Method, Transport};

#[cfg(not(target_arch = "wasm32"))]
pub use session::FileTokenStore;
#[cfg(not(target_arch = "wasm32"))]
pub use transport::ReqwestTransport;
