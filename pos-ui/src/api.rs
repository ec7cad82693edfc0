//! Browser API Plumbing
//!
//! gloo-net transport and `localStorage` token store for the shared
//! [`ApiClient`].

use async_trait::async_trait;
use gloo_net::http::Request;
use pos_client::api::{
    ApiClient, ApiError, HttpRequest, HttpResponse, Method, TokenStore, Tokens, Transport,
    DEFAULT_API_BASE,
};

/// Client type used by every page
pub type Client = ApiClient<GlooTransport, BrowserTokenStore>;

const API_URL_KEY: &str = "pos_api_url";
const ACCESS_KEY: &str = "access";
const REFRESH_KEY: &str = "refresh";

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

/// Get the API base URL from local storage, the build environment or the default
pub fn get_api_base() -> String {
    let url = local_storage()
        .and_then(|storage| storage.get_item(API_URL_KEY).ok().flatten())
        .filter(|url| !url.trim().is_empty())
        .or_else(|| option_env!("POS_API_URL").map(str::to_string))
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    // Normalize: remove trailing slash
    url.trim_end_matches('/').to_string()
}

pub fn build_client(on_session_expired: impl Fn() + 'static) -> Client {
    ApiClient::new(get_api_base(), GlooTransport, BrowserTokenStore)
        .on_session_expired(on_session_expired)
}

/// Transport backed by the browser's fetch
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTransport;

fn network(error: gloo_net::Error) -> ApiError {
    ApiError::Network(error.to_string())
}

#[async_trait(?Send)]
impl Transport for GlooTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut builder = match request.method {
            Method::Get => Request::get(&request.url),
            Method::Post => Request::post(&request.url),
            Method::Patch => Request::patch(&request.url),
            Method::Delete => Request::delete(&request.url),
        };
        if let Some(token) = &request.bearer {
            builder = builder.header("Authorization", &format!("Bearer {}", token));
        }

        let sent = match &request.body {
            Some(body) => builder.json(body).map_err(network)?.send().await,
            None => builder.send().await,
        };
        let response = sent.map_err(|e| {
            web_sys::console::error_1(&format!("{} {} failed: {}", request.method.as_str(), request.url, e).into());
            network(e)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(network)?;
        Ok(HttpResponse::new(status, body))
    }
}

/// Access and refresh tokens under the `access` / `refresh` keys
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserTokenStore;

impl TokenStore for BrowserTokenStore {
    fn load(&self) -> Tokens {
        let Some(storage) = local_storage() else {
            return Tokens::default();
        };
        Tokens {
            access: storage.get_item(ACCESS_KEY).ok().flatten(),
            refresh: storage.get_item(REFRESH_KEY).ok().flatten(),
        }
    }

    fn save(&self, tokens: &Tokens) {
        let Some(storage) = local_storage() else {
            return;
        };
        for (key, value) in [(ACCESS_KEY, &tokens.access), (REFRESH_KEY, &tokens.refresh)] {
            let _ = match value {
                Some(value) => storage.set_item(key, value),
                None => storage.remove_item(key),
            };
        }
    }
}
