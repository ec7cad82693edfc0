//! Backend API Client
//!
//! Resolves paths against the API base URL, attaches the bearer token and
//! runs the single refresh-then-retry cycle when the backend answers 401.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::rc::Rc;

use super::error::{ApiError, ApiResult};
use super::session::TokenStore;
use super::transport::{HttpRequest, HttpResponse, Method, Transport};

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api";

/// Token refresh endpoint, relative to the base URL
pub const REFRESH_PATH: &str = "/auth/refresh/";

/// REST client for the POS backend
pub struct ApiClient<T, S> {
    base_url: String,
    transport: T,
    tokens: S,
    on_session_expired: Option<Rc<dyn Fn()>>,
}

#[derive(serde::Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

#[derive(serde::Deserialize)]
struct RefreshResponse {
    access: Option<String>,
    #[serde(default)]
    refresh: Option<String>,
}

impl<T: Transport, S: TokenStore> ApiClient<T, S> {
    pub fn new(base_url: impl AsRef<str>, transport: T, tokens: S) -> Self {
        Self {
            base_url: normalize_base(base_url.as_ref()),
            transport,
            tokens,
            on_session_expired: None,
        }
    }

    /// Called once the session is cleared after a failed refresh
    pub fn on_session_expired(mut self, hook: impl Fn() + 'static) -> Self {
        self.on_session_expired = Some(Rc::new(hook));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tokens(&self) -> &S {
        &self.tokens
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> ApiResult<R> {
        let response = self.send(Method::Get, path, None).await?;
        decode(&response)
    }

    pub async fn post<B, R>(&self, path: &str, body: &B) -> ApiResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.send(Method::Post, path, Some(to_body(body)?)).await?;
        decode(&response)
    }

    pub async fn patch<B, R>(&self, path: &str, body: &B) -> ApiResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.send(Method::Patch, path, Some(to_body(body)?)).await?;
        decode(&response)
    }

    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        self.send(Method::Delete, path, None).await?;
        Ok(())
    }

    /// POST without credentials and without the refresh cycle (login)
    pub async fn post_public<B, R>(&self, path: &str, body: &B) -> ApiResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = HttpRequest {
            method: Method::Post,
            url: self.url(path),
            bearer: None,
            body: Some(to_body(body)?),
        };
        let response = self.transport.send(request).await?;
        decode(&check(response)?)
    }

    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> ApiResult<HttpResponse> {
        let request = HttpRequest {
            method,
            url: self.url(path),
            bearer: self.tokens.access(),
            body,
        };

        let response = self.transport.send(request.clone()).await?;
        tracing::debug!(method = method.as_str(), url = %request.url, status = response.status, "api call");
        if response.status != 401 {
            return check(response);
        }

        let access = match self.refresh_access().await {
            Ok(access) => access,
            Err(e) => {
                tracing::warn!("Token refresh failed, clearing session: {}", e);
                self.expire();
                return Err(ApiError::SessionExpired);
            }
        };

        let retry = HttpRequest {
            bearer: Some(access),
            ..request
        };
        let response = self.transport.send(retry).await?;
        tracing::debug!(method = method.as_str(), path, status = response.status, "api retry");
        check(response)
    }

    async fn refresh_access(&self) -> ApiResult<String> {
        let refresh = self.tokens.refresh().ok_or(ApiError::SessionExpired)?;
        let request = HttpRequest {
            method: Method::Post,
            url: self.url(REFRESH_PATH),
            bearer: None,
            body: Some(to_body(&RefreshRequest { refresh: &refresh })?),
        };
        let response = check(self.transport.send(request).await?)?;
        let refreshed: RefreshResponse = decode(&response)?;
        let access = refreshed
            .access
            .filter(|a| !a.is_empty())
            .ok_or_else(|| ApiError::Decode("refresh response without access token".into()))?;

        let mut tokens = self.tokens.load();
        tokens.access = Some(access.clone());
        if let Some(rotated) = refreshed.refresh {
            tokens.refresh = Some(rotated);
        }
        self.tokens.save(&tokens);
        Ok(access)
    }

    fn expire(&self) {
        self.tokens.clear();
        if let Some(hook) = &self.on_session_expired {
            hook();
        }
    }
}

fn normalize_base(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn to_body<B: Serialize + ?Sized>(body: &B) -> ApiResult<Value> {
    serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))
}

fn check(response: HttpResponse) -> ApiResult<HttpResponse> {
    if response.ok() {
        Ok(response)
    } else {
        Err(ApiError::from_response(response.status, &response.body))
    }
}

fn decode<R: DeserializeOwned>(response: &HttpResponse) -> ApiResult<R> {
    let body = if response.body.trim().is_empty() {
        "null"
    } else {
        response.body.as_str()
    };
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::session::MemoryTokenStore;
    use crate::api::testing::ScriptedTransport;
    use std::cell::Cell;

    fn client(transport: ScriptedTransport, tokens: MemoryTokenStore) -> ApiClient<ScriptedTransport, MemoryTokenStore> {
        ApiClient::new("http://pos.test/api/", transport, tokens)
    }

    #[tokio::test]
    async fn test_attaches_bearer_token() {
        let transport = ScriptedTransport::new(vec![HttpResponse::new(200, "[]")]);
        let api = client(transport, MemoryTokenStore::with_tokens("acc", Some("ref")));

        let list: Vec<Value> = api.get("/categories/").await.unwrap();
        assert!(list.is_empty());

        let sent = api.transport().requests();
        assert_eq!(sent[0].url, "http://pos.test/api/categories/");
        assert_eq!(sent[0].bearer.as_deref(), Some("acc"));
    }

    #[tokio::test]
    async fn test_401_refreshes_once_then_retries() {
        let transport = ScriptedTransport::new(vec![
            HttpResponse::new(401, r#"{"detail": "Token expired"}"#),
            HttpResponse::new(200, r#"{"access": "fresh"}"#),
            HttpResponse::new(200, r#"{"id": 1, "name": "Bebidas"}"#),
        ]);
        let api = client(transport, MemoryTokenStore::with_tokens("stale", Some("ref")));

        let category: crate::models::Category = api.get("/categories/1/").await.unwrap();
        assert_eq!(category.name, "Bebidas");

        let sent = api.transport().requests();
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[1].url, "http://pos.test/api/auth/refresh/");
        assert_eq!(sent[1].bearer, None);
        assert_eq!(sent[1].body.as_ref().unwrap()["refresh"], "ref");
        assert_eq!(sent[2].bearer.as_deref(), Some("fresh"));
        assert_eq!(api.tokens().access().as_deref(), Some("fresh"));
        assert_eq!(api.tokens().refresh().as_deref(), Some("ref"));
    }

    #[tokio::test]
    async fn test_failed_refresh_clears_session() {
        let transport = ScriptedTransport::new(vec![
            HttpResponse::new(401, "{}"),
            HttpResponse::new(401, r#"{"detail": "Token is invalid or expired"}"#),
        ]);
        let expired = Rc::new(Cell::new(0));
        let counter = expired.clone();
        let api = client(transport, MemoryTokenStore::with_tokens("stale", Some("bad")))
            .on_session_expired(move || counter.set(counter.get() + 1));

        let err = api.get::<Value>("/products/").await.unwrap_err();
        assert_eq!(err, ApiError::SessionExpired);
        assert_eq!(api.transport().requests().len(), 2);
        assert!(!api.tokens().is_logged_in());
        assert_eq!(api.tokens().refresh(), None);
        assert_eq!(expired.get(), 1);
    }

    #[tokio::test]
    async fn test_missing_refresh_token_skips_refresh_call() {
        let transport = ScriptedTransport::new(vec![HttpResponse::new(401, "{}")]);
        let api = client(transport, MemoryTokenStore::with_tokens("stale", None));

        let err = api.get::<Value>("/sales/").await.unwrap_err();
        assert_eq!(err, ApiError::SessionExpired);
        assert_eq!(api.transport().requests().len(), 1);
        assert!(!api.tokens().is_logged_in());
    }

    #[tokio::test]
    async fn test_second_401_is_not_refreshed_again() {
        let transport = ScriptedTransport::new(vec![
            HttpResponse::new(401, "{}"),
            HttpResponse::new(200, r#"{"access": "fresh"}"#),
            HttpResponse::new(401, "{}"),
        ]);
        let api = client(transport, MemoryTokenStore::with_tokens("stale", Some("ref")));

        let err = api.get::<Value>("/audit/").await.unwrap_err();
        assert_eq!(err, ApiError::Unauthorized);

        let refreshes = api
            .transport()
            .requests()
            .iter()
            .filter(|r| r.url.ends_with(REFRESH_PATH))
            .count();
        assert_eq!(refreshes, 1);
        assert_eq!(api.transport().requests().len(), 3);
    }

    #[tokio::test]
    async fn test_other_errors_are_not_retried() {
        let transport = ScriptedTransport::new(vec![HttpResponse::new(
            403,
            r#"{"detail": "You do not have permission to perform this action."}"#,
        )]);
        let api = client(transport, MemoryTokenStore::with_tokens("acc", Some("ref")));

        let err = api.delete("/users/3/").await.unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(Some(_))));
        assert_eq!(api.transport().requests().len(), 1);
    }

    #[tokio::test]
    async fn test_public_post_never_refreshes() {
        let transport = ScriptedTransport::new(vec![HttpResponse::new(
            401,
            r#"{"detail": "No active account found with the given credentials"}"#,
        )]);
        let api = client(transport, MemoryTokenStore::new());

        let err = api
            .post_public::<_, Value>("/auth/login/", &serde_json::json!({"username": "x"}))
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::Unauthorized);
        assert_eq!(api.transport().requests().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_accepts_empty_body() {
        let transport = ScriptedTransport::new(vec![HttpResponse::new(204, "")]);
        let api = client(transport, MemoryTokenStore::with_tokens("acc", None));
        api.delete("/promotions/2/").await.unwrap();
        assert_eq!(api.transport().requests()[0].method, Method::Delete);
    }
}
