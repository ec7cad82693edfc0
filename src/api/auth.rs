//! Authentication endpoints

use super::client::ApiClient;
use super::dto::LoginRequest;
use super::error::ApiResult;
use super::session::{TokenStore, Tokens};
use super::transport::Transport;
use crate::models::{Me, TokenPair};

impl<T: Transport, S: TokenStore> ApiClient<T, S> {
    /// Exchange credentials for a token pair and keep both tokens
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<TokenPair> {
        let body = LoginRequest {
            username: username.trim().to_string(),
            password: password.to_string(),
        };
        let pair: TokenPair = self.post_public("/auth/login/", &body).await?;
        self.tokens().save(&Tokens {
            access: Some(pair.access.clone()),
            refresh: Some(pair.refresh.clone()),
        });
        tracing::info!("Logged in as {}", body.username);
        Ok(pair)
    }

    /// The authenticated user with role flags
    pub async fn me(&self) -> ApiResult<Me> {
        self.get("/auth/me/").await
    }

    pub fn logout(&self) {
        self.tokens().clear();
    }

    pub fn is_logged_in(&self) -> bool {
        self.tokens().is_logged_in()
    }
}

#[cfg(test)]
mod tests {
    use crate::api::testing::ScriptedTransport;
    use crate::api::{ApiClient, HttpResponse, MemoryTokenStore, TokenStore};

    #[tokio::test]
    async fn test_login_stores_both_tokens() {
        let transport = ScriptedTransport::new(vec![
            HttpResponse::new(200, r#"{"access": "acc", "refresh": "ref"}"#),
            HttpResponse::new(
                200,
                r#"{"id": 3, "username": "caja1", "email": null, "role": "SELLER",
                    "is_staff": false, "is_superuser": false, "is_active": true}"#,
            ),
        ]);
        let api = ApiClient::new("http://pos.test/api", transport, MemoryTokenStore::new());

        api.login(" caja1 ", "secret").await.unwrap();
        assert_eq!(api.tokens().access().as_deref(), Some("acc"));
        assert_eq!(api.tokens().refresh().as_deref(), Some("ref"));

        let me = api.me().await.unwrap();
        assert!(me.is_seller());
        assert_eq!(me.email, "");

        let sent = api.transport().requests();
        assert_eq!(sent[0].body.as_ref().unwrap()["username"], "caja1");
        assert_eq!(sent[1].bearer.as_deref(), Some("acc"));

        api.logout();
        assert!(!api.is_logged_in());
    }
}
