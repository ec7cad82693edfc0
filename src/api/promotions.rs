//! Promotion endpoints

use super::client::ApiClient;
use super::dto::{ActiveUpdate, NewPromotion};
use super::error::ApiResult;
use super::session::TokenStore;
use super::transport::Transport;
use crate::models::{Id, Promotion};

impl<T: Transport, S: TokenStore> ApiClient<T, S> {
    pub async fn list_promotions(&self) -> ApiResult<Vec<Promotion>> {
        self.get("/promotions/").await
    }

    pub async fn create_promotion(&self, promotion: &NewPromotion) -> ApiResult<Promotion> {
        self.post("/promotions/", promotion).await
    }

    pub async fn set_promotion_active(&self, id: Id, active: bool) -> ApiResult<Promotion> {
        self.patch(&format!("/promotions/{}/", id), &ActiveUpdate { active })
            .await
    }

    pub async fn delete_promotion(&self, id: Id) -> ApiResult<()> {
        self.delete(&format!("/promotions/{}/", id)).await
    }
}
