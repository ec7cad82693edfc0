//! User administration and profile endpoints

use super::client::ApiClient;
use super::dto::{NewUser, ProfileUpdate, RoleUpdate, UserActiveUpdate};
use super::error::ApiResult;
use super::session::TokenStore;
use super::transport::Transport;
use crate::models::{Id, Role, User};

impl<T: Transport, S: TokenStore> ApiClient<T, S> {
    pub async fn list_users(&self) -> ApiResult<Vec<User>> {
        self.get("/users/").await
    }

    pub async fn create_user(&self, user: &NewUser) -> ApiResult<User> {
        self.post("/users/", user).await
    }

    pub async fn set_user_role(&self, id: Id, role: Role) -> ApiResult<User> {
        self.patch(&format!("/users/{}/", id), &RoleUpdate { role }).await
    }

    pub async fn set_user_active(&self, id: Id, is_active: bool) -> ApiResult<User> {
        self.patch(&format!("/users/{}/", id), &UserActiveUpdate { is_active })
            .await
    }

    /// Edit the signed-in user's own email and password
    pub async fn update_profile(&self, id: Id, update: &ProfileUpdate) -> ApiResult<User> {
        self.patch(&format!("/users/{}/", id), update).await
    }

    pub async fn delete_user(&self, id: Id) -> ApiResult<()> {
        self.delete(&format!("/users/{}/", id)).await
    }
}
