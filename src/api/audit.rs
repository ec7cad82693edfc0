//! Audit log endpoint

use super::client::ApiClient;
use super::error::ApiResult;
use super::session::TokenStore;
use super::transport::Transport;
use crate::models::AuditEvent;

impl<T: Transport, S: TokenStore> ApiClient<T, S> {
    pub async fn list_audit_events(&self) -> ApiResult<Vec<AuditEvent>> {
        self.get("/audit/").await
    }
}
