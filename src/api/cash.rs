//! Cash session endpoints

use rust_decimal::Decimal;

use super::client::ApiClient;
use super::dto::{CloseCash, OpenCash};
use super::error::ApiResult;
use super::session::TokenStore;
use super::transport::Transport;
use crate::models::{CashSession, CloseReceipt, Id};

impl<T: Transport, S: TokenStore> ApiClient<T, S> {
    pub async fn list_cash_sessions(&self) -> ApiResult<Vec<CashSession>> {
        self.get("/cash/").await
    }

    pub async fn open_cash(&self, opening_amount: Decimal) -> ApiResult<CashSession> {
        let session: CashSession = self.post("/cash/", &OpenCash { opening_amount }).await?;
        tracing::info!(session = session.id, "cash session opened");
        Ok(session)
    }

    pub async fn close_cash(&self, id: Id, closing_amount: Decimal) -> ApiResult<CloseReceipt> {
        let receipt: CloseReceipt = self
            .post(&format!("/cash/{}/close/", id), &CloseCash { closing_amount })
            .await?;
        tracing::info!(session = id, diff = %receipt.diff, "cash session closed");
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use crate::api::testing::{ScriptedTransport, BASE};
    use crate::api::{ApiClient, ApiError, HttpResponse, MemoryTokenStore};
    use crate::messages;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_close_reports_diff() {
        let transport = ScriptedTransport::new(vec![HttpResponse::new(
            200,
            r#"{"status": "CLOSED", "closing_amount": "52000.00", "diff": "2000.00"}"#,
        )]);
        let api = ApiClient::new(BASE, transport, MemoryTokenStore::with_tokens("acc", None));

        let receipt = api.close_cash(4, Decimal::from(52000)).await.unwrap();
        assert_eq!(receipt.diff, Decimal::from(2000));
        let body = api.transport().requests()[0].body.clone().unwrap();
        assert_eq!(body["closing_amount"], "52000");
    }

    #[tokio::test]
    async fn test_closing_twice_surfaces_backend_detail() {
        let transport = ScriptedTransport::new(vec![HttpResponse::new(
            400,
            r#"{"detail": "La caja ya está cerrada."}"#,
        )]);
        let api = ApiClient::new(BASE, transport, MemoryTokenStore::with_tokens("acc", None));

        let err = api.close_cash(4, Decimal::from(1)).await.unwrap_err();
        assert_eq!(err, ApiError::Validation(Some("La caja ya está cerrada.".into())));
        assert_eq!(messages::CLOSE_CASH.describe(&err), "La caja ya está cerrada.");
    }
}
