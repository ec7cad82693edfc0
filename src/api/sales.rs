//! Sale endpoints: listing, checkout, pricing preview and void

use super::client::ApiClient;
use super::dto::{NewSale, PreviewRequest, VoidSale};
use super::error::ApiResult;
use super::session::TokenStore;
use super::transport::Transport;
use crate::models::{Id, Sale, SalePreview, VoidReceipt};

impl<T: Transport, S: TokenStore> ApiClient<T, S> {
    pub async fn list_sales(&self) -> ApiResult<Vec<Sale>> {
        self.get("/sales/").await
    }

    /// Single sale with its items
    pub async fn get_sale(&self, id: Id) -> ApiResult<Sale> {
        self.get(&format!("/sales/{}/", id)).await
    }

    pub async fn checkout(&self, sale: &NewSale) -> ApiResult<Sale> {
        let created: Sale = self.post("/sales/", sale).await?;
        tracing::info!(sale = created.id, total = %created.total, "sale registered");
        Ok(created)
    }

    /// Price the cart with the promotions active right now
    pub async fn preview_sale(&self, request: &PreviewRequest) -> ApiResult<SalePreview> {
        self.post("/sales/preview/", request).await
    }

    pub async fn void_sale(&self, id: Id, reason: &str) -> ApiResult<VoidReceipt> {
        let body = VoidSale {
            reason: reason.to_string(),
        };
        self.post(&format!("/sales/{}/void/", id), &body).await
    }
}

#[cfg(test)]
mod tests {
    use crate::api::testing::{product, FakeBackend, ScriptedTransport, BASE};
    use crate::api::{ApiClient, HttpResponse, MemoryTokenStore};
    use crate::cart::Cart;
    use crate::models::{Promotion, PromotionKind, SaleStatus};
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_preview_discount_applies_on_top_of_cart_subtotal() {
        let coca = product(1, "COCA350", "Coca-Cola", 1000, 10, Some(7));
        let pan = product(2, "PAN", "Pan", 500, 10, None);
        let backend = FakeBackend::new()
            .with_product(coca.clone())
            .with_product(pan.clone())
            .with_promotion(Promotion {
                id: 1,
                name: "Bebidas 10%".into(),
                kind: PromotionKind::Percent,
                value: Decimal::from(10),
                active: true,
                category: Some(7),
                products: vec![],
            });
        let api = ApiClient::new(BASE, backend, MemoryTokenStore::with_tokens("acc", None));

        let mut cart = Cart::new();
        cart.add(&coca);
        cart.add(&coca);
        cart.add(&pan);
        assert_eq!(cart.subtotal(), Decimal::from(2500));

        let preview = api.preview_sale(&cart.preview_request()).await.unwrap();
        assert_eq!(preview.total_bruto, cart.subtotal());
        assert_eq!(preview.total_descuento, Decimal::from(200));
        assert_eq!(preview.total_neto, Decimal::from(2300));

        let lines = cart.priced_lines(Some(&preview));
        assert_eq!(lines[0].discount_unit, Decimal::from(100));
        assert_eq!(lines[0].net_total, Decimal::from(1800));
        assert!(lines[0].promoted());
        assert!(!lines[1].promoted());
    }

    #[tokio::test]
    async fn test_void_posts_reason() {
        let transport = ScriptedTransport::new(vec![HttpResponse::new(200, r#"{"status": "VOID"}"#)]);
        let api = ApiClient::new(BASE, transport, MemoryTokenStore::with_tokens("acc", None));

        let receipt = api.void_sale(12, "Cliente arrepentido").await.unwrap();
        assert_eq!(receipt.status, SaleStatus::Void);

        let sent = api.transport().requests();
        assert_eq!(sent[0].url, format!("{}/sales/12/void/", BASE));
        assert_eq!(sent[0].body.as_ref().unwrap()["reason"], "Cliente arrepentido");
    }
}
