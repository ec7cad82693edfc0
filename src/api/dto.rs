//! Request Bodies
//!
//! Payloads sent to the backend. Money goes out as decimal strings.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Id, PaymentMethod, PromotionKind, Role};

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body of `POST /products/`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewProduct {
    pub code: String,
    pub name: String,
    pub category: Option<Id>,
    pub price: Decimal,
    pub stock: i64,
    pub active: bool,
    pub top_seller: bool,
}

/// Body of the stock editor's `PATCH /products/{id}/`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductUpdate {
    pub name: String,
    pub price: Decimal,
    pub stock: i64,
    pub min_stock: i64,
    pub critical_stock: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopSellerUpdate {
    pub top_seller: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryName {
    pub name: String,
}

/// Body of `POST /promotions/`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPromotion {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PromotionKind,
    pub value: Decimal,
    pub active: bool,
    pub category: Option<Id>,
    pub products: Vec<Id>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActiveUpdate {
    pub active: bool,
}

/// Line sent for pricing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewItem {
    pub product: Id,
    pub qty: i64,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewRequest {
    pub items: Vec<PreviewItem>,
}

/// Line of a checkout; the backend recomputes discounts itself
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSaleItem {
    pub product: Id,
    pub qty: i64,
    pub unit_price: Decimal,
    pub discount: Decimal,
}

/// Body of `POST /sales/`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSale {
    pub payment_method: PaymentMethod,
    pub items: Vec<NewSaleItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VoidSale {
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OpenCash {
    pub opening_amount: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct CloseCash {
    pub closing_amount: Decimal,
}

/// Body of `POST /users/`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoleUpdate {
    pub role: Role,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserActiveUpdate {
    pub is_active: bool,
}

/// Own profile edit; an empty password is left out so it stays unchanged
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileUpdate {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl ProfileUpdate {
    pub fn new(email: &str, password: &str) -> Self {
        let password = password.trim();
        Self {
            email: email.trim().to_string(),
            password: (!password.is_empty()).then(|| password.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_update_omits_blank_password() {
        let body = serde_json::to_value(ProfileUpdate::new(" ana@pos.cl ", "  ")).unwrap();
        assert_eq!(body, serde_json::json!({"email": "ana@pos.cl"}));
    }

    #[test]
    fn test_sale_body_shape() {
        let sale = NewSale {
            payment_method: PaymentMethod::Debit,
            items: vec![NewSaleItem {
                product: 4,
                qty: 2,
                unit_price: Decimal::from(990),
                discount: Decimal::ZERO,
            }],
        };
        let body = serde_json::to_value(&sale).unwrap();
        assert_eq!(body["payment_method"], "DEBIT");
        assert_eq!(body["items"][0]["unit_price"], "990");
        assert_eq!(body["items"][0]["discount"], "0");
    }
}
