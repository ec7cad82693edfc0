//! Backend Resource Types
//!
//! Mirrors of the REST resources served by the POS backend. The client never
//! owns these; every page re-fetches them and treats its copy as disposable.
//!
//! Money fields arrive as decimal strings (`"1990.00"`) and are held as
//! [`Decimal`] so totals never go through floating point.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Primary key of every backend resource
pub type Id = i64;

/// Product category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Id,
    pub name: String,
}

/// Catalog product with its stock thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Id,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<Id>,
    #[serde(default)]
    pub category_name: Option<String>,
    pub price: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stock: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub min_stock: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub critical_stock: i64,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub top_seller: bool,
}

fn default_true() -> bool {
    true
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Sale lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SaleStatus {
    Ok,
    Void,
}

/// How a sale was paid
///
/// The backend stores a free-form string; unknown values are kept verbatim
/// and a missing one reads as `OTRO`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PaymentMethod {
    Cash,
    Debit,
    Credit,
    Other(String),
}

impl PaymentMethod {
    /// Methods offered at checkout
    pub const CHECKOUT: [PaymentMethod; 3] =
        [PaymentMethod::Cash, PaymentMethod::Debit, PaymentMethod::Credit];

    pub fn code(&self) -> &str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Debit => "DEBIT",
            PaymentMethod::Credit => "CREDIT",
            PaymentMethod::Other(code) => code,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            PaymentMethod::Cash => "Efectivo",
            PaymentMethod::Debit => "Débito",
            PaymentMethod::Credit => "Crédito",
            PaymentMethod::Other(code) => code,
        }
    }

    pub fn from_code(code: &str) -> Self {
        match code {
            "CASH" => PaymentMethod::Cash,
            "DEBIT" => PaymentMethod::Debit,
            "CREDIT" => PaymentMethod::Credit,
            "" => PaymentMethod::Other("OTRO".to_string()),
            other => PaymentMethod::Other(other.to_string()),
        }
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Cash
    }
}

impl Serialize for PaymentMethod {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for PaymentMethod {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        Ok(PaymentMethod::from_code(code.trim()))
    }
}

/// One line of a recorded sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleItem {
    pub product: Id,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub product_code: Option<String>,
    pub qty: i64,
    pub unit_price: Decimal,
    /// Per-unit discount applied by the backend promotion engine
    #[serde(default)]
    pub discount: Decimal,
    #[serde(default)]
    pub line_total: Option<Decimal>,
}

impl SaleItem {
    /// Net amount of the line: `(unit_price - discount) * qty`
    pub fn net_total(&self) -> Decimal {
        (self.unit_price - self.discount) * Decimal::from(self.qty)
    }

    /// Total discount granted on the line
    pub fn discount_total(&self) -> Decimal {
        self.discount * Decimal::from(self.qty)
    }
}

/// A recorded sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: Id,
    pub status: SaleStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    pub total: Decimal,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub seller_name: Option<String>,
    #[serde(default)]
    pub items: Vec<SaleItem>,
}

impl Sale {
    pub fn is_ok(&self) -> bool {
        self.status == SaleStatus::Ok
    }

    pub fn units(&self) -> i64 {
        self.items.iter().map(|item| item.qty).sum()
    }
}

/// Priced line returned by the sale preview endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewLine {
    pub product: Id,
    #[serde(default)]
    pub name: String,
    pub qty: i64,
    pub unit_price: Decimal,
    #[serde(default)]
    pub discount_unit: Decimal,
    pub line_total: Decimal,
}

/// Backend pricing of a cart with promotions applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalePreview {
    pub items: Vec<PreviewLine>,
    pub total_bruto: Decimal,
    pub total_descuento: Decimal,
    pub total_neto: Decimal,
}

impl SalePreview {
    pub fn line_for(&self, product: Id) -> Option<&PreviewLine> {
        self.items.iter().find(|line| line.product == product)
    }
}

/// Cash drawer state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CashStatus {
    Open,
    Closed,
}

/// A cash register session between opening and closing the drawer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashSession {
    pub id: Id,
    pub status: CashStatus,
    #[serde(default)]
    pub opened_by: Option<Id>,
    #[serde(default)]
    pub closed_by: Option<Id>,
    #[serde(default)]
    pub opened_by_name: Option<String>,
    #[serde(default)]
    pub closed_by_name: Option<String>,
    pub opening_amount: Decimal,
    #[serde(default)]
    pub closing_amount: Option<Decimal>,
    /// `closing - opening`, computed by the backend on close
    #[serde(default)]
    pub diff: Option<Decimal>,
    pub opened_at: DateTime<Utc>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
}

impl CashSession {
    pub fn is_open(&self) -> bool {
        self.status == CashStatus::Open
    }

    pub fn opened_by_display(&self) -> String {
        match (&self.opened_by_name, self.opened_by) {
            (Some(name), _) => name.clone(),
            (None, Some(id)) => id.to_string(),
            (None, None) => "-".to_string(),
        }
    }

    pub fn closed_by_display(&self) -> String {
        match (&self.closed_by_name, self.closed_by) {
            (Some(name), _) => name.clone(),
            (None, Some(id)) => id.to_string(),
            (None, None) => "-".to_string(),
        }
    }
}

/// Discount rule type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PromotionKind {
    /// Percentage off the unit price
    #[serde(rename = "PCT")]
    Percent,
    /// Fixed amount off the unit price
    #[serde(rename = "FIXED")]
    Fixed,
}

impl PromotionKind {
    pub fn code(self) -> &'static str {
        match self {
            PromotionKind::Percent => "PCT",
            PromotionKind::Fixed => "FIXED",
        }
    }

    pub fn badge(self) -> &'static str {
        match self {
            PromotionKind::Percent => "%",
            PromotionKind::Fixed => "CLP",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "PCT" => Some(PromotionKind::Percent),
            "FIXED" => Some(PromotionKind::Fixed),
            _ => None,
        }
    }
}

/// Discount rule scoped to a category or an explicit product list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Promotion {
    pub id: Id,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PromotionKind,
    pub value: Decimal,
    pub active: bool,
    #[serde(default)]
    pub category: Option<Id>,
    #[serde(default)]
    pub products: Vec<Id>,
}

/// Staff role
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    Owner,
    Admin,
    Seller,
    Other(String),
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Owner, Role::Admin, Role::Seller];

    pub fn code(&self) -> &str {
        match self {
            Role::Owner => "OWNER",
            Role::Admin => "ADMIN",
            Role::Seller => "SELLER",
            Role::Other(code) => code,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Role::Owner => "Dueño",
            Role::Admin => "Administrador",
            Role::Seller => "Vendedor",
            Role::Other(code) => code,
        }
    }

    /// Parses a role code case-insensitively
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "OWNER" => Role::Owner,
            "ADMIN" => Role::Admin,
            "SELLER" => Role::Seller,
            _ => Role::Other(code.to_string()),
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Owner | Role::Admin)
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Seller
    }
}

impl Serialize for Role {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        Ok(Role::from_code(&code))
    }
}

/// Staff account as listed by the user admin endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub username: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// The authenticated user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Me {
    pub id: Id,
    pub username: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Me {
    /// Owners, admins, staff and superusers manage the store
    pub fn is_admin(&self) -> bool {
        self.role.is_admin() || self.is_staff || self.is_superuser
    }

    /// Plain sellers need a supervisor PIN for cash operations
    pub fn is_seller(&self) -> bool {
        self.role == Role::Seller && !self.is_admin()
    }
}

/// Entry of the backend audit trail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    #[serde(default)]
    pub id: Option<Id>,
    /// Actor id, or a nested user object depending on the serializer
    #[serde(default)]
    pub actor: Option<serde_json::Value>,
    #[serde(default)]
    pub user_name: Option<String>,
    pub action: String,
    #[serde(default)]
    pub model: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub obj_id: String,
    #[serde(default)]
    pub changes: serde_json::Value,
    #[serde(default)]
    pub ts: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl AuditEvent {
    /// When the event was recorded, whichever timestamp field the backend sent
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.created_at.or(self.ts)
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    })
}

/// Answer to `POST /sales/{id}/void/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoidReceipt {
    pub status: SaleStatus,
}

/// Answer to `POST /cash/{id}/close/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloseReceipt {
    pub status: CashStatus,
    pub closing_amount: Decimal,
    pub diff: Decimal,
}

/// Access and refresh JWT pair returned by login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_from_backend_json() {
        let json = r#"{
            "id": 7, "code": "780123", "name": "Pan amasado", "category": 2,
            "category_name": "Panadería", "price": "1990.00", "stock": 4,
            "min_stock": 20, "critical_stock": null, "active": true, "top_seller": false
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.price, Decimal::from(1990));
        assert_eq!(product.critical_stock, 0);
        assert_eq!(product.category_name.as_deref(), Some("Panadería"));
    }

    #[test]
    fn test_sale_keeps_unknown_payment_method() {
        let json = r#"{
            "id": 1, "status": "OK", "created_at": "2024-05-02T15:04:05Z",
            "payment_method": "TRANSFER", "total": "1500.00", "note": "",
            "items": [{"product": 3, "qty": 2, "unit_price": "1000", "discount": "250.00"}]
        }"#;
        let sale: Sale = serde_json::from_str(json).unwrap();
        assert_eq!(sale.payment_method, PaymentMethod::Other("TRANSFER".into()));
        assert_eq!(sale.items[0].net_total(), Decimal::from(1500));
        assert_eq!(sale.items[0].discount_total(), Decimal::from(500));
        assert!(sale.is_ok());
    }

    #[test]
    fn test_me_admin_rules() {
        let mut me = Me {
            id: 1,
            username: "ana".into(),
            email: String::new(),
            role: Role::from_code("seller"),
            is_staff: false,
            is_superuser: false,
            is_active: true,
        };
        assert!(!me.is_admin());
        assert!(me.is_seller());

        me.is_staff = true;
        assert!(me.is_admin());
        assert!(!me.is_seller());

        me.is_staff = false;
        me.role = Role::from_code("Owner");
        assert!(me.is_admin());
    }

    #[test]
    fn test_promotion_type_field() {
        let json = r#"{"id": 3, "name": "Lácteos", "type": "PCT", "value": "10.00",
                       "active": true, "category": 4, "products": []}"#;
        let promo: Promotion = serde_json::from_str(json).unwrap();
        assert_eq!(promo.kind, PromotionKind::Percent);

        let back = serde_json::to_value(&promo).unwrap();
        assert_eq!(back["type"], "PCT");
        assert_eq!(back["value"], "10.00");
    }

    #[test]
    fn test_audit_numeric_obj_id() {
        let json = r#"{"id": 1, "actor": 2, "user_name": "admin", "action": "SALE_VOID",
                       "model": "Sale", "obj_id": 15, "changes": {"reason": "error"},
                       "ts": "2024-05-02T10:00:00Z"}"#;
        let event: AuditEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.obj_id, "15");
        assert!(event.timestamp().is_some());
    }
}
