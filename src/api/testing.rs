//! Test transports: a scripted response queue and a small in-memory backend.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::VecDeque;

use super::error::ApiError;
use super::transport::{HttpRequest, HttpResponse, Method, Transport};
use crate::models::{Category, Id, Product, Promotion, PromotionKind};

pub const BASE: &str = "http://pos.test/api";

/// Replays canned responses in order and records every request
pub struct ScriptedTransport {
    responses: RefCell<VecDeque<HttpResponse>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<HttpResponse>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests.borrow_mut().push(request);
        self.responses
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| ApiError::Network("no scripted response left".into()))
    }
}

#[derive(Default)]
struct BackendState {
    categories: Vec<Category>,
    products: Vec<Product>,
    promotions: Vec<Promotion>,
    next_id: Id,
}

/// Stateful stand-in for the REST backend covering catalog and promotions
#[derive(Default)]
pub struct FakeBackend {
    state: RefCell<BackendState>,
    log: RefCell<Vec<(Method, String)>>,
}

pub fn product(id: Id, code: &str, name: &str, price: i64, stock: i64, category: Option<Id>) -> Product {
    Product {
        id,
        code: code.to_string(),
        name: name.to_string(),
        category,
        category_name: None,
        price: Decimal::from(price),
        stock,
        min_stock: 0,
        critical_stock: 0,
        active: true,
        top_seller: false,
    }
}

impl FakeBackend {
    pub fn new() -> Self {
        let backend = Self::default();
        backend.state.borrow_mut().next_id = 100;
        backend
    }

    pub fn with_category(self, id: Id, name: &str) -> Self {
        self.state.borrow_mut().categories.push(Category {
            id,
            name: name.to_string(),
        });
        self
    }

    pub fn with_product(self, product: Product) -> Self {
        self.state.borrow_mut().products.push(product);
        self
    }

    pub fn with_promotion(self, promotion: Promotion) -> Self {
        self.state.borrow_mut().promotions.push(promotion);
        self
    }

    pub fn calls(&self) -> Vec<(Method, String)> {
        self.log.borrow().clone()
    }

    fn handle(&self, request: &HttpRequest) -> HttpResponse {
        let path = request.url.trim_start_matches(BASE);
        let (path, query) = path.split_once('?').unwrap_or((path, ""));
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let body = request.body.clone().unwrap_or(Value::Null);
        let mut state = self.state.borrow_mut();

        match (request.method, segments.as_slice()) {
            (Method::Get, ["categories"]) => ok(&state.categories),
            (Method::Post, ["categories"]) => {
                let name = body["name"].as_str().unwrap_or_default().to_string();
                if name.is_empty() {
                    return HttpResponse::new(400, r#"{"name": ["This field may not be blank."]}"#);
                }
                state.next_id += 1;
                let category = Category { id: state.next_id, name };
                state.categories.push(category.clone());
                created(&category)
            }
            (Method::Patch, ["categories", id]) => {
                let id = parse_id(id);
                match state.categories.iter_mut().find(|c| c.id == id) {
                    Some(category) => {
                        if let Some(name) = body["name"].as_str() {
                            category.name = name.to_string();
                        }
                        ok(&*category)
                    }
                    None => not_found(),
                }
            }
            (Method::Delete, ["categories", id]) => {
                let id = parse_id(id);
                if !state.categories.iter().any(|c| c.id == id) {
                    return not_found();
                }
                if state.products.iter().any(|p| p.category == Some(id)) {
                    return HttpResponse::new(
                        400,
                        json!({"detail": "No se puede eliminar: la categoría tiene productos asociados."})
                            .to_string(),
                    );
                }
                state.categories.retain(|c| c.id != id);
                HttpResponse::new(204, "")
            }
            (Method::Get, ["products"]) => {
                let needle = query
                    .strip_prefix("search=")
                    .map(|q| urlencoding::decode(q).map(|s| s.to_lowercase()).unwrap_or_default())
                    .unwrap_or_default();
                let found: Vec<&Product> = state
                    .products
                    .iter()
                    .filter(|p| {
                        needle.is_empty()
                            || p.code.to_lowercase().contains(&needle)
                            || p.name.to_lowercase().contains(&needle)
                    })
                    .collect();
                ok(&found)
            }
            (Method::Patch, ["products", id]) => {
                let id = parse_id(id);
                match state.products.iter_mut().find(|p| p.id == id) {
                    Some(product) => {
                        if let Some(top) = body["top_seller"].as_bool() {
                            product.top_seller = top;
                        }
                        if let Some(name) = body["name"].as_str() {
                            product.name = name.to_string();
                        }
                        ok(&*product)
                    }
                    None => not_found(),
                }
            }
            (Method::Delete, ["products", id]) => {
                let id = parse_id(id);
                let before = state.products.len();
                state.products.retain(|p| p.id != id);
                if state.products.len() == before {
                    not_found()
                } else {
                    HttpResponse::new(204, "")
                }
            }
            (Method::Get, ["promotions"]) => ok(&state.promotions),
            (Method::Patch, ["promotions", id]) => {
                let id = parse_id(id);
                match state.promotions.iter_mut().find(|p| p.id == id) {
                    Some(promo) => {
                        if let Some(active) = body["active"].as_bool() {
                            promo.active = active;
                        }
                        ok(&*promo)
                    }
                    None => not_found(),
                }
            }
            (Method::Delete, ["promotions", id]) => {
                let id = parse_id(id);
                state.promotions.retain(|p| p.id != id);
                HttpResponse::new(204, "")
            }
            (Method::Post, ["sales", "preview"]) => preview(&state, &body),
            _ => not_found(),
        }
    }
}

#[async_trait(?Send)]
impl Transport for FakeBackend {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let path = request.url.trim_start_matches(BASE).to_string();
        self.log.borrow_mut().push((request.method, path));
        if request.bearer.is_none() {
            return Ok(HttpResponse::new(401, r#"{"detail": "Authentication credentials were not provided."}"#));
        }
        Ok(self.handle(&request))
    }
}

/// Best single active promotion per unit, like the backend pricing service
fn preview(state: &BackendState, body: &Value) -> HttpResponse {
    let mut items = Vec::new();
    let (mut bruto, mut descuento) = (Decimal::ZERO, Decimal::ZERO);

    for line in body["items"].as_array().cloned().unwrap_or_default() {
        let product_id = line["product"].as_i64().unwrap_or_default();
        let qty = line["qty"].as_i64().unwrap_or_default();
        let unit: Decimal = line["unit_price"]
            .as_str()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();
        let product = state.products.iter().find(|p| p.id == product_id);

        let discount = state
            .promotions
            .iter()
            .filter(|promo| promo.active)
            .filter(|promo| {
                promo.products.contains(&product_id)
                    || (promo.category.is_some() && product.and_then(|p| p.category) == promo.category)
            })
            .map(|promo| match promo.kind {
                PromotionKind::Percent => (unit * promo.value / Decimal::from(100)).round_dp(2),
                PromotionKind::Fixed => promo.value.min(unit),
            })
            .max()
            .unwrap_or_default();

        let qty_dec = Decimal::from(qty);
        bruto += unit * qty_dec;
        descuento += discount * qty_dec;
        items.push(json!({
            "product": product_id,
            "name": product.map(|p| p.name.clone()).unwrap_or_default(),
            "qty": qty,
            "unit_price": unit,
            "discount_unit": discount,
            "line_total": (unit - discount) * qty_dec,
        }));
    }

    ok(&json!({
        "items": items,
        "total_bruto": bruto,
        "total_descuento": descuento,
        "total_neto": bruto - descuento,
    }))
}

fn parse_id(raw: &str) -> Id {
    raw.parse().unwrap_or(-1)
}

fn ok<T: serde::Serialize + ?Sized>(value: &T) -> HttpResponse {
    HttpResponse::new(200, serde_json::to_string(value).unwrap())
}

fn created<T: serde::Serialize>(value: &T) -> HttpResponse {
    HttpResponse::new(201, serde_json::to_string(value).unwrap())
}

fn not_found() -> HttpResponse {
    HttpResponse::new(404, r#"{"detail": "Not found."}"#)
}
