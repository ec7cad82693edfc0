//! Point-of-sale cart
//!
//! The cart only knows list prices. Promotions are priced by the backend
//! preview and layered on top when displaying lines and totals.

use rust_decimal::Decimal;

use crate::api::dto::{NewSale, NewSaleItem, PreviewItem, PreviewRequest};
use crate::models::{Id, PaymentMethod, Product, SalePreview};

/// Search-as-you-type waits for this many characters
pub const SEARCH_MIN_CHARS: usize = 2;
/// Pause after the last keystroke before searching
pub const SEARCH_DEBOUNCE_MS: u32 = 250;

/// Whether a typed query is long enough to hit the backend
pub fn should_search(query: &str) -> bool {
    query.trim().chars().count() >= SEARCH_MIN_CHARS
}

/// One product in the cart
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub product_id: Id,
    pub code: String,
    pub name: String,
    pub unit_price: Decimal,
    pub qty: i64,
}

impl CartLine {
    pub fn gross_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.qty)
    }
}

/// A cart line joined with its backend pricing
#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub line: CartLine,
    pub discount_unit: Decimal,
    pub net_unit: Decimal,
    pub net_total: Decimal,
}

impl PricedLine {
    pub fn promoted(&self) -> bool {
        self.discount_unit > Decimal::ZERO
    }
}

/// Totals shown under the cart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartTotals {
    pub subtotal: Decimal,
    pub discount: Decimal,
    /// What the customer pays: preview net, or the subtotal without a preview
    pub total: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add one unit, merging with an existing line for the same product
    pub fn add(&mut self, product: &Product) {
        match self.lines.iter_mut().find(|l| l.product_id == product.id) {
            Some(line) => line.qty += 1,
            None => self.lines.push(CartLine {
                product_id: product.id,
                code: product.code.clone(),
                name: product.name.clone(),
                unit_price: product.price,
                qty: 1,
            }),
        }
    }

    pub fn increment(&mut self, product_id: Id) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.qty += 1;
        }
    }

    /// Never drops below one unit; use [`Cart::remove`] to take the line out
    pub fn decrement(&mut self, product_id: Id) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.qty = (line.qty - 1).max(1);
        }
    }

    pub fn remove(&mut self, product_id: Id) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of list price times quantity, before any promotion
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::gross_total).sum()
    }

    pub fn units(&self) -> i64 {
        self.lines.iter().map(|l| l.qty).sum()
    }

    pub fn preview_request(&self) -> PreviewRequest {
        PreviewRequest {
            items: self
                .lines
                .iter()
                .map(|l| PreviewItem {
                    product: l.product_id,
                    qty: l.qty,
                    unit_price: l.unit_price,
                })
                .collect(),
        }
    }

    /// Checkout body; discounts are left at zero for the backend to apply
    pub fn checkout_request(&self, payment_method: PaymentMethod) -> NewSale {
        NewSale {
            payment_method,
            items: self
                .lines
                .iter()
                .map(|l| NewSaleItem {
                    product: l.product_id,
                    qty: l.qty,
                    unit_price: l.unit_price,
                    discount: Decimal::ZERO,
                })
                .collect(),
        }
    }

    pub fn priced_lines(&self, preview: Option<&SalePreview>) -> Vec<PricedLine> {
        self.lines
            .iter()
            .map(|line| {
                let discount_unit = preview
                    .and_then(|p| p.line_for(line.product_id))
                    .map(|p| p.discount_unit)
                    .unwrap_or_default();
                let net_unit = line.unit_price - discount_unit;
                PricedLine {
                    line: line.clone(),
                    discount_unit,
                    net_unit,
                    net_total: net_unit * Decimal::from(line.qty),
                }
            })
            .collect()
    }

    pub fn totals(&self, preview: Option<&SalePreview>) -> CartTotals {
        let subtotal = self.subtotal();
        match preview {
            Some(p) => CartTotals {
                subtotal,
                discount: p.total_descuento,
                total: p.total_neto,
            },
            None => CartTotals {
                subtotal,
                discount: Decimal::ZERO,
                total: subtotal,
            },
        }
    }
}
