//! Promotion form and display helpers

use rust_decimal::Decimal;
use thiserror::Error;

use crate::api::dto::NewPromotion;
use crate::models::{Category, Id, Product, Promotion, PromotionKind};
use crate::money::{format_number, parse_amount};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromotionFormError {
    #[error("Nombre y valor son obligatorios.")]
    MissingRequired,
    #[error("El valor debe ser un número mayor a 0.")]
    InvalidValue,
}

/// `10%` for percentages, `1.500` for fixed amounts
pub fn value_label(kind: PromotionKind, value: Decimal) -> String {
    match kind {
        PromotionKind::Percent => format!("{}%", value.normalize()),
        PromotionKind::Fixed => format_number(value),
    }
}

/// What the promotion applies to
pub fn scope_label(promotion: &Promotion, categories: &[Category]) -> String {
    if let Some(id) = promotion.category {
        return categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| format!("Categoría #{}", id));
    }
    match promotion.products.len() {
        0 => "-".to_string(),
        1 => "1 producto".to_string(),
        n => format!("{} productos", n),
    }
}

/// Products offered in the picker: in stock and matching the needle
pub fn pickable_products<'a>(products: &'a [Product], needle: &str) -> Vec<&'a Product> {
    let needle = needle.trim().to_lowercase();
    products
        .iter()
        .filter(|p| p.stock > 0)
        .filter(|p| {
            needle.is_empty()
                || p.name.to_lowercase().contains(&needle)
                || p.code.to_lowercase().contains(&needle)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotionForm {
    pub name: String,
    pub kind: PromotionKind,
    pub value: String,
    pub category: Option<Id>,
    pub products: Vec<Id>,
}

impl Default for PromotionForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: PromotionKind::Percent,
            value: String::new(),
            category: None,
            products: Vec::new(),
        }
    }
}

impl PromotionForm {
    /// Select or unselect a product
    pub fn toggle_product(&mut self, id: Id) {
        if let Some(pos) = self.products.iter().position(|p| *p == id) {
            self.products.remove(pos);
        } else {
            self.products.push(id);
        }
    }

    pub fn is_selected(&self, id: Id) -> bool {
        self.products.contains(&id)
    }

    /// New promotions start active
    pub fn validate(&self) -> Result<NewPromotion, PromotionFormError> {
        let name = self.name.trim();
        if name.is_empty() || self.value.trim().is_empty() {
            return Err(PromotionFormError::MissingRequired);
        }
        let value = parse_amount(&self.value)
            .filter(|v| *v > Decimal::ZERO)
            .ok_or(PromotionFormError::InvalidValue)?;

        Ok(NewPromotion {
            name: name.to_string(),
            kind: self.kind,
            value,
            active: true,
            category: self.category,
            products: self.products.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_value_label() {
        assert_eq!(
            value_label(PromotionKind::Percent, Decimal::from_str("10.00").unwrap()),
            "10%"
        );
        assert_eq!(
            value_label(PromotionKind::Percent, Decimal::from_str("12.50").unwrap()),
            "12.5%"
        );
        assert_eq!(value_label(PromotionKind::Fixed, Decimal::from(1500)), "1.500");
    }

    #[test]
    fn test_form_requires_name_and_value() {
        let mut form = PromotionForm {
            name: "Lácteos 10".into(),
            ..Default::default()
        };
        assert_eq!(form.validate(), Err(PromotionFormError::MissingRequired));

        form.value = "0".into();
        assert_eq!(form.validate(), Err(PromotionFormError::InvalidValue));

        form.value = "10".into();
        form.toggle_product(4);
        form.toggle_product(5);
        form.toggle_product(4);
        let payload = form.validate().unwrap();
        assert!(payload.active);
        assert_eq!(payload.products, vec![5]);
    }

    #[test]
    fn test_pickable_products_skip_out_of_stock() {
        let mk = |id: Id, name: &str, stock: i64| Product {
            id,
            code: format!("78{}", id),
            name: name.into(),
            category: None,
            category_name: None,
            price: Decimal::from(1000),
            stock,
            min_stock: 0,
            critical_stock: 0,
            active: true,
            top_seller: false,
        };
        let products = vec![mk(1, "Yogurt", 4), mk(2, "Yogurt griego", 0), mk(3, "Pan", 9)];
        let ids: Vec<Id> = pickable_products(&products, "yog").iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1]);
        assert_eq!(pickable_products(&products, "783").len(), 1);
        assert_eq!(pickable_products(&products, "").len(), 2);
    }

    #[test]
    fn test_scope_label() {
        let categories = vec![Category {
            id: 2,
            name: "Bebidas".into(),
        }];
        let mut promo = Promotion {
            id: 1,
            name: "x".into(),
            kind: PromotionKind::Fixed,
            value: Decimal::from(100),
            active: true,
            category: Some(2),
            products: vec![],
        };
        assert_eq!(scope_label(&promo, &categories), "Bebidas");
        promo.category = None;
        promo.products = vec![1, 2];
        assert_eq!(scope_label(&promo, &categories), "2 productos");
    }
}
