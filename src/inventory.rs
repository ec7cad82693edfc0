//! Stock levels, inventory KPIs and product forms

use rust_decimal::Decimal;
use thiserror::Error;

use crate::api::dto::{NewProduct, ProductUpdate};
use crate::models::{Category, Id, Product};
use crate::money::parse_amount;

/// Critical threshold used when a product has none configured
pub const DEFAULT_CRITICAL_STOCK: i64 = 10;
/// Minimum threshold used when a product has none configured
pub const DEFAULT_MIN_STOCK: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StockStatus {
    Low,
    Medium,
    Normal,
}

impl StockStatus {
    pub fn label(self) -> &'static str {
        match self {
            StockStatus::Low => "Bajo",
            StockStatus::Medium => "Medio",
            StockStatus::Normal => "Normal",
        }
    }
}

pub fn critical_threshold(product: &Product) -> i64 {
    if product.critical_stock > 0 {
        product.critical_stock
    } else {
        DEFAULT_CRITICAL_STOCK
    }
}

pub fn min_threshold(product: &Product) -> i64 {
    if product.min_stock > 0 {
        product.min_stock
    } else {
        DEFAULT_MIN_STOCK
    }
}

pub fn stock_status(product: &Product) -> StockStatus {
    if product.stock <= critical_threshold(product) {
        StockStatus::Low
    } else if product.stock <= min_threshold(product) {
        StockStatus::Medium
    } else {
        StockStatus::Normal
    }
}

/// Header figures of the stock page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InventoryKpis {
    pub products: usize,
    pub units: i64,
    pub low: usize,
}

pub fn kpis(products: &[Product]) -> InventoryKpis {
    InventoryKpis {
        products: products.len(),
        units: products.iter().map(|p| p.stock).sum(),
        low: products
            .iter()
            .filter(|p| p.stock <= critical_threshold(p))
            .count(),
    }
}

/// Needle and category filter of the stock table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockFilter {
    pub needle: String,
    pub category: Option<Id>,
    pub only_low: bool,
}

impl StockFilter {
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = self.category {
            if product.category != Some(category) {
                return false;
            }
        }
        if self.only_low && stock_status(product) != StockStatus::Low {
            return false;
        }
        let needle = self.needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        product.name.to_lowercase().contains(&needle)
            || product.code.to_lowercase().contains(&needle)
            || product
                .category_name
                .as_deref()
                .map(|c| c.to_lowercase().contains(&needle))
                .unwrap_or(false)
    }

    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }
}

/// Case-insensitive match on the category name
pub fn filter_categories<'a>(categories: &'a [Category], needle: &str) -> Vec<&'a Category> {
    let needle = needle.trim().to_lowercase();
    categories
        .iter()
        .filter(|c| needle.is_empty() || c.name.to_lowercase().contains(&needle))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductFormError {
    #[error("El nombre no puede estar vacio.")]
    EmptyName,
    #[error("El precio debe ser >= 0.")]
    InvalidPrice,
    #[error("El stock debe ser un entero >= 0.")]
    InvalidStock,
    #[error("El stock minimo debe ser un entero >= 0.")]
    InvalidMinStock,
    #[error("El stock critico debe ser un entero >= 0.")]
    InvalidCriticalStock,
    #[error("El stock critico debe ser <= stock minimo.")]
    CriticalAboveMinimum,
    #[error("Código, nombre y precio son obligatorios.")]
    MissingRequired,
}

/// Inline edit row of the stock table, holding raw input text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub name: String,
    pub price: String,
    pub stock: String,
    pub min_stock: String,
    pub critical_stock: String,
}

impl ProductForm {
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price.normalize().to_string(),
            stock: product.stock.to_string(),
            min_stock: product.min_stock.to_string(),
            critical_stock: product.critical_stock.to_string(),
        }
    }

    pub fn validate(&self) -> Result<ProductUpdate, ProductFormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ProductFormError::EmptyName);
        }
        let price = parse_amount(&self.price)
            .filter(|p| *p >= Decimal::ZERO)
            .ok_or(ProductFormError::InvalidPrice)?;
        let stock = parse_count(&self.stock, false).ok_or(ProductFormError::InvalidStock)?;
        let min_stock =
            parse_count(&self.min_stock, true).ok_or(ProductFormError::InvalidMinStock)?;
        let critical_stock = parse_count(&self.critical_stock, true)
            .ok_or(ProductFormError::InvalidCriticalStock)?;

        if min_stock > 0 && critical_stock > 0 && critical_stock > min_stock {
            return Err(ProductFormError::CriticalAboveMinimum);
        }

        Ok(ProductUpdate {
            name: name.to_string(),
            price,
            stock,
            min_stock,
            critical_stock,
        })
    }
}

/// Non-negative integer; blank reads as zero when `blank_is_zero`
fn parse_count(input: &str, blank_is_zero: bool) -> Option<i64> {
    let input = input.trim();
    if input.is_empty() {
        return blank_is_zero.then_some(0);
    }
    input.parse::<i64>().ok().filter(|n| *n >= 0)
}

/// Form of the new product page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewProductForm {
    pub code: String,
    pub name: String,
    pub category: Option<Id>,
    pub price: String,
    pub stock: String,
    pub top_seller: bool,
}

impl NewProductForm {
    pub fn validate(&self) -> Result<NewProduct, ProductFormError> {
        let code = self.code.trim();
        let name = self.name.trim();
        if code.is_empty() || name.is_empty() || self.price.trim().is_empty() {
            return Err(ProductFormError::MissingRequired);
        }
        let price = parse_amount(&self.price)
            .filter(|p| *p >= Decimal::ZERO)
            .ok_or(ProductFormError::InvalidPrice)?;
        let stock = parse_count(&self.stock, true).ok_or(ProductFormError::InvalidStock)?;

        Ok(NewProduct {
            code: code.to_string(),
            name: name.to_string(),
            category: self.category,
            price,
            stock,
            active: true,
            top_seller: self.top_seller,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: i64, min_stock: i64, critical_stock: i64) -> Product {
        Product {
            id: 1,
            code: "7801".into(),
            name: "Leche entera".into(),
            category: Some(3),
            category_name: Some("Lácteos".into()),
            price: Decimal::from(1100),
            stock,
            min_stock,
            critical_stock,
            active: true,
            top_seller: false,
        }
    }

    #[test]
    fn test_status_with_default_thresholds() {
        assert_eq!(stock_status(&product(10, 0, 0)), StockStatus::Low);
        assert_eq!(stock_status(&product(11, 0, 0)), StockStatus::Medium);
        assert_eq!(stock_status(&product(30, 0, 0)), StockStatus::Medium);
        assert_eq!(stock_status(&product(31, 0, 0)), StockStatus::Normal);
    }

    #[test]
    fn test_status_with_configured_thresholds() {
        assert_eq!(stock_status(&product(5, 8, 5)), StockStatus::Low);
        assert_eq!(stock_status(&product(8, 8, 5)), StockStatus::Medium);
        assert_eq!(stock_status(&product(9, 8, 5)), StockStatus::Normal);
    }

    #[test]
    fn test_kpis() {
        let products = vec![product(2, 0, 0), product(50, 0, 0), product(4, 0, 3)];
        let k = kpis(&products);
        assert_eq!(k.products, 3);
        assert_eq!(k.units, 56);
        assert_eq!(k.low, 1);
    }

    #[test]
    fn test_filter_matches_category_name() {
        let products = vec![product(2, 0, 0)];
        let filter = StockFilter {
            needle: "lácteos".into(),
            ..Default::default()
        };
        assert_eq!(filter.apply(&products).len(), 1);

        let other = StockFilter {
            category: Some(9),
            ..Default::default()
        };
        assert!(other.apply(&products).is_empty());
    }

    #[test]
    fn test_form_validation() {
        let mut form = ProductForm::from_product(&product(12, 20, 5));
        assert_eq!(form.price, "1100");
        let update = form.validate().unwrap();
        assert_eq!(update.critical_stock, 5);

        form.critical_stock = "25".into();
        assert_eq!(form.validate(), Err(ProductFormError::CriticalAboveMinimum));

        form.min_stock = "".into();
        assert_eq!(form.validate().unwrap().min_stock, 0);

        form.stock = "1.5".into();
        assert_eq!(form.validate(), Err(ProductFormError::InvalidStock));

        form.price = "-1".into();
        assert_eq!(form.validate(), Err(ProductFormError::InvalidPrice));

        form.name = "  ".into();
        assert_eq!(
            form.validate().unwrap_err().to_string(),
            "El nombre no puede estar vacio."
        );
    }

    #[test]
    fn test_new_product_requires_code_name_price() {
        let form = NewProductForm {
            code: "123".into(),
            name: "Queso".into(),
            price: "".into(),
            ..Default::default()
        };
        assert_eq!(form.validate(), Err(ProductFormError::MissingRequired));

        let form = NewProductForm {
            price: "2990".into(),
            ..form
        };
        let payload = form.validate().unwrap();
        assert_eq!(payload.stock, 0);
        assert!(payload.active);
    }

    #[test]
    fn test_category_search_ignores_case() {
        let categories = vec![
            Category { id: 1, name: "Lácteos".into() },
            Category { id: 2, name: "Bebidas".into() },
            Category { id: 3, name: "Bebidas alcohólicas".into() },
        ];
        let ids = |needle: &str| -> Vec<Id> {
            filter_categories(&categories, needle).iter().map(|c| c.id).collect()
        };
        assert_eq!(ids("BEBI"), vec![2, 3]);
        assert_eq!(ids(" lác "), vec![1]);
        assert_eq!(ids(""), vec![1, 2, 3]);
        assert!(ids("carnes").is_empty());
    }
}
