//! UI Components
//!
//! Reusable Leptos components shared by the pages.

pub mod barcode_scanner;
pub mod chart;
pub mod kpi_card;
pub mod loading;
pub mod nav;
pub mod pin_modal;
pub mod product_row;
pub mod toast;

pub use barcode_scanner::BarcodeScanner;
pub use chart::{Chart, ChartKind};
pub use kpi_card::KpiCard;
pub use loading::{InlineLoading, Loading};
pub use nav::Nav;
pub use pin_modal::PinModal;
pub use product_row::ProductRow;
pub use toast::Toast;
