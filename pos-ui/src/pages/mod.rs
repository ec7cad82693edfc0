//! Page Components
//!
//! One component per route.

pub mod admin;
pub mod audit;
pub mod cash;
pub mod categories;
pub mod dashboard;
pub mod login;
pub mod new_product;
pub mod pos;
pub mod profile;
pub mod promotions;
pub mod sales_today;
pub mod stock;

pub use admin::Admin;
pub use audit::Audit;
pub use cash::Cash;
pub use categories::Categories;
pub use dashboard::Dashboard;
pub use login::Login;
pub use new_product::NewProduct;
pub use pos::Pos;
pub use profile::Profile;
pub use promotions::Promotions;
pub use sales_today::SalesToday;
pub use stock::Stock;
