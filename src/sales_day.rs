//! Sales of one calendar day
//!
//! Days are taken in the register's local time zone; callers pass it in so
//! the browser can use [`chrono::Local`] and tests a fixed offset.

use chrono::{NaiveDate, TimeZone};
use rust_decimal::Decimal;

use crate::models::{Sale, SaleItem};

pub fn local_date<Tz: TimeZone>(sale: &Sale, tz: &Tz) -> NaiveDate {
    sale.created_at.with_timezone(tz).date_naive()
}

/// Sales recorded on `day`, newest first
pub fn sales_on<'a, Tz: TimeZone>(
    sales: &'a [Sale],
    day: NaiveDate,
    tz: &Tz,
    only_ok: bool,
) -> Vec<&'a Sale> {
    let mut found: Vec<&Sale> = sales
        .iter()
        .filter(|s| local_date(s, tz) == day)
        .filter(|s| !only_ok || s.is_ok())
        .collect();
    found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    found
}

/// Sum of sale totals; voided sales only count if they were passed in
pub fn day_total(sales: &[&Sale]) -> Decimal {
    sales.iter().map(|s| s.total).sum()
}

/// Breakdown shown when a sale row is expanded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemTotals {
    pub gross: Decimal,
    pub discount: Decimal,
    pub net: Decimal,
}

pub fn item_totals(items: &[SaleItem]) -> ItemTotals {
    items.iter().fold(ItemTotals::default(), |acc, item| ItemTotals {
        gross: acc.gross + item.unit_price * Decimal::from(item.qty),
        discount: acc.discount + item.discount_total(),
        net: acc.net + item.net_total(),
    })
}

/// Line total as reported by the backend, else computed from price and discount
pub fn line_total(item: &SaleItem) -> Decimal {
    item.line_total.unwrap_or_else(|| item.net_total())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PaymentMethod, SaleStatus};
    use chrono::{DateTime, FixedOffset, Utc};

    fn sale(id: i64, at: &str, status: SaleStatus, total: i64) -> Sale {
        Sale {
            id,
            status,
            created_at: DateTime::parse_from_rfc3339(at).unwrap().with_timezone(&Utc),
            payment_method: PaymentMethod::Cash,
            total: Decimal::from(total),
            note: String::new(),
            seller_name: None,
            items: vec![],
        }
    }

    #[test]
    fn test_day_uses_local_offset() {
        // UTC-4: 02:30Z on the 3rd is still the evening of the 2nd
        let tz = FixedOffset::west_opt(4 * 3600).unwrap();
        let sales = vec![
            sale(1, "2024-05-03T02:30:00Z", SaleStatus::Ok, 1000),
            sale(2, "2024-05-02T15:00:00Z", SaleStatus::Void, 500),
            sale(3, "2024-05-03T12:00:00Z", SaleStatus::Ok, 700),
        ];
        let day = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();

        let all = sales_on(&sales, day, &tz, false);
        assert_eq!(all.iter().map(|s| s.id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(day_total(&all), Decimal::from(1500));

        let ok = sales_on(&sales, day, &tz, true);
        assert_eq!(ok.len(), 1);
        assert_eq!(day_total(&ok), Decimal::from(1000));
    }

    #[test]
    fn test_item_totals() {
        let items = vec![
            SaleItem {
                product: 1,
                product_name: None,
                product_code: None,
                qty: 3,
                unit_price: Decimal::from(1000),
                discount: Decimal::from(100),
                line_total: None,
            },
            SaleItem {
                product: 2,
                product_name: None,
                product_code: None,
                qty: 1,
                unit_price: Decimal::from(500),
                discount: Decimal::ZERO,
                line_total: Some(Decimal::from(500)),
            },
        ];
        let totals = item_totals(&items);
        assert_eq!(totals.gross, Decimal::from(3500));
        assert_eq!(totals.discount, Decimal::from(300));
        assert_eq!(totals.net, Decimal::from(3200));
        assert_eq!(line_total(&items[0]), Decimal::from(2700));
    }
}
