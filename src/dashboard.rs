//! Dashboard metrics
//!
//! Everything on the dashboard is derived here from the raw sale, product and
//! cash lists. Only sales with status `OK` count. Dates are local calendar
//! days in the time zone the caller passes in.

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate, TimeZone};
use rust_decimal::Decimal;

use crate::models::{CashSession, Category, Id, PaymentMethod, Product, Sale};
use crate::sales_day::local_date;

/// Auto-refresh period of the dashboard
pub const REFRESH_INTERVAL_MS: u32 = 10_000;
/// Products at or below this stock appear in the low-stock panel
pub const LOW_STOCK_LIMIT: i64 = 10;
pub const LOW_STOCK_ROWS: usize = 8;
pub const RECENT_ROWS: usize = 5;
pub const MONTHS_SHOWN: u32 = 6;
pub const NO_CATEGORY: &str = "Sin categoría";

const MONTH_LABELS: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sep", "oct", "nov", "dic",
];

/// Inclusive range of local days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// `None` when `from` is after `to`
    pub fn try_new(from: NaiveDate, to: NaiveDate) -> Option<Self> {
        (from <= to).then_some(Self { from, to })
    }

    /// The `days` days ending today, today included
    pub fn last_days(today: NaiveDate, days: i64) -> Self {
        Self {
            from: today - Duration::days(days.max(1) - 1),
            to: today,
        }
    }

    /// Default dashboard range: today and the six days before it
    pub fn default_for(today: NaiveDate) -> Self {
        Self::last_days(today, 7)
    }

    pub fn contains<Tz: TimeZone>(&self, sale: &Sale, tz: &Tz) -> bool {
        // from 00:00:00 to 23:59:59 local
        let day = local_date(sale, tz);
        day >= self.from && day <= self.to
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let to = self.to;
        self.from.iter_days().take_while(move |d| *d <= to)
    }
}

/// One labelled amount of a chart series
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesPoint {
    pub label: String,
    pub amount: Decimal,
}

impl SeriesPoint {
    fn new(label: impl Into<String>, amount: Decimal) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }
}

/// Sales taken since the drawer was opened
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinceOpen {
    pub total: Decimal,
    pub tickets: usize,
}

/// Raw lists the dashboard is computed from
#[derive(Debug, Clone, Copy)]
pub struct DashboardInput<'a> {
    pub sales: &'a [Sale],
    pub products: &'a [Product],
    pub categories: &'a [Category],
    pub open_session: Option<&'a CashSession>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardMetrics {
    pub total: Decimal,
    pub units: i64,
    pub tickets: usize,
    pub by_day: Vec<SeriesPoint>,
    pub by_month: Vec<SeriesPoint>,
    pub by_payment: Vec<SeriesPoint>,
    pub by_category: Vec<SeriesPoint>,
    pub top_category: String,
    pub since_open: Option<SinceOpen>,
    pub low_stock: Vec<Product>,
    pub recent: Vec<Sale>,
}

impl DashboardMetrics {
    pub fn compute<Tz: TimeZone>(input: DashboardInput<'_>, range: DateRange, tz: &Tz) -> Self {
        let ok: Vec<&Sale> = input.sales.iter().filter(|s| s.is_ok()).collect();
        let in_range: Vec<&Sale> = ok
            .iter()
            .copied()
            .filter(|s| range.contains(s, tz))
            .collect();

        let by_category = by_category(&in_range, input.products, input.categories);
        let top_category = by_category
            .first()
            .map(|p| p.label.clone())
            .unwrap_or_else(|| "-".to_string());

        let mut recent: Vec<Sale> = in_range.iter().map(|s| (*s).clone()).collect();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(RECENT_ROWS);

        Self {
            total: in_range.iter().map(|s| s.total).sum(),
            units: in_range.iter().map(|s| s.units()).sum(),
            tickets: in_range.len(),
            by_day: by_day(&in_range, range, tz),
            by_month: by_month(&in_range, range.to, tz),
            by_payment: by_payment(&in_range),
            by_category,
            top_category,
            since_open: input.open_session.map(|cash| since_open(&in_range, cash, tz)),
            low_stock: low_stock(input.products),
            recent,
        }
    }
}

/// One point per day in the range, zero-filled
pub fn by_day<Tz: TimeZone>(sales: &[&Sale], range: DateRange, tz: &Tz) -> Vec<SeriesPoint> {
    let mut totals: HashMap<NaiveDate, Decimal> = HashMap::new();
    for sale in sales {
        *totals.entry(local_date(sale, tz)).or_default() += sale.total;
    }
    range
        .days()
        .map(|day| {
            SeriesPoint::new(
                day.format("%d/%m").to_string(),
                totals.get(&day).copied().unwrap_or_default(),
            )
        })
        .collect()
}

/// The six calendar months ending with the month of `end`, oldest first
pub fn by_month<Tz: TimeZone>(sales: &[&Sale], end: NaiveDate, tz: &Tz) -> Vec<SeriesPoint> {
    let months: Vec<(i32, u32)> = (0..MONTHS_SHOWN)
        .rev()
        .map(|back| shift_month(end.year(), end.month(), back))
        .collect();

    let mut totals: HashMap<(i32, u32), Decimal> = HashMap::new();
    for sale in sales {
        let day = local_date(sale, tz);
        *totals.entry((day.year(), day.month())).or_default() += sale.total;
    }

    months
        .into_iter()
        .map(|key| {
            SeriesPoint::new(
                MONTH_LABELS[(key.1 - 1) as usize],
                totals.get(&key).copied().unwrap_or_default(),
            )
        })
        .collect()
}

fn shift_month(year: i32, month: u32, back: u32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 - back as i32;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

/// Totals per payment method, largest first
pub fn by_payment(sales: &[&Sale]) -> Vec<SeriesPoint> {
    let mut totals: HashMap<PaymentMethod, Decimal> = HashMap::new();
    for sale in sales {
        *totals.entry(sale.payment_method.clone()).or_default() += sale.total;
    }
    let mut points: Vec<SeriesPoint> = totals
        .into_iter()
        .map(|(method, amount)| SeriesPoint::new(method.code(), amount))
        .collect();
    sort_desc(&mut points);
    points
}

/// Net item revenue per category, largest first
pub fn by_category(sales: &[&Sale], products: &[Product], categories: &[Category]) -> Vec<SeriesPoint> {
    let products: HashMap<Id, &Product> = products.iter().map(|p| (p.id, p)).collect();
    let category_names: HashMap<Id, &str> =
        categories.iter().map(|c| (c.id, c.name.as_str())).collect();

    let mut totals: HashMap<String, Decimal> = HashMap::new();
    for item in sales.iter().flat_map(|s| s.items.iter()) {
        let name = products
            .get(&item.product)
            .and_then(|p| {
                p.category_name.clone().or_else(|| {
                    p.category
                        .and_then(|id| category_names.get(&id))
                        .map(|n| n.to_string())
                })
            })
            .unwrap_or_else(|| NO_CATEGORY.to_string());
        *totals.entry(name).or_default() += item.net_total();
    }

    let mut points: Vec<SeriesPoint> = totals
        .into_iter()
        .map(|(label, amount)| SeriesPoint { label, amount })
        .collect();
    sort_desc(&mut points);
    points
}

fn sort_desc(points: &mut [SeriesPoint]) {
    points.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.label.cmp(&b.label)));
}

/// OK sales on the opening day at or after the drawer was opened
pub fn since_open<Tz: TimeZone>(sales: &[&Sale], cash: &CashSession, tz: &Tz) -> SinceOpen {
    let opened_day = cash.opened_at.with_timezone(tz).date_naive();
    sales
        .iter()
        .filter(|s| local_date(s, tz) == opened_day && s.created_at >= cash.opened_at)
        .fold(SinceOpen::default(), |acc, s| SinceOpen {
            total: acc.total + s.total,
            tickets: acc.tickets + 1,
        })
}

/// Up to eight products with stock at or below ten, lowest first
pub fn low_stock(products: &[Product]) -> Vec<Product> {
    let mut low: Vec<Product> = products
        .iter()
        .filter(|p| p.stock <= LOW_STOCK_LIMIT)
        .cloned()
        .collect();
    low.sort_by_key(|p| p.stock);
    low.truncate(LOW_STOCK_ROWS);
    low
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CashStatus, SaleItem, SaleStatus};
    use chrono::{DateTime, FixedOffset, Utc};

    fn tz() -> FixedOffset {
        FixedOffset::west_opt(4 * 3600).unwrap()
    }

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sale(id: i64, when: &str, method: &str, items: Vec<(Id, i64, i64, i64)>) -> Sale {
        let items: Vec<SaleItem> = items
            .into_iter()
            .map(|(product, qty, price, discount)| SaleItem {
                product,
                product_name: None,
                product_code: None,
                qty,
                unit_price: Decimal::from(price),
                discount: Decimal::from(discount),
                line_total: None,
            })
            .collect();
        Sale {
            id,
            status: SaleStatus::Ok,
            created_at: at(when),
            payment_method: PaymentMethod::from_code(method),
            total: items.iter().map(SaleItem::net_total).sum(),
            note: String::new(),
            seller_name: None,
            items,
        }
    }

    fn product(id: Id, stock: i64, category: Option<Id>, category_name: Option<&str>) -> Product {
        Product {
            id,
            code: id.to_string(),
            name: format!("P{}", id),
            category,
            category_name: category_name.map(String::from),
            price: Decimal::from(1000),
            stock,
            min_stock: 0,
            critical_stock: 0,
            active: true,
            top_seller: false,
        }
    }

    #[test]
    fn test_range_is_inclusive_in_local_time() {
        let range = DateRange::try_new(day(2024, 5, 1), day(2024, 5, 3)).unwrap();
        // 03:59Z on the 4th is 23:59 on the 3rd at UTC-4
        assert!(range.contains(&sale(1, "2024-05-04T03:59:00Z", "CASH", vec![]), &tz()));
        assert!(!range.contains(&sale(2, "2024-05-04T04:00:00Z", "CASH", vec![]), &tz()));
        assert!(range.contains(&sale(3, "2024-05-01T04:00:00Z", "CASH", vec![]), &tz()));
        assert!(DateRange::try_new(day(2024, 5, 3), day(2024, 5, 1)).is_none());
        assert_eq!(range.days().count(), 3);
    }

    #[test]
    fn test_default_range_is_last_seven_days() {
        let range = DateRange::default_for(day(2024, 5, 10));
        assert_eq!(range.from, day(2024, 5, 4));
        assert_eq!(range.to, day(2024, 5, 10));
    }

    #[test]
    fn test_compute_totals_and_breakdowns() {
        let mut voided = sale(9, "2024-05-02T15:00:00Z", "CASH", vec![(1, 10, 1000, 0)]);
        voided.status = SaleStatus::Void;
        let sales = vec![
            sale(1, "2024-05-02T15:00:00Z", "CASH", vec![(1, 2, 1000, 100)]),
            sale(2, "2024-05-03T15:00:00Z", "DEBIT", vec![(2, 1, 5000, 0)]),
            sale(3, "2024-05-03T16:00:00Z", "", vec![(99, 1, 300, 0)]),
            sale(4, "2024-04-10T15:00:00Z", "CASH", vec![(1, 1, 1000, 0)]),
            voided,
        ];
        let products = vec![
            product(1, 3, Some(1), Some("Bebidas")),
            product(2, 50, Some(2), None),
        ];
        let categories = vec![Category {
            id: 2,
            name: "Abarrotes".into(),
        }];
        let input = DashboardInput {
            sales: &sales,
            products: &products,
            categories: &categories,
            open_session: None,
        };
        let range = DateRange::try_new(day(2024, 5, 1), day(2024, 5, 3)).unwrap();
        let m = DashboardMetrics::compute(input, range, &tz());

        assert_eq!(m.tickets, 3);
        assert_eq!(m.total, Decimal::from(1800 + 5000 + 300));
        assert_eq!(m.units, 4);

        let days: Vec<Decimal> = m.by_day.iter().map(|p| p.amount).collect();
        assert_eq!(days, vec![Decimal::ZERO, Decimal::from(1800), Decimal::from(5300)]);
        assert_eq!(m.by_day[0].label, "01/05");

        assert_eq!(m.by_payment[0], SeriesPoint::new("DEBIT", Decimal::from(5000)));
        assert!(m.by_payment.iter().any(|p| p.label == "OTRO"));

        assert_eq!(m.by_category[0].label, "Abarrotes");
        assert_eq!(m.top_category, "Abarrotes");
        assert!(m.by_category.iter().any(|p| p.label == NO_CATEGORY));
        assert_eq!(m.recent.first().map(|s| s.id), Some(3));

        let months: Vec<&str> = m.by_month.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(months, vec!["dic", "ene", "feb", "mar", "abr", "may"]);
        // the April sale is outside the range
        assert_eq!(m.by_month[4].amount, Decimal::ZERO);
        assert_eq!(m.by_month[5].amount, Decimal::from(7100));
    }

    #[test]
    fn test_sales_outside_range_are_ignored_everywhere() {
        let cash = CashSession {
            id: 1,
            status: CashStatus::Open,
            opened_by: Some(1),
            closed_by: None,
            opened_by_name: None,
            closed_by_name: None,
            opening_amount: Decimal::from(10000),
            closing_amount: None,
            diff: None,
            opened_at: at("2024-03-15T12:00:00Z"),
            closed_at: None,
        };
        let sales = vec![sale(1, "2024-03-15T15:00:00Z", "CASH", vec![(1, 1, 5000, 0)])];
        let input = DashboardInput {
            sales: &sales,
            products: &[],
            categories: &[],
            open_session: Some(&cash),
        };
        let range = DateRange::try_new(day(2024, 5, 1), day(2024, 5, 7)).unwrap();
        let m = DashboardMetrics::compute(input, range, &tz());

        assert_eq!(m.total, Decimal::ZERO);
        assert!(m.by_month.iter().all(|p| p.amount.is_zero()));
        assert_eq!(m.by_month[3].label, "mar");
        assert_eq!(m.since_open, Some(SinceOpen::default()));
        assert!(m.recent.is_empty());
    }

    #[test]
    fn test_empty_range_has_no_top_category() {
        let input = DashboardInput {
            sales: &[],
            products: &[],
            categories: &[],
            open_session: None,
        };
        let m = DashboardMetrics::compute(input, DateRange::default_for(day(2024, 1, 3)), &tz());
        assert_eq!(m.top_category, "-");
        assert_eq!(m.by_day.len(), 7);
        assert_eq!(m.by_month[0].label, "ago");
    }

    #[test]
    fn test_since_open_counts_opening_day_only() {
        let cash = CashSession {
            id: 1,
            status: CashStatus::Open,
            opened_by: Some(1),
            closed_by: None,
            opened_by_name: None,
            closed_by_name: None,
            opening_amount: Decimal::from(20000),
            closing_amount: None,
            diff: None,
            opened_at: at("2024-05-02T13:00:00Z"),
            closed_at: None,
        };
        let sales = vec![
            sale(1, "2024-05-02T12:00:00Z", "CASH", vec![(1, 1, 1000, 0)]),
            sale(2, "2024-05-02T14:00:00Z", "CASH", vec![(1, 1, 2000, 0)]),
            sale(3, "2024-05-03T14:00:00Z", "CASH", vec![(1, 1, 4000, 0)]),
        ];
        let refs: Vec<&Sale> = sales.iter().collect();
        let since = since_open(&refs, &cash, &tz());
        assert_eq!(since.tickets, 1);
        assert_eq!(since.total, Decimal::from(2000));
    }

    #[test]
    fn test_low_stock_top_eight_ascending() {
        let products: Vec<Product> = (1..=12)
            .map(|id| product(id, 13 - id, None, None))
            .collect();
        let low = low_stock(&products);
        assert_eq!(low.len(), 8);
        assert_eq!(low[0].stock, 1);
        assert!(low.windows(2).all(|w| w[0].stock <= w[1].stock));
        assert!(low.iter().all(|p| p.stock <= LOW_STOCK_LIMIT));
    }
}
