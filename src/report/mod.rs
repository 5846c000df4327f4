//! Pure aggregation over collections fetched from the API.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, TimeZone};
use std::collections::BTreeMap;
use std::fmt::Display;

use crate::api::{Customer, InventoryEntry, Order, RevenueEntry};

/// Merge the three inventory buckets keyed by product id. Later buckets
/// overwrite earlier ones, so the last occurrence of an id wins.
pub fn dedup_inventory(
    low_stock: &[InventoryEntry],
    out_of_stock: &[InventoryEntry],
    most_stocked: &[InventoryEntry],
) -> Vec<InventoryEntry> {
    let mut by_id: BTreeMap<&str, &InventoryEntry> = BTreeMap::new();
    for entry in low_stock.iter().chain(out_of_stock).chain(most_stocked) {
        by_id.insert(entry.product_id.as_str(), entry);
    }
    by_id.into_values().cloned().collect()
}

pub fn total_stock(entries: &[InventoryEntry]) -> i64 {
    entries.iter().map(|e| e.stock).sum()
}

/// Monday and Sunday of the week containing `today`
pub fn week_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    // Sunday is day 7, not 0
    let day = i64::from(today.weekday().number_from_monday());
    let monday = today - Duration::days(day - 1);
    let sunday = monday + Duration::days(6);
    (monday, sunday)
}

/// Sum of entries dated within `[start, end]`, both ends included
pub fn sum_in_range(entries: &[RevenueEntry], start: NaiveDate, end: NaiveDate) -> f64 {
    entries
        .iter()
        .filter(|e| e.date >= start && e.date <= end)
        .map(|e| e.total)
        .sum()
}

pub fn weekly_revenue(entries: &[RevenueEntry], today: NaiveDate) -> f64 {
    let (monday, sunday) = week_bounds(today);
    sum_in_range(entries, monday, sunday)
}

pub fn monthly_revenue(entries: &[RevenueEntry]) -> f64 {
    entries.iter().map(|e| e.total).sum()
}

pub fn daily_revenue(entries: &[RevenueEntry], day: NaiveDate) -> f64 {
    sum_in_range(entries, day, day)
}

/// Orders whose timestamp, seen in `tz`, falls on `day`. Undated orders never match.
pub fn orders_on<'a, Tz: TimeZone>(orders: &'a [Order], day: NaiveDate, tz: &Tz) -> Vec<&'a Order> {
    orders
        .iter()
        .filter(|o| {
            o.order_date
                .map(|ts| ts.with_timezone(tz).date_naive() == day)
                .unwrap_or(false)
        })
        .collect()
}

pub fn orders_today(orders: &[Order]) -> Vec<&Order> {
    let now: DateTime<Local> = Local::now();
    orders_on(orders, now.date_naive(), &Local)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DebtSummary {
    pub total_debt: f64,
    pub total_returnable_debt: i64,
    pub customers_in_debt: usize,
}

pub fn debt_summary(customers: &[Customer]) -> DebtSummary {
    customers.iter().fold(DebtSummary::default(), |mut acc, c| {
        acc.total_debt += c.debt;
        acc.total_returnable_debt += c.returnable_debt;
        if c.debt > 0.0 || c.returnable_debt > 0 {
            acc.customers_in_debt += 1;
        }
        acc
    })
}

/// A view's fetch either succeeds or renders empty. Failures are logged and
/// swallowed; nothing is retried.
pub fn or_empty<T: Default, E: Display>(result: Result<T, E>, what: &str) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "could not load {what}, showing empty result");
            T::default()
        }
    }
}
