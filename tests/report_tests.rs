use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, TimeZone};
use std::collections::HashSet;
use waterdesk::api::{Customer, InventoryEntry, Order, RevenueEntry};
use waterdesk::report::{
    daily_revenue, debt_summary, dedup_inventory, monthly_revenue, or_empty, orders_on,
    sum_in_range, total_stock, week_bounds, weekly_revenue,
};

fn entry(id: &str, name: &str, stock: i64) -> InventoryEntry {
    InventoryEntry {
        product_id: id.to_string(),
        product_name: name.to_string(),
        stock,
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn vietnam() -> FixedOffset {
    FixedOffset::east_opt(7 * 3600).unwrap()
}

fn order_at(id: &str, ts: Option<DateTime<FixedOffset>>) -> Order {
    Order {
        id: id.to_string(),
        order_date: ts,
        ..Order::default()
    }
}

/// One entry per day of the month, each worth its day number times 1000
fn month_series(year: i32, month: u32) -> Vec<RevenueEntry> {
    let mut day = date(year, month, 1);
    let mut out = Vec::new();
    while day.month() == month {
        out.push(RevenueEntry::new(day, f64::from(day.day()) * 1000.0));
        day += Duration::days(1);
    }
    out
}

#[test]
fn test_dedup_keeps_one_entry_per_product() {
    let low = vec![entry("1", "Bình 20L", 5), entry("2", "Chai 500ml", 3)];
    let out = vec![entry("3", "Chai 1.5L", 0), entry("2", "Chai 500ml", 0)];
    let most = vec![entry("4", "Thùng 24 chai", 900), entry("1", "Bình 20L", 7)];

    let merged = dedup_inventory(&low, &out, &most);

    assert_eq!(merged.len(), 4);
    let ids: HashSet<&str> = merged.iter().map(|e| e.product_id.as_str()).collect();
    assert_eq!(ids.len(), merged.len());
    assert_eq!(merged[1], entry("2", "Chai 500ml", 0));
}

#[test]
fn test_dedup_last_write_wins() {
    let low = vec![entry("1", "Bình 20L", 5)];
    let out = vec![entry("1", "Bình 20L (cũ)", 0)];
    let most = vec![entry("1", "Bình 20L mới", 120)];

    let merged = dedup_inventory(&low, &out, &most);
    assert_eq!(merged, vec![entry("1", "Bình 20L mới", 120)]);

    // Within one bucket, the later entry wins too
    let merged = dedup_inventory(&[entry("9", "a", 1), entry("9", "b", 2)], &[], &[]);
    assert_eq!(merged, vec![entry("9", "b", 2)]);
}

#[test]
fn test_total_stock_counts_deduplicated_entries_only() {
    let low = vec![entry("1", "Bình 20L", 5)];
    let most = vec![entry("1", "Bình 20L", 5), entry("2", "Chai 500ml", 40)];

    let merged = dedup_inventory(&low, &[], &most);
    assert_eq!(total_stock(&merged), 45);
    assert_eq!(total_stock(&[]), 0);
}

#[test]
fn test_week_bounds_monday_to_sunday() {
    // 2026-10-16 is a Friday
    assert_eq!(week_bounds(date(2026, 10, 16)), (date(2026, 10, 12), date(2026, 10, 18)));
    // Monday is its own start
    assert_eq!(week_bounds(date(2026, 10, 12)), (date(2026, 10, 12), date(2026, 10, 18)));
    // Sunday is day 7, so it closes the week rather than opening the next one
    assert_eq!(week_bounds(date(2026, 10, 18)), (date(2026, 10, 12), date(2026, 10, 18)));
}

#[test]
fn test_weekly_revenue_matches_explicit_range_sum() {
    let series = month_series(2026, 10);

    for day in 1..=31 {
        let today = date(2026, 10, day);
        let (monday, sunday) = week_bounds(today);

        let expected: f64 = series
            .iter()
            .filter(|e| e.date >= monday && e.date <= sunday)
            .map(|e| e.total)
            .sum();

        assert_eq!(weekly_revenue(&series, today), expected, "today = {today}");
        assert_eq!(sum_in_range(&series, monday, sunday), expected);
    }
}

#[test]
fn test_weekly_revenue_across_month_boundary() {
    // 2026-10-01 is a Thursday: the week starts in September, outside the series
    let series = month_series(2026, 10);
    let today = date(2026, 10, 1);

    assert_eq!(week_bounds(today).0, date(2026, 9, 28));
    assert_eq!(weekly_revenue(&series, today), 1000.0 + 2000.0 + 3000.0 + 4000.0);

    // 2026-10-31 is a Saturday: the week runs into November
    let today = date(2026, 10, 31);
    assert_eq!(week_bounds(today).1, date(2026, 11, 1));
    let expected: f64 = (26..=31).map(|d| f64::from(d) * 1000.0).sum();
    assert_eq!(weekly_revenue(&series, today), expected);
}

#[test]
fn test_monthly_and_daily_revenue() {
    let series = month_series(2026, 2);
    assert_eq!(series.len(), 28);
    let expected: f64 = (1..=28).map(|d| f64::from(d) * 1000.0).sum();
    assert_eq!(monthly_revenue(&series), expected);
    assert_eq!(daily_revenue(&series, date(2026, 2, 14)), 14000.0);
    assert_eq!(daily_revenue(&series, date(2026, 3, 1)), 0.0);
}

#[test]
fn test_orders_on_keeps_same_calendar_day_only() {
    let tz = vietnam();
    let at = |d: u32, h: u32, m: u32, s: u32| Some(tz.with_ymd_and_hms(2026, 10, d, h, m, s).unwrap());

    let orders = vec![
        order_at("morning", at(16, 8, 0, 0)),
        order_at("evening", at(16, 21, 45, 0)),
        order_at("first-second", at(16, 0, 0, 0)),
        order_at("last-second", at(16, 23, 59, 59)),
        order_at("yesterday-late", at(15, 23, 59, 59)),
        order_at("tomorrow-early", at(17, 0, 0, 0)),
        order_at("undated", None),
    ];

    let kept: Vec<&str> = orders_on(&orders, date(2026, 10, 16), &tz)
        .into_iter()
        .map(|o| o.id.as_str())
        .collect();

    assert_eq!(kept, vec!["morning", "evening", "first-second", "last-second"]);
}

#[test]
fn test_orders_on_compares_in_the_given_zone() {
    // 2026-10-15T20:00Z is already the 16th in UTC+7
    let utc_evening = DateTime::parse_from_rfc3339("2026-10-15T20:00:00Z").unwrap();
    let orders = vec![order_at("late-utc", Some(utc_evening))];

    assert_eq!(orders_on(&orders, date(2026, 10, 16), &vietnam()).len(), 1);
    assert_eq!(orders_on(&orders, date(2026, 10, 15), &vietnam()).len(), 0);
}

#[test]
fn test_debt_summary() {
    let customers = vec![
        Customer {
            name: "Tạp hóa Minh".to_string(),
            debt: 250_000.0,
            returnable_debt: 3,
            ..Customer::default()
        },
        Customer {
            name: "Đại lý Hòa Bình".to_string(),
            debt: 0.0,
            returnable_debt: 12,
            ..Customer::default()
        },
        Customer {
            name: "Chị Lan".to_string(),
            ..Customer::default()
        },
    ];

    let summary = debt_summary(&customers);
    assert_eq!(summary.total_debt, 250_000.0);
    assert_eq!(summary.total_returnable_debt, 15);
    assert_eq!(summary.customers_in_debt, 2);
}

#[test]
fn test_or_empty_swallows_failures() {
    let failed: Result<Vec<Order>, String> = Err("connection refused".to_string());
    assert!(or_empty(failed, "orders").is_empty());

    let ok: Result<i64, String> = Ok(7);
    assert_eq!(or_empty(ok, "count"), 7);
}
