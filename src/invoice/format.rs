use chrono::{DateTime, NaiveDate, TimeZone};
use std::fmt::Display;

/// Format a VND amount the way vi-VN displays it: dot-grouped, no decimals,
/// trailing currency sign. `1250000.0` becomes `1.250.000 ₫`.
pub fn format_vnd(amount: f64) -> String {
    format!("{} ₫", format_grouped(amount.round() as i64))
}

/// Group digits in threes with `.` separators
pub fn format_grouped(value: i64) -> String {
    let negative = value < 0;
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }

    let mut grouped: String = out.chars().rev().collect();
    if negative {
        grouped.insert(0, '-');
    }
    grouped
}

/// Quantities print with up to two decimals after a `,`, and none when the
/// value rounds to a whole number. `1234.5` becomes `1.234,5`.
pub fn format_quantity(quantity: f64) -> String {
    let hundredths = (quantity.abs() * 100.0).round() as i64;
    let sign = if quantity < 0.0 && hundredths != 0 { "-" } else { "" };
    let whole = format_grouped(hundredths / 100);

    match hundredths % 100 {
        0 => format!("{sign}{whole}"),
        frac => {
            let digits = format!("{frac:02}");
            format!("{sign}{whole},{}", digits.trim_end_matches('0'))
        }
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

pub fn format_datetime<Tz: TimeZone>(ts: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    ts.format("%H:%M %d/%m/%Y").to_string()
}
