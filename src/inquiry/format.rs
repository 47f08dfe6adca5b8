//! Number formatting shared by the email body and the confirmation page.

const GROUPING_SEPARATOR: char = ',';

/// Formats `value` with two decimals and thousands separators: `1,500,000.00`.
pub fn format_amount(value: f64) -> String {
    let body = format!("{:.2}", value.abs());
    let (int_part, fraction) = body.split_once('.').unwrap_or((body.as_str(), "00"));
    let grouped = group_digits(int_part, GROUPING_SEPARATOR);
    if value < 0.0 {
        format!("-{grouped}.{fraction}")
    } else {
        format!("{grouped}.{fraction}")
    }
}

pub fn format_lkr(value: f64) -> String {
    format!("LKR {}", format_amount(value))
}

/// `48 months (4.0 years)`.
pub fn format_tenure(months: u32) -> String {
    format!("{} months ({:.1} years)", months, f64::from(months) / 12.0)
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}
