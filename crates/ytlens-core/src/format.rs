//! Human-readable number formatting for terminal output.

/// Abbreviates large numbers (`1.5M`, `12.3K`) or, when `exact` is set,
/// groups digits with commas (`2,268,347`).
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_number(number: u64, exact: bool, precision: usize) -> String {
    if exact {
        return group_thousands(number);
    }
    if number >= 1_000_000 {
        format!("{:.precision$}M", number as f64 / 1_000_000.0)
    } else if number >= 1_000 {
        format!("{:.precision$}K", number as f64 / 1_000.0)
    } else {
        number.to_string()
    }
}

/// Formats an optional count, rendering a missing value as an em dash.
#[must_use]
pub fn format_count(number: Option<u64>, exact: bool, precision: usize) -> String {
    number.map_or_else(
        || "\u{2014}".to_string(),
        |n| format_number(n, exact, precision),
    )
}

fn group_thousands(number: u64) -> String {
    let digits = number.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
