use chrono::NaiveDate;

pub const MISSING_VALUE: &str = "N/A";

/// `1234567` -> `1,234,567`.
pub fn count(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn currency(amount: f64) -> String {
    format!("${amount:.2}")
}

/// A ratio rendered as a percentage: `0.0256` -> `2.56%`.
pub fn percent(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

pub fn metric(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.4}"),
        None => MISSING_VALUE.to_string(),
    }
}

/// `Jan 5, 2025`.
pub fn date(d: NaiveDate) -> String {
    d.format("%b %-d, %Y").to_string()
}

pub fn date_range(start: NaiveDate, end: NaiveDate) -> String {
    format!("{} to {}", date(start), date(end))
}
