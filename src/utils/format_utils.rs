use anyhow::{Result, anyhow};
use itertools::Itertools;

/// Two decimal places with en-US thousands grouping: `1234.5` -> `1,234.50`.
pub fn format_number(x: f64) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "∞".to_string() } else { "-∞".to_string() };
    }

    let rounded = (x * 100.0).round() / 100.0;
    let fixed = format!("{:.2}", rounded.abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let grouped = integer
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .join(",");

    // -0.00 prints without a sign
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, fraction)
}

/// Same as `format_number` for text that may already carry grouping commas.
pub fn format_number_str(text: &str) -> Result<String> {
    let cleaned = text.replace(',', "");
    let value: f64 = cleaned
        .trim()
        .parse()
        .map_err(|e| anyhow!("'{}' is not a number: {}", text, e))?;
    Ok(format_number(value))
}

/// Currency-prefixed amount, e.g. `$1,000.00`.
pub fn format_money(currency: &str, x: f64) -> String {
    format!("{}{}", currency, format_number(x))
}

/// Percent-suffixed amount, e.g. `12.50%`.
pub fn format_percent(x: f64) -> String {
    format!("{}%", format_number(x))
}
