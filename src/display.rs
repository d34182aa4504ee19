//! Presentation helpers for token symbols and USD values.

/// Symbols whose icon is published under a different name, usually the underlying asset.
fn icon_symbol(symbol: &str) -> &str {
    match symbol {
        "RATOM" | "STATOM" => "ATOM",
        "STEVMOS" => "EVMOS",
        "STLUNA" => "LUNA",
        "STOSMO" => "OSMO",
        other => other,
    }
}

pub fn icon_url(base_url: &str, symbol: &str) -> String {
    format!("{}/{}.svg", base_url.trim_end_matches('/'), icon_symbol(symbol))
}

/// `$1,234.57`-style rendering with two decimals; zero and non-finite values render as `$0`.
pub fn format_usd(amount: f64) -> String {
    if amount == 0.0 || !amount.is_finite() {
        return "$0".to_string();
    }

    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, cents)
}
