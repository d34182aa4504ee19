use tokenswap_types::Token;

/// Sentinel returned when no conversion is possible. Never a real rate,
/// since every listed token has a strictly positive price.
pub const UNKNOWN_RATE: f64 = 0.0;

/// Units of `to` received per unit of `from`: `from.price / to.price`.
///
/// Degrades to [`UNKNOWN_RATE`] when either token is missing or not priced.
pub fn compute_rate(from: Option<&Token>, to: Option<&Token>) -> f64 {
    match (from, to) {
        (Some(from), Some(to)) if from.is_priced() && to.is_priced() => {
            let rate = from.price / to.price;
            if rate.is_finite() {
                rate
            } else {
                UNKNOWN_RATE
            }
        }
        _ => UNKNOWN_RATE,
    }
}

pub fn is_known_rate(rate: f64) -> bool {
    rate.is_finite() && rate > 0.0
}
