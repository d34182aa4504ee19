use super::rate::is_known_rate;

pub const DEFAULT_AMOUNT_DECIMALS: usize = 5;

/// Parses a user-typed amount.
///
/// Accepts plain non-negative decimal numerals only (`"12"`, `"0.5"`, `".5"`, `"3."`),
/// surrounding whitespace ignored. Signs, exponents, separators and words are rejected.
pub fn parse_amount(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let mut digits = 0usize;
    let mut dots = 0usize;
    for c in text.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return None,
        }
    }
    if digits == 0 || dots > 1 {
        return None;
    }

    text.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Derives the complementary amount field from the field the user edited.
///
/// Every failure (empty or unparsable text, unknown rate) clears the dependent
/// field instead of raising an error.
#[derive(Debug, Clone, Copy)]
pub struct AmountDeriver {
    decimals: usize,
}

impl Default for AmountDeriver {
    fn default() -> Self {
        Self::new(DEFAULT_AMOUNT_DECIMALS)
    }
}

impl AmountDeriver {
    pub fn new(decimals: usize) -> Self {
        Self { decimals }
    }

    pub fn decimals(&self) -> usize {
        self.decimals
    }

    /// `from * rate`, formatted with the configured number of decimals.
    pub fn derive_to_amount(&self, from_amount_text: &str, rate: f64) -> String {
        if !is_known_rate(rate) {
            return String::new();
        }
        match parse_amount(from_amount_text) {
            Some(amount) => self.format(amount * rate),
            None => String::new(),
        }
    }

    /// `to / rate`, formatted with the configured number of decimals.
    pub fn derive_from_amount(&self, to_amount_text: &str, rate: f64) -> String {
        if !is_known_rate(rate) {
            return String::new();
        }
        match parse_amount(to_amount_text) {
            Some(amount) => self.format(amount / rate),
            None => String::new(),
        }
    }

    fn format(&self, value: f64) -> String {
        if !value.is_finite() {
            return String::new();
        }
        format!("{:.*}", self.decimals, value)
    }
}

pub fn derive_to_amount(from_amount_text: &str, rate: f64) -> String {
    AmountDeriver::default().derive_to_amount(from_amount_text, rate)
}

pub fn derive_from_amount(to_amount_text: &str, rate: f64) -> String {
    AmountDeriver::default().derive_from_amount(to_amount_text, rate)
}
