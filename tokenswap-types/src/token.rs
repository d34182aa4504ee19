use serde::{Deserialize, Serialize};

/// A tradable currency with its USD-equivalent price, as published by the price feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Trading symbol (e.g., "ETH", "USDC")
    pub currency: String,
    /// Price in USD
    pub price: f64,
    /// ISO timestamp of the quote, informational only
    #[serde(default)]
    pub date: String,
}

impl Token {
    pub fn new(currency: impl Into<String>, price: f64) -> Self {
        Self {
            currency: currency.into(),
            price,
            date: String::new(),
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    /// True when the price can take part in a conversion.
    pub fn is_priced(&self) -> bool {
        self.price.is_finite() && self.price > 0.0
    }
}
