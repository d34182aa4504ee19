use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use tokenswap_types::Token;
use tracing::{debug, info};

use crate::config::Settings;
use crate::error::{handle_reqwest_error, retry_with_backoff, Result, SwapError};

/// State of the session's token list.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenFeed {
    Loading,
    Ready(Vec<Token>),
    /// The feed answered but nothing in it had a usable price
    Empty,
    /// The feed itself failed; distinct from any swap failure
    Unavailable { reason: String },
}

impl TokenFeed {
    pub fn tokens(&self) -> &[Token] {
        match self {
            TokenFeed::Ready(tokens) => tokens,
            _ => &[],
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, TokenFeed::Ready(_))
    }

    pub fn describe(&self) -> String {
        match self {
            TokenFeed::Loading => "Loading tokens...".to_string(),
            TokenFeed::Ready(tokens) => format!("{} tokens available", tokens.len()),
            TokenFeed::Empty => "There are currently no tokens available for trading.".to_string(),
            TokenFeed::Unavailable { reason } => format!("Failed to load tokens: {}", reason),
        }
    }
}

/// Read-only provider of token prices, consumed once per session.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_tokens(&self) -> Result<Vec<Token>>;
}

/// Keeps priced tokens only, one entry per currency (the most recent quote), sorted by symbol.
///
/// Symbols compare case-insensitively first, so `bNEO` lands between `BLUR` and `BUSD`.
pub fn prepare_token_list(raw: Vec<Token>) -> Vec<Token> {
    let mut latest: BTreeMap<String, Token> = BTreeMap::new();
    for token in raw.into_iter().filter(Token::is_priced) {
        match latest.get(&token.currency) {
            Some(existing) if existing.date >= token.date => {}
            _ => {
                latest.insert(token.currency.clone(), token);
            }
        }
    }
    let mut tokens: Vec<Token> = latest.into_values().collect();
    tokens.sort_by(|a, b| {
        a.currency
            .to_lowercase()
            .cmp(&b.currency.to_lowercase())
            .then_with(|| a.currency.cmp(&b.currency))
    });
    tokens
}

/// Parses the price feed body: a JSON array of `{currency, date, price}` objects.
pub fn parse_price_payload(body: &str) -> Result<Vec<Token>> {
    let tokens: Vec<Token> = serde_json::from_str(body)?;
    Ok(tokens)
}

/// Price feed served over HTTP as a JSON document.
#[derive(Debug, Clone)]
pub struct HttpPriceSource {
    client: reqwest::Client,
    url: String,
    max_retries: u32,
    retry_backoff_ms: u64,
}

impl HttpPriceSource {
    pub fn new(url: &str, timeout: Duration, max_retries: u32, retry_backoff_ms: u64) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.to_string(),
            max_retries,
            retry_backoff_ms,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            &settings.price_source_url,
            settings.request_timeout(),
            settings.max_retries,
            settings.retry_backoff_ms,
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn fetch_once(&self) -> Result<Vec<Token>> {
        debug!(url = %self.url, "Requesting token prices");
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| handle_reqwest_error(e, "Token price request"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SwapError::HttpError {
                status,
                message: "Network response was not ok".to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| handle_reqwest_error(e, "Token price body"))?;
        parse_price_payload(&body)
    }
}

#[async_trait]
impl PriceSource for HttpPriceSource {
    async fn fetch_tokens(&self) -> Result<Vec<Token>> {
        let tokens = retry_with_backoff(|| self.fetch_once(), self.max_retries, self.retry_backoff_ms).await?;
        info!(url = %self.url, count = tokens.len(), "Fetched token prices");
        Ok(tokens)
    }
}

/// In-memory price source for tests and offline runs.
#[derive(Debug, Clone)]
pub struct StaticPriceSource {
    tokens: std::result::Result<Vec<Token>, String>,
}

impl StaticPriceSource {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens: Ok(tokens) }
    }

    /// A source whose every fetch fails with a network error.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self { tokens: Err(reason.into()) }
    }
}

#[async_trait]
impl PriceSource for StaticPriceSource {
    async fn fetch_tokens(&self) -> Result<Vec<Token>> {
        match &self.tokens {
            Ok(tokens) => Ok(tokens.clone()),
            Err(reason) => Err(SwapError::NetworkError(reason.clone())),
        }
    }
}
