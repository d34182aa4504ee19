use std::collections::VecDeque;

use tokenswap_types::{SwapReceipt, SwapRequest, Token};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::amount::{parse_amount, AmountDeriver};
use super::rate::compute_rate;
use super::Notification;
use crate::config::Settings;
use crate::error::{log_error, Result, SwapError, ValidationField};
use crate::executor::SwapExecutor;
use crate::market_data::{prepare_token_list, PriceSource, TokenFeed};

pub const SELECT_BOTH_TOKENS: &str = "Please select both tokens";
pub const ENTER_VALID_AMOUNT: &str = "Please enter a valid amount";
pub const SWAP_FAILED: &str = "Swap failed. Please try again.";

/// Which amount field the user typed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountSide {
    From,
    To,
}

impl AmountSide {
    pub fn opposite(self) -> Self {
        match self {
            AmountSide::From => AmountSide::To,
            AmountSide::To => AmountSide::From,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStatus {
    Idle,
    Submitting,
}

/// How a submission that reached the executor ended. Both variants return the session to `Idle`.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Success(SwapReceipt),
    Failed { reason: String },
}

/// Field-scoped validation messages, shown next to the form rather than as notifications.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    pub amount: Option<String>,
    pub tokens: Option<String>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none() && self.tokens.is_none()
    }

    pub fn clear(&mut self) {
        self.amount = None;
        self.tokens = None;
    }
}

/// The selected pair and both amount fields.
///
/// `from_token` and `to_token` never hold the same currency.
#[derive(Debug, Clone, PartialEq)]
pub struct SwapPairState {
    pub from_token: Option<Token>,
    pub to_token: Option<Token>,
    pub from_amount: String,
    pub to_amount: String,
}

impl SwapPairState {
    pub fn token(&self, side: AmountSide) -> Option<&Token> {
        match side {
            AmountSide::From => self.from_token.as_ref(),
            AmountSide::To => self.to_token.as_ref(),
        }
    }

    pub fn amount(&self, side: AmountSide) -> &str {
        match side {
            AmountSide::From => &self.from_amount,
            AmountSide::To => &self.to_amount,
        }
    }

    pub fn rate(&self) -> f64 {
        compute_rate(self.from_token.as_ref(), self.to_token.as_ref())
    }

    fn has_both_tokens(&self) -> bool {
        self.from_token.is_some() && self.to_token.is_some()
    }
}

/// Session-scoped controller owning the token feed, the pair, and the submission state.
#[derive(Debug)]
pub struct SwapSession {
    id: Uuid,
    feed: TokenFeed,
    pair: Option<SwapPairState>,
    last_edited: AmountSide,
    status: SubmissionStatus,
    errors: ValidationErrors,
    notifications: VecDeque<Notification>,
    deriver: AmountDeriver,
    primary_currency: String,
    secondary_currency: String,
}

impl Default for SwapSession {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl SwapSession {
    pub fn new(settings: &Settings) -> Self {
        Self {
            id: Uuid::new_v4(),
            feed: TokenFeed::Loading,
            pair: None,
            last_edited: AmountSide::From,
            status: SubmissionStatus::Idle,
            errors: ValidationErrors::default(),
            notifications: VecDeque::new(),
            deriver: AmountDeriver::new(settings.amount_decimals),
            primary_currency: settings.primary_currency.clone(),
            secondary_currency: settings.secondary_currency.clone(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn feed(&self) -> &TokenFeed {
        &self.feed
    }

    pub fn tokens(&self) -> &[Token] {
        self.feed.tokens()
    }

    pub fn pair(&self) -> Option<&SwapPairState> {
        self.pair.as_ref()
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    pub fn is_submitting(&self) -> bool {
        self.status == SubmissionStatus::Submitting
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn last_edited(&self) -> AmountSide {
        self.last_edited
    }

    /// Current exchange rate, or the sentinel `0` when no pair is selected.
    pub fn exchange_rate(&self) -> f64 {
        self.pair.as_ref().map(SwapPairState::rate).unwrap_or(super::rate::UNKNOWN_RATE)
    }

    pub fn from_amount(&self) -> &str {
        self.pair.as_ref().map(|p| p.from_amount.as_str()).unwrap_or("")
    }

    pub fn to_amount(&self) -> &str {
        self.pair.as_ref().map(|p| p.to_amount.as_str()).unwrap_or("")
    }

    /// Fetches the token list once and seeds the pair.
    ///
    /// A feed that failed or came back empty may be loaded again; a ready one may not.
    pub async fn load_tokens(&mut self, source: &dyn PriceSource) -> Result<()> {
        self.ensure_idle()?;
        self.ensure_not_loaded()?;
        let fetched = source.fetch_tokens().await;
        self.apply_token_result(fetched)
    }

    /// Applies the outcome of a price fetch. A failed fetch never leaves a partial list behind.
    pub fn apply_token_result(&mut self, fetched: Result<Vec<Token>>) -> Result<()> {
        self.ensure_idle()?;
        self.ensure_not_loaded()?;

        let tokens = match fetched {
            Ok(raw) => prepare_token_list(raw),
            Err(e) => {
                log_error(&e, "Token price fetch");
                self.feed = TokenFeed::Unavailable { reason: e.to_string() };
                self.pair = None;
                return Ok(());
            }
        };

        if tokens.is_empty() {
            warn!(session_id = %self.id, "Price feed returned no priced tokens");
            self.feed = TokenFeed::Empty;
            self.pair = None;
            return Ok(());
        }

        let (from_token, to_token) =
            default_pair(&tokens, &self.primary_currency, &self.secondary_currency);
        info!(
            session_id = %self.id,
            token_count = tokens.len(),
            from = from_token.as_ref().map(|t| t.currency.as_str()).unwrap_or("-"),
            to = to_token.as_ref().map(|t| t.currency.as_str()).unwrap_or("-"),
            "Token list loaded"
        );

        self.pair = Some(SwapPairState {
            from_token,
            to_token,
            from_amount: String::new(),
            to_amount: String::new(),
        });
        self.feed = TokenFeed::Ready(tokens);
        self.last_edited = AmountSide::From;
        Ok(())
    }

    /// Tokens selectable on `side`: everything except the other side's current selection.
    pub fn available_tokens(&self, side: AmountSide) -> Vec<&Token> {
        let excluded = self
            .pair
            .as_ref()
            .and_then(|p| p.token(side.opposite()))
            .map(|t| t.currency.as_str());
        self.tokens()
            .iter()
            .filter(|t| Some(t.currency.as_str()) != excluded)
            .collect()
    }

    pub fn select_token(&mut self, side: AmountSide, currency: &str) -> Result<()> {
        self.ensure_idle()?;
        let token = self
            .tokens()
            .iter()
            .find(|t| t.currency == currency)
            .cloned()
            .ok_or_else(|| SwapError::InvalidSelection(format!("Unknown token {}", currency)))?;

        let pair = self.pair_mut()?;
        if pair.token(side.opposite()).map(|t| t.currency.as_str()) == Some(currency) {
            return Err(SwapError::InvalidSelection(format!("Cannot swap {} with itself", currency)));
        }
        match side {
            AmountSide::From => pair.from_token = Some(token),
            AmountSide::To => pair.to_token = Some(token),
        }

        self.errors.tokens = None;
        self.recompute();
        debug!(session_id = %self.id, ?side, currency, rate = self.exchange_rate(), "Token selected");
        Ok(())
    }

    pub fn select_from_token(&mut self, currency: &str) -> Result<()> {
        self.select_token(AmountSide::From, currency)
    }

    pub fn select_to_token(&mut self, currency: &str) -> Result<()> {
        self.select_token(AmountSide::To, currency)
    }

    /// Records a user edit of one amount field and rewrites the other one.
    ///
    /// Surrounding whitespace is dropped, so the stored text is what a submission carries.
    pub fn set_amount(&mut self, side: AmountSide, text: &str) -> Result<()> {
        self.ensure_idle()?;
        let text = text.trim();
        let pair = self.pair_mut()?;
        match side {
            AmountSide::From => pair.from_amount = text.to_string(),
            AmountSide::To => pair.to_amount = text.to_string(),
        }
        self.last_edited = side;
        self.errors.amount = None;
        self.recompute();
        Ok(())
    }

    pub fn set_from_amount(&mut self, text: &str) -> Result<()> {
        self.set_amount(AmountSide::From, text)
    }

    pub fn set_to_amount(&mut self, text: &str) -> Result<()> {
        self.set_amount(AmountSide::To, text)
    }

    /// Exchanges the two tokens and the two amounts as they are.
    ///
    /// Amounts are not re-derived here, so until the next edit `to ≈ from * rate`
    /// may not hold for the flipped pair.
    pub fn flip(&mut self) -> Result<()> {
        self.ensure_idle()?;
        let pair = self.pair_mut()?;
        if !pair.has_both_tokens() {
            return Err(SwapError::InvalidSelection("Select both tokens before flipping".to_string()));
        }
        std::mem::swap(&mut pair.from_token, &mut pair.to_token);
        std::mem::swap(&mut pair.from_amount, &mut pair.to_amount);
        self.last_edited = self.last_edited.opposite();
        debug!(session_id = %self.id, "Pair flipped");
        Ok(())
    }

    pub fn can_flip(&self) -> bool {
        !self.is_submitting() && self.pair.as_ref().map_or(false, SwapPairState::has_both_tokens)
    }

    pub fn can_submit(&self) -> bool {
        !self.is_submitting()
            && self.pair.as_ref().map_or(false, |p| {
                p.has_both_tokens() && !p.from_amount.is_empty() && !p.to_amount.is_empty()
            })
    }

    /// Guards and starts a submission (`Idle -> Submitting`), returning the snapshot to execute.
    pub fn begin_submission(&mut self) -> Result<SwapRequest> {
        self.ensure_idle()?;
        self.errors.clear();

        let pair = match self.pair.as_ref() {
            Some(pair) if pair.has_both_tokens() => pair,
            _ => {
                self.errors.tokens = Some(SELECT_BOTH_TOKENS.to_string());
                return Err(SwapError::validation(ValidationField::Tokens, SELECT_BOTH_TOKENS));
            }
        };

        let positive = |text: &str| parse_amount(text).map_or(false, |v| v > 0.0);
        if !positive(&pair.from_amount) || !positive(&pair.to_amount) {
            self.errors.amount = Some(ENTER_VALID_AMOUNT.to_string());
            return Err(SwapError::validation(ValidationField::Amount, ENTER_VALID_AMOUNT));
        }

        let request = match (pair.from_token.clone(), pair.to_token.clone()) {
            (Some(from_token), Some(to_token)) => SwapRequest {
                from_token,
                to_token,
                from_amount: pair.from_amount.clone(),
                to_amount: pair.to_amount.clone(),
            },
            _ => return Err(SwapError::InternalError("Pair lost a token during submission".to_string())),
        };

        self.status = SubmissionStatus::Submitting;
        info!(
            session_id = %self.id,
            from = %request.from_token.currency,
            to = %request.to_token.currency,
            from_amount = %request.from_amount,
            to_amount = %request.to_amount,
            "Swap submission started"
        );
        Ok(request)
    }

    /// Finishes the in-flight submission and returns to `Idle`.
    pub fn complete_submission(&mut self, result: Result<SwapReceipt>) -> Result<SubmissionOutcome> {
        if !self.is_submitting() {
            return Err(SwapError::InternalError("No swap submission in progress".to_string()));
        }
        self.status = SubmissionStatus::Idle;

        match result {
            Ok(receipt) => {
                let message = format!(
                    "Successfully swapped {} {} for {} {}!",
                    receipt.from_amount,
                    receipt.from_token.currency,
                    receipt.to_amount,
                    receipt.to_token.currency
                );
                info!(session_id = %self.id, transaction_id = %receipt.transaction_id, "Swap succeeded");
                self.clear_amounts();
                self.notifications.push_back(Notification::success(message));
                Ok(SubmissionOutcome::Success(receipt))
            }
            Err(e) => {
                log_error(&e, "Swap submission");
                self.notifications.push_back(Notification::error(SWAP_FAILED));
                Ok(SubmissionOutcome::Failed { reason: e.to_string() })
            }
        }
    }

    /// Validates, executes and settles one swap.
    ///
    /// `Err` means the executor was never reached (validation failure or a submission already in flight).
    pub async fn submit(&mut self, executor: &dyn SwapExecutor) -> Result<SubmissionOutcome> {
        let request = self.begin_submission()?;
        let result = executor.execute_swap(request).await;
        self.complete_submission(result)
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    pub fn pending_notifications(&self) -> usize {
        self.notifications.len()
    }

    pub fn dismiss_errors(&mut self) {
        self.errors.clear();
    }

    /// Clears both amount fields, keeping the selected pair.
    pub fn clear_amounts(&mut self) {
        if let Some(pair) = self.pair.as_mut() {
            pair.from_amount.clear();
            pair.to_amount.clear();
        }
        self.last_edited = AmountSide::From;
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.is_submitting() {
            return Err(SwapError::SubmissionInProgress);
        }
        Ok(())
    }

    fn ensure_not_loaded(&self) -> Result<()> {
        if self.feed.is_ready() {
            return Err(SwapError::TokensAlreadyLoaded);
        }
        Ok(())
    }

    fn pair_mut(&mut self) -> Result<&mut SwapPairState> {
        match self.pair.as_mut() {
            Some(pair) => Ok(pair),
            None => Err(SwapError::TokensUnavailable(self.feed.describe())),
        }
    }

    /// Rewrites the field the user did not edit last.
    fn recompute(&mut self) {
        let deriver = self.deriver;
        if let Some(pair) = self.pair.as_mut() {
            let rate = pair.rate();
            match self.last_edited {
                AmountSide::From => pair.to_amount = deriver.derive_to_amount(&pair.from_amount, rate),
                AmountSide::To => pair.from_amount = deriver.derive_from_amount(&pair.to_amount, rate),
            }
        }
    }
}

/// Primary/secondary currencies when listed, otherwise the first two tokens; never the same token twice.
fn default_pair(tokens: &[Token], primary: &str, secondary: &str) -> (Option<Token>, Option<Token>) {
    let from = tokens
        .iter()
        .find(|t| t.currency == primary)
        .or_else(|| tokens.first())
        .cloned();
    let from_currency = from.as_ref().map(|t| t.currency.as_str());

    let to = tokens
        .iter()
        .find(|t| t.currency == secondary)
        .or_else(|| tokens.get(1))
        .filter(|t| Some(t.currency.as_str()) != from_currency)
        .or_else(|| tokens.iter().find(|t| Some(t.currency.as_str()) != from_currency))
        .cloned();

    (from, to)
}
