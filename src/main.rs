use anyhow::Context;
use tokenswap::config::Settings;
use tokenswap::display::{format_usd, icon_url};
use tokenswap::error::{log_error, SwapError};
use tokenswap::market_data::HttpPriceSource;
use tokenswap::monitoring::{init_logging, report_validation, send_notification};
use tokenswap::{SimulatedSwapExecutor, SubmissionOutcome, SwapSession, TokenFeed};
use tracing::{error, info};

/// Usage: `tokenswap [FROM] [TO] [AMOUNT]`
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::new().context("Failed to load configuration")?;

    let console_level = settings
        .log_level
        .clone()
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string());
    let _guard = init_logging(&settings.log_dir, "debug", &console_level)?;

    let mut args = std::env::args().skip(1);
    let from_symbol = args.next();
    let to_symbol = args.next();
    let amount = args.next().unwrap_or_else(|| "1".to_string());

    let mut session = SwapSession::new(&settings);
    let main_span = tracing::info_span!("swap_session", session_id = %session.id());
    let _main_span_guard = main_span.enter();

    info!(url = %settings.price_source_url, "Loading token prices...");
    let source = HttpPriceSource::from_settings(&settings)?;
    session.load_tokens(&source).await?;

    match session.feed() {
        TokenFeed::Ready(tokens) => info!(count = tokens.len(), "Tokens ready"),
        feed => {
            error!(state = ?feed, "{}", feed.describe());
            return Ok(());
        }
    }

    if let Some(from) = from_symbol.as_deref() {
        let current_to = session
            .pair()
            .and_then(|p| p.to_token.as_ref())
            .map(|t| t.currency.clone());
        // FROM currently sits on the "to" side
        if current_to.as_deref() == Some(from) {
            session.flip()?;
        } else {
            session.select_from_token(from)?;
        }
    }
    if let Some(to) = to_symbol.as_deref() {
        session.select_to_token(to)?;
    }
    session.set_from_amount(&amount)?;

    if let Some(pair) = session.pair() {
        for token in [&pair.from_token, &pair.to_token].into_iter().flatten() {
            info!(
                currency = %token.currency,
                price = %format_usd(token.price),
                icon = %icon_url(&settings.icon_base_url, &token.currency),
                "Pair token"
            );
        }
        info!(
            rate = pair.rate(),
            from_amount = %pair.from_amount,
            to_amount = %pair.to_amount,
            "Quote"
        );
    }

    let executor = SimulatedSwapExecutor::from_settings(&settings);
    match session.submit(&executor).await {
        Ok(SubmissionOutcome::Success(receipt)) => {
            info!(transaction_id = %receipt.transaction_id, timestamp = %receipt.timestamp, "Swap settled");
        }
        Ok(SubmissionOutcome::Failed { reason }) => {
            error!(%reason, "Swap failed");
        }
        Err(SwapError::Validation { field, message }) => {
            report_validation(&field.to_string(), &message);
        }
        Err(e) => log_error(&e, "Swap submission"),
    }

    for notification in session.drain_notifications() {
        send_notification(&notification);
    }

    info!("Session finished");
    Ok(())
}
