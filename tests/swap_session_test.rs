// Submission state machine tests against stub executors

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokenswap::{
    error::{ExecutionErrorKind, ValidationField},
    market_data::StaticPriceSource,
    swap::session::{ENTER_VALID_AMOUNT, SWAP_FAILED},
    Notification, NotificationKind, SimulatedSwapExecutor, SubmissionOutcome, SubmissionStatus,
    SwapError, SwapExecutor, SwapReceipt, SwapRequest, SwapSession, Token,
};

// Counts calls and always fails
#[derive(Default)]
struct RejectingExecutor {
    calls: AtomicU32,
}

#[async_trait]
impl SwapExecutor for RejectingExecutor {
    async fn execute_swap(&self, _request: SwapRequest) -> tokenswap::Result<SwapReceipt> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(SwapError::execution(ExecutionErrorKind::Unavailable, "router offline"))
    }
}

async fn eth_usdc_session() -> SwapSession {
    let source = StaticPriceSource::new(vec![
        Token::new("USDC", 1.0).with_date("2023-08-29T07:10:40.000Z"),
        Token::new("ETH", 3000.0).with_date("2023-08-29T07:10:52.000Z"),
        Token::new("ATOM", 7.0).with_date("2023-08-29T07:10:50.000Z"),
    ]);
    let mut session = SwapSession::default();
    session.load_tokens(&source).await.unwrap();
    session
}

#[tokio::test]
async fn test_eth_to_usdc_quote() {
    let mut session = eth_usdc_session().await;
    session.set_from_amount("2").unwrap();

    assert_eq!(session.exchange_rate(), 3000.0);
    assert_eq!(session.to_amount(), "6000.00000");
}

#[tokio::test]
async fn test_empty_amount_never_reaches_executor() {
    let mut session = eth_usdc_session().await;
    session.set_from_amount("").unwrap();
    let executor = RejectingExecutor::default();

    let result = session.submit(&executor).await;

    assert!(matches!(
        result,
        Err(SwapError::Validation { field: ValidationField::Amount, .. })
    ));
    assert_eq!(session.status(), SubmissionStatus::Idle);
    assert_eq!(session.errors().amount.as_deref(), Some(ENTER_VALID_AMOUNT));
    assert_eq!(executor.calls.load(Ordering::SeqCst), 0);
    assert_eq!(session.pending_notifications(), 0);
}

#[tokio::test]
async fn test_successful_swap_clears_amounts_and_notifies() {
    let mut session = eth_usdc_session().await;
    session.set_from_amount("1").unwrap();
    assert_eq!(session.to_amount(), "3000.00000");

    let executor = SimulatedSwapExecutor::new(Duration::from_millis(5));
    let outcome = session.submit(&executor).await.unwrap();

    match outcome {
        SubmissionOutcome::Success(receipt) => {
            assert_eq!(receipt.from_amount, "1");
            assert_eq!(receipt.to_amount, "3000.00000");
        }
        other => panic!("expected success, got {:?}", other),
    }
    assert_eq!(session.status(), SubmissionStatus::Idle);
    assert_eq!(session.from_amount(), "");
    assert_eq!(session.to_amount(), "");

    let notifications = session.drain_notifications();
    assert_eq!(
        notifications,
        vec![Notification::success("Successfully swapped 1 ETH for 3000.00000 USDC!")]
    );
    assert!(notifications[0].message.contains("1 ETH"));
    assert!(notifications[0].message.contains("3000.00000 USDC"));
}

#[tokio::test]
async fn test_failed_swap_preserves_amounts() {
    let mut session = eth_usdc_session().await;
    session.set_to_amount("1500").unwrap();
    let executor = RejectingExecutor::default();

    let outcome = session.submit(&executor).await.unwrap();

    assert!(matches!(outcome, SubmissionOutcome::Failed { .. }));
    assert_eq!(executor.calls.load(Ordering::SeqCst), 1);
    assert_eq!(session.status(), SubmissionStatus::Idle);
    assert_eq!(session.from_amount(), "0.50000");
    assert_eq!(session.to_amount(), "1500");

    let notifications = session.drain_notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::Error);
    assert_eq!(notifications[0].message, SWAP_FAILED);

    // Manual retry is possible right away
    assert!(session.can_submit());
}

#[tokio::test]
async fn test_manual_two_phase_submission() {
    let mut session = eth_usdc_session().await;
    session.set_from_amount("0.5").unwrap();

    let request = session.begin_submission().unwrap();
    assert_eq!(request.from_token.currency, "ETH");
    assert_eq!(request.to_amount, "1500.00000");
    assert!(matches!(session.submit(&RejectingExecutor::default()).await, Err(SwapError::SubmissionInProgress)));

    let receipt = SimulatedSwapExecutor::new(Duration::ZERO)
        .execute_swap(request)
        .await
        .unwrap();
    let outcome = session.complete_submission(Ok(receipt)).unwrap();
    assert!(matches!(outcome, SubmissionOutcome::Success(_)));
    assert_eq!(session.status(), SubmissionStatus::Idle);
}
