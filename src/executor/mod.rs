use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokenswap_types::{SwapReceipt, SwapRequest};
use tracing::info;

use crate::config::Settings;
use crate::error::Result;

/// Executes a swap for a submitted pair snapshot.
///
/// Implementations report success with a receipt or fail with any error; the caller
/// does not retry and does not inspect the receipt beyond that.
#[async_trait]
pub trait SwapExecutor: Send + Sync {
    async fn execute_swap(&self, request: SwapRequest) -> Result<SwapReceipt>;
}

/// Stand-in executor that waits a fixed latency and then confirms the swap as requested.
#[derive(Debug, Clone)]
pub struct SimulatedSwapExecutor {
    latency: Duration,
}

impl SimulatedSwapExecutor {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.swap_latency())
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }
}

#[async_trait]
impl SwapExecutor for SimulatedSwapExecutor {
    async fn execute_swap(&self, request: SwapRequest) -> Result<SwapReceipt> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let timestamp = Utc::now();
        let transaction_id = format!("tx_{}", timestamp.timestamp_millis());
        info!(
            transaction_id = %transaction_id,
            from = %request.from_token.currency,
            to = %request.to_token.currency,
            from_amount = %request.from_amount,
            to_amount = %request.to_amount,
            "Simulated swap confirmed"
        );

        Ok(SwapReceipt::for_request(request, transaction_id, timestamp))
    }
}
