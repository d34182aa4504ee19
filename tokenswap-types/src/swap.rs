use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::token::Token;

/// Immutable snapshot handed to a swap executor when a submission starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequest {
    pub from_token: Token,
    pub to_token: Token,
    pub from_amount: String,
    pub to_amount: String,
}

/// Result reported by a swap executor on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapReceipt {
    pub transaction_id: String,
    pub from_amount: String,
    pub to_amount: String,
    pub from_token: Token,
    pub to_token: Token,
    pub timestamp: DateTime<Utc>,
}

impl SwapReceipt {
    pub fn for_request(request: SwapRequest, transaction_id: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            from_amount: request.from_amount,
            to_amount: request.to_amount,
            from_token: request.from_token,
            to_token: request.to_token,
            timestamp,
        }
    }
}
