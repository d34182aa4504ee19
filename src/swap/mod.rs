pub mod amount;
pub mod rate;
pub mod session;

pub use amount::{
    derive_from_amount, derive_to_amount, parse_amount, AmountDeriver, DEFAULT_AMOUNT_DECIMALS,
};
pub use rate::{compute_rate, UNKNOWN_RATE};
pub use session::{
    AmountSide, SubmissionOutcome, SubmissionStatus, SwapPairState, SwapSession, ValidationErrors,
};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

/// Transient user-facing message queued by the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self { kind: NotificationKind::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { kind: NotificationKind::Error, message: message.into() }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self { kind: NotificationKind::Info, message: message.into() }
    }
}
