// Public modules that are part of the API
pub mod config;
pub mod display;
pub mod error;
pub mod executor;
pub mod market_data;
pub mod monitoring;
pub mod swap;
pub mod wallet;

// Re-export common types
pub use tokenswap_types::{SwapReceipt, SwapRequest, Token};

pub use swap::{
    AmountDeriver,
    AmountSide,
    Notification,
    NotificationKind,
    SubmissionOutcome,
    SubmissionStatus,
    SwapPairState,
    SwapSession,
    ValidationErrors,
};

pub use market_data::{PriceSource, TokenFeed};

pub use executor::{SimulatedSwapExecutor, SwapExecutor};

pub use error::{
    Result,
    SwapError,
};
