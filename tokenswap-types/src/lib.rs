pub mod swap;
pub mod token;

pub use swap::{SwapReceipt, SwapRequest};
pub use token::Token;
