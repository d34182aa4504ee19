use super::SwapError;
use tokio::time::{sleep, Duration};
use tracing::{error, warn};

/// Retries a fallible async operation with exponential backoff.
///
/// Only errors for which [`SwapError::is_retryable`] holds are retried; anything
/// else is returned immediately.
///
/// # Arguments
/// * `operation` - An async closure that returns a Result
/// * `max_retries` - Maximum number of retry attempts
/// * `initial_delay_ms` - Initial delay in milliseconds, which doubles after each attempt
pub async fn retry_with_backoff<F, Fut, T>(
    operation: F,
    max_retries: u32,
    initial_delay_ms: u64,
) -> std::result::Result<T, SwapError>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = std::result::Result<T, SwapError>>,
{
    let mut current_retry = 0;
    let mut delay_ms = initial_delay_ms;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                if current_retry >= max_retries || !e.is_retryable() {
                    return Err(e);
                }
                warn!(delay_ms, attempt = current_retry + 1, error = %e, "Operation failed, retrying");
                sleep(Duration::from_millis(delay_ms)).await;
                current_retry += 1;
                delay_ms *= 2;
            }
        }
    }
}

/// Logs an error with a severity based on the error type.
///
/// # Arguments
/// * `error` - The SwapError to log
/// * `context` - Where/how the error occurred
pub fn log_error(error: &SwapError, context: &str) {
    match error {
        SwapError::HttpError { status, message } => {
            if status.is_server_error() {
                error!("{} - HTTP error {}: {}", context, status, message);
            } else {
                warn!("{} - HTTP error {}: {}", context, status, message);
            }
        }
        SwapError::NetworkError(msg) => {
            warn!("{} - Network error: {}", context, msg);
        }
        SwapError::Validation { field, message } => {
            warn!(field = %field, "{} - Validation error: {}", context, message);
        }
        SwapError::InvalidSelection(msg) | SwapError::TokensUnavailable(msg) => {
            warn!("{} - {}", context, msg);
        }
        SwapError::SubmissionInProgress => {
            warn!("{} - Submission already in progress", context);
        }
        SwapError::TokensAlreadyLoaded => {
            warn!("{} - Token list already loaded", context);
        }
        SwapError::Execution { kind, message } => {
            error!("{} - Swap execution error: {} - {}", context, kind, message);
        }
        _ => error!("{} - Unexpected error: {}", context, error),
    }
}

/// Converts a reqwest error to a SwapError with additional context.
///
/// # Arguments
/// * `error` - The reqwest error to convert
/// * `context` - The request that failed
pub fn handle_reqwest_error(error: reqwest::Error, context: &str) -> SwapError {
    if error.is_timeout() {
        SwapError::NetworkError(format!("{}: Request timed out - {}", context, error))
    } else if let Some(status) = error.status() {
        SwapError::HttpError {
            status,
            message: format!("{}: {}", context, error),
        }
    } else {
        SwapError::NetworkError(format!("{}: {}", context, error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_retry_with_backoff() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = retry_with_backoff(
            move || {
                let counter = counter_clone.clone();
                async move {
                    let attempts = counter.fetch_add(1, Ordering::SeqCst);
                    if attempts < 2 {
                        Err(SwapError::NetworkError("Not ready yet".to_string()))
                    } else {
                        Ok(())
                    }
                }
            },
            3,
            1,
        )
        .await;

        assert!(result.is_ok());
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_stops_on_permanent_error() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result: std::result::Result<(), SwapError> = retry_with_backoff(
            move || {
                let counter = counter_clone.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(SwapError::InternalError("broken".to_string()))
                }
            },
            3,
            1,
        )
        .await;

        assert!(matches!(result, Err(SwapError::InternalError(_))));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
