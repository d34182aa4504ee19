use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use std::path::Path;
use tracing::{error, info, warn};

use crate::error::{Result, SwapError};
use crate::swap::{Notification, NotificationKind};

pub const LOG_FILE_NAME: &str = "tokenswap.log";

/// Initializes the logging system (both console and file).
/// Returns a guard that must be kept alive for file logging to work.
pub fn init_logging(log_dir: &str, file_level: &str, console_level: &str) -> Result<WorkerGuard> {
    let log_path = Path::new(log_dir);
    if !log_path.exists() {
        std::fs::create_dir_all(log_path)?;
    }

    // --- File Logger ---
    let file_appender = rolling::daily(log_dir, LOG_FILE_NAME);
    let (non_blocking_appender, guard) = tracing_appender::non_blocking(file_appender);

    let file_filter = EnvFilter::try_new(file_level)
        .map_err(|e| SwapError::ConfigError(format!("Invalid file log level filter '{}': {}", file_level, e)))?;
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_appender)
        .with_ansi(false)
        .with_span_events(FmtSpan::CLOSE)
        .json()
        .with_filter(file_filter);

    // --- Console Logger ---
    let console_filter = EnvFilter::try_new(console_level)
        .map_err(|e| SwapError::ConfigError(format!("Invalid console log level filter '{}': {}", console_level, e)))?;
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(console_filter);

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| SwapError::InternalError(format!("Failed to initialize tracing subscriber: {}", e)))?;

    Ok(guard)
}

/// Emits a session notification on the `notification` target.
pub fn send_notification(notification: &Notification) {
    let message = notification.message.as_str();
    match notification.kind {
        NotificationKind::Error => {
            error!(target: "notification", text = message, "NOTIFICATION_ERROR");
        }
        NotificationKind::Success => {
            info!(target: "notification", text = message, "NOTIFICATION_SUCCESS");
        }
        NotificationKind::Info => {
            info!(target: "notification", text = message, "NOTIFICATION_INFO");
        }
    }
}

/// Logs a validation message that is scoped to a form field rather than the session.
pub fn report_validation(field: &str, message: &str) {
    warn!(target: "notification", field, text = message, "VALIDATION");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::thread;
    use std::time::Duration;

    const TEST_LOG_DIR: &str = "./tmp_test_logs";

    fn cleanup_logs() {
        let _ = fs::remove_dir_all(TEST_LOG_DIR);
    }

    #[test]
    fn test_logging_initialization() {
        cleanup_logs();
        let guard = init_logging(TEST_LOG_DIR, "debug", "info");
        assert!(guard.is_ok());
        let guard = guard.unwrap();

        info!("Info level message for console and file");
        tracing::debug!("Debug level message for file only");

        // Flush the non-blocking writer before reading the file back
        drop(guard);
        thread::sleep(Duration::from_millis(200));

        let log_files: Vec<_> = fs::read_dir(TEST_LOG_DIR)
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().starts_with(LOG_FILE_NAME))
            .collect();
        assert!(!log_files.is_empty());

        let log_content = fs::read_to_string(log_files[0].path()).unwrap();
        assert!(log_content.contains("Info level message"));
        assert!(log_content.contains("Debug level message"));
        assert!(log_content.contains(r#""level":"INFO""#));

        cleanup_logs();
    }

    #[test]
    fn test_invalid_filter_is_config_error() {
        let result = init_logging("./tmp_test_logs_invalid", "tokenswap=loud", "info");
        assert!(matches!(result, Err(SwapError::ConfigError(_))));
        let _ = fs::remove_dir_all("./tmp_test_logs_invalid");
    }

    #[test]
    fn test_send_notification_logging() {
        send_notification(&Notification::success("Successfully swapped 1 ETH for 3000.00000 USDC!"));
        send_notification(&Notification::error("Swap failed. Please try again."));
        send_notification(&Notification::info("Prices refreshed"));
        report_validation("amount", "Please enter a valid amount");
    }
}
