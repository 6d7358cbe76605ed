use std::io;

/// Custom error type for push notification operations
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("History query failed for {repository} ({range}): {message}")]
    HistoryQuery {
        repository: String,
        range: String,
        message: String,
    },

    #[error("Delivery to {endpoint} failed{}: {message}", status_suffix(.status))]
    Delivery {
        endpoint: String,
        status: Option<u16>,
        message: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

fn status_suffix(status: &Option<u16>) -> String {
    status
        .map(|code| format!(" with HTTP {}", code))
        .unwrap_or_default()
}

/// Helper type for Results that use NotifyError
pub type Result<T> = std::result::Result<T, NotifyError>;
