//! Error types for the bot control plane
//!
//! Uses thiserror for ergonomic error definitions. Failures coming back from
//! the bot API never escape a dispatch: they are turned into a user-facing
//! message with [`DashboardError::user_message`] and stored.

use thiserror::Error;

use crate::types::ActionKind;

/// Custom Result type using our Error
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Remediation shown when the tunnel serves its warning page instead of JSON.
pub const INTERSTITIAL_HINT: &str = "Received HTML instead of JSON. Please visit the ngrok URL in browser first to accept the warning.";

/// Control plane errors
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network, DNS or connection failure before any response arrived
    #[error("{0}")]
    Transport(String),

    /// Non-2xx response from the bot API
    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Http { status: u16, message: Option<String> },

    /// Tunnel interstitial page returned in place of the API response
    #[error("{}", INTERSTITIAL_HINT)]
    ProxyInterstitial,

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Worker runtime errors
    #[error("Worker error: {0}")]
    Worker(String),
}

impl DashboardError {
    /// Best-effort message for the action's status line.
    ///
    /// Prefers the message embedded in an error body, then the transport
    /// text, and falls back to `Failed to {action} for {stock}`.
    pub fn user_message(&self, kind: ActionKind, stock: &str) -> String {
        match self {
            DashboardError::Http {
                message: Some(message),
                ..
            } if !message.is_empty() => message.clone(),
            DashboardError::Http { status, .. } => {
                format!("Request failed with status code {status}")
            }
            DashboardError::ProxyInterstitial => INTERSTITIAL_HINT.to_string(),
            DashboardError::Transport(text) if !text.trim().is_empty() => text.clone(),
            _ => format!("Failed to {} for {stock}", kind.endpoint()),
        }
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        DashboardError::Transport(err.to_string())
    }
}

impl From<worker::Error> for DashboardError {
    fn from(err: worker::Error) -> Self {
        DashboardError::Worker(err.to_string())
    }
}

impl From<DashboardError> for worker::Error {
    fn from(err: DashboardError) -> Self {
        worker::Error::RustError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_body_message_wins() {
        let err = DashboardError::Http {
            status: 404,
            message: Some("bad symbol".into()),
        };
        assert_eq!(err.user_message(ActionKind::Train, "AAPL"), "bad symbol");
    }

    #[test]
    fn test_http_without_message_reports_status() {
        let err = DashboardError::Http {
            status: 503,
            message: None,
        };
        assert_eq!(
            err.user_message(ActionKind::Trade, "AAPL"),
            "Request failed with status code 503"
        );
    }

    #[test]
    fn test_interstitial_uses_hint() {
        let msg = DashboardError::ProxyInterstitial.user_message(ActionKind::Backtest, "Tesla");
        assert!(msg.contains("visit the ngrok URL"));
    }

    #[test]
    fn test_transport_fallbacks() {
        let err = DashboardError::Transport("connection refused".into());
        assert_eq!(
            err.user_message(ActionKind::Train, "AAPL"),
            "connection refused"
        );

        let silent = DashboardError::Transport(String::new());
        assert_eq!(
            silent.user_message(ActionKind::Train, "AAPL"),
            "Failed to train for AAPL"
        );
    }

    #[test]
    fn test_error_conversion() {
        let json_err = serde_json::from_str::<i32>("invalid").unwrap_err();
        let err: DashboardError = json_err.into();
        assert!(matches!(err, DashboardError::Json(_)));
        assert_eq!(
            err.user_message(ActionKind::ForceExit, "Nvidia"),
            "Failed to forceExit for Nvidia"
        );
    }
}
