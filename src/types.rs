//! Common types for the bot control plane
//!
//! All shared data structures used across modules.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DashboardError;

/// Remote bot operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    Train,
    Backtest,
    Trade,
    ForceExit,
}

impl ActionKind {
    /// Every kind, in store order
    pub const ALL: [ActionKind; 4] = [
        ActionKind::Train,
        ActionKind::Backtest,
        ActionKind::Trade,
        ActionKind::ForceExit,
    ];

    /// Path segment under the API base
    pub fn endpoint(self) -> &'static str {
        match self {
            ActionKind::Train => "train",
            ActionKind::Backtest => "backtest",
            ActionKind::Trade => "trade",
            ActionKind::ForceExit => "forceExit",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}

impl FromStr for ActionKind {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionKind::ALL
            .into_iter()
            .find(|kind| kind.endpoint() == s)
            .ok_or_else(|| DashboardError::Config(format!("Unknown action: {s}")))
    }
}

/// Per-action request state shown by the dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionState {
    pub loading: bool,
    pub message: Option<String>,
    /// Raw JSON body of the last successful call
    pub response: Option<serde_json::Value>,
    pub error: bool,
}

/// Outcome of a single dispatch, independent of the stored state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResult {
    pub success: bool,
    pub message: String,
}

impl ApiResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Entry in the stock picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockOption {
    /// Value sent to the bot as the `stock` parameter
    pub value: String,
    pub label: String,
}

impl StockOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// Stocks offered when no override is configured
    pub fn catalog() -> Vec<StockOption> {
        vec![
            StockOption::new("Apple", "Apple Inc. (AAPL)"),
            StockOption::new("Microsoft", "Microsoft Corporation (MSFT)"),
            StockOption::new("Google", "Google (GOOGL)"),
            StockOption::new("Netflix", "Netflix (NFLX)"),
            StockOption::new("Tesla", "Tesla Inc. (TSLA)"),
            StockOption::new("Nvidia", "NVIDIA (NVDA)"),
        ]
    }

    /// Parse `value` or `value=label`
    pub fn parse(entry: &str) -> Option<StockOption> {
        let (value, label) = match entry.split_once('=') {
            Some((value, label)) => (value.trim(), label.trim()),
            None => (entry.trim(), entry.trim()),
        };
        if value.is_empty() {
            return None;
        }
        let label = if label.is_empty() { value } else { label };
        Some(StockOption::new(value, label))
    }
}

/// Label for a stock value, falling back to the value itself
pub fn stock_label<'a>(options: &'a [StockOption], value: &'a str) -> &'a str {
    options
        .iter()
        .find(|o| o.value == value)
        .map_or(value, |o| o.label.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_names() {
        let names: Vec<_> = ActionKind::ALL.iter().map(|k| k.endpoint()).collect();
        assert_eq!(names, ["train", "backtest", "trade", "forceExit"]);
        assert_eq!(ActionKind::ForceExit.to_string(), "forceExit");
    }

    #[test]
    fn test_action_kind_parse() {
        assert_eq!("forceExit".parse::<ActionKind>().unwrap(), ActionKind::ForceExit);
        assert!("force_exit".parse::<ActionKind>().is_err());
    }

    #[test]
    fn test_action_kind_serde_matches_endpoint() {
        let json = serde_json::to_string(&ActionKind::ForceExit).unwrap();
        assert_eq!(json, "\"forceExit\"");
    }

    #[test]
    fn test_initial_state_is_idle() {
        let state = ActionState::default();
        assert!(!state.loading);
        assert!(!state.error);
        assert!(state.message.is_none());
        assert!(state.response.is_none());
    }

    #[test]
    fn test_stock_option_parse() {
        assert_eq!(
            StockOption::parse("AMD=Advanced Micro Devices (AMD)"),
            Some(StockOption::new("AMD", "Advanced Micro Devices (AMD)"))
        );
        assert_eq!(StockOption::parse(" Intel "), Some(StockOption::new("Intel", "Intel")));
        assert_eq!(StockOption::parse("  "), None);
    }

    #[test]
    fn test_stock_label_lookup() {
        let catalog = StockOption::catalog();
        assert_eq!(stock_label(&catalog, "Nvidia"), "NVIDIA (NVDA)");
        assert_eq!(stock_label(&catalog, "AMD"), "AMD");
    }
}
