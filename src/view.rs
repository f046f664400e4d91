//! Read-only derivations the dashboard renders from the store

use serde::Serialize;
use serde_json::Value;

use crate::store::ActionStore;
use crate::types::ActionKind;

/// Order in which action messages claim the status line
const STATUS_PRIORITY: [ActionKind; 4] = [
    ActionKind::ForceExit,
    ActionKind::Train,
    ActionKind::Backtest,
    ActionKind::Trade,
];

/// Everything the header of the dashboard needs in one value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    /// Any action in flight; buttons are disabled while set
    pub busy: bool,
    pub status: String,
    pub final_portfolio_value: Option<f64>,
    /// `final_portfolio_value` formatted as USD
    pub portfolio_display: String,
}

impl DashboardSummary {
    pub fn from_store(store: &ActionStore, selected: Option<&str>) -> Self {
        let final_portfolio_value = final_portfolio_value(store);
        Self {
            busy: any_loading(store),
            status: status_message(store, selected),
            final_portfolio_value,
            portfolio_display: format_usd(final_portfolio_value),
        }
    }
}

pub fn any_loading(store: &ActionStore) -> bool {
    store.snapshot().iter().any(|(_, state)| state.loading)
}

/// Most relevant line of feedback for the user
pub fn status_message(store: &ActionStore, selected: Option<&str>) -> String {
    STATUS_PRIORITY
        .iter()
        .find_map(|kind| store.get(*kind).message.filter(|m| !m.is_empty()))
        .unwrap_or_else(|| match selected {
            Some(stock) if !stock.is_empty() => format!("Selected: {stock}"),
            _ => "Please select a stock".to_string(),
        })
}

/// `final_portfolio_value` from the last successful backtest
pub fn final_portfolio_value(store: &ActionStore) -> Option<f64> {
    store
        .get(ActionKind::Backtest)
        .response
        .as_ref()
        .and_then(|body| body.get("final_portfolio_value"))
        .and_then(Value::as_f64)
}

/// en-US currency: `$12,345.67`, `-$5.00`. Missing, zero or non-finite
/// values render as `$0.00`.
pub fn format_usd(value: Option<f64>) -> String {
    let Some(value) = value.filter(|v| v.is_finite() && *v != 0.0) else {
        return "$0.00".to_string();
    };

    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}
