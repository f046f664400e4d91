//! Bot API client
//!
//! One `GET {base}/{endpoint}?stock={symbol}` per action. The bot sits behind
//! an ngrok tunnel which, until dismissed once in a browser, answers with an
//! HTML warning page instead of JSON; that case is reported as
//! [`DashboardError::ProxyInterstitial`].

use std::future::Future;

use serde_json::Value;

use crate::config::{Config, SKIP_WARNING_HEADER};
use crate::error::{DashboardError, Result};
use crate::types::ActionKind;

/// Outbound seam used by the dispatcher
pub trait BotApi {
    /// Perform the call for `kind` and return the decoded JSON body
    fn call(&self, kind: ActionKind, stock: &str) -> impl Future<Output = Result<Value>>;
}

/// reqwest-backed bot API client
#[derive(Debug, Clone)]
pub struct BotClient {
    base_url: String,
    skip_proxy_warning: bool,
    http: reqwest::Client,
}

impl BotClient {
    /// Create a client rooted at an absolute base URL (e.g. `https://host/api`)
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            skip_proxy_warning: true,
            http: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_base_url.clone())
            .with_skip_proxy_warning(config.skip_proxy_warning)
    }

    /// Toggle the tunnel warning-suppression header
    #[must_use]
    pub fn with_skip_proxy_warning(mut self, skip: bool) -> Self {
        self.skip_proxy_warning = skip;
        self
    }

    /// Full request URL for an action
    pub fn endpoint_url(&self, kind: ActionKind, stock: &str) -> Result<reqwest::Url> {
        let raw = format!("{}/{}", self.base_url, kind.endpoint());
        reqwest::Url::parse_with_params(&raw, &[("stock", stock)])
            .map_err(|e| DashboardError::Config(format!("Invalid API URL '{raw}': {e}")))
    }
}

impl BotApi for BotClient {
    async fn call(&self, kind: ActionKind, stock: &str) -> Result<Value> {
        let url = self.endpoint_url(kind, stock)?;

        let mut request = self.http.get(url).header("Accept", "application/json");
        if self.skip_proxy_warning {
            request = request.header(SKIP_WARNING_HEADER, "true");
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        tracing::debug!(%kind, stock, status, body = %body, "bot API response");

        decode_response(status, &body)
    }
}

/// Turn a raw status and body into the JSON payload or a typed error.
///
/// Any non-2xx status is an error; the body is still read for a `message`
/// field so 4xx validation errors reach the user verbatim.
pub fn decode_response(status: u16, body: &str) -> Result<Value> {
    if is_html_document(body) {
        return Err(DashboardError::ProxyInterstitial);
    }

    let parsed = serde_json::from_str::<Value>(body);
    if parsed.is_err() && mentions_html(body) {
        return Err(DashboardError::ProxyInterstitial);
    }

    if !(200..300).contains(&status) {
        if status >= 500 {
            tracing::warn!(status, "bot API server error");
        }
        let message = parsed
            .ok()
            .as_ref()
            .and_then(body_message)
            .map(str::to_string);
        return Err(DashboardError::Http { status, message });
    }

    Ok(parsed?)
}

/// Non-empty string `message` field of a JSON body
pub fn body_message(body: &Value) -> Option<&str> {
    body.get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
}

/// Body opens an HTML document, after any BOM and leading comments
fn is_html_document(body: &str) -> bool {
    let mut rest = body.trim_start_matches('\u{feff}').trim_start();
    while let Some(comment) = rest.strip_prefix("<!--") {
        match comment.find("-->") {
            Some(end) => rest = comment[end + 3..].trim_start(),
            None => return false,
        }
    }

    let head = rest
        .chars()
        .take(16)
        .collect::<String>()
        .to_ascii_lowercase();
    head.starts_with("<!doctype html") || head.starts_with("<html")
}

/// HTML markup anywhere in a body that is not JSON
fn mentions_html(body: &str) -> bool {
    let lower = body.to_ascii_lowercase();
    lower.contains("<!doctype html") || lower.contains("<html")
}
