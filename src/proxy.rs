//! `/api` reverse proxy
//!
//! The browser calls `/api/{action}` on the dashboard origin; the worker
//! forwards to the bot's upstream origin with the `/api` prefix removed and
//! the tunnel warning suppressed. Status, content type and body are relayed
//! unchanged so the client sees exactly what the bot answered.

use reqwest::header::{ACCEPT, CONTENT_TYPE};

use crate::config::{API_BASE_PATH, Config, SKIP_WARNING_HEADER};
use crate::error::Result;

/// Upstream answer, ready to be relayed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamReply {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

/// Map a dashboard request path onto the upstream origin
pub fn upstream_url(origin: &str, path: &str, query: Option<&str>) -> String {
    let rest = path
        .strip_prefix(API_BASE_PATH)
        .filter(|rest| rest.is_empty() || rest.starts_with('/'))
        .unwrap_or(path)
        .trim_start_matches('/');

    let mut url = format!("{}/{rest}", origin.trim_end_matches('/'));
    if let Some(query) = query.map(|q| q.trim_start_matches('?')).filter(|q| !q.is_empty()) {
        url.push('?');
        url.push_str(query);
    }
    url
}

/// Forward one GET to the upstream bot
pub async fn forward(
    client: &reqwest::Client,
    config: &Config,
    path: &str,
    query: Option<&str>,
    accept: Option<&str>,
) -> Result<UpstreamReply> {
    let url = upstream_url(&config.upstream_origin, path, query);

    let mut request = client
        .get(&url)
        .header(ACCEPT, accept.unwrap_or("application/json"));
    if config.skip_proxy_warning {
        request = request.header(SKIP_WARNING_HEADER, "true");
    }

    let response = request.send().await?;
    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = response.text().await?;

    tracing::debug!(url = %url, status, "proxied upstream call");

    Ok(UpstreamReply {
        status,
        content_type,
        body,
    })
}
