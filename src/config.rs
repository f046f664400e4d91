//! Configuration management for the control plane

use crate::error::{DashboardError, Result};
use crate::types::StockOption;
use worker::Env;

/// Path prefix the browser uses for bot calls
pub const API_BASE_PATH: &str = "/api";

/// Header that tells the tunnel to skip its browser warning page
pub const SKIP_WARNING_HEADER: &str = "ngrok-skip-browser-warning";

/// Control plane configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment (production, staging, development)
    pub environment: String,

    /// Log level
    pub log_level: String,

    /// Absolute base URL the client calls, `{api_base_url}/{endpoint}`
    pub api_base_url: String,

    /// Origin the `/api` proxy forwards to
    pub upstream_origin: String,

    /// Send the tunnel warning-suppression header
    pub skip_proxy_warning: bool,

    /// Stocks offered in the picker
    pub stocks: Vec<StockOption>,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    /// Load configuration from Cloudflare environment variables
    pub fn from_env(env: &Env) -> Result<Self> {
        let config = Self::from_lookup(|key| env.var(key).ok().map(|v| v.to_string()));
        config.validate()?;
        Ok(config)
    }

    /// Build from any key lookup, applying defaults for missing keys
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let stocks = lookup("STOCKS")
            .map(|v| v.split(',').filter_map(StockOption::parse).collect())
            .unwrap_or_else(StockOption::catalog);

        Self {
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "production".to_string()),

            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),

            api_base_url: lookup("API_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|| format!("http://127.0.0.1:8787{API_BASE_PATH}")),

            upstream_origin: lookup("UPSTREAM_ORIGIN")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|| "http://127.0.0.1:6685".to_string()),

            skip_proxy_warning: lookup("SKIP_PROXY_WARNING")
                .map(|v| v.to_lowercase() != "false")
                .unwrap_or(true),

            stocks,
        }
    }

    /// Per-request worker logging (`LOG_LEVEL` of `debug` or `trace`)
    pub fn verbose(&self) -> bool {
        ["debug", "trace"]
            .iter()
            .any(|level| self.log_level.eq_ignore_ascii_case(level))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !is_http_url(&self.api_base_url) {
            return Err(DashboardError::Config(format!(
                "api_base_url must be an http(s) URL, got '{}'",
                self.api_base_url
            )));
        }
        if !is_http_url(&self.upstream_origin) {
            return Err(DashboardError::Config(format!(
                "upstream_origin must be an http(s) URL, got '{}'",
                self.upstream_origin
            )));
        }
        if self.stocks.is_empty() {
            return Err(DashboardError::Config("At least one stock required".into()));
        }
        Ok(())
    }
}

fn is_http_url(value: &str) -> bool {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    rest.is_some_and(|host| !host.is_empty())
}
