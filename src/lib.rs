//! Stockbot Dashboard - control plane for the stock trading bot
//!
//! Lets a user pick a stock and trigger the bot's `train`, `backtest`,
//! `trade` and `forceExit` operations, tracking the progress of each.
//!
//! # Architecture
//! - `client`: one GET per action against the bot API, interstitial detection
//! - `store`: per-action `{loading, message, response, error}` state
//! - `dispatcher`: runs an action through the client and settles the store
//! - `view`: status line, busy flag, final portfolio value
//! - `feed`: performance series for the chart (simulated for now)
//! - Worker entry point: `/api/*` reverse proxy to the bot's upstream origin,
//!   `/stocks` for the configured picker entries

#![allow(clippy::cast_precision_loss)] // Float casts OK for display
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::doc_markdown)] // Doc style flexibility
#![allow(clippy::needless_pass_by_value)] // Worker framework patterns

mod client;
mod config;
mod dispatcher;
mod error;
mod feed;
mod proxy;
mod store;
mod types;
mod view;

use worker::{Context, Env, Headers, Request, Response, Router, console_error, console_log, event};

pub use client::{BotApi, BotClient, body_message, decode_response};
pub use config::{API_BASE_PATH, Config, SKIP_WARNING_HEADER};
pub use dispatcher::Dispatcher;
pub use error::{DashboardError, INTERSTITIAL_HINT};
pub use feed::{GainPoint, PerformanceFeed, REFRESH_INTERVAL, SimulatedFeed};
pub use proxy::{UpstreamReply, upstream_url};
pub use store::{ActionStore, DEFAULT_SUCCESS_MESSAGE, Ticket, success_message};
pub use types::*;
pub use view::{
    DashboardSummary, any_loading, final_portfolio_value, format_usd, status_message,
};

/// Result type alias for worker operations
type WResult<T> = std::result::Result<T, worker::Error>;

/// Main Worker entry point
#[event(fetch)]
async fn fetch(req: Request, env: Env, _ctx: Context) -> WResult<Response> {
    console_error_panic_hook::set_once();

    let router = Router::new();

    router
        // Health check
        .get_async("/health", |_req, ctx| async move {
            let config = match Config::from_env(&ctx.env) {
                Ok(c) => c,
                Err(e) => return Response::error(format!("Config error: {e}"), 500),
            };

            Response::from_json(&serde_json::json!({
                "status": "healthy",
                "version": env!("CARGO_PKG_VERSION"),
                "environment": config.environment,
                "upstream": config.upstream_origin,
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }))
        })
        // Stocks offered in the picker
        .get_async("/stocks", |_req, ctx| async move {
            match Config::from_env(&ctx.env) {
                Ok(config) => Response::from_json(&config.stocks),
                Err(e) => Response::error(format!("Config error: {e}"), 500),
            }
        })
        // Bot API proxy
        .get_async("/api/*path", |req, ctx| async move {
            let config = match Config::from_env(&ctx.env) {
                Ok(c) => c,
                Err(e) => return Response::error(format!("Config error: {e}"), 500),
            };

            let url = req.url()?;
            let accept = req.headers().get("Accept")?;
            if config.verbose() {
                console_log!("Proxying {} to {}", url.path(), config.upstream_origin);
            }

            let client = reqwest::Client::new();
            match proxy::forward(&client, &config, url.path(), url.query(), accept.as_deref())
                .await
            {
                Ok(reply) => relay(reply),
                Err(e) => {
                    console_error!("Upstream call failed: {}", e);
                    Ok(Response::from_json(&serde_json::json!({
                        "error": true,
                        "message": format!("{e}"),
                    }))?
                    .with_status(502))
                }
            }
        })
        .run(req, env)
        .await
}

/// Turn an upstream reply into the worker response
fn relay(reply: UpstreamReply) -> WResult<Response> {
    let mut headers = Headers::new();
    if let Some(content_type) = &reply.content_type {
        headers.set("Content-Type", content_type)?;
    }
    Ok(Response::ok(reply.body)?
        .with_status(reply.status)
        .with_headers(headers))
}
