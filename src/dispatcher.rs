//! Action dispatcher
//!
//! Runs one bot operation per call: marks the action as loading, performs a
//! single adapter call, and settles the store with the outcome. Errors stop
//! here; the returned future always resolves to an [`ApiResult`].

use std::future::Future;

use crate::client::BotApi;
use crate::store::{ActionStore, Ticket, success_message};
use crate::types::{ActionKind, ActionState, ApiResult};

/// Dispatches bot operations through an injected [`BotApi`]
pub struct Dispatcher<A> {
    api: A,
    store: ActionStore,
}

impl<A: BotApi> Dispatcher<A> {
    pub fn new(api: A) -> Self {
        Self::with_store(api, ActionStore::new())
    }

    pub fn with_store(api: A, store: ActionStore) -> Self {
        Self { api, store }
    }

    pub fn store(&self) -> &ActionStore {
        &self.store
    }

    pub fn state(&self, kind: ActionKind) -> ActionState {
        self.store.get(kind)
    }

    /// Start `kind` for `stock`.
    ///
    /// The loading state is entered when this is called, before the returned
    /// future is first polled. No retry or timeout; dropping the future
    /// before it resolves takes the action out of the loading state.
    pub fn dispatch<'a>(
        &'a self,
        kind: ActionKind,
        stock: &'a str,
    ) -> impl Future<Output = ApiResult> + 'a {
        let ticket = self.store.begin(kind);
        tracing::debug!(%kind, stock, seq = ticket.seq, "dispatch started");
        let mut pending = PendingSettlement {
            store: &self.store,
            ticket,
            settled: false,
        };

        async move {
            let result = match self.api.call(kind, stock).await {
                Ok(body) => {
                    let message = success_message(&body);
                    self.store.succeed(ticket, body);
                    ApiResult::ok(message)
                }
                Err(err) => {
                    tracing::warn!(%kind, stock, error = %err, "dispatch failed");
                    let message = err.user_message(kind, stock);
                    self.store.fail(ticket, message.clone());
                    ApiResult::failed(message)
                }
            };
            pending.settled = true;
            result
        }
    }

    pub fn train<'a>(&'a self, stock: &'a str) -> impl Future<Output = ApiResult> + 'a {
        self.dispatch(ActionKind::Train, stock)
    }

    pub fn backtest<'a>(&'a self, stock: &'a str) -> impl Future<Output = ApiResult> + 'a {
        self.dispatch(ActionKind::Backtest, stock)
    }

    pub fn trade<'a>(&'a self, stock: &'a str) -> impl Future<Output = ApiResult> + 'a {
        self.dispatch(ActionKind::Trade, stock)
    }

    pub fn force_exit<'a>(&'a self, stock: &'a str) -> impl Future<Output = ApiResult> + 'a {
        self.dispatch(ActionKind::ForceExit, stock)
    }
}

/// Moved into every dispatch future; releases the loading state if the
/// future is dropped before it settles.
struct PendingSettlement<'a> {
    store: &'a ActionStore,
    ticket: Ticket,
    settled: bool,
}

impl Drop for PendingSettlement<'_> {
    fn drop(&mut self) {
        if !self.settled && self.store.abandon(self.ticket) {
            tracing::debug!(
                kind = %self.ticket.kind,
                seq = self.ticket.seq,
                "dispatch dropped before settling"
            );
        }
    }
}
