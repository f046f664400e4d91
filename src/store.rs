//! Action state store
//!
//! Holds one [`ActionState`] per [`ActionKind`] for the lifetime of the
//! session. Each dispatch takes a [`Ticket`]; only the latest ticket for a
//! kind may settle it, so an overlapping older request cannot overwrite the
//! state of a newer one.
//!
//! Single-threaded by construction: interior mutability is a `RefCell` and no
//! borrow is held across an await point.

use std::cell::RefCell;

use serde_json::Value;

use crate::client::body_message;
use crate::types::{ActionKind, ActionState};

/// Message stored when a successful body carries none
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Operation Successful";

/// Status text for a successful body: its `message`, else the default
pub fn success_message(response: &Value) -> String {
    body_message(response)
        .unwrap_or(DEFAULT_SUCCESS_MESSAGE)
        .to_string()
}

/// Handle for one in-flight dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub kind: ActionKind,
    pub seq: u64,
}

#[derive(Debug, Default)]
struct Slot {
    state: ActionState,
    seq: u64,
}

/// Per-kind request state container
#[derive(Debug, Default)]
pub struct ActionStore {
    slots: RefCell<[Slot; 4]>,
}

impl ActionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current state for `kind`
    pub fn get(&self, kind: ActionKind) -> ActionState {
        self.slots.borrow()[kind.index()].state.clone()
    }

    /// Copy of every state, in [`ActionKind::ALL`] order
    pub fn snapshot(&self) -> [(ActionKind, ActionState); 4] {
        let slots = self.slots.borrow();
        ActionKind::ALL.map(|kind| (kind, slots[kind.index()].state.clone()))
    }

    /// Enter the loading state and issue a ticket for this request.
    ///
    /// Clears the previous message and error flag. The previous response is
    /// kept until the new request settles.
    pub fn begin(&self, kind: ActionKind) -> Ticket {
        let mut slots = self.slots.borrow_mut();
        let slot = &mut slots[kind.index()];
        slot.seq += 1;
        slot.state.loading = true;
        slot.state.message = None;
        slot.state.error = false;
        Ticket {
            kind,
            seq: slot.seq,
        }
    }

    /// Record a successful response. Returns false when the ticket is stale
    /// and the state was left untouched.
    pub fn succeed(&self, ticket: Ticket, response: Value) -> bool {
        let message = success_message(&response);
        self.settle(ticket, |state| {
            state.message = Some(message);
            state.response = Some(response);
            state.error = false;
        })
    }

    /// Record a failure. Returns false when the ticket is stale.
    pub fn fail(&self, ticket: Ticket, message: impl Into<String>) -> bool {
        let message = message.into();
        self.settle(ticket, |state| {
            state.message = Some(message);
            state.response = None;
            state.error = true;
        })
    }

    /// Leave the loading state without an outcome, for a dispatch dropped
    /// before it settled. Message, error and response are left as they are.
    /// Returns false when the ticket is stale.
    pub fn abandon(&self, ticket: Ticket) -> bool {
        self.settle(ticket, |_| {})
    }

    /// True while `ticket` is the newest request for its kind
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.slots.borrow()[ticket.kind.index()].seq == ticket.seq
    }

    fn settle<F>(&self, ticket: Ticket, apply: F) -> bool
    where
        F: FnOnce(&mut ActionState),
    {
        let mut slots = self.slots.borrow_mut();
        let slot = &mut slots[ticket.kind.index()];
        if slot.seq != ticket.seq {
            tracing::debug!(
                kind = %ticket.kind,
                stale = ticket.seq,
                current = slot.seq,
                "discarding stale settlement"
            );
            return false;
        }
        slot.state.loading = false;
        apply(&mut slot.state);
        true
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_begin_clears_message_and_keeps_response() {
        let store = ActionStore::new();
        let first = store.begin(ActionKind::Backtest);
        store.succeed(first, json!({"message": "done", "final_portfolio_value": 10}));

        store.begin(ActionKind::Backtest);
        let state = store.get(ActionKind::Backtest);
        assert!(state.loading);
        assert!(!state.error);
        assert_eq!(state.message, None);
        assert_eq!(state.response, Some(json!({"message": "done", "final_portfolio_value": 10})));
    }

    #[test]
    fn test_succeed_defaults_message() {
        let store = ActionStore::new();
        let ticket = store.begin(ActionKind::Trade);
        assert!(store.succeed(ticket, json!({"orders": []})));

        let state = store.get(ActionKind::Trade);
        assert!(!state.loading);
        assert_eq!(state.message.as_deref(), Some("Operation Successful"));
        assert_eq!(state.response, Some(json!({"orders": []})));
    }

    #[test]
    fn test_fail_drops_response() {
        let store = ActionStore::new();
        let ok = store.begin(ActionKind::Train);
        store.succeed(ok, json!({"message": "trained"}));

        let ticket = store.begin(ActionKind::Train);
        assert!(store.fail(ticket, "model missing"));
        let state = store.get(ActionKind::Train);
        assert_eq!(
            state,
            ActionState {
                loading: false,
                message: Some("model missing".into()),
                response: None,
                error: true,
            }
        );
    }

    #[test]
    fn test_stale_ticket_is_ignored() {
        let store = ActionStore::new();
        let older = store.begin(ActionKind::Trade);
        let newer = store.begin(ActionKind::Trade);
        assert!(!store.is_current(older));

        assert!(!store.succeed(older, json!({"message": "old"})));
        assert!(store.get(ActionKind::Trade).loading);

        store.fail(newer, "new failure");
        let state = store.get(ActionKind::Trade);
        assert!(!state.loading);
        assert_eq!(state.message.as_deref(), Some("new failure"));
    }

    #[test]
    fn test_abandon_clears_loading_only_for_current_ticket() {
        let store = ActionStore::new();
        let done = store.begin(ActionKind::Backtest);
        store.succeed(done, json!({"message": "done", "final_portfolio_value": 5}));

        let older = store.begin(ActionKind::Backtest);
        let newer = store.begin(ActionKind::Backtest);
        assert!(!store.abandon(older));
        assert!(store.get(ActionKind::Backtest).loading);

        assert!(store.abandon(newer));
        let state = store.get(ActionKind::Backtest);
        assert!(!state.loading);
        assert!(!state.error);
        assert_eq!(state.message, None);
        assert_eq!(state.response, Some(json!({"message": "done", "final_portfolio_value": 5})));
    }

    #[test]
    fn test_kinds_do_not_share_state() {
        let store = ActionStore::new();
        let train = store.begin(ActionKind::Train);
        store.fail(train, "boom");

        for (kind, state) in store.snapshot() {
            if kind == ActionKind::Train {
                assert!(state.error);
            } else {
                assert_eq!(state, ActionState::default());
            }
        }
    }
}
