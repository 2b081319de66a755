// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Wirenet and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mutable wrapper around the pure reducer.
//!
//! A [`Host`] owns the current [`NetworkState`], applies actions to it one at a time and tells
//! subscribers about every state that differs from the previous one. Callers that need
//! concurrency put the host behind their own lock; the reducer itself holds no shared state.

use std::panic::{self, AssertUnwindSafe};

use crate::model::NetworkState;
use crate::ops::{try_apply, Action, DispatchError};

pub type Reducer = fn(&NetworkState, &Action) -> Result<NetworkState, DispatchError>;

type Subscriber = Box<dyn FnMut(&NetworkState)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriberId(u64);

/// Result of [`Host::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchStatus {
    /// The action changed the state and the revision moved forward.
    Committed,
    /// The action was refused; the message is now in `last_error`.
    Rejected(DispatchError),
    /// The action was valid but had nothing to do.
    Unchanged,
    /// The reducer panicked; the domain data is untouched.
    Faulted,
}

pub struct Host {
    state: NetworkState,
    reducer: Reducer,
    subscribers: Vec<(SubscriberId, Subscriber)>,
    next_subscriber_id: u64,
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host")
            .field("revision", &self.state.revision)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl Host {
    pub fn new(state: NetworkState) -> Self {
        Self::with_reducer(state, try_apply)
    }

    pub fn with_reducer(state: NetworkState, reducer: Reducer) -> Self {
        Self {
            state,
            reducer,
            subscribers: Vec::new(),
            next_subscriber_id: 0,
        }
    }

    pub fn state(&self) -> &NetworkState {
        &self.state
    }

    pub fn into_state(self) -> NetworkState {
        self.state
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&NetworkState) + 'static) -> SubscriberId {
        let id = SubscriberId(self.next_subscriber_id);
        self.next_subscriber_id += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(subscriber_id, _)| *subscriber_id != id);
        self.subscribers.len() != before
    }

    /// Swaps in a whole new state (for example one loaded from disk).
    pub fn replace_state(&mut self, state: NetworkState) {
        if state == self.state {
            return;
        }
        self.state = state;
        self.notify();
    }

    pub fn dispatch(&mut self, action: &Action) -> DispatchStatus {
        let reducer = self.reducer;
        let current = &self.state;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| reducer(current, action)));

        match outcome {
            Ok(Ok(next)) => {
                if next.revision == self.state.revision {
                    return DispatchStatus::Unchanged;
                }
                self.state = next;
                self.notify();
                DispatchStatus::Committed
            }
            Ok(Err(err)) => {
                self.set_error(err.to_string());
                DispatchStatus::Rejected(err)
            }
            Err(_) => {
                tracing::error!(action = action.type_name(), "reducer panicked");
                self.set_error(format!("internal error while applying {}", action.type_name()));
                DispatchStatus::Faulted
            }
        }
    }

    fn set_error(&mut self, message: String) {
        if self.state.last_error.as_deref() == Some(message.as_str()) {
            return;
        }
        self.state.last_error = Some(message);
        self.notify();
    }

    fn notify(&mut self) {
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&self.state);
        }
    }
}
