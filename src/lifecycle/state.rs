//! Server lifecycle state machine.
//!
//! # State Transitions
//! ```text
//! Starting → Serving:      listener bound, accepting connections
//! Serving → ShuttingDown:  termination requested, accept loop stopped
//! ShuttingDown → Stopped:  in-flight requests drained or grace period elapsed
//! ```
//!
//! Transitions only move forward. `Serving → Stopped` is allowed when the
//! server exits without a shutdown request (e.g. an accept loop I/O error).

use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LifecycleState {
    Starting,
    Serving,
    ShuttingDown,
    Stopped,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Starting => "starting",
            LifecycleState::Serving => "serving",
            LifecycleState::ShuttingDown => "shutting_down",
            LifecycleState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Publishes the current lifecycle state to any number of observers.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    tx: Arc<watch::Sender<LifecycleState>>,
}

impl Lifecycle {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(LifecycleState::Starting);
        Self { tx: Arc::new(tx) }
    }

    /// Move to `next` if it is later than the current state.
    /// Returns whether a transition happened.
    pub fn advance(&self, next: LifecycleState) -> bool {
        self.tx.send_if_modified(|state| {
            if next <= *state {
                return false;
            }
            tracing::info!(from = %state, to = %next, "Lifecycle transition");
            *state = next;
            true
        })
    }

    pub fn current(&self) -> LifecycleState {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.tx.subscribe()
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}
