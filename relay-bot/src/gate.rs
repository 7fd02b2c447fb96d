//! Availability gate: at most one outstanding request per session.
//!
//! The gate is a single busy flag. Acquiring hands out a [`GateGuard`] that clears the flag when
//! dropped, so every exit path of a handler (including a panic in a spawned task) frees the gate.
//! There is no queue: a message that finds the gate busy is dropped by the caller.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct GateState {
    busy: AtomicBool,
    idle: Notify,
}

impl GateState {
    fn clear(&self) {
        self.busy.store(false, Ordering::Release);
        self.idle.notify_waiters();
    }
}

#[derive(Debug, Clone, Default)]
pub struct AvailabilityGate {
    state: Arc<GateState>,
}

impl AvailabilityGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the gate busy if it was free. Returns `None` when another request holds it.
    pub fn try_acquire(&self) -> Option<GateGuard> {
        self.state
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| GateGuard {
                state: Arc::clone(&self.state),
            })
    }

    /// Clears the flag regardless of who holds it.
    pub fn release(&self) {
        self.state.clear();
    }

    pub fn is_busy(&self) -> bool {
        self.state.busy.load(Ordering::Acquire)
    }

    /// Resolves once the gate is free.
    pub async fn wait_idle(&self) {
        loop {
            let idle = self.state.idle.notified();
            tokio::pin!(idle);
            idle.as_mut().enable();
            if !self.is_busy() {
                return;
            }
            idle.await;
        }
    }
}

/// Proof of holding the gate. Dropping it frees the gate.
#[derive(Debug)]
#[must_use = "the gate is released as soon as the guard is dropped"]
pub struct GateGuard {
    state: Arc<GateState>,
}

impl Drop for GateGuard {
    fn drop(&mut self) {
        self.state.clear();
    }
}
