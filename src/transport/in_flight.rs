use crate::error::AppError;
use std::fmt::Debug;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;
use tracing::debug;

/// What to do when a request arrives while another one is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePolicy {
    /// Same key fails with [`AppError::RequestInProgress`]; a different key cancels the stale request.
    RejectSame,
    /// The newest caller always wins and the stale request is cancelled.
    Supersede,
}

struct Active<K> {
    id: u64,
    key: K,
    stop: broadcast::Sender<()>,
}

/// Tracks the single outstanding request of one kind.
///
/// At most one [`Ticket`] is current at a time. Superseded tickets observe a
/// stop signal and can no longer commit side effects.
pub struct RequestGate<K> {
    active: Mutex<Option<Active<K>>>,
    next_id: AtomicU64,
}

impl<K: PartialEq + Debug> RequestGate<K> {
    pub fn new() -> Self {
        Self {
            active: Mutex::new(None),
            next_id: AtomicU64::new(1),
        }
    }

    /// Marks a request for `key` as in flight.
    pub fn acquire(&self, key: K, policy: GatePolicy) -> Result<Ticket<'_, K>, AppError> {
        let mut active = self.lock();
        if let Some(current) = active.as_ref() {
            if policy == GatePolicy::RejectSame && current.key == key {
                debug!("Request {} already in flight for this key", current.id);
                return Err(AppError::RequestInProgress);
            }
            debug!("Cancelling superseded request {}", current.id);
            let _ = current.stop.send(());
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (stop, stopped) = broadcast::channel(1);
        *active = Some(Active { id, key, stop });

        Ok(Ticket {
            gate: self,
            id,
            stopped,
        })
    }

    pub fn is_active(&self) -> bool {
        self.lock().is_some()
    }

    /// Cancels the outstanding request, if any. Its ticket can no longer commit.
    pub fn cancel(&self) {
        if let Some(current) = self.lock().take() {
            debug!("Cancelling request {}", current.id);
            let _ = current.stop.send(());
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Active<K>>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_current(&self, id: u64) -> bool {
        matches!(self.lock().as_ref(), Some(active) if active.id == id)
    }
}

impl<K: PartialEq + Debug> Default for RequestGate<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle for one in-flight request. Dropping it releases the gate if it is still current.
pub struct Ticket<'a, K: PartialEq + Debug> {
    gate: &'a RequestGate<K>,
    id: u64,
    stopped: broadcast::Receiver<()>,
}

impl<K: PartialEq + Debug> Ticket<'_, K> {
    /// Drives `request` until it completes or a newer request supersedes this one.
    pub async fn run<T, F>(&mut self, request: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, AppError>>,
    {
        tokio::select! {
            biased;
            _ = self.stopped.recv() => Err(AppError::Cancelled),
            result = request => result,
        }
    }

    /// Applies a side effect only if this ticket is still the current one.
    ///
    /// The gate stays locked while `apply` runs, so a concurrent `acquire`
    /// cannot slip in between the check and the write.
    pub fn commit<R>(&self, apply: impl FnOnce() -> R) -> Result<R, AppError> {
        let active = self.gate.lock();
        match active.as_ref() {
            Some(current) if current.id == self.id => Ok(apply()),
            _ => Err(AppError::Cancelled),
        }
    }

    pub fn is_current(&self) -> bool {
        self.gate.is_current(self.id)
    }
}

impl<K: PartialEq + Debug> Drop for Ticket<'_, K> {
    fn drop(&mut self) {
        let mut active = self.gate.lock();
        if matches!(active.as_ref(), Some(current) if current.id == self.id) {
            *active = None;
        }
    }
}
