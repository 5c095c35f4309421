//! Per-session turn serialization.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

type LockTable = HashMap<Uuid, Arc<AsyncMutex<()>>>;

/// Hands out one async mutex per session so that a session's turns run one
/// at a time while different sessions proceed in parallel.
///
/// Entries live only while someone holds or waits for them.
#[derive(Debug, Clone, Default)]
pub struct SessionLocks {
    inner: Arc<Mutex<LockTable>>,
}

/// Exclusive access to one session; released on drop.
#[must_use]
#[derive(Debug)]
pub struct SessionGuard {
    session_id: Uuid,
    table: Arc<Mutex<LockTable>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        drop(self.guard.take());
        if table
            .get(&self.session_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            table.remove(&self.session_id);
        }
    }
}

impl SessionLocks {
    /// Creates an empty lock table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `session_id`. Access lasts until the
    /// guard is dropped.
    pub async fn acquire(&self, session_id: Uuid) -> SessionGuard {
        let lock = {
            let mut table = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            // Waiters that gave up leave idle entries behind.
            table.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(table.entry(session_id).or_default())
        };
        let guard = lock.lock_owned().await;
        SessionGuard {
            session_id,
            table: Arc::clone(&self.inner),
            guard: Some(guard),
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
