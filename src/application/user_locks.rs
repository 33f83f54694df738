//! Per-user event serialization.
//!
//! Events of one user run one at a time; events of different users run
//! concurrently. Each user gets a lazily created async mutex, held for the
//! whole handling of one event, including outbound calls. The mutex is
//! dropped from the registry once its last holder or waiter is gone.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::foundation::UserId;

type LockMap = HashMap<UserId, Arc<AsyncMutex<()>>>;

/// Registry of per-user locks.
#[derive(Debug, Clone, Default)]
pub struct UserLocks {
    locks: Arc<Mutex<LockMap>>,
}

fn lock_map(locks: &Mutex<LockMap>) -> MutexGuard<'_, LockMap> {
    locks.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Exclusive access to one user, released on drop.
#[derive(Debug)]
pub struct UserGuard {
    user_id: UserId,
    guard: Option<OwnedMutexGuard<()>>,
    locks: Arc<Mutex<LockMap>>,
}

impl Drop for UserGuard {
    fn drop(&mut self) {
        // Waiters clone the mutex under the map lock, so a count of one
        // after release means the map holds the only reference.
        let mut locks = lock_map(&self.locks);
        drop(self.guard.take());
        if locks
            .get(&self.user_id)
            .map_or(false, |lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.user_id);
        }
    }
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other event of `user_id` is being handled.
    ///
    /// The returned guard releases the user when dropped.
    pub async fn acquire(&self, user_id: UserId) -> UserGuard {
        let lock = Arc::clone(lock_map(&self.locks).entry(user_id).or_default());
        let guard = lock.lock_owned().await;
        UserGuard {
            user_id,
            guard: Some(guard),
            locks: Arc::clone(&self.locks),
        }
    }

    /// Number of users currently holding or waiting for their lock.
    pub fn len(&self) -> usize {
        lock_map(&self.locks).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
