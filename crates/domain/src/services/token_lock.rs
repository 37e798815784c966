//! Per-token serialization of invitation acceptance.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Keyed async locks, one per invitation token.
///
/// Entries are created on first use and dropped again once the last holder
/// or waiter releases them, so the map only holds tokens in flight. A waiter
/// cancelled before it gets the lock releases its entry too.
#[derive(Debug, Default)]
pub struct TokenLocks {
    slots: Mutex<HashMap<String, Slot>>,
}

#[derive(Debug, Default)]
struct Slot {
    lock: Arc<AsyncMutex<()>>,
    /// Holders plus waiters.
    users: usize,
}

impl TokenLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `token`.
    pub async fn acquire(&self, token: &str) -> TokenGuard<'_> {
        let lock = {
            let mut slots = self.slots();
            let slot = slots.entry(token.to_string()).or_default();
            slot.users += 1;
            slot.lock.clone()
        };

        // Built before waiting: dropping this future mid-wait still runs the
        // guard's release.
        let mut guard = TokenGuard {
            owner: self,
            token: token.to_string(),
            guard: None,
        };
        guard.guard = Some(lock.lock_owned().await);
        guard
    }

    /// Number of tokens currently locked or awaited.
    pub fn in_flight(&self) -> usize {
        self.slots().len()
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Held while a token is being accepted; releases on drop.
pub struct TokenGuard<'a> {
    owner: &'a TokenLocks,
    token: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for TokenGuard<'_> {
    fn drop(&mut self) {
        self.guard.take();

        let mut slots = self.owner.slots();
        if let Some(slot) = slots.get_mut(&self.token) {
            slot.users = slot.users.saturating_sub(1);
            if slot.users == 0 {
                slots.remove(&self.token);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn test_entry_removed_after_release() {
        let locks = TokenLocks::new();
        tokio_test::block_on(async {
            let _guard = locks.acquire("abc").await;
            assert_eq!(locks.in_flight(), 1);
        });
        assert_eq!(locks.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_distinct_tokens_do_not_block() {
        let locks = TokenLocks::new();
        let _a = locks.acquire("a").await;
        let b = tokio::time::timeout(Duration::from_millis(100), locks.acquire("b")).await;
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn test_same_token_is_exclusive() {
        let locks = Arc::new(TokenLocks::new());
        let active = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let locks = locks.clone();
            let active = active.clone();
            let max_seen = max_seen.clone();
            handles.push(tokio::spawn(async move {
                let _guard = locks.acquire("shared").await;
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                max_seen.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                active.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
        assert_eq!(locks.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_timed_out_waiter_releases_entry() {
        let locks = TokenLocks::new();
        let holder = locks.acquire("t").await;

        let waiter = tokio::time::timeout(Duration::from_millis(20), locks.acquire("t")).await;
        assert!(waiter.is_err());
        assert_eq!(locks.in_flight(), 1);

        drop(holder);
        assert_eq!(locks.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_waiter_aborted_after_wakeup_releases_entry() {
        let locks = Arc::new(TokenLocks::new());
        let holder = locks.acquire("t").await;

        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire("t").await;
            })
        };
        // Let the waiter queue up behind the holder.
        tokio::task::yield_now().await;

        // Releasing wakes the waiter, which is aborted before it runs again.
        drop(holder);
        waiter.abort();
        let err = waiter.await.unwrap_err();
        assert!(err.is_cancelled());

        assert_eq!(locks.in_flight(), 0);
        let _again = locks.acquire("t").await;
        assert_eq!(locks.in_flight(), 1);
    }
}
