//! Component F: optimistic per-file locking with a FIFO wait queue and
//! stale-lock reaping.
//!
//! State lives behind a single `parking_lot::Mutex` — every operation here
//! is a short, non-blocking critical section; the only genuinely
//! asynchronous part is waiting on a wake channel in [`WaitHandle`], which
//! happens outside the lock.

use std::collections::HashMap;
use std::collections::VecDeque;
use std::time::Duration;
use std::time::Instant;

use tokio::sync::oneshot;
use tracing::warn;

/// A lock older than this is considered abandoned and may be evicted by a
/// fresh `acquire` attempt.
const STALE_AFTER: Duration = Duration::from_secs(30);
/// A lock older than this is force-released by the reaper even without a
/// competing acquire.
const REAP_AFTER: Duration = Duration::from_secs(60);
pub const REAPER_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireResult {
    Acquired,
    Contended,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidateResult {
    Ok,
    Stale(String),
    NoPriorRead,
}

struct Holder {
    session: String,
    acquired_at: Instant,
}

struct Waiter {
    session: String,
    wake: oneshot::Sender<()>,
}

/// Returned by `queue_write`. The caller must not treat receiving a wake as
/// ownership — it must retry `acquire` through the normal path.
pub struct WaitHandle {
    pub position: usize,
    pub woken: oneshot::Receiver<()>,
}

#[derive(Default)]
struct Inner {
    locks: HashMap<String, Holder>,
    waiters: HashMap<String, VecDeque<Waiter>>,
    versions: HashMap<(String, String), String>,
}

#[derive(Default)]
pub struct LockManager {
    inner: parking_lot::Mutex<Inner>,
}

impl LockManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self, path: &str, session: &str) -> AcquireResult {
        let path = normalize_path(path);
        let mut inner = self.inner.lock();
        if let Some(holder) = inner.locks.get(&path) {
            if holder.acquired_at.elapsed() > STALE_AFTER {
                warn!(path = %path, prior_holder = %holder.session, "evicting stale lock");
            } else {
                return AcquireResult::Contended;
            }
        }
        inner.locks.insert(
            path,
            Holder {
                session: session.to_string(),
                acquired_at: Instant::now(),
            },
        );
        AcquireResult::Acquired
    }

    /// No-op unless `session` currently holds `path`. Wakes the next
    /// waiter, if any, without granting it ownership.
    pub fn release(&self, path: &str, session: &str) {
        let path = normalize_path(path);
        let mut inner = self.inner.lock();
        let holds = inner.locks.get(&path).is_some_and(|h| h.session == session);
        if !holds {
            return;
        }
        inner.locks.remove(&path);
        wake_head(&mut inner, &path);
    }

    pub fn register_read(&self, path: &str, session: &str, content: &str) {
        let path = normalize_path(path);
        let hash = crate::spatial_hash::hash(content);
        let mut inner = self.inner.lock();
        inner.versions.insert((path, session.to_string()), hash);
    }

    pub fn validate_write(&self, path: &str, session: &str, current_on_disk: &str) -> ValidateResult {
        let path = normalize_path(path);
        let inner = self.inner.lock();
        let Some(registered) = inner.versions.get(&(path, session.to_string())) else {
            return ValidateResult::NoPriorRead;
        };
        let current_hash = crate::spatial_hash::hash(current_on_disk);
        if &current_hash == registered {
            ValidateResult::Ok
        } else {
            ValidateResult::Stale(current_hash)
        }
    }

    /// Enqueue `session` as a waiter for `path`. Returns the FIFO position
    /// (0 = next to be woken) and a handle the caller may await; dropping
    /// the handle removes the waiter on the next release.
    pub fn queue_write(&self, path: &str, session: &str) -> WaitHandle {
        let path = normalize_path(path);
        let (tx, rx) = oneshot::channel();
        let mut inner = self.inner.lock();
        let queue = inner.waiters.entry(path).or_default();
        let position = queue.len();
        queue.push_back(Waiter {
            session: session.to_string(),
            wake: tx,
        });
        WaitHandle { position, woken: rx }
    }

    /// Force-release any lock held longer than [`REAP_AFTER`], waking the
    /// queue head for each. Intended to be called on a periodic tick.
    pub fn reap(&self) {
        let mut inner = self.inner.lock();
        let stale: Vec<String> = inner
            .locks
            .iter()
            .filter(|(_, h)| h.acquired_at.elapsed() > REAP_AFTER)
            .map(|(path, _)| path.clone())
            .collect();
        for path in stale {
            if let Some(holder) = inner.locks.remove(&path) {
                warn!(path = %path, holder = %holder.session, "reaping expired lock");
            }
            wake_head(&mut inner, &path);
        }
    }

    pub fn spawn_reaper(self: std::sync::Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(REAPER_INTERVAL);
            loop {
                interval.tick().await;
                self.reap();
            }
        })
    }
}

fn wake_head(inner: &mut Inner, path: &str) {
    if let Some(queue) = inner.waiters.get_mut(path) {
        while let Some(waiter) = queue.pop_front() {
            if waiter.wake.send(()).is_ok() {
                break;
            }
            // Receiver dropped; skip to the next waiter.
        }
        if queue.is_empty() {
            inner.waiters.remove(path);
        }
    }
}

fn normalize_path(path: &str) -> String {
    path.replace('\\', "/").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_then_contend_then_release_frees_the_path() {
        let manager = LockManager::new();
        assert_eq!(manager.acquire("f.ts", "S_A"), AcquireResult::Acquired);
        assert_eq!(manager.acquire("f.ts", "S_B"), AcquireResult::Contended);
        manager.release("f.ts", "S_A");
        assert_eq!(manager.acquire("f.ts", "S_B"), AcquireResult::Acquired);
    }

    #[test]
    fn release_is_a_no_op_for_non_holder() {
        let manager = LockManager::new();
        manager.acquire("f.ts", "S_A");
        manager.release("f.ts", "S_B");
        assert_eq!(manager.acquire("f.ts", "S_B"), AcquireResult::Contended);
    }

    #[test]
    fn paths_normalize_case_and_separators() {
        let manager = LockManager::new();
        manager.acquire("SRC\\Foo.ts", "S_A");
        assert_eq!(manager.acquire("src/foo.ts", "S_B"), AcquireResult::Contended);
    }

    #[test]
    fn register_read_then_matching_write_validates_ok() {
        let manager = LockManager::new();
        manager.register_read("f.ts", "S_A", "");
        assert_eq!(manager.validate_write("f.ts", "S_A", ""), ValidateResult::Ok);
    }

    #[test]
    fn write_without_prior_read_is_rejected() {
        let manager = LockManager::new();
        assert_eq!(
            manager.validate_write("f.ts", "S_A", ""),
            ValidateResult::NoPriorRead
        );
    }

    #[test]
    fn stale_snapshot_is_detected_on_validate() {
        let manager = LockManager::new();
        manager.register_read("f.ts", "S_A", "old content");
        let result = manager.validate_write("f.ts", "S_A", "new content");
        assert!(matches!(result, ValidateResult::Stale(_)));
    }

    #[test]
    fn queue_write_assigns_fifo_positions() {
        let manager = LockManager::new();
        manager.acquire("f.ts", "S_A");
        let first = manager.queue_write("f.ts", "S_B");
        let second = manager.queue_write("f.ts", "S_C");
        assert_eq!(first.position, 0);
        assert_eq!(second.position, 1);
    }

    #[tokio::test]
    async fn release_wakes_the_queue_head_only() {
        let manager = LockManager::new();
        manager.acquire("f.ts", "S_A");
        let mut first = manager.queue_write("f.ts", "S_B");
        let mut second = manager.queue_write("f.ts", "S_C");
        manager.release("f.ts", "S_A");
        assert!(first.woken.try_recv().is_ok());
        assert!(second.woken.try_recv().is_err());
    }

    #[test]
    fn reap_force_releases_locks_older_than_sixty_seconds() {
        let manager = LockManager::new();
        manager.acquire("f.ts", "S_A");
        {
            let mut inner = manager.inner.lock();
            if let Some(holder) = inner.locks.get_mut("f.ts") {
                holder.acquired_at = Instant::now() - Duration::from_secs(61);
            }
        }
        manager.reap();
        assert_eq!(manager.acquire("f.ts", "S_B"), AcquireResult::Acquired);
    }
}
