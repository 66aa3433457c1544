//! Per-key serialization of read-modify-write sequences.
//!
//! The store's own operations are individually atomic, but "read the list,
//! change it, write it back" is not. Callers that mutate one respondent's
//! artifacts take that respondent's lock for the whole sequence so two
//! sessions under the same identifier in this process cannot lose each
//! other's updates. Nothing is coordinated across processes.

use std::sync::{Arc, Mutex, PoisonError};

use dashmap::DashMap;

#[derive(Debug, Default)]
pub struct KeyLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl KeyLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the lock for `key`.
    ///
    /// A lock poisoned by a panicking holder is taken over: the guarded data
    /// is `()`, so there is no state to be left inconsistent. The entry for
    /// `key` is evicted once no caller holds or waits on it.
    pub fn with_lock<R>(&self, key: &str, f: impl FnOnce() -> R) -> R {
        let lock = self.handle(key);
        let result = {
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            f()
        };
        drop(lock);
        // Handles are cloned under the shard lock, so a count of one here
        // means only the map refers to this mutex.
        self.locks.remove_if(key, |_, held| Arc::strong_count(held) == 1);
        result
    }

    /// Number of keys currently locked or waited on.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }

    fn handle(&self, key: &str) -> Arc<Mutex<()>> {
        if let Some(existing) = self.locks.get(key) {
            return Arc::clone(existing.value());
        }
        Arc::clone(
            self.locks
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .value(),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use super::*;

    #[test]
    fn same_key_is_serialized() {
        let locks = Arc::new(KeyLocks::new());
        let inside = Arc::new(AtomicUsize::new(0));
        let max_inside = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let locks = Arc::clone(&locks);
                let inside = Arc::clone(&inside);
                let max_inside = Arc::clone(&max_inside);
                thread::spawn(move || {
                    locks.with_lock("respondent", || {
                        let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                        max_inside.fetch_max(now, Ordering::SeqCst);
                        thread::yield_now();
                        inside.fetch_sub(1, Ordering::SeqCst);
                    });
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("thread");
        }

        assert_eq!(max_inside.load(Ordering::SeqCst), 1);
        assert!(locks.is_empty());
    }

    #[test]
    fn returns_closure_value() {
        let locks = KeyLocks::new();
        assert_eq!(locks.with_lock("a", || 7), 7);
    }

    #[test]
    fn idle_entries_are_evicted() {
        let locks = KeyLocks::new();
        for i in 0..100 {
            locks.with_lock(&format!("respondent-{i}"), || ());
        }
        assert!(locks.is_empty());
    }

    #[test]
    fn entry_is_kept_while_held() {
        let locks = KeyLocks::new();
        locks.with_lock("outer", || {
            assert_eq!(locks.len(), 1);
            locks.with_lock("inner", || assert_eq!(locks.len(), 2));
            assert_eq!(locks.len(), 1);
        });
        assert!(locks.is_empty());
    }
}
