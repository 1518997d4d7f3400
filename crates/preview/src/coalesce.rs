//! Per-key single flight, so concurrent resolutions of one URL fetch once.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError, Weak};
use tokio::sync::OnceCell;

/// A lazily populated map of in-flight computations, one per key.
///
/// The first caller for a key runs its future; everyone arriving while that
/// future is pending waits for it and receives a clone of the same value,
/// whatever it is. The map only holds weak references, so a key's slot lives
/// exactly as long as someone is running or waiting on it, and a later call
/// starts afresh. Dead entries are pruned whenever a new slot is taken.
///
/// If the running caller is cancelled, one of the waiters runs its own future
/// instead.
pub(crate) struct SingleFlight<K, V> {
    slots: Mutex<HashMap<K, Weak<OnceCell<V>>>>,
}
impl<K: Eq + Hash + Clone, V: Clone> SingleFlight<K, V> {
    pub(crate) fn new() -> Self {
        Self { slots: Mutex::new(HashMap::new()) }
    }

    pub(crate) async fn run<F, Fut>(&self, key: &K, f: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
    {
        let slot = self.slot(key);
        slot.get_or_init(f).await.clone()
    }

    fn slot(&self, key: &K) -> Arc<OnceCell<V>> {
        // Poisoning can only come from a panic while pruning; the map is still usable.
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.retain(|_, slot| slot.strong_count() > 0);
        match slots.get(key).and_then(Weak::upgrade) {
            Some(slot) => slot,
            None => {
                let slot = Arc::new(OnceCell::new());
                slots.insert(key.clone(), Arc::downgrade(&slot));
                slot
            },
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
