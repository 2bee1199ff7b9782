//! Observable state holder
//!
//! A `StateChannel<T>` owns one value and notifies observers whenever it
//! changes. Observers either register a callback (`subscribe`) or take a
//! broadcast receiver (`watch`) for async consumption. Only the owner of
//! the channel writes to it; everyone else reads or observes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;
use uuid::Uuid;

type Callback<T> = Box<dyn Fn(&T) + Send + Sync>;

pub struct StateChannel<T: Clone + Send + Sync + 'static> {
    name: String,
    value: Mutex<T>,
    version: AtomicU64,
    subscribers: Mutex<HashMap<Uuid, Callback<T>>>,
    update_tx: broadcast::Sender<T>,
}

impl<T: Clone + Send + Sync + 'static> StateChannel<T> {
    pub fn new(name: &str, initial_value: T) -> Self {
        let (update_tx, _) = broadcast::channel(32);
        Self {
            name: name.to_string(),
            value: Mutex::new(initial_value),
            version: AtomicU64::new(1),
            subscribers: Mutex::new(HashMap::new()),
            update_tx,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Starts at 1 and increases by one per update.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    /// Current value.
    pub fn get(&self) -> T {
        lock(&self.value).clone()
    }

    /// Replace the value and notify observers.
    pub fn update(&self, new_value: T) {
        {
            let mut guard = lock(&self.value);
            *guard = new_value.clone();
        }
        self.publish(new_value);
    }

    /// Edit the value in place and notify observers with the result.
    /// The edit happens under the value lock, so concurrent writers of
    /// disjoint fields never lose each other's changes.
    pub fn modify<F>(&self, edit: F) -> T
    where
        F: FnOnce(&mut T),
    {
        let updated = {
            let mut guard = lock(&self.value);
            edit(&mut guard);
            guard.clone()
        };
        self.publish(updated.clone());
        updated
    }

    /// Register a callback run after every update. Callbacks must not
    /// subscribe or unsubscribe on the same channel.
    pub fn subscribe(&self, callback: Box<dyn Fn(&T) + Send + Sync>) -> Uuid {
        let id = Uuid::new_v4();
        lock(&self.subscribers).insert(id, callback);
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&self, id: Uuid) -> bool {
        lock(&self.subscribers).remove(&id).is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.subscribers).len()
    }

    /// Receiver for every update published after this call.
    pub fn watch(&self) -> broadcast::Receiver<T> {
        self.update_tx.subscribe()
    }

    fn publish(&self, value: T) {
        self.version.fetch_add(1, Ordering::SeqCst);
        // No receivers is fine.
        let _ = self.update_tx.send(value.clone());
        for callback in lock(&self.subscribers).values() {
            callback(&value);
        }
    }
}

// Poisoned locks are recovered rather than propagated.
pub(crate) fn lock<V>(mutex: &Mutex<V>) -> MutexGuard<'_, V> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
