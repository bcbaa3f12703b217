//! A small subscribe/notify value store.
//!
//! Subscribing returns a [`Subscription`] handle that unsubscribes on drop.
//! Setting the value is idempotent: a write equal to the current value
//! notifies nobody.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

type Listener<T> = Box<dyn Fn(&T) + Send + Sync>;

struct Inner<T> {
    value: Mutex<T>,
    listeners: Mutex<HashMap<u64, Listener<T>>>,
    next_id: AtomicU64,
}

pub struct Observable<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Observable { inner: Arc::clone(&self.inner) }
    }
}

impl<T: Clone + PartialEq + Send + Sync> Observable<T> {
    pub fn new(initial: T) -> Self {
        Observable {
            inner: Arc::new(Inner {
                value: Mutex::new(initial),
                listeners: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    pub fn get(&self) -> T {
        self.inner.value.lock().clone()
    }

    /// Replace the value and notify listeners. No-op when unchanged.
    pub fn set(&self, value: T) {
        {
            let mut current = self.inner.value.lock();
            if *current == value {
                return;
            }
            *current = value.clone();
        }
        for listener in self.inner.listeners.lock().values() {
            listener(&value);
        }
    }

    /// Register a listener. Dropping the returned handle unsubscribes.
    pub fn subscribe<F>(&self, listener: F) -> Subscription<T>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.listeners.lock().insert(id, Box::new(listener));
        Subscription {
            inner: Arc::downgrade(&self.inner),
            id,
        }
    }

    #[cfg(test)]
    fn listener_count(&self) -> usize {
        self.inner.listeners.lock().len()
    }
}

pub struct Subscription<T> {
    inner: Weak<Inner<T>>,
    id: u64,
}

impl<T> Subscription<T> {
    pub fn unsubscribe(self) {}
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.listeners.lock().remove(&self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn notifies_on_change_only() {
        let observable = Observable::new(0u32);
        let calls = Arc::new(AtomicUsize::new(0));

        let calls_seen = calls.clone();
        let _sub = observable.subscribe(move |_| {
            calls_seen.fetch_add(1, Ordering::SeqCst);
        });

        observable.set(1);
        observable.set(1); // unchanged, must not notify
        observable.set(2);

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(observable.get(), 2);
    }

    #[test]
    fn drop_unsubscribes() {
        let observable = Observable::new(0u32);
        let sub = observable.subscribe(|_| {});
        assert_eq!(observable.listener_count(), 1);
        drop(sub);
        assert_eq!(observable.listener_count(), 0);
    }

    #[test]
    fn explicit_unsubscribe() {
        let observable = Observable::new(0u32);
        let sub = observable.subscribe(|_| {});
        sub.unsubscribe();
        assert_eq!(observable.listener_count(), 0);
    }
}
