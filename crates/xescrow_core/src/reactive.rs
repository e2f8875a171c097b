//! Reactive signal graph
//!
//! A push-based signal store for page-view state:
//! - Signals hold type-erased values
//! - Subscribers are typed callbacks notified after each change
//!
//! Writes are split in two steps. [`ReactiveGraph::write`] stores the value and
//! hands back the [`Pending`] notifications; the caller drops the graph lock
//! before running them, so a subscriber may read the graph again.
//!
//! # State
//!
//! [`State<T>`] binds a signal to a shared graph and is what components hold.
//!
//! ```
//! use std::sync::{Arc, Mutex};
//! use xescrow_core::reactive::{ReactiveGraph, State};
//!
//! let graph = Arc::new(Mutex::new(ReactiveGraph::new()));
//! let open: State<bool> = State::create(&graph, false);
//!
//! open.update_rebuild(|v| !v);
//! assert!(open.get());
//! assert!(open.take_dirty());
//! ```

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

new_key_type! {
    /// Unique identifier for a signal
    pub struct SignalId;
    /// Unique identifier for a subscriber callback
    pub struct SubscriberId;
}

/// A reactive signal handle (cheap to copy)
#[derive(Debug)]
pub struct Signal<T> {
    id: SignalId,
    _marker: std::marker::PhantomData<T>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Signal<T> {}

type AnyValue = dyn Any + Send;
type SubscriberFn = Arc<Mutex<dyn FnMut(&AnyValue) + Send>>;

struct SignalNode {
    value: Box<AnyValue>,
    subscribers: SmallVec<[SubscriberId; 4]>,
}

struct SubscriberNode {
    signal: SignalId,
    run: SubscriberFn,
}

/// Notifications owed after a write, run once the graph is released
#[must_use = "subscribers are only notified when `notify` is called"]
pub struct Pending {
    subscribers: SmallVec<[SubscriberFn; 4]>,
}

impl Pending {
    /// Run every subscriber with the value that was written
    pub fn notify(self, value: &AnyValue) {
        for run in self.subscribers {
            let mut run = run.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            (*run)(value);
        }
    }
}

/// Owns every signal of a page view and the callbacks observing them
pub struct ReactiveGraph {
    signals: SlotMap<SignalId, SignalNode>,
    subscribers: SlotMap<SubscriberId, SubscriberNode>,
}

impl ReactiveGraph {
    pub fn new() -> Self {
        Self {
            signals: SlotMap::with_key(),
            subscribers: SlotMap::with_key(),
        }
    }

    /// Create a new signal with an initial value
    pub fn create_signal<T: Send + 'static>(&mut self, initial: T) -> Signal<T> {
        let id = self.signals.insert(SignalNode {
            value: Box::new(initial),
            subscribers: SmallVec::new(),
        });
        Signal {
            id,
            _marker: std::marker::PhantomData,
        }
    }

    /// Get the current value of a signal
    pub fn get<T: Clone + 'static>(&self, signal: Signal<T>) -> Option<T> {
        self.signals
            .get(signal.id)
            .and_then(|node| node.value.downcast_ref::<T>().cloned())
    }

    /// Store a new value and collect the subscribers to notify
    pub fn write<T: Send + 'static>(&mut self, signal: Signal<T>, value: T) -> Pending {
        let Some(node) = self.signals.get_mut(signal.id) else {
            return Pending {
                subscribers: SmallVec::new(),
            };
        };
        node.value = Box::new(value);

        let subscribers = node
            .subscribers
            .iter()
            .filter_map(|id| self.subscribers.get(*id))
            .map(|sub| Arc::clone(&sub.run))
            .collect();
        Pending { subscribers }
    }

    /// Register a callback invoked with the new value after every write
    pub fn subscribe<T, F>(&mut self, signal: Signal<T>, mut callback: F) -> Option<SubscriberId>
    where
        T: 'static,
        F: FnMut(&T) + Send + 'static,
    {
        if !self.signals.contains_key(signal.id) {
            return None;
        }

        let run: SubscriberFn = Arc::new(Mutex::new(move |value: &AnyValue| {
            if let Some(v) = value.downcast_ref::<T>() {
                callback(v);
            }
        }));
        let id = self.subscribers.insert(SubscriberNode {
            signal: signal.id,
            run,
        });
        if let Some(node) = self.signals.get_mut(signal.id) {
            node.subscribers.push(id);
        }
        Some(id)
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) {
        if let Some(sub) = self.subscribers.remove(id) {
            if let Some(node) = self.signals.get_mut(sub.signal) {
                node.subscribers.retain(|s| *s != id);
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl Default for ReactiveGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared reactive graph for thread-safe access
pub type SharedReactiveGraph = Arc<Mutex<ReactiveGraph>>;

/// Shared flag a host polls to know the view needs re-rendering
pub type DirtyFlag = Arc<AtomicBool>;

fn lock(graph: &Mutex<ReactiveGraph>) -> MutexGuard<'_, ReactiveGraph> {
    graph.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A bound state value with direct get/set methods
#[derive(Clone)]
pub struct State<T> {
    signal: Signal<T>,
    reactive: SharedReactiveGraph,
    dirty_flag: DirtyFlag,
}

impl<T: Clone + Send + 'static> State<T> {
    /// Create a fresh signal in `reactive` and bind it
    pub fn create(reactive: &SharedReactiveGraph, initial: T) -> Self {
        let signal = lock(reactive).create_signal(initial);
        Self {
            signal,
            reactive: Arc::clone(reactive),
            dirty_flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get the current value
    pub fn get(&self) -> T
    where
        T: Default,
    {
        self.try_get().unwrap_or_default()
    }

    /// Get the current value, returning None if the signal is gone
    pub fn try_get(&self) -> Option<T> {
        lock(&self.reactive).get(self.signal)
    }

    /// Set a new value AND mark the view for re-render
    ///
    /// Subscribers run after the graph lock is released.
    pub fn set_rebuild(&self, value: T) {
        let pending = lock(&self.reactive).write(self.signal, value.clone());
        self.dirty_flag.store(true, Ordering::SeqCst);
        pending.notify(&value);
    }

    pub fn update_rebuild(&self, f: impl FnOnce(T) -> T) {
        let Some(current) = self.try_get() else {
            return;
        };
        self.set_rebuild(f(current));
    }

    /// Observe changes; the subscription ends when the returned guard drops
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(&T) + Send + 'static,
    {
        let id = lock(&self.reactive).subscribe(self.signal, callback);
        Subscription {
            graph: Arc::downgrade(&self.reactive),
            id,
        }
    }

    /// Check and clear the dirty flag
    pub fn take_dirty(&self) -> bool {
        self.dirty_flag.swap(false, Ordering::AcqRel)
    }
}

/// Scoped subscription to a [`State`]
///
/// Unsubscribes on drop, so a callback never outlives the component that
/// registered it.
pub struct Subscription {
    graph: Weak<Mutex<ReactiveGraph>>,
    id: Option<SubscriberId>,
}

impl Subscription {
    /// Whether the subscription is still registered
    pub fn is_active(&self) -> bool {
        self.id.is_some() && self.graph.strong_count() > 0
    }

    /// End the subscription early
    pub fn cancel(&mut self) {
        if let Some(id) = self.id.take() {
            if let Some(graph) = self.graph.upgrade() {
                lock(&graph).unsubscribe(id);
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_create_get_write() {
        let mut graph = ReactiveGraph::new();

        let count = graph.create_signal(0i32);
        assert_eq!(graph.get(count), Some(0));

        graph.write(count, 42).notify(&42);
        assert_eq!(graph.get(count), Some(42));
    }

    #[test]
    fn test_write_defers_notification() {
        let mut graph = ReactiveGraph::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let count = graph.create_signal(0i32);
        let seen_clone = seen.clone();
        graph.subscribe(count, move |v: &i32| seen_clone.lock().unwrap().push(*v));

        let pending = graph.write(count, 1);
        assert!(seen.lock().unwrap().is_empty());
        pending.notify(&1);
        assert_eq!(*seen.lock().unwrap(), vec![1]);
    }

    #[test]
    fn test_unsubscribe() {
        let mut graph = ReactiveGraph::new();
        let runs = Arc::new(Mutex::new(0));

        let count = graph.create_signal(0i32);
        let runs_clone = runs.clone();
        let id = graph
            .subscribe(count, move |_: &i32| *runs_clone.lock().unwrap() += 1)
            .unwrap();

        graph.write(count, 1).notify(&1);
        graph.unsubscribe(id);
        graph.write(count, 2).notify(&2);
        assert_eq!(*runs.lock().unwrap(), 1);
        assert_eq!(graph.subscriber_count(), 0);
    }

    #[test]
    fn test_state_subscription_scoped() {
        let graph: SharedReactiveGraph = Arc::new(Mutex::new(ReactiveGraph::new()));
        let state = State::create(&graph, 0u32);
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = seen.clone();
        let sub = state.subscribe(move |v| seen_clone.lock().unwrap().push(*v));
        assert!(sub.is_active());

        state.set_rebuild(5);
        drop(sub);
        state.set_rebuild(6);

        assert_eq!(*seen.lock().unwrap(), vec![5]);
        assert_eq!(state.get(), 6);
        assert_eq!(lock(&graph).subscriber_count(), 0);
    }

    #[test]
    fn test_subscriber_may_read_state() {
        let graph: SharedReactiveGraph = Arc::new(Mutex::new(ReactiveGraph::new()));
        let state = State::create(&graph, 1u32);
        let seen = Arc::new(Mutex::new(None));

        let reader = state.clone();
        let seen_clone = seen.clone();
        let _sub = state.subscribe(move |_| {
            *seen_clone.lock().unwrap() = Some(reader.get());
        });

        state.update_rebuild(|v| v + 1);
        assert_eq!(*seen.lock().unwrap(), Some(2));
    }

    #[test]
    fn test_state_dirty_flag() {
        let graph: SharedReactiveGraph = Arc::new(Mutex::new(ReactiveGraph::new()));
        let state = State::create(&graph, false);
        assert!(!state.take_dirty());

        state.set_rebuild(true);
        assert!(state.take_dirty());
        assert!(!state.take_dirty());
    }
}
