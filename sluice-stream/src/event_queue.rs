// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Adapting listener-based event sources into an [`AsyncQueue`].

use crate::AsyncQueue;
use sluice_core::sluice_mutex::Mutex;
use sluice_core::Result;
use std::sync::Arc;

/// Identifies a registered listener so it can be removed again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerKey(u64);

/// Callback registered with an [`EventSource`].
///
/// Returning an error lets the dispatching call site see a queue overflow.
pub type Listener<E> = Box<dyn Fn(E) -> Result<()> + Send + Sync>;

/// A push-based source of events.
pub trait EventSource<E>: Send + Sync {
    fn add_listener(&self, listener: Listener<E>) -> ListenerKey;

    /// Returns `false` if `key` was not registered.
    fn remove_listener(&self, key: ListenerKey) -> bool;
}

/// Feed an [`AsyncQueue`] from `source`.
///
/// The listener holds only a weak queue handle and is removed when the queue is torn
/// down: graceful close, injected error, overflow or subscription cancellation alike.
///
/// ```
/// use sluice_core::{AsyncStream, Outcome};
/// use sluice_stream::{event_queue, EventEmitter};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let clicks = EventEmitter::new();
/// let mut queue = event_queue(clicks.clone(), None);
///
/// clicks.emit("click").unwrap();
/// assert_eq!(queue.advance(()).await.unwrap(), Outcome::Yielded("click"));
///
/// queue.terminate_gracefully().await.unwrap();
/// assert_eq!(clicks.listener_count(), 0);
/// # }
/// ```
pub fn event_queue<E, S>(source: S, max_size: Option<usize>) -> AsyncQueue<E>
where
    E: Send + 'static,
    S: EventSource<E> + 'static,
{
    let queue = AsyncQueue::bounded(max_size);
    let producer = queue.downgrade();
    let key = source.add_listener(Box::new(move |event| producer.add(event)));

    queue.on_teardown(move || {
        sluice_core::trace!("event queue torn down, removing listener {:?}", key);
        source.remove_listener(key);
    });
    queue
}

struct EmitterState<E> {
    next_key: u64,
    listeners: Vec<(ListenerKey, Arc<Listener<E>>)>,
}

/// In-process [`EventSource`] that dispatches each emitted event to every listener.
pub struct EventEmitter<E> {
    state: Arc<Mutex<EmitterState<E>>>,
}

impl<E> Clone for EventEmitter<E> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<E: Clone> EventEmitter<E> {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(EmitterState {
                next_key: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Dispatch `event` to every listener registered at the time of the call.
    ///
    /// # Errors
    /// Returns the first listener error; the remaining listeners still receive the
    /// event.
    pub fn emit(&self, event: E) -> Result<()> {
        // Listeners may detach while being called, so they run outside the lock
        let listeners: Vec<_> = self
            .state
            .lock()
            .listeners
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();

        let mut first_error = None;
        for listener in listeners {
            if let Err(error) = (**listener)(event.clone()) {
                first_error.get_or_insert(error);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    pub fn listener_count(&self) -> usize {
        self.state.lock().listeners.len()
    }
}

impl<E: Clone> Default for EventEmitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> core::fmt::Debug for EventEmitter<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("listeners", &self.state.lock().listeners.len())
            .finish()
    }
}

impl<E: Send + 'static> EventSource<E> for EventEmitter<E> {
    fn add_listener(&self, listener: Listener<E>) -> ListenerKey {
        let mut state = self.state.lock();
        let key = ListenerKey(state.next_key);
        state.next_key += 1;
        state.listeners.push((key, Arc::new(listener)));
        key
    }

    fn remove_listener(&self, key: ListenerKey) -> bool {
        let mut state = self.state.lock();
        let before = state.listeners.len();
        state.listeners.retain(|(registered, _)| *registered != key);
        state.listeners.len() != before
    }
}
