// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! A FIFO queue bridging imperative producers into the [`AsyncStream`] contract.

use alloc::collections::VecDeque;
use async_trait::async_trait;
use futures::channel::oneshot;
use sluice_core::sluice_mutex::Mutex;
use sluice_core::{AsyncStream, Outcome, Result, SluiceError, Step};
use std::sync::{Arc, Weak};

type Teardown = Box<dyn FnOnce() + Send>;
type Pull<T> = oneshot::Sender<Step<T, ()>>;

#[derive(Debug)]
enum Status {
    Active,
    /// Errored, but the error has not reached a consumer yet
    Failed(SluiceError),
    Done,
}

struct QueueState<T> {
    buffer: VecDeque<T>,
    pulls: VecDeque<Pull<T>>,
    max_size: Option<usize>,
    status: Status,
    teardown: Vec<Teardown>,
}

impl<T> QueueState<T> {
    /// Leave `Active`, resolving every pending pull with `step`.
    ///
    /// Returns the teardown hooks to run once the lock is released.
    fn finish(&mut self, status: Status, step: impl Fn() -> Step<T, ()>) -> Vec<Teardown> {
        self.status = status;
        self.buffer.clear();
        for pull in self.pulls.drain(..) {
            let _ = pull.send(step());
        }
        core::mem::take(&mut self.teardown)
    }
}

impl<T> Drop for QueueState<T> {
    fn drop(&mut self) {
        // Every handle is gone; producers still need to detach
        for hook in self.teardown.drain(..) {
            hook();
        }
    }
}

fn run(hooks: Vec<Teardown>) {
    for hook in hooks {
        hook();
    }
}

/// Bounded FIFO queue exposing the [`AsyncStream`] contract.
///
/// Producers call [`add`](Self::add) from anywhere (event callbacks, other tasks);
/// the consumer pulls with `advance`. A value added while a pull is waiting goes
/// straight to that pull, so the buffer and the pending pulls are never both
/// non-empty.
///
/// # Overflow
///
/// If buffering a value would exceed `max_size`, the value is dropped together with
/// the buffer, the queue becomes terminal, and the [`SluiceError::Capacity`] error is
/// returned from that `add` call *and* handed to the consumer's next pull (once).
///
/// ```
/// use sluice_core::{AsyncStream, Outcome};
/// use sluice_stream::AsyncQueue;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut queue = AsyncQueue::with_max_size(2);
/// queue.add(1).unwrap();
/// queue.add(2).unwrap();
/// assert!(queue.add(3).unwrap_err().is_capacity());
///
/// assert!(queue.advance(()).await.unwrap_err().is_capacity());
/// assert_eq!(queue.advance(()).await.unwrap(), Outcome::Finished(()));
/// # }
/// ```
pub struct AsyncQueue<T> {
    shared: Arc<Mutex<QueueState<T>>>,
}

impl<T> Clone for AsyncQueue<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T: Send + 'static> AsyncQueue<T> {
    /// An unbounded queue.
    pub fn new() -> Self {
        Self::bounded(None)
    }

    /// A queue holding at most `max_size` undelivered values.
    pub fn with_max_size(max_size: usize) -> Self {
        Self::bounded(Some(max_size))
    }

    pub fn bounded(max_size: Option<usize>) -> Self {
        Self {
            shared: Arc::new(Mutex::new(QueueState {
                buffer: VecDeque::new(),
                pulls: VecDeque::new(),
                max_size,
                status: Status::Active,
                teardown: Vec::new(),
            })),
        }
    }

    /// Enqueue `value` for delivery. A no-op once the queue is terminal.
    ///
    /// # Errors
    /// Returns [`SluiceError::Capacity`] if buffering `value` would exceed `max_size`;
    /// the queue is terminal afterwards.
    pub fn add(&self, value: T) -> Result<()> {
        let mut state = self.shared.lock();
        if !matches!(state.status, Status::Active) {
            return Ok(());
        }

        let mut value = value;
        while let Some(pull) = state.pulls.pop_front() {
            match pull.send(Ok(Outcome::Yielded(value))) {
                Ok(()) => return Ok(()),
                // The puller went away; try the next one
                Err(Ok(Outcome::Yielded(returned))) => value = returned,
                Err(_) => return Ok(()),
            }
        }

        let max_size = state.max_size;
        match max_size {
            Some(limit) if state.buffer.len() >= limit => {
                let error = SluiceError::capacity(limit);
                sluice_core::warn!("{}", error);
                let hooks = state.finish(Status::Failed(error.clone()), || Err(error.clone()));
                drop(state);
                run(hooks);
                Err(error)
            }
            _ => {
                state.buffer.push_back(value);
                Ok(())
            }
        }
    }

    /// Register `hook` to run once when the queue becomes terminal.
    ///
    /// Producer adapters use this to detach from their source. If the queue is already
    /// terminal the hook runs immediately.
    pub fn on_teardown(&self, hook: impl FnOnce() + Send + 'static) {
        let mut state = self.shared.lock();
        if matches!(state.status, Status::Active) {
            state.teardown.push(Box::new(hook));
        } else {
            drop(state);
            hook();
        }
    }

    /// Close the queue without an error; pending pulls finish, buffered values are lost.
    pub fn close(&self) {
        let hooks = {
            let mut state = self.shared.lock();
            if matches!(state.status, Status::Done) {
                return;
            }
            state.finish(Status::Done, || Ok(Outcome::Finished(())))
        };
        run(hooks);
    }

    /// Fail the queue with `reason`.
    ///
    /// Returns `false` if the queue already reached `Done`.
    pub fn fail(&self, reason: SluiceError) -> bool {
        let hooks = {
            let mut state = self.shared.lock();
            if matches!(state.status, Status::Done) {
                return false;
            }
            state.finish(Status::Done, || Err(reason.clone()))
        };
        run(hooks);
        true
    }

    /// A weak handle for producers, so a listener does not keep the queue alive.
    pub fn downgrade(&self) -> WeakAsyncQueue<T> {
        WeakAsyncQueue {
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Number of buffered, undelivered values.
    pub fn len(&self) -> usize {
        self.shared.lock().buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` once the queue is terminal.
    pub fn is_done(&self) -> bool {
        !matches!(self.shared.lock().status, Status::Active)
    }

    pub fn max_size(&self) -> Option<usize> {
        self.shared.lock().max_size
    }
}

impl<T: Send + 'static> Default for AsyncQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> core::fmt::Debug for AsyncQueue<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let state = self.shared.lock();
        f.debug_struct("AsyncQueue")
            .field("buffered", &state.buffer.len())
            .field("pending_pulls", &state.pulls.len())
            .field("max_size", &state.max_size)
            .field("status", &state.status)
            .finish()
    }
}

#[async_trait]
impl<T: Send + 'static> AsyncStream for AsyncQueue<T> {
    type Item = T;
    type Return = ();
    type Next = ();

    async fn advance(&mut self, _next: ()) -> Step<T, ()> {
        let pull = {
            let mut state = self.shared.lock();
            match core::mem::replace(&mut state.status, Status::Done) {
                Status::Done => return Ok(Outcome::Finished(())),
                Status::Failed(error) => return Err(error),
                Status::Active => state.status = Status::Active,
            }

            if let Some(value) = state.buffer.pop_front() {
                return Ok(Outcome::Yielded(value));
            }

            let (pull, receiver) = oneshot::channel();
            state.pulls.push_back(pull);
            receiver
        };

        match pull.await {
            Ok(step) => step,
            Err(oneshot::Canceled) => Ok(Outcome::Finished(())),
        }
    }

    async fn terminate_with_error(&mut self, reason: SluiceError) -> Step<T, ()> {
        if self.fail(reason.clone()) {
            Err(reason)
        } else {
            Ok(Outcome::Finished(()))
        }
    }

    async fn terminate_gracefully(&mut self) -> Step<T, ()> {
        self.close();
        Ok(Outcome::Finished(()))
    }
}

/// Weak counterpart of [`AsyncQueue`] for producer callbacks.
pub struct WeakAsyncQueue<T> {
    shared: Weak<Mutex<QueueState<T>>>,
}

impl<T> Clone for WeakAsyncQueue<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T: Send + 'static> WeakAsyncQueue<T> {
    pub fn upgrade(&self) -> Option<AsyncQueue<T>> {
        self.shared.upgrade().map(|shared| AsyncQueue { shared })
    }

    /// [`AsyncQueue::add`] if the queue is still alive; a dropped queue counts as
    /// terminal.
    ///
    /// # Errors
    /// Returns [`SluiceError::Capacity`] on overflow.
    pub fn add(&self, value: T) -> Result<()> {
        match self.upgrade() {
            Some(queue) => queue.add(value),
            None => Ok(()),
        }
    }
}

impl<T> core::fmt::Debug for WeakAsyncQueue<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WeakAsyncQueue")
            .field("alive", &(self.shared.strong_count() > 0))
            .finish()
    }
}
