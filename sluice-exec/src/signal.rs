// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Single-fire confirm/cancel gate and the tasks driven by it.

use crate::scheduler::delay;
use crate::task::{spawn_task, TaskHandle};
use core::future::Future;
use core::time::Duration;
use event_listener::Event;
use futures::future;
use futures::FutureExt;
use sluice_core::sluice_mutex::Mutex;
use sluice_core::{CancellationToken, Result, SluiceError};
use sluice_runtime::spawn_detached;
use std::sync::{Arc, Weak};

pub(crate) const SIGNAL_CANCELLED: &str = "Signal was cancelled.";
pub(crate) const SIGNALTASK_CANCELLED: &str = "Signaltask was cancelled.";

#[derive(Debug)]
enum SignalState<T> {
    Pending,
    Confirmed(T),
    Cancelled(SluiceError),
}

#[derive(Debug)]
struct SignalInner<T> {
    state: Mutex<SignalState<T>>,
    event: Event,
}

impl<T: Clone> SignalInner<T> {
    fn settle(&self, next: SignalState<T>) -> bool {
        {
            let mut state = self.state.lock();
            if !matches!(*state, SignalState::Pending) {
                return false;
            }
            *state = next;
        }
        self.event.notify(usize::MAX);
        true
    }

    fn settled(&self) -> Option<Result<T>> {
        match &*self.state.lock() {
            SignalState::Pending => None,
            SignalState::Confirmed(value) => Some(Ok(value.clone())),
            SignalState::Cancelled(reason) => Some(Err(reason.clone())),
        }
    }
}

// Wakes a `linked` watcher so it exits once the last handle is gone
impl<T> Drop for SignalInner<T> {
    fn drop(&mut self) {
        self.event.notify(usize::MAX);
    }
}

/// A gate that is either confirmed with a value or cancelled with a reason, once.
///
/// Both transitions are safe to call repeatedly and from several places; the
/// first one wins. Any number of dependents can await [`completion`](Self::completion).
///
/// ```
/// use sluice_exec::Signal;
///
/// # #[tokio::main]
/// # async fn main() {
/// let signal = Signal::new();
/// let waiter = signal.completion();
///
/// assert!(signal.confirm("go"));
/// assert!(!signal.cancel());
///
/// assert_eq!(waiter.await.unwrap(), "go");
/// # }
/// ```
#[derive(Debug)]
pub struct Signal<T> {
    inner: Arc<SignalInner<T>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone + Send + 'static> Signal<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SignalInner {
                state: Mutex::new(SignalState::Pending),
                event: Event::new(),
            }),
        }
    }

    /// A signal that cancels itself with the default reason when `abort` fires.
    ///
    /// The watcher stops once the signal settles or its last handle is dropped.
    pub fn linked(abort: &CancellationToken) -> Self {
        let signal = Self::new();
        if abort.is_cancelled() {
            signal.cancel();
            return signal;
        }

        let weak: Weak<SignalInner<T>> = Arc::downgrade(&signal.inner);
        let settled = signal.inner.event.listen();
        let abort = abort.clone();
        spawn_detached(async move {
            let aborted = Box::pin(abort.cancelled_owned());
            if let future::Either::Left(_) = future::select(aborted, settled).await {
                if let Some(inner) = weak.upgrade() {
                    inner.settle(SignalState::Cancelled(SluiceError::cancelled(
                        SIGNAL_CANCELLED,
                    )));
                }
            }
        });
        signal
    }

    /// Settle with `value`. Returns `true` if this call won.
    pub fn confirm(&self, value: T) -> bool {
        self.inner.settle(SignalState::Confirmed(value))
    }

    /// Cancel with `"Signal was cancelled."`. Returns `true` if this call won.
    pub fn cancel(&self) -> bool {
        self.cancel_with(SluiceError::cancelled(SIGNAL_CANCELLED))
    }

    /// Cancel with `reason`. Returns `true` if this call won.
    pub fn cancel_with(&self, reason: SluiceError) -> bool {
        self.inner.settle(SignalState::Cancelled(reason))
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(*self.inner.state.lock(), SignalState::Confirmed(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(*self.inner.state.lock(), SignalState::Cancelled(_))
    }

    pub fn is_settled(&self) -> bool {
        !matches!(*self.inner.state.lock(), SignalState::Pending)
    }

    /// Resolves with the confirmed value or rejects with the cancellation reason.
    pub fn completion(&self) -> impl Future<Output = Result<T>> + Send + 'static {
        let inner = self.inner.clone();
        async move {
            loop {
                if let Some(result) = inner.settled() {
                    return result;
                }
                let listener = inner.event.listen();
                // Settlement may have happened before the listener was registered
                if let Some(result) = inner.settled() {
                    return result;
                }
                listener.await;
            }
        }
    }

    /// Cancel this signal with [`SluiceError::Timeout`] unless it settles within
    /// `after`.
    ///
    /// The returned handle can be cancelled to disarm the timeout; firing after the
    /// signal already settled changes nothing.
    pub fn cancel_after(&self, after: Duration) -> TaskHandle<()> {
        let signal = self.clone();
        delay(
            move || async move {
                if signal.cancel_with(SluiceError::timeout(after)) {
                    sluice_core::debug!("signal timed out after {:?}", after);
                }
                Ok(())
            },
            after,
            None,
        )
    }
}

impl<T: Clone + Send + 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Run `callback` once `signal` confirms.
///
/// The handle rejects with the signal's cancellation reason if the signal is
/// cancelled, and with `"Signaltask was cancelled."` if it is cancelled itself
/// (directly or through `abort`).
pub fn signal_task<C, F, Fut, T>(
    callback: F,
    signal: &Signal<C>,
    abort: Option<CancellationToken>,
) -> TaskHandle<T>
where
    C: Clone + Send + 'static,
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
    T: Send + 'static,
{
    let wait = signal.completion().map(|settled| settled.map(|_| ()));
    spawn_task(wait, callback, abort, SIGNALTASK_CANCELLED)
}
