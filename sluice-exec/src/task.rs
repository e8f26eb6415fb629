// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Cancellable handles for deferred callbacks.
//!
//! Every scheduling tier produces a [`TaskHandle`]. The handle owns exactly one
//! pending callback invocation and settles once: with the callback's result, or
//! with a cancellation reason if [`cancel`](TaskHandle::cancel) (or a linked abort
//! token) won the race against the callback firing.

use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};
use futures::channel::oneshot;
use futures::future::{self, Either};
use sluice_core::sluice_mutex::Mutex;
use sluice_core::{CancellationToken, Result, SluiceError};
use sluice_runtime::spawn_detached;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Scheduled,
    Fired,
    Cancelled,
}

struct ControlState<T> {
    phase: Phase,
    settle: Option<oneshot::Sender<Result<T>>>,
}

/// Shared control block of one scheduled callback.
struct Control<T> {
    state: Mutex<ControlState<T>>,
    // Stops the pending wait once the handle was cancelled
    stop: CancellationToken,
    default_reason: &'static str,
}

impl<T> Control<T> {
    /// Moves `Scheduled -> Fired`; `None` if cancellation got there first.
    fn fire(&self) -> Option<oneshot::Sender<Result<T>>> {
        let mut state = self.state.lock();
        if state.phase != Phase::Scheduled {
            return None;
        }
        state.phase = Phase::Fired;
        state.settle.take()
    }
}

/// Object-safe view of a control block, so cancellers need not name `T`.
trait Cancel: Send + Sync {
    fn cancel_with(&self, reason: Option<SluiceError>) -> bool;
    fn is_scheduled(&self) -> bool;
}

impl<T: Send> Cancel for Control<T> {
    fn cancel_with(&self, reason: Option<SluiceError>) -> bool {
        let settle = {
            let mut state = self.state.lock();
            if state.phase != Phase::Scheduled {
                return false;
            }
            state.phase = Phase::Cancelled;
            state.settle.take()
        };

        let reason = reason.unwrap_or_else(|| SluiceError::cancelled(self.default_reason));
        sluice_core::trace!("task cancelled: {}", reason);
        if let Some(settle) = settle {
            let _ = settle.send(Err(reason));
        }
        self.stop.cancel();
        true
    }

    fn is_scheduled(&self) -> bool {
        self.state.lock().phase == Phase::Scheduled
    }
}

/// Handle to a scheduled callback.
///
/// The handle is itself the completion future. Dropping it does **not** cancel the
/// callback; use [`cancel`](Self::cancel) or keep a [`TaskCanceller`].
///
/// ```
/// use sluice_exec::delay;
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() {
/// let handle = delay(|| async { Ok(42) }, Duration::from_millis(10), None);
/// assert_eq!(handle.await.unwrap(), 42);
///
/// let handle = delay(|| async { Ok(0) }, Duration::from_secs(60), None);
/// handle.cancel();
/// assert!(handle.await.unwrap_err().is_cancellation());
/// # }
/// ```
#[must_use = "a task handle is the only way to observe the callback's result"]
pub struct TaskHandle<T> {
    control: Arc<Control<T>>,
    completion: oneshot::Receiver<Result<T>>,
}

impl<T: Send + 'static> TaskHandle<T> {
    /// Cancel with the tier's default reason. Returns `true` if this call won.
    pub fn cancel(&self) -> bool {
        self.control.cancel_with(None)
    }

    /// Cancel with an explicit reason. Returns `true` if this call won.
    ///
    /// After the callback fired, or after an earlier cancellation, this is a no-op
    /// and the completion keeps its first settlement.
    pub fn cancel_with(&self, reason: SluiceError) -> bool {
        self.control.cancel_with(Some(reason))
    }

    /// Returns `true` while the callback has neither fired nor been cancelled.
    pub fn is_scheduled(&self) -> bool {
        self.control.is_scheduled()
    }

    /// A cloneable, type-erased cancel handle for this task.
    pub fn canceller(&self) -> TaskCanceller {
        TaskCanceller {
            control: self.control.clone(),
        }
    }
}

impl<T> Future for TaskHandle<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let default_reason = self.control.default_reason;
        match Pin::new(&mut self.completion).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            // The runner went away without settling (runtime shut down)
            Poll::Ready(Err(oneshot::Canceled)) => {
                Poll::Ready(Err(SluiceError::cancelled(default_reason)))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T> core::fmt::Debug for TaskHandle<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TaskHandle")
            .field("phase", &self.control.state.lock().phase)
            .finish()
    }
}

/// Cloneable cancel capability detached from the task's result type.
#[derive(Clone)]
pub struct TaskCanceller {
    control: Arc<dyn Cancel>,
}

impl TaskCanceller {
    pub fn cancel(&self) -> bool {
        self.control.cancel_with(None)
    }

    pub fn cancel_with(&self, reason: SluiceError) -> bool {
        self.control.cancel_with(Some(reason))
    }

    pub fn is_scheduled(&self) -> bool {
        self.control.is_scheduled()
    }
}

impl core::fmt::Debug for TaskCanceller {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TaskCanceller")
            .field("scheduled", &self.is_scheduled())
            .finish()
    }
}

/// Spawn the runner of one scheduled callback.
///
/// `wait` decides *when* the callback fires; an `Err` from it cancels the task with
/// that reason. `abort` is observed as a plain `cancel()`.
pub(crate) fn spawn_task<W, F, Fut, T>(
    wait: W,
    callback: F,
    abort: Option<CancellationToken>,
    default_reason: &'static str,
) -> TaskHandle<T>
where
    W: Future<Output = Result<()>> + Send + 'static,
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
    T: Send + 'static,
{
    let (settle, completion) = oneshot::channel();
    let control = Arc::new(Control {
        state: Mutex::new(ControlState {
            phase: Phase::Scheduled,
            settle: Some(settle),
        }),
        stop: CancellationToken::new(),
        default_reason,
    });

    let runner = control.clone();
    spawn_detached(async move {
        let stop = runner.stop.clone();
        let interrupted = async move {
            match abort {
                Some(abort) => {
                    future::select(
                        Box::pin(stop.cancelled_owned()),
                        Box::pin(abort.cancelled_owned()),
                    )
                    .await;
                }
                None => stop.cancelled().await,
            }
        };

        // Cancellation is checked before the wait so an already-aborted token wins
        match future::select(Box::pin(interrupted), Box::pin(wait)).await {
            Either::Left(_) => {
                runner.cancel_with(None);
            }
            Either::Right((Err(reason), _)) => {
                runner.cancel_with(Some(reason));
            }
            Either::Right((Ok(()), _)) => {
                if let Some(settle) = runner.fire() {
                    let result = callback().await;
                    let _ = settle.send(result);
                }
            }
        }
    });

    TaskHandle {
        control,
        completion,
    }
}
