// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Runtime-agnostic cancellation token with a first-wins reason.
//!
//! The token is the "external abort source" every task handle, signal and
//! subscription can be linked to. Cancelling it is idempotent: the first call fixes
//! the reason and wakes every waiter, later calls change nothing.

use crate::sluice_mutex::Mutex;
use crate::SluiceError;
use core::future::Future;
use core::pin::Pin;
use core::sync::atomic::{AtomicBool, Ordering};
use core::task::{Context, Poll};
use event_listener::{Event, EventListener};
use std::sync::Arc;

/// Cloneable cancellation token.
///
/// All clones share one cancellation state. When `cancel()` or `cancel_with()` is
/// called on any clone, every waiter on `cancelled()` is notified.
///
/// # Example
///
/// ```
/// use sluice_core::{CancellationToken, SluiceError};
///
/// let token = CancellationToken::new();
/// assert!(token.cancel_with(SluiceError::cancelled("first")));
/// assert!(!token.cancel_with(SluiceError::cancelled("second")));
///
/// assert_eq!(token.reason().unwrap().to_string(), "first");
/// ```
#[derive(Clone, Debug)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    cancelled: AtomicBool,
    reason: Mutex<Option<SluiceError>>,
    event: Event,
}

impl CancellationToken {
    /// Create a new cancellation token.
    ///
    /// The token is initially not cancelled.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                reason: Mutex::new(None),
                event: Event::new(),
            }),
        }
    }

    /// Cancel the token without a reason, waking all listeners.
    ///
    /// Consumers substitute their own default reason. Returns `true` if this call
    /// performed the cancellation.
    pub fn cancel(&self) -> bool {
        self.settle(None)
    }

    /// Cancel the token with an explicit reason, waking all listeners.
    ///
    /// Returns `true` if this call performed the cancellation; otherwise the
    /// earlier reason is kept.
    pub fn cancel_with(&self, reason: SluiceError) -> bool {
        self.settle(Some(reason))
    }

    fn settle(&self, reason: Option<SluiceError>) -> bool {
        {
            let mut slot = self.inner.reason.lock();
            if self.inner.cancelled.load(Ordering::Acquire) {
                return false;
            }
            *slot = reason;
            // Flag is published after the reason so readers never see a torn state
            self.inner.cancelled.store(true, Ordering::Release);
        }

        self.inner.event.notify(usize::MAX);
        true
    }

    /// Check if the token has been cancelled (non-blocking).
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// The reason given by the winning `cancel_with` call, if any.
    pub fn reason(&self) -> Option<SluiceError> {
        self.inner.reason.lock().clone()
    }

    /// The winning reason, or `default()` when the token was cancelled without one
    /// (or not at all).
    pub fn reason_or_else(&self, default: impl FnOnce() -> SluiceError) -> SluiceError {
        self.reason().unwrap_or_else(default)
    }

    /// Number of `cancelled()` futures currently parked on this token.
    ///
    /// A future registers only once it has been polled while the token was live.
    pub fn listener_count(&self) -> usize {
        self.inner.event.total_listeners()
    }

    /// Wait asynchronously until the token is cancelled.
    ///
    /// If the token is already cancelled, this returns immediately.
    pub fn cancelled(&self) -> Cancelled<'_> {
        Cancelled {
            token: self,
            listener: None,
        }
    }

    /// Owned variant of [`cancelled`](Self::cancelled) for use inside spawned tasks.
    pub fn cancelled_owned(self) -> impl Future<Output = ()> + Send + 'static {
        async move { self.cancelled().await }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Future returned by [`CancellationToken::cancelled()`].
pub struct Cancelled<'a> {
    token: &'a CancellationToken,
    listener: Option<EventListener>,
}

impl Future for Cancelled<'_> {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        loop {
            if self.token.is_cancelled() {
                return Poll::Ready(());
            }

            match self.listener.as_mut() {
                None => {
                    // Re-check after registering; cancel() may have run in between
                    self.listener = Some(self.token.inner.event.listen());
                }
                Some(listener) => match Pin::new(listener).poll(cx) {
                    Poll::Ready(()) => {
                        self.listener = None;
                    }
                    Poll::Pending => return Poll::Pending,
                },
            }
        }
    }
}
