// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};
use futures::channel::oneshot;
use sluice_core::{AsyncStream, CancellationToken, Outcome, Result, SluiceError};
use sluice_runtime::{spawn_detached, yield_now};

pub(crate) const STREAM_CANCELLED: &str = "Stream was cancelled.";

/// Drive `stream` to completion, calling `callback` once per value.
///
/// The driver runs on a spawned task and applies backpressure: the next value is
/// requested only after the callback for the current one has resolved, and the
/// callback's `Ok(next)` is what the stream is resumed with. The first `advance`
/// is resumed with `Next::default()`.
///
/// # Behavior
///
/// - Cancellation (through the returned [`Subscription`] or the supplied token) is
///   observed at the next loop iteration: instead of `advance`, the stream gets
///   `terminate_with_error(reason)`, defaulting to `"Stream was cancelled."`
/// - A callback `Err(e)` is routed into `terminate_with_error(e)` as well, so the
///   stream's cleanup always runs through one path
/// - A `Finished(r)` outcome resolves the subscription with `Ok(r)`
/// - Between a callback and the next pull the driver always yields once, even if
///   the callback was already ready
///
/// # Examples
///
/// ```
/// use sluice_core::from_stream;
/// use sluice_exec::subscribe;
/// use std::sync::{Arc, Mutex};
///
/// # #[tokio::main]
/// # async fn main() {
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = seen.clone();
///
/// let subscription = subscribe(
///     from_stream(futures::stream::iter([1, 2, 3])),
///     move |value, _token| {
///         let sink = sink.clone();
///         async move {
///             sink.lock().unwrap().push(value);
///             Ok(())
///         }
///     },
///     None,
/// );
///
/// subscription.await.unwrap();
/// assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
/// # }
/// ```
pub fn subscribe<S, F, Fut>(
    stream: S,
    callback: F,
    cancellation_token: Option<CancellationToken>,
) -> Subscription<S::Return>
where
    S: AsyncStream + 'static,
    S::Next: Default,
    S::Item: 'static,
    S::Return: 'static,
    F: FnMut(S::Item, CancellationToken) -> Fut + Send + 'static,
    Fut: Future<Output = Result<S::Next>> + Send + 'static,
{
    let token = cancellation_token.unwrap_or_default();
    let (settle, completion) = oneshot::channel();

    let driver_token = token.clone();
    spawn_detached(async move {
        let result = drive(stream, callback, driver_token).await;
        let _ = settle.send(result);
    });

    Subscription { token, completion }
}

async fn drive<S, F, Fut>(mut stream: S, mut callback: F, token: CancellationToken) -> Result<S::Return>
where
    S: AsyncStream,
    S::Next: Default,
    F: FnMut(S::Item, CancellationToken) -> Fut,
    Fut: Future<Output = Result<S::Next>>,
{
    let mut next = S::Next::default();
    let mut failure: Option<SluiceError> = None;

    loop {
        let step = if let Some(error) = failure.take() {
            sluice_core::debug!("callback failed, terminating stream: {}", error);
            stream.terminate_with_error(error).await
        } else if token.is_cancelled() {
            let reason = token.reason_or_else(|| SluiceError::cancelled(STREAM_CANCELLED));
            sluice_core::trace!("subscription cancelled: {}", reason);
            stream.terminate_with_error(reason).await
        } else {
            stream.advance(core::mem::take(&mut next)).await
        };

        match step? {
            Outcome::Finished(value) => return Ok(value),
            Outcome::Yielded(value) => match callback(value, token.clone()).await {
                Ok(resume) => {
                    next = resume;
                    yield_now().await;
                }
                Err(error) => failure = Some(error),
            },
        }
    }
}

/// Handle to a running [`subscribe`] driver.
///
/// Awaiting the subscription yields the stream's return value, or the error the
/// stream terminated with. Dropping it does not stop the driver; cancel first.
#[must_use = "a subscription reports the stream's outcome only when awaited"]
#[derive(Debug)]
pub struct Subscription<R> {
    token: CancellationToken,
    completion: oneshot::Receiver<Result<R>>,
}

impl<R> Subscription<R> {
    /// Request cancellation with `"Stream was cancelled."`.
    ///
    /// Returns `true` if this call won; later calls do not change the reason.
    pub fn cancel(&self) -> bool {
        self.token.cancel()
    }

    /// Request cancellation with `reason`. Returns `true` if this call won.
    pub fn cancel_with(&self, reason: SluiceError) -> bool {
        self.token.cancel_with(reason)
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// The token the driver observes; also handed to every callback.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl<R> Future for Subscription<R> {
    type Output = Result<R>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.completion).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(oneshot::Canceled)) => {
                Poll::Ready(Err(SluiceError::cancelled(STREAM_CANCELLED)))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Method-call form of [`subscribe`].
pub trait SubscribeExt: AsyncStream + Sized + 'static {
    fn subscribe<F, Fut>(
        self,
        callback: F,
        cancellation_token: Option<CancellationToken>,
    ) -> Subscription<Self::Return>
    where
        Self::Next: Default,
        Self::Item: 'static,
        Self::Return: 'static,
        F: FnMut(Self::Item, CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = Result<Self::Next>> + Send + 'static,
    {
        subscribe(self, callback, cancellation_token)
    }
}

impl<S: AsyncStream + 'static> SubscribeExt for S {}
