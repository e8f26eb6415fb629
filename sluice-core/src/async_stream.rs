// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The bidirectional stream contract.
//!
//! An [`AsyncStream`] is a lazy, single-consumer sequence that is *pulled* one step at
//! a time. Unlike `futures::Stream` it is bidirectional:
//!
//! - [`advance`](AsyncStream::advance) resumes the stream with a value of type `Next`
//!   (the consumer's answer to the previous item) and waits for the next step;
//! - [`terminate_with_error`](AsyncStream::terminate_with_error) injects an error at
//!   the stream's suspension point so its cleanup can run;
//! - [`terminate_gracefully`](AsyncStream::terminate_gracefully) requests early,
//!   non-error completion.
//!
//! All three take `&mut self`, so at most one request is outstanding per stream.
//! Once a stream has finished or failed it stays terminal and answers every later
//! request with `Ok(Outcome::Finished(Default::default()))` without side effects.

use crate::{Outcome, Result, SluiceError};
use alloc::boxed::Box;
use async_trait::async_trait;

/// Result of a single stream step.
pub type Step<T, R> = Result<Outcome<T, R>>;

/// Bidirectional asynchronous sequence with exceptional and graceful termination.
///
/// # Example
///
/// A countdown that records whether its cleanup ran:
///
/// ```
/// use async_trait::async_trait;
/// use sluice_core::{AsyncStream, Outcome, Result, SluiceError};
///
/// struct Countdown {
///     remaining: u32,
///     done: bool,
/// }
///
/// #[async_trait]
/// impl AsyncStream for Countdown {
///     type Item = u32;
///     type Return = ();
///     type Next = ();
///
///     async fn advance(&mut self, _next: ()) -> Result<Outcome<u32>> {
///         if self.done || self.remaining == 0 {
///             self.done = true;
///             return Ok(Outcome::Finished(()));
///         }
///         self.remaining -= 1;
///         Ok(Outcome::Yielded(self.remaining + 1))
///     }
///
///     async fn terminate_with_error(&mut self, reason: SluiceError) -> Result<Outcome<u32>> {
///         if self.done {
///             return Ok(Outcome::Finished(()));
///         }
///         self.done = true;
///         Err(reason)
///     }
///
///     async fn terminate_gracefully(&mut self) -> Result<Outcome<u32>> {
///         self.done = true;
///         Ok(Outcome::Finished(()))
///     }
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut countdown = Countdown { remaining: 2, done: false };
/// assert_eq!(countdown.advance(()).await.unwrap(), Outcome::Yielded(2));
/// assert_eq!(countdown.advance(()).await.unwrap(), Outcome::Yielded(1));
/// assert_eq!(countdown.advance(()).await.unwrap(), Outcome::Finished(()));
/// # }
/// ```
#[async_trait]
pub trait AsyncStream: Send {
    /// Values produced by the stream
    type Item: Send;
    /// Final value the stream completes with
    type Return: Send;
    /// Resumption input supplied by the consumer on every `advance`
    type Next: Send;

    /// Request the next value, resuming the stream with `next`.
    ///
    /// # Errors
    /// Returns the stream's error if it fails while producing the next value.
    async fn advance(&mut self, next: Self::Next) -> Step<Self::Item, Self::Return>;

    /// Inject `reason` at the stream's suspension point and let its cleanup run.
    ///
    /// # Errors
    /// Returns `Err(reason)` unless the stream converts the error internally or is
    /// already terminal.
    async fn terminate_with_error(&mut self, reason: SluiceError)
        -> Step<Self::Item, Self::Return>;

    /// Request early, non-error completion; cleanup runs.
    ///
    /// # Errors
    /// Returns an error only if the stream's own cleanup fails.
    async fn terminate_gracefully(&mut self) -> Step<Self::Item, Self::Return>;
}

#[async_trait]
impl<S> AsyncStream for Box<S>
where
    S: AsyncStream + ?Sized,
{
    type Item = S::Item;
    type Return = S::Return;
    type Next = S::Next;

    async fn advance(&mut self, next: Self::Next) -> Step<Self::Item, Self::Return> {
        (**self).advance(next).await
    }

    async fn terminate_with_error(
        &mut self,
        reason: SluiceError,
    ) -> Step<Self::Item, Self::Return> {
        (**self).terminate_with_error(reason).await
    }

    async fn terminate_gracefully(&mut self) -> Step<Self::Item, Self::Return> {
        (**self).terminate_gracefully().await
    }
}

/// A type-erased stream, handy for heterogeneous pipelines.
pub type BoxAsyncStream<'a, T, R = (), N = ()> =
    Box<dyn AsyncStream<Item = T, Return = R, Next = N> + 'a>;
