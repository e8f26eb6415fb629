// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bridges between [`AsyncStream`] and the ecosystem `futures::Stream` trait.

use crate::{AsyncStream, Outcome, Result, SluiceError};
use alloc::boxed::Box;
use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use futures::Stream;

/// Drive a unit-resumed [`AsyncStream`] as a `futures::Stream`.
///
/// The adapter yields `Ok(item)` per value, yields a stream error once as `Err`, and
/// ends after `Finished` or after the error. Dropping the adapter early drops the
/// underlying stream without running `terminate_gracefully`; call it explicitly
/// first if the stream owns resources that need detaching.
pub trait IntoFuturesStream: AsyncStream<Next = ()> + Sized + 'static {
    /// Converts this stream into a boxed `futures::Stream`.
    fn into_futures_stream(self) -> BoxStream<'static, Result<Self::Item>>
    where
        Self::Item: 'static,
    {
        futures::stream::unfold(Some(self), |state| async move {
            let mut stream = state?;
            match stream.advance(()).await {
                Ok(Outcome::Yielded(value)) => Some((Ok(value), Some(stream))),
                Ok(Outcome::Finished(_)) => None,
                Err(error) => Some((Err(error), None)),
            }
        })
        .boxed()
    }
}

impl<S> IntoFuturesStream for S where S: AsyncStream<Next = ()> + 'static {}

/// An [`AsyncStream`] pulling from a `futures::Stream`.
///
/// Cleanup drops the wrapped stream, which is how channel receivers and similar
/// sources release their resources.
///
/// ```
/// use sluice_core::{from_stream, AsyncStream, Outcome};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut source = from_stream(futures::stream::iter([1, 2]));
/// assert_eq!(source.advance(()).await.unwrap(), Outcome::Yielded(1));
/// assert_eq!(source.terminate_gracefully().await.unwrap(), Outcome::Finished(()));
/// assert_eq!(source.advance(()).await.unwrap(), Outcome::Finished(()));
/// # }
/// ```
#[derive(Debug)]
pub struct StreamSource<S> {
    inner: Option<S>,
}

/// Wrap a `futures::Stream` as an [`AsyncStream`].
pub fn from_stream<S>(stream: S) -> StreamSource<S>
where
    S: Stream + Unpin + Send,
    S::Item: Send,
{
    StreamSource {
        inner: Some(stream),
    }
}

impl<S> StreamSource<S> {
    /// Returns `true` once the source ended or was terminated.
    pub const fn is_done(&self) -> bool {
        self.inner.is_none()
    }
}

#[async_trait]
impl<S> AsyncStream for StreamSource<S>
where
    S: Stream + Unpin + Send,
    S::Item: Send,
{
    type Item = S::Item;
    type Return = ();
    type Next = ();

    async fn advance(&mut self, _next: ()) -> Result<Outcome<S::Item>> {
        let Some(inner) = self.inner.as_mut() else {
            return Ok(Outcome::Finished(()));
        };

        match inner.next().await {
            Some(value) => Ok(Outcome::Yielded(value)),
            None => {
                self.inner = None;
                Ok(Outcome::Finished(()))
            }
        }
    }

    async fn terminate_with_error(&mut self, reason: SluiceError) -> Result<Outcome<S::Item>> {
        match self.inner.take() {
            Some(_) => Err(reason),
            None => Ok(Outcome::Finished(())),
        }
    }

    async fn terminate_gracefully(&mut self) -> Result<Outcome<S::Item>> {
        self.inner = None;
        Ok(Outcome::Finished(()))
    }
}
