// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use super::{emit, Operator, Upstream};
use async_trait::async_trait;
use core::future::Future;
use sluice_core::{AsyncStream, Result, SluiceError, Step};

/// Stream returned by [`map_async`].
///
/// A failed transform terminates upstream with the error, so upstream cleanup runs
/// before the error reaches the consumer.
#[derive(Debug)]
pub struct MapAsync<S, F> {
    upstream: Upstream<S>,
    transform: F,
}

impl<S, F, Fut, U> MapAsync<S, F>
where
    S: AsyncStream<Next = ()>,
    F: FnMut(S::Item) -> Fut + Send,
    Fut: Future<Output = Result<U>> + Send,
    U: Send,
{
    pub fn new(source: S, transform: F) -> Self {
        Self {
            upstream: Upstream::new(source),
            transform,
        }
    }

    async fn apply_to(&mut self, mut value: Option<S::Item>) -> Step<U, ()> {
        loop {
            let Some(input) = value else {
                return emit(None);
            };
            match (self.transform)(input).await {
                Ok(output) => return emit(Some(output)),
                Err(error) => value = self.upstream.terminate_with_error(error).await?,
            }
        }
    }
}

#[async_trait]
impl<S, F, Fut, U> AsyncStream for MapAsync<S, F>
where
    S: AsyncStream<Next = ()>,
    F: FnMut(S::Item) -> Fut + Send,
    Fut: Future<Output = Result<U>> + Send,
    U: Send,
{
    type Item = U;
    type Return = ();
    type Next = ();

    async fn advance(&mut self, _next: ()) -> Step<U, ()> {
        let value = self.upstream.pull().await?;
        self.apply_to(value).await
    }

    async fn terminate_with_error(&mut self, reason: SluiceError) -> Step<U, ()> {
        let value = self.upstream.terminate_with_error(reason).await?;
        self.apply_to(value).await
    }

    async fn terminate_gracefully(&mut self) -> Step<U, ()> {
        let value = self.upstream.terminate_gracefully().await?;
        self.apply_to(value).await
    }
}

/// Operator form of [`MapAsync`], see [`map_async`].
#[derive(Debug, Clone)]
pub struct MapAsyncOp<F>(F);

/// Transform every value with a fallible async function.
pub fn map_async<F>(transform: F) -> MapAsyncOp<F> {
    MapAsyncOp(transform)
}

impl<S, F, Fut, U> Operator<S> for MapAsyncOp<F>
where
    S: AsyncStream<Next = ()>,
    F: FnMut(S::Item) -> Fut + Send,
    Fut: Future<Output = Result<U>> + Send,
    U: Send,
{
    type Output = MapAsync<S, F>;

    fn apply(self, stream: S) -> MapAsync<S, F> {
        MapAsync::new(stream, self.0)
    }
}
