// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use super::{emit, Operator, Upstream};
use async_trait::async_trait;
use sluice_core::{AsyncStream, SluiceError, Step};

/// Stream returned by [`map`] and [`AsyncStreamExt::map`](crate::AsyncStreamExt::map).
#[derive(Debug)]
pub struct Map<S, F> {
    upstream: Upstream<S>,
    transform: F,
}

impl<S, F> Map<S, F>
where
    S: AsyncStream<Next = ()>,
{
    pub fn new(source: S, transform: F) -> Self {
        Self {
            upstream: Upstream::new(source),
            transform,
        }
    }
}

#[async_trait]
impl<S, F, U> AsyncStream for Map<S, F>
where
    S: AsyncStream<Next = ()>,
    F: FnMut(S::Item) -> U + Send,
    U: Send,
{
    type Item = U;
    type Return = ();
    type Next = ();

    async fn advance(&mut self, _next: ()) -> Step<U, ()> {
        let value = self.upstream.pull().await?;
        emit(value.map(&mut self.transform))
    }

    async fn terminate_with_error(&mut self, reason: SluiceError) -> Step<U, ()> {
        let value = self.upstream.terminate_with_error(reason).await?;
        emit(value.map(&mut self.transform))
    }

    async fn terminate_gracefully(&mut self) -> Step<U, ()> {
        let value = self.upstream.terminate_gracefully().await?;
        emit(value.map(&mut self.transform))
    }
}

/// Operator form of [`Map`], see [`map`].
#[derive(Debug, Clone)]
pub struct MapOp<F>(F);

/// Transform every value with `transform`.
pub fn map<F>(transform: F) -> MapOp<F> {
    MapOp(transform)
}

impl<S, F, U> Operator<S> for MapOp<F>
where
    S: AsyncStream<Next = ()>,
    F: FnMut(S::Item) -> U + Send,
    U: Send,
{
    type Output = Map<S, F>;

    fn apply(self, stream: S) -> Map<S, F> {
        Map::new(stream, self.0)
    }
}
