// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use super::{emit, Operator, Upstream};
use async_trait::async_trait;
use sluice_core::{AsyncStream, SluiceError, Step};

/// Stream returned by [`filter`].
///
/// Rejected values are pulled past without reaching the consumer; the consumer
/// still sees one `advance` answer per accepted value.
#[derive(Debug)]
pub struct Filter<S, F> {
    upstream: Upstream<S>,
    predicate: F,
}

impl<S, F> Filter<S, F>
where
    S: AsyncStream<Next = ()>,
    F: FnMut(&S::Item) -> bool + Send,
{
    pub fn new(source: S, predicate: F) -> Self {
        Self {
            upstream: Upstream::new(source),
            predicate,
        }
    }

    async fn accept_from(&mut self, mut candidate: Option<S::Item>) -> Step<S::Item, ()> {
        loop {
            match candidate {
                Some(value) if (self.predicate)(&value) => return emit(Some(value)),
                Some(_) => candidate = self.upstream.pull().await?,
                None => return emit(None),
            }
        }
    }
}

#[async_trait]
impl<S, F> AsyncStream for Filter<S, F>
where
    S: AsyncStream<Next = ()>,
    F: FnMut(&S::Item) -> bool + Send,
{
    type Item = S::Item;
    type Return = ();
    type Next = ();

    async fn advance(&mut self, _next: ()) -> Step<S::Item, ()> {
        let first = self.upstream.pull().await?;
        self.accept_from(first).await
    }

    async fn terminate_with_error(&mut self, reason: SluiceError) -> Step<S::Item, ()> {
        let first = self.upstream.terminate_with_error(reason).await?;
        self.accept_from(first).await
    }

    async fn terminate_gracefully(&mut self) -> Step<S::Item, ()> {
        let first = self.upstream.terminate_gracefully().await?;
        self.accept_from(first).await
    }
}

/// Operator form of [`Filter`], see [`filter`].
#[derive(Debug, Clone)]
pub struct FilterOp<F>(F);

/// Keep only the values for which `predicate` returns `true`.
pub fn filter<F>(predicate: F) -> FilterOp<F> {
    FilterOp(predicate)
}

impl<S, F> Operator<S> for FilterOp<F>
where
    S: AsyncStream<Next = ()>,
    F: FnMut(&S::Item) -> bool + Send,
{
    type Output = Filter<S, F>;

    fn apply(self, stream: S) -> Filter<S, F> {
        Filter::new(stream, self.0)
    }
}
