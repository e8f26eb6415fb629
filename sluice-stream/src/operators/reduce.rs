// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use super::{emit, Operator, Upstream};
use async_trait::async_trait;
use sluice_core::{AsyncStream, SluiceError, Step};

/// Stream returned by [`reduce`]: yields the running accumulator after every value.
#[derive(Debug)]
pub struct Reduce<S, F, A> {
    upstream: Upstream<S>,
    reducer: F,
    accumulator: A,
}

impl<S, F, A> Reduce<S, F, A>
where
    S: AsyncStream<Next = ()>,
    F: FnMut(A, S::Item) -> A + Send,
    A: Clone + Send,
{
    pub fn new(source: S, reducer: F, initial: A) -> Self {
        Self {
            upstream: Upstream::new(source),
            reducer,
            accumulator: initial,
        }
    }

    fn fold(&mut self, value: Option<S::Item>) -> Step<A, ()> {
        let Some(value) = value else {
            return emit(None);
        };
        let accumulator = (self.reducer)(self.accumulator.clone(), value);
        self.accumulator = accumulator.clone();
        emit(Some(accumulator))
    }
}

#[async_trait]
impl<S, F, A> AsyncStream for Reduce<S, F, A>
where
    S: AsyncStream<Next = ()>,
    F: FnMut(A, S::Item) -> A + Send,
    A: Clone + Send,
{
    type Item = A;
    type Return = ();
    type Next = ();

    async fn advance(&mut self, _next: ()) -> Step<A, ()> {
        let value = self.upstream.pull().await?;
        self.fold(value)
    }

    async fn terminate_with_error(&mut self, reason: SluiceError) -> Step<A, ()> {
        let value = self.upstream.terminate_with_error(reason).await?;
        self.fold(value)
    }

    async fn terminate_gracefully(&mut self) -> Step<A, ()> {
        let value = self.upstream.terminate_gracefully().await?;
        self.fold(value)
    }
}

/// Operator form of [`Reduce`], see [`reduce`].
#[derive(Debug, Clone)]
pub struct ReduceOp<F, A> {
    reducer: F,
    initial: A,
}

/// Fold values into an accumulator, emitting the accumulator after each value.
///
/// `reducer` receives the previous accumulator and the new value.
pub fn reduce<F, A>(reducer: F, initial: A) -> ReduceOp<F, A> {
    ReduceOp { reducer, initial }
}

impl<S, F, A> Operator<S> for ReduceOp<F, A>
where
    S: AsyncStream<Next = ()>,
    F: FnMut(A, S::Item) -> A + Send,
    A: Clone + Send,
{
    type Output = Reduce<S, F, A>;

    fn apply(self, stream: S) -> Reduce<S, F, A> {
        Reduce::new(stream, self.reducer, self.initial)
    }
}
