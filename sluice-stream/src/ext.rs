// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Method-call syntax for the operators.

use crate::operators::{Filter, Map, MapAsync, Operator, Reduce};
use core::future::Future;
use sluice_core::{AsyncStream, Result};

/// Extension trait adding operator methods to every unit-resumed [`AsyncStream`].
///
/// ```
/// use sluice_core::from_stream;
/// use sluice_stream::AsyncStreamExt;
/// use sluice_test_utils::drain;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut totals = from_stream(futures::stream::iter(1..=4))
///     .filter(|value: &i32| value % 2 == 0)
///     .reduce(|sum: i32, value: i32| sum + value, 0);
///
/// let (values, ()) = drain(&mut totals).await.unwrap();
/// assert_eq!(values, vec![2, 6]);
/// # }
/// ```
pub trait AsyncStreamExt: AsyncStream<Next = ()> + Sized {
    fn map<F, U>(self, transform: F) -> Map<Self, F>
    where
        F: FnMut(Self::Item) -> U + Send,
        U: Send,
    {
        Map::new(self, transform)
    }

    fn map_async<F, Fut, U>(self, transform: F) -> MapAsync<Self, F>
    where
        F: FnMut(Self::Item) -> Fut + Send,
        Fut: Future<Output = Result<U>> + Send,
        U: Send,
    {
        MapAsync::new(self, transform)
    }

    fn filter<F>(self, predicate: F) -> Filter<Self, F>
    where
        F: FnMut(&Self::Item) -> bool + Send,
    {
        Filter::new(self, predicate)
    }

    fn reduce<F, A>(self, reducer: F, initial: A) -> Reduce<Self, F, A>
    where
        F: FnMut(A, Self::Item) -> A + Send,
        A: Clone + Send,
    {
        Reduce::new(self, reducer, initial)
    }

    /// Apply a prebuilt [`Operator`].
    fn pipe<O>(self, operator: O) -> O::Output
    where
        O: Operator<Self>,
    {
        operator.apply(self)
    }
}

impl<S> AsyncStreamExt for S where S: AsyncStream<Next = ()> {}
