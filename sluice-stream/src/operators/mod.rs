// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Per-item stream operators.
//!
//! Every operator pulls its input under the same backpressure discipline as the
//! subscription driver (one upstream `advance` per downstream `advance`) and
//! forwards `terminate_with_error` / `terminate_gracefully` upstream unchanged, so
//! cancellation reaches every stage of a composed pipeline.

mod compose;
mod filter;
mod map;
mod map_async;
mod reduce;

pub use filter::{filter, Filter, FilterOp};
pub use map::{map, Map, MapOp};
pub use map_async::{map_async, MapAsync, MapAsyncOp};
pub use reduce::{reduce, Reduce, ReduceOp};

use sluice_core::{AsyncStream, Outcome, Result, SluiceError, Step};

/// A reusable `AsyncStream -> AsyncStream` transformation.
///
/// Implemented by the values returned from [`map`], [`filter`], [`reduce`] and
/// [`map_async`]; [`compose!`](crate::compose) applies a list of them left to right.
pub trait Operator<S>
where
    S: AsyncStream<Next = ()>,
{
    type Output: AsyncStream<Next = ()>;

    fn apply(self, stream: S) -> Self::Output;
}

/// The input side shared by all operators.
///
/// Remembers when upstream reached a terminal state so later calls short-circuit
/// without touching it again.
#[derive(Debug)]
pub(crate) struct Upstream<S> {
    source: S,
    done: bool,
}

impl<S> Upstream<S>
where
    S: AsyncStream<Next = ()>,
{
    pub(crate) const fn new(source: S) -> Self {
        Self {
            source,
            done: false,
        }
    }

    /// Next upstream value, or `None` once upstream finished.
    pub(crate) async fn pull(&mut self) -> Result<Option<S::Item>> {
        if self.done {
            return Ok(None);
        }
        let step = self.source.advance(()).await;
        self.settle(step)
    }

    pub(crate) async fn terminate_with_error(
        &mut self,
        reason: SluiceError,
    ) -> Result<Option<S::Item>> {
        if self.done {
            return Ok(None);
        }
        let step = self.source.terminate_with_error(reason).await;
        self.settle(step)
    }

    pub(crate) async fn terminate_gracefully(&mut self) -> Result<Option<S::Item>> {
        if self.done {
            return Ok(None);
        }
        let step = self.source.terminate_gracefully().await;
        self.settle(step)
    }

    // A termination that upstream converted into a value keeps the stage alive
    fn settle(&mut self, step: Step<S::Item, S::Return>) -> Result<Option<S::Item>> {
        match step {
            Ok(Outcome::Yielded(value)) => Ok(Some(value)),
            Ok(Outcome::Finished(_)) => {
                self.done = true;
                Ok(None)
            }
            Err(error) => {
                self.done = true;
                Err(error)
            }
        }
    }
}

/// `Some(value)` as a yielded step, `None` as the finished step.
pub(crate) fn emit<T>(value: Option<T>) -> Step<T, ()> {
    Ok(value.map_or(Outcome::Finished(()), Outcome::Yielded))
}
