// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Stream sources and operators built on the [`AsyncStream`](sluice_core::AsyncStream)
//! contract.
//!
//! # Sources
//!
//! - **[`AsyncQueue`]**: bounded FIFO queue turning imperative `add` calls into a
//!   pulled stream
//! - **[`event_queue`]**: an [`AsyncQueue`] attached to an [`EventSource`] that
//!   detaches its listener when the queue terminates
//!
//! # Operators
//!
//! - **[`map`]** / **[`map_async`]**: per-value transformation
//! - **[`filter`]**: drop values failing a predicate
//! - **[`reduce`]**: running accumulation
//! - **[`compose!`]**: apply operators left to right
//!
//! Every operator forwards termination upstream, so cancelling the end of a
//! pipeline runs the cleanup of every stage.
//!
//! ```
//! use sluice_core::{AsyncStream, Outcome};
//! use sluice_stream::{compose, filter, map, AsyncQueue};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let queue = AsyncQueue::new();
//! let mut doubled = compose!(
//!     queue.clone(),
//!     filter(|value: &u32| *value > 1),
//!     map(|value: u32| value * 2),
//! );
//!
//! queue.add(1).unwrap();
//! queue.add(2).unwrap();
//! assert_eq!(doubled.advance(()).await.unwrap(), Outcome::Yielded(4));
//!
//! doubled.terminate_gracefully().await.unwrap();
//! assert!(queue.is_done());
//! # }
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

extern crate alloc;

pub mod async_queue;
pub mod event_queue;
pub mod ext;
pub mod operators;

pub use self::async_queue::{AsyncQueue, WeakAsyncQueue};
pub use self::event_queue::{event_queue, EventEmitter, EventSource, Listener, ListenerKey};
pub use self::ext::AsyncStreamExt;
pub use self::operators::{
    filter, map, map_async, reduce, Filter, FilterOp, Map, MapAsync, MapAsyncOp, MapOp,
    Operator, Reduce, ReduceOp,
};
