// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! # Sluice
//!
//! Backpressured, cancellable asynchronous streams.
//!
//! ## Overview
//!
//! Sluice is built around one contract, [`AsyncStream`]: a lazily pulled sequence
//! that can be resumed with a value, terminated with an error, or closed early.
//! Around it sit:
//!
//! - **Sources**: [`AsyncQueue`] for imperative producers, [`event_queue`] for
//!   listener-based ones, [`from_stream`] for any `futures::Stream`
//! - **Operators**: [`map`], [`map_async`], [`filter`], [`reduce`], [`compose!`] and
//!   the time-based [`debounce`]
//! - **Consumption**: [`subscribe`], which drives a stream with backpressure and
//!   routes cancellation into the stream's own cleanup
//! - **Scheduling**: cancellable [`TaskHandle`]s on microtask, task, delay and frame
//!   tiers, and settle-once [`Signal`]s
//!
//! Every cancellable operation takes an optional [`CancellationToken`]. The first
//! reason given wins; components without an explicit reason report their own default
//! message (`"Stream was cancelled."`, `"Task was cancelled."`, ...).
//!
//! ## Quick Start
//!
//! ```rust
//! use sluice::prelude::*;
//! use std::sync::{Arc, Mutex};
//!
//! # #[tokio::main]
//! # async fn main() -> sluice::Result<()> {
//! let queue = AsyncQueue::new();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = seen.clone();
//!
//! let subscription = compose!(queue.clone(), map(|value: u32| value * 10)).subscribe(
//!     move |value, _token| {
//!         let sink = sink.clone();
//!         async move {
//!             sink.lock().unwrap().push(value);
//!             Ok(())
//!         }
//!     },
//!     None,
//! );
//!
//! queue.add(1)?;
//! queue.add(2)?;
//! queue.add(3)?;
//! while seen.lock().unwrap().len() < 3 {
//!     tokio::task::yield_now().await;
//! }
//! queue.close();
//!
//! subscription.await?;
//! assert_eq!(*seen.lock().unwrap(), vec![10, 20, 30]);
//! # Ok(())
//! # }
//! ```

pub use sluice_core::{
    from_stream, AsyncStream, BoxAsyncStream, CancellationToken, IntoFuturesStream,
    IntoSluiceError, Outcome, Result, ResultExt, SluiceError, Step, StreamSource,
};
pub use sluice_exec::{
    delay, microtask, signal_task, subscribe, task, FrameSource, IntervalFrames, Scheduler,
    Signal, SubscribeExt, Subscription, TaskCanceller, TaskHandle, Tier,
};
pub use sluice_runtime::{BackgroundTask, Timer};
pub use sluice_stream::{
    compose, event_queue, filter, map, map_async, reduce, AsyncQueue, AsyncStreamExt,
    EventEmitter, EventSource, Operator,
};
pub use sluice_stream_time::{debounce, Debounce, DebounceExt};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        compose, debounce, filter, map, map_async, reduce, subscribe, AsyncQueue,
        AsyncStream, AsyncStreamExt, CancellationToken, DebounceExt, Outcome, SluiceError,
        SubscribeExt,
    };
}
