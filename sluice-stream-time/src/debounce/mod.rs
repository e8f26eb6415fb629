// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The `debounce` operator.
//!
//! Trailing debounce: every source value restarts a window of the given length;
//! a value is emitted only once no newer value arrived within its window.
//!
//! - When the source finishes, a window already running still completes and emits
//! - A source error cancels the running window and is delivered once
//! - Terminating the debounced stream before the window elapses drops the pending
//!   value

mod implementation;

pub use implementation::Debounce;

use core::time::Duration;
use sluice_core::AsyncStream;

/// Debounce `stream` by `window`.
///
/// # Example
///
/// ```rust
/// use sluice_core::{AsyncStream, Outcome};
/// use sluice_stream::AsyncQueue;
/// use sluice_stream_time::debounce;
/// use std::time::Duration;
///
/// # #[tokio::main(flavor = "current_thread", start_paused = true)]
/// # async fn main() {
/// let queue = AsyncQueue::new();
/// let mut debounced = debounce(queue.clone(), Duration::from_millis(5));
///
/// queue.add("a").unwrap();
/// queue.add("b").unwrap();
/// tokio::time::sleep(Duration::from_millis(1)).await;
/// queue.close();
///
/// assert_eq!(debounced.advance(()).await.unwrap(), Outcome::Yielded("b"));
/// assert_eq!(debounced.advance(()).await.unwrap(), Outcome::Finished(()));
/// # }
/// ```
pub fn debounce<S>(stream: S, window: Duration) -> Debounce<S::Item>
where
    S: AsyncStream<Next = ()> + 'static,
    S::Item: 'static,
{
    Debounce::new(stream, window)
}

/// Extension trait providing `.debounce(window)` on unit-resumed streams.
pub trait DebounceExt: AsyncStream<Next = ()> + Sized + 'static
where
    Self::Item: 'static,
{
    fn debounce(self, window: Duration) -> Debounce<Self::Item> {
        Debounce::new(self, window)
    }
}

impl<S> DebounceExt for S
where
    S: AsyncStream<Next = ()> + 'static,
    S::Item: 'static,
{
}
