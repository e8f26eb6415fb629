// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Runtime-agnostic spawning with cooperative cancellation.

use core::future::Future;
use sluice_core::CancellationToken;

/// Spawn a future on the selected runtime and forget about it.
///
/// The future owns everything it needs; its result must be reported through a
/// channel or shared state.
pub fn spawn_detached<Fut>(future: Fut)
where
    Fut: Future<Output = ()> + Send + 'static,
{
    #[cfg(feature = "runtime-tokio")]
    {
        tokio::spawn(future);
    }

    #[cfg(all(feature = "runtime-smol", not(feature = "runtime-tokio")))]
    {
        smol::spawn(future).detach();
    }

    #[cfg(not(any(feature = "runtime-tokio", feature = "runtime-smol")))]
    compile_error!("sluice-runtime needs `runtime-tokio` or `runtime-smol`");
}

/// Give other ready tasks a chance to run before continuing.
///
/// Consumers await this between callbacks so a synchronous producer cannot starve
/// the executor.
pub async fn yield_now() {
    #[cfg(feature = "runtime-tokio")]
    tokio::task::yield_now().await;

    #[cfg(all(feature = "runtime-smol", not(feature = "runtime-tokio")))]
    smol::future::yield_now().await;
}

/// Handle to a spawned background task that is cancelled when dropped.
///
/// The spawned future receives a [`CancellationToken`] it should watch so it can
/// release what it owns and exit.
///
/// ```rust
/// use sluice_runtime::BackgroundTask;
///
/// # #[tokio::main]
/// # async fn main() {
/// let task = BackgroundTask::spawn(|cancel| async move {
///     cancel.cancelled().await;
/// });
///
/// assert!(!task.is_cancelled());
/// drop(task);
/// # }
/// ```
#[derive(Debug)]
pub struct BackgroundTask {
    cancel: CancellationToken,
}

impl BackgroundTask {
    pub fn spawn<F, Fut>(f: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        spawn_detached(f(cancel.clone()));
        Self { cancel }
    }

    /// Signal the task to stop. Does not wait for it.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for BackgroundTask {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
