// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use async_trait::async_trait;
use core::time::Duration;
use event_listener::Event;
use futures::future::{self, Either};
use sluice_core::sluice_mutex::Mutex;
use sluice_core::{AsyncStream, CancellationToken, Outcome, Result, SluiceError, Step};
use sluice_exec::{delay, TaskCanceller};
use sluice_runtime::BackgroundTask;
use std::sync::Arc;

/// How the consumer of a [`Debounce`] asked it to stop.
enum Request {
    Error(SluiceError),
    Graceful,
}

impl Request {
    /// The answer to a termination request once the source is already gone.
    fn answer<T>(self) -> Step<T, ()> {
        match self {
            Self::Error(reason) => Err(reason),
            Self::Graceful => Ok(Outcome::Finished(())),
        }
    }
}

struct State<T> {
    /// Latest value whose window elapsed, waiting for the output side
    ready: Option<T>,
    window: Option<TaskCanceller>,
    // Bumped on every restart so a superseded window cannot publish
    generation: u64,
    failure: Option<SluiceError>,
    source_done: bool,
    request: Option<Request>,
    report: Option<Result<()>>,
}

impl<T> State<T> {
    fn cancel_window(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if let Some(window) = self.window.take() {
            window.cancel();
        }
    }
}

struct Shared<T> {
    state: Mutex<State<T>>,
    changed: Event,
}

impl<T: Send + 'static> Shared<T> {
    fn update<R>(&self, change: impl FnOnce(&mut State<T>) -> R) -> R {
        let result = change(&mut self.state.lock());
        self.changed.notify(usize::MAX);
        result
    }

    fn restart_window(self: &Arc<Self>, value: T, window: Duration) {
        let mut state = self.state.lock();
        state.cancel_window();

        let generation = state.generation;
        let shared = Arc::clone(self);
        let handle = delay(
            move || async move {
                shared.publish(generation, value);
                Ok(())
            },
            window,
            None,
        );
        state.window = Some(handle.canceller());
    }

    fn publish(&self, generation: u64, value: T) {
        self.update(|state| {
            if state.generation == generation {
                state.window = None;
                state.ready = Some(value);
            }
        });
    }
}

/// Debounced view of a stream, see [`debounce`](crate::debounce).
///
/// The source is consumed by a background task, so source values keep arriving
/// (and restarting the window) while the output side is not being pulled. Only the
/// latest published value is kept.
///
/// Dropping the stream stops the background task, which closes the source with
/// `terminate_gracefully`.
///
/// Terminating or dropping abandons the source's in-flight `advance` before the
/// source is terminated. Work that call had started, such as a running
/// `map_async` transform, is discarded.
pub struct Debounce<T> {
    shared: Arc<Shared<T>>,
    consumer: BackgroundTask,
    done: bool,
}

impl<T: Send + 'static> Debounce<T> {
    pub fn new<S>(source: S, window: Duration) -> Self
    where
        S: AsyncStream<Item = T, Next = ()> + 'static,
    {
        let shared = Arc::new(Shared {
            state: Mutex::new(State {
                ready: None,
                window: None,
                generation: 0,
                failure: None,
                source_done: false,
                request: None,
                report: None,
            }),
            changed: Event::new(),
        });

        let worker = shared.clone();
        let consumer = BackgroundTask::spawn(move |stop| consume(source, worker, window, stop));

        Self {
            shared,
            consumer,
            done: false,
        }
    }

    async fn terminate(&mut self, request: Request) -> Step<T, ()> {
        if self.done {
            return Ok(Outcome::Finished(()));
        }
        self.done = true;

        {
            let mut state = self.shared.state.lock();
            state.cancel_window();
            state.ready = None;
            if state.source_done {
                state.failure = None;
                return request.answer();
            }
            state.request = Some(request);
        }
        self.consumer.cancel();

        loop {
            let listener = {
                let mut state = self.shared.state.lock();
                if let Some(report) = state.report.take() {
                    return report.map(|()| Outcome::Finished(()));
                }
                // The source ended on its own before the consumer saw the request
                if state.source_done {
                    if let Some(request) = state.request.take() {
                        state.failure = None;
                        return request.answer();
                    }
                }
                self.shared.changed.listen()
            };
            listener.await;
        }
    }
}

async fn consume<S>(
    mut source: S,
    shared: Arc<Shared<S::Item>>,
    window: Duration,
    stop: CancellationToken,
) where
    S: AsyncStream<Next = ()>,
    S::Item: 'static,
{
    loop {
        let step = match future::select(stop.cancelled(), source.advance(())).await {
            Either::Left(_) => None,
            Either::Right((step, _)) => Some(step),
        };

        match step {
            None => {
                shutdown(&mut source, &shared).await;
                return;
            }
            Some(Ok(Outcome::Yielded(value))) => {
                sluice_core::trace!("debounce: window restarted");
                shared.restart_window(value, window);
            }
            Some(Ok(Outcome::Finished(_))) => {
                shared.update(|state| state.source_done = true);
                return;
            }
            Some(Err(error)) => {
                sluice_core::debug!("debounce: source failed: {}", error);
                shared.update(|state| {
                    state.cancel_window();
                    state.failure = Some(error);
                    state.source_done = true;
                });
                return;
            }
        }
    }
}

async fn shutdown<S>(source: &mut S, shared: &Shared<S::Item>)
where
    S: AsyncStream<Next = ()>,
    S::Item: 'static,
{
    let request = shared.update(|state| {
        state.cancel_window();
        state.ready = None;
        state.request.take()
    });

    // No request means the stream was dropped
    let step = match request {
        Some(Request::Error(reason)) => source.terminate_with_error(reason).await,
        Some(Request::Graceful) | None => source.terminate_gracefully().await,
    };

    // A value the source produced while cleaning up has nowhere to go
    let report = step.map(|_| ());
    shared.update(|state| {
        state.source_done = true;
        state.report = Some(report);
    });
}

#[async_trait]
impl<T: Send + 'static> AsyncStream for Debounce<T> {
    type Item = T;
    type Return = ();
    type Next = ();

    async fn advance(&mut self, _next: ()) -> Step<T, ()> {
        if self.done {
            return Ok(Outcome::Finished(()));
        }

        loop {
            let listener = {
                let mut state = self.shared.state.lock();
                if let Some(value) = state.ready.take() {
                    return Ok(Outcome::Yielded(value));
                }
                if let Some(error) = state.failure.take() {
                    self.done = true;
                    return Err(error);
                }
                if state.source_done && state.window.is_none() {
                    self.done = true;
                    return Ok(Outcome::Finished(()));
                }
                self.shared.changed.listen()
            };
            listener.await;
        }
    }

    async fn terminate_with_error(&mut self, reason: SluiceError) -> Step<T, ()> {
        self.terminate(Request::Error(reason)).await
    }

    async fn terminate_gracefully(&mut self) -> Step<T, ()> {
        self.terminate(Request::Graceful).await
    }
}

impl<T> Drop for Debounce<T> {
    fn drop(&mut self) {
        self.shared.state.lock().cancel_window();
    }
}

impl<T> core::fmt::Debug for Debounce<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("Debounce")
            .field("pending", &state.window.is_some())
            .field("ready", &state.ready.is_some())
            .field("source_done", &state.source_done)
            .field("done", &self.done)
            .finish()
    }
}
