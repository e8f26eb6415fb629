// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Tiered scheduling of deferred callbacks.
//!
//! A [`Tier`] decides *when* a callback runs relative to other work:
//!
//! | Tier              | Fires                                                    |
//! |-------------------|----------------------------------------------------------|
//! | `Microtask`       | after one cooperative yield of the current task          |
//! | `Task`            | after the runtime's minimum timer delay ([`TASK_MIN_DELAY`]) |
//! | `Delay(d)`        | after `d`                                                |
//! | `Frame`           | at the next frame of the installed [`FrameSource`]       |
//!
//! A scheduler without a frame source reports `Frame` as unsupported instead of
//! falling back to a timer.

use crate::task::{spawn_task, TaskHandle};
use core::fmt::Debug;
use core::future::Future;
use core::time::Duration;
use futures::future::BoxFuture;
use futures::FutureExt;
use sluice_core::{CancellationToken, Result, SluiceError};
use sluice_runtime::{yield_now, DefaultTimer, Timer};
use std::sync::Arc;

/// Smallest delay of the `Task` tier.
pub const TASK_MIN_DELAY: Duration = Duration::from_millis(1);

/// Refresh interval of [`IntervalFrames::new`] (60 Hz).
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

pub(crate) const MICROTASK_CANCELLED: &str = "Microtask was cancelled.";
pub(crate) const TASK_CANCELLED: &str = "Task was cancelled.";
pub(crate) const FRAME_CANCELLED: &str = "Frame task was cancelled.";

/// Scheduling class of a deferred callback, ordered soonest to latest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    Microtask,
    Task,
    Delay(Duration),
    Frame,
}

impl Tier {
    /// Short name used in diagnostics and `UnsupportedScheduler` errors.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Microtask => "microtask",
            Self::Task => "task",
            Self::Delay(_) => "delay",
            Self::Frame => "frame",
        }
    }

    const fn default_reason(&self) -> &'static str {
        match self {
            Self::Microtask => MICROTASK_CANCELLED,
            Self::Task | Self::Delay(_) => TASK_CANCELLED,
            Self::Frame => FRAME_CANCELLED,
        }
    }
}

/// A display-refresh signal for the `Frame` tier.
pub trait FrameSource: Send + Sync + Debug {
    /// Resolves at the next frame.
    fn next_frame(&self) -> BoxFuture<'static, ()>;
}

/// A [`FrameSource`] ticking at a fixed interval on the runtime timer.
///
/// Frames are aligned to the moment the source was created, so every waiter
/// scheduled within the same interval fires on the same tick.
#[derive(Debug, Clone)]
pub struct IntervalFrames<TM: Timer = DefaultTimer> {
    timer: TM,
    interval: Duration,
    origin: TM::Instant,
}

impl IntervalFrames<DefaultTimer> {
    /// 60 Hz frames on the default runtime.
    pub fn new() -> Self {
        Self::with_interval(DEFAULT_FRAME_INTERVAL)
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self::with_timer(DefaultTimer::default(), interval)
    }
}

impl Default for IntervalFrames<DefaultTimer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<TM: Timer> IntervalFrames<TM> {
    pub fn with_timer(timer: TM, interval: Duration) -> Self {
        let origin = timer.now();
        Self {
            timer,
            interval,
            origin,
        }
    }

    pub const fn interval(&self) -> Duration {
        self.interval
    }

    fn until_next_frame(&self) -> Duration {
        let period = self.interval.as_nanos();
        if period == 0 {
            return Duration::ZERO;
        }
        let elapsed = (self.timer.now() - self.origin).as_nanos();
        let remaining = period - elapsed % period;
        Duration::from_nanos(u64::try_from(remaining).unwrap_or(u64::MAX))
    }
}

impl<TM: Timer> FrameSource for IntervalFrames<TM> {
    fn next_frame(&self) -> BoxFuture<'static, ()> {
        self.timer.sleep_future(self.until_next_frame()).boxed()
    }
}

/// Schedules callbacks on the tiers supported by its timer and frame source.
///
/// ```
/// use sluice_exec::{Scheduler, Tier};
///
/// # #[tokio::main]
/// # async fn main() {
/// let scheduler = Scheduler::new();
/// assert!(!scheduler.supports(Tier::Frame));
///
/// let handle = scheduler.schedule(Tier::Microtask, || async { Ok("soon") }, None).unwrap();
/// assert_eq!(handle.await.unwrap(), "soon");
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Scheduler<TM: Timer = DefaultTimer> {
    timer: TM,
    frames: Option<Arc<dyn FrameSource>>,
}

impl Scheduler<DefaultTimer> {
    pub fn new() -> Self {
        Self::with_timer(DefaultTimer::default())
    }
}

impl Default for Scheduler<DefaultTimer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<TM: Timer> Scheduler<TM> {
    pub fn with_timer(timer: TM) -> Self {
        Self {
            timer,
            frames: None,
        }
    }

    /// Install a frame source, enabling the `Frame` tier.
    #[must_use]
    pub fn with_frame_source(mut self, frames: impl FrameSource + 'static) -> Self {
        self.frames = Some(Arc::new(frames));
        self
    }

    pub fn timer(&self) -> &TM {
        &self.timer
    }

    /// Returns `true` if [`schedule`](Self::schedule) accepts `tier`.
    pub fn supports(&self, tier: Tier) -> bool {
        !matches!(tier, Tier::Frame) || self.frames.is_some()
    }

    /// Run `callback` on `tier`, optionally linked to an abort token.
    ///
    /// # Errors
    /// Returns [`SluiceError::UnsupportedScheduler`] if `tier` is `Frame` and no frame
    /// source is installed.
    pub fn schedule<F, Fut, T>(
        &self,
        tier: Tier,
        callback: F,
        abort: Option<CancellationToken>,
    ) -> Result<TaskHandle<T>>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        let wait = self.wait_for(tier)?;
        sluice_core::trace!("scheduling callback on {} tier", tier.name());
        Ok(spawn_task(wait, callback, abort, tier.default_reason()))
    }

    fn wait_for(&self, tier: Tier) -> Result<BoxFuture<'static, Result<()>>> {
        let wait: BoxFuture<'static, Result<()>> = match tier {
            Tier::Microtask => yield_now().map(Ok).boxed(),
            Tier::Task => self.timer.sleep_future(TASK_MIN_DELAY).map(Ok).boxed(),
            Tier::Delay(duration) => self.timer.sleep_future(duration).map(Ok).boxed(),
            Tier::Frame => match &self.frames {
                Some(frames) => frames.next_frame().map(Ok).boxed(),
                None => return Err(SluiceError::unsupported(tier.name())),
            },
        };
        Ok(wait)
    }
}

/// Run `callback` after the current task yields once.
pub fn microtask<F, Fut, T>(callback: F) -> TaskHandle<T>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
    T: Send + 'static,
{
    spawn_task(yield_now().map(Ok), callback, None, MICROTASK_CANCELLED)
}

/// Run `callback` on the timer tier after [`TASK_MIN_DELAY`].
pub fn task<F, Fut, T>(callback: F) -> TaskHandle<T>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
    T: Send + 'static,
{
    let sleep = DefaultTimer::default().sleep_future(TASK_MIN_DELAY);
    spawn_task(sleep.map(Ok), callback, None, TASK_CANCELLED)
}

/// Run `callback` after `duration`, unless cancelled or `abort` fires first.
pub fn delay<F, Fut, T>(
    callback: F,
    duration: Duration,
    abort: Option<CancellationToken>,
) -> TaskHandle<T>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
    T: Send + 'static,
{
    let sleep = DefaultTimer::default().sleep_future(duration);
    spawn_task(sleep.map(Ok), callback, abort, TASK_CANCELLED)
}
