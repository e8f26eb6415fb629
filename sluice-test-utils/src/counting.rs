// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::StreamProbe;
use async_trait::async_trait;
use sluice_core::{AsyncStream, Outcome, Result, SluiceError};
use std::time::Duration;

/// Yields `0..max`, sleeping `delay` before each value, then finishes with `true`.
///
/// Terminal replays finish with `false` (the `bool` default).
///
/// ```rust
/// use sluice_core::{AsyncStream, Outcome};
/// use sluice_test_utils::CountingStream;
/// use std::time::Duration;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut stream = CountingStream::new(1, Duration::ZERO);
/// assert_eq!(stream.advance(()).await.unwrap(), Outcome::Yielded(0));
/// assert_eq!(stream.advance(()).await.unwrap(), Outcome::Finished(true));
/// assert_eq!(stream.advance(()).await.unwrap(), Outcome::Finished(false));
/// # }
/// ```
#[derive(Debug)]
pub struct CountingStream {
    max: u32,
    delay: Duration,
    next: u32,
    done: bool,
    probe: StreamProbe,
}

impl CountingStream {
    pub fn new(max: u32, delay: Duration) -> Self {
        Self::with_probe(max, delay, StreamProbe::new())
    }

    pub fn with_probe(max: u32, delay: Duration, probe: StreamProbe) -> Self {
        Self {
            max,
            delay,
            next: 0,
            done: false,
            probe,
        }
    }

    pub fn probe(&self) -> StreamProbe {
        self.probe.clone()
    }

    fn close(&mut self) {
        self.done = true;
        self.probe.record_cleanup();
    }
}

#[async_trait]
impl AsyncStream for CountingStream {
    type Item = u32;
    type Return = bool;
    type Next = ();

    async fn advance(&mut self, _next: ()) -> Result<Outcome<u32, bool>> {
        if self.done {
            return Ok(Outcome::Finished(false));
        }
        self.probe.record_advance();

        if self.next >= self.max {
            self.close();
            return Ok(Outcome::Finished(true));
        }

        tokio::time::sleep(self.delay).await;
        let value = self.next;
        self.next += 1;
        Ok(Outcome::Yielded(value))
    }

    async fn terminate_with_error(&mut self, reason: SluiceError) -> Result<Outcome<u32, bool>> {
        if self.done {
            return Ok(Outcome::Finished(false));
        }
        self.probe.record_error(&reason);
        self.close();
        Err(reason)
    }

    async fn terminate_gracefully(&mut self) -> Result<Outcome<u32, bool>> {
        if !self.done {
            self.close();
        }
        Ok(Outcome::Finished(false))
    }
}
