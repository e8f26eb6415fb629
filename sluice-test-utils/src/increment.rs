// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use async_trait::async_trait;
use sluice_core::{AsyncStream, Outcome, Result, SluiceError};

/// A feedback stream: yields `initial + 1` first, then `next + 1` for every value it
/// is resumed with, `max` times in total.
///
/// Resuming with `value * 2` produces `1, 3, 7, 15, 31`.
#[derive(Debug)]
pub struct IncrementStream {
    max: usize,
    initial: u64,
    count: usize,
    done: bool,
}

impl IncrementStream {
    pub fn new(max: usize) -> Self {
        Self::starting_at(max, 0)
    }

    pub fn starting_at(max: usize, initial: u64) -> Self {
        Self {
            max,
            initial,
            count: 0,
            done: false,
        }
    }
}

#[async_trait]
impl AsyncStream for IncrementStream {
    type Item = u64;
    type Return = ();
    type Next = u64;

    async fn advance(&mut self, next: u64) -> Result<Outcome<u64>> {
        if self.done || self.count >= self.max {
            self.done = true;
            return Ok(Outcome::Finished(()));
        }
        // The resumption value of the very first pull carries no information
        let base = if self.count == 0 { self.initial } else { next };
        self.count += 1;
        Ok(Outcome::Yielded(base + 1))
    }

    async fn terminate_with_error(&mut self, reason: SluiceError) -> Result<Outcome<u64>> {
        if self.done {
            return Ok(Outcome::Finished(()));
        }
        self.done = true;
        Err(reason)
    }

    async fn terminate_gracefully(&mut self) -> Result<Outcome<u64>> {
        self.done = true;
        Ok(Outcome::Finished(()))
    }
}
