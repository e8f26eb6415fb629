// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use sluice_core::{AsyncStream, Outcome, Result};

/// Let spawned drivers run until they block again.
///
/// Yields repeatedly instead of sleeping so a paused clock does not move.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

/// Pull every value out of `stream`, returning the values and the final return value.
///
/// # Errors
/// Returns the first error the stream fails with.
pub async fn drain<S>(stream: &mut S) -> Result<(Vec<S::Item>, S::Return)>
where
    S: AsyncStream<Next = ()> + ?Sized,
{
    let mut values = Vec::new();
    loop {
        match stream.advance(()).await? {
            Outcome::Yielded(value) => values.push(value),
            Outcome::Finished(value) => return Ok((values, value)),
        }
    }
}
