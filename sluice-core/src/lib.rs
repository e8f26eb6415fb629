// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Core contract and shared primitives of the sluice toolkit.
//!
//! - [`AsyncStream`] - the bidirectional stream contract (`advance`,
//!   `terminate_with_error`, `terminate_gracefully`)
//! - [`Outcome`] - one step of a stream: yielded value or final return value
//! - [`SluiceError`] - the error taxonomy shared by every crate
//! - [`CancellationToken`] - cloneable, first-reason-wins abort source
//! - [`from_stream`] / [`IntoFuturesStream`] - interop with `futures::Stream`

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

extern crate alloc;

pub mod async_stream;
pub mod cancellation_token;
pub mod into_stream;
#[doc(hidden)]
pub mod logging;
pub mod outcome;
pub mod sluice_error;
pub mod sluice_mutex;

pub use self::async_stream::{AsyncStream, BoxAsyncStream, Step};
pub use self::cancellation_token::{CancellationToken, Cancelled};
pub use self::into_stream::{from_stream, IntoFuturesStream, StreamSource};
pub use self::outcome::Outcome;
pub use self::sluice_error::{IntoSluiceError, Result, ResultExt, SluiceError};

// Re-exported so implementors can name the attribute without a direct dependency
pub use async_trait::async_trait;
