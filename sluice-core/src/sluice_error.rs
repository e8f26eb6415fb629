// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for sluice streams, tasks and signals
//!
//! Every failure in the toolkit is a [`SluiceError`]. Streams are terminated through a
//! single exceptional channel (`terminate_with_error`), so the same type is used as
//! the *reason* handed to a stream, as the rejection of a task or signal completion,
//! and as the error returned by a queue's `add()` call.
//!
//! # Examples
//!
//! ```
//! use sluice_core::{SluiceError, Result};
//!
//! fn produce() -> Result<()> {
//!     Err(SluiceError::cancelled("Stream was cancelled."))
//! }
//!
//! assert!(produce().unwrap_err().is_cancellation());
//! ```

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

/// Root error type for all sluice operations
///
/// The type is `Clone` because one reason may be observed by several parties: the
/// token that recorded it, the stream it was injected into and the completion that
/// reports it.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SluiceError {
    /// An operation was cancelled
    ///
    /// Carries either the caller-supplied reason or the default message of the
    /// component that was cancelled (e.g. `"Task was cancelled."`).
    #[error("{reason}")]
    Cancelled {
        /// Human readable cancellation reason
        reason: String,
    },

    /// An `AsyncQueue::add` call would have exceeded the configured buffer limit
    #[error("AsyncQueue: maximum queue size reached: {limit}")]
    Capacity {
        /// The configured `max_size` of the queue
        limit: usize,
    },

    /// Error produced by user code (a subscription or task callback)
    ///
    /// The payload is opaque and passed through unchanged.
    #[error("{0}")]
    Callback(#[source] Arc<dyn Error + Send + Sync>),

    /// The requested scheduling tier is not available on this host
    #[error("Scheduler tier `{tier}` is not supported on this host")]
    UnsupportedScheduler {
        /// Name of the unavailable tier
        tier: &'static str,
    },

    /// A signal was not settled within the allotted time
    #[error("Timed out after {after:?}")]
    Timeout {
        /// The timeout that elapsed
        after: Duration,
    },
}

impl SluiceError {
    /// Create a cancellation error with the given reason
    pub fn cancelled(reason: impl Into<String>) -> Self {
        Self::Cancelled {
            reason: reason.into(),
        }
    }

    /// Create a capacity error for a queue bounded at `limit`
    #[must_use]
    pub const fn capacity(limit: usize) -> Self {
        Self::Capacity { limit }
    }

    /// Wrap a user error
    pub fn callback(error: impl Error + Send + Sync + 'static) -> Self {
        Self::Callback(Arc::new(error))
    }

    /// Create an unsupported-tier error
    #[must_use]
    pub const fn unsupported(tier: &'static str) -> Self {
        Self::UnsupportedScheduler { tier }
    }

    /// Create a timeout error
    #[must_use]
    pub const fn timeout(after: Duration) -> Self {
        Self::Timeout { after }
    }

    /// Returns `true` for [`SluiceError::Cancelled`]
    #[must_use]
    pub const fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// Returns `true` for [`SluiceError::Capacity`]
    #[must_use]
    pub const fn is_capacity(&self) -> bool {
        matches!(self, Self::Capacity { .. })
    }

    /// Returns `true` for [`SluiceError::Callback`]
    #[must_use]
    pub const fn is_callback(&self) -> bool {
        matches!(self, Self::Callback(_))
    }

    /// Attempts to view a callback payload as a concrete user error type
    ///
    /// # Examples
    ///
    /// ```
    /// use sluice_core::SluiceError;
    ///
    /// #[derive(Debug, thiserror::Error)]
    /// #[error("disk full")]
    /// struct DiskFull;
    ///
    /// let err = SluiceError::callback(DiskFull);
    /// assert!(err.downcast_callback_ref::<DiskFull>().is_some());
    /// ```
    #[must_use]
    pub fn downcast_callback_ref<E: Error + 'static>(&self) -> Option<&E> {
        match self {
            Self::Callback(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }
}

/// Specialized Result type for sluice operations
pub type Result<T> = std::result::Result<T, SluiceError>;

/// Extension trait for converting user errors into [`SluiceError::Callback`]
///
/// Implemented for every `std::error::Error + Send + Sync + 'static`, so callbacks can
/// write `do_work().map_err(IntoSluiceError::into_sluice)?`.
pub trait IntoSluiceError {
    /// Convert this error into a callback error
    fn into_sluice(self) -> SluiceError;
}

impl<E: Error + Send + Sync + 'static> IntoSluiceError for E {
    fn into_sluice(self) -> SluiceError {
        SluiceError::callback(self)
    }
}

/// Helper trait mapping foreign `Result`s into sluice results
pub trait ResultExt<T> {
    /// Wrap the error side as a [`SluiceError::Callback`]
    ///
    /// # Errors
    /// Returns `Err(SluiceError::Callback)` if the underlying result is `Err`.
    fn into_callback_result(self) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Error + Send + Sync + 'static,
{
    fn into_callback_result(self) -> Result<T> {
        self.map_err(SluiceError::callback)
    }
}
