// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// The result of one step of an [`AsyncStream`](crate::AsyncStream).
///
/// A stream either yields a value (and may be advanced again) or finishes with its
/// return value, which is distinct from the per-item values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome<T, R = ()> {
    /// The stream produced a value and is suspended
    Yielded(T),
    /// The stream completed with its return value
    Finished(R),
}

impl<T, R> Outcome<T, R> {
    /// Returns `true` if this is a `Yielded` outcome.
    pub const fn is_yielded(&self) -> bool {
        matches!(self, Outcome::Yielded(_))
    }

    /// Returns `true` if this is a `Finished` outcome.
    pub const fn is_finished(&self) -> bool {
        matches!(self, Outcome::Finished(_))
    }

    /// Converts into the yielded value, discarding a return value.
    pub fn yielded(self) -> Option<T> {
        match self {
            Outcome::Yielded(value) => Some(value),
            Outcome::Finished(_) => None,
        }
    }

    /// Converts into the return value, discarding a yielded value.
    pub fn finished(self) -> Option<R> {
        match self {
            Outcome::Yielded(_) => None,
            Outcome::Finished(value) => Some(value),
        }
    }

    /// Maps the yielded value, leaving a return value untouched.
    pub fn map<U, F>(self, f: F) -> Outcome<U, R>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Outcome::Yielded(value) => Outcome::Yielded(f(value)),
            Outcome::Finished(value) => Outcome::Finished(value),
        }
    }

    /// Maps the return value, leaving a yielded value untouched.
    pub fn map_finished<Q, F>(self, f: F) -> Outcome<T, Q>
    where
        F: FnOnce(R) -> Q,
    {
        match self {
            Outcome::Yielded(value) => Outcome::Yielded(value),
            Outcome::Finished(value) => Outcome::Finished(f(value)),
        }
    }
}
