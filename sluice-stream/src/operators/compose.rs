// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// Apply operators to a stream left to right.
///
/// `compose!(stream, a, b, c)` is `c.apply(b.apply(a.apply(stream)))`.
///
/// ```
/// use sluice_core::from_stream;
/// use sluice_stream::{compose, filter, map};
/// use sluice_test_utils::drain;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut pipeline = compose!(
///     from_stream(futures::stream::iter(0..5)),
///     map(|value: i32| value * 2),
///     filter(|value: &i32| *value > 2),
/// );
///
/// let (values, ()) = drain(&mut pipeline).await.unwrap();
/// assert_eq!(values, vec![4, 6, 8]);
/// # }
/// ```
#[macro_export]
macro_rules! compose {
    ($stream:expr $(,)?) => {
        $stream
    };
    ($stream:expr, $operator:expr $(, $rest:expr)* $(,)?) => {
        $crate::compose!($crate::Operator::apply($operator, $stream) $(, $rest)*)
    };
}
