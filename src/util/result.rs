use std::error::Error;

use crate::util::error::CapacityOverflow;

pub(crate) trait ResultExtension<T, E: Error> {
    /// A method similar to [`Result::unwrap`], except that it applies only to types which implement
    /// [`Error`] and panics with the message of the error itself.
    ///
    /// # Panics
    /// Panics if the [`Result`] is an [`Err`].
    fn throw(self) -> T;
}

impl<T, E: Error> ResultExtension<T, E> for Result<T, E> {
    #[track_caller]
    fn throw(self) -> T {
        match self {
            Ok(val) => val,
            Err(error) => panic!("{}", error),
        }
    }
}

pub(crate) trait OverflowExtension<T> {
    /// Converts the [`None`] produced by a checked arithmetic operation into a [`CapacityOverflow`]
    /// panic. Size arithmetic overflowing is never recoverable, so there is no `Result` form.
    ///
    /// # Panics
    /// Panics if the value is [`None`].
    fn or_overflow(self) -> T;
}

impl<T> OverflowExtension<T> for Option<T> {
    #[track_caller]
    fn or_overflow(self) -> T {
        self.ok_or(CapacityOverflow).throw()
    }
}
