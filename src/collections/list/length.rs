use std::num::NonZero;

/// The length of a non-empty [`List`](super::List). An empty list has no contents at all, so a
/// zero length is unrepresentable.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) struct Length(pub NonZero<usize>);

impl Length {
    pub const fn new(value: usize) -> Option<Length> {
        match NonZero::new(value) {
            Some(res) => Some(Length(res)),
            None => None,
        }
    }

    pub const fn checked_add(self, other: usize) -> Option<Length> {
        match self.0.checked_add(other) {
            Some(res) => Some(Length(res)),
            None => None,
        }
    }

    /// Returns [`None`] if the result would be zero or less.
    pub const fn checked_sub(self, other: usize) -> Option<Length> {
        match self.0.get().checked_sub(other) {
            Some(res) => Length::new(res),
            None => None,
        }
    }

    pub const fn get(self) -> usize {
        self.0.get()
    }
}

pub(crate) const ONE: Length = Length(NonZero::<usize>::MIN);
