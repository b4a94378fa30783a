use derive_more::{Display, Error, From, IsVariant, TryInto};

/// An index (possibly negative, counting back from the end) that doesn't resolve to an element.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[display("Index {index} out of bounds for collection with {len} elements!")]
pub struct IndexOutOfBounds {
    pub index: isize,
    pub len: usize,
}

/// A range whose end resolves to a position before its start.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[display("Range {start}..{end} ends before it starts!")]
pub struct InvalidRange {
    pub start: isize,
    pub end: isize,
}

/// The allocator was unable to provide a block of `size` bytes.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[display("Allocation of {size} bytes failed!")]
pub struct AllocError {
    pub size: usize,
}

/// A size computation exceeded `usize::MAX`.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[display("Capacity overflow!")]
pub struct CapacityOverflow;

/// Errors returned by fallible [`List`](crate::collections::list::List) operations.
#[derive(Debug, Display, Error, From, TryInto, IsVariant, Clone, Copy, PartialEq, Eq)]
pub enum ListError {
    IndexOutOfBounds(IndexOutOfBounds),
    InvalidRange(InvalidRange),
    AllocError(AllocError),
}

/// Errors returned by fallible [`StrBuf`](crate::collections::str_buf::StrBuf) operations.
#[derive(Debug, Display, Error, From, TryInto, IsVariant, Clone, Copy, PartialEq, Eq)]
pub enum StrBufError {
    IndexOutOfBounds(IndexOutOfBounds),
    InvalidRange(InvalidRange),
    AllocError(AllocError),
}
