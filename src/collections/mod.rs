//! Containers whose memory comes from a borrowed [`Allocator`](crate::alloc::Allocator).
//!
//! # Method
//! Both containers store raw bytes: a [`List`](list::List) holds elements of any size, chosen per
//! element, and a [`StrBuf`](str_buf::StrBuf) holds NUL-terminated text. Typed access on top of
//! the bytes is opt-in and `unsafe` where the container can't check it.

#[cfg(feature = "list")]
pub mod list;
#[cfg(feature = "str-buf")]
pub mod str_buf;
