//! A growable, NUL-terminated string buffer.

mod str_buf;

pub use str_buf::*;
