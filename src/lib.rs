//! Allocator-aware containers for untyped data and C strings, plus the small toolkit built on top
//! of them: a leveled logger and a process launcher.
//!
//! # Purpose
//! Every container here gets its memory from an [`Allocator`](alloc::Allocator) it borrows,
//! rather than from global state. This makes it possible to count, restrict or replace the memory
//! used by each container individually, down to plugging in `malloc` from libc.
//!
//! # Error Handling
//! Fallible operations come in pairs. The `try_*` form returns a [`Result`] with a strongly typed
//! error, an enum of small structs that implement [`Error`](std::error::Error). The plain form
//! panics with the message of that same error, which is usually what a caller wants: an index out
//! of bounds is a bug, and an allocation failure is rarely recoverable.
//!
//! # Dependencies
//! The [`builder`] module relies on `libc` for `fork`, `execvp` and `waitpid`, and the
//! [`FnAllocator::malloc`](alloc::FnAllocator::malloc) allocator on its `malloc` family. This crate also
//! depends on some derive macros because they remove the need for some very repetitive
//! programming.

// #![warn(missing_docs)]
#![warn(clippy::missing_safety_doc)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::missing_const_for_fn)]
#![warn(clippy::missing_panics_doc)]
#![warn(clippy::unwrap_used)]
#![allow(clippy::module_inception)]

pub mod alloc;
#[cfg(feature = "builder")]
pub mod builder;
pub mod collections;
pub mod cstr;
#[cfg(feature = "logger")]
pub mod logger;

pub(crate) mod util;
