//! Allocation capabilities that containers are constructed with.
//!
//! Every container in this crate borrows an [`Allocator`] for its entire lifetime and routes all
//! growth and release of heap memory through it. There is no global allocator state: two lists
//! built from two different allocators never share memory, and an allocator must outlive every
//! container that borrows it (which the borrow checker enforces).
//!
//! The trait mirrors the classic `alloc` / `realloc` / `free` triple, with two additions that
//! make it usable with Rust's own allocator: the size of a block is passed back when it is
//! reallocated or released, and all blocks share a single fixed alignment, [`ALIGN`].

use std::alloc::{self, Layout};
use std::ptr::NonNull;

mod counting;
mod fn_alloc;
mod tests;

pub use counting::*;
pub use fn_alloc::*;
#[doc(inline)]
pub use crate::util::error::AllocError;

/// The alignment of every block handed out by an [`Allocator`]. This matches the alignment of
/// `max_align_t` on common 64-bit targets, so any block can hold a value of any primitive type.
pub const ALIGN: usize = 16;

/// A source of heap memory for containers.
///
/// # Safety
/// Implementors must guarantee that:
/// - Every pointer returned by [`allocate`](Allocator::allocate) or
///   [`reallocate`](Allocator::reallocate) is aligned to [`ALIGN`] and valid for reads and writes
///   of the requested number of bytes until it is reallocated or released.
/// - [`reallocate`](Allocator::reallocate) preserves the first `min(old_size, new_size)` bytes
///   of the block and, on failure, leaves the original block untouched and still valid.
pub unsafe trait Allocator {
    /// Allocates a block of `size` bytes. The contents of the block are unspecified.
    ///
    /// # Errors
    /// Returns an [`AllocError`] if the request can't be satisfied, including when `size` is 0.
    fn allocate(&self, size: usize) -> Result<NonNull<u8>, AllocError>;

    /// Resizes the block at `ptr` from `old_size` to `new_size` bytes, possibly moving it.
    ///
    /// # Errors
    /// Returns an [`AllocError`] if the request can't be satisfied, in which case `ptr` remains
    /// valid.
    ///
    /// # Safety
    /// `ptr` must have been returned by this allocator with a current size of `old_size`, and
    /// `new_size` must be non-zero.
    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_size: usize,
        new_size: usize,
    ) -> Result<NonNull<u8>, AllocError>;

    /// Releases the block at `ptr`, which has a current size of `size`.
    ///
    /// # Safety
    /// `ptr` must have been returned by this allocator with a current size of `size`, and must
    /// not be used after this call.
    unsafe fn release(&self, ptr: NonNull<u8>, size: usize);
}

// SAFETY: Forwards to an allocator which upholds the contract itself.
unsafe impl<A: Allocator + ?Sized> Allocator for &A {
    fn allocate(&self, size: usize) -> Result<NonNull<u8>, AllocError> {
        (**self).allocate(size)
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_size: usize,
        new_size: usize,
    ) -> Result<NonNull<u8>, AllocError> {
        // SAFETY: The caller upholds the contract.
        unsafe { (**self).reallocate(ptr, old_size, new_size) }
    }

    unsafe fn release(&self, ptr: NonNull<u8>, size: usize) {
        // SAFETY: The caller upholds the contract.
        unsafe { (**self).release(ptr, size) }
    }
}

/// An [`Allocator`] backed by Rust's global allocator ([`std::alloc`]).
///
/// # Examples
/// ```
/// # use container_lib::alloc::{Allocator, SystemAllocator, ALIGN};
/// let ptr = SystemAllocator.allocate(64).unwrap();
/// assert_eq!(ptr.as_ptr() as usize % ALIGN, 0);
/// unsafe { SystemAllocator.release(ptr, 64) };
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SystemAllocator;

impl SystemAllocator {
    fn layout(size: usize) -> Result<Layout, AllocError> {
        match size {
            0 => Err(AllocError { size }),
            _ => Layout::from_size_align(size, ALIGN).map_err(|_| AllocError { size }),
        }
    }
}

// SAFETY: Every layout requested from std::alloc uses ALIGN, and std::alloc::realloc preserves
// contents and leaves the block intact on failure.
unsafe impl Allocator for SystemAllocator {
    fn allocate(&self, size: usize) -> Result<NonNull<u8>, AllocError> {
        let layout = SystemAllocator::layout(size)?;
        // SAFETY: Zero-sized layouts have been guarded against.
        NonNull::new(unsafe { alloc::alloc(layout) }).ok_or(AllocError { size })
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_size: usize,
        new_size: usize,
    ) -> Result<NonNull<u8>, AllocError> {
        // Validates that new_size rounded up to ALIGN doesn't overflow isize::MAX.
        SystemAllocator::layout(new_size)?;
        // SAFETY: ptr was allocated by std::alloc with ALIGN and old_size, which was a valid
        // layout at the time. new_size is non-zero and valid with ALIGN.
        let new_ptr = unsafe {
            alloc::realloc(
                ptr.as_ptr(),
                Layout::from_size_align_unchecked(old_size, ALIGN),
                new_size,
            )
        };
        NonNull::new(new_ptr).ok_or(AllocError { size: new_size })
    }

    unsafe fn release(&self, ptr: NonNull<u8>, size: usize) {
        // SAFETY: The caller guarantees that ptr was allocated here with size, so the layout was
        // already checked when the block was created.
        unsafe { alloc::dealloc(ptr.as_ptr(), Layout::from_size_align_unchecked(size, ALIGN)) }
    }
}
