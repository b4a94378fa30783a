use std::ffi::c_void;
use std::fmt::{self, Debug, Formatter};
use std::ptr::NonNull;

use super::{ALIGN, AllocError, Allocator};

/// Signature of a C-style `malloc`.
pub type AllocFn = unsafe extern "C" fn(usize) -> *mut c_void;
/// Signature of a C-style `realloc`.
pub type ReallocFn = unsafe extern "C" fn(*mut c_void, usize) -> *mut c_void;
/// Signature of a C-style `free`.
pub type FreeFn = unsafe extern "C" fn(*mut c_void);

/// An [`Allocator`] made from a triple of C-style allocation functions. Unlike the size-aware
/// trait methods, the functions never learn the size of the block being resized or released.
#[derive(Clone, Copy)]
pub struct FnAllocator {
    alloc: AllocFn,
    realloc: ReallocFn,
    free: FreeFn,
}

impl FnAllocator {
    /// Bundles the provided functions into an allocator.
    ///
    /// # Safety
    /// The functions must behave like the C standard library's `malloc`, `realloc` and `free`,
    /// returning null on failure, preserving contents when resizing, and producing pointers
    /// aligned to at least [`ALIGN`].
    pub const unsafe fn from_fns(alloc: AllocFn, realloc: ReallocFn, free: FreeFn) -> FnAllocator {
        FnAllocator { alloc, realloc, free }
    }

    /// Creates an allocator from the C library's `malloc`, `realloc` and `free`.
    ///
    /// # Examples
    /// ```
    /// # use container_lib::alloc::FnAllocator;
    /// # use container_lib::collections::list::List;
    /// let alloc = FnAllocator::malloc();
    /// let mut list = List::new(&alloc);
    /// list.append(b"hello");
    /// assert_eq!(list.get(-1), b"hello");
    /// ```
    #[cfg(feature = "malloc")]
    pub fn malloc() -> FnAllocator {
        // SAFETY: The C library's allocation functions fulfil the contract by definition, and
        // glibc / musl align allocations to max_align_t, which is 16 bytes on 64-bit targets.
        unsafe { FnAllocator::from_fns(libc::malloc, libc::realloc, libc::free) }
    }
}

// SAFETY: The caller of from_fns guarantees that the functions behave like malloc / realloc / free.
unsafe impl Allocator for FnAllocator {
    fn allocate(&self, size: usize) -> Result<NonNull<u8>, AllocError> {
        if size == 0 {
            return Err(AllocError { size });
        }
        // SAFETY: alloc behaves like malloc, which accepts any size.
        let ptr = NonNull::new(unsafe { (self.alloc)(size) }.cast::<u8>())
            .ok_or(AllocError { size })?;
        debug_assert_eq!(ptr.as_ptr().align_offset(ALIGN), 0);
        Ok(ptr)
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        _old_size: usize,
        new_size: usize,
    ) -> Result<NonNull<u8>, AllocError> {
        // SAFETY: ptr came from alloc or realloc, new_size is non-zero.
        let new_ptr = unsafe { (self.realloc)(ptr.as_ptr().cast(), new_size) };
        NonNull::new(new_ptr.cast::<u8>()).ok_or(AllocError { size: new_size })
    }

    unsafe fn release(&self, ptr: NonNull<u8>, _size: usize) {
        // SAFETY: ptr came from alloc or realloc and is released exactly once.
        unsafe { (self.free)(ptr.as_ptr().cast()) }
    }
}

impl Debug for FnAllocator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnAllocator")
            .field("alloc", &(self.alloc as *const ()))
            .field("realloc", &(self.realloc as *const ()))
            .field("free", &(self.free as *const ()))
            .finish()
    }
}
