use std::cell::Cell;
use std::ptr::NonNull;

use super::{AllocError, Allocator, SystemAllocator};

/// A snapshot of the requests an allocator has served.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AllocStats {
    pub allocations: usize,
    pub reallocations: usize,
    pub releases: usize,
    /// The total size of all blocks which are currently allocated.
    pub live_bytes: usize,
}

impl AllocStats {
    /// Returns the number of blocks which are currently allocated.
    pub const fn live_blocks(&self) -> usize {
        self.allocations - self.releases
    }
}

/// An [`Allocator`] wrapper that keeps [`AllocStats`] about the requests it forwards. Only
/// successful requests are counted.
///
/// # Examples
/// ```
/// # use container_lib::alloc::Counting;
/// # use container_lib::collections::str_buf::StrBuf;
/// let alloc: Counting = Counting::default();
/// {
///     let buf = StrBuf::from_text(&alloc, "Hello, world");
///     assert_eq!(alloc.stats().live_bytes, buf.cap());
/// }
/// assert_eq!(alloc.stats().live_blocks(), 0);
/// ```
#[derive(Debug, Default)]
pub struct Counting<A: Allocator = SystemAllocator> {
    inner: A,
    stats: Cell<AllocStats>,
}

impl<A: Allocator> Counting<A> {
    pub const fn new(inner: A) -> Counting<A> {
        Counting {
            inner,
            stats: Cell::new(AllocStats {
                allocations: 0,
                reallocations: 0,
                releases: 0,
                live_bytes: 0,
            }),
        }
    }

    pub fn stats(&self) -> AllocStats {
        self.stats.get()
    }

    pub fn into_inner(self) -> A {
        self.inner
    }

    fn record(&self, update: impl FnOnce(&mut AllocStats)) {
        let mut stats = self.stats.get();
        update(&mut stats);
        self.stats.set(stats);
    }
}

// SAFETY: All requests are forwarded to the inner allocator unchanged.
unsafe impl<A: Allocator> Allocator for Counting<A> {
    fn allocate(&self, size: usize) -> Result<NonNull<u8>, AllocError> {
        let ptr = self.inner.allocate(size)?;
        self.record(|s| {
            s.allocations += 1;
            s.live_bytes += size;
        });
        Ok(ptr)
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_size: usize,
        new_size: usize,
    ) -> Result<NonNull<u8>, AllocError> {
        // SAFETY: The caller upholds the contract for ptr and old_size.
        let ptr = unsafe { self.inner.reallocate(ptr, old_size, new_size)? };
        self.record(|s| {
            s.reallocations += 1;
            s.live_bytes = s.live_bytes - old_size + new_size;
        });
        Ok(ptr)
    }

    unsafe fn release(&self, ptr: NonNull<u8>, size: usize) {
        // SAFETY: The caller upholds the contract for ptr and size.
        unsafe { self.inner.release(ptr, size) };
        self.record(|s| {
            s.releases += 1;
            s.live_bytes -= size;
        });
    }
}
