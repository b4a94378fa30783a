use std::mem;
use std::ptr::NonNull;
use std::slice;

use crate::alloc::{ALIGN, AllocError, Allocator};
use crate::util::result::OverflowExtension;

pub(crate) type Link = Option<ItemRef>;

/// The header that prefixes every element in a [`List`](super::List). The element's bytes
/// follow directly after the header in the same allocation.
///
/// The alignment matches [`ALIGN`], which makes the header size a multiple of it and therefore
/// leaves the element aligned as well.
#[repr(C, align(16))]
pub(crate) struct ItemHeader {
    pub next: Link,
    pub prev: Link,
    pub size: usize,
}

const _: () = assert!(mem::align_of::<ItemHeader>() == ALIGN);

pub(crate) const HEADER_SIZE: usize = mem::size_of::<ItemHeader>();

/// A handle to an allocated item. Copying the handle doesn't copy the item, and the handle has
/// no knowledge of whether the item is still allocated: that is the job of the owning list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ItemRef(pub NonNull<ItemHeader>);

impl ItemRef {
    /// Allocates an unlinked item with a zeroed element of `size` bytes.
    ///
    /// # Panics
    /// Panics if the total size of the item overflows [`usize`].
    pub fn alloc<A: Allocator + ?Sized>(alloc: &A, size: usize) -> Result<ItemRef, AllocError> {
        let total = HEADER_SIZE.checked_add(size).or_overflow();
        let ptr = alloc.allocate(total)?.cast::<ItemHeader>();
        // SAFETY: The block is large enough for the header followed by size bytes and is aligned
        // to ALIGN, which satisfies the header's alignment.
        unsafe {
            ptr.write(ItemHeader {
                next: None,
                prev: None,
                size,
            });
            ptr.cast::<u8>().add(HEADER_SIZE).write_bytes(0, size);
        }
        Ok(ItemRef(ptr))
    }

    /// Allocates an unlinked item containing a copy of `elem`.
    pub fn alloc_copy<A: Allocator + ?Sized>(
        alloc: &A,
        elem: &[u8],
    ) -> Result<ItemRef, AllocError> {
        let item = ItemRef::alloc(alloc, elem.len())?;
        item.bytes_mut().copy_from_slice(elem);
        Ok(item)
    }

    /// Releases the item back to the allocator it was created with.
    ///
    /// # Safety
    /// The item must have been allocated by `alloc` and must not be reachable from any list.
    pub unsafe fn release<A: Allocator + ?Sized>(self, alloc: &A) {
        let total = HEADER_SIZE + self.size();
        // SAFETY: The item was allocated with exactly this size, which is guaranteed by the caller.
        unsafe { alloc.release(self.0.cast(), total) }
    }

    /// Releases this item and every item reachable through its next links.
    ///
    /// # Safety
    /// The same requirements as [`ItemRef::release`] apply to every item in the run.
    pub unsafe fn release_run<A: Allocator + ?Sized>(self, alloc: &A) {
        let mut curr = Some(self);
        while let Some(item) = curr {
            curr = *item.next();
            // SAFETY: Guaranteed by the caller.
            unsafe { item.release(alloc) };
        }
    }

    /// Recovers the item handle from a pointer to its element.
    ///
    /// # Safety
    /// `data` must have been produced by [`ItemRef::data`] on an item which is still allocated.
    pub const unsafe fn from_data(data: NonNull<u8>) -> ItemRef {
        // SAFETY: The element directly follows the header within the same allocation.
        ItemRef(unsafe { data.sub(HEADER_SIZE) }.cast())
    }

    pub const fn size(self) -> usize {
        // SAFETY: The handle always points at an initialized header.
        unsafe { self.0.as_ref().size }
    }

    pub const fn data(self) -> NonNull<u8> {
        // SAFETY: The element directly follows the header within the same allocation.
        unsafe { self.0.cast::<u8>().add(HEADER_SIZE) }
    }

    pub fn bytes<'a>(self) -> &'a [u8] {
        // SAFETY: The element is zeroed on allocation, so all size bytes are initialized.
        unsafe { slice::from_raw_parts(self.data().as_ptr(), self.size()) }
    }

    #[allow(clippy::mut_from_ref)]
    pub fn bytes_mut<'a>(self) -> &'a mut [u8] {
        // SAFETY: The element is zeroed on allocation, so all size bytes are initialized.
        unsafe { slice::from_raw_parts_mut(self.data().as_ptr(), self.size()) }
    }

    pub fn prev<'a>(self) -> &'a Link {
        // SAFETY: The handle always points at an initialized header.
        unsafe { &(*self.0.as_ptr()).prev }
    }

    #[allow(clippy::mut_from_ref)]
    pub fn prev_mut<'a>(self) -> &'a mut Link {
        // SAFETY: As above. The list hands out at most one link reference at a time.
        unsafe { &mut (*self.0.as_ptr()).prev }
    }

    pub fn next<'a>(self) -> &'a Link {
        // SAFETY: The handle always points at an initialized header.
        unsafe { &(*self.0.as_ptr()).next }
    }

    #[allow(clippy::mut_from_ref)]
    pub fn next_mut<'a>(self) -> &'a mut Link {
        // SAFETY: As above. The list hands out at most one link reference at a time.
        unsafe { &mut (*self.0.as_ptr()).next }
    }

    /// Attaches this unlinked item directly before `other`, fixing the links on both sides.
    pub fn attach_before(self, other: ItemRef) {
        let prev = *other.prev();
        if let Some(prev) = prev {
            *prev.next_mut() = Some(self);
        }
        *self.prev_mut() = prev;
        *self.next_mut() = Some(other);
        *other.prev_mut() = Some(self);
    }
}
