use std::cell::{Cell, RefCell};
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;
use std::rc::Rc;

use crate::alloc::{Allocator, SystemAllocator};
use crate::util::error::AllocError;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ZeroSizedType;

#[derive(Debug, Clone)]
pub struct CountedDrop(pub Rc<RefCell<usize>>);

impl CountedDrop {
    pub fn new(value: usize) -> CountedDrop {
        CountedDrop(Rc::new(RefCell::new(value)))
    }
}

impl Deref for CountedDrop {
    type Target = Rc<RefCell<usize>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for CountedDrop {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Drop for CountedDrop {
    fn drop(&mut self) {
        self.0.replace_with(|v| *v + 1);
    }
}

/// An allocator that hands out `budget` successful allocations (including reallocations) and
/// then fails every request after that.
#[derive(Debug)]
pub struct FailingAllocator {
    budget: Cell<usize>,
}

impl FailingAllocator {
    pub const fn new(budget: usize) -> FailingAllocator {
        FailingAllocator { budget: Cell::new(budget) }
    }

    pub fn refill(&self, budget: usize) {
        self.budget.set(budget);
    }

    fn spend(&self, size: usize) -> Result<(), AllocError> {
        match self.budget.get().checked_sub(1) {
            Some(left) => {
                self.budget.set(left);
                Ok(())
            },
            None => Err(AllocError { size }),
        }
    }
}

// SAFETY: All requests which aren't refused are forwarded to SystemAllocator.
unsafe impl Allocator for FailingAllocator {
    fn allocate(&self, size: usize) -> Result<NonNull<u8>, AllocError> {
        self.spend(size)?;
        SystemAllocator.allocate(size)
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_size: usize,
        new_size: usize,
    ) -> Result<NonNull<u8>, AllocError> {
        self.spend(new_size)?;
        // SAFETY: The caller upholds the contract for ptr and old_size.
        unsafe { SystemAllocator.reallocate(ptr, old_size, new_size) }
    }

    unsafe fn release(&self, ptr: NonNull<u8>, size: usize) {
        // SAFETY: The caller upholds the contract for ptr and size.
        unsafe { SystemAllocator.release(ptr, size) }
    }
}
