#![cfg(test)]

use super::*;
use crate::util::alloc::FailingAllocator;

#[test]
fn test_system_allocator_alignment() {
    for size in [1, 3, 16, 17, 100, 4096] {
        let ptr = SystemAllocator.allocate(size).unwrap();
        assert_eq!(
            ptr.as_ptr().align_offset(ALIGN), 0,
            "Every block should be aligned to ALIGN."
        );
        unsafe { SystemAllocator.release(ptr, size) };
    }
}

#[test]
fn test_zero_size_refused() {
    assert_eq!(SystemAllocator.allocate(0), Err(AllocError { size: 0 }));
    assert_eq!(
        SystemAllocator.allocate(usize::MAX),
        Err(AllocError { size: usize::MAX }),
        "A size which can't form a layout should be refused rather than panicking."
    );
}

#[test]
fn test_reallocate_preserves_contents() {
    let ptr = SystemAllocator.allocate(4).unwrap();
    unsafe {
        ptr.as_ptr().copy_from_nonoverlapping(b"abcd".as_ptr(), 4);
        let ptr = SystemAllocator.reallocate(ptr, 4, 1024).unwrap();
        assert_eq!(
            std::slice::from_raw_parts(ptr.as_ptr(), 4), b"abcd",
            "Growing a block should keep its contents."
        );
        SystemAllocator.release(ptr, 1024);
    }
}

#[cfg(feature = "malloc")]
#[test]
fn test_malloc_triple() {
    let alloc = FnAllocator::malloc();
    let ptr = alloc.allocate(3).unwrap();
    unsafe {
        ptr.as_ptr().copy_from_nonoverlapping(b"xyz".as_ptr(), 3);
        let ptr = alloc.reallocate(ptr, 3, 300).unwrap();
        assert_eq!(std::slice::from_raw_parts(ptr.as_ptr(), 3), b"xyz");
        alloc.release(ptr, 300);
    }
    assert!(alloc.allocate(0).is_err());
}

#[test]
fn test_counting_stats() {
    let alloc: Counting = Counting::default();
    let a = alloc.allocate(10).unwrap();
    let b = alloc.allocate(20).unwrap();
    let b = unsafe { alloc.reallocate(b, 20, 50).unwrap() };

    assert_eq!(
        alloc.stats(),
        AllocStats { allocations: 2, reallocations: 1, releases: 0, live_bytes: 60 }
    );

    unsafe {
        alloc.release(a, 10);
        alloc.release(b, 50);
    }
    assert_eq!(alloc.stats().live_blocks(), 0);
    assert_eq!(alloc.stats().live_bytes, 0);
}

#[test]
fn test_counting_ignores_failures() {
    let alloc = Counting::new(FailingAllocator::new(1));
    let ptr = alloc.allocate(8).unwrap();
    assert_eq!(alloc.allocate(8), Err(AllocError { size: 8 }));
    assert_eq!(
        unsafe { alloc.reallocate(ptr, 8, 16) },
        Err(AllocError { size: 16 }),
        "A failed reallocation should report the requested size."
    );
    assert_eq!(alloc.stats().allocations, 1);
    assert_eq!(alloc.stats().live_bytes, 8, "The original block should still be live.");
    unsafe { alloc.release(ptr, 8) };
}

#[test]
fn test_allocator_by_reference() {
    fn takes_allocator<A: Allocator + ?Sized>(alloc: &A) {
        let ptr = alloc.allocate(1).unwrap();
        unsafe { alloc.release(ptr, 1) };
    }

    let alloc: Counting = Counting::default();
    let dynamic: &dyn Allocator = &alloc;
    takes_allocator(&dynamic);
    takes_allocator(dynamic);
    assert_eq!(alloc.stats().allocations, 2);
    assert_eq!(alloc.stats().releases, 2);
}
