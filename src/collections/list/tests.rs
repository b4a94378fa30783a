#![cfg(test)]

use super::*;
use crate::alloc::{ALIGN, Allocator, Counting, SystemAllocator};
use crate::util::alloc::{CountedDrop, FailingAllocator, ZeroSizedType};
use crate::util::panic::assert_panics;

fn list_of<'a>(elems: &[&str]) -> List<'a> {
    let mut list = List::new(&SystemAllocator);
    for elem in elems {
        list.append(elem.as_bytes());
    }
    list
}

fn contents<A: Allocator + ?Sized>(list: &List<'_, A>) -> Vec<Vec<u8>> {
    list.iter().map(<[u8]>::to_vec).collect()
}

#[test]
fn test_negative_indices() {
    let list = list_of(&["A", "B", "C", "D", "E"]);
    let len = list.len() as isize;

    for i in 0..len {
        assert_eq!(
            list.at(i),
            list.at(i - len),
            "Index {i} and its negative counterpart should refer to the same element."
        );
    }
    assert_eq!(list.get(-1), b"E");
    assert_eq!(list.get(-5), b"A");

    assert_eq!(
        list.try_at(5),
        Err(IndexOutOfBounds { index: 5, len: 5 })
    );
    assert_eq!(
        list.try_at(-6),
        Err(IndexOutOfBounds { index: -6, len: 5 })
    );
    assert_eq!(
        List::new(&SystemAllocator).try_at(0),
        Err(IndexOutOfBounds { index: 0, len: 0 }),
        "An empty list has no valid indices."
    );
}

#[test]
fn test_resolve_start_point() {
    let list = list_of(&["A", "B", "C", "D"]);
    let contents = list.checked_contents(0).unwrap();

    assert_eq!(contents.resolve(0), Ok(Seek::Head(0)));
    assert_eq!(
        contents.resolve(3),
        Ok(Seek::Head(3)),
        "A non-negative index should always be walked from the head, even near the end."
    );
    assert_eq!(contents.resolve(-1), Ok(Seek::Last(0)));
    assert_eq!(
        contents.resolve(-4),
        Ok(Seek::Last(3)),
        "A negative index should always be walked from the last element, even near the head."
    );
    assert_eq!(contents.position(Seek::Last(3)), 0);
    assert!(contents.resolve(4).is_err());
    assert!(contents.resolve(-5).is_err());
}

#[test]
fn test_create() {
    let mut list = List::new(&SystemAllocator);
    let first = list.create_one(3);
    assert_eq!(list.len(), 1);
    assert_eq!(list.get(0), [0, 0, 0], "New elements should be zeroed.");

    let elems = list.create_many(4, 5);
    assert_eq!(elems.len(), 4);
    assert_eq!(list.len(), 5);
    list.verify_double_links();

    assert_eq!(list.at(0), first);
    for (i, elem) in elems.iter().enumerate() {
        assert_eq!(
            *elem,
            list.at(i as isize + 1),
            "Elements should be created in order at the end of the list."
        );
        assert_eq!(list.size_at(i as isize + 1), 5);
        assert_eq!(
            elem.as_ptr() as usize % ALIGN,
            0,
            "Elements should be aligned to ALIGN."
        );
    }

    assert!(list.create_many(0, 8).is_empty());
    assert_eq!(list.len(), 5, "Creating no elements should leave the list unchanged.");

    let empty = list.create_one(0);
    assert_eq!(list.size_at(-1), 0);
    assert_eq!(list.at(-1), empty);
}

#[test]
fn test_remove_one() {
    let mut list = list_of(&["A", "B", "C", "D"]);
    list.remove_one(-1);
    assert_eq!(contents(&list), [b"A", b"B", b"C"]);
    list.verify_double_links();

    list.remove_one(1);
    assert_eq!(contents(&list), [b"A", b"C"]);
    list.verify_double_links();

    list.remove_one(0);
    assert_eq!(list.front(), Some(&b"C"[..]));
    assert_eq!(list.back(), Some(&b"C"[..]));
    list.verify_double_links();

    list.remove_one(-1);
    assert!(list.is_empty());
    assert_eq!(list.front(), None);
    list.verify_double_links();

    assert_panics!(
        {
            let mut list = List::new(&SystemAllocator);
            list.remove_one(0);
        },
        contains "out of bounds"
    );
    assert_panics!(
        {
            let mut list = list_of(&["A"]);
            list.remove_one(-2);
        },
        contains "out of bounds"
    );
}

#[test]
fn test_remove_many() {
    let mut list = list_of(&["0", "1", "2", "3", "4", "5"]);

    list.remove_many(1, 2);
    assert_eq!(contents(&list), [b"0", b"3", b"4", b"5"]);
    list.verify_double_links();

    list.remove_many(-2, 2);
    assert_eq!(contents(&list), [b"0", b"3"]);
    list.verify_double_links();

    list.remove_many(7, 0);
    assert_eq!(list.len(), 2, "Removing nothing shouldn't validate the index.");

    assert_eq!(
        list.try_remove_many(0, 3),
        Err(IndexOutOfBounds { index: 2, len: 2 })
    );
    assert_eq!(
        list.try_remove_many(-1, 2),
        Err(IndexOutOfBounds { index: 2, len: 2 }),
        "A run can't extend past the last element."
    );
    assert_eq!(list.len(), 2, "A failed removal should leave the list unchanged.");

    list.remove_many(0, 2);
    assert!(list.is_empty());
    list.verify_double_links();

    assert_panics!(
        {
            let mut list = list_of(&["A", "B"]);
            list.remove_many(2, 1);
        },
        contains "out of bounds"
    );
}

#[test]
fn test_slice() {
    let list = list_of(&["A", "B", "C", "D"]);

    assert_eq!(list.slice(0, 4), list.elements().collect::<Vec<_>>());
    assert_eq!(list.slice(-3, -1), [list.at(1), list.at(2)]);
    assert_eq!(list.slice(1, -1), [list.at(1), list.at(2)]);
    assert!(list.slice(2, 2).is_empty());
    assert!(
        list.slice(7, 7).is_empty(),
        "An empty range should succeed even outside of the list."
    );

    assert_eq!(
        list.try_slice(3, 1),
        Err(ListError::InvalidRange(InvalidRange { start: 3, end: 1 }))
    );
    assert_eq!(
        list.try_slice(-1, 1),
        Err(ListError::InvalidRange(InvalidRange { start: -1, end: 1 })),
        "Negative ends should be resolved before comparing them."
    );
    assert_eq!(
        list.try_slice(0, 5),
        Err(ListError::IndexOutOfBounds(IndexOutOfBounds { index: 5, len: 4 }))
    );
    assert_eq!(
        list.try_slice(-5, 2),
        Err(ListError::IndexOutOfBounds(IndexOutOfBounds { index: -5, len: 4 }))
    );

    assert_panics!(
        {
            let list = list_of(&["A", "B"]);
            list.slice(1, 0);
        },
        contains "ends before it starts"
    );
}

#[test]
fn test_insert() {
    let mut list = List::new(&SystemAllocator);
    list.insert(0, b"A");
    list.insert(1, b"C");
    list.insert(-1, b"B");
    list.insert(0, b"_");
    assert_eq!(contents(&list), [b"_", b"A", b"B", b"C"]);
    list.verify_double_links();

    list.insert(-4, b"^");
    assert_eq!(list.front(), Some(&b"^"[..]));
    list.verify_double_links();

    assert_eq!(
        list.try_insert(6, b"X"),
        Err(ListError::IndexOutOfBounds(IndexOutOfBounds { index: 6, len: 5 }))
    );
    assert_eq!(
        list.try_insert(-6, b"X"),
        Err(ListError::IndexOutOfBounds(IndexOutOfBounds { index: -6, len: 5 }))
    );
    assert_eq!(list.len(), 5);
}

#[test]
fn test_reverse() {
    let mut list = list_of(&["A", "B", "C"]);
    list.reverse();
    assert_eq!(contents(&list), [b"C", b"B", b"A"]);
    list.verify_double_links();
    assert_eq!(
        list.iter().rev().collect::<Vec<_>>(),
        [b"A", b"B", b"C"],
        "Reversing should swap the links in both directions."
    );

    let mut single = list_of(&["A"]);
    single.reverse();
    single.verify_double_links();

    let mut empty = List::new(&SystemAllocator);
    empty.reverse();
    assert!(empty.is_empty());
}

#[test]
fn test_iter() {
    let mut list = list_of(&["A", "B", "C", "D"]);

    let mut iter = list.iter();
    assert_eq!(iter.len(), 4);
    assert_eq!(iter.next(), Some(&b"A"[..]));
    assert_eq!(iter.next_back(), Some(&b"D"[..]));
    assert_eq!(iter.next_back(), Some(&b"C"[..]));
    assert_eq!(iter.len(), 1);
    assert_eq!(iter.next(), Some(&b"B"[..]));
    assert_eq!(iter.next(), None);
    assert_eq!(iter.next_back(), None);

    for elem in &mut list {
        elem[0] = elem[0].to_ascii_lowercase();
    }
    assert_eq!(contents(&list), [b"a", b"b", b"c", b"d"]);

    let elems = list.elements().collect::<Vec<_>>();
    unsafe {
        assert_eq!(List::<SystemAllocator>::element_after(elems[1]), Some(elems[2]));
        assert_eq!(List::<SystemAllocator>::element_before(elems[1]), Some(elems[0]));
        assert_eq!(List::<SystemAllocator>::element_before(elems[0]), None);
        assert_eq!(List::<SystemAllocator>::element_after(elems[3]), None);
    }

    assert_eq!(
        format!("{:?}", list_of(&["A", "BC"])),
        "List { items: [[65], [66, 67]], len: 2 }"
    );
}

#[test]
fn test_values() {
    let counter = CountedDrop::new(0);
    let mut list = List::new(&SystemAllocator);
    for _ in 0..3 {
        list.push_value(counter.clone());
    }
    assert_eq!(*counter.borrow(), 0);

    let taken = unsafe { list.take_value::<CountedDrop>(1) };
    assert_eq!(list.len(), 2);
    list.verify_double_links();
    drop(taken);
    assert_eq!(*counter.borrow(), 1, "Only the taken value should have been dropped.");

    while !list.is_empty() {
        drop(unsafe { list.take_value::<CountedDrop>(0) });
    }
    assert_eq!(counter.take(), 3);

    list.push_value(17_u64);
    unsafe {
        *list.value_mut::<u64>(-1) += 25;
        assert_eq!(*list.value::<u64>(0), 42);
    }

    list.push_value(ZeroSizedType);
    assert_eq!(list.size_at(-1), 0);
    assert_eq!(unsafe { *list.value::<ZeroSizedType>(-1) }, ZeroSizedType);

    assert_panics!({
        #[repr(align(32))]
        struct OverAligned;
        let mut list = List::new(&SystemAllocator);
        list.push_value(OverAligned);
    });
}

#[test]
fn test_allocator_usage() {
    let alloc: Counting = Counting::default();
    {
        let mut list = List::new(&alloc);
        list.append(b"Hello");
        list.create_many(3, 64);
        list.remove_one(1);
        assert_eq!(alloc.stats().live_blocks(), 3);
    }
    assert_eq!(
        alloc.stats().live_blocks(),
        0,
        "Dropping a list should release every element."
    );
    assert_eq!(alloc.stats().live_bytes, 0);

    let failing = FailingAllocator::new(2);
    let mut list = List::new(&failing);
    assert!(list.try_create_many(3, 8).is_err());
    assert!(
        list.is_empty(),
        "A failed batch creation should leave the list unchanged."
    );

    failing.refill(1);
    list.append(b"A");
    assert_eq!(list.try_append(b"B"), Err(AllocError { size: 33 }));
    assert_eq!(
        list.try_insert(0, b"C"),
        Err(ListError::AllocError(AllocError { size: 33 }))
    );
    assert_eq!(contents(&list), [b"A"]);
    list.verify_double_links();
}

#[test]
fn test_create_many_too_large() {
    let alloc: Counting = Counting::default();
    let mut list = List::new(&alloc);
    assert_eq!(
        list.try_create_many(usize::MAX, 1),
        Err(AllocError { size: usize::MAX }),
        "A batch too large to track should be reported as an allocation failure."
    );
    assert!(list.is_empty());
    assert_eq!(alloc.stats().live_blocks(), 0, "No element should be allocated.");

    assert_panics!(
        {
            let mut list = List::new(&SystemAllocator);
            list.create_many(usize::MAX, 1);
        },
        contains "Allocation of"
    );
}
