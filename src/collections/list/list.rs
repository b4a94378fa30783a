use std::fmt::{self, Debug, Formatter};
use std::mem;
use std::ptr::NonNull;

use super::{Elements, ItemRef, Items, Iter, IterMut, Length, ONE};
use crate::alloc::{ALIGN, Allocator, SystemAllocator};
#[doc(inline)]
pub use crate::util::error::{AllocError, IndexOutOfBounds, InvalidRange, ListError};
use crate::util::result::{OverflowExtension, ResultExtension};

/// A doubly linked list of type-erased elements, allocated through a borrowed [`Allocator`].
///
/// Every element lives in its own heap allocation, directly behind a small header holding the
/// links to its neighbours and the element's size in bytes. The list never learns the types of
/// its elements, so elements in the same list can have different sizes. Any construction or
/// destruction semantics beyond copying bytes are the caller's responsibility: dropping a list
/// releases the memory of its elements without running any destructors.
///
/// # Indexing
/// All methods which take an index accept negative values, which count backwards from the end of
/// the list so that `-1` refers to the last element. A non-negative index is always reached by
/// walking forward from the head, and a negative index by walking backward from the last
/// element, regardless of which end is closer. Valid indices are `-len..len`.
///
/// # Errors
/// Methods which can fail come in pairs: `try_*` methods return a [`Result`], while the plain
/// versions panic with the error's message.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of items in the List.
/// - `i`: The number of hops from the end an index is resolved from.
/// - `k`: The number of items created, removed or sliced.
///
/// | Method | Complexity |
/// |-|-|
/// | `len` | `O(1)` |
/// | `front/back` | `O(1)` |
/// | `create_one` | `O(1)` |
/// | `create_many` | `O(k)` |
/// | `append` | `O(1)` |
/// | `at/get` | `O(i)` |
/// | `insert` | `O(i)` |
/// | `remove_one` | `O(i)` |
/// | `remove_many` | `O(i+k)` |
/// | `slice` | `O(i+k)` |
/// | `reverse` | `O(n)` |
pub struct List<'a, A: Allocator + ?Sized = SystemAllocator> {
    pub(crate) state: ListState,
    pub(crate) alloc: &'a A,
}

#[derive(Debug, Default, Clone, Copy)]
pub(crate) enum ListState {
    #[default]
    Empty,
    Full(ListContents),
}

use ListState::*;

#[derive(Debug, Clone, Copy)]
pub(crate) struct ListContents {
    pub len: Length,
    pub head: ItemRef,
    pub last: ItemRef,
}

/// The end of the list an index is resolved from and the number of hops taken from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Seek {
    Head(usize),
    Last(usize),
}

impl<'a, A: Allocator + ?Sized> List<'a, A> {
    /// Creates a new, empty List which will allocate all of its items with `alloc`.
    ///
    /// # Examples
    /// ```
    /// # use container_lib::alloc::SystemAllocator;
    /// # use container_lib::collections::list::List;
    /// let list = List::new(&SystemAllocator);
    /// assert_eq!(list.len(), 0);
    /// ```
    pub const fn new(alloc: &'a A) -> List<'a, A> {
        List {
            state: Empty,
            alloc,
        }
    }

    /// Returns the number of elements in the List.
    pub const fn len(&self) -> usize {
        self.state.len()
    }

    /// Returns true if the List contains no elements.
    pub const fn is_empty(&self) -> bool {
        matches!(self.state, Empty)
    }

    /// Returns the allocator this List was created with.
    pub const fn allocator(&self) -> &'a A {
        self.alloc
    }

    /// Returns the bytes of the first element, if it exists.
    pub fn front(&self) -> Option<&[u8]> {
        match self.state {
            Empty => None,
            Full(ListContents { head, .. }) => Some(head.bytes()),
        }
    }

    /// Returns the bytes of the last element, if it exists.
    pub fn back(&self) -> Option<&[u8]> {
        match self.state {
            Empty => None,
            Full(ListContents { last, .. }) => Some(last.bytes()),
        }
    }

    /// Creates a new element of `size` bytes at the end of the List and returns a pointer to it.
    ///
    /// The element is zeroed. The pointer is aligned to [`ALIGN`] and remains valid until the
    /// element is removed or the List is dropped.
    ///
    /// # Panics
    /// Panics if the allocator fails.
    pub fn create_one(&mut self, size: usize) -> NonNull<u8> {
        self.try_create_one(size).throw()
    }

    pub fn try_create_one(&mut self, size: usize) -> Result<NonNull<u8>, AllocError> {
        let item = ItemRef::alloc(self.alloc, size)?;
        self.link_back(item, item, ONE);
        Ok(item.data())
    }

    /// Creates `n` new elements of `size` bytes each at the end of the List, returning pointers to
    /// them in order.
    ///
    /// The items are linked to each other before being attached to the List, so if the allocator
    /// fails part way through, the List is left unchanged.
    ///
    /// # Panics
    /// Panics if the allocator fails.
    ///
    /// # Examples
    /// ```
    /// # use container_lib::alloc::SystemAllocator;
    /// # use container_lib::collections::list::List;
    /// let mut list = List::new(&SystemAllocator);
    /// let elems = list.create_many(3, 1);
    /// for (i, elem) in elems.iter().enumerate() {
    ///     unsafe { elem.write(b'a' + i as u8) };
    /// }
    /// assert_eq!(list.iter().collect::<Vec<_>>(), [b"a", b"b", b"c"]);
    /// ```
    pub fn create_many(&mut self, n: usize, size: usize) -> Vec<NonNull<u8>> {
        self.try_create_many(n, size).throw()
    }

    pub fn try_create_many(
        &mut self,
        n: usize,
        size: usize,
    ) -> Result<Vec<NonNull<u8>>, AllocError> {
        let Some(count) = Length::new(n) else {
            return Ok(Vec::new());
        };

        let mut out = Vec::new();
        out.try_reserve_exact(n).map_err(|_| AllocError {
            size: n.saturating_mul(mem::size_of::<NonNull<u8>>()),
        })?;
        let first = ItemRef::alloc(self.alloc, size)?;
        out.push(first.data());

        let mut last = first;
        for _ in 1..n {
            match ItemRef::alloc(self.alloc, size) {
                Ok(item) => {
                    *last.next_mut() = Some(item);
                    *item.prev_mut() = Some(last);
                    last = item;
                    out.push(item.data());
                },
                Err(error) => {
                    // SAFETY: The run was allocated here and hasn't been attached to the List.
                    unsafe { first.release_run(self.alloc) };
                    return Err(error);
                },
            }
        }

        self.link_back(first, last, count);
        Ok(out)
    }

    /// Appends a copy of `elem` to the end of the List.
    ///
    /// # Panics
    /// Panics if the allocator fails.
    pub fn append(&mut self, elem: &[u8]) {
        self.try_append(elem).throw()
    }

    pub fn try_append(&mut self, elem: &[u8]) -> Result<(), AllocError> {
        let item = ItemRef::alloc_copy(self.alloc, elem)?;
        self.link_back(item, item, ONE);
        Ok(())
    }

    /// Inserts a copy of `elem` before the element currently at `index`. A non-negative index may
    /// also be equal to the length, which appends. Inserting at `-1` places the new element
    /// before the last one, like any other index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds or the allocator fails.
    pub fn insert(&mut self, index: isize, elem: &[u8]) {
        self.try_insert(index, elem).throw()
    }

    pub fn try_insert(&mut self, index: isize, elem: &[u8]) -> Result<(), ListError> {
        if usize::try_from(index).is_ok_and(|i| i == self.len()) {
            return Ok(self.try_append(elem)?);
        }

        let at = self.checked_seek(index)?;
        let item = ItemRef::alloc_copy(self.alloc, elem)?;
        item.attach_before(at);

        if let Full(contents) = &mut self.state {
            contents.len = contents.len.checked_add(1).or_overflow();
            if contents.head == at {
                contents.head = item;
            }
        }
        Ok(())
    }

    /// Removes the element at `index` and releases its memory. The element must be ready to be
    /// destroyed, no destructor is run.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    ///
    /// # Examples
    /// ```
    /// # use container_lib::alloc::SystemAllocator;
    /// # use container_lib::collections::list::List;
    /// let mut list = List::new(&SystemAllocator);
    /// for elem in [b"A", b"B", b"C", b"D"] {
    ///     list.append(elem);
    /// }
    /// list.remove_one(-1);
    /// assert_eq!(list.iter().collect::<Vec<_>>(), [b"A", b"B", b"C"]);
    /// ```
    pub fn remove_one(&mut self, index: isize) {
        self.try_remove_one(index).throw()
    }

    pub fn try_remove_one(&mut self, index: isize) -> Result<(), IndexOutOfBounds> {
        let item = self.checked_seek(index)?;
        self.unlink(item, item, 1);
        // SAFETY: The item belongs to this List and has just been unlinked.
        unsafe { item.release(self.alloc) };
        Ok(())
    }

    /// Removes `n` consecutive elements, starting with the element at `index`. Removing zero
    /// elements is a no-op that doesn't validate `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds, or if fewer than `n` elements follow it (inclusive).
    pub fn remove_many(&mut self, index: isize, n: usize) {
        self.try_remove_many(index, n).throw()
    }

    pub fn try_remove_many(&mut self, index: isize, n: usize) -> Result<(), IndexOutOfBounds> {
        if n == 0 {
            return Ok(());
        }

        let contents = self.checked_contents(index)?;
        let len = contents.len.get();
        let seek = contents.resolve(index)?;
        let start = contents.position(seek);

        if n > len - start {
            return Err(IndexOutOfBounds {
                index: isize::try_from(start.saturating_add(n - 1)).unwrap_or(isize::MAX),
                len,
            });
        }

        let first = contents.seek(seek);
        let last = contents.seek_fwd(n - 1, first);
        self.unlink(first, last, n);
        // SAFETY: The run belongs to this List and has just been unlinked, with the next link of
        // its last item cleared.
        unsafe { first.release_run(self.alloc) };
        Ok(())
    }

    /// Removes every element from the List, releasing their memory.
    pub fn clear(&mut self) {
        if let Full(ListContents { head, .. }) = mem::take(&mut self.state) {
            // SAFETY: The List no longer refers to any of its items.
            unsafe { head.release_run(self.alloc) };
        }
    }

    /// Returns a pointer to the element at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn at(&self, index: isize) -> NonNull<u8> {
        self.try_at(index).throw()
    }

    pub fn try_at(&self, index: isize) -> Result<NonNull<u8>, IndexOutOfBounds> {
        Ok(self.checked_seek(index)?.data())
    }

    /// Returns the bytes of the element at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn get(&self, index: isize) -> &[u8] {
        self.try_get(index).throw()
    }

    pub fn try_get(&self, index: isize) -> Result<&[u8], IndexOutOfBounds> {
        Ok(self.checked_seek(index)?.bytes())
    }

    /// Returns the bytes of the element at `index` mutably.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn get_mut(&mut self, index: isize) -> &mut [u8] {
        self.try_get_mut(index).throw()
    }

    pub fn try_get_mut(&mut self, index: isize) -> Result<&mut [u8], IndexOutOfBounds> {
        Ok(self.checked_seek(index)?.bytes_mut())
    }

    /// Returns the size in bytes of the element at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn size_at(&self, index: isize) -> usize {
        self.checked_seek(index).throw().size()
    }

    /// Returns pointers to the elements in the range `start..end`, where both ends may be
    /// negative. An empty range (`start == end` after resolving negative values) always succeeds,
    /// even if it lies outside of the List.
    ///
    /// # Panics
    /// Panics if `end` resolves to before `start`, or if the range exceeds the List.
    ///
    /// # Examples
    /// ```
    /// # use container_lib::alloc::SystemAllocator;
    /// # use container_lib::collections::list::List;
    /// let mut list = List::new(&SystemAllocator);
    /// for elem in [b"A", b"B", b"C", b"D"] {
    ///     list.append(elem);
    /// }
    /// let slice = list.slice(1, -1);
    /// assert_eq!(slice.len(), 2);
    /// assert_eq!(slice[0], list.at(1));
    /// assert_eq!(slice[1], list.at(-2));
    /// ```
    pub fn slice(&self, start: isize, end: isize) -> Vec<NonNull<u8>> {
        self.try_slice(start, end).throw()
    }

    pub fn try_slice(&self, start: isize, end: isize) -> Result<Vec<NonNull<u8>>, ListError> {
        let len = self.len();
        let signed_len = len as isize;
        let from = if start < 0 { start + signed_len } else { start };
        let to = if end < 0 { end + signed_len } else { end };

        if from == to {
            return Ok(Vec::new());
        }
        if to < from {
            return Err(InvalidRange { start, end }.into());
        }
        if from < 0 {
            return Err(IndexOutOfBounds { index: start, len }.into());
        }
        if to > signed_len {
            return Err(IndexOutOfBounds { index: end, len }.into());
        }

        let contents = self.checked_contents(start)?;
        let count = to.abs_diff(from);
        let mut item = contents.seek(Seek::Head(from.unsigned_abs()));
        let mut out = Vec::with_capacity(count);
        out.push(item.data());
        for _ in 1..count {
            item = contents.seek_fwd(1, item);
            out.push(item.data());
        }
        Ok(out)
    }

    /// Reverses the order of the elements in place, without moving any element in memory.
    pub fn reverse(&mut self) {
        if let Full(contents) = &mut self.state {
            let mut curr = Some(contents.head);
            while let Some(item) = curr {
                curr = *item.next();
                mem::swap(item.next_mut(), item.prev_mut());
            }
            mem::swap(&mut contents.head, &mut contents.last);
        }
    }

    /// Moves `value` into a new element at the end of the List. The List takes no responsibility
    /// for dropping it, see [`take_value`](List::take_value).
    ///
    /// # Panics
    /// Panics if `T` requires an alignment greater than [`ALIGN`] or the allocator fails.
    pub fn push_value<T>(&mut self, value: T) {
        self.try_push_value(value).throw()
    }

    pub fn try_push_value<T>(&mut self, value: T) -> Result<(), AllocError> {
        assert!(
            mem::align_of::<T>() <= ALIGN,
            "Element alignment exceeds the alignment of list items!"
        );
        let data = self.try_create_one(mem::size_of::<T>())?;
        // SAFETY: The element is sized and aligned for T.
        unsafe { data.cast::<T>().write(value) };
        Ok(())
    }

    /// Interprets the element at `index` as a `T`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    ///
    /// # Safety
    /// The element must contain a valid `T`, such as one written by
    /// [`push_value`](List::push_value).
    pub unsafe fn value<T>(&self, index: isize) -> &T {
        let item = self.checked_seek(index).throw();
        debug_assert_eq!(item.size(), mem::size_of::<T>());
        // SAFETY: The caller guarantees that the element holds a T, and items are aligned to
        // ALIGN which push_value checks against.
        unsafe { item.data().cast::<T>().as_ref() }
    }

    /// Interprets the element at `index` as a mutable `T`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    ///
    /// # Safety
    /// The element must contain a valid `T`, such as one written by
    /// [`push_value`](List::push_value).
    pub unsafe fn value_mut<T>(&mut self, index: isize) -> &mut T {
        let item = self.checked_seek(index).throw();
        debug_assert_eq!(item.size(), mem::size_of::<T>());
        // SAFETY: See List::value.
        unsafe { item.data().cast::<T>().as_mut() }
    }

    /// Moves the `T` out of the element at `index` and removes the element.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    ///
    /// # Safety
    /// The element must contain a valid `T`, which is no longer used through the List afterwards.
    pub unsafe fn take_value<T>(&mut self, index: isize) -> T {
        let item = self.checked_seek(index).throw();
        debug_assert_eq!(item.size(), mem::size_of::<T>());
        // SAFETY: See List::value. The element is released right after, so the value is moved.
        let value = unsafe { item.data().cast::<T>().read() };
        self.unlink(item, item, 1);
        // SAFETY: The item belongs to this List and has just been unlinked.
        unsafe { item.release(self.alloc) };
        value
    }

    /// Returns the element following `elem` in its list, if there is one.
    ///
    /// # Safety
    /// `elem` must point to an element of a List which is still alive and isn't being
    /// structurally modified.
    pub unsafe fn element_after(elem: NonNull<u8>) -> Option<NonNull<u8>> {
        // SAFETY: Guaranteed by the caller.
        unsafe { ItemRef::from_data(elem) }.next().map(ItemRef::data)
    }

    /// Returns the element preceding `elem` in its list, if there is one.
    ///
    /// # Safety
    /// See [`element_after`](List::element_after).
    pub unsafe fn element_before(elem: NonNull<u8>) -> Option<NonNull<u8>> {
        // SAFETY: Guaranteed by the caller.
        unsafe { ItemRef::from_data(elem) }.prev().map(ItemRef::data)
    }

    /// Returns an iterator over the bytes of each element, from head to last.
    pub fn iter(&self) -> Iter<'_> {
        self.into_iter()
    }

    /// Returns an iterator over the bytes of each element mutably, from head to last.
    pub fn iter_mut(&mut self) -> IterMut<'_> {
        self.into_iter()
    }

    /// Returns an iterator over pointers to each element, from head to last.
    pub fn elements(&self) -> Elements<'_> {
        Elements::new(Items::new(self.state))
    }
}

impl<'a, A: Allocator + ?Sized> List<'a, A> {
    /// Attaches the unattached run `first..=last` containing `count` items to the end of the List.
    fn link_back(&mut self, first: ItemRef, last: ItemRef, count: Length) {
        match &mut self.state {
            Empty => {
                self.state = Full(ListContents {
                    len: count,
                    head: first,
                    last,
                })
            },
            Full(contents) => {
                contents.len = contents.len.checked_add(count.get()).or_overflow();
                *contents.last.next_mut() = Some(first);
                *first.prev_mut() = Some(contents.last);
                contents.last = last;
            },
        }
    }

    /// Detaches the run `first..=last` containing `count` items from the List, leaving the run
    /// with no outside links.
    fn unlink(&mut self, first: ItemRef, last: ItemRef, count: usize) {
        let contents = match &mut self.state {
            Empty => return,
            Full(contents) => contents,
        };

        let prev = mem::take(first.prev_mut());
        let next = mem::take(last.next_mut());

        let Some(new_len) = contents.len.checked_sub(count) else {
            self.state = Empty;
            return;
        };
        contents.len = new_len;

        match (prev, next) {
            (Some(prev), Some(next)) => {
                *prev.next_mut() = Some(next);
                *next.prev_mut() = Some(prev);
            },
            (Some(prev), None) => {
                *prev.next_mut() = None;
                contents.last = prev;
            },
            (None, Some(next)) => {
                *next.prev_mut() = None;
                contents.head = next;
            },
            (None, None) => self.state = Empty,
        }
    }

    pub(crate) fn checked_seek(&self, index: isize) -> Result<ItemRef, IndexOutOfBounds> {
        let contents = self.checked_contents(index)?;
        Ok(contents.seek(contents.resolve(index)?))
    }

    pub(crate) const fn checked_contents(
        &self,
        index: isize,
    ) -> Result<&ListContents, IndexOutOfBounds> {
        match &self.state {
            Empty => Err(IndexOutOfBounds { index, len: 0 }),
            Full(contents) => Ok(contents),
        }
    }

    #[cfg(test)]
    #[allow(clippy::unwrap_used)]
    pub(crate) fn verify_double_links(&self) {
        match self.state {
            Empty => {},
            Full(ListContents { len, head, last }) => {
                assert!(head.prev().is_none());
                assert!(last.next().is_none());
                let mut count = 1;
                let mut curr = head;
                while let Some(next) = curr.next() {
                    // UNWRAP: This needs to panic if prev is None.
                    assert!(next.prev().unwrap() == curr);
                    curr = *next;
                    count += 1;
                }
                assert!(last == curr);
                assert_eq!(len.get(), count);
            },
        }
    }
}

impl ListContents {
    /// Resolves `index` to the end it is reached from and the number of hops needed.
    pub const fn resolve(&self, index: isize) -> Result<Seek, IndexOutOfBounds> {
        let len = self.len.get();
        if index < 0 {
            // -1 is zero hops from the last item.
            let hops = index.unsigned_abs() - 1;
            if hops < len {
                return Ok(Seek::Last(hops));
            }
        } else if index.unsigned_abs() < len {
            return Ok(Seek::Head(index.unsigned_abs()));
        }
        Err(IndexOutOfBounds { index, len })
    }

    /// Returns the position of a resolved index, counted from the head.
    pub const fn position(&self, seek: Seek) -> usize {
        match seek {
            Seek::Head(hops) => hops,
            Seek::Last(hops) => self.len.get() - 1 - hops,
        }
    }

    pub fn seek(&self, seek: Seek) -> ItemRef {
        match seek {
            Seek::Head(hops) => self.seek_fwd(hops, self.head),
            Seek::Last(hops) => self.seek_bwd(hops, self.last),
        }
    }

    pub fn seek_fwd(&self, count: usize, mut item: ItemRef) -> ItemRef {
        for _ in 0..count {
            // SAFETY: Callers only seek within the bounds of len, so the link is always present.
            item = unsafe { item.next().unwrap_unchecked() };
        }
        item
    }

    pub fn seek_bwd(&self, count: usize, mut item: ItemRef) -> ItemRef {
        for _ in 0..count {
            // SAFETY: Callers only seek within the bounds of len, so the link is always present.
            item = unsafe { item.prev().unwrap_unchecked() };
        }
        item
    }
}

impl ListState {
    pub const fn len(&self) -> usize {
        match self {
            Empty => 0,
            Full(ListContents { len, .. }) => len.get(),
        }
    }
}

impl<'a, A: Allocator + ?Sized> Drop for List<'a, A> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<'a, A: Allocator + ?Sized> Debug for List<'a, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("List")
            .field("items", &self.iter())
            .field("len", &self.len())
            .finish()
    }
}
