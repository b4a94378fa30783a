use std::fmt::{self, Debug, Formatter};
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ptr::NonNull;

use ListState::*;

use super::{ItemRef, List, ListContents, ListState};
use crate::alloc::Allocator;

/// A walk over the items of a list in either direction. Although the fields are exactly the same
/// as a list's, this structure never modifies the underlying items and uses len to track the
/// number of items left to yield.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Items {
    state: ListState,
}

impl Items {
    pub const fn new(state: ListState) -> Items {
        Items { state }
    }

    pub const fn len(&self) -> usize {
        self.state.len()
    }

    pub fn next_item(&mut self) -> Option<ItemRef> {
        match &mut self.state {
            Empty => None,
            Full(ListContents { len, head, .. }) => {
                let item = *head;

                match len.checked_sub(1) {
                    Some(new_len) => {
                        // SAFETY: Previous length is greater than 1, so the first item is
                        // followed by at least one more.
                        *head = unsafe { head.next().unwrap_unchecked() };
                        *len = new_len;
                    },
                    None => self.state = Empty,
                }

                Some(item)
            },
        }
    }

    pub fn next_back_item(&mut self) -> Option<ItemRef> {
        match &mut self.state {
            Empty => None,
            Full(ListContents { len, last, .. }) => {
                let item = *last;

                match len.checked_sub(1) {
                    Some(new_len) => {
                        // SAFETY: Previous length is greater than 1, so the last item is
                        // preceded by at least one more.
                        *last = unsafe { last.prev().unwrap_unchecked() };
                        *len = new_len;
                    },
                    None => self.state = Empty,
                }

                Some(item)
            },
        }
    }
}

macro_rules! item_iter {
    ($name:ident, $item:ty, $map:expr) => {
        impl<'l> $name<'l> {
            pub(crate) const fn new(items: Items) -> $name<'l> {
                $name {
                    items,
                    _phantom: PhantomData,
                }
            }
        }

        impl<'l> Iterator for $name<'l> {
            type Item = $item;

            fn next(&mut self) -> Option<Self::Item> {
                self.items.next_item().map($map)
            }

            fn size_hint(&self) -> (usize, Option<usize>) {
                (self.items.len(), Some(self.items.len()))
            }
        }

        impl<'l> DoubleEndedIterator for $name<'l> {
            fn next_back(&mut self) -> Option<Self::Item> {
                self.items.next_back_item().map($map)
            }
        }

        impl<'l> FusedIterator for $name<'l> {}

        impl<'l> ExactSizeIterator for $name<'l> {
            fn len(&self) -> usize {
                self.items.len()
            }
        }
    };
}

/// An iterator over the bytes of each element in a [`List`].
#[derive(Clone)]
pub struct Iter<'l> {
    pub(crate) items: Items,
    pub(crate) _phantom: PhantomData<&'l [u8]>,
}

item_iter!(Iter, &'l [u8], ItemRef::bytes);

/// An iterator over the bytes of each element in a [`List`], mutably.
pub struct IterMut<'l> {
    pub(crate) items: Items,
    pub(crate) _phantom: PhantomData<&'l mut [u8]>,
}

item_iter!(IterMut, &'l mut [u8], ItemRef::bytes_mut);

/// An iterator over pointers to each element in a [`List`].
#[derive(Clone)]
pub struct Elements<'l> {
    pub(crate) items: Items,
    pub(crate) _phantom: PhantomData<&'l [u8]>,
}

item_iter!(Elements, NonNull<u8>, ItemRef::data);

impl<'l, 'a, A: Allocator + ?Sized> IntoIterator for &'l List<'a, A> {
    type Item = &'l [u8];

    type IntoIter = Iter<'l>;

    fn into_iter(self) -> Self::IntoIter {
        Iter::new(Items::new(self.state))
    }
}

impl<'l, 'a, A: Allocator + ?Sized> IntoIterator for &'l mut List<'a, A> {
    type Item = &'l mut [u8];

    type IntoIter = IterMut<'l>;

    fn into_iter(self) -> Self::IntoIter {
        IterMut::new(Items::new(self.state))
    }
}

impl<'l> Debug for Iter<'l> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
