use std::fmt::{self, Debug, Formatter};

use crate::alloc::{Allocator, SystemAllocator};
use crate::collections::list::List;
use crate::collections::str_buf::StrBuf;
use crate::cstr;
use crate::util::error::StrBufError;
use crate::util::result::ResultExtension;

/// The blank separated words of a command line, each owned by a [`StrBuf`] stored as an element
/// of a [`List`]. Every token is non-empty and contains no blank characters.
///
/// The List itself never drops its elements, so Tokens takes each StrBuf back out when dropped.
pub struct Tokens<'a, A: Allocator + ?Sized = SystemAllocator> {
    list: List<'a, A>,
}

/// Splits `text` on runs of blank characters, dropping blanks at either end.
///
/// # Panics
/// Panics if the allocator fails.
///
/// # Examples
/// ```
/// # use container_lib::alloc::SystemAllocator;
/// # use container_lib::builder::tokenize;
/// let tokens = tokenize("  cat\tmain.c -n ", &SystemAllocator);
/// assert_eq!(tokens.len(), 3);
/// assert_eq!(tokens.get(0), "cat");
/// assert_eq!(tokens.get(-1), "-n");
/// ```
pub fn tokenize<'a, A: Allocator + ?Sized>(
    text: impl AsRef<[u8]>,
    alloc: &'a A,
) -> Tokens<'a, A> {
    try_tokenize(text, alloc).throw()
}

pub fn try_tokenize<'a, A: Allocator + ?Sized>(
    text: impl AsRef<[u8]>,
    alloc: &'a A,
) -> Result<Tokens<'a, A>, StrBufError> {
    let mut tokens = Tokens { list: List::new(alloc) };
    let mut rest = StrBuf::try_from_text(alloc, text)?;
    loop {
        rest.strip_left_blank();
        if rest.is_empty() {
            break;
        }
        let mut token = StrBuf::try_new(alloc)?;
        // Without a blank left, the whole remainder becomes the last token.
        rest.try_split_off_left(cstr::find_blank(&rest), &mut token)?;
        tokens.list.try_push_value(token)?;
    }
    Ok(tokens)
}

impl<'a, A: Allocator + ?Sized> Tokens<'a, A> {
    pub const fn len(&self) -> usize {
        self.list.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Returns the token at `index`, counting back from the end if negative.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn get(&self, index: isize) -> &StrBuf<'a, A> {
        // SAFETY: Every element was written by try_tokenize as a StrBuf<'a, A>.
        unsafe { self.list.value(index) }
    }

    /// Removes and returns the last token.
    pub fn pop(&mut self) -> Option<StrBuf<'a, A>> {
        if self.list.is_empty() {
            None
        } else {
            // SAFETY: See Tokens::get. The element is removed along with the value.
            Some(unsafe { self.list.take_value(-1) })
        }
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &StrBuf<'a, A>> + ExactSizeIterator {
        self.list.elements().map(|elem| {
            // SAFETY: See Tokens::get. The reference is bound to the borrow of the List.
            unsafe { elem.cast::<StrBuf<'a, A>>().as_ref() }
        })
    }

    /// The underlying List, whose elements are each a `StrBuf<'a, A>`.
    pub const fn as_list(&self) -> &List<'a, A> {
        &self.list
    }
}

impl<A: Allocator + ?Sized> Drop for Tokens<'_, A> {
    fn drop(&mut self) {
        while self.pop().is_some() {}
    }
}

impl<A: Allocator + ?Sized> Debug for Tokens<'_, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
