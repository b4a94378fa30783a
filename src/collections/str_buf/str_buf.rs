use std::borrow::Borrow;
use std::ffi::CStr;
use std::fmt::{self, Arguments, Debug, Display, Formatter, Write};
use std::ops::Deref;
use std::ptr::NonNull;
use std::slice;
use std::str::{self, Utf8Error};

use crate::alloc::{Allocator, SystemAllocator};
use crate::cstr;
#[doc(inline)]
pub use crate::util::error::{AllocError, IndexOutOfBounds, InvalidRange, StrBufError};
use crate::util::result::{OverflowExtension, ResultExtension};

/// The text that [`StrBuf::expand_tabs`] replaces every tab with.
pub const EXPANDED_TAB: &str = "    ";

/// A growable, NUL-terminated byte string, allocated through a borrowed [`Allocator`].
///
/// The length of a StrBuf never includes the terminator, while its capacity always does, so the
/// capacity is at least one greater than the length at all times. The byte at `len` is always NUL
/// and no byte before it is, which makes the contents valid as a [`CStr`] without copying.
///
/// Every text argument is treated as a C string: its contents end at its first NUL byte, or at
/// the end of the slice if there is none.
///
/// # Capacity
/// Capacity is only ever increased, and only by exactly as much as an operation needs. Clearing
/// or shortening the text keeps the allocation for reuse.
///
/// # Errors
/// Methods which can fail come in pairs: `try_*` methods return a [`Result`], while the plain
/// versions panic with the error's message.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The length of the StrBuf.
/// - `m`: The length of the text argument.
///
/// | Method | Complexity |
/// |-|-|
/// | `len` | `O(1)` |
/// | `clear` | `O(1)` |
/// | `set_text` | `O(m)`* |
/// | `append_text` | `O(m)`* |
/// | `insert_text` | `O(n+m)`* |
/// | `remove` | `O(n)` |
/// | `strip_blank` | `O(n)` |
/// | `split_*` | `O(n)`* |
///
/// \* Plus the cost of reallocating if the StrBuf doesn't have enough capacity already.
pub struct StrBuf<'a, A: Allocator + ?Sized = SystemAllocator> {
    ptr: NonNull<u8>,
    len: usize,
    cap: usize,
    alloc: &'a A,
}

impl<'a, A: Allocator + ?Sized> StrBuf<'a, A> {
    /// Creates a new, empty StrBuf with capacity 1, just enough for the terminator.
    ///
    /// # Panics
    /// Panics if the allocator fails.
    ///
    /// # Examples
    /// ```
    /// # use container_lib::alloc::SystemAllocator;
    /// # use container_lib::collections::str_buf::StrBuf;
    /// let buf = StrBuf::new(&SystemAllocator);
    /// assert_eq!(buf.len(), 0);
    /// assert_eq!(buf.cap(), 1);
    /// assert_eq!(buf.as_bytes_with_nul(), b"\0");
    /// ```
    pub fn new(alloc: &'a A) -> StrBuf<'a, A> {
        StrBuf::try_new(alloc).throw()
    }

    pub fn try_new(alloc: &'a A) -> Result<StrBuf<'a, A>, AllocError> {
        let ptr = alloc.allocate(1)?;
        // SAFETY: The block is valid for 1 byte.
        unsafe { ptr.write(0) };
        Ok(StrBuf {
            ptr,
            len: 0,
            cap: 1,
            alloc,
        })
    }

    /// Creates a new StrBuf containing a copy of `text`, with a capacity of exactly its length
    /// plus the terminator.
    ///
    /// # Panics
    /// Panics if the allocator fails.
    ///
    /// # Examples
    /// ```
    /// # use container_lib::alloc::SystemAllocator;
    /// # use container_lib::collections::str_buf::StrBuf;
    /// let buf = StrBuf::from_text(&SystemAllocator, "Hello, world");
    /// assert_eq!(buf, "Hello, world");
    /// assert_eq!(buf.len(), 12);
    /// assert_eq!(buf.cap(), 13);
    /// ```
    pub fn from_text(alloc: &'a A, text: impl AsRef<[u8]>) -> StrBuf<'a, A> {
        StrBuf::try_from_text(alloc, text).throw()
    }

    pub fn try_from_text(
        alloc: &'a A,
        text: impl AsRef<[u8]>,
    ) -> Result<StrBuf<'a, A>, AllocError> {
        let mut buf = StrBuf::try_new(alloc)?;
        buf.try_append_text(text)?;
        Ok(buf)
    }

    /// Returns the length of the text, excluding the terminator.
    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of bytes allocated, including the terminator.
    pub const fn cap(&self) -> usize {
        self.cap
    }

    /// Returns the allocator this StrBuf was created with.
    pub const fn allocator(&self) -> &'a A {
        self.alloc
    }

    /// Increases the capacity by exactly `n` bytes.
    ///
    /// # Panics
    /// Panics if the capacity overflows or the allocator fails.
    pub fn grow(&mut self, n: usize) {
        self.try_grow(n).throw()
    }

    pub fn try_grow(&mut self, n: usize) -> Result<(), AllocError> {
        if n == 0 {
            return Ok(());
        }
        let new_cap = self.cap.checked_add(n).or_overflow();
        // SAFETY: ptr is a block of cap bytes from this allocator, and new_cap is non-zero.
        let ptr = unsafe { self.alloc.reallocate(self.ptr, self.cap, new_cap)? };
        // SAFETY: The new block is valid for new_cap bytes. The added bytes are zeroed so that the
        // whole capacity stays initialized.
        unsafe { ptr.add(self.cap).write_bytes(0, n) };
        self.ptr = ptr;
        self.cap = new_cap;
        Ok(())
    }

    /// Increases the capacity to exactly `n` bytes (terminator included) if it is currently less.
    /// The StrBuf grows by the difference only, not by a growth factor.
    ///
    /// # Panics
    /// Panics if the allocator fails.
    ///
    /// # Examples
    /// ```
    /// # use container_lib::alloc::SystemAllocator;
    /// # use container_lib::collections::str_buf::StrBuf;
    /// let mut buf = StrBuf::new(&SystemAllocator);
    /// buf.ensure_capacity(10);
    /// assert_eq!(buf.cap(), 10);
    /// buf.ensure_capacity(4);
    /// assert_eq!(buf.cap(), 10);
    /// ```
    pub fn ensure_capacity(&mut self, n: usize) {
        self.try_ensure_capacity(n).throw()
    }

    pub fn try_ensure_capacity(&mut self, n: usize) -> Result<(), AllocError> {
        if self.cap < n {
            self.try_grow(n - self.cap)?;
        }
        Ok(())
    }

    /// Ensures there is room for `extra` more bytes of text after the current text.
    fn try_reserve_text(&mut self, extra: usize) -> Result<(), AllocError> {
        let needed = self
            .len
            .checked_add(extra)
            .and_then(|n| n.checked_add(1))
            .or_overflow();
        self.try_ensure_capacity(needed)
    }

    /// Empties the text, keeping the capacity.
    pub fn clear(&mut self) {
        self.set_len(0);
    }

    /// Replaces the text with a copy of `text`.
    ///
    /// # Panics
    /// Panics if the allocator fails.
    pub fn set_text(&mut self, text: impl AsRef<[u8]>) {
        self.try_set_text(text).throw()
    }

    pub fn try_set_text(&mut self, text: impl AsRef<[u8]>) -> Result<(), AllocError> {
        let text = cstr::content(text.as_ref());
        self.try_ensure_capacity(text.len().checked_add(1).or_overflow())?;
        self.buf_mut()[..text.len()].copy_from_slice(text);
        self.set_len(text.len());
        Ok(())
    }

    /// Replaces the text with formatted output, as produced by [`format_args!`].
    ///
    /// # Panics
    /// Panics if the allocator fails, or if a formatting trait implementation returns an error.
    ///
    /// # Examples
    /// ```
    /// # use container_lib::alloc::SystemAllocator;
    /// # use container_lib::collections::str_buf::StrBuf;
    /// let mut buf = StrBuf::from_text(&SystemAllocator, "old");
    /// buf.set_fmt(format_args!("{} + {} = {}", 1, 2, 1 + 2));
    /// assert_eq!(buf, "1 + 2 = 3");
    /// ```
    pub fn set_fmt(&mut self, args: Arguments<'_>) {
        self.try_set_fmt(args).throw()
    }

    /// # Panics
    /// Panics if a formatting trait implementation returns an error, like [`format!`] does.
    pub fn try_set_fmt(&mut self, args: Arguments<'_>) -> Result<(), AllocError> {
        self.clear();
        let mut writer = Appender { buf: self, error: None };
        let result = writer.write_fmt(args);
        match (writer.error, result) {
            (Some(error), _) => Err(error),
            (None, Ok(())) => Ok(()),
            (None, Err(_)) => panic!("A formatting trait implementation returned an error!"),
        }
    }

    /// Appends a copy of `text` to the end of the text.
    ///
    /// # Panics
    /// Panics if the allocator fails.
    ///
    /// # Examples
    /// ```
    /// # use container_lib::alloc::SystemAllocator;
    /// # use container_lib::collections::str_buf::StrBuf;
    /// let mut buf = StrBuf::from_text(&SystemAllocator, "Hello, ");
    /// buf.append_text("world");
    /// assert_eq!(buf, "Hello, world");
    /// assert_eq!(buf.cap(), 13);
    /// ```
    pub fn append_text(&mut self, text: impl AsRef<[u8]>) {
        self.try_append_text(text).throw()
    }

    pub fn try_append_text(&mut self, text: impl AsRef<[u8]>) -> Result<(), AllocError> {
        let text = cstr::content(text.as_ref());
        self.try_reserve_text(text.len())?;
        let len = self.len;
        self.buf_mut()[len..len + text.len()].copy_from_slice(text);
        self.set_len(len + text.len());
        Ok(())
    }

    /// Inserts a copy of `text` at byte offset `pos`, moving the text after it to the right.
    /// Inserting at the length appends.
    ///
    /// # Panics
    /// Panics if `pos` is greater than the length, or the allocator fails.
    pub fn insert_text(&mut self, pos: usize, text: impl AsRef<[u8]>) {
        self.try_insert_text(pos, text).throw()
    }

    pub fn try_insert_text(
        &mut self,
        pos: usize,
        text: impl AsRef<[u8]>,
    ) -> Result<(), StrBufError> {
        self.check_pos(pos)?;
        let text = cstr::content(text.as_ref());
        self.try_reserve_text(text.len())?;
        let len = self.len;
        let buf = self.buf_mut();
        cstr::shift_right(&mut buf[pos..], text.len());
        buf[pos..pos + text.len()].copy_from_slice(text);
        self.len = len + text.len();
        Ok(())
    }

    /// Removes the bytes in the range `from..to`, moving the text after it to the left.
    ///
    /// # Panics
    /// Panics if `to` is before `from` or greater than the length.
    ///
    /// # Examples
    /// ```
    /// # use container_lib::alloc::SystemAllocator;
    /// # use container_lib::collections::str_buf::StrBuf;
    /// let mut buf = StrBuf::from_text(&SystemAllocator, "Hello, world");
    /// buf.remove(5, 7);
    /// assert_eq!(buf, "Helloworld");
    /// ```
    pub fn remove(&mut self, from: usize, to: usize) {
        self.try_remove(from, to).throw()
    }

    pub fn try_remove(&mut self, from: usize, to: usize) -> Result<(), StrBufError> {
        if to < from {
            return Err(InvalidRange {
                start: signed(from),
                end: signed(to),
            }
            .into());
        }
        self.check_pos(to)?;
        cstr::remove(self.buf_mut(), from, to);
        self.len -= to - from;
        Ok(())
    }

    /// Removes `prefix` from the start of the text, returning whether it was present.
    pub fn remove_prefix(&mut self, prefix: impl AsRef<[u8]>) -> bool {
        let removed = cstr::remove_prefix(self.buf_mut(), prefix.as_ref());
        self.sync_len();
        removed
    }

    /// Removes `suffix` from the end of the text, returning whether it was present.
    pub fn remove_suffix(&mut self, suffix: impl AsRef<[u8]>) -> bool {
        let removed = cstr::remove_suffix(self.buf_mut(), suffix.as_ref());
        self.sync_len();
        removed
    }

    /// Removes leading spaces and tabs, returning how many were removed.
    pub fn strip_left_blank(&mut self) -> usize {
        let n = cstr::strip_left_blank(self.buf_mut());
        self.len -= n;
        n
    }

    /// Removes trailing spaces and tabs, returning how many were removed.
    pub fn strip_right_blank(&mut self) -> usize {
        let n = cstr::strip_right_blank(self.buf_mut());
        self.len -= n;
        n
    }

    /// Removes spaces and tabs from both ends, returning how many were removed.
    ///
    /// # Examples
    /// ```
    /// # use container_lib::alloc::SystemAllocator;
    /// # use container_lib::collections::str_buf::StrBuf;
    /// let mut buf = StrBuf::from_text(&SystemAllocator, "  LR blanks  ");
    /// assert_eq!(buf.strip_blank(), 4);
    /// assert_eq!(buf, "LR blanks");
    /// ```
    pub fn strip_blank(&mut self) -> usize {
        self.strip_left_blank() + self.strip_right_blank()
    }

    /// Replaces the first `n` occurrences of `chr` with `rpl`, returning the number of
    /// replacements. Replacing with NUL truncates the text at the first replacement.
    pub fn replace_char(&mut self, n: usize, chr: u8, rpl: u8) -> usize {
        let count = cstr::replace_char(self.buf_mut(), n, chr, rpl);
        self.sync_len();
        count
    }

    /// Replaces the first `n` occurrences of `sub` with `rpl`, returning the number of
    /// replacements. Each search resumes after the previous replacement. Unlike
    /// [`cstr::replace_substring`], the replacement may be longer than `sub`, in which case the
    /// StrBuf grows as needed.
    ///
    /// # Panics
    /// Panics if the allocator fails.
    ///
    /// # Examples
    /// ```
    /// # use container_lib::alloc::SystemAllocator;
    /// # use container_lib::collections::str_buf::StrBuf;
    /// let mut buf = StrBuf::from_text(&SystemAllocator, "lolo, lolo");
    /// assert_eq!(buf.replace_text(usize::MAX, "lo", "yo"), 4);
    /// assert_eq!(buf, "yoyo, yoyo");
    /// assert_eq!(buf.replace_text(1, "yoyo", "hello"), 1);
    /// assert_eq!(buf, "hello, yoyo");
    /// ```
    pub fn replace_text(
        &mut self,
        n: usize,
        sub: impl AsRef<[u8]>,
        rpl: impl AsRef<[u8]>,
    ) -> usize {
        self.try_replace_text(n, sub, rpl).throw()
    }

    pub fn try_replace_text(
        &mut self,
        n: usize,
        sub: impl AsRef<[u8]>,
        rpl: impl AsRef<[u8]>,
    ) -> Result<usize, AllocError> {
        let sub = cstr::content(sub.as_ref());
        let rpl = cstr::content(rpl.as_ref());

        if rpl.len() <= sub.len() {
            let count = cstr::replace_substring(self.buf_mut(), n, sub, rpl);
            self.sync_len();
            return Ok(count);
        }

        let extra = rpl.len() - sub.len();
        let mut count = 0;
        let mut from = 0;
        while count < n {
            let at = from + cstr::find_substring(&self.as_bytes()[from..], 1, sub);
            if at == self.len {
                break;
            }
            self.try_reserve_text(extra)?;
            let buf = self.buf_mut();
            cstr::shift_right(&mut buf[at + sub.len()..], extra);
            buf[at..at + rpl.len()].copy_from_slice(rpl);
            self.len += extra;
            from = at + rpl.len();
            count += 1;
        }
        Ok(count)
    }

    /// Appends `glue` followed by each of `others` in turn.
    ///
    /// # Panics
    /// Panics if the allocator fails.
    ///
    /// # Examples
    /// ```
    /// # use container_lib::alloc::SystemAllocator;
    /// # use container_lib::collections::str_buf::StrBuf;
    /// let mut buf = StrBuf::from_text(&SystemAllocator, "For");
    /// buf.join(" ", ["the", "Love", "of", "Programming"]);
    /// assert_eq!(buf, "For the Love of Programming");
    /// ```
    pub fn join<T: AsRef<[u8]>>(
        &mut self,
        glue: impl AsRef<[u8]>,
        others: impl IntoIterator<Item = T>,
    ) {
        self.try_join(glue, others).throw()
    }

    pub fn try_join<T: AsRef<[u8]>>(
        &mut self,
        glue: impl AsRef<[u8]>,
        others: impl IntoIterator<Item = T>,
    ) -> Result<(), AllocError> {
        let glue = glue.as_ref();
        for other in others {
            self.try_append_text(glue)?;
            self.try_append_text(other)?;
        }
        Ok(())
    }

    /// Replaces every tab with [`EXPANDED_TAB`].
    ///
    /// # Panics
    /// Panics if the allocator fails.
    pub fn expand_tabs(&mut self) {
        self.try_expand_tabs().throw()
    }

    pub fn try_expand_tabs(&mut self) -> Result<(), AllocError> {
        self.try_replace_text(usize::MAX, "\t", EXPANDED_TAB)?;
        Ok(())
    }

    /// Pads the end of the text with `fill` until it is at least `width` bytes long.
    ///
    /// # Panics
    /// Panics if `fill` is NUL or the allocator fails.
    pub fn justify_left(&mut self, width: usize, fill: u8) {
        self.try_justify(width, fill, |_| 0).throw()
    }

    pub fn try_justify_left(&mut self, width: usize, fill: u8) -> Result<(), AllocError> {
        self.try_justify(width, fill, |_| 0)
    }

    /// Pads the start of the text with `fill` until it is at least `width` bytes long.
    ///
    /// # Panics
    /// Panics if `fill` is NUL or the allocator fails.
    pub fn justify_right(&mut self, width: usize, fill: u8) {
        self.try_justify(width, fill, |pad| pad).throw()
    }

    pub fn try_justify_right(&mut self, width: usize, fill: u8) -> Result<(), AllocError> {
        self.try_justify(width, fill, |pad| pad)
    }

    /// Pads both ends of the text with `fill` until it is at least `width` bytes long. When the
    /// padding can't be split evenly, the extra byte goes at the end.
    ///
    /// # Panics
    /// Panics if `fill` is NUL or the allocator fails.
    ///
    /// # Examples
    /// ```
    /// # use container_lib::alloc::SystemAllocator;
    /// # use container_lib::collections::str_buf::StrBuf;
    /// let mut buf = StrBuf::from_text(&SystemAllocator, "title");
    /// buf.justify_center(10, b'=');
    /// assert_eq!(buf, "==title===");
    /// ```
    pub fn justify_center(&mut self, width: usize, fill: u8) {
        self.try_justify(width, fill, |pad| pad / 2).throw()
    }

    pub fn try_justify_center(&mut self, width: usize, fill: u8) -> Result<(), AllocError> {
        self.try_justify(width, fill, |pad| pad / 2)
    }

    /// Pads the text to `width`, placing `before(pad)` of the `pad` fill bytes before the text and
    /// the rest after it.
    fn try_justify(
        &mut self,
        width: usize,
        fill: u8,
        before: impl FnOnce(usize) -> usize,
    ) -> Result<(), AllocError> {
        assert_ne!(fill, 0, "Can't pad a StrBuf with NUL bytes!");
        let Some(pad) = width.checked_sub(self.len).filter(|&pad| pad > 0) else {
            return Ok(());
        };
        self.try_reserve_text(pad)?;

        let len = self.len;
        let left = before(pad);
        let buf = self.buf_mut();
        cstr::shift_right(buf, left);
        buf[..left].fill(fill);
        buf[left + len..width].fill(fill);
        self.set_len(width);
        Ok(())
    }

    /// Splits the text at byte offset `at`. This StrBuf keeps the text before `at`, and `right` is
    /// set to the text after it. The capacity of this StrBuf is left unchanged.
    ///
    /// # Panics
    /// Panics if `at` is greater than the length, or the allocator fails.
    ///
    /// # Examples
    /// ```
    /// # use container_lib::alloc::SystemAllocator;
    /// # use container_lib::collections::str_buf::StrBuf;
    /// let mut buf = StrBuf::from_text(&SystemAllocator, "For the Love of Programming");
    /// let mut right = StrBuf::new(&SystemAllocator);
    /// buf.split_off_right(12, &mut right);
    /// assert_eq!(buf, "For the Love");
    /// assert_eq!(right, " of Programming");
    /// ```
    pub fn split_off_right<B: Allocator + ?Sized>(
        &mut self,
        at: usize,
        right: &mut StrBuf<'_, B>,
    ) {
        self.try_split_off_right(at, right).throw()
    }

    pub fn try_split_off_right<B: Allocator + ?Sized>(
        &mut self,
        at: usize,
        right: &mut StrBuf<'_, B>,
    ) -> Result<(), StrBufError> {
        self.check_pos(at)?;
        right.try_set_text(&self.as_bytes()[at..])?;
        self.truncate(at);
        Ok(())
    }

    /// Splits the text at byte offset `at`. `left` is set to the text before `at`, and this
    /// StrBuf keeps the text after it, moved to the start.
    ///
    /// # Panics
    /// Panics if `at` is greater than the length, or the allocator fails.
    pub fn split_off_left<B: Allocator + ?Sized>(
        &mut self,
        at: usize,
        left: &mut StrBuf<'_, B>,
    ) {
        self.try_split_off_left(at, left).throw()
    }

    pub fn try_split_off_left<B: Allocator + ?Sized>(
        &mut self,
        at: usize,
        left: &mut StrBuf<'_, B>,
    ) -> Result<(), StrBufError> {
        self.check_pos(at)?;
        left.try_set_text(&self.as_bytes()[..at])?;
        cstr::shift_left(self.buf_mut(), at);
        self.len -= at;
        Ok(())
    }

    /// Copies the text before byte offset `at` to `left` and the text after it to `right`,
    /// leaving this StrBuf unchanged.
    ///
    /// # Panics
    /// Panics if `at` is greater than the length, or the allocator fails.
    pub fn split_into<B: Allocator + ?Sized, C: Allocator + ?Sized>(
        &self,
        at: usize,
        left: &mut StrBuf<'_, B>,
        right: &mut StrBuf<'_, C>,
    ) {
        self.try_split_into(at, left, right).throw()
    }

    pub fn try_split_into<B: Allocator + ?Sized, C: Allocator + ?Sized>(
        &self,
        at: usize,
        left: &mut StrBuf<'_, B>,
        right: &mut StrBuf<'_, C>,
    ) -> Result<(), StrBufError> {
        self.check_pos(at)?;
        left.try_set_text(&self.as_bytes()[..at])?;
        right.try_set_text(&self.as_bytes()[at..])?;
        Ok(())
    }

    /// Shortens the text to `len` bytes. Has no effect if the text is already shorter.
    pub fn truncate(&mut self, len: usize) {
        if len < self.len {
            let old = self.len;
            self.buf_mut()[len..old].fill(0);
            self.len = len;
        }
    }

    /// Creates a deep copy of this StrBuf with the same allocator. The copy has the same text and
    /// the same capacity.
    ///
    /// # Panics
    /// Panics if the allocator fails.
    pub fn copy(&self) -> StrBuf<'a, A> {
        self.try_copy().throw()
    }

    pub fn try_copy(&self) -> Result<StrBuf<'a, A>, AllocError> {
        let mut copy = StrBuf::try_new(self.alloc)?;
        copy.try_ensure_capacity(self.cap)?;
        copy.try_set_text(self.as_bytes())?;
        Ok(copy)
    }

    /// Returns the text, excluding the terminator.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf()[..self.len]
    }

    /// Returns the text, including the terminator.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.buf()[..=self.len]
    }

    pub fn as_c_str(&self) -> &CStr {
        // SAFETY: The text is terminated at len and contains no other NUL bytes.
        unsafe { CStr::from_bytes_with_nul_unchecked(self.as_bytes_with_nul()) }
    }

    /// Returns the text as a [`str`] if it is valid UTF-8.
    pub fn to_str(&self) -> Result<&str, Utf8Error> {
        str::from_utf8(self.as_bytes())
    }

    /// Returns a raw pointer to the NUL-terminated text, valid until the StrBuf is next modified.
    pub const fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }
}

impl<'a, A: Allocator + ?Sized> StrBuf<'a, A> {
    /// The whole allocation, which is always initialized.
    fn buf(&self) -> &[u8] {
        // SAFETY: ptr is valid for cap bytes, all of which are zeroed when allocated.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.cap) }
    }

    fn buf_mut(&mut self) -> &mut [u8] {
        // SAFETY: See StrBuf::buf. The StrBuf is borrowed mutably, so the slice is unique.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.cap) }
    }

    /// Sets the length and writes the terminator after it.
    fn set_len(&mut self, len: usize) {
        self.buf_mut()[len] = 0;
        self.len = len;
    }

    /// Recomputes the length after a primitive which may have shortened the text.
    fn sync_len(&mut self) {
        self.len = cstr::length(self.buf());
    }

    fn check_pos(&self, pos: usize) -> Result<(), IndexOutOfBounds> {
        if pos > self.len {
            return Err(IndexOutOfBounds {
                index: signed(pos),
                len: self.len,
            });
        }
        Ok(())
    }
}

fn signed(index: usize) -> isize {
    isize::try_from(index).unwrap_or(isize::MAX)
}

/// Appends formatted text to a StrBuf, holding onto the first allocation error since
/// [`fmt::Error`] can't carry one.
struct Appender<'b, 'a, A: Allocator + ?Sized> {
    buf: &'b mut StrBuf<'a, A>,
    error: Option<AllocError>,
}

impl<'b, 'a, A: Allocator + ?Sized> Write for Appender<'b, 'a, A> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.buf.try_append_text(s).map_err(|error| {
            self.error = Some(error);
            fmt::Error
        })
    }
}

impl<'a, A: Allocator + ?Sized> Write for StrBuf<'a, A> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.try_append_text(s).map_err(|_| fmt::Error)
    }
}

impl<'a, A: Allocator + ?Sized> Drop for StrBuf<'a, A> {
    fn drop(&mut self) {
        // SAFETY: ptr is a block of cap bytes from this allocator, which is never used again.
        unsafe { self.alloc.release(self.ptr, self.cap) }
    }
}

impl<'a, A: Allocator + ?Sized> Deref for StrBuf<'a, A> {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.as_bytes()
    }
}

impl<'a, A: Allocator + ?Sized> AsRef<[u8]> for StrBuf<'a, A> {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl<'a, A: Allocator + ?Sized> Borrow<[u8]> for StrBuf<'a, A> {
    fn borrow(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl<'a, A: Allocator + ?Sized> Clone for StrBuf<'a, A> {
    fn clone(&self) -> Self {
        self.copy()
    }
}

impl<'a, 'b, A: Allocator + ?Sized, B: Allocator + ?Sized> PartialEq<StrBuf<'b, B>>
    for StrBuf<'a, A>
{
    fn eq(&self, other: &StrBuf<'b, B>) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl<'a, A: Allocator + ?Sized> Eq for StrBuf<'a, A> {}

impl<'a, A: Allocator + ?Sized> PartialEq<[u8]> for StrBuf<'a, A> {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_bytes() == other
    }
}

impl<'a, A: Allocator + ?Sized> PartialEq<str> for StrBuf<'a, A> {
    fn eq(&self, other: &str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl<'a, A: Allocator + ?Sized> PartialEq<&str> for StrBuf<'a, A> {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl<'a, A: Allocator + ?Sized> Display for StrBuf<'a, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for chunk in self.as_bytes().utf8_chunks() {
            f.write_str(chunk.valid())?;
            if !chunk.invalid().is_empty() {
                f.write_char(char::REPLACEMENT_CHARACTER)?;
            }
        }
        Ok(())
    }
}

impl<'a, A: Allocator + ?Sized> Debug for StrBuf<'a, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrBuf")
            .field("text", &self.as_c_str())
            .field("len", &self.len)
            .field("cap", &self.cap)
            .finish()
    }
}
