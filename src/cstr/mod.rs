//! Allocation-free primitives over NUL-terminated byte strings.
//!
//! Every function accepts a byte slice holding a C-style string: the text ends at the first NUL
//! byte, or at the end of the slice if there is none. Functions which modify text work in place
//! and always leave the text NUL-terminated when the slice has room for it.
//!
//! Searching functions return the length of the text when nothing is found, which is also the
//! position of the terminator.

use std::cmp::Ordering;
use std::iter;

mod tests;

/// Returns the length of `text`, excluding the terminator.
///
/// # Examples
/// ```
/// # use container_lib::cstr;
/// assert_eq!(cstr::length(b"Hello, world\0"), 12);
/// assert_eq!(cstr::length(b"Hello\0world"), 5);
/// assert_eq!(cstr::length(b"no terminator"), 13);
/// ```
pub fn length(text: &[u8]) -> usize {
    text.iter().position(|&b| b == 0).unwrap_or(text.len())
}

/// Returns the bytes of `text` up to, but not including, the terminator.
pub fn content(text: &[u8]) -> &[u8] {
    &text[..length(text)]
}

/// Returns true for the characters considered blank: space and tab.
pub const fn is_blank_char(chr: u8) -> bool {
    matches!(chr, b' ' | b'\t')
}

fn all_of(text: &[u8], empty: bool, pred: impl Fn(u8) -> bool) -> bool {
    let text = content(text);
    if text.is_empty() {
        empty
    } else {
        text.iter().all(|&c| pred(c))
    }
}

/// Returns true if `text` contains only blank characters. The empty text is blank.
pub fn is_blank(text: &[u8]) -> bool {
    all_of(text, true, is_blank_char)
}

/// Returns true if `text` is a non-empty sequence of decimal digits.
pub fn is_digit(text: &[u8]) -> bool {
    all_of(text, false, |c| c.is_ascii_digit())
}

/// Returns true if `text` is a non-empty sequence of uppercase ASCII letters.
pub fn is_upper(text: &[u8]) -> bool {
    all_of(text, false, |c| c.is_ascii_uppercase())
}

/// Returns true if `text` contains only lowercase ASCII letters. The empty text is lowercase.
pub fn is_lower(text: &[u8]) -> bool {
    all_of(text, true, |c| c.is_ascii_lowercase())
}

/// Returns true if `text` contains only ASCII letters. The empty text qualifies.
pub fn is_alpha(text: &[u8]) -> bool {
    all_of(text, true, |c| c.is_ascii_alphabetic())
}

/// Returns true if `text` contains only ASCII letters and digits. The empty text qualifies.
pub fn is_alnum(text: &[u8]) -> bool {
    all_of(text, true, |c| c.is_ascii_alphanumeric())
}

/// Returns true if `text` is a non-empty sequence of binary digits.
pub fn is_bin(text: &[u8]) -> bool {
    all_of(text, false, |c| matches!(c, b'0' | b'1'))
}

/// Returns true if `text` is a non-empty sequence of octal digits.
pub fn is_octal(text: &[u8]) -> bool {
    all_of(text, false, |c| matches!(c, b'0'..=b'7'))
}

/// Returns true if `text` is a non-empty sequence of hexadecimal digits, in either case.
pub fn is_hex(text: &[u8]) -> bool {
    all_of(text, false, |c| c.is_ascii_hexdigit())
}

pub fn is_equal(a: &[u8], b: &[u8]) -> bool {
    content(a) == content(b)
}

/// Returns true if `text` begins with `sub`. Every text starts with the empty text.
pub fn starts_with(text: &[u8], sub: &[u8]) -> bool {
    content(text).starts_with(content(sub))
}

/// Returns true if `text` ends with `sub`. Every text ends with the empty text.
pub fn ends_with(text: &[u8], sub: &[u8]) -> bool {
    content(text).ends_with(content(sub))
}

/// Returns the position of the first blank character in `text`.
pub fn find_blank(text: &[u8]) -> usize {
    let text = content(text);
    text.iter()
        .position(|&c| is_blank_char(c))
        .unwrap_or(text.len())
}

/// Picks the `n`th match, counting from the front for a positive `n` and from the back for a
/// negative `n`. There is no zeroth match.
fn nth_match(
    n: isize,
    mut forward: impl Iterator<Item = usize>,
    mut backward: impl Iterator<Item = usize>,
) -> Option<usize> {
    match n.cmp(&0) {
        Ordering::Greater => forward.nth(n.unsigned_abs() - 1),
        Ordering::Less => backward.nth(n.unsigned_abs() - 1),
        Ordering::Equal => None,
    }
}

/// Returns the position of the `n`th occurrence of `chr` in `text`. A positive `n` counts from
/// the front (`1` is the first occurrence) and a negative `n` counts from the back (`-1` is the
/// last occurrence).
///
/// # Examples
/// ```
/// # use container_lib::cstr;
/// assert_eq!(cstr::find_char(b"Hello, world", 1, b','), 5);
/// assert_eq!(cstr::find_char(b"Hello, world", 3, b'l'), 10);
/// assert_eq!(cstr::find_char(b"Hello, world", -3, b'l'), 2);
/// assert_eq!(cstr::find_char(b"Hello, world", 1, b'!'), 12);
/// ```
pub fn find_char(text: &[u8], n: isize, chr: u8) -> usize {
    let text = content(text);
    let positions = text.iter().enumerate().filter(|(_, c)| **c == chr);
    let forward = positions.clone().map(|(i, _)| i);
    let backward = positions.rev().map(|(i, _)| i);
    nth_match(n, forward, backward).unwrap_or(text.len())
}

/// Returns the position of the first occurrence of `sub` in `text`, which must be non-empty.
fn find_first(text: &[u8], sub: &[u8]) -> Option<usize> {
    text.windows(sub.len()).position(|w| w == sub)
}

fn find_last(text: &[u8], sub: &[u8]) -> Option<usize> {
    text.windows(sub.len()).rposition(|w| w == sub)
}

/// Returns the position of the `n`th occurrence of `sub` in `text`, using the same counting as
/// [`find_char`]. Occurrences don't overlap: each search resumes after the previous match. An
/// empty `sub` is never found.
///
/// # Examples
/// ```
/// # use container_lib::cstr;
/// assert_eq!(cstr::find_substring(b"Hello, world", 1, b"wor"), 7);
/// assert_eq!(cstr::find_substring(b"Hello, world", -1, b"l"), 10);
/// assert_eq!(cstr::find_substring(b"Hello, world", 1, b"word"), 12);
/// ```
pub fn find_substring(text: &[u8], n: isize, sub: &[u8]) -> usize {
    let text = content(text);
    let sub = content(sub);
    if sub.is_empty() {
        return text.len();
    }

    let mut from = 0;
    let forward = iter::from_fn(|| {
        let at = from + find_first(&text[from..], sub)?;
        from = at + sub.len();
        Some(at)
    });

    let mut to = text.len();
    let backward = iter::from_fn(|| {
        let at = find_last(&text[..to], sub)?;
        to = at;
        Some(at)
    });

    nth_match(n, forward, backward).unwrap_or(text.len())
}

/// Moves the text in `buf` `n` bytes to the left, discarding its first `n` bytes and zeroing the
/// vacated bytes at the end. Shifting by at least the length empties the text.
///
/// # Examples
/// ```
/// # use container_lib::cstr;
/// let mut buf = *b"Hello, world\0";
/// cstr::shift_left(&mut buf, 2);
/// assert_eq!(&buf, b"llo, world\0\0\0");
/// ```
pub fn shift_left(buf: &mut [u8], n: usize) {
    let len = length(buf);
    let n = n.min(len);
    buf.copy_within(n..len, 0);
    buf[len - n..len].fill(0);
}

/// Moves the text in `buf` `n` bytes to the right and terminates it at its new end. The first `n`
/// bytes keep their previous content, ready to be overwritten.
///
/// # Panics
/// Panics if `buf` is too short to hold the moved text.
///
/// # Examples
/// ```
/// # use container_lib::cstr;
/// let mut buf = *b"world\0\0\0\0\0\0\0\0";
/// cstr::shift_right(&mut buf, 7);
/// buf[..7].copy_from_slice(b"Hello, ");
/// assert_eq!(&buf, b"Hello, world\0");
/// ```
pub fn shift_right(buf: &mut [u8], n: usize) {
    let len = length(buf);
    buf.copy_within(0..len, n);
    if let Some(term) = buf.get_mut(len + n) {
        *term = 0;
    }
}

/// Removes the bytes in the range `from..to` from the text in `buf`, shifting the remainder left.
///
/// # Panics
/// Panics if `to` is before `from` or past the end of the text.
pub fn remove(buf: &mut [u8], from: usize, to: usize) {
    let len = length(buf);
    assert!(
        from <= to && to <= len,
        "Range {from}..{to} is outside of text with length {len}!"
    );
    shift_left(&mut buf[from..], to - from);
}

/// Removes `prefix` from the start of the text in `buf`, returning whether it was present.
pub fn remove_prefix(buf: &mut [u8], prefix: &[u8]) -> bool {
    if !starts_with(buf, prefix) {
        return false;
    }
    shift_left(buf, length(prefix));
    true
}

/// Removes `suffix` from the end of the text in `buf`, returning whether it was present.
pub fn remove_suffix(buf: &mut [u8], suffix: &[u8]) -> bool {
    if !ends_with(buf, suffix) {
        return false;
    }
    let len = length(buf);
    buf[len - length(suffix)..len].fill(0);
    true
}

/// Removes the leading blank characters, returning how many were removed.
pub fn strip_left_blank(buf: &mut [u8]) -> usize {
    let n = content(buf)
        .iter()
        .take_while(|&&c| is_blank_char(c))
        .count();
    shift_left(buf, n);
    n
}

/// Removes the trailing blank characters, returning how many were removed.
pub fn strip_right_blank(buf: &mut [u8]) -> usize {
    let len = length(buf);
    let n = buf[..len]
        .iter()
        .rev()
        .take_while(|&&c| is_blank_char(c))
        .count();
    buf[len - n..len].fill(0);
    n
}

/// Removes the blank characters at both ends, returning how many were removed in total.
///
/// # Examples
/// ```
/// # use container_lib::cstr;
/// let mut buf = *b"  LR blanks  \0";
/// assert_eq!(cstr::strip_blank(&mut buf), 4);
/// assert_eq!(cstr::content(&buf), b"LR blanks");
/// ```
pub fn strip_blank(buf: &mut [u8]) -> usize {
    strip_left_blank(buf) + strip_right_blank(buf)
}

/// Replaces the first `n` occurrences of `chr` with `rpl`, returning the number of replacements.
/// Replacing with NUL truncates the text at the first replaced byte.
pub fn replace_char(buf: &mut [u8], n: usize, chr: u8, rpl: u8) -> usize {
    let len = length(buf);
    let mut count = 0;
    for c in buf[..len].iter_mut().filter(|c| **c == chr).take(n) {
        *c = rpl;
        count += 1;
    }
    count
}

/// Replaces the first `n` occurrences of `sub` with `rpl` in place, returning the number of
/// replacements. Each search resumes after the previous replacement, so `rpl` is never searched.
///
/// The text can only shrink: nothing is replaced if `rpl` is longer than `sub`, or if `sub` is
/// empty.
///
/// # Examples
/// ```
/// # use container_lib::cstr;
/// let mut buf = *b"Hello, lord\0";
/// assert_eq!(cstr::replace_substring(&mut buf, 3, b"lo", b"ya"), 2);
/// assert_eq!(cstr::content(&buf), b"Helya, yard");
/// ```
pub fn replace_substring(buf: &mut [u8], n: usize, sub: &[u8], rpl: &[u8]) -> usize {
    let sub = content(sub);
    let rpl = content(rpl);
    if sub.is_empty() || rpl.len() > sub.len() {
        return 0;
    }

    let mut count = 0;
    let mut from = 0;
    while count < n {
        let len = length(buf);
        let Some(at) = find_first(&buf[from..len], sub).map(|i| from + i) else {
            break;
        };
        buf[at..at + rpl.len()].copy_from_slice(rpl);
        shift_left(&mut buf[at + rpl.len()..], sub.len() - rpl.len());
        from = at + rpl.len();
        count += 1;
    }
    count
}

/// Copies the text in `from`, including its terminator, to the start of `to`. The terminator is
/// left out if `to` is exactly as long as the text.
///
/// # Panics
/// Panics if `to` is shorter than the text.
pub fn copy(from: &[u8], to: &mut [u8]) {
    let len = length(from);
    to[..len].copy_from_slice(&from[..len]);
    if let Some(term) = to.get_mut(len) {
        *term = 0;
    }
}

/// Copies at most `n` bytes of the text in `from` to `to`, filling the rest of the first `n`
/// bytes of `to` with zeros. Like `strncpy`, the result isn't terminated if the text is at least
/// `n` bytes long.
///
/// # Panics
/// Panics if `to` is shorter than `n`.
pub fn copy_n(from: &[u8], n: usize, to: &mut [u8]) {
    let len = length(from).min(n);
    to[..len].copy_from_slice(&from[..len]);
    to[len..n].fill(0);
}

pub const fn repr_bool(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}
