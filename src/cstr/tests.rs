#![cfg(test)]

use super::*;
use crate::util::panic::assert_panics;

/// Copies `text` into a fixed-size terminated buffer, like a stack `char[N]` would hold it.
fn buffer<const N: usize>(text: &str) -> [u8; N] {
    let mut buf = [0; N];
    copy(text.as_bytes(), &mut buf);
    buf
}

#[test]
fn test_length() {
    assert_eq!(length(b""), 0);
    assert_eq!(length(b"\0"), 0);
    assert_eq!(length(b"Hello, world"), 12);
    assert_eq!(
        length(b"Hello\0, world"),
        5,
        "The text should end at the first NUL byte."
    );
}

#[test]
fn test_predicates() {
    assert!(is_digit(b"123"));
    assert!(!is_digit(b"1s23"));
    assert!(!is_alpha(b"asd341naAd"));
    assert!(is_alnum(b"asd341naAd"));
    assert!(is_upper(b"ABC"));
    assert!(!is_upper(b"AbC"));
    assert!(is_lower(b"abc"));
    assert!(is_bin(b"0110"));
    assert!(!is_bin(b"012"));
    assert!(is_octal(b"0755"));
    assert!(!is_octal(b"0758"));
    assert!(is_hex(b"DeadBeef09"));
    assert!(!is_hex(b"0xff"));
    assert!(is_blank(b" \t "));
    assert!(!is_blank(b" x "));

    assert!(is_blank(b""), "The empty text should be blank.");
    assert!(is_lower(b"") && is_alpha(b"") && is_alnum(b""));
    assert!(
        !is_digit(b"") && !is_upper(b"") && !is_bin(b"") && !is_octal(b"") && !is_hex(b""),
        "Number predicates should require at least one digit."
    );

    assert_eq!(repr_bool(is_digit(b"42\0x")), "true");
    assert_eq!(repr_bool(false), "false");
}

#[test]
fn test_comparisons() {
    assert!(is_equal(b"Hello, world", b"Hello, world"));
    assert!(is_equal(b"Hello, world\0junk", b"Hello, world"));
    assert!(!is_equal(b"Hello, world", b"Hello. world"));
    assert!(!is_equal(b"Hello, world", b"Hello, world!"));

    assert!(starts_with(b"Hello, world", b"Hell"));
    assert!(!starts_with(b"Hello, world", b"Helg"));
    assert!(starts_with(b"Hello, world", b""));
    assert!(
        !starts_with(b"Hell", b"Hello"),
        "A text can't start with something longer than itself."
    );

    assert!(ends_with(b"Hello, world", b"ld"));
    assert!(!ends_with(b"Hello, world", b"cold"));
    assert!(ends_with(b"Hello, world", b""));
    assert!(!ends_with(b"ld", b"world"));
}

#[test]
fn test_find() {
    assert_eq!(find_char(b"", 1, b'!'), 0);
    assert_eq!(find_char(b"Hello, world", 1, b','), 5);
    assert_eq!(find_char(b"Hello, world", 1, b'!'), 12);
    assert_eq!(find_char(b"Hello, world", 3, b'l'), 10);
    assert_eq!(find_char(b"Hello, world", 4, b'l'), 12);
    assert_eq!(find_char(b"Hello, world", -1, b'o'), 8);
    assert_eq!(find_char(b"Hello, world", 0, b'H'), 12, "There is no zeroth match.");

    assert_eq!(find_substring(b"Hello, world", 1, b"wor"), 7);
    assert_eq!(find_substring(b"Hello, world", 1, b"word"), 12);
    assert_eq!(find_substring(b"Hello, world", 1, b"words"), 12);
    assert_eq!(find_substring(b"Hello, world", -1, b"word"), 12);
    assert_eq!(find_substring(b"Hello, world", 1, b"l"), 2);
    assert_eq!(find_substring(b"Hello, world", -1, b"l"), 10);
    assert_eq!(find_substring(b"Hello, world", 3, b"!"), 12);
    assert_eq!(find_substring(b"Hello, world", 3, b""), 12);
    assert_eq!(
        find_substring(b"aaaa", 2, b"aa"),
        2,
        "Matches shouldn't overlap."
    );
    assert_eq!(find_substring(b"aaaaa", -2, b"aa"), 1);

    assert_eq!(find_blank(b"Hello, world"), 6);
    assert_eq!(find_blank(b"Hello,\tworld"), 6);
    assert_eq!(find_blank(b"Hello,.world"), 12);
}

#[test]
fn test_replace() {
    let mut x: [u8; 13] = buffer("Hello, world");
    assert_eq!(replace_char(&mut x, 1, b'w', b'W'), 1);
    assert_eq!(content(&x), b"Hello, World");

    let mut x: [u8; 13] = buffer("Hello, world");
    assert_eq!(replace_substring(&mut x, 1, b"Hello", b"hyelo"), 1);
    assert_eq!(content(&x), b"hyelo, world");

    let mut x: [u8; 13] = buffer("Hello, world");
    assert_eq!(replace_char(&mut x, 3, b'l', b'i'), 3);
    assert_eq!(content(&x), b"Heiio, worid");

    let mut x: [u8; 13] = buffer("Hello, lord");
    assert_eq!(replace_substring(&mut x, 2, b"lo", b"ya"), 2);
    assert_eq!(content(&x), b"Helya, yard");

    let mut x: [u8; 13] = buffer("lolo, lolo");
    assert_eq!(replace_substring(&mut x, 2, b"lolo", b"yoyo"), 2);
    assert_eq!(content(&x), b"yoyo, yoyo");

    let mut x: [u8; 13] = buffer("lolo, lolo");
    assert_eq!(replace_substring(&mut x, 2, b"lo", b"yo"), 2);
    assert_eq!(content(&x), b"yoyo, lolo");

    let mut x: [u8; 13] = buffer("lolo, lolo");
    assert_eq!(replace_substring(&mut x, usize::MAX, b"lo", b"yo"), 4);
    assert_eq!(content(&x), b"yoyo, yoyo");

    let mut x: [u8; 13] = buffer("Hello, world");
    assert_eq!(replace_substring(&mut x, 1, b"world", b"W"), 1);
    assert_eq!(content(&x), b"Hello, W");
    assert_eq!(x[8..], [0; 5], "The shrunk text should leave zeros behind.");

    let mut x: [u8; 13] = buffer("Hello, world");
    assert_eq!(
        replace_substring(&mut x, 1, b"world", b"worlds"),
        0,
        "A replacement can't grow the text."
    );
    assert_eq!(replace_char(&mut x, usize::MAX, b'l', b'l'), 3);
    assert_eq!(content(&x), b"Hello, world");
}

#[test]
fn test_shift() {
    let mut x: [u8; 13] = buffer("Hello, world");
    shift_left(&mut x, 2);
    assert_eq!(content(&x), b"llo, world");

    shift_left(&mut x, 20);
    assert_eq!(content(&x), b"", "Shifting past the length should empty the text.");
    assert_eq!(x, [0; 13]);

    let mut x: [u8; 16] = buffer("Hello, world");
    shift_right(&mut x, 3);
    assert_eq!(length(&x), 15);
    assert_eq!(&x[3..], b"Hello, world\0");

    assert_panics!({
        let mut x: [u8; 13] = buffer("Hello, world");
        shift_right(&mut x, 2);
    });
}

#[test]
fn test_remove() {
    let mut x: [u8; 13] = buffer("Hello, world");
    remove_suffix(&mut x, b"world");
    assert_eq!(content(&x), b"Hello, ");

    let mut x: [u8; 13] = buffer("Hello, world");
    assert!(remove_prefix(&mut x, b"Hello"));
    assert_eq!(content(&x), b", world");
    assert!(!remove_prefix(&mut x, b"Hello"));
    assert!(!remove_suffix(&mut x, b"word"));
    assert_eq!(content(&x), b", world");

    let mut x: [u8; 13] = buffer("Hello, world");
    remove(&mut x, 5, 7);
    assert_eq!(content(&x), b"Helloworld");

    assert_panics!(
        {
            let mut x: [u8; 13] = buffer("Hello, world");
            remove(&mut x, 7, 5);
        },
        contains "outside of text"
    );
}

#[test]
fn test_strip() {
    let mut x: [u8; 15] = buffer("Right blanks  ");
    assert_eq!(strip_right_blank(&mut x), 2);
    assert_eq!(content(&x), b"Right blanks");

    let mut x: [u8; 15] = buffer("  Left blanks");
    assert_eq!(strip_left_blank(&mut x), 2);
    assert_eq!(content(&x), b"Left blanks");

    let mut x: [u8; 15] = buffer("  LR blanks  ");
    assert_eq!(strip_blank(&mut x), 4);
    assert_eq!(content(&x), b"LR blanks");

    let mut x: [u8; 15] = buffer(" \t \t ");
    assert_eq!(strip_blank(&mut x), 5, "An all blank text should be emptied.");
    assert_eq!(content(&x), b"");
}

#[test]
fn test_copy() {
    let mut x = [b'#'; 8];
    copy(b"abc\0def", &mut x);
    assert_eq!(&x, b"abc\0####");

    let mut x = [b'#'; 8];
    copy_n(b"abc", 6, &mut x);
    assert_eq!(&x, b"abc\0\0\0##");

    let mut x = [b'#'; 8];
    copy_n(b"abcdef", 3, &mut x);
    assert_eq!(&x, b"abc#####", "Copying n bytes of a longer text shouldn't terminate it.");
}
