//! UTF-8 codec and character classification.
//!
//! The scanner walks its buffer one code point at a time and needs to move
//! both forwards and backwards, so the codec works directly on byte slices
//! rather than through `str` iterators. The classifiers implement the
//! ISO-Prolog character categories extended to the whole of Unicode: where
//! the standard library exposes the right general-category test (`char`
//! methods) we use it, and the one category it cannot express — graphic
//! characters — is matched with a `\p{…}` regex class.

use regex::Regex;

/// The largest Unicode code point.
pub const CP_MAX: u32 = 0x10FFFF;

// Codec
// --------------------------------------------------

/// Returns true if the byte can begin a UTF-8 sequence.
#[inline]
pub fn is_first_byte(byte: u8) -> bool {
    byte <= 0x7F || (0xC0..=0xF7).contains(&byte)
}

/// Returns true for UTF-8 continuation bytes.
#[inline]
pub fn is_continuation_byte(byte: u8) -> bool {
    (0x80..0xC0).contains(&byte)
}

/// Decodes the UTF-8 sequence starting at `at`.
///
/// Returns the decoded code point and the number of bytes it spans, or
/// `None` at the end of the buffer or on a malformed sequence (bad leading
/// byte, missing or malformed continuation bytes, surrogates, or a value
/// above [`CP_MAX`]).
pub fn decode(bytes: &[u8], at: usize) -> Option<(char, usize)> {
    let first = *bytes.get(at)?;
    let (len, mut cp) = match first {
        0x00..=0x7F => return Some((first as char, 1)),
        0xC0..=0xDF => (2, (first - 0xC0) as u32),
        0xE0..=0xEF => (3, (first - 0xE0) as u32),
        0xF0..=0xF7 => (4, (first - 0xF0) as u32),
        _ => return None,
    };
    for i in 1..len {
        let byte = *bytes.get(at + i)?;
        if !is_continuation_byte(byte) {
            return None;
        }
        cp = (cp << 6) | (byte - 0x80) as u32;
    }
    scalar(cp).map(|ch| (ch, len))
}

/// Encodes a code point as UTF-8 into `out`, returning the number of bytes
/// written. Rejects surrogates and values above [`CP_MAX`].
pub fn encode(cp: u32, out: &mut [u8; 4]) -> Option<usize> {
    let ch = scalar(cp)?;
    Some(ch.encode_utf8(out).len())
}

/// Converts a raw code point to a `char`, rejecting surrogates and values
/// above [`CP_MAX`]. This is the validation half of the codec, used when
/// numeric escape sequences produce a code point.
#[inline]
pub fn scalar(cp: u32) -> Option<char> {
    char::from_u32(cp)
}

// Character classes
// --------------------------------------------------

/// Solo characters form a token on their own: `! ( ) , ; [ ] { } | .`
pub fn is_solo(ch: char) -> bool {
    matches!(
        ch,
        '!' | '(' | ')' | ',' | ';' | '[' | ']' | '{' | '}' | '|' | '.'
    )
}

/// Layout characters separate tokens and are otherwise skipped.
pub fn is_layout(ch: char) -> bool {
    ch.is_whitespace()
}

/// Layout characters that terminate a single-line comment. Space and tab
/// are layout but keep a comment open.
pub fn is_newline(ch: char) -> bool {
    ch != ' ' && ch != '\t' && is_layout(ch)
}

/// Characters that may continue an alphanumeric atom or a variable.
pub fn is_alnum(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric()
}

/// Characters that may begin a variable (along with `_`).
pub fn is_upper(ch: char) -> bool {
    ch.is_uppercase()
}

/// Characters that may begin an alphanumeric atom: any letter that is not
/// uppercase. Letters of caseless scripts fall in here.
pub fn is_lower(ch: char) -> bool {
    ch.is_alphabetic() && !ch.is_uppercase()
}

/// Characters that may appear in a graphic atom: Unicode symbols and
/// punctuation that are not solo characters, plus `.` and `\`.
pub fn is_graphic(ch: char) -> bool {
    lazy_static! {
        static ref RE: Regex = {
            let pattern = r"^[\p{S}\p{P}]$";
            Regex::new(pattern).unwrap()
        };
    }

    if ch == '.' || ch == '\\' {
        return true;
    }
    // `_` sits in \p{Pc} but belongs to the alphanumeric class.
    if is_solo(ch) || is_alnum(ch) {
        return false;
    }
    RE.is_match(ch.encode_utf8(&mut [0u8; 4]))
}

/// Characters allowed verbatim inside a quoted atom: anything printable.
pub fn is_quoted(ch: char) -> bool {
    !ch.is_control()
}

/// One of the three quote characters.
pub fn is_quote(ch: char) -> bool {
    matches!(ch, '\'' | '"' | '`')
}

pub fn is_bin_digit(ch: char) -> bool {
    ch.is_digit(2)
}

pub fn is_oct_digit(ch: char) -> bool {
    ch.is_digit(8)
}

pub fn is_dec_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

pub fn is_hex_digit(ch: char) -> bool {
    ch.is_ascii_hexdigit()
}

// Tests
// --------------------------------------------------
