//! HTML character reference decoding for the fragment parser.

use std::borrow::Cow;
use std::char;
use std::cmp::min;

include!(concat!(env!("OUT_DIR"), "/entitydata.rs"));

/// Decode the reference at the start of `text`, which is everything after
/// an `&`.
///
/// Returns the replacement characters and the number of bytes consumed,
/// including the terminating `;`.
pub fn unescape(text: &str) -> Option<(Cow<'static, str>, usize)> {
    let bytes = text.as_bytes();
    if bytes.len() >= 3 && bytes[0] == b'#' {
        return unescape_numeric(bytes).map(|(c, len)| (Cow::Owned(c.to_string()), len));
    }

    let size = min(bytes.len(), entitydata::MAX_NAME_LENGTH + 1);
    for i in 1..size {
        match bytes[i] {
            b';' => return lookup(&text[..i]).map(|e| (Cow::Borrowed(e), i + 1)),
            b if !b.is_ascii_alphanumeric() => return None,
            _ => {}
        }
    }

    None
}

fn unescape_numeric(bytes: &[u8]) -> Option<(char, usize)> {
    let mut codepoint: u32 = 0;

    let (start, radix) = match bytes[1] {
        b'x' | b'X' => (2, 16),
        b if b.is_ascii_digit() => (1, 10),
        _ => return None,
    };

    let mut i = start;
    while i < bytes.len() {
        let Some(digit) = (bytes[i] as char).to_digit(radix) else {
            break;
        };
        codepoint = min(codepoint * radix + digit, 0x110000);
        i += 1;
    }

    let digits = i - start;
    if !(1..=8).contains(&digits) || bytes.get(i) != Some(&b';') {
        return None;
    }

    let c = if codepoint == 0 || (0xD800..=0xDFFF).contains(&codepoint) {
        '\u{FFFD}'
    } else {
        char::from_u32(codepoint).unwrap_or('\u{FFFD}')
    };
    Some((c, i + 1))
}

/// Look up a named reference, without its `&` and `;`.
pub fn lookup(name: &str) -> Option<&'static str> {
    entitydata::REFERENCES
        .binary_search_by_key(&name, |&(n, _)| n)
        .ok()
        .map(|i| entitydata::REFERENCES[i].1)
}

/// Decode every character reference in `src`. Unknown or malformed
/// references are left as written.
pub fn unescape_html(src: &str) -> Cow<'_, str> {
    let Some(first) = src.find('&') else {
        return Cow::Borrowed(src);
    };

    let mut v = String::with_capacity(src.len());
    v.push_str(&src[..first]);
    let mut i = first;

    while let Some(offset) = src[i..].find('&') {
        v.push_str(&src[i..i + offset]);
        i += offset + 1;
        match unescape(&src[i..]) {
            Some((chs, size)) => {
                v.push_str(&chs);
                i += size;
            }
            None => v.push('&'),
        }
    }

    v.push_str(&src[i..]);
    Cow::Owned(v)
}
