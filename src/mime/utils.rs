/*
 * utils.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of Cartiglio, a MIME header codec library.
 *
 * Cartiglio is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Cartiglio is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Cartiglio.  If not, see <http://www.gnu.org/licenses/>.
 */

//! Byte classification for header parsing (RFC 2045 token, folding whitespace, hex).

/// Hex digit values; -1 for non-hex bytes.
pub const HEX_DECODE: [i8; 256] = {
    let mut t = [-1i8; 256];
    let mut i = 0u8;
    while i < 10 {
        t[(b'0' + i) as usize] = i as i8;
        i = i.wrapping_add(1);
    }
    let mut i = 0u8;
    while i < 6 {
        t[(b'A' + i) as usize] = (10 + i) as i8;
        t[(b'a' + i) as usize] = (10 + i) as i8;
        i = i.wrapping_add(1);
    }
    t
};

/// Checks if a character is valid in an RFC 2045 token.
#[inline]
pub fn is_token_char(c: u8) -> bool {
    matches!(c,
        b'0'..=b'9' | b'A'..=b'Z' | b'a'..=b'z' |
        b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' |
        b'^' | b'_' | b'`' | b'{' | b'|' | b'}' | b'~'
    )
}

/// Checks if the string is a valid RFC 2045 token (1+ token chars).
pub fn is_token(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(is_token_char)
}

/// Folding whitespace: space or tab.
#[inline]
pub fn is_fws(c: u8) -> bool {
    c == b' ' || c == b'\t'
}

/// CR or LF.
#[inline]
pub fn is_newline(c: u8) -> bool {
    c == b'\r' || c == b'\n'
}

/// True if the byte run before `pos` ends with an odd number of backslashes,
/// i.e. the byte at `pos` is escaped.
pub fn is_escaped(bytes: &[u8], pos: usize) -> bool {
    let mut n = 0;
    let mut i = pos;
    while i > 0 && bytes[i - 1] == b'\\' {
        n += 1;
        i -= 1;
    }
    n % 2 == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_chars() {
        assert!(is_token("text"));
        assert!(is_token("x-unknown.1"));
        assert!(!is_token("two words"));
        assert!(!is_token(""));
        assert!(!is_token("a;b"));
    }

    #[test]
    fn hex_table() {
        assert_eq!(HEX_DECODE[b'0' as usize], 0);
        assert_eq!(HEX_DECODE[b'f' as usize], 15);
        assert_eq!(HEX_DECODE[b'F' as usize], 15);
        assert_eq!(HEX_DECODE[b'g' as usize], -1);
    }

    #[test]
    fn escape_detection() {
        assert!(is_escaped(b"a\\\r", 2));
        assert!(!is_escaped(b"a\\\\\r", 3));
        assert!(!is_escaped(b"a\r", 1));
    }
}
