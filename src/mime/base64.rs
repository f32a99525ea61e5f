/*
 * base64.rs
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

//! Base64 for B encoded-word payloads (RFC 2045 / RFC 2047).
//! Strict decode rejects junk and bad padding; lenient decode skips junk and
//! flushes partial quanta, for words damaged in transit.

use std::sync::OnceLock;

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

const INVALID: i8 = -1;
const WHITESPACE: i8 = -2;

fn decode_table() -> &'static [i8; 256] {
    static TABLE: OnceLock<[i8; 256]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut t = [INVALID; 256];
        t[b' ' as usize] = WHITESPACE;
        t[b'\t' as usize] = WHITESPACE;
        t[b'\r' as usize] = WHITESPACE;
        t[b'\n' as usize] = WHITESPACE;
        for (i, &c) in ALPHABET.iter().enumerate() {
            t[c as usize] = i as i8;
        }
        t
    })
}

/// Decode base64. Whitespace is permitted; any other non-alphabet byte, or
/// padding that leaves a dangling quantum, is an error at that position.
pub fn decode_strict(src: &[u8]) -> Result<Vec<u8>, usize> {
    let mut out = Vec::with_capacity(src.len() * 3 / 4 + 2);
    let mut quantum: u32 = 0;
    let mut bits: u32 = 0;
    for (pos, &b) in src.iter().enumerate() {
        let val = decode_table()[b as usize];
        if val >= 0 {
            quantum = (quantum << 6) | val as u32;
            bits += 6;
            if bits == 24 {
                out.push((quantum >> 16) as u8);
                out.push((quantum >> 8) as u8);
                out.push(quantum as u8);
                quantum = 0;
                bits = 0;
            }
        } else if val == WHITESPACE {
            continue;
        } else if b == b'=' {
            // Padding: the rest must be padding or whitespace.
            for (i, &t) in src[pos..].iter().enumerate() {
                if t != b'=' && decode_table()[t as usize] != WHITESPACE {
                    return Err(pos + i);
                }
            }
            break;
        } else {
            return Err(pos);
        }
    }
    match bits {
        0 => {}
        12 => out.push((quantum >> 4) as u8),
        18 => {
            out.push((quantum >> 10) as u8);
            out.push((quantum >> 2) as u8);
        }
        // 6 leftover bits cannot come from a well-formed encoder.
        _ => return Err(src.len()),
    }
    Ok(out)
}

/// Decode base64, skipping anything that is not in the alphabet and flushing
/// whatever complete bytes the trailing partial quantum holds.
pub fn decode_lenient(src: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(src.len() * 3 / 4 + 2);
    let mut quantum: u32 = 0;
    let mut bits: u32 = 0;
    for &b in src {
        let val = decode_table()[b as usize];
        if val < 0 {
            continue;
        }
        quantum = (quantum << 6) | val as u32;
        bits += 6;
        if bits == 24 {
            out.push((quantum >> 16) as u8);
            out.push((quantum >> 8) as u8);
            out.push(quantum as u8);
            quantum = 0;
            bits = 0;
        }
    }
    if bits >= 8 {
        out.push((quantum >> (bits - 8)) as u8);
        if bits >= 16 {
            out.push((quantum >> (bits - 16)) as u8);
        }
    }
    out
}

/// Encode bytes as base64 with padding (for B encoded-word payloads).
pub fn encode(src: &[u8]) -> String {
    let mut out = String::with_capacity((src.len() + 2) / 3 * 4);
    for chunk in src.chunks(3) {
        let b0 = chunk[0] as u32;
        let b1 = *chunk.get(1).unwrap_or(&0) as u32;
        let b2 = *chunk.get(2).unwrap_or(&0) as u32;
        let q = (b0 << 16) | (b1 << 8) | b2;
        out.push(ALPHABET[(q >> 18) as usize & 0x3F] as char);
        out.push(ALPHABET[(q >> 12) as usize & 0x3F] as char);
        out.push(if chunk.len() > 1 {
            ALPHABET[(q >> 6) as usize & 0x3F] as char
        } else {
            '='
        });
        out.push(if chunk.len() > 2 {
            ALPHABET[q as usize & 0x3F] as char
        } else {
            '='
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_round() {
        assert_eq!(decode_strict(b"SGVsbG8=").unwrap(), b"Hello");
        assert_eq!(decode_strict(b"SGVsbG8h").unwrap(), b"Hello!");
        assert_eq!(encode(b"Hello"), "SGVsbG8=");
    }

    #[test]
    fn strict_rejects_junk_and_dangling() {
        assert!(decode_strict(b"SGVs*G8=").is_err());
        // A single trailing symbol leaves 6 bits, impossible from an encoder.
        assert!(decode_strict(b"SGVsbG8hU").is_err());
        // Data after padding.
        assert!(decode_strict(b"SGVsbG8=x").is_err());
    }

    #[test]
    fn lenient_skips_junk_and_flushes() {
        assert_eq!(decode_lenient(b"SGVs*bG8="), b"Hello");
        assert_eq!(decode_lenient(b"SGVsbG8"), b"Hello");
        assert_eq!(decode_lenient(b"SG Vs\r\nbG8="), b"Hello");
    }

    #[test]
    fn strict_allows_whitespace() {
        assert_eq!(decode_strict(b"SGVs\r\nbG8=").unwrap(), b"Hello");
    }
}
