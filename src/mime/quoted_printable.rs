/*
 * quoted_printable.rs
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

//! Quoted-printable decoding for encoded-word payloads (RFC 2045 / RFC 2047).
//! Strict decode rejects malformed escapes; lenient decode keeps them as
//! literal `=` so a damaged word still yields text ("safe mode").

use super::utils::HEX_DECODE;

/// Decode quoted-printable. Soft line breaks (=CRLF, =LF) are removed.
/// Returns Err(position) on a truncated or non-hex escape.
pub fn decode_strict(src: &[u8]) -> Result<Vec<u8>, usize> {
    let mut out = Vec::with_capacity(src.len());
    let mut pos = 0;
    while pos < src.len() {
        let b = src[pos];
        if b != b'=' {
            out.push(b);
            pos += 1;
            continue;
        }
        if pos + 2 < src.len() && src[pos + 1] == b'\r' && src[pos + 2] == b'\n' {
            pos += 3;
            continue;
        }
        if pos + 1 < src.len() && src[pos + 1] == b'\n' {
            pos += 2;
            continue;
        }
        if pos + 2 >= src.len() {
            return Err(pos);
        }
        let hi = HEX_DECODE[src[pos + 1] as usize];
        let lo = HEX_DECODE[src[pos + 2] as usize];
        if hi < 0 || lo < 0 {
            return Err(pos);
        }
        out.push(((hi << 4) | lo) as u8);
        pos += 3;
    }
    Ok(out)
}

/// Decode quoted-printable, walking token by token: any `=XX` that is not a
/// valid hex escape is kept as a literal `=` instead of aborting.
pub fn decode_lenient(src: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(src.len());
    let mut pos = 0;
    while pos < src.len() {
        let b = src[pos];
        if b != b'=' {
            out.push(b);
            pos += 1;
            continue;
        }
        if pos + 2 < src.len() && src[pos + 1] == b'\r' && src[pos + 2] == b'\n' {
            pos += 3;
            continue;
        }
        if pos + 1 < src.len() && src[pos + 1] == b'\n' {
            pos += 2;
            continue;
        }
        if pos + 2 < src.len() {
            let hi = HEX_DECODE[src[pos + 1] as usize];
            let lo = HEX_DECODE[src[pos + 2] as usize];
            if hi >= 0 && lo >= 0 {
                out.push(((hi << 4) | lo) as u8);
                pos += 3;
                continue;
            }
        }
        out.push(b'=');
        pos += 1;
    }
    out
}

/// Encode bytes as quoted-printable for a Q encoded-word payload:
/// space becomes `_`, unsafe bytes become `=XX`.
pub fn encode_q(src: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(src.len());
    for &b in src {
        match b {
            b' ' => out.push('_'),
            b'0'..=b'9' | b'A'..=b'Z' | b'a'..=b'z' | b'!' | b'*' | b'+' | b'-' | b'/' => {
                out.push(b as char)
            }
            _ => {
                out.push('=');
                out.push(HEX[(b >> 4) as usize] as char);
                out.push(HEX[(b & 0x0F) as usize] as char);
            }
        }
    }
    out
}
