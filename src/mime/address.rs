/*
 * address.rs
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

//! Address list parsing with recovery. A parse never fails outright unless
//! the caller opts in: a bulk parse is tried first, then a quote-aware
//! per-segment retry, then plain-text fallback entries for the whole list.

use crate::config::CodecConfig;
use crate::error::CodecError;

use super::email_address::EmailAddress;
use super::encoded_word;
use super::folding;
use super::utils::is_token_char;

/// One entry of a parsed address list, in input order. Duplicates are not
/// removed here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressEntry {
    Mailbox(EmailAddress),
    /// Fallback for a segment that resisted structured parsing.
    Plain(String),
}

impl AddressEntry {
    pub fn personal(&self) -> Option<&str> {
        match self {
            AddressEntry::Mailbox(a) => a.display_name(),
            AddressEntry::Plain(_) => None,
        }
    }

    pub fn address(&self) -> Option<String> {
        match self {
            AddressEntry::Mailbox(a) => Some(a.address()),
            AddressEntry::Plain(_) => None,
        }
    }

    pub fn raw(&self) -> Option<&str> {
        match self {
            AddressEntry::Mailbox(_) => None,
            AddressEntry::Plain(r) => Some(r),
        }
    }
}

/// Parse a comma-separated address list. `strict` tightens the per-mailbox
/// grammar (domain required, no local-only angle addresses). On bulk failure
/// the list is split quote-aware and parsed per segment; if any segment still
/// fails, the whole list becomes `Plain` entries unless `fail_on_error`.
pub fn parse_address_list(
    value: &str,
    strict: bool,
    fail_on_error: bool,
    config: &CodecConfig,
) -> Result<Vec<AddressEntry>, CodecError> {
    let unfolded = folding::unfold(value);
    let normalized = if config.replace_semicolon_with_comma {
        replace_with_comma(&unfolded)
    } else {
        unfolded
    };
    if normalized.trim().is_empty() {
        return Ok(Vec::new());
    }
    if let Some(list) = parse_bulk(&normalized, strict) {
        return Ok(finish(list, config));
    }
    log::debug!("bulk address parse failed, retrying per segment");
    let segments = split_segments(&normalized);
    let parsed: Vec<Option<EmailAddress>> =
        segments.iter().map(|s| parse_segment(s, strict)).collect();
    if parsed.iter().all(Option::is_some) {
        // The bulk failure came from a bad separator, not the addresses.
        return Ok(finish(parsed.into_iter().flatten().collect(), config));
    }
    if fail_on_error {
        return Err(CodecError::AddressParse(normalized.trim().to_string()));
    }
    // Whole-list fallback keeps ordering and indexing simple for callers;
    // no mixed structured/plain results.
    log::debug!("address segments unparseable, falling back to plain text entries");
    Ok(segments
        .into_iter()
        .map(|s| AddressEntry::Plain(s.trim().to_string()))
        .collect())
}

/// Decode display names and wrap as entries.
fn finish(list: Vec<EmailAddress>, config: &CodecConfig) -> Vec<AddressEntry> {
    list.into_iter()
        .map(|mut a| {
            let decoded = match a.display_name.as_deref() {
                Some(dn) if dn.contains("=?") || !dn.is_ascii() => {
                    Some(encoded_word::decode_header(dn, config))
                }
                _ => None,
            };
            if let Some(d) = decoded {
                a.display_name = Some(d);
            }
            AddressEntry::Mailbox(a)
        })
        .collect()
}

/// Rewrite `<atom> ; ` into `<atom> , ` outside quoted spans, for senders
/// that used semicolons as list separators.
fn replace_with_comma(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len());
    let mut in_quotes = false;
    let mut escaped = false;
    for (i, ch) in s.char_indices() {
        if escaped {
            escaped = false;
            out.push(ch);
            continue;
        }
        match ch {
            '\\' if in_quotes => {
                escaped = true;
                out.push(ch);
            }
            '"' => {
                in_quotes = !in_quotes;
                out.push(ch);
            }
            ';' if !in_quotes && follows_atom(&out) && next_is_ws_or_end(bytes, i) => {
                out.push(',');
            }
            _ => out.push(ch),
        }
    }
    out
}

fn follows_atom(out: &str) -> bool {
    out.trim_end_matches([' ', '\t'])
        .bytes()
        .last()
        .map(is_token_char)
        .unwrap_or(false)
}

fn next_is_ws_or_end(bytes: &[u8], semi_at: usize) -> bool {
    match bytes.get(semi_at + 1) {
        None => true,
        Some(&b) => b == b' ' || b == b'\t',
    }
}

/// Strict single-pass parse of the whole list. None on the first mailbox or
/// separator that does not fit the grammar.
fn parse_bulk(list: &str, strict: bool) -> Option<Vec<EmailAddress>> {
    let bytes = list.as_bytes();
    let len = bytes.len();
    let mut pos = 0;
    let mut out = Vec::new();
    while pos < len {
        skip_ws(bytes, len, &mut pos);
        if pos >= len {
            break;
        }
        let addr = parse_one_address(list, &mut pos, strict)?;
        out.push(addr);
        skip_ws(bytes, len, &mut pos);
        if pos < len {
            if bytes[pos] != b',' {
                return None;
            }
            pos += 1;
        }
    }
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

/// Split on commas outside quoted spans, then re-join a segment with its
/// successor when splitting left a dangling quote or a dangling `<`.
fn split_segments(list: &str) -> Vec<String> {
    let mut raw = Vec::new();
    let mut cur = String::new();
    let mut in_quotes = false;
    let mut escaped = false;
    for ch in list.chars() {
        if escaped {
            escaped = false;
            cur.push(ch);
            continue;
        }
        match ch {
            '\\' if in_quotes => {
                escaped = true;
                cur.push(ch);
            }
            '"' => {
                in_quotes = !in_quotes;
                cur.push(ch);
            }
            ',' if !in_quotes => raw.push(std::mem::take(&mut cur)),
            _ => cur.push(ch),
        }
    }
    raw.push(cur);

    let mut segments: Vec<String> = Vec::new();
    for seg in raw {
        if let Some(prev) = segments.last_mut() {
            if has_dangling_quote(prev) || has_dangling_angle(prev) {
                prev.push(',');
                prev.push_str(&seg);
                continue;
            }
        }
        segments.push(seg);
    }
    segments.retain(|s| !s.trim().is_empty());
    segments
}

fn has_dangling_quote(s: &str) -> bool {
    let mut open = false;
    let mut escaped = false;
    for c in s.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if open => escaped = true,
            '"' => open = !open,
            _ => {}
        }
    }
    open
}

fn has_dangling_angle(s: &str) -> bool {
    match (s.rfind('<'), s.rfind('>')) {
        (Some(lt), Some(gt)) => lt > gt,
        (Some(_), None) => true,
        _ => false,
    }
}

/// Parse one whole segment; trailing garbage fails it.
fn parse_segment(segment: &str, strict: bool) -> Option<EmailAddress> {
    let bytes = segment.as_bytes();
    let len = bytes.len();
    let mut pos = 0;
    let addr = parse_one_address(segment, &mut pos, strict)?;
    skip_ws(bytes, len, &mut pos);
    if pos < len {
        return None;
    }
    Some(addr)
}

fn skip_ws(bytes: &[u8], len: usize, pos: &mut usize) {
    while *pos < len && (bytes[*pos] == b' ' || bytes[*pos] == b'\t') {
        *pos += 1;
    }
}

/// Parse one mailbox at the cursor: `"name" <a@b>`, `phrase <a@b>`, `<a@b>`,
/// or bare `a@b`. The cursor stops at the next comma or after the mailbox.
fn parse_one_address(s: &str, pos: &mut usize, strict: bool) -> Option<EmailAddress> {
    let bytes = s.as_bytes();
    let len = bytes.len();
    skip_ws(bytes, len, pos);
    if *pos >= len {
        return None;
    }
    let mut display: Option<String> = None;
    if bytes[*pos] == b'"' {
        *pos += 1;
        let mut name = Vec::new();
        loop {
            if *pos >= len {
                return None; // unterminated quote
            }
            let c = bytes[*pos];
            if c == b'\\' && *pos + 1 < len {
                name.push(bytes[*pos + 1]);
                *pos += 2;
                continue;
            }
            if c == b'"' {
                *pos += 1;
                break;
            }
            name.push(c);
            *pos += 1;
        }
        display = Some(String::from_utf8_lossy(&name).into_owned());
        skip_ws(bytes, len, pos);
        if *pos >= len || bytes[*pos] != b'<' {
            return None;
        }
    } else {
        let mut i = *pos;
        while i < len && bytes[i] != b'<' && bytes[i] != b',' {
            i += 1;
        }
        if i < len && bytes[i] == b'<' {
            let phrase = s[*pos..i].trim();
            if !phrase.is_empty() {
                display = Some(phrase.to_string());
            }
            *pos = i;
        } else {
            let part = s[*pos..i].trim();
            *pos = i;
            return mailbox(None, part, strict, false);
        }
    }
    // Angle address.
    *pos += 1;
    let start = *pos;
    while *pos < len && bytes[*pos] != b'>' {
        *pos += 1;
    }
    if *pos >= len {
        return None;
    }
    let inner = s[start..*pos].trim();
    *pos += 1;
    mailbox(display, inner, strict, true)
}

fn mailbox(
    display: Option<String>,
    addr: &str,
    strict: bool,
    from_angle: bool,
) -> Option<EmailAddress> {
    if addr.is_empty() || addr.bytes().any(|b| b == b' ' || b == b'\t') {
        return None;
    }
    match addr.find('@') {
        Some(at) if at > 0 && at < addr.len() - 1 => Some(EmailAddress::new(
            display,
            addr[..at].to_string(),
            addr[at + 1..].to_string(),
        )),
        Some(_) => None,
        // Local-only addresses are accepted from angle brackets when lenient.
        None if from_angle && !strict => Some(EmailAddress::new(display, addr.to_string(), "")),
        None => None,
    }
}
