/*
 * folding.rs
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

//! Header folding and unfolding (RFC 822/2822). Folding is greedy with no
//! lookahead; other implementations read this wire format, so the exact break
//! behavior is part of the contract.

use super::utils::{is_escaped, is_fws, is_newline};

/// Maximum line width for folded headers, excluding CRLF.
const MAX_LINE: usize = 76;

/// Unfold a header value: a newline run followed by folding whitespace joins
/// as a single space. A newline preceded by an unescaped backslash is kept
/// verbatim, and a fold between two encoded-words joins with no character at
/// all (RFC 2047 concatenation).
pub fn unfold(value: &str) -> String {
    let joined = join_split_encoded_words(value);
    let bytes = joined.as_bytes();
    let len = bytes.len();
    let mut out = String::with_capacity(len);
    let mut lit_start = 0;
    let mut pos = 0;
    while pos < len {
        if !is_newline(bytes[pos]) {
            pos += 1;
            continue;
        }
        if is_escaped(bytes, pos) {
            // Escaped newline run, kept verbatim.
            while pos < len && is_newline(bytes[pos]) {
                pos += 1;
            }
            continue;
        }
        let nl_start = pos;
        while pos < len && is_newline(bytes[pos]) {
            pos += 1;
        }
        if pos < len && is_fws(bytes[pos]) {
            out.push_str(&joined[lit_start..nl_start]);
            while pos < len && is_fws(bytes[pos]) {
                pos += 1;
            }
            out.push(' ');
            lit_start = pos;
        }
        // A bare newline run with no following whitespace is not a fold
        // point; it stays in the literal span.
    }
    out.push_str(&joined[lit_start..]);
    out
}

/// Remove the fold between a `?=` and a following `=?` before generic
/// unfolding, so no space is injected inside a split encoded-word.
fn join_split_encoded_words(value: &str) -> String {
    let bytes = value.as_bytes();
    let len = bytes.len();
    if !value.contains("?=") {
        return value.to_string();
    }
    let mut out = String::with_capacity(len);
    let mut lit_start = 0;
    let mut pos = 0;
    while pos + 1 < len {
        if bytes[pos] != b'?' || bytes[pos + 1] != b'=' {
            pos += 1;
            continue;
        }
        let mut cursor = pos + 2;
        let nl_start = cursor;
        while cursor < len && is_newline(bytes[cursor]) {
            cursor += 1;
        }
        if cursor == nl_start {
            pos += 2;
            continue;
        }
        let ws_start = cursor;
        while cursor < len && is_fws(bytes[cursor]) {
            cursor += 1;
        }
        if cursor == ws_start || cursor + 1 >= len || bytes[cursor] != b'=' || bytes[cursor + 1] != b'?' {
            pos += 2;
            continue;
        }
        out.push_str(&value[lit_start..pos + 2]);
        lit_start = cursor;
        pos = cursor;
    }
    out.push_str(&value[lit_start..]);
    out
}

/// Fold a header value so each line fits in 76 columns, given the columns the
/// header name and separator already occupy. Trailing whitespace and newlines
/// are trimmed first. Breaks are greedy: the most recent whitespace on the
/// current line becomes CRLF plus that whitespace character; a run with no
/// whitespace is emitted unbroken.
pub fn fold(used_columns: usize, value: &str) -> String {
    let value = value.trim_end_matches([' ', '\t', '\r', '\n']);
    if used_columns + value.len() <= MAX_LINE {
        return value.to_string();
    }
    let mut out = String::with_capacity(value.len() + 8);
    let mut col = used_columns;
    let mut break_at: Option<usize> = None;
    for ch in value.chars() {
        if col >= MAX_LINE {
            if let Some(i) = break_at.take() {
                out.insert_str(i, "\r\n");
                // The continuation whitespace character is column 1.
                col = out.len() - (i + 2);
            }
        }
        if ch == ' ' || ch == '\t' {
            break_at = Some(out.len());
        }
        out.push(ch);
        col += 1;
    }
    out
}
