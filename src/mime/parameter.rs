/*
 * parameter.rs
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

//! Header parameter lists (name=value; name="value") for Content-Type and
//! Content-Disposition, with a strict grammar and a lenient re-quoting path
//! used by the sanitizer.

use super::utils::{is_token, is_token_char};

/// One header parameter. Order is preserved by the containing list so a
/// sanitized header round-trips predictably.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    name: String,
    value: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Parse a semicolon-separated parameter list under the strict grammar:
/// every parameter must be `token=token` or `token="quoted"`, fully
/// consumed. None on any violation.
pub fn parse_strict(params_part: &str) -> Option<Vec<Parameter>> {
    let mut out = Vec::new();
    let bytes = params_part.as_bytes();
    let len = bytes.len();
    let mut pos = 0;
    while pos < len {
        while pos < len && (bytes[pos] == b';' || bytes[pos].is_ascii_whitespace()) {
            pos += 1;
        }
        if pos >= len {
            break;
        }
        let name_start = pos;
        while pos < len && is_token_char(bytes[pos]) {
            pos += 1;
        }
        let name = &params_part[name_start..pos];
        if name.is_empty() || pos >= len || bytes[pos] != b'=' {
            return None;
        }
        pos += 1;
        let value = if pos < len && bytes[pos] == b'"' {
            pos += 1;
            let mut v = Vec::new();
            loop {
                if pos >= len {
                    return None; // unterminated quote
                }
                let c = bytes[pos];
                if c == b'\\' && pos + 1 < len {
                    v.push(bytes[pos + 1]);
                    pos += 2;
                    continue;
                }
                if c == b'"' {
                    pos += 1;
                    break;
                }
                v.push(c);
                pos += 1;
            }
            String::from_utf8_lossy(&v).into_owned()
        } else {
            let value_start = pos;
            while pos < len && is_token_char(bytes[pos]) {
                pos += 1;
            }
            let v = &params_part[value_start..pos];
            if v.is_empty() {
                return None;
            }
            v.to_string()
        };
        // Only separators may follow a value.
        if pos < len && bytes[pos] != b';' && !bytes[pos].is_ascii_whitespace() {
            return None;
        }
        out.push(Parameter::new(name, value));
    }
    Some(out)
}

/// Parse a parameter list accepting unquoted values with spaces, stray or
/// unbalanced quotes, and empty values. Parameters whose name is not a token
/// are dropped. Never fails.
pub fn parse_lenient(params_part: &str) -> Vec<Parameter> {
    let mut out = Vec::new();
    for piece in split_semicolons(params_part) {
        let piece = piece.trim();
        if piece.is_empty() {
            continue;
        }
        let Some(eq) = piece.find('=') else {
            continue;
        };
        let name = piece[..eq].trim();
        if !is_token(name) {
            continue;
        }
        let value = piece[eq + 1..].trim();
        let value = strip_broken_quotes(value);
        out.push(Parameter::new(name, value));
    }
    out
}

/// Split on semicolons outside quoted spans.
fn split_semicolons(s: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let bytes = s.as_bytes();
    let mut in_quotes = false;
    let mut start = 0;
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'"' => in_quotes = !in_quotes,
            b';' if !in_quotes => {
                out.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    out.push(&s[start..]);
    out
}

/// Remove surrounding quotes even when unbalanced, and unescape the content.
fn strip_broken_quotes(v: &str) -> String {
    let v = v.strip_prefix('"').unwrap_or(v);
    let v = v.strip_suffix('"').unwrap_or(v);
    let mut out = String::with_capacity(v.len());
    let mut escaped = false;
    for c in v.chars() {
        if escaped {
            escaped = false;
            out.push(c);
            continue;
        }
        if c == '\\' {
            escaped = true;
            continue;
        }
        out.push(c);
    }
    if escaped {
        out.push('\\');
    }
    out
}

/// Serialize parameters, quoting any value that is not a bare token and
/// backslash-escaping quotes and backslashes inside quoted values.
pub fn format_parameters(params: &[Parameter]) -> String {
    let mut out = String::new();
    for p in params {
        out.push_str("; ");
        out.push_str(p.name());
        out.push('=');
        if is_token(p.value()) {
            out.push_str(p.value());
        } else {
            out.push('"');
            for c in p.value().chars() {
                if c == '"' || c == '\\' {
                    out.push('\\');
                }
                out.push(c);
            }
            out.push('"');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_accepts_tokens_and_quoted() {
        let p = parse_strict("charset=utf-8; name=\"two words\"").unwrap();
        assert_eq!(p.len(), 2);
        assert_eq!(p[0].name(), "charset");
        assert_eq!(p[1].value(), "two words");
    }

    #[test]
    fn strict_rejects_unquoted_space() {
        assert!(parse_strict("name=unquoted value").is_none());
        assert!(parse_strict("name=\"unterminated").is_none());
        assert!(parse_strict("=oops").is_none());
    }

    #[test]
    fn lenient_recovers_malformed() {
        let p = parse_lenient("name=unquoted value; bad name=x; q=\"broken");
        assert_eq!(p.len(), 2);
        assert_eq!(p[0].value(), "unquoted value");
        assert_eq!(p[1].name(), "q");
        assert_eq!(p[1].value(), "broken");
    }

    #[test]
    fn format_quotes_non_tokens() {
        let p = vec![
            Parameter::new("charset", "utf-8"),
            Parameter::new("name", "two words"),
        ];
        assert_eq!(
            format_parameters(&p),
            "; charset=utf-8; name=\"two words\""
        );
    }
}
