/*
 * encoded_word.rs
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

//! RFC 2047 encoded-word decoding and encoding (=?charset?enc?text?=).
//! Decoding never fails: structurally broken words fall back token by token,
//! unknown charsets go through detection, and the worst case keeps the raw
//! text verbatim.

use encoding_rs::Encoding;

use crate::config::CodecConfig;

use super::base64;
use super::charset;
use super::folding;
use super::quoted_printable;

/// Upper bound on payload bytes per generated encoded-word, so each word
/// fits a 76-column folded line with the charset declaration.
const MAX_WORD_PAYLOAD: usize = 45;

/// Decode all encoded-words in a header value. The value is unfolded first;
/// whitespace that sits alone between two decoded words is discarded
/// (RFC 2047 §6.2), whitespace next to literal text is preserved. Anything
/// that cannot be decoded stays in the output unchanged.
pub fn decode_header(value: &str, config: &CodecConfig) -> String {
    if value.is_ascii() && !value.contains("=?") {
        return folding::unfold(value);
    }
    let unfolded = folding::unfold(value);
    let bytes = unfolded.as_bytes();
    let len = bytes.len();
    let mut out = String::with_capacity(len);
    let mut pos = 0;
    let mut prev_decoded = false;
    while pos < len {
        let Some(start) = find_marker(bytes, pos) else {
            out.push_str(&unfolded[pos..]);
            break;
        };
        let lit = &unfolded[pos..start];
        match decode_one(&unfolded, start, config) {
            Some(Word::Decoded(text, end)) => {
                let between_words = prev_decoded && !lit.is_empty() && lit.bytes().all(is_fws);
                if !between_words {
                    out.push_str(lit);
                }
                out.push_str(&text);
                prev_decoded = true;
                pos = end;
            }
            Some(Word::Raw(end)) => {
                out.push_str(lit);
                out.push_str(&unfolded[start..end]);
                prev_decoded = false;
                pos = end;
            }
            None => {
                out.push_str(lit);
                out.push_str("=?");
                prev_decoded = false;
                pos = start + 2;
            }
        }
    }
    out
}

enum Word {
    /// Decoded text and the position after the closing `?=`.
    Decoded(String, usize),
    /// Structurally valid word whose charset is unknown and undetectable;
    /// the original text is kept.
    Raw(usize),
}

#[inline]
fn is_fws(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

fn find_marker(bytes: &[u8], from: usize) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(2)
        .position(|w| w == b"=?")
        .map(|i| from + i)
}

fn find_byte(bytes: &[u8], from: usize, needle: u8) -> Option<usize> {
    bytes.get(from..)?.iter().position(|&b| b == needle).map(|i| from + i)
}

/// Decode one encoded-word starting at `start` (which holds `=?`).
/// None means the marker does not open a well-formed word at all.
fn decode_one(s: &str, start: usize, config: &CodecConfig) -> Option<Word> {
    let bytes = s.as_bytes();
    let charset_start = start + 2;
    let q1 = find_byte(bytes, charset_start, b'?')?;
    if q1 == charset_start {
        return None;
    }
    let charset_label = &s[charset_start..q1];
    if !charset_label.bytes().all(|b| b.is_ascii_graphic() && b != b'=') {
        return None;
    }
    let enc = *bytes.get(q1 + 1)?;
    if *bytes.get(q1 + 2)? != b'?' {
        return None;
    }
    let payload_start = q1 + 3;
    let payload_end = {
        let rest = bytes.get(payload_start..)?;
        payload_start + rest.windows(2).position(|w| w == b"?=")?
    };
    let end = payload_end + 2;
    let payload = &bytes[payload_start..payload_end];

    let decoded_bytes = match enc.to_ascii_lowercase() {
        b'q' => {
            // `_` means space in Q encoding; an encoded underscore arrives
            // as =5F and is untouched by this substitution.
            let payload: Vec<u8> =
                payload.iter().map(|&b| if b == b'_' { b' ' } else { b }).collect();
            quoted_printable::decode_strict(&payload).unwrap_or_else(|at| {
                log::debug!("malformed Q payload at byte {}, re-scanning leniently", at);
                quoted_printable::decode_lenient(&payload)
            })
        }
        b'b' => base64::decode_strict(payload).unwrap_or_else(|at| {
            log::debug!("malformed B payload at byte {}, re-scanning leniently", at);
            base64::decode_lenient(payload)
        }),
        _ => return None,
    };

    match charset::decode(&decoded_bytes, charset_label, config) {
        Some(text) => Some(Word::Decoded(text, end)),
        None => {
            log::debug!("charset {:?} unknown and undetectable, keeping raw word", charset_label);
            Some(Word::Raw(end))
        }
    }
}

/// Encode text as a single encoded-word under the given charset (fallback
/// UTF-8 when the label is unknown). Q when the payload is mostly ASCII,
/// B otherwise.
pub fn encode_word(text: &str, charset_label: &str) -> String {
    let enc =
        Encoding::for_label(charset_label.as_bytes()).unwrap_or(encoding_rs::UTF_8);
    let (bytes, _, _) = enc.encode(text);
    let non_ascii = bytes.iter().filter(|&&b| b >= 0x80).count();
    if non_ascii * 3 > bytes.len() {
        format!("=?{}?B?{}?=", enc.name(), base64::encode(&bytes))
    } else {
        format!("=?{}?Q?{}?=", enc.name(), quoted_printable::encode_q(&bytes))
    }
}

/// Encode a header value for the wire: printable ASCII passes through, any
/// other text becomes one or more space-separated encoded-words under the
/// configured default charset, each small enough for a folded line.
pub fn encode_header_value(text: &str, config: &CodecConfig) -> String {
    if text.is_ascii() && !text.contains("=?") {
        return text.to_string();
    }
    let mut words = Vec::new();
    let mut chunk = String::new();
    let mut chunk_len = 0;
    for ch in text.chars() {
        let ch_len = ch.len_utf8();
        if chunk_len + ch_len > MAX_WORD_PAYLOAD && !chunk.is_empty() {
            words.push(encode_word(&chunk, &config.default_charset));
            chunk.clear();
            chunk_len = 0;
        }
        chunk.push(ch);
        chunk_len += ch_len;
    }
    if !chunk.is_empty() {
        words.push(encode_word(&chunk, &config.default_charset));
    }
    words.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(v: &str) -> String {
        decode_header(v, &CodecConfig::default())
    }

    #[test]
    fn plain_ascii_short_circuit() {
        assert_eq!(decode("just a subject"), "just a subject");
        assert_eq!(decode("two\r\n lines"), "two lines");
    }

    #[test]
    fn q_and_b_words() {
        assert_eq!(decode("=?UTF-8?Q?Hello_World?="), "Hello World");
        assert_eq!(decode("=?UTF-8?B?SGVsbG8=?="), "Hello");
        assert_eq!(decode("Hi =?UTF-8?B?V29ybGQ=?=!"), "Hi World!");
    }

    #[test]
    fn adjacent_words_drop_separating_whitespace() {
        assert_eq!(
            decode("=?UTF-8?Q?Kombatibilit=C3=A4t?= =?UTF-8?Q?sliste?="),
            "Kombatibilitätsliste"
        );
        assert_eq!(
            decode("=?UTF-8?Q?Kombatibilit=C3=A4t?=\r\n =?UTF-8?Q?sliste?="),
            "Kombatibilitätsliste"
        );
    }

    #[test]
    fn whitespace_next_to_literal_preserved() {
        assert_eq!(decode("a =?UTF-8?Q?b?= c"), "a b c");
    }

    #[test]
    fn malformed_q_payload_recovers() {
        // =XG is not hex; safe mode keeps the = literal.
        assert_eq!(decode("=?UTF-8?Q?a=XGb?="), "a=XGb");
    }

    #[test]
    fn malformed_b_payload_recovers() {
        // Bad padding placement; lenient decode still extracts the quanta.
        assert_eq!(decode("=?UTF-8?B?SGVs*bG8=?="), "Hello");
    }

    #[test]
    fn unknown_charset_detected() {
        // Unknown label, but the payload is valid UTF-8.
        assert_eq!(decode("=?x-bogus?B?aMOpbGxv?="), "héllo");
    }

    #[test]
    fn incomplete_marker_stays_literal() {
        assert_eq!(decode("price =? 100"), "price =? 100");
        assert_eq!(decode("=?UTF-8?Q?truncated"), "=?UTF-8?Q?truncated");
    }

    #[test]
    fn decode_is_idempotent() {
        let once = decode("=?UTF-8?Q?gr=C3=BC=C3=9Fe?= from =?UTF-8?B?QmVybGlu?=");
        assert_eq!(decode(&once), once);
    }

    #[test]
    fn encode_word_chooses_encoding() {
        assert_eq!(encode_word("Hello World", "utf-8"), "=?UTF-8?Q?Hello_World?=");
        let b = encode_word("日本語", "utf-8");
        assert!(b.starts_with("=?UTF-8?B?"));
        assert_eq!(decode(&b), "日本語");
    }

    #[test]
    fn encode_header_value_round_trips() {
        let config = CodecConfig::default();
        let text = "Grüße aus Köln";
        let encoded = encode_header_value(text, &config);
        assert!(encoded.is_ascii());
        assert_eq!(decode(&encoded), text);
        assert_eq!(encode_header_value("plain", &config), "plain");
    }
}
