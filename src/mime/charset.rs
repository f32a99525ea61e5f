/*
 * charset.rs
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

//! Charset decoding with recovery: alias-superset retry for under-declared
//! East-Asian charsets, statistical detection for unknown labels, and a CP932
//! carrier-emoji remap.

use encoding_rs::Encoding;

use crate::config::CodecConfig;

const REPLACEMENT_CHAR: char = '\u{FFFD}';

/// Carrier emoji left in the Shift_JIS/CP932 private use area by some mobile
/// senders, mapped to their Unicode equivalents. Not exhaustive.
const CP932_EMOJI_REMAP: &[(char, char)] = &[
    ('\u{E63E}', '\u{2600}'),  // sun
    ('\u{E63F}', '\u{2601}'),  // cloud
    ('\u{E640}', '\u{2614}'),  // umbrella with rain
    ('\u{E641}', '\u{26C4}'),  // snowman
    ('\u{E642}', '\u{26A1}'),  // lightning
    ('\u{E643}', '\u{1F300}'), // cyclone
    ('\u{E644}', '\u{1F301}'), // foggy
    ('\u{E645}', '\u{2602}'),  // open umbrella
    ('\u{E6F0}', '\u{1F600}'), // smiling face
    ('\u{E6F1}', '\u{1F620}'), // angry face
    ('\u{E6F3}', '\u{1F61E}'), // disappointed face
    ('\u{E6FB}', '\u{2757}'),  // exclamation
];

/// Decode bytes under the declared charset label, with the recovery ladder:
/// declared charset, configured superset alias on replacement characters,
/// statistical detection when the label is unknown. Returns None when the
/// label is unknown and detection fails; the caller keeps the raw text.
pub fn decode(bytes: &[u8], label: &str, config: &CodecConfig) -> Option<String> {
    let label = normalize_label(label);
    match Encoding::for_label(label.as_bytes()) {
        Some(enc) => {
            let (text, had_errors) = enc.decode_without_bom_handling(bytes);
            let mut text = text.into_owned();
            if had_errors || text.contains(REPLACEMENT_CHAR) {
                if let Some(retry) = superset_retry(bytes, &label, config) {
                    text = retry;
                }
            }
            if is_cp932_family(&label) {
                text = remap_cp932_emoji(&text);
            }
            Some(text)
        }
        None => {
            log::debug!("unknown charset {:?}, trying detection", label);
            let enc = detect(bytes)?;
            let (text, _) = enc.decode_without_bom_handling(bytes);
            Some(text.into_owned())
        }
    }
}

/// Strip quotes and any RFC 2231 language suffix (`utf-8*en`).
fn normalize_label(label: &str) -> String {
    let label = label.trim().trim_matches('"');
    let label = label.split('*').next().unwrap_or(label);
    label.to_ascii_lowercase()
}

fn superset_retry(bytes: &[u8], label: &str, config: &CodecConfig) -> Option<String> {
    let alias = config.charset_fallback(label)?;
    let enc = Encoding::for_label(alias.as_bytes())?;
    let (text, had_errors) = enc.decode_without_bom_handling(bytes);
    if had_errors || text.contains(REPLACEMENT_CHAR) {
        return None;
    }
    log::debug!("charset {:?} recovered via superset {:?}", label, alias);
    Some(text.into_owned())
}

fn is_cp932_family(label: &str) -> bool {
    matches!(
        label,
        "shift_jis" | "shift-jis" | "sjis" | "cp932" | "ms932" | "windows-31j" | "x-sjis"
    )
}

fn remap_cp932_emoji(s: &str) -> String {
    if !s.chars().any(|c| ('\u{E000}'..='\u{F8FF}').contains(&c)) {
        return s.to_string();
    }
    s.chars()
        .map(|c| {
            CP932_EMOJI_REMAP
                .iter()
                .find(|(from, _)| *from == c)
                .map(|(_, to)| *to)
                .unwrap_or(c)
        })
        .collect()
}

/// Statistical charset detection for payloads with an unknown declared label.
/// Valid UTF-8 wins; an ISO 2022 escape selects ISO-2022-JP; otherwise lead
/// byte patterns are scored for Shift_JIS vs EUC vs GB/Big5, with a
/// windows-1252 fallback for anything 8-bit but unrecognized.
pub fn detect(bytes: &[u8]) -> Option<&'static Encoding> {
    if bytes.is_empty() {
        return None;
    }
    if std::str::from_utf8(bytes).is_ok() {
        return Some(encoding_rs::UTF_8);
    }
    if bytes.contains(&0x1B) {
        return Some(encoding_rs::ISO_2022_JP);
    }
    let mut sjis = 0usize;
    let mut euc = 0usize;
    let mut gb = 0usize;
    let mut i = 0;
    while i + 1 < bytes.len() {
        let b = bytes[i];
        let n = bytes[i + 1];
        if (0x81..=0x9F).contains(&b) && (0x40..=0xFC).contains(&n) && n != 0x7F {
            sjis += 1;
            i += 2;
            continue;
        }
        if (0xA1..=0xFE).contains(&b) && (0xA1..=0xFE).contains(&n) {
            euc += 1;
            i += 2;
            continue;
        }
        if (0x81..=0xFE).contains(&b) && (0x40..=0xFE).contains(&n) {
            gb += 1;
            i += 2;
            continue;
        }
        i += 1;
    }
    if sjis > euc && sjis > gb {
        return Some(encoding_rs::SHIFT_JIS);
    }
    if euc >= gb && euc > 0 {
        return Some(encoding_rs::EUC_JP);
    }
    if gb > 0 {
        return Some(encoding_rs::GB18030);
    }
    Some(encoding_rs::WINDOWS_1252)
}
