/*
 * config.rs
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

//! Codec configuration, passed explicitly per call. The owner may keep it
//! behind a lock and swap fields at runtime; nothing here is global state.

/// Configuration for header decoding and address parsing.
#[derive(Debug, Clone)]
pub struct CodecConfig {
    /// Charset used when re-encoding non-ASCII display names and header text.
    pub default_charset: String,
    /// Rewrite `<atom> ; ` separators to `<atom> , ` before address parsing.
    /// Recovers lists from senders that used semicolons as separators.
    /// Default false.
    pub replace_semicolon_with_comma: bool,
    /// Superset/alias retries for charsets that some senders under-declare:
    /// when decoding under the declared name yields replacement characters,
    /// the same bytes are retried under the mapped label. Keys are lowercase.
    /// The default table is sender-ecosystem folklore and not exhaustive.
    pub charset_fallbacks: Vec<(String, String)>,
}

impl Default for CodecConfig {
    fn default() -> Self {
        let fallbacks = [
            ("big5", "big5-hkscs"),
            ("gb2312", "gb18030"),
            ("gbk", "gb18030"),
            ("shift_jis", "windows-31j"),
            ("shift-jis", "windows-31j"),
            ("sjis", "windows-31j"),
            ("cp932", "windows-31j"),
            ("ms932", "windows-31j"),
        ];
        Self {
            default_charset: "UTF-8".to_string(),
            replace_semicolon_with_comma: false,
            charset_fallbacks: fallbacks
                .iter()
                .map(|(a, b)| (a.to_string(), b.to_string()))
                .collect(),
        }
    }
}

impl CodecConfig {
    /// Look up the superset/alias retry label for a declared charset.
    pub fn charset_fallback(&self, label: &str) -> Option<&str> {
        let label = label.to_ascii_lowercase();
        self.charset_fallbacks
            .iter()
            .find(|(from, _)| *from == label)
            .map(|(_, to)| to.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_fallback_table() {
        let config = CodecConfig::default();
        assert_eq!(config.charset_fallback("GB2312"), Some("gb18030"));
        assert_eq!(config.charset_fallback("Big5"), Some("big5-hkscs"));
        assert_eq!(config.charset_fallback("utf-8"), None);
    }
}
