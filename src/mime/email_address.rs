/*
 * email_address.rs
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

//! A parsed mailbox: optional display name plus local-part@domain.

use crate::config::CodecConfig;

use super::encoded_word;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress {
    pub display_name: Option<String>,
    pub local_part: String,
    pub domain: String,
}

impl EmailAddress {
    pub fn new(
        display_name: Option<impl Into<String>>,
        local_part: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            display_name: display_name.map(|s| s.into()),
            local_part: local_part.into(),
            domain: domain.into(),
        }
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Full mailbox address: local-part@domain, or the bare local part when
    /// no domain was present.
    pub fn address(&self) -> String {
        if self.domain.is_empty() {
            self.local_part.clone()
        } else {
            format!("{}@{}", self.local_part, self.domain)
        }
    }

    /// Wire form for headers: the display name is MIME-encoded under the
    /// configured default charset when it is not plain ASCII, or quoted when
    /// it contains specials.
    pub fn format_wire(&self, config: &CodecConfig) -> String {
        match self.display_name.as_deref() {
            Some(dn) if !dn.is_empty() => {
                let encoded = if dn.is_ascii() && !dn.contains("=?") {
                    quote_if_needed(dn)
                } else {
                    encoded_word::encode_header_value(dn, config)
                };
                format!("{} <{}>", encoded, self.address())
            }
            _ => format!("<{}>", self.address()),
        }
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref dn) = self.display_name {
            if !dn.is_empty() {
                write!(f, "{} ", dn)?;
            }
        }
        write!(f, "<{}>", self.address())
    }
}

/// Quote a display name containing RFC 5322 specials.
fn quote_if_needed(dn: &str) -> String {
    let needs_quoting = dn
        .bytes()
        .any(|b| matches!(b, b'(' | b')' | b'<' | b'>' | b'[' | b']' | b':' | b';' | b'@' | b'\\' | b',' | b'.' | b'"'));
    if !needs_quoting {
        return dn.to_string();
    }
    let mut out = String::with_capacity(dn.len() + 2);
    out.push('"');
    for c in dn.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_forms() {
        let a = EmailAddress::new(Some("Jane"), "jane", "example.org");
        assert_eq!(a.address(), "jane@example.org");
        assert_eq!(a.to_string(), "Jane <jane@example.org>");
        let local_only = EmailAddress::new(None::<String>, "postmaster", "");
        assert_eq!(local_only.address(), "postmaster");
    }

    #[test]
    fn wire_format_encodes_non_ascii_name() {
        let config = CodecConfig::default();
        let a = EmailAddress::new(Some("Jürgen Müller"), "jm", "example.org");
        let wire = a.format_wire(&config);
        assert!(wire.is_ascii());
        assert!(wire.ends_with("<jm@example.org>"));
        assert!(wire.starts_with("=?UTF-8?"));
    }

    #[test]
    fn wire_format_quotes_specials() {
        let config = CodecConfig::default();
        let a = EmailAddress::new(Some("Doe, John"), "jd", "example.org");
        assert_eq!(a.format_wire(&config), "\"Doe, John\" <jd@example.org>");
    }
}
