/*
 * content_type.rs
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

//! Content-Type header (RFC 2045): strict parsing and the sanitizer that
//! coerces malformed values into ones the strict grammar accepts.

use crate::error::CodecError;

use super::parameter::{self, Parameter};
use super::utils::is_token;

#[derive(Debug, Clone)]
pub struct ContentType {
    primary_type: String,
    sub_type: String,
    parameters: Vec<Parameter>,
}

impl ContentType {
    pub fn new(
        primary_type: impl Into<String>,
        sub_type: impl Into<String>,
        parameters: Vec<Parameter>,
    ) -> Self {
        Self {
            primary_type: primary_type.into(),
            sub_type: sub_type.into(),
            parameters,
        }
    }

    pub fn primary_type(&self) -> &str {
        &self.primary_type
    }

    pub fn sub_type(&self) -> &str {
        &self.sub_type
    }

    pub fn is_primary_type(&self, t: &str) -> bool {
        self.primary_type.eq_ignore_ascii_case(t)
    }

    pub fn is_sub_type(&self, t: &str) -> bool {
        self.sub_type.eq_ignore_ascii_case(t)
    }

    pub fn is_mime_type(&self, primary: &str, sub: &str) -> bool {
        self.is_primary_type(primary) && self.is_sub_type(sub)
    }

    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
            .map(|p| p.value())
    }

    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameter(name).is_some()
    }

    /// Serialize back to a header value with correctly quoted parameters.
    pub fn to_header_value(&self) -> String {
        format!(
            "{}/{}{}",
            self.primary_type,
            self.sub_type,
            parameter::format_parameters(&self.parameters)
        )
    }
}

/// Parse a Content-Type value under the strict grammar: `token/token`
/// followed by well-formed parameters only.
pub fn parse_content_type(value: &str) -> Option<ContentType> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let (type_part, params_part) = match value.find(';') {
        Some(i) => (value[..i].trim(), &value[i + 1..]),
        None => (value, ""),
    };
    let slash = type_part.find('/')?;
    let primary = type_part[..slash].trim();
    let sub = type_part[slash + 1..].trim();
    if !is_token(primary) || !is_token(sub) {
        return None;
    }
    let parameters = parameter::parse_strict(params_part)?;
    Some(ContentType::new(primary, sub, parameters))
}

/// Lenient parse for the sanitizer: type and subtype are stripped of
/// whitespace and surrounding quotes, parameters go through the lenient
/// parameter path. None only when no usable type/subtype remains.
fn parse_content_type_lenient(value: &str) -> Option<ContentType> {
    let value = value.trim().trim_matches('"');
    if value.is_empty() {
        return None;
    }
    let (type_part, params_part) = match value.find(';') {
        Some(i) => (value[..i].trim(), &value[i + 1..]),
        None => (value, ""),
    };
    let slash = type_part.find('/')?;
    let primary: String = keep_token_chars(&type_part[..slash]);
    let sub: String = keep_token_chars(&type_part[slash + 1..]);
    if primary.is_empty() || sub.is_empty() {
        return None;
    }
    Some(ContentType::new(
        primary,
        sub,
        parameter::parse_lenient(params_part),
    ))
}

fn keep_token_chars(s: &str) -> String {
    s.trim()
        .bytes()
        .filter(|&b| super::utils::is_token_char(b))
        .map(|b| b as char)
        .collect()
}

/// Coerce a Content-Type value into one the strict parser accepts, keeping
/// the original when it is already valid. The one hard error of the codec:
/// a value that resists sanitization has no safe fallback.
pub fn sanitize_content_type(value: &str) -> Result<String, CodecError> {
    if parse_content_type(value).is_some() {
        return Ok(value.to_string());
    }
    let Some(lenient) = parse_content_type_lenient(value) else {
        return Err(CodecError::InvalidContentType(value.trim().to_string()));
    };
    let rebuilt = lenient.to_header_value();
    if parse_content_type(&rebuilt).is_some() {
        log::debug!("sanitized Content-Type {:?} into {:?}", value, rebuilt);
        Ok(rebuilt)
    } else {
        Err(CodecError::InvalidContentType(value.trim().to_string()))
    }
}

/// A materialized part's raw Content-Type value and its children, for
/// recursive sanitization of an already-parsed multipart body.
#[derive(Debug, Clone)]
pub struct PartHeaders {
    pub content_type: String,
    pub children: Vec<PartHeaders>,
}

/// Sanitize a part's Content-Type; when the part is `multipart/*`, descend
/// into its children, one level per recursion step.
pub fn sanitize_part_headers(part: &mut PartHeaders) -> Result<(), CodecError> {
    part.content_type = sanitize_content_type(&part.content_type)?;
    let is_multipart = parse_content_type(&part.content_type)
        .map(|ct| ct.is_primary_type("multipart"))
        .unwrap_or(false);
    if is_multipart {
        for child in &mut part.children {
            sanitize_part_headers(child)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_parse() {
        let ct = parse_content_type("text/plain; charset=utf-8").unwrap();
        assert!(ct.is_mime_type("text", "plain"));
        assert_eq!(ct.parameter("charset"), Some("utf-8"));
        assert!(parse_content_type("text/plain; name=unquoted value").is_none());
        assert!(parse_content_type("noslash").is_none());
    }

    #[test]
    fn sanitize_keeps_valid_value_unchanged() {
        let v = "multipart/mixed; boundary=\"abc\"";
        assert_eq!(sanitize_content_type(v).unwrap(), v);
    }

    #[test]
    fn sanitize_requotes_parameter() {
        let out = sanitize_content_type("text/plain; name=unquoted value").unwrap();
        let ct = parse_content_type(&out).unwrap();
        assert!(ct.is_mime_type("text", "plain"));
        assert_eq!(ct.parameter("name"), Some("unquoted value"));
    }

    #[test]
    fn sanitize_strips_stray_quotes() {
        let out = sanitize_content_type("\"text/html\"; charset=\"utf-8").unwrap();
        let ct = parse_content_type(&out).unwrap();
        assert!(ct.is_mime_type("text", "html"));
        assert_eq!(ct.parameter("charset"), Some("utf-8"));
    }

    #[test]
    fn sanitize_rejects_hopeless_value() {
        assert!(matches!(
            sanitize_content_type(";;;"),
            Err(CodecError::InvalidContentType(_))
        ));
    }

    #[test]
    fn sanitize_recurses_into_multipart_children() {
        let mut part = PartHeaders {
            content_type: "multipart/mixed; boundary=b 1".to_string(),
            children: vec![
                PartHeaders {
                    content_type: "text/plain; name=read me.txt".to_string(),
                    children: Vec::new(),
                },
                PartHeaders {
                    content_type: "application/pdf".to_string(),
                    children: Vec::new(),
                },
            ],
        };
        sanitize_part_headers(&mut part).unwrap();
        assert!(parse_content_type(&part.content_type).is_some());
        for child in &part.children {
            assert!(parse_content_type(&child.content_type).is_some());
        }
        assert_eq!(part.children[1].content_type, "application/pdf");
    }
}
