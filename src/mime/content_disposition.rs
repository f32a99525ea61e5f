/*
 * content_disposition.rs
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

//! Content-Disposition header (RFC 2183), sharing the parameter machinery
//! and the sanitizer approach of the Content-Type module.

use crate::error::CodecError;

use super::parameter::{self, Parameter};
use super::utils::is_token;

#[derive(Debug, Clone)]
pub struct ContentDisposition {
    disposition: String,
    parameters: Vec<Parameter>,
}

impl ContentDisposition {
    pub fn new(disposition: impl Into<String>, parameters: Vec<Parameter>) -> Self {
        Self {
            disposition: disposition.into(),
            parameters,
        }
    }

    pub fn disposition(&self) -> &str {
        &self.disposition
    }

    pub fn is_disposition_type(&self, t: &str) -> bool {
        self.disposition.eq_ignore_ascii_case(t)
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

    pub fn to_header_value(&self) -> String {
        format!(
            "{}{}",
            self.disposition,
            parameter::format_parameters(&self.parameters)
        )
    }
}

/// Parse a Content-Disposition value under the strict grammar.
pub fn parse_content_disposition(value: &str) -> Option<ContentDisposition> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let (disp_part, params_part) = match value.find(';') {
        Some(i) => (value[..i].trim(), &value[i + 1..]),
        None => (value, ""),
    };
    if !is_token(disp_part) {
        return None;
    }
    let parameters = parameter::parse_strict(params_part)?;
    Some(ContentDisposition::new(disp_part, parameters))
}

fn parse_lenient(value: &str) -> Option<ContentDisposition> {
    let value = value.trim().trim_matches('"');
    if value.is_empty() {
        return None;
    }
    let (disp_part, params_part) = match value.find(';') {
        Some(i) => (value[..i].trim(), &value[i + 1..]),
        None => (value, ""),
    };
    let disposition: String = disp_part
        .bytes()
        .filter(|&b| super::utils::is_token_char(b))
        .map(|b| b as char)
        .collect();
    if disposition.is_empty() {
        return None;
    }
    Some(ContentDisposition::new(
        disposition,
        parameter::parse_lenient(params_part),
    ))
}

/// Coerce a Content-Disposition value into strict form, keeping a valid
/// input unchanged. Reuses the Content-Type error class: both headers leave
/// no safe fallback when unparseable.
pub fn sanitize_content_disposition(value: &str) -> Result<String, CodecError> {
    if parse_content_disposition(value).is_some() {
        return Ok(value.to_string());
    }
    let Some(lenient) = parse_lenient(value) else {
        return Err(CodecError::InvalidContentType(value.trim().to_string()));
    };
    let rebuilt = lenient.to_header_value();
    if parse_content_disposition(&rebuilt).is_some() {
        log::debug!("sanitized Content-Disposition {:?} into {:?}", value, rebuilt);
        Ok(rebuilt)
    } else {
        Err(CodecError::InvalidContentType(value.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_parse() {
        let cd = parse_content_disposition("attachment; filename=\"report.pdf\"").unwrap();
        assert!(cd.is_disposition_type("attachment"));
        assert_eq!(cd.parameter("filename"), Some("report.pdf"));
    }

    #[test]
    fn sanitize_requotes_filename() {
        let out = sanitize_content_disposition("attachment; filename=annual report.pdf").unwrap();
        let cd = parse_content_disposition(&out).unwrap();
        assert_eq!(cd.parameter("filename"), Some("annual report.pdf"));
    }

    #[test]
    fn sanitize_rejects_empty() {
        assert!(sanitize_content_disposition("; filename=x").is_err());
    }
}
