/*
 * error.rs
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

//! Codec errors. Encoded-word and charset problems are recovered internally
//! and never reach this type; timeouts surface as "no match", not as errors.

use std::fmt;

/// Errors surfaced to callers of the codec.
#[derive(Debug)]
pub enum CodecError {
    /// Address list could not be parsed and the caller asked for failure
    /// instead of the plain-text fallback.
    AddressParse(String),
    /// Content-Type header that still fails strict parsing after
    /// sanitization. No safe content type can be synthesized for these.
    InvalidContentType(String),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::AddressParse(v) => write!(f, "unparseable address list: {}", v),
            CodecError::InvalidContentType(v) => write!(f, "invalid Content-Type: {}", v),
        }
    }
}

impl std::error::Error for CodecError {}
