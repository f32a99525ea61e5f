/*
 * lib.rs
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

//! Header codec for untrusted mail: RFC 2047 encoded-word decoding, header
//! folding/unfolding, tolerant address-list parsing, Content-Type sanitizing,
//! multipart attachment classification, and bounded HTML image-reference scans.
//!
//! Malformed input never produces a hard error except for a Content-Type that
//! resists sanitization; everything else degrades to best-effort decoded text.

pub mod config;
pub mod error;
pub mod image_refs;
pub mod mime;

pub use config::CodecConfig;
pub use error::CodecError;
pub use image_refs::{ImageMatch, ImageMatcher};
