/*
 * mod.rs
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

//! MIME header codec: encoded-words, folding, addresses, content types,
//! body structure classification.

mod address;
mod base64;
mod body_structure;
mod charset;
mod content_disposition;
mod content_type;
mod email_address;
mod encoded_word;
mod folding;
mod parameter;
mod quoted_printable;
mod utils;

pub use address::{parse_address_list, AddressEntry};
pub use body_structure::{has_attachments, BodyStructureNode};
pub use content_disposition::{
    parse_content_disposition, sanitize_content_disposition, ContentDisposition,
};
pub use content_type::{
    parse_content_type, sanitize_content_type, sanitize_part_headers, ContentType, PartHeaders,
};
pub use email_address::EmailAddress;
pub use encoded_word::{decode_header, encode_header_value, encode_word};
pub use folding::{fold, unfold};
pub use parameter::Parameter;
pub use utils::{is_token, is_token_char};
