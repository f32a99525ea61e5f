/*
 * body_structure.rs
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

//! Attachment classification over a MIME part tree or an IMAP BODYSTRUCTURE
//! summary. Subtype-specific rules keep plain+HTML alternative bodies and
//! related HTML-with-inline-images wrappers from counting as attachments.

use crate::config::CodecConfig;

use super::content_type::ContentType;
use super::encoded_word;

/// One node of a body structure tree. Children are non-empty exactly when
/// the content type is `multipart/*`; the constructors keep that invariant.
#[derive(Debug, Clone)]
pub struct BodyStructureNode {
    content_type: ContentType,
    children: Vec<BodyStructureNode>,
}

impl BodyStructureNode {
    /// A leaf part (anything that is not multipart).
    pub fn leaf(primary_type: impl Into<String>, sub_type: impl Into<String>) -> Self {
        Self {
            content_type: ContentType::new(primary_type, sub_type, Vec::new()),
            children: Vec::new(),
        }
    }

    /// A multipart container. None when `children` is empty.
    pub fn multipart(
        sub_type: impl Into<String>,
        children: Vec<BodyStructureNode>,
    ) -> Option<Self> {
        if children.is_empty() {
            return None;
        }
        Some(Self {
            content_type: ContentType::new("multipart", sub_type, Vec::new()),
            children,
        })
    }

    pub fn content_type(&self) -> &ContentType {
        &self.content_type
    }

    pub fn children(&self) -> &[BodyStructureNode] {
        &self.children
    }
}

/// Decide whether a part tree carries real attachments. A naive "more than
/// one part" rule flags common authoring patterns, so the multipart subtype
/// picks the rule:
///
/// - `alternative`: more than 2 children, or any multipart child that
///   classifies as attachment-bearing (plain+HTML pairs stay clean).
/// - `related`: only a multipart child that classifies as attachment-bearing
///   (HTML plus its inline images stays clean).
/// - any other subtype: more than 1 child, or a single multipart child that
///   classifies as attachment-bearing.
///
/// A non-multipart leaf never triggers on its own.
pub fn has_attachments(node: &BodyStructureNode) -> bool {
    if !node.content_type().is_primary_type("multipart") {
        return false;
    }
    let sub = decoded_sub_type(node);
    let children = node.children();
    if sub.eq_ignore_ascii_case("alternative") {
        children.len() > 2 || children.iter().any(has_attachments)
    } else if sub.eq_ignore_ascii_case("related") {
        children.iter().any(has_attachments)
    } else {
        children.len() > 1 || children.first().map(has_attachments).unwrap_or(false)
    }
}

/// Subtype names from remote body structure summaries occasionally arrive
/// still MIME-encoded; decode before comparing.
fn decoded_sub_type(node: &BodyStructureNode) -> String {
    let sub = node.content_type().sub_type();
    if sub.contains("=?") {
        encoded_word::decode_header(sub, &CodecConfig::default())
    } else {
        sub.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alternative(children: Vec<BodyStructureNode>) -> BodyStructureNode {
        BodyStructureNode::multipart("alternative", children).unwrap()
    }

    #[test]
    fn leaf_is_never_attachment_bearing() {
        assert!(!has_attachments(&BodyStructureNode::leaf("application", "pdf")));
    }

    #[test]
    fn plain_html_alternative_is_clean() {
        let node = alternative(vec![
            BodyStructureNode::leaf("text", "plain"),
            BodyStructureNode::leaf("text", "html"),
        ]);
        assert!(!has_attachments(&node));
    }

    #[test]
    fn third_alternative_child_is_an_attachment() {
        let node = alternative(vec![
            BodyStructureNode::leaf("text", "plain"),
            BodyStructureNode::leaf("text", "html"),
            BodyStructureNode::leaf("application", "pdf"),
        ]);
        assert!(has_attachments(&node));
    }

    #[test]
    fn related_wrapper_is_clean() {
        let node = BodyStructureNode::multipart(
            "related",
            vec![
                BodyStructureNode::leaf("text", "html"),
                BodyStructureNode::leaf("image", "png"),
                BodyStructureNode::leaf("image", "png"),
            ],
        )
        .unwrap();
        assert!(!has_attachments(&node));
    }

    #[test]
    fn related_with_attachment_bearing_mixed_child() {
        let mixed = BodyStructureNode::multipart(
            "mixed",
            vec![
                BodyStructureNode::leaf("text", "plain"),
                BodyStructureNode::leaf("application", "zip"),
            ],
        )
        .unwrap();
        let node = BodyStructureNode::multipart(
            "related",
            vec![BodyStructureNode::leaf("text", "html"), mixed],
        )
        .unwrap();
        assert!(has_attachments(&node));
    }

    #[test]
    fn mixed_with_two_parts_has_attachments() {
        let node = BodyStructureNode::multipart(
            "mixed",
            vec![
                BodyStructureNode::leaf("text", "plain"),
                BodyStructureNode::leaf("application", "pdf"),
            ],
        )
        .unwrap();
        assert!(has_attachments(&node));
    }

    #[test]
    fn signed_single_clean_child_is_clean() {
        let inner = alternative(vec![
            BodyStructureNode::leaf("text", "plain"),
            BodyStructureNode::leaf("text", "html"),
        ]);
        let node = BodyStructureNode::multipart("signed", vec![inner]).unwrap();
        assert!(!has_attachments(&node));
    }

    #[test]
    fn nested_alternative_with_attachments() {
        let inner = BodyStructureNode::multipart(
            "mixed",
            vec![
                BodyStructureNode::leaf("text", "plain"),
                BodyStructureNode::leaf("image", "jpeg"),
            ],
        )
        .unwrap();
        let node = alternative(vec![BodyStructureNode::leaf("text", "plain"), inner]);
        assert!(has_attachments(&node));
    }

    #[test]
    fn empty_multipart_is_rejected() {
        assert!(BodyStructureNode::multipart("mixed", Vec::new()).is_none());
    }

    #[test]
    fn encoded_subtype_is_decoded_before_comparison() {
        let node = BodyStructureNode::multipart(
            "=?UTF-8?Q?alternative?=",
            vec![
                BodyStructureNode::leaf("text", "plain"),
                BodyStructureNode::leaf("text", "html"),
            ],
        )
        .unwrap();
        assert!(!has_attachments(&node));
    }
}
