/*
 * image_refs.rs
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

//! Scan HTML bodies for `<img>` tags referencing internally-managed images.
//! A substring check rejects the overwhelming majority of bodies before any
//! pattern work; when a runtime handle is available, the scan itself runs on
//! the blocking pool under a timeout and a late result is abandoned.

use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use tokio::runtime::Handle;

/// URL fragment of the internal image servlet.
const IMAGE_ALIAS: &str = "/ajax/image";
/// URL fragment of the internal file servlet.
const FILE_ALIAS: &str = "/file";

/// Capture group holding the internal file id for both URL shapes. The two
/// shapes share one alternation so the group index stays stable.
pub const FILE_ID_GROUP: usize = 1;

/// Both URL shapes inside an img tag:
/// `.../ajax/image/...?uid=<id>...` and `.../file...?id=<id>...`.
const IMAGE_REF_PATTERN: &str = concat!(
    r#"(?is)<img[^>]*?src=["']?[^"'>\s]*?"#,
    r#"(?:/ajax/image/[^"'>\s]*?[?&]uid=|/file[^"'>\s]*?[?&]id=)"#,
    r#"([0-9A-Za-z._%-]+)"#,
);

/// One image reference found in a scan pass.
#[derive(Debug, Clone)]
pub struct ImageMatch {
    pub full_match: String,
    /// Capture groups by index; group 0 is the full match.
    pub groups: Vec<Option<String>>,
    pub start: usize,
    pub end: usize,
}

impl ImageMatch {
    pub fn group(&self, i: usize) -> Option<&str> {
        self.groups.get(i).and_then(|g| g.as_deref())
    }

    /// The internal file id, from either URL shape.
    pub fn file_id(&self) -> Option<&str> {
        self.group(FILE_ID_GROUP)
    }
}

/// Matcher for internal image references. Without a runtime handle the scan
/// runs synchronously and unbounded; with one it is delegated to the blocking
/// pool and cut off after the timeout (default 10 seconds).
pub struct ImageMatcher {
    runtime: Option<Handle>,
    timeout: Duration,
    pattern: OnceLock<Regex>,
}

impl Default for ImageMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageMatcher {
    pub fn new() -> Self {
        Self {
            runtime: None,
            timeout: Duration::from_secs(10),
            pattern: OnceLock::new(),
        }
    }

    /// Create a matcher that runs scans on the given runtime under the
    /// default timeout.
    pub fn with_runtime_handle(handle: Handle) -> Self {
        Self {
            runtime: Some(handle),
            ..Self::new()
        }
    }

    /// Set the scan timeout. Only effective with a runtime handle.
    pub fn set_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = timeout;
        self
    }

    fn pattern(&self) -> &Regex {
        self.pattern
            .get_or_init(|| Regex::new(IMAGE_REF_PATTERN).expect("invalid image reference pattern"))
    }

    /// Find all internal image references in the content. A timeout reports
    /// no matches rather than blocking the caller.
    pub fn find_all(&self, content: &str) -> Vec<ImageMatch> {
        if !content.contains(IMAGE_ALIAS) && !content.contains(FILE_ALIAS) {
            // Dominant path: no internal images, the pattern engine is
            // never constructed.
            return Vec::new();
        }
        match &self.runtime {
            None => scan(self.pattern(), content),
            Some(handle) => {
                let re = self.pattern().clone();
                let owned = content.to_string();
                match run_bounded(handle, self.timeout, move || scan(&re, &owned)) {
                    Some(matches) => matches,
                    None => {
                        log::warn!(
                            "image reference scan exceeded {:?}, reporting no matches",
                            self.timeout
                        );
                        Vec::new()
                    }
                }
            }
        }
    }

    /// Streaming substitution over the scan results: each match is replaced
    /// by the closure's output, unmatched spans are copied through once.
    pub fn replace_all<F>(&self, content: &str, mut replacement: F) -> String
    where
        F: FnMut(&ImageMatch) -> String,
    {
        let matches = self.find_all(content);
        if matches.is_empty() {
            return content.to_string();
        }
        let mut out = String::with_capacity(content.len());
        let mut tail = 0;
        for m in &matches {
            out.push_str(&content[tail..m.start]);
            out.push_str(&replacement(m));
            tail = m.end;
        }
        out.push_str(&content[tail..]);
        out
    }
}

fn scan(re: &Regex, content: &str) -> Vec<ImageMatch> {
    re.captures_iter(content)
        .map(|caps| {
            let full = caps.get(0).map(|m| (m.start(), m.end())).unwrap_or((0, 0));
            ImageMatch {
                full_match: content[full.0..full.1].to_string(),
                groups: (0..caps.len())
                    .map(|i| caps.get(i).map(|m| m.as_str().to_string()))
                    .collect(),
                start: full.0,
                end: full.1,
            }
        })
        .collect()
}

/// Run a task on the runtime's blocking pool and wait for at most `limit`.
/// On timeout the task is abandoned, not preempted: the pool thread finishes
/// on its own and the result is dropped.
pub(crate) fn run_bounded<T, F>(handle: &Handle, limit: Duration, task: F) -> Option<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = tokio::sync::oneshot::channel();
    handle.spawn_blocking(move || {
        let _ = tx.send(task());
    });
    handle.block_on(async move {
        match tokio::time::timeout(limit, rx).await {
            Ok(Ok(value)) => Some(value),
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_both_url_shapes() {
        let matcher = ImageMatcher::new();
        let html = r#"<p>hi</p>
            <img alt="a" src="/appsuite/ajax/image/mail/picture?uid=abc123&f=7">
            <img src='/appsuite/api/file?id=99.42&folder=5'>"#;
        let matches = matcher.find_all(html);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].file_id(), Some("abc123"));
        assert_eq!(matches[1].file_id(), Some("99.42"));
        assert!(matches[0].start < matches[0].end);
    }

    #[test]
    fn external_images_are_ignored() {
        let matcher = ImageMatcher::new();
        let html = r#"<img src="https://example.org/ajax/imagery.png">"#;
        assert!(matcher.find_all(html).is_empty());
    }

    #[test]
    fn fast_rejection_skips_pattern_construction() {
        let matcher = ImageMatcher::new();
        let html = "<html><body><img src=\"cid:inline1\"></body></html>";
        assert!(matcher.find_all(html).is_empty());
        assert!(matcher.pattern.get().is_none());
    }

    #[test]
    fn replace_all_blanks_sources() {
        let matcher = ImageMatcher::new();
        let html = r#"a <img src="/ajax/image/mail?uid=u1"> b"#;
        let out = matcher.replace_all(html, |m| format!("[img:{}]", m.file_id().unwrap()));
        assert_eq!(out, "a [img:u1]\"> b");
    }

    #[test]
    fn bounded_run_returns_in_time() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let started = std::time::Instant::now();
        let result = run_bounded(rt.handle(), Duration::from_millis(50), || {
            std::thread::sleep(Duration::from_secs(5));
            42
        });
        assert!(result.is_none());
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn bounded_run_delivers_result() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let result = run_bounded(rt.handle(), Duration::from_secs(5), || 7);
        assert_eq!(result, Some(7));
    }

    #[test]
    fn bounded_scan_with_runtime() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let matcher = ImageMatcher::with_runtime_handle(rt.handle().clone());
        let html = r#"<img src="/ajax/image/x?uid=id9">"#;
        let matches = matcher.find_all(html);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].file_id(), Some("id9"));
    }
}
