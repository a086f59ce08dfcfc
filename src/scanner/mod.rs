// src/scanner/mod.rs
// =============================================================================
// This module finds media links inside a raw post body.
//
// Submodules:
// - markdown: image links written as ![alt](url)
// - html: embed tags (<iframe src="...">)
// - platform: 3speak watch links and YouTube share links
//
// Every scanner is a pure function: text in, ordered LinkRecords out.
// A scanner never fails. A link whose URL cannot be parsed is still
// returned, it just gets an empty domain.
// =============================================================================

mod html;
mod markdown;
mod platform;

use serde::{Deserialize, Serialize};
use url::Url;

pub use html::extract_iframe_links;
pub use markdown::extract_image_links;
pub use platform::{extract_custom_links, extract_youtube_links, youtube_embed_url};

pub(crate) use html::{EMBED_CLOSE_TAG, EMBED_OPEN_TAG};
pub(crate) use markdown::IMAGE_MARKDOWN;
pub(crate) use platform::{
    is_attribute_value, threespeak_embed_url, THREESPEAK_WATCH, YOUTUBE_SHORT, YOUTUBE_WATCH,
};

// Which scanner produced a link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkKind {
    /// Markdown image syntax
    Image,
    /// An embed tag carrying a src attribute
    Iframe,
    /// A 3speak watch link, rewritten to its embed form
    CustomEmbed,
    /// A YouTube share link, rewritten to its embed form
    Youtube,
}

impl LinkKind {
    pub const ALL: [LinkKind; 4] = [
        LinkKind::Image,
        LinkKind::Iframe,
        LinkKind::CustomEmbed,
        LinkKind::Youtube,
    ];
}

// One link found in the source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkRecord {
    // The URL a renderer should load (embed form for share links)
    pub url: String,
    // Host of the link as written, "" when it can't be parsed
    pub domain: String,
    pub kind: LinkKind,
    // The exact text the scanner matched, e.g. the whole ![alt](url)
    pub source: String,
}

impl LinkRecord {
    // Builds a record whose domain comes from `url` itself
    pub fn new(url: impl Into<String>, kind: LinkKind) -> Self {
        let url = url.into();
        let domain = domain_of(&url);
        Self {
            source: url.clone(),
            url,
            domain,
            kind,
        }
    }

    // Builds a record whose domain comes from the link as it was written,
    // used when the returned URL is a rewritten form of the source link
    pub fn with_source(url: impl Into<String>, source: &str, kind: LinkKind) -> Self {
        Self {
            url: url.into(),
            domain: domain_of(source),
            kind,
            source: source.to_string(),
        }
    }

    // Replaces the matched text without touching url or domain
    //
    // Example:
    //   LinkRecord::new("https://x.io/a.png", LinkKind::Image)
    //       .written_as("![a](https://x.io/a.png)")
    pub fn written_as(mut self, source: &str) -> Self {
        self.source = source.to_string();
        self
    }
}

// Returns the host part of a URL, or "" when it cannot be parsed
pub fn domain_of(url: &str) -> String {
    // Url::parse fails on relative paths and garbage; both mean "no domain"
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
        .unwrap_or_default()
}

// Runs one scanner by kind
pub fn scan(kind: LinkKind, text: &str) -> Vec<LinkRecord> {
    // The match is exhaustive: a new LinkKind won't compile until it has a scanner
    match kind {
        LinkKind::Image => extract_image_links(text),
        LinkKind::Iframe => extract_iframe_links(text),
        LinkKind::CustomEmbed => extract_custom_links(text),
        LinkKind::Youtube => extract_youtube_links(text),
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. pub vs pub(crate)
//    - `pub use` items are part of the library API
//    - `pub(crate) use` patterns are shared with the transform module only,
//      so the strip passes match exactly what the scanners extract
//
// 2. Why does LinkRecord keep `source` next to `url`?
//    - For share links the URL is rewritten (watch -> embed); `source` is
//      the text as it was written, which is what must disappear from prose
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_of_absolute_url() {
        assert_eq!(domain_of("https://images.hive.blog/p/abc.png"), "images.hive.blog");
    }

    #[test]
    fn test_domain_of_malformed_url_is_empty() {
        assert_eq!(domain_of("not a url"), "");
        assert_eq!(domain_of(""), "");
        assert_eq!(domain_of("/relative/path.png"), "");
    }

    #[test]
    fn test_domain_of_url_without_host() {
        assert_eq!(domain_of("data:image/png;base64,AAAA"), "");
    }

    #[test]
    fn test_record_with_source_keeps_source_domain() {
        let record = LinkRecord::with_source(
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            LinkKind::Youtube,
        );
        assert_eq!(record.domain, "youtu.be");
        assert_eq!(record.source, "https://youtu.be/dQw4w9WgXcQ");
    }

    #[test]
    fn test_written_as_keeps_url_and_domain() {
        let record = LinkRecord::new("https://x.io/a.png", LinkKind::Image)
            .written_as("![a](https://x.io/a.png)");
        assert_eq!(record.url, "https://x.io/a.png");
        assert_eq!(record.domain, "x.io");
        assert_eq!(record.source, "![a](https://x.io/a.png)");
    }

    #[test]
    fn test_scanners_record_matched_text() {
        let text = "![a](https://x.io/1.png) <iframe src=\"https://y.io/2\"></iframe>";
        assert_eq!(scan(LinkKind::Image, text)[0].source, "![a](https://x.io/1.png)");
        assert_eq!(scan(LinkKind::Iframe, text)[0].source, "<iframe src=\"https://y.io/2\">");
    }

    #[test]
    fn test_scan_dispatches_by_kind() {
        let text = "![a](https://x.io/1.png) <iframe src=\"https://y.io/2\"></iframe>";
        assert_eq!(scan(LinkKind::Image, text).len(), 1);
        assert_eq!(scan(LinkKind::Iframe, text).len(), 1);
        assert!(scan(LinkKind::CustomEmbed, text).is_empty());
        assert!(scan(LinkKind::Youtube, text).is_empty());
    }
}
