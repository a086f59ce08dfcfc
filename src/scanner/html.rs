// src/scanner/html.rs
// =============================================================================
// This module extracts embed links from raw HTML tags in a post body.
//
// Posts carry uploaded videos and third-party players as raw tags:
//
//   <iframe src="https://ipfs.skatehive.app/ipfs/Qm..." allowfullscreen></iframe>
//
// We find each opening tag first, then read its src attribute. The
// transformer strips opening tags with the same EMBED_OPEN_TAG pattern, so a
// tag we extract from is always a tag that gets stripped.
// =============================================================================

use std::sync::LazyLock;

use regex::Regex;

use super::{LinkKind, LinkRecord};

// An opening <iframe ...> tag, attributes may span lines
pub(crate) static EMBED_OPEN_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<iframe\b[^>]*>").expect("embed tag pattern is valid"));

pub(crate) static EMBED_CLOSE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</iframe\s*>").expect("embed close pattern is valid"));

static SRC_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\ssrc\s*=\s*["']([^"']*)["']"#).expect("src pattern is valid")
});

// Extracts the src of every embed tag in source order
//
// Example:
//   "<iframe width=\"560\" src=\"https://www.youtube.com/embed/abc\"></iframe>"
//   -> one record with url "https://www.youtube.com/embed/abc"
pub fn extract_iframe_links(html: &str) -> Vec<LinkRecord> {
    EMBED_OPEN_TAG
        .find_iter(html)
        .filter_map(|tag| {
            // Tags without a src (e.g. data-src only) produce nothing
            let caps = SRC_ATTRIBUTE.captures(tag.as_str())?;
            let src = caps.get(1).map_or("", |m| m.as_str());
            Some(LinkRecord::new(src, LinkKind::Iframe).written_as(tag.as_str()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_double_quoted_src() {
        let links = extract_iframe_links(r#"<iframe src="https://y.io/2"></iframe>"#);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "https://y.io/2");
        assert_eq!(links[0].domain, "y.io");
        assert_eq!(links[0].kind, LinkKind::Iframe);
    }

    #[test]
    fn test_extract_single_quoted_src_with_other_attributes() {
        let html = "<IFRAME width='560' height='315' src='https://y.io/3' allowfullscreen></IFRAME>";
        let links = extract_iframe_links(html);
        assert_eq!(links[0].url, "https://y.io/3");
    }

    #[test]
    fn test_extract_multiline_tag() {
        let html = "<iframe\n  width=\"560\"\n  src=\"https://y.io/4\"\n></iframe>";
        let links = extract_iframe_links(html);
        assert_eq!(links[0].url, "https://y.io/4");
    }

    #[test]
    fn test_tag_without_src_is_skipped() {
        assert!(extract_iframe_links("<iframe></iframe>").is_empty());
    }

    #[test]
    fn test_data_src_is_not_src() {
        let links = extract_iframe_links(r#"<iframe data-src="https://a.io/x"></iframe>"#);
        assert!(links.is_empty());
    }

    #[test]
    fn test_multiple_tags_in_order() {
        let html = r#"<iframe src="https://b.io/1"></iframe> text <iframe src="https://a.io/2"></iframe>"#;
        let urls: Vec<_> = extract_iframe_links(html).into_iter().map(|l| l.url).collect();
        assert_eq!(urls, vec!["https://b.io/1", "https://a.io/2"]);
    }

    #[test]
    fn test_iframe_inside_image_alt_is_still_found() {
        let html = r#"![<iframe src="https://a.io/v">](https://a.io/i.png)"#;
        assert_eq!(extract_iframe_links(html).len(), 1);
    }
}
