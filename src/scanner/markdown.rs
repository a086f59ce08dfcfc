// src/scanner/markdown.rs
// =============================================================================
// This module extracts image links written in Markdown image syntax:
//
//   ![alt text](https://example.com/picture.png "optional title")
//
// We match the syntax with a regex instead of a full Markdown parser.
// Post bodies mix Markdown with raw HTML and platform shorthand, and the
// transformer must strip exactly what we extract here, so both sides share
// the IMAGE_MARKDOWN pattern below.
// =============================================================================

use std::sync::LazyLock;

use regex::Regex;

use super::{LinkKind, LinkRecord};

// ![alt](target) - alt and target never span lines
pub(crate) static IMAGE_MARKDOWN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[.*?\]\((.*?)\)").expect("image pattern is valid"));

// Extracts every Markdown image in source order
//
// Duplicates are kept: the collector decides what to drop.
//
// Example input:
//   "Look ![kickflip](https://x.io/kf.gif) and ![](https://x.io/kf.gif)"
//
// Example output:
//   two records, both with url "https://x.io/kf.gif"
pub fn extract_image_links(markdown: &str) -> Vec<LinkRecord> {
    IMAGE_MARKDOWN
        .captures_iter(markdown)
        .map(|caps| {
            // caps[0] is the whole ![alt](target), caps[1] just the target
            let target = caps.get(1).map_or("", |m| m.as_str());
            LinkRecord::new(image_url(target), LinkKind::Image).written_as(&caps[0])
        })
        .collect()
}

// Pulls the URL out of an image target
//
//   "https://x.io/a.png"            -> "https://x.io/a.png"
//   "https://x.io/a.png \"title\""  -> "https://x.io/a.png"
//   "<https://x.io/a b.png>"        -> "https://x.io/a b.png"
fn image_url(target: &str) -> String {
    let target = target.trim();

    // <...> lets the URL contain spaces
    if let Some(inner) = target.strip_prefix('<') {
        if let Some(end) = inner.find('>') {
            return inner[..end].to_string();
        }
    }

    // Anything after the first space is a title
    target.split_whitespace().next().unwrap_or("").to_string()
}
