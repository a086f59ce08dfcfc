// src/scanner/platform.rs
// =============================================================================
// This module recognizes platform-specific video links and maps them to the
// URL a player can embed.
//
// Supported shapes:
// - 3speak:  https://3speak.tv/watch?v=<owner>/<permlink>
//            -> https://3speak.tv/embed?v=<owner>/<permlink>
// - YouTube: https://youtu.be/<id>
//            https://www.youtube.com/watch?v=<id>
//            -> https://www.youtube.com/embed/<id>
//
// Links that are already the value of an HTML attribute (src="...") are
// left to the embed-tag scanner.
// =============================================================================

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::{LinkKind, LinkRecord};

// https://3speak.tv/watch?v=<owner>/<permlink>, capture 1 is owner/permlink
pub(crate) static THREESPEAK_WATCH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)https://3speak\.tv/watch\?v=([\w\-/]+)").expect("3speak pattern is valid")
});

// YouTube ids are always 11 characters from [A-Za-z0-9_-]
pub(crate) static YOUTUBE_SHORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)https?://youtu\.be/([A-Za-z0-9_-]{11})(?:\?[^\s<>"'()\[\]]*)?"#)
        .expect("youtu.be pattern is valid")
});

pub(crate) static YOUTUBE_WATCH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)https?://(?:www\.|m\.)?youtube\.com/watch\?(?:[^\s<>"'()\[\]]*?&)?v=([A-Za-z0-9_-]{11})(?:[&#][^\s<>"'()\[\]]*)?"#,
    )
    .expect("youtube watch pattern is valid")
});

// Canonical embeddable form of a YouTube video
pub fn youtube_embed_url(video_id: &str) -> String {
    format!("https://www.youtube.com/embed/{}", video_id)
}

pub(crate) fn threespeak_embed_url(video_path: &str) -> String {
    format!("https://3speak.tv/embed?v={}", video_path)
}

// True when the match starting at `start` is the value of an attribute,
// e.g. the URL in src="https://..."
pub(crate) fn is_attribute_value(text: &str, start: usize) -> bool {
    // Only the characters right before the URL matter
    let before = &text[..start];
    before.ends_with("=\"") || before.ends_with("='") || before.ends_with('=')
}

// Extracts 3speak watch links as embed links
//
// Repeated watch links are reported once (first occurrence).
pub fn extract_custom_links(text: &str) -> Vec<LinkRecord> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for caps in THREESPEAK_WATCH.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };

        // src="https://3speak.tv/watch?v=..." belongs to the embed-tag scanner
        if is_attribute_value(text, whole.start()) {
            continue;
        }

        // HashSet::insert returns false when the link was already seen
        let source = whole.as_str();
        if !seen.insert(source.to_string()) {
            continue;
        }

        links.push(LinkRecord::with_source(
            threespeak_embed_url(&caps[1]),
            source,
            LinkKind::CustomEmbed,
        ));
    }

    links
}

// Extracts short (youtu.be) and watch (youtube.com/watch) links, in source
// order across both shapes, as embed links
pub fn extract_youtube_links(text: &str) -> Vec<LinkRecord> {
    let mut found: Vec<(usize, LinkRecord)> = YOUTUBE_SHORT
        .captures_iter(text)
        .chain(YOUTUBE_WATCH.captures_iter(text))
        .filter_map(|caps| youtube_record(text, &caps))
        .collect();

    // Both iterators are in source order on their own; merge them by offset
    found.sort_by_key(|(start, _)| *start);
    found.into_iter().map(|(_, record)| record).collect()
}

fn youtube_record(text: &str, caps: &Captures<'_>) -> Option<(usize, LinkRecord)> {
    let whole = caps.get(0)?;
    if is_attribute_value(text, whole.start()) {
        return None;
    }

    let record = LinkRecord::with_source(
        youtube_embed_url(&caps[1]),
        whole.as_str(),
        LinkKind::Youtube,
    );
    Some((whole.start(), record))
}


// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why LazyLock<Regex>?
//    - Compiling a regex is slow, matching is fast
//    - LazyLock compiles it once, the first time a scanner runs
//
// 2. What is `let ... else`?
//    - `let Some(whole) = caps.get(0) else { continue };` binds `whole` or
//      runs the else branch, which must leave the loop or function
//
// 3. Why return (usize, LinkRecord) from youtube_record?
//    - The offset lets us merge two match lists back into source order
// -----------------------------------------------------------------------------
