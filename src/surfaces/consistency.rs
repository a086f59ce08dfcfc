// src/surfaces/consistency.rs
// =============================================================================
// Checks that the inline surface and the gallery agree on a post.
//
// A media URL must show up in exactly one place: the gallery. We render the
// cleaned text like the inline surface does and report:
// - gallery URLs the prose would render again
// - gallery URLs still written out in the prose
// - media the prose would render that the gallery doesn't have
// - link text a scanner matched that survived stripping (check_post only)
// =============================================================================

use std::collections::HashSet;

use serde::Serialize;

use super::inline::{render_inline, rendered_media_sources};
use crate::collector::{scan_all, MediaPipeline, TransformedContent};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Inconsistency {
    /// The inline surface renders a media element for this URL
    RenderedInline { url: String },
    /// The URL is still written in the cleaned text
    LeftInText { url: String },
    /// The inline surface renders media the gallery doesn't list
    MissingFromGallery { url: String },
    /// Text a scanner matched (e.g. a whole share link) is still in the prose
    SourceLeftInText { source: String },
}

impl Inconsistency {
    // The URL or matched text the problem is about
    pub fn url(&self) -> &str {
        match self {
            Inconsistency::RenderedInline { url }
            | Inconsistency::LeftInText { url }
            | Inconsistency::MissingFromGallery { url } => url,
            Inconsistency::SourceLeftInText { source } => source,
        }
    }
}

pub fn check_consistency(content: &TransformedContent) -> Vec<Inconsistency> {
    let rendered = render_inline(&content.cleaned_text);
    let inline_sources = rendered_media_sources(&rendered);
    let inline_set: HashSet<&str> = inline_sources.iter().map(String::as_str).collect();
    let gallery: HashSet<&str> = content.media_items.iter().map(|item| item.url.as_str()).collect();

    let mut problems: Vec<Inconsistency> = content
        .media_items
        .iter()
        .filter_map(|item| {
            if inline_set.contains(item.url.as_str()) {
                Some(Inconsistency::RenderedInline {
                    url: item.url.clone(),
                })
            } else if content.cleaned_text.contains(item.url.as_str()) {
                Some(Inconsistency::LeftInText {
                    url: item.url.clone(),
                })
            } else {
                None
            }
        })
        .collect();

    // The other direction: prose media the gallery never got
    let mut reported = HashSet::new();
    for src in &inline_sources {
        if !gallery.contains(src.as_str()) && reported.insert(src.as_str()) {
            problems.push(Inconsistency::MissingFromGallery { url: src.clone() });
        }
    }

    problems
}

// Full check of one post body: check_consistency on the pipeline output,
// plus every scanner match of the normalized text must be gone from the
// cleaned text
pub fn check_post(raw: &str, pipeline: &MediaPipeline, content: &TransformedContent) -> Vec<Inconsistency> {
    let mut problems = check_consistency(content);

    let normalized = pipeline.normalize(raw);
    let mut reported = HashSet::new();
    for record in scan_all(&normalized, &pipeline.config().category_order) {
        if record.source.is_empty() || !content.cleaned_text.contains(record.source.as_str()) {
            continue;
        }
        if reported.insert(record.source.clone()) {
            problems.push(Inconsistency::SourceLeftInText {
                source: record.source,
            });
        }
    }

    problems
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::{collect, MediaItem};

    fn check_raw(raw: &str) -> Vec<Inconsistency> {
        let pipeline = MediaPipeline::default();
        let content = pipeline.process(raw);
        check_post(raw, &pipeline, &content)
    }

    #[test]
    fn test_pipeline_output_is_consistent() {
        let content = collect(
            "![a](https://x.io/1.png) <iframe src=\"https://y.io/2\"></iframe> https://youtu.be/dQw4w9WgXcQ",
        );
        assert!(check_consistency(&content).is_empty());
    }

    #[test]
    fn test_detects_media_rendered_twice() {
        let content = TransformedContent {
            cleaned_text: "![a](https://x.io/1.png)".to_string(),
            media_items: vec![MediaItem::image("https://x.io/1.png")],
        };
        assert_eq!(
            check_consistency(&content),
            vec![Inconsistency::RenderedInline {
                url: "https://x.io/1.png".to_string()
            }]
        );
    }

    #[test]
    fn test_detects_url_left_in_text() {
        let content = TransformedContent {
            cleaned_text: "source: https://x.io/1.png".to_string(),
            media_items: vec![MediaItem::image("https://x.io/1.png")],
        };
        let problems = check_consistency(&content);
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].url(), "https://x.io/1.png");
        assert!(matches!(problems[0], Inconsistency::LeftInText { .. }));
    }

    #[test]
    fn test_detects_media_missing_from_gallery() {
        let content = TransformedContent {
            cleaned_text: "![x](https://x.io/1.png)".to_string(),
            media_items: vec![MediaItem::video("https://y.io/2")],
        };
        assert_eq!(
            check_consistency(&content),
            vec![Inconsistency::MissingFromGallery {
                url: "https://x.io/1.png".to_string()
            }]
        );
    }

    #[test]
    fn test_raw_html_image_is_missing_from_gallery() {
        let content = collect("<img src=\"https://x.io/raw.png\"> text");
        let problems = check_consistency(&content);
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].url(), "https://x.io/raw.png");
    }

    #[test]
    fn test_detects_scanner_match_left_in_text() {
        let content = TransformedContent {
            cleaned_text: "my line https://3speak.tv/watch?v=sk8/clip".to_string(),
            media_items: vec![MediaItem::video("https://3speak.tv/embed?v=sk8/clip")],
        };
        let raw = "my line https://3speak.tv/watch?v=sk8/clip";
        let problems = check_post(raw, &MediaPipeline::default(), &content);
        assert_eq!(
            problems,
            vec![Inconsistency::SourceLeftInText {
                source: "https://3speak.tv/watch?v=sk8/clip".to_string()
            }]
        );
    }

    #[test]
    fn test_threespeak_watch_link_post_is_consistent() {
        assert!(check_raw("my line https://3speak.tv/watch?v=sk8/clip").is_empty());
    }

    #[test]
    fn test_embed_glued_to_image_syntax_is_consistent() {
        let raw = "!<iframe src=\"https://y.io/2\">[x](https://x.io/1.png)";
        let content = collect(raw);
        assert_eq!(content.cleaned_text, "");
        assert!(check_raw(raw).is_empty());
    }
}
