// src/surfaces/anchors.rs
// =============================================================================
// Link and mention handling for the inline surface.
//
// Links to platform posts are shown as preview cards and links to profiles
// as profile chips; everything else stays a normal external link. Prose
// mentions like "@skater" become links to the skater's page.
// =============================================================================

use std::collections::HashSet;
use std::sync::LazyLock;

use pulldown_cmark::{Event, Parser, Tag};
use regex::Regex;
use serde::Serialize;

static POST_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https://www\.skatehive\.app/post/([^/?#]+)/@([^/?#]+)/([^/?#]+)")
        .expect("post link pattern is valid")
});

static PROFILE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https://(?:www\.)?(?:skatehive\.app|beta\.skatehive\.app)/(?:profile|skater)/([^/?#]+)")
        .expect("profile link pattern is valid")
});

static MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@[a-zA-Z0-9!_\-]+").expect("mention pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum AnchorTarget {
    PostPreview { author: String, permlink: String },
    Profile { username: String },
    External { href: String },
}

pub fn classify_href(href: &str) -> AnchorTarget {
    if let Some(caps) = POST_LINK.captures(href) {
        return AnchorTarget::PostPreview {
            author: caps[2].to_string(),
            permlink: caps[3].to_string(),
        };
    }

    if let Some(caps) = PROFILE_LINK.captures(href) {
        return AnchorTarget::Profile {
            username: caps[1].to_string(),
        };
    }

    AnchorTarget::External {
        href: href.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TextSegment {
    Text { text: String },
    Mention { username: String, href: String },
}

// Splits prose into plain text and @mentions, keeping every character
pub fn split_mentions(text: &str) -> Vec<TextSegment> {
    let mut segments = Vec::new();
    let mut last = 0;

    for found in MENTION.find_iter(text) {
        if found.start() > last {
            segments.push(TextSegment::Text {
                text: text[last..found.start()].to_string(),
            });
        }

        let username = &found.as_str()[1..];
        segments.push(TextSegment::Mention {
            username: username.to_string(),
            href: format!("/skater/{}", username),
        });
        last = found.end();
    }

    if last < text.len() {
        segments.push(TextSegment::Text {
            text: text[last..].to_string(),
        });
    }

    segments
}

// What the inline surface turns into cards, chips and mention links
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProseLinks {
    pub anchors: Vec<AnchorTarget>,
    pub mentions: Vec<String>,
}

// Walks rendered-to-be prose and classifies its links and @mentions
//
// Only http(s) links count as anchors. Mentions are read from plain text,
// so "@name" inside a link label or a code block is left alone. Each
// username is listed once, in order of first appearance.
//
// Example input:
//   "ride with @xvlad, see [clip](https://www.skatehive.app/skater/xvlad)"
//
// Example output:
//   anchors: [Profile { username: "xvlad" }], mentions: ["xvlad"]
pub fn prose_links(markdown: &str) -> ProseLinks {
    let mut links = ProseLinks::default();
    let mut seen = HashSet::new();

    // Link labels and code blocks arrive as Text events too; depth counters
    // tell us when we're inside one
    let mut link_depth = 0usize;
    let mut code_depth = 0usize;

    for event in Parser::new(markdown) {
        match event {
            // pulldown-cmark 0.9: Tag::Link(link_type, dest_url, title)
            Event::Start(Tag::Link(_, dest_url, _)) => {
                link_depth += 1;
                if dest_url.starts_with("http://") || dest_url.starts_with("https://") {
                    links.anchors.push(classify_href(&dest_url));
                }
            }
            Event::End(Tag::Link(..)) => link_depth = link_depth.saturating_sub(1),
            Event::Start(Tag::CodeBlock(_)) => code_depth += 1,
            Event::End(Tag::CodeBlock(_)) => code_depth = code_depth.saturating_sub(1),
            Event::Text(text) if link_depth == 0 && code_depth == 0 => {
                for segment in split_mentions(&text) {
                    if let TextSegment::Mention { username, .. } = segment {
                        if seen.insert(username.clone()) {
                            links.mentions.push(username);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    links
}
