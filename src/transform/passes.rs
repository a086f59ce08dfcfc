// src/transform/passes.rs
// =============================================================================
// The individual text rewrite passes.
//
// Each pass is a pure function from text to text. A pass that finds nothing
// to rewrite returns its input unchanged.
//
// The strip passes reuse the scanner patterns (IMAGE_MARKDOWN,
// EMBED_OPEN_TAG) so that whatever the collector extracts is exactly what
// disappears from the prose.
// =============================================================================

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::scanner::{
    is_attribute_value, threespeak_embed_url, youtube_embed_url, EMBED_CLOSE_TAG, EMBED_OPEN_TAG,
    IMAGE_MARKDOWN, THREESPEAK_WATCH, YOUTUBE_SHORT, YOUTUBE_WATCH,
};

// [![](thumbnail)](https://3speak.tv/watch?v=owner/permlink)
static THREESPEAK_THUMBNAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\[!\[[^\]]*\]\((?:https?://[^)\s]+)\)\]\(https://3speak\.tv/watch\?v=([\w-]+/[\w-]+)\)",
    )
    .expect("3speak thumbnail pattern is valid")
});

// https://zora.co/collect/<chain>:<address>[/<token>][/embed]
static ZORA_COLLECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)https://zora\.co/collect/([a-z0-9]+:0x[0-9a-f]{40})(?:/(\d+))?(?:/embed)?")
        .expect("zora pattern is valid")
});

static FULLSCREEN_LEFTOVER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)allowfullscreen(?:\s*=\s*(?:"[^"]*"|'[^']*'|\{[^}]*\}|\w+))?\s*/?>"#)
        .expect("fullscreen leftover pattern is valid")
});

// Replaces every legacy host string with the canonical host
pub fn rewrite_hosts(text: &str, legacy_hosts: &[String], canonical_host: &str) -> String {
    let mut out = text.to_string();
    for legacy in legacy_hosts.iter().filter(|host| !host.is_empty()) {
        if out.contains(legacy.as_str()) {
            out = out.replace(legacy.as_str(), canonical_host);
        }
    }
    out
}

// Collapses a 3speak thumbnail link into a 3speak player
pub fn embed_threespeak_thumbnails(text: &str) -> String {
    THREESPEAK_THUMBNAIL
        .replace_all(text, |caps: &Captures<'_>| {
            iframe_markup(&threespeak_embed_url(&caps[1]), "allowtransparency=\"true\" allowfullscreen")
        })
        .into_owned()
}

// https://3speak.tv/watch?v=<owner>/<permlink> -> 3speak player
//
// Thumbnail links must be collapsed first: their target is a watch link too.
pub fn embed_threespeak_watch_links(text: &str) -> String {
    replace_bare_links(&THREESPEAK_WATCH, text, |caps| {
        iframe_markup(&threespeak_embed_url(&caps[1]), "allowtransparency=\"true\" allowfullscreen")
    })
}

// https://youtu.be/<id> -> YouTube player
pub fn embed_short_video_links(text: &str) -> String {
    replace_bare_links(&YOUTUBE_SHORT, text, |caps| {
        iframe_markup(&youtube_embed_url(&caps[1]), "allowfullscreen")
    })
}

// https://www.youtube.com/watch?v=<id> -> YouTube player
pub fn embed_watch_video_links(text: &str) -> String {
    replace_bare_links(&YOUTUBE_WATCH, text, |caps| {
        iframe_markup(&youtube_embed_url(&caps[1]), "allowfullscreen")
    })
}

// Zora collect links -> Zora mint player
pub fn auto_embed_zora(text: &str) -> String {
    replace_bare_links(&ZORA_COLLECT, text, |caps| {
        let src = match caps.get(2) {
            Some(token) => format!(
                "https://zora.co/collect/{}/{}/embed",
                &caps[1],
                token.as_str()
            ),
            None => format!("https://zora.co/collect/{}/embed", &caps[1]),
        };
        iframe_markup(&src, "width=\"100%\" height=\"500\" allowtransparency=\"true\"")
    })
}

// Removes every Markdown image
pub fn strip_images(text: &str) -> String {
    strip_to_fixed_point(&IMAGE_MARKDOWN, text)
}

// Removes every opening embed tag, then every closing one
pub fn strip_embed_tags(text: &str) -> String {
    let without_open = strip_to_fixed_point(&EMBED_OPEN_TAG, text);
    strip_to_fixed_point(&EMBED_CLOSE_TAG, &without_open)
}

// Removes `allowfullscreen>` fragments left behind by broken tags
pub fn strip_fullscreen_leftovers(text: &str) -> String {
    strip_to_fixed_point(&FULLSCREEN_LEFTOVER, text)
}

fn iframe_markup(src: &str, attributes: &str) -> String {
    format!("<iframe src=\"{}\" {}></iframe>", src, attributes)
}

// Rewrites matches of `pattern`, except those that are already the value of
// an attribute (the URL inside an embed we produced earlier)
fn replace_bare_links<F>(pattern: &Regex, text: &str, embed: F) -> String
where
    F: Fn(&Captures<'_>) -> String,
{
    pattern
        .replace_all(text, |caps: &Captures<'_>| {
            let start = caps.get(0).map_or(0, |m| m.start());
            if is_attribute_value(text, start) {
                caps[0].to_string()
            } else {
                embed(caps)
            }
        })
        .into_owned()
}

// Deleting a match can glue its neighbours into a new match
// ("!![a](u)[b](v)"), so repeat until nothing is left
fn strip_to_fixed_point(pattern: &Regex, text: &str) -> String {
    let mut out = text.to_string();
    while pattern.is_match(&out) {
        out = pattern.replace_all(&out, "").into_owned();
    }
    out
}
