// src/cache.rs
// =============================================================================
// Process-lifetime caches used around the pipeline.
//
// - ProfileImageCache: username -> profile picture URL, looked up once
// - ContentCache: raw post text -> TransformedContent
//
// Both are plain owned maps. Callers decide where they live and for how
// long; nothing here is global.
// =============================================================================

use std::collections::HashMap;

use serde_json::Value;

use crate::collector::{MediaPipeline, TransformedContent};

// Stored when a profile has no picture, so the lookup isn't repeated
pub const LOADING_PLACEHOLDER: &str = "/loading.gif";

#[derive(Debug, Default)]
pub struct ProfileImageCache {
    images: HashMap<String, String>,
}

impl ProfileImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    // Returns the cached picture, or asks `lookup` and remembers the answer
    //
    // Example:
    //   cache.get_or_fetch("xvlad", |name| api.profile_image(name))
    pub fn get_or_fetch<F>(&mut self, username: &str, lookup: F) -> &str
    where
        F: FnOnce(&str) -> Option<String>,
    {
        self.images
            .entry(username.to_string())
            .or_insert_with(|| match lookup(username) {
                Some(url) if !url.trim().is_empty() => url,
                _ => {
                    tracing::debug!(username, "no profile image, using placeholder");
                    LOADING_PLACEHOLDER.to_string()
                }
            })
    }

    pub fn get(&self, username: &str) -> Option<&str> {
        self.images.get(username).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

// Reads `profile.profile_image` from account metadata
//
// The posting metadata wins over the general metadata. Missing fields and
// malformed JSON both count as "no picture".
pub fn resolve_profile_image(
    posting_json_metadata: Option<&str>,
    json_metadata: Option<&str>,
) -> Option<String> {
    [posting_json_metadata, json_metadata]
        .into_iter()
        .flatten()
        .find_map(profile_image_from)
}

fn profile_image_from(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        return None;
    }

    let metadata: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(error = %e, "ignoring malformed account metadata");
            return None;
        }
    };

    metadata
        .get("profile")?
        .get("profile_image")?
        .as_str()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
}

// Memoizes pipeline output per raw text
//
// The key is the whole text, so an edited post is simply a new entry.
#[derive(Debug, Default)]
pub struct ContentCache {
    entries: HashMap<String, TransformedContent>,
    hits: usize,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_process(&mut self, raw: &str, pipeline: &MediaPipeline) -> &TransformedContent {
        if self.entries.contains_key(raw) {
            self.hits += 1;
            tracing::trace!(len = raw.len(), "content cache hit");
        }

        self.entries
            .entry(raw.to_string())
            .or_insert_with(|| pipeline.process(raw))
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_profile_lookup_runs_once() {
        let mut cache = ProfileImageCache::new();
        let calls = Cell::new(0);

        let lookup = |_: &str| {
            calls.set(calls.get() + 1);
            Some("https://x.io/avatar.png".to_string())
        };

        assert_eq!(cache.get_or_fetch("xvlad", lookup), "https://x.io/avatar.png");
        assert_eq!(cache.get_or_fetch("xvlad", lookup), "https://x.io/avatar.png");
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_missing_profile_image_stores_placeholder() {
        let mut cache = ProfileImageCache::new();
        assert_eq!(cache.get_or_fetch("ghost", |_| None), LOADING_PLACEHOLDER);
        assert_eq!(cache.get_or_fetch("blank", |_| Some("  ".to_string())), LOADING_PLACEHOLDER);
        assert_eq!(cache.get("ghost"), Some(LOADING_PLACEHOLDER));
        assert_eq!(cache.get("nobody"), None);
    }

    #[test]
    fn test_posting_metadata_wins() {
        let posting = r#"{"profile":{"profile_image":"https://x.io/posting.png"}}"#;
        let general = r#"{"profile":{"profile_image":"https://x.io/general.png"}}"#;
        assert_eq!(
            resolve_profile_image(Some(posting), Some(general)),
            Some("https://x.io/posting.png".to_string())
        );
    }

    #[test]
    fn test_falls_back_to_general_metadata() {
        let general = r#"{"profile":{"profile_image":"https://x.io/general.png"}}"#;
        for posting in [None, Some(""), Some("{not json"), Some(r#"{"profile":{}}"#)] {
            assert_eq!(
                resolve_profile_image(posting, Some(general)),
                Some("https://x.io/general.png".to_string())
            );
        }
    }

    #[test]
    fn test_no_metadata_means_no_image() {
        assert_eq!(resolve_profile_image(None, None), None);
        assert_eq!(resolve_profile_image(Some("[]"), Some("null")), None);
        assert_eq!(
            resolve_profile_image(Some(r#"{"profile":{"profile_image":42}}"#), None),
            None
        );
    }

    #[test]
    fn test_content_cache_memoizes_by_text() {
        let pipeline = MediaPipeline::default();
        let mut cache = ContentCache::new();

        let first = cache.get_or_process("![a](https://x.io/1.png)", &pipeline).clone();
        let again = cache.get_or_process("![a](https://x.io/1.png)", &pipeline).clone();
        assert_eq!(first, again);
        assert_eq!(cache.hits(), 1);

        let edited = cache.get_or_process("![a](https://x.io/2.png)", &pipeline);
        assert_eq!(edited.media_items[0].url, "https://x.io/2.png");
        assert_eq!(cache.len(), 2);
    }
}
