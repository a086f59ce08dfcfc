// src/collector/mod.rs
// =============================================================================
// This module turns a raw post body into the media list and the cleaned
// prose that the render surfaces consume.
//
// How it works:
// 1. Normalize the text (canonical hosts, 3speak thumbnails -> players)
// 2. Run every scanner on the normalized text
// 3. Concatenate the results in category order (images first by default)
// 4. Drop repeated URLs (first occurrence wins) and excluded assets
// 5. Add the placeholder tile when nothing is left
// 6. Strip all extracted media from the prose
//
// Scanning and stripping both read the normalized text, so a media URL and
// the prose always agree on the host.
// =============================================================================

mod exclusion;
mod order;

#[cfg(test)]
mod proptests;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, FallbackPolicy, PipelineConfig};
use crate::scanner::{self, LinkKind, LinkRecord};
use crate::transform::{HostRewrite, Transformer};

pub use exclusion::ExclusionSet;
pub use order::CategoryOrder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

// One tile of the gallery
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaItem {
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub url: String,
}

impl MediaItem {
    pub fn image(url: impl Into<String>) -> Self {
        Self {
            media_type: MediaType::Image,
            url: url.into(),
        }
    }

    pub fn video(url: impl Into<String>) -> Self {
        Self {
            media_type: MediaType::Video,
            url: url.into(),
        }
    }

    pub fn is_video(&self) -> bool {
        self.media_type == MediaType::Video
    }
}

impl From<LinkRecord> for MediaItem {
    fn from(record: LinkRecord) -> Self {
        match record.kind {
            LinkKind::Image => MediaItem::image(record.url),
            LinkKind::Iframe | LinkKind::CustomEmbed | LinkKind::Youtube => {
                MediaItem::video(record.url)
            }
        }
    }
}

// What both render surfaces receive for one post body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformedContent {
    pub cleaned_text: String,
    pub media_items: Vec<MediaItem>,
}

// Runs every scanner and concatenates the results in `order`
pub fn scan_all(text: &str, order: &CategoryOrder) -> Vec<LinkRecord> {
    order
        .kinds()
        .iter()
        .flat_map(|kind| scanner::scan(*kind, text))
        .collect()
}

// The configured extraction pipeline
//
// Holds no per-post state: `process` can be called for every keystroke or
// every post in a feed, from any number of threads.
#[derive(Debug, Clone)]
pub struct MediaPipeline {
    config: PipelineConfig,
    hosts: HostRewrite,
    exclusions: ExclusionSet,
    fallback: MediaItem,
}

impl Default for MediaPipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl MediaPipeline {
    // Builds a pipeline from an already validated config
    pub fn new(config: PipelineConfig) -> Self {
        let hosts = config.host_rewrite();
        let exclusions = ExclusionSet::new(&config.excluded_urls, &hosts);
        let fallback = MediaItem::image(hosts.apply(config.fallback_url.trim()));

        Self {
            config,
            hosts,
            exclusions,
            fallback,
        }
    }

    // Validates the config first
    pub fn try_new(config: PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn host_rewrite(&self) -> &HostRewrite {
        &self.hosts
    }

    pub fn exclusions(&self) -> &ExclusionSet {
        &self.exclusions
    }

    pub fn fallback(&self) -> &MediaItem {
        &self.fallback
    }

    // Text the scanners read
    pub fn normalize(&self, raw: &str) -> String {
        Transformer::normalize().apply(raw, &self.hosts)
    }

    pub fn process(&self, raw: &str) -> TransformedContent {
        // Scanning and stripping read the same normalized text
        let normalized = self.normalize(raw);
        let media_items = self.collect_media(&normalized);
        let cleaned_text = Transformer::strip_media().apply(&normalized, &self.hosts);

        tracing::debug!(
            input_len = raw.len(),
            cleaned_len = cleaned_text.len(),
            media = media_items.len(),
            "processed post body"
        );

        TransformedContent {
            cleaned_text,
            media_items,
        }
    }

    // Merges, deduplicates and filters the scanner output of normalized text
    pub fn collect_media(&self, normalized: &str) -> Vec<MediaItem> {
        // All scanner output, already in category order
        let records = scan_all(normalized, &self.config.category_order);

        // Needed by FallbackPolicy::BeforeExclusion, which looks at what was
        // found before anything is dropped
        let found_video = records
            .iter()
            .any(|record| record.kind != LinkKind::Image && !record.url.is_empty());

        // URLs already kept; first occurrence wins
        let mut seen = HashSet::new();
        let mut items = Vec::new();

        for record in records {
            if record.url.is_empty() {
                tracing::trace!(kind = ?record.kind, "skipping link without url");
                continue;
            }
            // insert() returns false if the URL was already there
            if !seen.insert(record.url.clone()) {
                tracing::trace!(url = %record.url, "skipping repeated url");
                continue;
            }
            if self.exclusions.contains(&record.url) {
                tracing::trace!(url = %record.url, "skipping excluded asset");
                continue;
            }
            items.push(MediaItem::from(record));
        }

        // Never hand the gallery an empty list (unless the policy says so)
        if items.is_empty() && self.wants_fallback(found_video) {
            tracing::trace!(url = %self.fallback.url, "adding placeholder tile");
            items.push(self.fallback.clone());
        }

        items
    }

    fn wants_fallback(&self, found_video: bool) -> bool {
        match self.config.fallback_policy {
            FallbackPolicy::AfterExclusion => true,
            FallbackPolicy::BeforeExclusion => !found_video,
        }
    }
}

// Processes one post body with the default configuration
pub fn collect(raw: &str) -> TransformedContent {
    MediaPipeline::default().process(raw)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does MediaPipeline hold no per-post state?
//    - `process(&self, ..)` only reads the pipeline, so one pipeline can be
//      shared by reference between threads (it is Send + Sync)
//
// 2. What does `impl From<LinkRecord> for MediaItem` buy us?
//    - `MediaItem::from(record)` (or `record.into()`) picks the media type
//      in one place instead of at every call site
//
// 3. Why `#[serde(rename = "type")]`?
//    - `type` is a Rust keyword, so the field is `media_type` in code and
//      `type` in JSON
// -----------------------------------------------------------------------------
