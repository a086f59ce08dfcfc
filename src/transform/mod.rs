// src/transform/mod.rs
// =============================================================================
// This module rewrites post text before it reaches a renderer.
//
// A Transformer is an ordered list of passes (see passes.rs). The order
// matters: host rewriting runs before anything reads URLs, and share links
// are turned into embeds before the embed tags are stripped.
//
// Presets:
// - normalize:   canonical hosts + 3speak thumbnails collapsed into players.
//                The scanners read this text.
// - strip_media: removes everything the gallery shows from the prose.
// - gallery:     normalize, then strip_media. Produces the cleaned text.
// - inline:      turns share links into players for surfaces that render
//                prose only (comments, previews).
//
// Every preset is idempotent: applying it twice gives the same text as
// applying it once. Transformer::apply repeats the passes until the text
// stops changing, so markup glued together by a strip is caught too.
// =============================================================================

mod passes;

use serde::{Deserialize, Serialize};

pub use passes::{
    auto_embed_zora, embed_short_video_links, embed_threespeak_thumbnails,
    embed_threespeak_watch_links, embed_watch_video_links, rewrite_hosts, strip_embed_tags,
    strip_fullscreen_leftovers, strip_images,
};

// Legacy asset hosts and the host they are moved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRewrite {
    legacy_hosts: Vec<String>,
    canonical_host: String,
}

impl HostRewrite {
    pub fn new(legacy_hosts: Vec<String>, canonical_host: impl Into<String>) -> Self {
        Self {
            legacy_hosts,
            canonical_host: canonical_host.into(),
        }
    }

    pub fn canonical_host(&self) -> &str {
        &self.canonical_host
    }

    pub fn legacy_hosts(&self) -> &[String] {
        &self.legacy_hosts
    }

    // Applies the rewrite to any string: prose, a whole post, or one URL
    pub fn apply(&self, text: &str) -> String {
        rewrite_hosts(text, &self.legacy_hosts, &self.canonical_host)
    }
}

// One rewrite step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Pass {
    RewriteHosts,
    EmbedThreeSpeakThumbnails,
    EmbedThreeSpeakWatchLinks,
    EmbedShortVideoLinks,
    EmbedWatchVideoLinks,
    AutoEmbedZora,
    StripImages,
    StripEmbedTags,
    StripFullscreenLeftovers,
}

impl Pass {
    pub fn apply(self, text: &str, hosts: &HostRewrite) -> String {
        match self {
            Pass::RewriteHosts => hosts.apply(text),
            Pass::EmbedThreeSpeakThumbnails => embed_threespeak_thumbnails(text),
            Pass::EmbedThreeSpeakWatchLinks => embed_threespeak_watch_links(text),
            Pass::EmbedShortVideoLinks => embed_short_video_links(text),
            Pass::EmbedWatchVideoLinks => embed_watch_video_links(text),
            Pass::AutoEmbedZora => auto_embed_zora(text),
            Pass::StripImages => strip_images(text),
            Pass::StripEmbedTags => strip_embed_tags(text),
            Pass::StripFullscreenLeftovers => strip_fullscreen_leftovers(text),
        }
    }
}

// Named preset, selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Preset {
    /// Cleaned prose shown next to the media gallery
    #[default]
    Gallery,
    /// Prose with share links turned into players, no gallery
    Inline,
}

// Upper bound on rounds in Transformer::apply; real posts settle in two
const MAX_ROUNDS: usize = 8;

// An ordered sequence of passes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformer {
    passes: Vec<Pass>,
}

impl Transformer {
    pub fn new(passes: Vec<Pass>) -> Self {
        Self { passes }
    }

    pub fn normalize() -> Self {
        Self::new(vec![Pass::RewriteHosts, Pass::EmbedThreeSpeakThumbnails])
    }

    pub fn strip_media() -> Self {
        Self::new(vec![
            Pass::EmbedShortVideoLinks,
            Pass::EmbedWatchVideoLinks,
            Pass::EmbedThreeSpeakWatchLinks,
            Pass::StripImages,
            Pass::StripEmbedTags,
            Pass::StripFullscreenLeftovers,
        ])
    }

    pub fn gallery() -> Self {
        Self::normalize().then(Self::strip_media())
    }

    pub fn inline() -> Self {
        Self::new(vec![
            Pass::RewriteHosts,
            Pass::EmbedShortVideoLinks,
            Pass::EmbedWatchVideoLinks,
            Pass::EmbedThreeSpeakThumbnails,
            Pass::EmbedThreeSpeakWatchLinks,
            Pass::AutoEmbedZora,
        ])
    }

    pub fn preset(preset: Preset) -> Self {
        match preset {
            Preset::Gallery => Self::gallery(),
            Preset::Inline => Self::inline(),
        }
    }

    // Appends the passes of `next` after ours
    pub fn then(mut self, next: Transformer) -> Self {
        self.passes.extend(next.passes);
        self
    }

    pub fn passes(&self) -> &[Pass] {
        &self.passes
    }

    // Runs the passes in order, then again, until a full round changes
    // nothing
    //
    // One round is not always enough: stripping a tag can glue its
    // neighbours into new markup, e.g. "!<iframe ...>[x](u)" becomes
    // "![x](u)", which only the next round's StripImages removes.
    pub fn apply(&self, text: &str, hosts: &HostRewrite) -> String {
        let mut current = self.apply_once(text, hosts);

        for round in 1..MAX_ROUNDS {
            let next = self.apply_once(&current, hosts);
            if next == current {
                return current;
            }
            tracing::trace!(round, "text changed again, running another round");
            current = next;
        }

        tracing::warn!(rounds = MAX_ROUNDS, "transform did not settle, returning last round");
        current
    }

    // One round: every pass once, in order
    fn apply_once(&self, text: &str, hosts: &HostRewrite) -> String {
        self.passes.iter().fold(text.to_string(), |current, pass| {
            let next = pass.apply(&current, hosts);
            if next != current {
                tracing::trace!(?pass, before = current.len(), after = next.len(), "pass rewrote text");
            }
            next
        })
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why is Pass a Copy enum and not a Box<dyn Fn>?
//    - The set of passes is closed, so a match is all we need
//    - Copy lets `apply(self, ..)` take the pass by value, no clones needed
//
// 2. What does `fold` do in Transformer::apply_once?
//    - It threads the text through every pass in order
//    - Each pass gets the previous pass's output as its input
// -----------------------------------------------------------------------------
