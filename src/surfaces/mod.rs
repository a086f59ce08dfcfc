// src/surfaces/mod.rs
// =============================================================================
// The pure parts of the two render surfaces.
//
// Submodules:
// - inline: renders cleaned text, lists the media elements in the result
// - gallery: the carousel's animated-first presentation order
// - anchors: post/profile link classification and @mentions in prose
// - consistency: checks that inline prose and gallery never show the same
//   media twice
//
// Drawing, styling and navigation state belong to the actual renderers.
// =============================================================================

mod anchors;
mod consistency;
mod gallery;
mod inline;

pub use anchors::{classify_href, prose_links, split_mentions, AnchorTarget, ProseLinks, TextSegment};
pub use consistency::{check_consistency, check_post, Inconsistency};
pub use gallery::{is_animated, presentation_order};
pub use inline::{render_inline, rendered_media_sources};
