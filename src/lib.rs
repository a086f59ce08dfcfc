// src/lib.rs
// =============================================================================
// embed-lens: finds the media in a social post body and splits the post into
// a media gallery and clean prose.
//
// Modules:
// - scanner: the four link scanners (images, iframes, 3speak, YouTube)
// - transform: text passes and the presets built from them
// - collector: the pipeline that merges scanner output into MediaItems
// - surfaces: pure helpers for the inline and carousel renderers
// - cache: profile picture and processed-content caches
// - config: TOML configuration and its validation
//
// Quick use:
//   let content = embed_lens::collect("![a](https://x.io/1.png) nice line");
//   assert_eq!(content.cleaned_text, " nice line");
// =============================================================================

pub mod cache;
pub mod collector;
pub mod config;
pub mod scanner;
pub mod surfaces;
pub mod transform;

pub use collector::{collect, MediaItem, MediaPipeline, MediaType, TransformedContent};
pub use config::{ConfigError, FallbackPolicy, PipelineConfig};
pub use scanner::{LinkKind, LinkRecord};
pub use transform::{Pass, Preset, Transformer};
