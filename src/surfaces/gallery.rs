// src/surfaces/gallery.rs
// =============================================================================
// Presentation order for the carousel surface.
//
// The collector keeps media in content order. The carousel shows animated
// images first, then static images, then players. Order inside each group
// is left as is.
// =============================================================================

use crate::collector::MediaItem;

// True when the URL path ends with the animated-image extension
//
// Query and fragment are ignored, case is ignored:
//   "https://x.io/kick.GIF?token=abc" with ".gif" -> true
pub fn is_animated(url: &str, animated_extension: &str) -> bool {
    if animated_extension.is_empty() {
        return false;
    }

    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.to_ascii_lowercase()
        .ends_with(&animated_extension.to_ascii_lowercase())
}

pub fn presentation_order(items: &[MediaItem], animated_extension: &str) -> Vec<MediaItem> {
    let mut ordered = items.to_vec();
    // sort_by_key is stable
    ordered.sort_by_key(|item| {
        if item.is_video() {
            2
        } else if is_animated(&item.url, animated_extension) {
            0
        } else {
            1
        }
    });
    ordered
}
