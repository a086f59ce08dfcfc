//! Property-based tests for the media pipeline invariants
//!
//! Post bodies are generated from fragments a real post is made of: prose,
//! Markdown images, embed tags, share links and legacy-host URLs.

use super::*;
use crate::surfaces::{check_consistency, check_post};
use proptest::prelude::*;

const LOGO: &str = "https://www.skatehive.app/assets/skatehive.jpeg";

fn host_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("x.io"),
        Just("cdn.example.org"),
        Just("ipfs.skatehive.app"),
        Just("gateway.pinata.cloud"),
    ]
}

fn prose_strategy() -> impl Strategy<Value = String> {
    "[a-z ]{0,16}".prop_map(|s| s.to_string())
}

fn image_strategy() -> impl Strategy<Value = String> {
    (
        "[a-z]{0,5}",
        host_strategy(),
        "[a-z0-9]{1,6}",
        prop_oneof![Just("png"), Just("gif"), Just("jpg")],
    )
        .prop_map(|(alt, host, path, ext)| format!("![{}](https://{}/{}.{})", alt, host, path, ext))
}

fn iframe_strategy() -> impl Strategy<Value = String> {
    (host_strategy(), "[a-z0-9]{1,6}").prop_map(|(host, path)| {
        format!("<iframe src=\"https://{}/ipfs/{}\" allowfullscreen></iframe>", host, path)
    })
}

fn video_id_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_]{11}".prop_map(|s| s.to_string())
}

fn share_link_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        video_id_strategy().prop_map(|id| format!("https://youtu.be/{}", id)),
        video_id_strategy().prop_map(|id| format!("https://www.youtube.com/watch?v={}", id)),
        video_id_strategy().prop_map(|id| {
            format!("<iframe src=\"https://www.youtube.com/embed/{}\"></iframe>", id)
        }),
        ("[a-z]{1,6}", "[a-z0-9]{1,6}")
            .prop_map(|(owner, permlink)| format!("https://3speak.tv/watch?v={}/{}", owner, permlink)),
    ]
}

// An opening embed tag squeezed between "!" and link syntax: stripping the
// tag turns the rest into a new Markdown image
fn glued_strategy() -> impl Strategy<Value = String> {
    (host_strategy(), "[a-z0-9]{1,6}").prop_map(|(host, path)| {
        format!("!<iframe src=\"https://{}/ipfs/{}\">[x](https://{}/{}.png)", host, path, host, path)
    })
}

fn fragment_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => prose_strategy(),
        2 => image_strategy(),
        2 => iframe_strategy(),
        2 => share_link_strategy(),
        1 => glued_strategy(),
        1 => Just(format!("![logo]({})", LOGO)),
    ]
}

fn body_strategy() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(fragment_strategy(), 0..10),
        prop_oneof![Just(" "), Just("\n"), Just("\n\n")],
    )
        .prop_map(|(fragments, separator)| fragments.join(separator))
}

fn hosts() -> HostRewrite {
    PipelineConfig::default().host_rewrite()
}

proptest! {
    #[test]
    fn prop_gallery_transform_idempotent(body in body_strategy()) {
        let gallery = Transformer::gallery();
        let once = gallery.apply(&body, &hosts());
        let twice = gallery.apply(&once, &hosts());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_inline_transform_idempotent(body in body_strategy()) {
        let inline = Transformer::inline();
        let once = inline.apply(&body, &hosts());
        let twice = inline.apply(&once, &hosts());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_no_duplicate_urls(body in body_strategy()) {
        let content = collect(&body);
        let mut seen = HashSet::new();
        for item in &content.media_items {
            prop_assert!(seen.insert(item.url.clone()), "duplicate url {}", item.url);
        }
    }

    #[test]
    fn prop_excluded_assets_never_surface(body in body_strategy()) {
        let body = format!("{} ![logo]({})", body, LOGO);
        let content = collect(&body);
        prop_assert!(content.media_items.iter().all(|item| item.url != LOGO));
    }

    #[test]
    fn prop_media_list_never_empty(body in body_strategy()) {
        prop_assert!(!collect(&body).media_items.is_empty());
    }

    #[test]
    fn prop_no_legacy_host_anywhere(body in body_strategy()) {
        let content = collect(&body);
        prop_assert!(!content.cleaned_text.contains("ipfs.skatehive.app"));
        for item in &content.media_items {
            prop_assert!(!item.url.contains("ipfs.skatehive.app"));
        }
    }

    #[test]
    fn prop_cleaned_text_never_repeats_media(body in body_strategy()) {
        let content = collect(&body);
        for item in &content.media_items {
            prop_assert!(
                !content.cleaned_text.contains(item.url.as_str()),
                "{} left in {:?}", item.url, content.cleaned_text
            );
        }
        prop_assert!(check_consistency(&content).is_empty());
    }

    #[test]
    fn prop_scanner_matches_never_survive_stripping(body in body_strategy()) {
        let pipeline = MediaPipeline::default();
        let normalized = pipeline.normalize(&body);
        let content = pipeline.process(&body);

        for record in scan_all(&normalized, &pipeline.config().category_order) {
            prop_assert!(
                !content.cleaned_text.contains(record.source.as_str()),
                "{:?} left in {:?}", record.source, content.cleaned_text
            );
        }
        prop_assert!(check_post(&body, &pipeline, &content).is_empty());
    }

    #[test]
    fn prop_placeholder_only_when_nothing_found(body in prose_strategy()) {
        let pipeline = MediaPipeline::default();
        let content = pipeline.process(&body);
        prop_assert_eq!(content.media_items, vec![pipeline.fallback().clone()]);
        prop_assert_eq!(content.cleaned_text, body);
    }
}
