// src/surfaces/inline.rs
// =============================================================================
// The inline prose surface.
//
// We use `pulldown-cmark` to render cleaned text the way a CommonMark
// renderer with GitHub extensions would, raw HTML passed through, and
// `scraper` to read back which media elements the result contains.
// =============================================================================

use std::sync::LazyLock;

use pulldown_cmark::{html, Options, Parser};
use scraper::{Html, Selector};

static MEDIA_ELEMENTS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("img[src], iframe[src], video[src], source[src]")
        .expect("media selector is valid")
});

// Renders Markdown (with raw HTML) to HTML
pub fn render_inline(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let parser = Parser::new_ext(markdown, options);

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

// Lists the src of every media element in rendered HTML, in document order
pub fn rendered_media_sources(rendered: &str) -> Vec<String> {
    let fragment = Html::parse_fragment(rendered);
    fragment
        .select(&MEDIA_ELEMENTS)
        .filter_map(|element| element.value().attr("src"))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_paragraph() {
        assert_eq!(render_inline("hello *world*"), "<p>hello <em>world</em></p>\n");
    }

    #[test]
    fn test_render_table_extension() {
        let html = render_inline("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
    }

    #[test]
    fn test_image_is_rendered_as_media() {
        let html = render_inline("![a](https://x.io/1.png)");
        assert_eq!(rendered_media_sources(&html), vec!["https://x.io/1.png"]);
    }

    #[test]
    fn test_raw_iframe_passes_through() {
        let html = render_inline("<iframe src=\"https://y.io/2\"></iframe>");
        assert_eq!(rendered_media_sources(&html), vec!["https://y.io/2"]);
    }

    #[test]
    fn test_escaped_query_is_decoded() {
        let html = render_inline("![a](https://x.io/1.png?a=1&b=2)");
        assert_eq!(rendered_media_sources(&html), vec!["https://x.io/1.png?a=1&b=2"]);
    }

    #[test]
    fn test_plain_link_is_not_media() {
        let html = render_inline("[clip](https://y.io/2)");
        assert!(rendered_media_sources(&html).is_empty());
    }
}
