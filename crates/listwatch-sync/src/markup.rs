// SPDX-FileCopyrightText: 2026 Listwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rich-text to simplified-markup conversion.
//!
//! Item bodies arrive as HTML. They are rendered to plain markup with
//! html2text, then any remaining markdown hyperlink syntax is reduced to
//! its visible label. Destination URLs are deliberately discarded because
//! the relay target renders them unreliably.

use std::sync::LazyLock;

use html2text::render::TrivialDecorator;
use listwatch_core::ListwatchError;
use regex::Regex;

/// Render width for html2text. Wide enough that normal paragraphs are not
/// artificially wrapped; the relay truncates at its own display limit.
const RENDER_WIDTH: usize = 4096;

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\([^)]*\)").expect("link pattern is valid"));

/// Convert a rich-text body to simplified markup.
pub fn simplify_body(html: &str) -> Result<String, ListwatchError> {
    let rendered = html2text::config::with_decorator(TrivialDecorator::new())
        .string_from_read(html.as_bytes(), RENDER_WIDTH)
        .map_err(|e| ListwatchError::Api {
            message: format!("failed to render rich-text body: {e}"),
            source: None,
        })?;
    Ok(strip_links(rendered.trim_end()))
}

/// Reduce markdown hyperlinks to their visible label.
pub fn strip_links(markup: &str) -> String {
    LINK_RE.replace_all(markup, "$1").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_links_keeps_only_labels() {
        assert_eq!(strip_links("see [label](http://x)"), "see label");
    }

    #[test]
    fn strip_links_handles_multiple_links() {
        assert_eq!(
            strip_links("[a](http://1) and [b](http://2)."),
            "a and b."
        );
    }

    #[test]
    fn strip_links_leaves_plain_text_alone() {
        assert_eq!(strip_links("no links [here]"), "no links [here]");
    }

    #[test]
    fn simplify_renders_paragraphs_as_text() {
        let body = "<p>Canteen closed on <b>Friday</b>.</p>";
        let text = simplify_body(body).unwrap();
        assert!(text.contains("Canteen closed on Friday."), "got: {text}");
    }

    #[test]
    fn simplify_discards_anchor_destinations() {
        let body = r#"<p>Details on <a href="https://intranet.example/page">the page</a>.</p>"#;
        let text = simplify_body(body).unwrap();
        assert!(text.contains("the page"), "got: {text}");
        assert!(!text.contains("intranet.example"), "got: {text}");
    }

    #[test]
    fn simplify_trims_trailing_whitespace() {
        let text = simplify_body("<p>line</p>").unwrap();
        assert_eq!(text, "line");
    }

    #[test]
    fn simplify_of_empty_body_is_empty() {
        assert_eq!(simplify_body("").unwrap(), "");
    }
}
