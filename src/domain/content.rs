// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! HTML-content cleaning shared by ticket descriptions and followups.
//!
//! GLPI stores rich-text fields as HTML, often with the angle brackets
//! escaped a second time on the way out of the API. Rendering in a
//! terminal only wants the text, so this strips markup down to plain
//! paragraphs. Pure text transformation, no state.

use once_cell::sync::Lazy;
use regex::Regex;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

/// Strip HTML markup and unescape entities, preserving paragraph breaks.
///
/// Idempotent: content that is already plain text comes back unchanged.
pub fn clean_content(raw: &str) -> String {
    // Undo the API's double-escaping so real tags become strippable.
    let mut text = raw
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");

    for br in ["<br>", "<br/>", "<br />"] {
        text = text.replace(br, "\n");
    }
    text = text.replace("</p>", "\n\n");

    let text = TAG_RE.replace_all(&text, "");
    let text = unescape_entities(&text);
    text.trim().to_string()
}

fn unescape_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_tags() {
        assert_eq!(clean_content("<p>Hello <b>world</b></p>"), "Hello world");
    }

    #[test]
    fn test_double_escaped_markup() {
        assert_eq!(
            clean_content("&lt;p&gt;Printer on fire&lt;/p&gt;"),
            "Printer on fire"
        );
    }

    #[test]
    fn test_line_breaks_preserved() {
        assert_eq!(clean_content("line one<br>line two"), "line one\nline two");
        assert_eq!(clean_content("line one<br />line two"), "line one\nline two");
    }

    #[test]
    fn test_paragraph_breaks() {
        assert_eq!(
            clean_content("<p>first</p><p>second</p>"),
            "first\n\nsecond"
        );
    }

    #[test]
    fn test_entities() {
        assert_eq!(clean_content("Tom &amp; Jerry&nbsp;&quot;rerun&quot;"), "Tom & Jerry \"rerun\"");
    }

    #[test]
    fn test_idempotent_on_clean_text() {
        let inputs = [
            "already plain text",
            "a < b with the bracket never closed",
            "multi\nline\n\nparagraphs",
            "<p>Needs one pass &amp; keeps meaning</p>",
        ];
        for input in inputs {
            let once = clean_content(input);
            assert_eq!(clean_content(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(clean_content("  <p>padded</p>  "), "padded");
    }
}
