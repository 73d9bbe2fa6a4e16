//! HTML insertion points.
//!
//! Two wrappers are supported:
//! - comment: `<!-- message -->` appended at the end of the document
//! - marker: `<div style="display:none;">message</div>` placed before
//!   `</body>`, or appended when the document has no body close tag
//!
//! Neither insertion is idempotent. Inserting twice leaves two wrappers and
//! extraction returns both, joined with a newline in document order.

use tracing::debug;

use super::MarkupError;

const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";

const MARKER_OPEN: &str = r#"<div style="display:none;">"#;
const MARKER_CLOSE: &str = "</div>";

/// Anchor the marker is inserted in front of.
pub const BODY_CLOSE: &str = "</body>";

/// Returns every `open ... close` span (exclusive of delimiters), in order.
///
/// Spans do not nest and may cross lines.
fn spans<'a>(document: &'a str, open: &str, close: &str) -> Vec<&'a str> {
    let mut found = Vec::new();
    let mut rest = document;

    while let Some(start) = rest.find(open) {
        let after_open = &rest[start + open.len()..];
        let Some(end) = after_open.find(close) else {
            break;
        };
        found.push(&after_open[..end]);
        rest = &after_open[end + close.len()..];
    }

    found
}

/// Appends a comment wrapper holding `message`.
pub fn insert_via_comment(document: &str, message: &str) -> String {
    format!("{}\n{} {} {}", document, COMMENT_OPEN, message, COMMENT_CLOSE)
}

/// Collects every comment in the document, each trimmed.
///
/// Any HTML comment counts, including ones the author wrote.
pub fn extract_via_comment(document: &str) -> Result<String, MarkupError> {
    let comments = spans(document, COMMENT_OPEN, COMMENT_CLOSE);
    debug!(count = comments.len(), "comment spans found");
    if comments.is_empty() {
        return Err(MarkupError::NotFound { technique: "comment" });
    }

    Ok(comments
        .iter()
        .map(|c| c.trim())
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Wraps `message` in a hidden marker element.
///
/// Every `</body>` in the document gets the marker in front of it; without
/// one the marker goes on a new line at the end.
pub fn insert_via_marker(document: &str, message: &str) -> String {
    let marker = format!("{}{}{}", MARKER_OPEN, message, MARKER_CLOSE);
    if document.contains(BODY_CLOSE) {
        document.replace(BODY_CLOSE, &format!("{}\n{}", marker, BODY_CLOSE))
    } else {
        format!("{}\n{}", document, marker)
    }
}

/// Collects the contents of every hidden marker, untrimmed.
pub fn extract_via_marker(document: &str) -> Result<String, MarkupError> {
    let markers = spans(document, MARKER_OPEN, MARKER_CLOSE);
    debug!(count = markers.len(), "marker spans found");
    if markers.is_empty() {
        return Err(MarkupError::NotFound { technique: "marker" });
    }

    Ok(markers.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAGE: &str = "<html>\n<body>\n<p>Hello</p>\n</body>\n</html>";

    #[test]
    fn test_comment_roundtrip() {
        let stego = insert_via_comment(PAGE, "meet at noon");
        assert!(stego.starts_with(PAGE));
        assert!(stego.ends_with("\n<!-- meet at noon -->"));
        assert_eq!(extract_via_comment(&stego).unwrap(), "meet at noon");
    }

    #[test]
    fn test_comment_twice_keeps_both() {
        let once = insert_via_comment(PAGE, "first");
        let twice = insert_via_comment(&once, "second");
        assert_eq!(twice.matches("<!--").count(), 2);
        assert_eq!(extract_via_comment(&twice).unwrap(), "first\nsecond");
    }

    #[test]
    fn test_comment_spans_lines() {
        let doc = "<p>x</p><!--\n  line one\n  line two\n-->";
        assert_eq!(extract_via_comment(doc).unwrap(), "line one\n  line two");
    }

    #[test]
    fn test_comment_not_found() {
        assert_eq!(
            extract_via_comment(PAGE),
            Err(MarkupError::NotFound { technique: "comment" })
        );
        assert!(extract_via_comment("<!-- unterminated").is_err());
    }

    #[test]
    fn test_marker_before_body_close() {
        let stego = insert_via_marker(PAGE, "hidden");
        assert_eq!(
            stego,
            "<html>\n<body>\n<p>Hello</p>\n<div style=\"display:none;\">hidden</div>\n</body>\n</html>"
        );
        assert_eq!(extract_via_marker(&stego).unwrap(), "hidden");
    }

    #[test]
    fn test_marker_appended_without_body() {
        let stego = insert_via_marker("<p>fragment</p>", "tail");
        assert_eq!(stego, "<p>fragment</p>\n<div style=\"display:none;\">tail</div>");
    }

    #[test]
    fn test_marker_keeps_whitespace() {
        let stego = insert_via_marker(PAGE, "  padded ");
        assert_eq!(extract_via_marker(&stego).unwrap(), "  padded ");
    }

    #[test]
    fn test_marker_twice_in_order() {
        let stego = insert_via_marker(&insert_via_marker(PAGE, "a"), "b");
        assert_eq!(extract_via_marker(&stego).unwrap(), "a\nb");
    }

    #[test]
    fn test_marker_not_found() {
        let stego = insert_via_comment(PAGE, "only a comment");
        assert_eq!(
            extract_via_marker(&stego),
            Err(MarkupError::NotFound { technique: "marker" })
        );
    }
}
