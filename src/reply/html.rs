//! Plain-text reply body → HTML.
//!
//! Escapes everything, turns newlines into `<br>`, and bolds the detail lines
//! that start with one of the template marker glyphs. Cosmetic only.

/// Line prefixes the built-in templates use for detail lines and bullets.
pub const MARKER_GLYPHS: &[&str] = &["📍", "🏁", "📦", "⚖️", "💰", "🚛", "⚠️", "•"];

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn is_marked(line: &str) -> bool {
    let trimmed = line.trim_start();
    MARKER_GLYPHS.iter().any(|g| trimmed.starts_with(g))
}

/// Render a plain-text body as an HTML fragment.
pub fn body_to_html(body: &str) -> String {
    let lines: Vec<String> = body
        .lines()
        .map(|line| {
            let escaped = escape_html(line);
            if is_marked(line) {
                format!("<strong>{}</strong>", escaped)
            } else {
                escaped
            }
        })
        .collect();

    format!(
        "<div style=\"font-family: Arial, sans-serif; font-size: 14px;\">{}</div>",
        lines.join("<br>\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"A&B's"</b>"#),
            "&lt;b&gt;&quot;A&amp;B&#39;s&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_newlines_become_breaks() {
        let html = body_to_html("Hello,\n\nThanks");
        assert!(html.contains("Hello,<br>\n<br>\nThanks"));
    }

    #[test]
    fn test_marker_lines_are_bold() {
        let html = body_to_html("Details:\n📍 Pickup: Chicago, IL\n• DAT reference");
        assert!(html.contains("<strong>📍 Pickup: Chicago, IL</strong>"));
        assert!(html.contains("<strong>• DAT reference</strong>"));
        assert!(!html.contains("<strong>Details:</strong>"));
    }

    #[test]
    fn test_user_markup_is_escaped() {
        let html = body_to_html("📍 Pickup: <script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
