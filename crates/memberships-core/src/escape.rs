//! HTML Escaping
//!
//! Context-aware escaping for the rendered button fragment. Attribute and
//! text positions are escaped independently.

/// Escape a value for an HTML attribute position
pub fn attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape a value for an HTML text position
pub fn text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_escapes_quotes_and_angles() {
        assert_eq!(
            attr(r#"a"b'c<d>e&f"#),
            "a&quot;b&#039;c&lt;d&gt;e&amp;f"
        );
    }

    #[test]
    fn test_text_escapes_angles_and_ampersand() {
        assert_eq!(text("<b>&co</b>"), "&lt;b&gt;&amp;co&lt;/b&gt;");
        assert_eq!(text(r#"plain "quoted""#), r#"plain "quoted""#);
    }
}
