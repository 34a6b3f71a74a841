//! CSS selectors for the server-rendered markup.

use notes_ui_core::Query;

/// Marker class of a note card.
pub const NOTE_CARD_CLASS: &str = "note-card";

/// Selector matching the elements a `Query` describes.
pub fn selector_for(query: Query<'_>) -> String {
    match query {
        Query::FragmentLinks => r##"a[href^="#"]"##.to_string(),
        Query::Forms => "form".to_string(),
        Query::SubmitButtons => r#"button[type="submit"]"#.to_string(),
        Query::NoteCards => format!(".{NOTE_CARD_CLASS}"),
        Query::TitleField => r#"input[name="title"]"#.to_string(),
        Query::ContentField => r#"textarea[name="content"]"#.to_string(),
        Query::LinkHrefContains(text) => format!(r#"a[href*="{}"]"#, escape_css_string(text)),
        Query::LinkHrefEquals(text) => format!(r#"a[href="{}"]"#, escape_css_string(text)),
    }
}

/// Escape text for use inside a double-quoted CSS string.
fn escape_css_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\a "),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_selectors() {
        assert_eq!(selector_for(Query::FragmentLinks), r##"a[href^="#"]"##);
        assert_eq!(selector_for(Query::NoteCards), ".note-card");
        assert_eq!(selector_for(Query::TitleField), r#"input[name="title"]"#);
        assert_eq!(selector_for(Query::ContentField), r#"textarea[name="content"]"#);
        assert_eq!(selector_for(Query::SubmitButtons), r#"button[type="submit"]"#);
    }

    #[test]
    fn test_link_selectors() {
        assert_eq!(selector_for(Query::LinkHrefContains("add")), r#"a[href*="add"]"#);
        assert_eq!(selector_for(Query::LinkHrefEquals("/")), r#"a[href="/"]"#);
    }

    #[test]
    fn test_escapes_quotes() {
        assert_eq!(
            selector_for(Query::LinkHrefEquals(r#"/a"b\c"#)),
            r#"a[href="/a\"b\\c"]"#
        );
    }
}
