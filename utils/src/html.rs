use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TAG: Regex = Regex::new("<[^>]*>?").unwrap();
}

/// Strips `<...>` tag sequences from a string, including an unclosed
/// trailing tag.
pub fn strip_tags(text: &str) -> String {
    TAG.replace_all(text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::strip_tags;

    #[test]
    fn strips_simple_tags() {
        assert_eq!(strip_tags("<b>bold</b> text"), "bold text");
        assert_eq!(strip_tags("no markup"), "no markup");
    }

    #[test]
    fn strips_unclosed_tag() {
        assert_eq!(strip_tags("tail<span class=x"), "tail");
    }

    #[test]
    fn keeps_bare_angle_close() {
        assert_eq!(strip_tags("a > b"), "a > b");
    }
}
