use std::sync::LazyLock;

use regex::Regex;

use crate::model::tag::TagLabel;

/// Runs of whitespace or list punctuation between tags
static SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s,;、，]+").unwrap());

/// Extract `#`-prefixed tokens from free text, e.g. `"#7203トヨタ, #高配当 notes"`.
///
/// Tokens are separated by whitespace, commas or semicolons; everything else
/// belongs to the label, so `#high-yield` and `#S&P500` survive intact.
/// Tokens without a leading `#` are ignored. Duplicates are dropped, first
/// occurrence wins.
pub fn parse_tag_string(s: &str) -> Vec<TagLabel> {
    let mut tags: Vec<TagLabel> = Vec::new();
    for token in SEPARATOR_RE.split(s) {
        if !token.starts_with('#') {
            continue;
        }
        if let Some(label) = TagLabel::parse(token)
            && !tags.contains(&label)
        {
            tags.push(label);
        }
    }
    tags
}

/// Parse CLI tag arguments: each argument may be a bare word (`value`), a
/// single tag (`#value`, `#high-yield`), or a string of several tags
/// (`"#a #b"`).
///
/// An argument is split only when it holds two or more `#` tokens; anything
/// else is one label, normalized the same way `add` normalizes it.
pub fn parse_tag_args(args: &[String]) -> Vec<TagLabel> {
    let mut tags: Vec<TagLabel> = Vec::new();
    for arg in args {
        let hash_tokens = SEPARATOR_RE
            .split(arg)
            .filter(|token| token.starts_with('#'))
            .count();
        let found = if hash_tokens > 1 {
            parse_tag_string(arg)
        } else {
            TagLabel::parse(arg).into_iter().collect()
        };
        for label in found {
            if !tags.contains(&label) {
                tags.push(label);
            }
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::selection::SelectionState;
    use pretty_assertions::assert_eq;

    fn names(labels: &[TagLabel]) -> Vec<&str> {
        labels.iter().map(|l| l.as_str()).collect()
    }

    #[test]
    fn test_parse_tag_string_basic() {
        let tags = parse_tag_string("#growth #value");
        assert_eq!(names(&tags), vec!["#growth", "#value"]);
    }

    #[test]
    fn test_parse_tag_string_unicode_and_separators() {
        let tags = parse_tag_string("#7203トヨタ, #高配当;#長期投資、#成長株");
        assert_eq!(
            names(&tags),
            vec!["#7203トヨタ", "#高配当", "#長期投資", "#成長株"]
        );
    }

    #[test]
    fn test_parse_tag_string_keeps_punctuation_inside_labels() {
        let tags = parse_tag_string("#high-yield #S&P500\t#a.b");
        assert_eq!(names(&tags), vec!["#high-yield", "#S&P500", "#a.b"]);
    }

    #[test]
    fn test_parse_tag_string_ignores_plain_words_and_dups() {
        let tags = parse_tag_string("plain # #a text #a #b");
        assert_eq!(names(&tags), vec!["#a", "#b"]);
    }

    #[test]
    fn test_parse_tag_string_empty() {
        assert!(parse_tag_string("").is_empty());
        assert!(parse_tag_string("no tags here").is_empty());
    }

    #[test]
    fn test_parse_tag_args_mixed() {
        let args = vec![
            "value".to_string(),
            "#a #b".to_string(),
            "  ".to_string(),
            "#value".to_string(),
        ];
        assert_eq!(names(&parse_tag_args(&args)), vec!["#value", "#a", "#b"]);
    }

    #[test]
    fn test_parse_tag_args_matches_add_normalization() {
        for raw in ["#high-yield", "#S&P500", " spaced  out ", "#a b"] {
            let mut state = SelectionState::new(Vec::new());
            let added = state.add(raw).unwrap();
            assert_eq!(parse_tag_args(&[raw.to_string()]), vec![added]);
        }
    }
}
