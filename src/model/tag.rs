use std::fmt;

use serde::{Deserialize, Serialize};

/// A normalized tag label: always `#`-prefixed, non-empty body, each run of
/// whitespace inside the body collapsed to one space.
///
/// Comparison is exact (case-sensitive) on the normalized text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TagLabel(String);

/// Raised when a string cannot become a label (blank, or a bare `#`)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a tag label: {0:?}")]
pub struct InvalidLabel(pub String);

impl TagLabel {
    /// Normalize raw user input into a label.
    ///
    /// `"  value "` becomes `#value`, `"#7203"` stays `#7203`, `"a\tb"`
    /// becomes `#a b`. Returns `None` when nothing is left after trimming and
    /// stripping the `#`.
    pub fn parse(raw: &str) -> Option<TagLabel> {
        let trimmed = raw.trim();
        let body = trimmed.strip_prefix('#').unwrap_or(trimmed);
        let body = body.split_whitespace().collect::<Vec<_>>().join(" ");
        if body.is_empty() {
            return None;
        }
        Some(TagLabel(format!("#{}", body)))
    }

    /// The full label text, including the leading `#`
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TagLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TagLabel {
    type Error = InvalidLabel;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TagLabel::parse(&value).ok_or(InvalidLabel(value))
    }
}

impl TryFrom<&str> for TagLabel {
    type Error = InvalidLabel;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        TagLabel::parse(value).ok_or_else(|| InvalidLabel(value.to_string()))
    }
}

impl From<TagLabel> for String {
    fn from(label: TagLabel) -> String {
        label.0
    }
}
