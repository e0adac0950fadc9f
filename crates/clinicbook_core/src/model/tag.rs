//! Tag value type shared by patients and appointments.
//!
//! # Invariants
//! - Tags are trimmed and lowercased before storage.
//! - A tag is one non-empty alphanumeric word.

use super::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// Unordered tag collection. `BTreeSet` keeps rendering stable.
pub type TagSet = BTreeSet<Tag>;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tag(String);

impl Tag {
    pub fn new(value: &str) -> Result<Self, ValidationError> {
        let normalized = value.trim().to_lowercase();
        if normalized.is_empty() || !normalized.chars().all(char::is_alphanumeric) {
            return Err(ValidationError::InvalidTag(value.to_string()));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Tag {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Tag> for String {
    fn from(value: Tag) -> Self {
        value.0
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.0)
    }
}

/// Builds a tag set from raw values, failing on the first invalid one.
pub fn parse_tags<'a>(values: impl IntoIterator<Item = &'a str>) -> Result<TagSet, ValidationError> {
    values.into_iter().map(Tag::new).collect()
}

/// Renders tags as `[a][b]`, or an empty string for no tags.
pub fn format_tags(tags: &TagSet) -> String {
    tags.iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::{format_tags, parse_tags, Tag};
    use crate::model::ValidationError;

    #[test]
    fn tag_is_trimmed_and_lowercased() {
        assert_eq!(Tag::new("  Urgent ").unwrap().as_str(), "urgent");
    }

    #[test]
    fn tag_rejects_blank_and_multi_word_values() {
        assert_eq!(
            Tag::new("   ").unwrap_err(),
            ValidationError::InvalidTag("   ".to_string())
        );
        assert!(Tag::new("follow up").is_err());
        assert!(Tag::new("x-ray").is_err());
    }

    #[test]
    fn parse_tags_deduplicates_case_variants() {
        let tags = parse_tags(["Diabetic", "diabetic", "elderly"]).unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(format_tags(&tags), "[diabetic][elderly]");
    }

    #[test]
    fn deserialize_validates_tag_values() {
        let ok: Vec<Tag> = serde_json::from_str(r#"["Asthma"]"#).unwrap();
        assert_eq!(ok[0].as_str(), "asthma");
        assert!(serde_json::from_str::<Vec<Tag>>(r#"["two words"]"#).is_err());
    }
}
