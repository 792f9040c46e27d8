//! Front-matter parsing

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised while splitting or decoding a front-matter block
#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("missing front-matter block (expected a leading `---` fence and a closing `---` line)")]
    MissingHeader,

    #[error("malformed front-matter: {0}")]
    Malformed(#[from] serde_yaml::Error),
}

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value])
        }

        fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Accepts any YAML scalar and keeps its textual form; `null`, lists and
/// mappings become `None`
fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
    use std::fmt;

    struct ScalarString;

    impl<'de> Visitor<'de> for ScalarString {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string, number or boolean")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value))
        }

        fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_seq<S>(self, seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            IgnoredAny.visit_seq(seq)?;
            Ok(None)
        }

        fn visit_map<M>(self, map: M) -> Result<Self::Value, M::Error>
        where
            M: MapAccess<'de>,
        {
            IgnoredAny.visit_map(map)?;
            Ok(None)
        }
    }

    deserializer.deserialize_any(ScalarString)
}

/// Front-matter data from an article
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(deserialize_with = "scalar_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub date: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub author: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub category: Option<String>,
    #[serde(deserialize_with = "string_or_vec")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub image: Option<String>,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, body)
    pub fn parse(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let (header, body) =
            split_header(content.trim_start_matches('\u{feff}').trim_start())
                .ok_or(FrontMatterError::MissingHeader)?;

        if header.trim().is_empty() {
            return Ok((FrontMatter::default(), body));
        }

        let fm = serde_yaml::from_str::<FrontMatter>(header)?;
        Ok((fm, body))
    }
}

/// Split `---` fenced YAML from the body that follows the closing fence line
fn split_header(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix("---")?;
    let newline = rest.find('\n')?;
    if !rest[..newline].trim().is_empty() {
        return None;
    }

    let header_start = newline + 1;
    let mut offset = header_start;
    for line in rest[header_start..].split_inclusive('\n') {
        if line.trim_end() == "---" {
            let header = &rest[header_start..offset];
            let body = &rest[offset + line.len()..];
            return Some((header, body));
        }
        offset += line.len();
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: The Art of Creating Sticky Headers
description: Learn how to implement effective sticky headers.
date: 2023-08-15
author: John Doe
category: Web Development
tags:
  - css
  - ux
image: /images/sticky.png
---

This is the content.
"#;

        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("The Art of Creating Sticky Headers"));
        assert_eq!(fm.date.as_deref(), Some("2023-08-15"));
        assert_eq!(fm.author.as_deref(), Some("John Doe"));
        assert_eq!(fm.category.as_deref(), Some("Web Development"));
        assert_eq!(fm.tags, vec!["css", "ux"]);
        assert_eq!(fm.image.as_deref(), Some("/images/sticky.png"));
        assert_eq!(body, "\nThis is the content.\n");
    }

    #[test]
    fn test_parse_single_string_tags() {
        let content = "---\ntitle: Single Tag\ntags: Notes\n---\nBody";

        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.tags, vec!["Notes"]);
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_missing_fields_are_absent() {
        let content = "---\ntitle: Only a title\n---\n";

        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Only a title"));
        assert_eq!(fm.date, None);
        assert_eq!(fm.author, None);
        assert!(fm.tags.is_empty());
        assert_eq!(body, "");
    }

    #[test]
    fn test_scalar_fields_keep_text() {
        let content = "---\ntitle: 1984\ndate: 2023\ndescription: true\nauthor: ~\n---\n";

        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("1984"));
        assert_eq!(fm.date.as_deref(), Some("2023"));
        assert_eq!(fm.description.as_deref(), Some("true"));
        assert_eq!(fm.author, None);
    }

    #[test]
    fn test_scalar_tags() {
        let (fm, _) = FrontMatter::parse("---\ntags: 2023\n---\n").unwrap();
        assert_eq!(fm.tags, vec!["2023"]);

        let (fm, _) = FrontMatter::parse("---\ntags: [2023, css]\n---\n").unwrap();
        assert_eq!(fm.tags, vec!["2023", "css"]);
    }

    #[test]
    fn test_nested_values_in_text_fields_are_absent() {
        let content = "---\ntitle: Kept\nauthor:\n  name: Jane\n  url: /jane\ncategory: [a, b]\n---\nBody";

        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Kept"));
        assert_eq!(fm.author, None);
        assert_eq!(fm.category, None);
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_leading_byte_order_mark() {
        let (fm, body) = FrontMatter::parse("\u{feff}---\ntitle: B\n---\nbody").unwrap();
        assert_eq!(fm.title.as_deref(), Some("B"));
        assert_eq!(body, "body");
    }

    #[test]
    fn test_unknown_keys_go_to_extra() {
        let content = "---\ntitle: T\nreading_time: 5\n---\n";

        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert!(fm.extra.contains_key("reading_time"));
    }

    #[test]
    fn test_empty_header_is_valid() {
        let (fm, body) = FrontMatter::parse("---\n---\nJust a body").unwrap();
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, "Just a body");
    }

    #[test]
    fn test_crlf_line_endings() {
        let content = "---\r\ntitle: Windows\r\n---\r\nBody\r\n";

        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Windows"));
        assert_eq!(body, "Body\r\n");
    }

    #[test]
    fn test_no_header_is_missing() {
        let err = FrontMatter::parse("# Just markdown\n\nNo header here.").unwrap_err();
        assert!(matches!(err, FrontMatterError::MissingHeader));
    }

    #[test]
    fn test_unclosed_header_is_missing() {
        let err = FrontMatter::parse("---\ntitle: Never closed\n\nBody").unwrap_err();
        assert!(matches!(err, FrontMatterError::MissingHeader));
    }

    #[test]
    fn test_invalid_yaml_is_malformed() {
        let err = FrontMatter::parse("---\ntitle: [unclosed\n---\nBody").unwrap_err();
        assert!(matches!(err, FrontMatterError::Malformed(_)));
    }

    #[test]
    fn test_prose_between_fences_is_malformed() {
        let content = r#"---
Check out https://example.com/path and http://test.com
---
More content.
"#;

        let err = FrontMatter::parse(content).unwrap_err();
        assert!(matches!(err, FrontMatterError::Malformed(_)));
    }

    #[test]
    fn test_body_keeps_later_separators() {
        let content = "---\ntitle: Rules\n---\nabove\n\n---\n\nbelow\n";

        let (_, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(body, "above\n\n---\n\nbelow\n");
    }
}
