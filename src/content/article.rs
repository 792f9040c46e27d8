//! Article model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::FrontMatter;
use crate::helpers;

/// A blog article loaded from `<slug>.<ext>`
///
/// Metadata fields mirror the front-matter header. Fields missing from the
/// header stay `None` (or empty for `tags`); no validation happens on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// File name without extension
    pub slug: String,

    pub title: Option<String>,

    pub description: Option<String>,

    /// Raw date text, also the sort key
    pub date: Option<String>,

    pub author: Option<String>,

    pub category: Option<String>,

    pub tags: Vec<String>,

    /// Cover image path or URL
    pub image: Option<String>,

    /// Raw body following the front-matter block
    pub content: String,
}

impl Article {
    /// Build an article from its slug, parsed header and body
    pub fn from_parts(slug: impl Into<String>, fm: FrontMatter, body: &str) -> Self {
        Self {
            slug: slug.into(),
            title: fm.title,
            description: fm.description,
            date: fm.date,
            author: fm.author,
            category: fm.category,
            tags: fm.tags,
            image: fm.image,
            content: body.to_string(),
        }
    }

    /// Title for display, falling back to the slug
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.slug)
    }

    /// Publication date parsed for display
    pub fn published_on(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(helpers::parse_date)
    }

    /// Whether the article carries `tag` (case-insensitive)
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Whether the article is filed under `category` (case-insensitive)
    pub fn in_category(&self, category: &str) -> bool {
        self.category
            .as_deref()
            .is_some_and(|c| c.eq_ignore_ascii_case(category))
    }
}

/// Newest-first ordering on the raw date strings.
///
/// Articles without a date sort after every dated article.
pub fn newest_first(a: &Article, b: &Article) -> Ordering {
    match (&a.date, &b.date) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
