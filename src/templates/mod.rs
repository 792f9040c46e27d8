//! Built-in site templates using the Tera template engine
//!
//! Templates are embedded in the binary; HTML autoescaping stays on for
//! article metadata and only the rendered article body is marked safe.

use anyhow::Result;
use chrono::Datelike;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::Article;
use crate::helpers;

/// Stylesheet served at `/style.css`
pub const STYLESHEET: &str = include_str!("site/style.css");

/// Template renderer with the embedded site templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("card.html", include_str!("site/card.html")),
            ("index.html", include_str!("site/index.html")),
            ("articles.html", include_str!("site/articles.html")),
            ("article.html", include_str!("site/article.html")),
            ("not_found.html", include_str!("site/not_found.html")),
        ])?;

        tera.register_filter("truncate_chars", truncate_chars_filter);
        tera.register_filter("date_format", date_format_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }

    /// Landing page with the featured articles
    pub fn render_index(&self, config: &SiteConfig, featured: &[Article]) -> Result<String> {
        let mut context = base_context(config);
        context.insert("articles", &article_list(config, featured));
        self.render("index.html", &context)
    }

    /// Listing of all articles
    pub fn render_articles(&self, config: &SiteConfig, articles: &[Article]) -> Result<String> {
        let mut context = base_context(config);
        context.insert("heading", "All Articles");
        context.insert("articles", &article_list(config, articles));
        self.render("articles.html", &context)
    }

    /// Listing of the articles carrying one tag
    pub fn render_tag(&self, config: &SiteConfig, tag: &str, articles: &[Article]) -> Result<String> {
        let mut context = base_context(config);
        context.insert("heading", &format!("Tagged \u{201c}{}\u{201d}", tag));
        context.insert("articles", &article_list(config, articles));
        self.render("articles.html", &context)
    }

    /// Article detail page; `content_html` is the rendered body
    pub fn render_article(
        &self,
        config: &SiteConfig,
        article: &Article,
        content_html: &str,
    ) -> Result<String> {
        let mut context = base_context(config);
        context.insert("article", &ArticleData::new(config, article));
        context.insert("content", content_html);
        self.render("article.html", &context)
    }

    /// Generic not-found page
    pub fn render_not_found(&self, config: &SiteConfig, message: &str) -> Result<String> {
        let mut context = base_context(config);
        context.insert("message", message);
        self.render("not_found.html", &context)
    }
}

fn base_context(config: &SiteConfig) -> Context {
    let mut context = Context::new();
    context.insert("site", &SiteData::from(config));
    context.insert("year", &chrono::Local::now().year());
    context
}

fn article_list(config: &SiteConfig, articles: &[Article]) -> Vec<ArticleData> {
    articles
        .iter()
        .map(|a| ArticleData::new(config, a))
        .collect()
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };
    let omission = match args.get("omission") {
        Some(val) => tera::try_get_value!("truncate_chars", "omission", String, val),
        None => "...".to_string(),
    };

    if s.chars().count() <= length {
        Ok(tera::Value::String(s))
    } else {
        let truncated: String = s.chars().take(length).collect();
        Ok(tera::Value::String(format!(
            "{}{}",
            truncated.trim_end(),
            omission
        )))
    }
}

/// Tera filter: format a raw article date, `LL` by default
fn date_format_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("date_format", "value", String, value);
    let format = match args.get("format") {
        Some(val) => tera::try_get_value!("date_format", "format", String, val),
        None => "LL".to_string(),
    };

    Ok(tera::Value::String(helpers::display_date(&s, &format)))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub language: String,
    /// Always ends with `/`
    pub root: String,
    pub date_format: String,
}

impl From<&SiteConfig> for SiteData {
    fn from(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            subtitle: config.subtitle.clone(),
            description: config.description.clone(),
            language: config.language.clone(),
            root: helpers::url_for(config, ""),
            date_format: config.date_format.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ArticleData {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub date: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<TagLink>,
    pub image: Option<String>,
    pub path: String,
}

impl ArticleData {
    pub fn new(config: &SiteConfig, article: &Article) -> Self {
        Self {
            slug: article.slug.clone(),
            title: article.display_title().to_string(),
            description: article.description.clone(),
            date: article.date.clone(),
            author: article.author.clone(),
            category: article.category.clone(),
            tags: article
                .tags
                .iter()
                .map(|name| TagLink {
                    name: name.clone(),
                    path: helpers::tag_path(config, name),
                })
                .collect(),
            image: article.image.clone().filter(|i| !i.is_empty()),
            path: helpers::article_path(config, &article.slug),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TagLink {
    pub name: String,
    pub path: String,
}
