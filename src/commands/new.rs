//! Create a new article

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::content::loader::validate_slug;
use crate::content::FrontMatter;
use crate::Site;

/// Front-matter values for a new article
#[derive(Debug, Default, Clone)]
pub struct NewArticle {
    pub title: String,
    /// Defaults to the slugified title
    pub slug: Option<String>,
    pub description: Option<String>,
    /// Defaults to the site author
    pub author: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub image: Option<String>,
}

/// Write `<slug>.<ext>` with a front-matter scaffold dated today
pub fn create_article(site: &Site, article: &NewArticle) -> Result<PathBuf> {
    let slug = article
        .slug
        .clone()
        .unwrap_or_else(|| slug::slugify(&article.title));
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a slug from title {:?}", article.title);
    }
    validate_slug(&slug)?;

    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    let author = article
        .author
        .clone()
        .unwrap_or_else(|| site.config.author.clone());

    let fm = FrontMatter {
        title: Some(article.title.clone()),
        description: Some(article.description.clone().unwrap_or_default()),
        date: Some(today),
        author: Some(author),
        category: Some(article.category.clone().unwrap_or_default()),
        tags: article.tags.clone(),
        image: Some(article.image.clone().unwrap_or_default()),
        ..Default::default()
    };

    let file_path = site.loader().article_path(&slug);
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    fs::create_dir_all(&site.content_dir)?;

    let header = serde_yaml::to_string(&fm)?;
    let content = format!("---\n{}---\n\nWrite your article here.\n", header);
    fs::write(&file_path, content)?;

    println!("Created: {:?}", file_path);

    Ok(file_path)
}

/// Run the new command with only a title
pub fn run(site: &Site, title: &str) -> Result<PathBuf> {
    let article = NewArticle {
        title: title.to_string(),
        ..Default::default()
    };
    create_article(site, &article)
}
