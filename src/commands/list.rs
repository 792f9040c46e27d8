//! List site information

use anyhow::Result;

use crate::content::Article;
use crate::Site;

/// Run the list command
pub fn run(site: &Site, content_type: &str) -> Result<()> {
    let loader = site.loader();

    match content_type {
        "article" | "articles" | "post" | "posts" => {
            let articles = loader.list_all_articles()?;
            println!("Articles ({}):", articles.len());
            for article in &articles {
                println!("  {}", article_line(article));
            }
        }
        "featured" => {
            let articles = loader.get_featured_articles()?;
            println!("Featured ({}):", articles.len());
            for article in &articles {
                println!("  {}", article_line(article));
            }
        }
        "tag" | "tags" => {
            let tags = loader.tag_counts()?;
            println!("Tags ({}):", tags.len());
            for (tag, count) in tags {
                println!("  {} ({})", tag, count);
            }
        }
        "category" | "categories" => {
            let categories = loader.category_counts()?;
            println!("Categories ({}):", categories.len());
            for (cat, count) in categories {
                println!("  {} ({})", cat, count);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: articles, featured, tags, categories",
                content_type
            );
        }
    }

    Ok(())
}

/// One listing line: date, title and slug
fn article_line(article: &Article) -> String {
    format!(
        "{} - {} [{}]",
        article.date.as_deref().unwrap_or("----------"),
        article.display_title(),
        article.slug
    )
}
