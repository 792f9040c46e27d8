//! Show a single article

use anyhow::Result;

use crate::content::Article;
use crate::Site;

/// Print an article's metadata and raw body
pub fn run(site: &Site, slug: &str) -> Result<()> {
    let Some(article) = site.loader().get_article_by_slug(slug) else {
        anyhow::bail!("Article not found: {}", slug);
    };

    print!("{}", describe(&article));
    Ok(())
}

fn describe(article: &Article) -> String {
    let field = |value: &Option<String>| value.clone().unwrap_or_default();

    let mut out = String::new();
    out.push_str(&format!("title:       {}\n", field(&article.title)));
    out.push_str(&format!("slug:        {}\n", article.slug));
    out.push_str(&format!("date:        {}\n", field(&article.date)));
    out.push_str(&format!("author:      {}\n", field(&article.author)));
    out.push_str(&format!("category:    {}\n", field(&article.category)));
    out.push_str(&format!("tags:        {}\n", article.tags.join(", ")));
    out.push_str(&format!("image:       {}\n", field(&article.image)));
    out.push_str(&format!("description: {}\n", field(&article.description)));
    out.push('\n');
    out.push_str(&article.content);
    if !article.content.ends_with('\n') {
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_describe() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();
        fs::create_dir_all(&site.content_dir).unwrap();
        fs::write(
            site.content_dir.join("s.mdx"),
            "---\ntitle: T\nauthor: A\ntags: [x, y]\n---\nBody",
        )
        .unwrap();

        let article = site.loader().get_article_by_slug("s").unwrap();
        let text = describe(&article);
        assert!(text.contains("title:       T\n"));
        assert!(text.contains("tags:        x, y\n"));
        assert!(text.ends_with("\nBody\n"));
    }

    #[test]
    fn test_missing_article_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();
        let err = run(&site, "nope").unwrap_err();
        assert_eq!(err.to_string(), "Article not found: nope");
    }
}
