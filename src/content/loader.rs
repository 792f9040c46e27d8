//! Content loader - loads articles from the content directory
//!
//! Every call re-reads the directory; nothing is cached between calls, so a
//! loader can be shared freely across threads and requests.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use super::article::newest_first;
use super::{Article, FrontMatter, FrontMatterError};

/// Number of articles shown as featured
pub const FEATURED_COUNT: usize = 3;

/// Default article file extension
pub const DEFAULT_EXTENSION: &str = "mdx";

/// Errors raised by the content loader
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("article not found: {0}")]
    NotFound(String),

    #[error("invalid article slug: {0:?}")]
    InvalidSlug(String),

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("front-matter error in {path:?}: {source}")]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: FrontMatterError,
    },

    #[error("content path is not a directory: {0:?}")]
    NotADirectory(PathBuf),

    #[error("failed to list content directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Result type for loader operations
pub type Result<T> = std::result::Result<T, ContentError>;

/// Loads articles from a single content directory
#[derive(Debug, Clone)]
pub struct ContentLoader {
    dir: PathBuf,
    extension: String,
}

impl ContentLoader {
    /// Create a loader reading `<dir>/<slug>.mdx`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_extension(dir, DEFAULT_EXTENSION)
    }

    /// Create a loader for a custom article extension
    pub fn with_extension(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        Self {
            dir: dir.into(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    /// The content directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The article file extension (without the dot)
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Path an article with `slug` is read from
    pub fn article_path(&self, slug: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", slug, self.extension))
    }

    /// Slugs of every article file, in file name order
    ///
    /// Fails only when the directory itself cannot be listed.
    pub fn list_slugs(&self) -> Result<Vec<String>> {
        let metadata = fs::metadata(&self.dir).map_err(|source| ContentError::Io {
            path: self.dir.clone(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(ContentError::NotADirectory(self.dir.clone()));
        }

        let mut slugs = Vec::new();

        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                // Only the root failing is a directory-level error
                Err(err) if err.depth() > 0 => {
                    tracing::warn!("Skipping unreadable entry in {:?}: {}", self.dir, err);
                    continue;
                }
                Err(err) => return Err(err.into()),
            };
            let path = entry.path();
            if !entry.file_type().is_file() || !self.has_article_extension(path) {
                continue;
            }

            match path.file_stem().and_then(|s| s.to_str()) {
                Some(stem) => slugs.push(stem.to_string()),
                None => tracing::warn!("Skipping non UTF-8 file name {:?}", path),
            }
        }

        Ok(slugs)
    }

    /// Load every article, newest first
    ///
    /// Files that fail to load are left out of the result.
    pub fn list_all_articles(&self) -> Result<Vec<Article>> {
        let slugs = self.list_slugs()?;
        let total = slugs.len();

        let mut articles: Vec<Article> = slugs
            .iter()
            .filter_map(|slug| self.get_article_by_slug(slug))
            .collect();

        if articles.len() < total {
            tracing::debug!(
                "Loaded {} of {} articles from {:?}",
                articles.len(),
                total,
                self.dir
            );
        }

        // Stable sort keeps file name order for equal dates
        articles.sort_by(newest_first);

        Ok(articles)
    }

    /// Load one article, or `None` if it is missing, unreadable or malformed
    pub fn get_article_by_slug(&self, slug: &str) -> Option<Article> {
        match self.load_article(slug) {
            Ok(article) => Some(article),
            Err(e @ (ContentError::NotFound(_) | ContentError::InvalidSlug(_))) => {
                tracing::debug!("{}", e);
                None
            }
            Err(e) => {
                tracing::warn!("Failed to load article {:?}: {}", slug, e);
                None
            }
        }
    }

    /// Load one article, reporting why it could not be loaded
    pub fn load_article(&self, slug: &str) -> Result<Article> {
        validate_slug(slug)?;

        let path = self.article_path(slug);
        let text = fs::read_to_string(&path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ContentError::NotFound(slug.to_string())
            } else {
                ContentError::Io {
                    path: path.clone(),
                    source,
                }
            }
        })?;

        let (fm, body) = FrontMatter::parse(&text)
            .map_err(|source| ContentError::FrontMatter { path, source })?;

        Ok(Article::from_parts(slug, fm, body))
    }

    /// The most recent articles, at most [`FEATURED_COUNT`]
    pub fn get_featured_articles(&self) -> Result<Vec<Article>> {
        let mut articles = self.list_all_articles()?;
        articles.truncate(FEATURED_COUNT);
        Ok(articles)
    }

    /// Articles carrying `tag`, newest first
    pub fn articles_by_tag(&self, tag: &str) -> Result<Vec<Article>> {
        Ok(self
            .list_all_articles()?
            .into_iter()
            .filter(|a| a.has_tag(tag))
            .collect())
    }

    /// Articles filed under `category`, newest first
    pub fn articles_by_category(&self, category: &str) -> Result<Vec<Article>> {
        Ok(self
            .list_all_articles()?
            .into_iter()
            .filter(|a| a.in_category(category))
            .collect())
    }

    /// Tag usage counts, most used first
    pub fn tag_counts(&self) -> Result<Vec<(String, usize)>> {
        let articles = self.list_all_articles()?;
        Ok(count_labels(articles.iter().flat_map(|a| a.tags.iter())))
    }

    /// Category usage counts, most used first
    pub fn category_counts(&self) -> Result<Vec<(String, usize)>> {
        let articles = self.list_all_articles()?;
        Ok(count_labels(
            articles.iter().filter_map(|a| a.category.as_ref()),
        ))
    }

    fn has_article_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e == self.extension)
            .unwrap_or(false)
    }
}

/// Reject slugs that could escape the content directory
pub(crate) fn validate_slug(slug: &str) -> Result<()> {
    let invalid = slug.is_empty()
        || slug == "."
        || slug == ".."
        || slug.contains(['/', '\\', '\0']);

    if invalid {
        Err(ContentError::InvalidSlug(slug.to_string()))
    } else {
        Ok(())
    }
}

fn count_labels<'a>(labels: impl Iterator<Item = &'a String>) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for label in labels {
        *counts.entry(label.clone()).or_insert(0) += 1;
    }

    let mut counts: Vec<_> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_article(dir: &Path, slug: &str, date: &str) {
        let text = format!(
            "---\ntitle: {slug} title\ndate: {date}\nauthor: Jane Smith\ncategory: Design\ntags:\n  - css\n---\nBody of {slug}\n"
        );
        fs::write(dir.join(format!("{slug}.mdx")), text).unwrap();
    }

    fn slugs(articles: &[Article]) -> Vec<&str> {
        articles.iter().map(|a| a.slug.as_str()).collect()
    }

    #[test]
    fn test_round_trip_fields() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("s.mdx"),
            "---\ntitle: \"T\"\ndate: \"2023-08-15\"\nauthor: \"A\"\ntags: [\"x\", \"y\"]\n---\n# Heading\n\n<Callout>hi</Callout>\n",
        )
        .unwrap();

        let loader = ContentLoader::new(dir.path());
        let article = loader.get_article_by_slug("s").unwrap();
        assert_eq!(article.slug, "s");
        assert_eq!(article.title.as_deref(), Some("T"));
        assert_eq!(article.date.as_deref(), Some("2023-08-15"));
        assert_eq!(article.author.as_deref(), Some("A"));
        assert_eq!(article.tags, vec!["x", "y"]);
        assert_eq!(article.description, None);
        assert_eq!(article.content, "# Heading\n\n<Callout>hi</Callout>\n");
    }

    #[test]
    fn test_list_sorted_newest_first() {
        let dir = TempDir::new().unwrap();
        write_article(dir.path(), "a", "2023-08-25");
        write_article(dir.path(), "b", "2023-08-15");
        write_article(dir.path(), "c", "2023-08-20");

        let loader = ContentLoader::new(dir.path());
        let articles = loader.list_all_articles().unwrap();
        assert_eq!(slugs(&articles), vec!["a", "c", "b"]);

        for pair in articles.windows(2) {
            assert!(pair[0].date >= pair[1].date);
        }
    }

    #[test]
    fn test_equal_dates_keep_file_order() {
        let dir = TempDir::new().unwrap();
        write_article(dir.path(), "zeta", "2023-08-15");
        write_article(dir.path(), "alpha", "2023-08-15");
        write_article(dir.path(), "mid", "2023-09-01");

        let loader = ContentLoader::new(dir.path());
        let articles = loader.list_all_articles().unwrap();
        assert_eq!(slugs(&articles), vec!["mid", "alpha", "zeta"]);
    }

    #[test]
    fn test_only_matching_extension_listed() {
        let dir = TempDir::new().unwrap();
        write_article(dir.path(), "post", "2023-08-15");
        fs::write(dir.path().join("notes.md"), "---\ntitle: md\n---\n").unwrap();
        fs::write(dir.path().join("README"), "readme").unwrap();
        fs::create_dir(dir.path().join("drafts")).unwrap();
        write_article(&dir.path().join("drafts"), "nested", "2024-01-01");

        let loader = ContentLoader::new(dir.path());
        assert_eq!(loader.list_slugs().unwrap(), vec!["post"]);
        assert_eq!(slugs(&loader.list_all_articles().unwrap()), vec!["post"]);
    }

    #[test]
    fn test_custom_extension() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("notes.md"), "---\ntitle: md\n---\n").unwrap();
        write_article(dir.path(), "post", "2023-08-15");

        let loader = ContentLoader::with_extension(dir.path(), ".md");
        assert_eq!(loader.extension(), "md");
        assert_eq!(loader.list_slugs().unwrap(), vec!["notes"]);
    }

    #[test]
    fn test_missing_slug_is_none() {
        let dir = TempDir::new().unwrap();
        let loader = ContentLoader::new(dir.path());

        assert!(loader.get_article_by_slug("nope").is_none());
        assert!(matches!(
            loader.load_article("nope"),
            Err(ContentError::NotFound(_))
        ));
    }

    #[test]
    fn test_malformed_header_is_none() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("no-header.mdx"), "Just a body").unwrap();
        fs::write(dir.path().join("bad-yaml.mdx"), "---\ntitle: [oops\n---\nBody").unwrap();
        write_article(dir.path(), "good", "2023-08-15");

        let loader = ContentLoader::new(dir.path());
        assert!(loader.get_article_by_slug("no-header").is_none());
        assert!(loader.get_article_by_slug("bad-yaml").is_none());
        assert!(matches!(
            loader.load_article("bad-yaml"),
            Err(ContentError::FrontMatter { .. })
        ));

        // Corrupt files silently drop out of listings
        assert_eq!(slugs(&loader.list_all_articles().unwrap()), vec!["good"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_skipped() {
        let dir = TempDir::new().unwrap();
        write_article(dir.path(), "good", "2023-08-15");
        std::os::unix::fs::symlink(dir.path().join("gone.mdx"), dir.path().join("broken.mdx"))
            .unwrap();

        let loader = ContentLoader::new(dir.path());
        assert_eq!(loader.list_slugs().unwrap(), vec!["good"]);
        assert_eq!(slugs(&loader.list_all_articles().unwrap()), vec!["good"]);
        assert_eq!(slugs(&loader.get_featured_articles().unwrap()), vec!["good"]);
        assert!(loader.get_article_by_slug("broken").is_none());
    }

    #[test]
    fn test_path_traversal_rejected() {
        let dir = TempDir::new().unwrap();
        let content = dir.path().join("content");
        fs::create_dir(&content).unwrap();
        write_article(dir.path(), "secret", "2023-08-15");

        let loader = ContentLoader::new(&content);
        assert!(loader.get_article_by_slug("../secret").is_none());
        assert!(matches!(
            loader.load_article("../secret"),
            Err(ContentError::InvalidSlug(_))
        ));
        assert!(matches!(
            loader.load_article(""),
            Err(ContentError::InvalidSlug(_))
        ));
    }

    #[test]
    fn test_featured_is_prefix() {
        let dir = TempDir::new().unwrap();
        for (slug, date) in [
            ("one", "2023-01-01"),
            ("two", "2023-02-01"),
            ("three", "2023-03-01"),
            ("four", "2023-04-01"),
            ("five", "2023-05-01"),
        ] {
            write_article(dir.path(), slug, date);
        }

        let loader = ContentLoader::new(dir.path());
        let all = loader.list_all_articles().unwrap();
        let featured = loader.get_featured_articles().unwrap();
        assert_eq!(featured.len(), FEATURED_COUNT);
        assert_eq!(featured, all[..FEATURED_COUNT].to_vec());
        assert_eq!(slugs(&featured), vec!["five", "four", "three"]);
    }

    #[test]
    fn test_featured_with_fewer_articles() {
        let dir = TempDir::new().unwrap();
        write_article(dir.path(), "only", "2023-08-15");
        write_article(dir.path(), "other", "2023-08-16");

        let loader = ContentLoader::new(dir.path());
        assert_eq!(
            slugs(&loader.get_featured_articles().unwrap()),
            vec!["other", "only"]
        );
    }

    #[test]
    fn test_empty_directory() {
        let dir = TempDir::new().unwrap();
        let loader = ContentLoader::new(dir.path());

        assert!(loader.list_all_articles().unwrap().is_empty());
        assert!(loader.get_featured_articles().unwrap().is_empty());
        assert!(loader.get_article_by_slug("anything").is_none());
    }

    #[test]
    fn test_missing_directory_is_error() {
        let dir = TempDir::new().unwrap();
        let loader = ContentLoader::new(dir.path().join("does-not-exist"));

        assert!(matches!(
            loader.list_all_articles(),
            Err(ContentError::Io { .. })
        ));
        assert!(loader.get_featured_articles().is_err());
    }

    #[test]
    fn test_file_as_directory_is_error() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("articles");
        fs::write(&file, "not a dir").unwrap();

        let loader = ContentLoader::new(&file);
        assert!(matches!(
            loader.list_all_articles(),
            Err(ContentError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_filters_and_counts() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("perf.mdx"),
            "---\ntitle: Perf\ndate: 2023-08-25\ncategory: Performance\ntags: [web, speed]\n---\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("responsive.mdx"),
            "---\ntitle: Responsive\ndate: 2023-08-20\ncategory: Design\ntags: [web, css]\n---\n",
        )
        .unwrap();

        let loader = ContentLoader::new(dir.path());
        assert_eq!(
            slugs(&loader.articles_by_tag("web").unwrap()),
            vec!["perf", "responsive"]
        );
        assert_eq!(slugs(&loader.articles_by_tag("CSS").unwrap()), vec!["responsive"]);
        assert_eq!(
            slugs(&loader.articles_by_category("performance").unwrap()),
            vec!["perf"]
        );

        let tags = loader.tag_counts().unwrap();
        assert_eq!(tags[0], ("web".to_string(), 2));
        assert_eq!(tags.len(), 3);

        let categories = loader.category_counts().unwrap();
        assert_eq!(
            categories,
            vec![("Design".to_string(), 1), ("Performance".to_string(), 1)]
        );
    }

    #[test]
    fn test_loader_is_stateless() {
        let dir = TempDir::new().unwrap();
        let loader = ContentLoader::new(dir.path());
        assert!(loader.list_all_articles().unwrap().is_empty());

        write_article(dir.path(), "fresh", "2023-08-15");
        assert_eq!(slugs(&loader.list_all_articles().unwrap()), vec!["fresh"]);
    }
}
