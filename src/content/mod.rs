//! Content module - articles, front-matter and body rendering

mod article;
mod frontmatter;
pub mod loader;
mod markdown;

pub use article::{newest_first, Article};
pub use frontmatter::{FrontMatter, FrontMatterError};
pub use loader::{ContentError, ContentLoader, FEATURED_COUNT};
pub use markdown::MarkdownRenderer;
