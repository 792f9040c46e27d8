//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::config::SiteConfig;
use crate::{Site, CONFIG_FILE};

const CONFIG_TEMPLATE: &str = r#"# Site
title: Blog
subtitle: Welcome to Our Blog
description: Discover insightful articles, expert opinions, and the latest trends in technology, design, and more.
author: ''
language: en

# URL
root: /

# Directory
content_dir: content/articles
article_extension: mdx
public_dir: public

# Writing
highlight:
  theme: base16-ocean.dark
  line_number: false

# Date format on article pages (LL, YYYY-MM-DD, ...)
date_format: LL

# Development server
server:
  ip: localhost
  port: 3000
"#;

/// The three articles a fresh site starts with
const SAMPLE_ARTICLES: [(&str, &str); 3] = [
    (
        "the-art-of-creating-sticky-headers",
        r#"---
title: The Art of Creating Sticky Headers
description: Learn how to implement effective sticky headers in modern web development.
date: "2023-08-15"
author: John Doe
category: Web Development
tags:
  - css
  - navigation
image: /placeholder.svg
---

## Introduction

Sticky headers have become a popular design pattern in modern web development. They provide a consistent
navigation experience and keep important elements accessible as users scroll through content. In this
article, we'll explore the art of creating effective sticky headers and discuss best practices for
implementation.

## The Basics of Sticky Headers

A sticky header, also known as a fixed header, is a navigation bar that remains visible at the top of the
screen as the user scrolls down a web page. This design pattern ensures that navigation options and other
crucial elements are always accessible, improving user experience and site usability.

Implementing a sticky header involves a combination of HTML structure, CSS positioning, and often
JavaScript for advanced features like resizing or changing opacity on scroll.

```css
header {
  position: sticky;
  top: 0;
}
```
"#,
    ),
    (
        "responsive-design-best-practices",
        r#"---
title: Responsive Design Best Practices
description: Explore key principles and techniques for creating responsive web designs.
date: "2023-08-20"
author: Jane Smith
category: Design
tags:
  - css
  - responsive
image: /placeholder.svg
---

## Introduction to Responsive Design

Responsive design is an approach to web design that makes web pages render well on a variety of devices and
window or screen sizes. In this article, we'll explore best practices for creating responsive designs that
provide an optimal viewing experience across a wide range of devices.

## Key Principles of Responsive Design

- Fluid grids
- Flexible images
- Media queries
- Mobile-first approach

By following these principles, you can create websites that adapt seamlessly to different screen sizes and
devices, providing a consistent and user-friendly experience for all visitors.
"#,
    ),
    (
        "optimizing-web-performance",
        r#"---
title: Optimizing Web Performance
description: Discover strategies to improve your website's loading speed and overall performance.
date: "2023-08-25"
author: Alex Johnson
category: Performance
tags:
  - performance
  - caching
image: /placeholder.svg
---

## Introduction to Web Performance

Web performance optimization is crucial for providing a smooth and enjoyable user experience. In this
article, we'll explore various strategies to improve your website's loading speed and overall performance.

## Key Optimization Techniques

- Minimize HTTP requests
- Optimize images
- Use content delivery networks (CDNs)
- Implement browser caching
- Minify CSS, JavaScript, and HTML

By implementing these techniques, you can significantly improve your website's loading times and create a
better experience for your users across various devices and network conditions.
"#,
    ),
];

/// Initialize a new site in the given directory
///
/// Existing files are left untouched.
pub fn init_site(target_dir: &Path) -> Result<()> {
    let defaults = SiteConfig::default();
    let content_dir = target_dir.join(&defaults.content_dir);

    fs::create_dir_all(&content_dir)?;
    fs::create_dir_all(target_dir.join(&defaults.public_dir))?;

    write_if_absent(&target_dir.join(CONFIG_FILE), CONFIG_TEMPLATE)?;

    for (slug, text) in SAMPLE_ARTICLES {
        let path = content_dir.join(format!("{}.{}", slug, defaults.article_extension));
        write_if_absent(&path, text)?;
    }

    Ok(())
}

/// Run the init command for an existing site
pub fn run(site: &Site) -> Result<()> {
    init_site(&site.base_dir)
}

fn write_if_absent(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        tracing::info!("Keeping existing {:?}", path);
        return Ok(());
    }
    fs::write(path, content)?;
    tracing::debug!("Created {:?}", path);
    Ok(())
}
