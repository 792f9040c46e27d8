//! HTTP server for the site pages and the JSON article API
//!
//! Each request re-reads the content directory, so edits to article files
//! show up on the next page load without a restart.

use anyhow::Result;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::content::{Article, ContentError, ContentLoader, MarkdownRenderer};
use crate::templates::{TemplateRenderer, STYLESHEET};
use crate::Site;

/// Server state
struct ServerState {
    site: Site,
    templates: TemplateRenderer,
    markdown: MarkdownRenderer,
}

impl ServerState {
    fn loader(&self) -> ContentLoader {
        self.site.loader()
    }
}

/// Errors surfaced to HTTP clients as a generic 500
#[derive(Debug, thiserror::Error)]
enum ServerError {
    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("render failed: {0}")]
    Render(#[from] anyhow::Error),

    #[error("loader task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        tracing::error!("Request failed: {}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}

type HandlerResult<T> = std::result::Result<T, ServerError>;

/// Run a blocking loader call off the async runtime
async fn load<T, F>(loader: ContentLoader, f: F) -> HandlerResult<T>
where
    T: Send + 'static,
    F: FnOnce(&ContentLoader) -> T + Send + 'static,
{
    Ok(tokio::task::spawn_blocking(move || f(&loader)).await?)
}

/// Build the application router for a site
pub fn router(site: &Site) -> Result<Router> {
    let state = Arc::new(ServerState {
        site: site.clone(),
        templates: TemplateRenderer::new()?,
        markdown: MarkdownRenderer::with_options(
            &site.config.highlight.theme,
            site.config.highlight.line_number,
        ),
    });

    let app = Router::new()
        .route("/", get(index_handler))
        .route("/articles", get(articles_handler))
        .route("/articles/:slug", get(article_handler))
        .route("/tags/:tag", get(tag_handler))
        .route("/api/articles", get(api_articles_handler))
        .route("/api/articles/:slug", get(api_article_handler))
        .route("/api/featured", get(api_featured_handler))
        .route("/style.css", get(stylesheet_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Start the server
pub async fn start(site: &Site, ip: &str, port: u16, open: bool) -> Result<()> {
    let app = router(site)?;

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    println!("Serving articles from {:?}", site.content_dir);
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn index_handler(State(state): State<Arc<ServerState>>) -> HandlerResult<Html<String>> {
    let featured = load(state.loader(), |l| l.get_featured_articles()).await??;
    let html = state.templates.render_index(&state.site.config, &featured)?;
    Ok(Html(html))
}

async fn articles_handler(State(state): State<Arc<ServerState>>) -> HandlerResult<Html<String>> {
    let articles = load(state.loader(), |l| l.list_all_articles()).await??;
    let html = state
        .templates
        .render_articles(&state.site.config, &articles)?;
    Ok(Html(html))
}

async fn article_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> HandlerResult<Response> {
    let article = load(state.loader(), move |l| l.get_article_by_slug(&slug)).await?;

    let Some(article) = article else {
        return not_found(&state, "Article not found");
    };

    let body = state.markdown.render(&article.content)?;
    let html = state
        .templates
        .render_article(&state.site.config, &article, &body)?;
    Ok(Html(html).into_response())
}

async fn tag_handler(
    State(state): State<Arc<ServerState>>,
    Path(tag): Path<String>,
) -> HandlerResult<Html<String>> {
    let lookup = tag.clone();
    let articles = load(state.loader(), move |l| l.articles_by_tag(&lookup)).await??;
    let html = state
        .templates
        .render_tag(&state.site.config, &tag, &articles)?;
    Ok(Html(html))
}

async fn api_articles_handler(
    State(state): State<Arc<ServerState>>,
) -> HandlerResult<Json<Vec<Article>>> {
    let articles = load(state.loader(), |l| l.list_all_articles()).await??;
    Ok(Json(articles))
}

async fn api_featured_handler(
    State(state): State<Arc<ServerState>>,
) -> HandlerResult<Json<Vec<Article>>> {
    let articles = load(state.loader(), |l| l.get_featured_articles()).await??;
    Ok(Json(articles))
}

async fn api_article_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> HandlerResult<Response> {
    let article = load(state.loader(), move |l| l.get_article_by_slug(&slug)).await?;

    Ok(match article {
        Some(article) => Json(article).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "not found" })),
        )
            .into_response(),
    })
}

async fn stylesheet_handler() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLESHEET)
}

/// Serve files from the public directory, or the not-found page
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> HandlerResult<Response> {
    let mut service = ServeDir::new(&state.site.public_dir);
    match service.try_call(request).await {
        Ok(response) if response.status() != StatusCode::NOT_FOUND => {
            Ok(response.into_response())
        }
        Ok(_) => not_found(&state, "Page not found"),
        Err(e) => {
            tracing::error!("Static file error: {}", e);
            Ok((StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response())
        }
    }
}

fn not_found(state: &ServerState, message: &str) -> HandlerResult<Response> {
    let html = state
        .templates
        .render_not_found(&state.site.config, message)?;
    Ok((StatusCode::NOT_FOUND, Html(html)).into_response())
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}
