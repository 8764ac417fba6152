//! HTTP server

mod handlers;

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::config::SiteConfig;
use crate::content::{Catalog, ContentIndex, MarkdownRenderer};
use crate::templates::TemplateRenderer;
use crate::Site;

/// Shared, read-only state handed to every request handler
pub struct AppState {
    pub config: SiteConfig,
    pub catalog: Catalog,
    pub templates: TemplateRenderer,
    pub markdown: MarkdownRenderer,
    pub static_dir: PathBuf,
    pub articles_dir: PathBuf,
}

impl AppState {
    /// Build the state from a loaded content index
    pub fn new(site: &Site, content: &ContentIndex) -> Result<Self> {
        let catalog = Catalog::from_index(content, &site.config)?;
        tracing::info!(
            "Catalog: {} post(s), {} project(s), portfolio group {}",
            catalog.posts().len(),
            catalog.projects().len(),
            if catalog.portfolio().is_some() {
                "present"
            } else {
                "missing"
            }
        );

        Ok(Self {
            config: site.config.clone(),
            catalog,
            templates: TemplateRenderer::new()?,
            markdown: MarkdownRenderer::new(),
            static_dir: site.static_dir.clone(),
            articles_dir: site.articles_dir.clone(),
        })
    }
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    let static_files = ServeDir::new(&state.static_dir);

    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health))
        .route("/blog/:slug", get(handlers::blog_post))
        .route("/project/:slug", get(handlers::project_detail))
        .route("/articles/:filename", get(handlers::read_article))
        .nest_service("/static", static_files)
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Load content and serve the site until Ctrl+C
///
/// A failed content load aborts start-up before the listener is bound.
pub async fn start(site: &Site, ip: &str, port: u16) -> Result<()> {
    let loader = site.loader();
    let content = tokio::task::spawn_blocking(move || loader.load())
        .await
        .context("Content loader task failed")?
        .with_context(|| format!("Failed to load content from {:?}", site.data_dir))?;

    let state = Arc::new(AppState::new(site, &content)?);
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let ip_addr: IpAddr = bind_ip
        .parse()
        .with_context(|| format!("Invalid bind address {:?}", ip))?;
    let addr = SocketAddr::new(ip_addr, port);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
