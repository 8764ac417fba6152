//! Route handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tera::Context;

use super::AppState;
use crate::templates::page_context;

/// Home page with the portfolio document, projects and posts
pub async fn home(State(state): State<Arc<AppState>>) -> Response {
    let config = &state.config;
    let title = if config.subtitle.is_empty() {
        config.title.clone()
    } else {
        format!("{} | {}", config.title, config.subtitle)
    };

    let mut context = page_context(config, &title, &config.description);
    context.insert("data", &state.catalog.portfolio());
    context.insert("projects", state.catalog.projects());
    context.insert("posts", state.catalog.posts());

    render(&state, "index.html", &context, StatusCode::OK)
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// Single blog post page
pub async fn blog_post(State(state): State<Arc<AppState>>, Path(slug): Path<String>) -> Response {
    let post = state.catalog.post(&slug);
    detail(
        &state,
        "blog",
        &slug,
        post.map(|p| (p.title.as_str(), p.excerpt.as_str())),
        post,
        ("Article", "Technical article"),
    )
}

/// Single project page
pub async fn project_detail(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Response {
    let project = state.catalog.project(&slug);
    detail(
        &state,
        "project",
        &slug,
        project.map(|p| (p.title.as_str(), p.description.as_str())),
        project,
        ("Project", "Technical project"),
    )
}

/// Render the detail template; an unknown slug gets the not-found form with a 404
fn detail<T: Serialize>(
    state: &AppState,
    content_type: &str,
    slug: &str,
    meta: Option<(&str, &str)>,
    item: Option<&T>,
    fallback: (&str, &str),
) -> Response {
    let (name, description) = meta.unwrap_or(fallback);
    let title = format!("{} | {}", name, state.config.title);

    let mut context = page_context(&state.config, &title, description);
    context.insert("content_type", content_type);
    context.insert("item", &item);

    let status = if item.is_some() {
        StatusCode::OK
    } else {
        tracing::warn!("No {} with slug {:?}", content_type, slug);
        StatusCode::NOT_FOUND
    };

    render(state, "detail.html", &context, status)
}

/// Markdown article from the articles directory
pub async fn read_article(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Response {
    if !is_plain_file_name(&filename) {
        tracing::warn!("Rejected article name {:?}", filename);
        return article_not_found();
    }

    let path = state.articles_dir.join(&filename);
    match tokio::fs::metadata(&path).await {
        Ok(meta) if meta.is_file() => {}
        _ => return article_not_found(),
    }

    let markdown = match tokio::fs::read_to_string(&path).await {
        Ok(markdown) => markdown,
        Err(e) => {
            tracing::error!("Failed to read article {:?}: {}", path, e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to read article").into_response();
        }
    };

    let heading = state
        .markdown
        .title(&markdown)
        .unwrap_or_else(|| filename.clone());
    let title = format!("{} | {}", heading, state.config.title);

    let mut context = page_context(&state.config, &title, &state.config.description);
    context.insert("body", &state.markdown.render(&markdown));

    render(&state, "article.html", &context, StatusCode::OK)
}

pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not found").into_response()
}

fn article_not_found() -> Response {
    (StatusCode::NOT_FOUND, Html("Article not found")).into_response()
}

/// A single path component: no separators, no parent references, no dotfiles
fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\'])
        && !name.contains("..")
}

fn render(state: &AppState, template: &str, context: &Context, status: StatusCode) -> Response {
    match state.templates.render(template, context) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render {}: {:#}", template, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}
