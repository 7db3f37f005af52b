//! Thin HTTP transport over the article service.
//!
//! Handlers parse and validate the edge inputs (identifiers, language codes,
//! pagination) and delegate everything else to the service; error-to-status
//! mapping lives on `EngineError`.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use bson::oid::ObjectId;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use crate::error::EngineError;
use crate::language::Language;
use crate::model::{
    Article, ArticleDraft, ArticlePatch, LocalizedContentPatch, SecondaryFields,
    TranslationPreview,
};
use crate::service::{ArticlePage, ArticleService};
use crate::store::ArticleFilter;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ArticleService>,
}

pub fn router(service: Arc<ArticleService>) -> Router {
    Router::new()
        .route("/api/articles", post(create_article).get(list_articles))
        .route("/api/articles/dual", post(create_dual_language_article))
        .route("/api/articles/dual/:id", put(update_dual_language_article))
        .route("/api/articles/slug/:slug", get(get_article_by_slug))
        .route(
            "/api/articles/:id",
            put(update_article).delete(delete_article),
        )
        .route(
            "/api/articles/:id/languages/:lang/content",
            post(add_secondary_language_content),
        )
        .route(
            "/api/articles/:id/language-fields",
            post(add_secondary_language_fields),
        )
        .route("/api/articles/:id/translate/:lang", post(translate_article))
        .route(
            "/api/articles/:id/translate/:lang/preview",
            get(preview_translation),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { service })
}

fn parse_id(value: &str) -> Result<ObjectId, EngineError> {
    value
        .parse::<ObjectId>()
        .map_err(|_| EngineError::InvalidIdentifier {
            value: value.to_string(),
        })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListParams {
    #[serde(default)]
    language: Option<Language>,
    #[serde(default)]
    status: Option<crate::model::ArticleStatus>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    is_featured: Option<bool>,
    #[serde(default = "default_limit")]
    limit: i64,
    #[serde(default = "default_page")]
    page: u64,
}

fn default_limit() -> i64 {
    10
}

fn default_page() -> u64 {
    1
}

#[derive(Debug, Deserialize)]
struct SlugParams {
    #[serde(default)]
    language: Option<Language>,
}

async fn create_article(
    State(state): State<AppState>,
    Json(draft): Json<ArticleDraft>,
) -> Result<(StatusCode, Json<Article>), EngineError> {
    let article = state.service.create_article(draft).await?;
    Ok((StatusCode::CREATED, Json(article)))
}

async fn list_articles(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ArticlePage>, EngineError> {
    let filter = ArticleFilter {
        language: params.language,
        status: params.status,
        category: params.category,
        is_featured: params.is_featured,
    };
    let page = state
        .service
        .list_articles(filter, params.limit, params.page)
        .await?;
    Ok(Json(page))
}

async fn get_article_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<SlugParams>,
) -> Result<Json<Article>, EngineError> {
    let language = params.language.unwrap_or_else(Language::canonical);
    let article = state.service.get_article_by_slug(&slug, language).await?;
    Ok(Json(article))
}

async fn update_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ArticlePatch>,
) -> Result<Json<Article>, EngineError> {
    let article = state.service.update_article(parse_id(&id)?, patch).await?;
    Ok(Json(article))
}

async fn delete_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, EngineError> {
    state.service.delete_article(parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_dual_language_article(
    State(state): State<AppState>,
    Json(draft): Json<ArticleDraft>,
) -> Result<(StatusCode, Json<Article>), EngineError> {
    let article = state.service.create_dual_language_article(draft).await?;
    Ok((StatusCode::CREATED, Json(article)))
}

async fn update_dual_language_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ArticlePatch>,
) -> Result<Json<Article>, EngineError> {
    let article = state
        .service
        .update_dual_language_article(parse_id(&id)?, patch)
        .await?;
    Ok(Json(article))
}

async fn add_secondary_language_content(
    State(state): State<AppState>,
    Path((id, lang)): Path<(String, String)>,
    Json(patch): Json<LocalizedContentPatch>,
) -> Result<Json<Article>, EngineError> {
    let article = state
        .service
        .add_secondary_language_content(parse_id(&id)?, Language::from_code(&lang)?, patch)
        .await?;
    Ok(Json(article))
}

async fn add_secondary_language_fields(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(fields): Json<SecondaryFields>,
) -> Result<Json<Article>, EngineError> {
    let article = state
        .service
        .add_secondary_language_fields(parse_id(&id)?, fields)
        .await?;
    Ok(Json(article))
}

async fn translate_article(
    State(state): State<AppState>,
    Path((id, lang)): Path<(String, String)>,
) -> Result<Json<Article>, EngineError> {
    let article = state
        .service
        .translate_article(parse_id(&id)?, Language::from_code(&lang)?)
        .await?;
    Ok(Json(article))
}

async fn preview_translation(
    State(state): State<AppState>,
    Path((id, lang)): Path<(String, String)>,
) -> Result<Json<TranslationPreview>, EngineError> {
    let preview = state
        .service
        .preview_translation(parse_id(&id)?, Language::from_code(&lang)?)
        .await?;
    Ok(Json(preview))
}
